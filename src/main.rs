//! CLI entry point: prints the next trams at the watched station.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use next_tram::{
    config::TramConfig,
    fetch::BasicClient,
    model::{Direction, LineId},
    output::OutputFormat,
    pipeline::{Query, run},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "next_tram")]
#[command(about = "Give the time remaining before the next tramway", long_about = None)]
struct Cli {
    /// Only show this line
    #[arg(short, long)]
    line: Option<LineId>,

    /// Only show one direction: 0 toward downtown, 1 toward the outskirts
    #[arg(short, long, value_name = "0|1")]
    direction: Option<Direction>,

    /// Print the boards as JSON instead of a listing
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();
    let query = Query {
        line: cli.line,
        direction: cli.direction,
    };
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let config = TramConfig::default();
    let client = BasicClient::new();
    let mut stdout = std::io::stdout().lock();
    run(&client, &config, &query, format, &mut stdout)?;

    Ok(())
}

/// Logging setup: colored stderr, plus a JSON rolling log file when
/// `LOG_FILE_PATH` is set. The returned guard must live until exit.
fn init_tracing() -> Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let (json_layer, guard) = match std::env::var("LOG_FILE_PATH") {
        Ok(log_file_path) => {
            let log_path = Path::new(&log_file_path);
            let log_dir = log_path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let log_file_name = log_path
                .file_name()
                .unwrap_or(OsStr::new("next_tram.log"));

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(
                    EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?),
                );
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}
