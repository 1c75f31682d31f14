//! Error types for fetching, decoding and printing the feed.

/// The feed could not be downloaded.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The server answered with something other than 200 OK
    #[error("cannot fetch the tramway stops, got status code {status}")]
    Status { status: u16 },

    /// The request never produced a response
    #[error("cannot fetch the tramway stops: {message}")]
    Transport { message: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport {
            message: err.to_string(),
        }
    }
}

/// The feed body is not the CSV we expect. Any of these aborts the whole decode.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A column listed in the field map is absent from the header row
    #[error("feed has no `{column}` column")]
    MissingColumn { column: &'static str },

    /// The CSV reader rejected a row (bad quoting, wrong column count, ...)
    #[error("malformed CSV at line {line}: {message}")]
    Csv { line: u64, message: String },

    /// A cell could not be converted to its field type
    #[error("line {line}: invalid {column} value {value:?}")]
    InvalidField {
        line: u64,
        column: &'static str,
        value: String,
    },
}

impl From<csv::Error> for DecodeError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, |pos| pos.line());
        DecodeError::Csv {
            line,
            message: err.to_string(),
        }
    }
}

/// Everything [`crate::pipeline::run`] can fail with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("cannot write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot serialize output: {0}")]
    Json(#[from] serde_json::Error),
}
