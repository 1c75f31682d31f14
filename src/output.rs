//! Rendering of arrival boards.
//!
//! Supports a console listing and pretty-printed JSON.

use std::io::Write;

use tracing::debug;

use crate::error::Error;
use crate::model::{Direction, LineId};
use crate::pipeline::{Arrival, LineBoard};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn line_header(line: &LineId) -> String {
    format!("Next trams for line {line}")
}

pub fn direction_header(direction: Direction) -> String {
    format!("Direction: {}", direction.label())
}

pub fn format_arrival(arrival: &Arrival) -> String {
    format!(
        "Destination {}, arriving in {} minutes.",
        arrival.headsign, arrival.minutes
    )
}

/// Writes boards as `[INFO]` headers followed by ` * ` arrival items.
pub fn write_text<W: Write>(out: &mut W, boards: &[LineBoard]) -> std::io::Result<()> {
    for board in boards {
        writeln!(out, "[INFO] {}", line_header(&board.line))?;
        writeln!(out)?;
        for direction in &board.directions {
            writeln!(out, "[INFO] {}", direction_header(direction.direction))?;
            for arrival in &direction.arrivals {
                writeln!(out, " * {}", format_arrival(arrival))?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Writes boards as one pretty-printed JSON array.
pub fn write_json<W: Write>(out: &mut W, boards: &[LineBoard]) -> Result<(), Error> {
    debug!(boards = boards.len(), "Writing JSON output");
    serde_json::to_writer_pretty(&mut *out, boards)?;
    writeln!(out)?;
    Ok(())
}
