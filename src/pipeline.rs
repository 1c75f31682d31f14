//! Turns a fetched feed into per-line, per-direction arrival boards.

use std::io::Write;

use chrono::NaiveTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::TramConfig;
use crate::error::Error;
use crate::fetch::{HttpClient, fetch_feed};
use crate::model::{Direction, LineId, StopRecord};
use crate::output::{OutputFormat, write_json, write_text};
use crate::parser::decode_feed;
use crate::select::{at_stations, in_direction, on_line, sort_by_wait};

/// What the user asked to see. `None` means "all of them".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub line: Option<LineId>,
    pub direction: Option<Direction>,
}

/// One upcoming tram as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arrival {
    pub headsign: String,
    pub minutes: i64,
    pub delay_sec: i64,
    pub is_theoretical: bool,
    pub departure_time: NaiveTime,
    pub course: String,
}

impl From<&StopRecord> for Arrival {
    fn from(record: &StopRecord) -> Self {
        Self {
            headsign: record.trip_headsign.clone(),
            minutes: record.wait_minutes(),
            delay_sec: record.delay_sec,
            is_theoretical: record.is_theoretical,
            departure_time: record.departure_time,
            course: record.course.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionBoard {
    pub direction: Direction,
    /// Soonest first. May be empty.
    pub arrivals: Vec<Arrival>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineBoard {
    pub line: LineId,
    pub directions: Vec<DirectionBoard>,
}

/// Groups the records seen at the configured station into boards.
///
/// A line with no rows at the station gets no board at all, while every
/// requested direction of a shown line gets a board, even an empty one.
pub fn build_boards(records: &[StopRecord], config: &TramConfig, query: &Query) -> Vec<LineBoard> {
    let at_station = at_stations(records, &config.stations);
    debug!(
        total = records.len(),
        at_station = at_station.len(),
        "Rows at the watched station"
    );

    let lines = match &query.line {
        Some(line) => {
            if !config.lines.contains(line) {
                warn!(%line, "Requested line is not one of the configured lines");
            }
            vec![line.clone()]
        }
        None => config.lines.clone(),
    };
    let directions = match query.direction {
        Some(direction) => vec![direction],
        None => Direction::ALL.to_vec(),
    };

    lines
        .into_iter()
        .filter_map(|line| {
            let line_rows = on_line(at_station.iter().copied(), &line);
            if line_rows.is_empty() {
                debug!(%line, "No trams for line, skipping");
                return None;
            }

            let directions = directions
                .iter()
                .map(|&direction| {
                    let mut rows =
                        in_direction(line_rows.iter().copied(), &config.stations, direction);
                    sort_by_wait(&mut rows);
                    DirectionBoard {
                        direction,
                        arrivals: rows.into_iter().map(Arrival::from).collect(),
                    }
                })
                .collect();

            Some(LineBoard { line, directions })
        })
        .collect()
}

/// Fetches, decodes, groups and prints. Stops at the first error.
pub fn run<C: HttpClient, W: Write>(
    client: &C,
    config: &TramConfig,
    query: &Query,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), Error> {
    info!(url = %config.feed_url, "Fetching realtime data from TAM API");
    let body = fetch_feed(client, &config.feed_url)?;
    let records = decode_feed(&body)?;
    let boards = build_boards(&records, config, query);

    match format {
        OutputFormat::Text => write_text(out, &boards)?,
        OutputFormat::Json => write_json(out, &boards)?,
    }
    out.flush()?;
    Ok(())
}
