//! Station, line and direction selection over decoded records.
//!
//! Every function here keeps the relative order of the rows it is given.

use crate::config::StationPair;
use crate::model::{Direction, LineId, StopRecord};

/// Rows reported at either platform of the watched station.
/// Rows without a stop code never match.
pub fn at_stations<'a>(rows: &'a [StopRecord], stations: &StationPair) -> Vec<&'a StopRecord> {
    rows.iter()
        .filter(|row| {
            row.stop_code
                .as_deref()
                .is_some_and(|code| stations.contains(code))
        })
        .collect()
}

pub fn on_line<'a>(
    rows: impl IntoIterator<Item = &'a StopRecord>,
    line: &LineId,
) -> Vec<&'a StopRecord> {
    rows.into_iter()
        .filter(|row| row.route_short_name == *line)
        .collect()
}

/// Rows heading in `direction`, i.e. reported against that direction's platform.
pub fn in_direction<'a>(
    rows: impl IntoIterator<Item = &'a StopRecord>,
    stations: &StationPair,
    direction: Direction,
) -> Vec<&'a StopRecord> {
    let code = stations.code_for(direction);
    rows.into_iter()
        .filter(|row| row.stop_code.as_deref() == Some(code))
        .collect()
}

/// Soonest first. Stable, so equal waits keep feed order.
pub fn sort_by_wait(rows: &mut [&StopRecord]) {
    rows.sort_by_key(|row| row.delay_sec);
}
