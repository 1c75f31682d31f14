//! Typed rows of the TAM real-time departures feed.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::Serialize;

/// A tramway line, compared by its normalized short name.
///
/// Numeric names are kept in canonical decimal form, so `"01"`, `" 1 "` and
/// `1` all name the same line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<u64>() {
            Ok(number) => Self(number.to_string()),
            Err(_) => Self(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u32> for LineId {
    fn from(number: u32) -> Self {
        Self(number.to_string())
    }
}

impl FromStr for LineId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("line identifier cannot be empty".to_string());
        }
        Ok(Self::new(s))
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Travel orientation at the watched station.
///
/// The feed has no usable direction column for this purpose: each orientation
/// is reported against its own platform stop code, so the index here is the
/// position of that code in [`crate::config::StationPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    TowardCenter,
    TowardOutside,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::TowardCenter, Direction::TowardOutside];

    pub fn index(self) -> usize {
        match self {
            Direction::TowardCenter => 0,
            Direction::TowardOutside => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::TowardCenter => "toward downtown",
            Direction::TowardOutside => "toward outskirts",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Direction::TowardCenter),
            "1" => Ok(Direction::TowardOutside),
            other => Err(format!("invalid direction '{other}', expected 0 or 1")),
        }
    }
}

/// One row of the feed: a tram expected at a platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopRecord {
    pub course: String,
    pub stop_code: Option<String>,
    pub stop_id: i64,
    pub route_short_name: LineId,
    pub trip_headsign: String,
    pub direction_id: i64,
    pub departure_time: NaiveTime,
    pub is_theoretical: bool,
    /// Seconds until arrival. Can be negative when the feed is stale.
    pub delay_sec: i64,
    pub dest_ar_code: i64,
}

impl StopRecord {
    /// Whole minutes until arrival, rounded toward negative infinity.
    pub fn wait_minutes(&self) -> i64 {
        self.delay_sec.div_euclid(60)
    }
}

#[cfg(test)]
pub(crate) fn sample_record(
    course: &str,
    stop_code: Option<&str>,
    line: &str,
    headsign: &str,
    delay_sec: i64,
) -> StopRecord {
    StopRecord {
        course: course.to_string(),
        stop_code: stop_code.map(str::to_string),
        stop_id: 1234,
        route_short_name: LineId::new(line),
        trip_headsign: headsign.to_string(),
        direction_id: 0,
        departure_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        is_theoretical: false,
        delay_sec,
        dest_ar_code: 42,
    }
}
