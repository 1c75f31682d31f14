//! Which feed to read and which station to watch.

use crate::model::{Direction, LineId};

/// TAM real-time departures for the whole Montpellier network.
pub const DEFAULT_FEED_URL: &str =
    "https://data.montpellier3m.fr/sites/default/files/ressources/TAM_MMM_TpsReel.csv";

/// The two platform stop codes of one station, one per direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationPair {
    pub toward_center: String,
    pub toward_outside: String,
}

impl StationPair {
    pub fn new(toward_center: impl Into<String>, toward_outside: impl Into<String>) -> Self {
        Self {
            toward_center: toward_center.into(),
            toward_outside: toward_outside.into(),
        }
    }

    /// Stop code reported by trams heading in `direction`.
    pub fn code_for(&self, direction: Direction) -> &str {
        match direction {
            Direction::TowardCenter => &self.toward_center,
            Direction::TowardOutside => &self.toward_outside,
        }
    }

    pub fn contains(&self, stop_code: &str) -> bool {
        self.toward_center == stop_code || self.toward_outside == stop_code
    }
}

/// Settings fixed at startup and handed to the pipeline.
#[derive(Debug, Clone)]
pub struct TramConfig {
    pub feed_url: String,
    pub stations: StationPair,
    /// Lines shown when no `--line` is given, in display order.
    pub lines: Vec<LineId>,
}

impl Default for TramConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            stations: StationPair::new("PMARIRTW", "PMARIATW"),
            lines: vec![LineId::from(1), LineId::from(3)],
        }
    }
}

impl TramConfig {
    /// Read the feed from somewhere else (for testing).
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed_url = url.into();
        self
    }
}
