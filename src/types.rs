/// Core type definitions for the bar collector
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Column order of the destination worksheet, header row included.
pub const SHEET_COLUMNS: [&str; 7] = [
    "DataHora", "Open", "High", "Low", "Close", "Volume", "TARGET_MANUAL",
];

/// Canonical timestamp format used for storage and watermark comparison.
/// Fixed-width and zero-padded, so lexicographic order equals chronological order.
pub const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// OHLCV bar as returned by the provider, timestamped in UTC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Canonical destination row: a bar keyed by its local-time string plus
/// a label cell that stays empty until a human annotator fills it in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledBar {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub label: String,
}

impl LabeledBar {
    /// Cells in worksheet column order
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.open.to_string(),
            self.high.to_string(),
            self.low.to_string(),
            self.close.to_string(),
            self.volume.to_string(),
            self.label.clone(),
        ]
    }
}

/// Configuration for the collector
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Instrument
    pub symbol: String,

    // Destination worksheet
    pub spreadsheet_id: String,
    pub worksheet: String,
    pub credentials_file: String,

    // Scheduling
    pub poll_interval_sec: u64,

    // Canonical local zone (IANA name, e.g. "America/Sao_Paulo")
    pub timezone: String,
}

impl Config {
    pub fn local_zone(&self) -> Option<Tz> {
        self.timezone.parse().ok()
    }
}
