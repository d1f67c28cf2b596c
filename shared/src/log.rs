use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::label::Label;

/// Text shown in the number column when a label had nothing left to draw.
pub const EXHAUSTED_MARKER: &str = "\u{2014}";

/// One draw attempt. Persisted as `{t, p, n}`; `n` is `null` for an exhausted draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "t")]
    pub time: NaiveTime,
    #[serde(rename = "p")]
    pub label: Label,
    #[serde(rename = "n")]
    pub value: Option<u8>,
}

impl LogEntry {
    /// Sub-second precision is dropped; the table only shows whole seconds.
    pub fn new(time: NaiveTime, label: Label, value: Option<u8>) -> Self {
        let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), time.second())
            .unwrap_or(time);
        Self { time, label, value }
    }

    pub fn time_text(&self) -> String {
        self.time.format("%H:%M:%S").to_string()
    }

    pub fn value_text(&self) -> String {
        match self.value {
            Some(value) => value.to_string(),
            None => EXHAUSTED_MARKER.to_string(),
        }
    }
}

/// Append-only draw history, stored oldest-first and shown newest-first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawLog {
    entries: Vec<LogEntry>,
}

impl DrawLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chronological order, as persisted.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Display order: most recent first.
    pub fn newest_first(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev()
    }
}
