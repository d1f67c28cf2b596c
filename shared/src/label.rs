use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three party labels. Used both for draw pools and canton ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Label {
    #[default]
    #[serde(rename = "D")]
    D,
    #[serde(rename = "Ä")]
    Ae,
    #[serde(rename = "G")]
    G,
}

impl Label {
    pub const ALL: [Label; 3] = [Label::D, Label::Ae, Label::G];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::D => "D",
            Self::Ae => "Ä",
            Self::G => "G",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "D" => Some(Self::D),
            "Ä" => Some(Self::Ae),
            "G" => Some(Self::G),
            _ => None,
        }
    }

    /// Fixed fill color for regions owned by this label.
    pub fn color_hex(self) -> &'static str {
        match self {
            Self::D => "#4B5320",  // military green
            Self::Ae => "#7EC8E3", // light blue
            Self::G => "#004080",  // dark blue
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-label tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelCounts {
    pub d: usize,
    pub ae: usize,
    pub g: usize,
}

impl LabelCounts {
    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::D => self.d,
            Label::Ae => self.ae,
            Label::G => self.g,
        }
    }

    pub fn increment(&mut self, label: Label) {
        match label {
            Label::D => self.d += 1,
            Label::Ae => self.ae += 1,
            Label::G => self.g += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.d + self.ae + self.g
    }
}
