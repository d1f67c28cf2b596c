use crate::assignment::Assignments;
use crate::ingest::CanonicalRegion;
use crate::label::{Label, LabelCounts};
use crate::region::RegionCode;

const OWNED_STROKE: &str = "rgba(255,255,255,.85)";
const OWNED_LABEL: &str = "#ffffff";

const DARK_FILL: &str = "#1b1c21";
const DARK_STROKE: &str = "#2a2a2a";
const DARK_LABEL: &str = "#e7e7ea";

const LIGHT_FILL: &str = "rgba(255,255,255,.9)";
const LIGHT_STROKE: &str = "rgba(0,0,0,.25)";
const LIGHT_LABEL: &str = "#111";

/// Colors for one region, as SVG attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionPaint {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub label: &'static str,
}

/// Owner color with a light border, or the neutral pair for the current theme.
pub fn region_paint(owner: Option<Label>, dark: bool) -> RegionPaint {
    match owner {
        Some(label) => RegionPaint {
            fill: label.color_hex(),
            stroke: OWNED_STROKE,
            label: OWNED_LABEL,
        },
        None if dark => RegionPaint {
            fill: DARK_FILL,
            stroke: DARK_STROKE,
            label: DARK_LABEL,
        },
        None => RegionPaint {
            fill: LIGHT_FILL,
            stroke: LIGHT_STROKE,
            label: LIGHT_LABEL,
        },
    }
}

/// Recompute paint for every ingested region.
pub fn apply_colors(
    regions: &[CanonicalRegion],
    assignments: &Assignments,
    dark: bool,
) -> Vec<(RegionCode, RegionPaint)> {
    regions
        .iter()
        .map(|region| {
            let owner = assignments.owner(&region.code);
            (region.code.clone(), region_paint(owner, dark))
        })
        .collect()
}

pub fn counts_text(counts: &LabelCounts) -> String {
    format!(
        "Cantons \u{2014} D: {} \u{00B7} \u{00C4}: {} \u{00B7} G: {}",
        counts.d, counts.ae, counts.g
    )
}

pub fn remaining_text(remaining: impl Fn(Label) -> usize) -> String {
    format!(
        "Numbers left \u{2014} D: {}, \u{00C4}: {}, G: {}",
        remaining(Label::D),
        remaining(Label::Ae),
        remaining(Label::G)
    )
}
