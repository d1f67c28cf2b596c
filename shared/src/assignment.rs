use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::label::{Label, LabelCounts};
use crate::region::{NormalizeRules, RegionCode};

/// Canton ownership. Persisted as `{code: label}`; a missing key means unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignments {
    owners: BTreeMap<RegionCode, Label>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop keys that are not known region codes (e.g. stale or hand-edited storage).
    pub fn retain_known(&mut self, rules: &NormalizeRules) {
        self.owners.retain(|code, _| rules.is_known(code));
    }

    pub fn owner(&self, code: &RegionCode) -> Option<Label> {
        self.owners.get(code).copied()
    }

    /// Unassigned -> active, active -> unassigned, other -> active.
    pub fn toggle(&mut self, code: &RegionCode, active: Label) -> Option<Label> {
        match self.owners.get(code).copied() {
            Some(current) if current == active => {
                self.owners.remove(code);
                None
            }
            _ => {
                self.owners.insert(code.clone(), active);
                Some(active)
            }
        }
    }

    pub fn reset(&mut self) {
        self.owners.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegionCode, Label)> {
        self.owners.iter().map(|(code, label)| (code, *label))
    }

    pub fn counts(&self) -> LabelCounts {
        let mut counts = LabelCounts::default();
        for label in self.owners.values() {
            counts.increment(*label);
        }
        counts
    }
}
