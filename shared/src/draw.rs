use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Size of every draw pool; values run 1..=TOTAL.
pub const TOTAL: u8 = 26;

/// Values already drawn for one label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawPool {
    drawn: BTreeSet<u8>,
}

impl DrawPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a pool from persisted values, dropping anything outside 1..=TOTAL.
    pub fn from_values(values: impl IntoIterator<Item = u8>) -> Self {
        Self {
            drawn: values.into_iter().filter(|v| in_range(*v)).collect(),
        }
    }

    pub fn contains(&self, value: u8) -> bool {
        self.drawn.contains(&value)
    }

    pub fn len(&self) -> usize {
        self.drawn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.drawn.len() >= TOTAL as usize
    }

    pub fn remaining(&self) -> usize {
        (TOTAL as usize).saturating_sub(self.drawn.len())
    }

    pub fn values(&self) -> impl Iterator<Item = u8> + '_ {
        self.drawn.iter().copied()
    }

    pub fn clear(&mut self) {
        self.drawn.clear();
    }

    /// Draw with an injected start value. Pure apart from the pool itself.
    pub fn draw_from(&mut self, start: u8) -> DrawOutcome {
        match next_available_from(start, self) {
            Some(value) => {
                self.drawn.insert(value);
                DrawOutcome::Drawn {
                    value,
                    now_exhausted: self.is_full(),
                }
            }
            None => DrawOutcome::Exhausted,
        }
    }
}

/// Result of one draw attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// `now_exhausted` is set when this draw took the last free value.
    Drawn { value: u8, now_exhausted: bool },
    Exhausted,
}

impl DrawOutcome {
    pub fn value(self) -> Option<u8> {
        match self {
            Self::Drawn { value, .. } => Some(value),
            Self::Exhausted => None,
        }
    }

    /// True when the label must not be drawn again.
    pub fn disables_label(self) -> bool {
        match self {
            Self::Drawn { now_exhausted, .. } => now_exhausted,
            Self::Exhausted => true,
        }
    }
}

/// First value at or after `start` (wrapping TOTAL -> 1) that is not in `pool`.
///
/// A start outside 1..=TOTAL is folded back into range first.
pub fn next_available_from(start: u8, pool: &DrawPool) -> Option<u8> {
    if pool.is_full() {
        return None;
    }
    let mut candidate = fold_into_range(start);
    for _ in 0..TOTAL {
        if !pool.contains(candidate) {
            return Some(candidate);
        }
        candidate = candidate % TOTAL + 1;
    }
    None
}

/// Map a uniform sample in `[0, 1)` to a start value in 1..=TOTAL.
pub fn random_start(sample: f64) -> u8 {
    let scaled = (sample * TOTAL as f64).floor();
    if !scaled.is_finite() || scaled < 0.0 {
        return 1;
    }
    (scaled as u8).min(TOTAL - 1) + 1
}

fn in_range(value: u8) -> bool {
    (1..=TOTAL).contains(&value)
}

fn fold_into_range(value: u8) -> u8 {
    if in_range(value) {
        value
    } else {
        ((value as i32 - 1).rem_euclid(TOTAL as i32) + 1) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawOutcome, DrawPool, TOTAL, next_available_from, random_start};

    fn forward_distance(from: u8, to: u8) -> u8 {
        (to + TOTAL - from) % TOTAL
    }

    #[test]
    fn seeded_scan_skips_used_values() {
        let pool = DrawPool::from_values([3, 4, 5]);
        assert_eq!(next_available_from(3, &pool), Some(6));
    }

    #[test]
    fn scan_wraps_from_total_to_one() {
        let pool = DrawPool::from_values([25, 26]);
        assert_eq!(next_available_from(25, &pool), Some(1));
    }

    #[test]
    fn full_pool_returns_none() {
        let pool = DrawPool::from_values(1..=TOTAL);
        assert!(pool.is_full());
        assert_eq!(next_available_from(7, &pool), None);
    }

    #[test]
    fn next_available_is_nearest_forward_free_value() {
        let pools = [
            DrawPool::new(),
            DrawPool::from_values([1, 2, 3, 26]),
            DrawPool::from_values((1..=TOTAL).filter(|v| v % 2 == 0)),
            DrawPool::from_values((1..=TOTAL).filter(|v| *v != 13)),
        ];
        for pool in &pools {
            for start in 1..=TOTAL {
                let value = next_available_from(start, pool).expect("pool has room");
                assert!((1..=TOTAL).contains(&value));
                assert!(!pool.contains(value));
                let best = (1..=TOTAL)
                    .filter(|v| !pool.contains(*v))
                    .map(|v| forward_distance(start, v))
                    .min()
                    .unwrap();
                assert_eq!(forward_distance(start, value), best);
            }
        }
    }

    #[test]
    fn twenty_six_draws_fill_the_pool_then_exhaust() {
        let mut pool = DrawPool::new();
        for i in 0..TOTAL {
            let outcome = pool.draw_from(i % 5 + 1);
            assert!(matches!(outcome, DrawOutcome::Drawn { .. }));
            assert_eq!(outcome.disables_label(), i == TOTAL - 1);
        }
        assert_eq!(pool.len(), TOTAL as usize);
        assert_eq!(pool.remaining(), 0);
        assert_eq!(pool.draw_from(1), DrawOutcome::Exhausted);
        assert_eq!(pool.len(), TOTAL as usize);
    }

    #[test]
    fn out_of_range_start_is_folded() {
        let pool = DrawPool::new();
        assert_eq!(next_available_from(0, &pool), Some(26));
        assert_eq!(next_available_from(27, &pool), Some(1));
    }

    #[test]
    fn from_values_drops_out_of_range() {
        let pool = DrawPool::from_values([0, 1, 26, 27, 200]);
        assert_eq!(pool.values().collect::<Vec<_>>(), vec![1, 26]);
    }

    #[test]
    fn random_start_covers_full_range() {
        assert_eq!(random_start(0.0), 1);
        assert_eq!(random_start(0.999_999), TOTAL);
        assert_eq!(random_start(0.5), 14);
        assert_eq!(random_start(1.0), TOTAL);
        assert_eq!(random_start(f64::NAN), 1);
    }
}
