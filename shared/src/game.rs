use std::collections::BTreeMap;

use chrono::NaiveTime;

use crate::assignment::Assignments;
use crate::draw::{DrawOutcome, DrawPool};
use crate::label::{Label, LabelCounts};
use crate::log::{DrawLog, LogEntry};
use crate::region::{NormalizeRules, RegionCode};
use crate::render::{self, RegionPaint};
use crate::storage::{
    ACTIVE_PLAYER_KEY, DARK_KEY, KeyValueStore, LOG_ENTRIES_KEY, MAP_STATE_KEY, USED_SETS_KEY,
    load_flag, load_json, save_flag, save_json,
};

/// Everything the page mutates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameState {
    pub pools: BTreeMap<Label, DrawPool>,
    pub log: DrawLog,
    pub assignments: Assignments,
    pub active_label: Label,
    pub dark: bool,
}

impl GameState {
    pub fn pool(&self, label: Label) -> Option<&DrawPool> {
        self.pools.get(&label)
    }
}

/// Owns the state and writes every mutation through to the store.
#[derive(Debug, Clone)]
pub struct Game<S> {
    state: GameState,
    store: S,
    rules: NormalizeRules,
}

impl<S: KeyValueStore> Game<S> {
    pub fn load(store: S) -> Self {
        Self::load_with_rules(store, NormalizeRules::default())
    }

    /// Restore from the store; anything missing or malformed starts empty.
    pub fn load_with_rules(store: S, rules: NormalizeRules) -> Self {
        let used: BTreeMap<Label, Vec<i64>> = load_json(&store, USED_SETS_KEY).unwrap_or_default();
        let pools = Label::ALL
            .into_iter()
            .map(|label| {
                let values = used
                    .get(&label)
                    .into_iter()
                    .flatten()
                    .filter_map(|v| u8::try_from(*v).ok());
                (label, DrawPool::from_values(values))
            })
            .collect();

        let log: DrawLog = load_json(&store, LOG_ENTRIES_KEY).unwrap_or_default();

        let mut assignments: Assignments = load_json(&store, MAP_STATE_KEY).unwrap_or_default();
        assignments.retain_known(&rules);

        let active_label = load_json(&store, ACTIVE_PLAYER_KEY)
            .or_else(|| store.load(ACTIVE_PLAYER_KEY).and_then(|raw| Label::parse(&raw)))
            .unwrap_or_default();

        let dark = load_flag(&store, DARK_KEY);

        Self {
            state: GameState {
                pools,
                log,
                assignments,
                active_label,
                dark,
            },
            store,
            rules,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn rules(&self) -> &NormalizeRules {
        &self.rules
    }

    /// Draw for `label` starting the scan at `start`; logs the attempt either way.
    pub fn draw(&mut self, label: Label, start: u8, time: NaiveTime) -> DrawOutcome {
        let outcome = self.state.pools.entry(label).or_default().draw_from(start);
        self.state
            .log
            .append(LogEntry::new(time, label, outcome.value()));
        self.persist_pools();
        self.persist_log();
        outcome
    }

    pub fn remaining(&self, label: Label) -> usize {
        self.state
            .pool(label)
            .map_or(crate::draw::TOTAL as usize, DrawPool::remaining)
    }

    pub fn is_exhausted(&self, label: Label) -> bool {
        self.remaining(label) == 0
    }

    pub fn status_text(&self) -> String {
        render::remaining_text(|label| self.remaining(label))
    }

    /// Cycle ownership of a known region. Unknown codes are ignored.
    pub fn toggle_region(&mut self, code: &RegionCode) -> Option<Label> {
        if !self.rules.is_known(code) {
            return self.state.assignments.owner(code);
        }
        let owner = self
            .state
            .assignments
            .toggle(code, self.state.active_label);
        self.persist_assignments();
        owner
    }

    pub fn active_label(&self) -> Label {
        self.state.active_label
    }

    pub fn set_active_label(&mut self, label: Label) {
        self.state.active_label = label;
        save_json(&mut self.store, ACTIVE_PLAYER_KEY, &label);
    }

    pub fn dark(&self) -> bool {
        self.state.dark
    }

    pub fn set_dark(&mut self, dark: bool) {
        self.state.dark = dark;
        save_flag(&mut self.store, DARK_KEY, dark);
    }

    pub fn counts(&self) -> LabelCounts {
        self.state.assignments.counts()
    }

    pub fn counts_text(&self) -> String {
        render::counts_text(&self.counts())
    }

    pub fn region_paint(&self, code: &RegionCode) -> RegionPaint {
        render::region_paint(self.state.assignments.owner(code), self.state.dark)
    }

    /// Clear pools, log and map. Theme and active label survive.
    pub fn reset(&mut self) {
        for pool in self.state.pools.values_mut() {
            pool.clear();
        }
        self.state.log.clear();
        self.state.assignments.reset();
        self.persist_pools();
        self.persist_log();
        self.persist_assignments();
    }

    fn persist_pools(&mut self) {
        let used: BTreeMap<Label, Vec<u8>> = Label::ALL
            .into_iter()
            .map(|label| {
                let values = self
                    .state
                    .pool(label)
                    .map(|pool| pool.values().collect())
                    .unwrap_or_default();
                (label, values)
            })
            .collect();
        save_json(&mut self.store, USED_SETS_KEY, &used);
    }

    fn persist_log(&mut self) {
        save_json(&mut self.store, LOG_ENTRIES_KEY, &self.state.log);
    }

    fn persist_assignments(&mut self) {
        save_json(&mut self.store, MAP_STATE_KEY, &self.state.assignments);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::Game;
    use crate::draw::{DrawOutcome, TOTAL};
    use crate::label::Label;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn empty_store_starts_fresh() {
        let game = Game::load(MemoryStore::new());
        for label in Label::ALL {
            assert_eq!(game.remaining(label), TOTAL as usize);
        }
        assert_eq!(game.active_label(), Label::D);
        assert!(!game.dark());
        assert!(game.state().log.is_empty());
    }

    #[test]
    fn malformed_storage_falls_back_to_defaults() {
        let store = MemoryStore::new()
            .with("usedSets", "[[[")
            .with("logEntries", "{}")
            .with("mapState", "nope")
            .with("activePlayer", "\"X\"")
            .with("dark", "yes");
        let game = Game::load(store);
        assert_eq!(game.remaining(Label::G), TOTAL as usize);
        assert!(game.state().log.is_empty());
        assert!(game.state().assignments.is_empty());
        assert_eq!(game.active_label(), Label::D);
        assert!(!game.dark());
    }

    #[test]
    fn restores_persisted_state() {
        let store = MemoryStore::new()
            .with("usedSets", r#"{"D":[1,2,99],"Ä":[26]}"#)
            .with("logEntries", r#"[{"t":"10:00:00","p":"D","n":1}]"#)
            .with("mapState", r#"{"ZH":"G","QQ":"D"}"#)
            .with("activePlayer", "\"Ä\"")
            .with("dark", "1");
        let game = Game::load(store);
        assert_eq!(game.remaining(Label::D), 24);
        assert_eq!(game.remaining(Label::Ae), 25);
        assert_eq!(game.remaining(Label::G), 26);
        assert_eq!(game.state().log.len(), 1);
        assert_eq!(game.counts().g, 1);
        assert_eq!(game.state().assignments.len(), 1);
        assert_eq!(game.active_label(), Label::Ae);
        assert!(game.dark());
    }

    #[test]
    fn accepts_bare_active_label() {
        let game = Game::load(MemoryStore::new().with("activePlayer", "G"));
        assert_eq!(game.active_label(), Label::G);
    }

    #[test]
    fn draws_persist_and_exhaust_one_label_only() {
        let mut game = Game::load(MemoryStore::new());
        for _ in 0..TOTAL {
            game.draw(Label::Ae, 1, noon());
        }
        assert!(game.is_exhausted(Label::Ae));
        assert!(!game.is_exhausted(Label::D));
        assert!(!game.is_exhausted(Label::G));

        assert_eq!(game.draw(Label::Ae, 1, noon()), DrawOutcome::Exhausted);
        let last = game.state().log.newest_first().next().unwrap();
        assert_eq!(last.value, None);
        assert_eq!(game.state().log.len(), TOTAL as usize + 1);

        assert!(matches!(
            game.draw(Label::D, 1, noon()),
            DrawOutcome::Drawn { value: 1, .. }
        ));

        let reloaded = Game::load(game.store().clone());
        assert!(reloaded.is_exhausted(Label::Ae));
        assert_eq!(reloaded.remaining(Label::D), 25);
        assert_eq!(reloaded.state().log.len(), TOTAL as usize + 2);
        assert_eq!(
            reloaded.status_text(),
            "Numbers left \u{2014} D: 25, \u{00C4}: 0, G: 26"
        );
    }

    #[test]
    fn region_toggle_uses_active_label_and_persists() {
        let mut game = Game::load(MemoryStore::new());
        let zh = game.rules().normalize("ZH").unwrap();

        assert_eq!(game.toggle_region(&zh), Some(Label::D));
        game.set_active_label(Label::G);
        assert_eq!(game.toggle_region(&zh), Some(Label::G));
        assert_eq!(game.store().load("mapState").as_deref(), Some(r#"{"ZH":"G"}"#));
        assert_eq!(game.store().load("activePlayer").as_deref(), Some("\"G\""));
        assert_eq!(game.toggle_region(&zh), None);
        assert_eq!(game.store().load("mapState").as_deref(), Some("{}"));
    }

    #[test]
    fn theme_flag_drives_unowned_paint() {
        let mut game = Game::load(MemoryStore::new());
        let be = game.rules().normalize("BE").unwrap();
        let light = game.region_paint(&be);
        game.set_dark(true);
        assert_ne!(game.region_paint(&be), light);
        assert_eq!(game.store().load("dark").as_deref(), Some("1"));
    }

    #[test]
    fn reset_clears_pools_log_and_map() {
        let store = MemoryStore::new()
            .with("usedSets", r#"{"D":[1,5,9],"Ä":[2],"G":[]}"#)
            .with(
                "logEntries",
                r#"[{"t":"10:00:00","p":"D","n":1},{"t":"10:00:01","p":"D","n":5},
                    {"t":"10:00:02","p":"D","n":9},{"t":"10:00:03","p":"Ä","n":2}]"#,
            )
            .with("mapState", r#"{"ZH":"D"}"#)
            .with("dark", "1");
        let mut game = Game::load(store);
        assert_eq!(game.state().log.len(), 4);
        assert_eq!(game.remaining(Label::D), 23);

        game.reset();

        for label in Label::ALL {
            assert_eq!(game.remaining(label), TOTAL as usize);
            assert!(!game.is_exhausted(label));
        }
        assert!(game.state().log.is_empty());
        assert!(game.state().assignments.is_empty());
        assert!(game.dark());
        assert_eq!(
            game.store().load("usedSets").as_deref(),
            Some(r#"{"D":[],"Ä":[],"G":[]}"#)
        );
        assert_eq!(game.store().load("logEntries").as_deref(), Some("[]"));
        assert_eq!(game.store().load("mapState").as_deref(), Some("{}"));
    }
}
