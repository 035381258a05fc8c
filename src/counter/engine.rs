// CounterEngine - record, undo and reset over the persisted session

use crate::counter::clock::{Clock, SystemClock};
use crate::counter::confirm::{Confirm, RESET_PROMPT};
use crate::session::store::{
    LoadOutcome, StateStore, StoreError, load_state_with_outcome, persist_state,
};
use crate::session::types::{Category, Counts, SessionState, TallyEvent};
use tracing::{debug, info, warn};

/// Owns the session state and keeps its store in sync
///
/// Each operation mutates the in-memory state first and then persists the whole
/// session. A failed write is returned to the caller but the in-memory change
/// stands, so the next successful write catches the store up.
pub struct CounterEngine<S: StateStore, C: Clock = SystemClock> {
    state: SessionState,
    store: S,
    clock: C,
    load_outcome: LoadOutcome,
}

impl<S: StateStore> CounterEngine<S, SystemClock> {
    /// Load the stored session (or start empty) using the wall clock
    pub fn open(store: S) -> Self {
        Self::open_with_clock(store, SystemClock)
    }
}

impl<S: StateStore, C: Clock> CounterEngine<S, C> {
    pub fn open_with_clock(store: S, clock: C) -> Self {
        let (state, load_outcome) = load_state_with_outcome(&store);
        Self {
            state,
            store,
            clock,
            load_outcome,
        }
    }

    /// Record one observation of `category`
    pub fn record_event(&mut self, category: Category) -> Result<(), StoreError> {
        let event = TallyEvent::new(self.clock.now_millis(), category);
        self.state.counts.increment(category);
        self.state.log.push(event);
        debug!(
            "Recorded {} (count {}, total {})",
            category,
            self.state.counts.get(category),
            self.total_count()
        );
        self.persist()
    }

    /// Remove the most recent event and decrement its category.
    ///
    /// Returns the removed event, or `None` (without touching the store) when
    /// the log is empty.
    pub fn undo_last(&mut self) -> Result<Option<TallyEvent>, StoreError> {
        let Some(event) = self.state.log.pop() else {
            debug!("Undo ignored: event log is empty");
            return Ok(None);
        };

        if !self.state.counts.decrement(event.category) {
            warn!(
                "Count for {} was already zero while undoing; counts and log disagree",
                event.category
            );
        }
        debug!("Undid {} recorded at {}", event.category, event.timestamp);

        self.persist()?;
        Ok(Some(event))
    }

    /// Clear all counts and the log once the operator confirms.
    ///
    /// Returns whether the reset happened. A declined prompt leaves the state
    /// and the store untouched.
    pub fn reset_all(&mut self, confirm: &mut dyn Confirm) -> Result<bool, StoreError> {
        if !confirm.confirm(RESET_PROMPT) {
            debug!("Reset declined");
            return Ok(false);
        }

        self.state = SessionState::default();
        info!("Session reset");
        self.persist()?;
        Ok(true)
    }

    pub fn total_count(&self) -> u64 {
        self.state.counts.total()
    }

    pub fn folded_count(&self) -> u64 {
        self.state.counts.folded()
    }

    pub fn unfolded_count(&self) -> u64 {
        self.state.counts.unfolded()
    }

    pub fn count(&self, category: Category) -> u64 {
        self.state.counts.get(category)
    }

    pub fn counts(&self) -> &Counts {
        &self.state.counts
    }

    pub fn log(&self) -> &[TallyEvent] {
        &self.state.log
    }

    /// Undo is available whenever the log is non-empty
    pub fn can_undo(&self) -> bool {
        !self.state.log.is_empty()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// What happened to the stored snapshot when the engine was opened
    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        persist_state(&mut self.store, &self.state).inspect_err(|e| {
            tracing::error!("Failed to persist session: {}", e);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::{MemoryStore, load_state};
    use std::cell::Cell;

    fn test_engine() -> CounterEngine<MemoryStore, impl Fn() -> i64> {
        let tick = Cell::new(1_700_000_000_000i64);
        let clock = move || {
            let now = tick.get();
            tick.set(now + 250);
            now
        };
        CounterEngine::open_with_clock(MemoryStore::new(), clock)
    }

    /// Store whose writes always fail
    struct BrokenStore;

    impl StateStore for BrokenStore {
        fn read(&self) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn write(&mut self, _snapshot: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_record_event() {
        let mut engine = test_engine();
        engine.record_event(Category::FoldedRight).unwrap();
        engine.record_event(Category::FoldedRight).unwrap();
        engine.record_event(Category::UnfoldedLeft).unwrap();

        assert_eq!(engine.count(Category::FoldedRight), 2);
        assert_eq!(engine.count(Category::FoldedLeft), 0);
        assert_eq!(engine.count(Category::UnfoldedRight), 0);
        assert_eq!(engine.count(Category::UnfoldedLeft), 1);
        assert_eq!(engine.total_count(), 3);
        assert_eq!(engine.folded_count(), 2);
        assert_eq!(engine.unfolded_count(), 1);

        let timestamps: Vec<i64> = engine.log().iter().map(|e| e.timestamp).collect();
        assert_eq!(
            timestamps,
            vec![1_700_000_000_000, 1_700_000_000_250, 1_700_000_000_500]
        );
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut engine = test_engine();
        engine.record_event(Category::FoldedLeft).unwrap();

        let snapshot = engine.store().snapshot().unwrap();
        assert!(snapshot.contains("folded-left"));
        assert_eq!(load_state(engine.store()), *engine.state());
    }

    #[test]
    fn test_undo_last() {
        let mut engine = test_engine();
        engine.record_event(Category::FoldedRight).unwrap();
        engine.record_event(Category::FoldedRight).unwrap();
        engine.record_event(Category::UnfoldedLeft).unwrap();

        let undone = engine.undo_last().unwrap().unwrap();
        assert_eq!(undone.category, Category::UnfoldedLeft);
        assert_eq!(engine.count(Category::FoldedRight), 2);
        assert_eq!(engine.count(Category::UnfoldedLeft), 0);
        assert_eq!(engine.log().len(), 2);
        assert_eq!(load_state(engine.store()), *engine.state());
    }

    #[test]
    fn test_undo_on_empty_log_is_noop() {
        let mut engine = test_engine();
        assert!(!engine.can_undo());
        assert_eq!(engine.undo_last().unwrap(), None);
        assert_eq!(*engine.state(), SessionState::default());
        // Nothing was written
        assert!(engine.store().snapshot().is_none());
    }

    #[test]
    fn test_undo_clamps_desynchronized_counts() {
        let tampered = r#"{
            "counts": {"folded-right": 0, "folded-left": 0, "unfolded-right": 0, "unfolded-left": 0},
            "log": [{"timestamp": 5, "category": "folded-right"}]
        }"#;
        let mut engine = CounterEngine::open(MemoryStore::with_snapshot(tampered));

        let undone = engine.undo_last().unwrap();
        assert!(undone.is_some());
        assert_eq!(engine.count(Category::FoldedRight), 0);
        assert!(engine.log().is_empty());
    }

    #[test]
    fn test_overflowing_snapshot_is_discarded() {
        let tampered = r#"{
            "counts": {"folded-right": 18446744073709551615, "folded-left": 1, "unfolded-right": 0, "unfolded-left": 0},
            "log": []
        }"#;
        let mut engine = CounterEngine::open(MemoryStore::with_snapshot(tampered));

        assert_eq!(engine.load_outcome(), LoadOutcome::Discarded);
        assert_eq!(*engine.state(), SessionState::default());
        assert_eq!(engine.total_count(), 0);

        engine.record_event(Category::FoldedLeft).unwrap();
        assert_eq!(engine.total_count(), 1);
    }

    #[test]
    fn test_reset_confirmed() {
        let mut engine = test_engine();
        engine.record_event(Category::UnfoldedRight).unwrap();

        let mut prompts = Vec::new();
        let mut confirm = |prompt: &str| {
            prompts.push(prompt.to_string());
            true
        };
        assert!(engine.reset_all(&mut confirm).unwrap());

        assert_eq!(prompts, vec![RESET_PROMPT.to_string()]);
        assert_eq!(*engine.state(), SessionState::default());
        assert_eq!(load_state(engine.store()), SessionState::default());
    }

    #[test]
    fn test_reset_declined() {
        let mut engine = test_engine();
        engine.record_event(Category::UnfoldedRight).unwrap();
        let before_state = engine.state().clone();
        let before_snapshot = engine.store().snapshot();

        let mut decline = |_: &str| false;
        assert!(!engine.reset_all(&mut decline).unwrap());

        assert_eq!(*engine.state(), before_state);
        assert_eq!(engine.store().snapshot(), before_snapshot);
    }

    #[test]
    fn test_failed_persist_keeps_in_memory_change() {
        let mut engine = CounterEngine::open(BrokenStore);
        let result = engine.record_event(Category::FoldedLeft);

        assert!(matches!(result, Err(StoreError::Io(_))));
        assert_eq!(engine.count(Category::FoldedLeft), 1);
        assert!(engine.can_undo());
    }
}
