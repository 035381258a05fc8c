// Session state and its persistence
//
// The session (counts plus the chronological event log) is the unit of
// persistence: it is serialized as a whole after every mutation and
// deserialized as a whole at startup.

pub mod migration;
pub mod store;
pub mod types;

pub use store::{
    FileStore, LoadOutcome, MemoryStore, StateStore, StoreError, load_state,
    load_state_with_outcome, persist_state,
};
pub use types::{Category, Counts, SessionState, TallyEvent};
