// Render model for the tally window

use crate::session::types::{Category, SessionState};

/// Everything the window displays, computed from the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyView {
    /// `(category, count)` in button order
    pub counts: [(Category, u64); 4],
    pub total: u64,
    pub folded: u64,
    pub unfolded: u64,
    pub undo_enabled: bool,
}

impl TallyView {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            counts: Category::ALL.map(|c| (c, state.counts.get(c))),
            total: state.counts.total(),
            folded: state.counts.folded(),
            unfolded: state.counts.unfolded(),
            undo_enabled: !state.log.is_empty(),
        }
    }
}
