// Types for the tally session: categories, counts and the event log

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four observation classes being tallied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    FoldedRight,
    FoldedLeft,
    UnfoldedRight,
    UnfoldedLeft,
}

impl Category {
    /// All categories, in summary row order
    pub const ALL: [Category; 4] = [
        Category::FoldedRight,
        Category::FoldedLeft,
        Category::UnfoldedRight,
        Category::UnfoldedLeft,
    ];

    /// Wire identifier, as stored in snapshots and exported logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FoldedRight => "folded-right",
            Category::FoldedLeft => "folded-left",
            Category::UnfoldedRight => "unfolded-right",
            Category::UnfoldedLeft => "unfolded-left",
        }
    }

    /// Label used in the exported summary block
    pub fn label(&self) -> &'static str {
        match self {
            Category::FoldedRight => "折って・右手",
            Category::FoldedLeft => "折って・左手",
            Category::UnfoldedRight => "折らずに・右手",
            Category::UnfoldedLeft => "折らずに・左手",
        }
    }

    /// Label shown on the counter buttons
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::FoldedRight => "Folded · Right",
            Category::FoldedLeft => "Folded · Left",
            Category::UnfoldedRight => "Unfolded · Right",
            Category::UnfoldedLeft => "Unfolded · Left",
        }
    }

    pub fn is_folded(&self) -> bool {
        matches!(self, Category::FoldedRight | Category::FoldedLeft)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Category::FoldedRight => 0,
            Category::FoldedLeft => 1,
            Category::UnfoldedRight => 2,
            Category::UnfoldedLeft => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category counts. Every category is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    #[serde(rename = "folded-right")]
    pub folded_right: u64,
    #[serde(rename = "folded-left")]
    pub folded_left: u64,
    #[serde(rename = "unfolded-right")]
    pub unfolded_right: u64,
    #[serde(rename = "unfolded-left")]
    pub unfolded_left: u64,
}

impl Counts {
    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::FoldedRight => self.folded_right,
            Category::FoldedLeft => self.folded_left,
            Category::UnfoldedRight => self.unfolded_right,
            Category::UnfoldedLeft => self.unfolded_left,
        }
    }

    fn slot_mut(&mut self, category: Category) -> &mut u64 {
        match category {
            Category::FoldedRight => &mut self.folded_right,
            Category::FoldedLeft => &mut self.folded_left,
            Category::UnfoldedRight => &mut self.unfolded_right,
            Category::UnfoldedLeft => &mut self.unfolded_left,
        }
    }

    pub fn increment(&mut self, category: Category) {
        let slot = self.slot_mut(category);
        *slot = slot.saturating_add(1);
    }

    /// Decrement a category, clamped at zero.
    ///
    /// Returns false when the count was already zero, which only happens when
    /// the counts and the log have drifted apart (e.g. a hand-edited snapshot).
    pub fn decrement(&mut self, category: Category) -> bool {
        let slot = self.slot_mut(category);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Iterate over `(category, count)` in summary row order
    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn total(&self) -> u64 {
        self.iter().map(|(_, n)| n).fold(0, u64::saturating_add)
    }

    /// Exact total, `None` if the counts do not fit in a `u64`
    pub fn checked_total(&self) -> Option<u64> {
        self.iter().try_fold(0u64, |acc, (_, n)| acc.checked_add(n))
    }

    pub fn folded(&self) -> u64 {
        self.iter()
            .filter(|(c, _)| c.is_folded())
            .map(|(_, n)| n)
            .fold(0, u64::saturating_add)
    }

    pub fn unfolded(&self) -> u64 {
        self.iter()
            .filter(|(c, _)| !c.is_folded())
            .map(|(_, n)| n)
            .fold(0, u64::saturating_add)
    }
}

/// One recorded increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEvent {
    /// Milliseconds since the Unix epoch
    #[serde(alias = "t")]
    pub timestamp: i64,
    #[serde(alias = "type")]
    pub category: Category,
}

impl TallyEvent {
    pub fn new(timestamp: i64, category: Category) -> Self {
        Self {
            timestamp,
            category,
        }
    }
}

/// The persisted unit: counts plus the chronological event log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(alias = "summary")]
    pub counts: Counts,
    #[serde(alias = "logs")]
    pub log: Vec<TallyEvent>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}
