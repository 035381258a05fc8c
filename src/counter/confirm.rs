// Confirmation collaborator for destructive operations

/// Prompt shown before clearing all counts and history
pub const RESET_PROMPT: &str = "Reset all data, including the event history?";

/// Synchronous yes/no confirmation
///
/// Implementations block until the operator answers. The native window uses a
/// modal message box; tests pass closures.
///
/// # Example
/// ```
/// use voting_tally::counter::Confirm;
///
/// let mut always_yes = |_prompt: &str| true;
/// assert!(always_yes.confirm("Reset?"));
/// ```
pub trait Confirm {
    /// Ask the operator; `true` means accepted
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}
