// Counter engine: pure state transitions over the tally session
//
// Architecture:
// - CounterEngine: owns the SessionState, its StateStore and a Clock
// - Confirm: synchronous yes/no collaborator gating reset
// - Clock: source of event timestamps
//
// Every mutation persists the full session before returning. The engine has
// no UI dependency; the egui layer only reads it and calls its operations.

pub mod clock;
pub mod confirm;
pub mod engine;

pub use clock::{Clock, SystemClock};
pub use confirm::{Confirm, RESET_PROMPT};
pub use engine::CounterEngine;
