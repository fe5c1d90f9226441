//! Input: raw wheel and touch deltas reduced to a binary scroll direction.
//!
//! # Invariants
//! - Consumers only ever see `ScrollDirection`, never raw device events.
//! - Bursts of events inside the debounce window collapse to the last one.

pub mod action;
mod debounce;

pub use action::{ScrollDirection, WheelDelta};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};
