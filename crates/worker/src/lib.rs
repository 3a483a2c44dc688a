//! Worker primitives shared by the spell engine.
//!
//! Every background task the engine starts (debounce sleeps, rescans) goes
//! through [`spawn`] so it is classified for tracing and lands on the active
//! Tokio runtime. [`GenerationToken`] pairs a monotonically increasing
//! generation with a cancellation token, which is how a superseded task is
//! both told to stop early and recognised as stale when it reports back.

mod class;
mod spawn;
mod token;

pub use class::TaskClass;
pub use spawn::spawn;
pub use token::{GenerationClock, GenerationToken};
