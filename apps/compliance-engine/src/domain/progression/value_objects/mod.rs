//! Progression value objects.

mod phase_progress;

pub use phase_progress::{ConsistencyCheck, PhaseProgress};
