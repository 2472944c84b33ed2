//! Progression Bounded Context
//!
//! Decides whether a phase has met its objectives and which phase follows.

pub mod services;
pub mod value_objects;

pub use services::ProgressionEvaluator;
pub use value_objects::{ConsistencyCheck, PhaseProgress};
