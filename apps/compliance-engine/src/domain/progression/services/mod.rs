//! Progression services.

mod progression_evaluator;

pub use progression_evaluator::ProgressionEvaluator;
