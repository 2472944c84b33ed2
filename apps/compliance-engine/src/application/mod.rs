//! Application Layer
//!
//! Orchestrates domain services into the operations callers invoke.
//!
//! - **DTOs**: untrusted boundary input, sanitized into domain values
//! - **Use Cases**: trade processing and account reporting

pub mod dto;
pub mod use_cases;

pub use dto::*;
pub use use_cases::*;
