//! Account lifecycle domain services.

mod account_status_machine;
mod phase_state_machine;

pub use account_status_machine::AccountStatusMachine;
pub use phase_state_machine::PhaseStateMachine;
