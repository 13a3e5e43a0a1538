//! Flat-state types and the boundary-value steering function.

pub mod flat_state;
pub mod steering;

pub use flat_state::FlatState;
pub use steering::{steer, SteeringError};
