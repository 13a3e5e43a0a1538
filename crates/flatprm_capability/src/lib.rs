//! External collaborator interfaces: `Robot`, `Environment`, `Rng`,
//! `NeighborParams`. The planner core never implements these itself —
//! `flatprm_fixtures` supplies reference implementations used only by tests.

pub mod neighbor_params;
pub mod robot;

pub use neighbor_params::{NeighborParams, PrmStar};
pub use robot::{Environment, Rng, Robot};
