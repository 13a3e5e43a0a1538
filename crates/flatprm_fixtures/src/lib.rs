//! Reference `Robot`/`Environment`/`Rng` implementations, used only by the
//! workspace's tests and doctests. Nothing here is part of the planner's
//! public API surface — `flatprm_planner` stays generic over
//! `flatprm_capability`'s traits.

pub mod halton;
pub mod planar_arm;
pub mod sphere_world;

pub use halton::HaltonRng;
pub use planar_arm::PlanarArm;
pub use sphere_world::SphereWorld;
