//! The `Robot`, `Environment`, and `Rng` capabilities.

use flatprm_geometry::FlatState;
use flatprm_linalg::{Float, RakeBlock, Vector};

/// An opaque collision scene. Spatial queries are invoked transitively
/// through `Robot::fkcc`/`fkcc_attach` — this trait itself only exposes
/// whether the scene carries attachments, which changes which predicate the
/// validator and growth loop must call.
pub trait Environment {
    /// Whether this environment carries attached bodies, in which case
    /// `Robot::fkcc_attach` must be used instead of `Robot::fkcc`.
    fn attachments(&self) -> bool;
}

/// Deterministic quasi-random sampler yielding flat-state samples in
/// canonical `[0, 1]^N`, `N = flatstate_dimension`. Determinism here is what
/// makes the whole plan reproducible.
pub trait Rng {
    fn next(&mut self, flatstate_dimension: usize) -> Vector<Float>;
}

/// Robot kinematics and collision-checking capability, monomorphized at the
/// planner's call sites so the forward-kinematics-plus-collision hot path
/// can be inlined.
pub trait Robot {
    type Env: Environment;

    /// Number of joint/actuator coordinates.
    fn dimension(&self) -> usize;
    /// Dimension of the flat output (for this workspace's manipulators,
    /// equal to `dimension()`).
    fn flat_dimension(&self) -> usize;
    /// Number of derivative orders making up a flat state.
    fn flat_order(&self) -> usize;
    /// `flat_dimension() * flat_order()`.
    fn flatstate_dimension(&self) -> usize {
        self.flat_dimension() * self.flat_order()
    }
    /// Default sampling density (`resolution`) per unit time, used by the
    /// validator when the call site does not override it.
    fn resolution(&self) -> Float;

    /// Rescale a canonical `[0, 1]^{flat_dimension}` sample in place into
    /// this robot's joint-configuration bounds.
    fn scale_configuration(&self, configuration: &mut Vector<Float>);

    /// Rescale a canonical `[0, 1]^{flatstate_dimension}` sample in place
    /// into this robot's joint/velocity bounds.
    fn scale_flatstate(&self, state: &mut FlatState);

    /// Split a packed flat state into one vector per derivative order.
    fn flatstate_to_vecarray(&self, state: &FlatState) -> Vec<Vector<Float>> {
        (0..self.flat_order())
            .map(|order| state.segment(self.flat_dimension(), order))
            .collect()
    }

    /// Rake-wide collision predicate with no attachments: `true` iff none of
    /// the `rake` configurations in `block` collides with `env`.
    fn fkcc(&self, env: &Self::Env, block: &RakeBlock) -> bool;

    /// Same as [`Robot::fkcc`], accounting for attached bodies.
    fn fkcc_attach(&self, env: &Self::Env, block: &RakeBlock) -> bool;

    /// Dispatch to [`Robot::fkcc`] or [`Robot::fkcc_attach`] depending on
    /// whether `env` carries attachments.
    fn fkcc_dispatch(&self, env: &Self::Env, block: &RakeBlock) -> bool {
        if env.attachments() {
            self.fkcc_attach(env, block)
        } else {
            self.fkcc(env, block)
        }
    }
}
