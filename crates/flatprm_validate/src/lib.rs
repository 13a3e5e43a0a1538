//! Rake-parallel motion validator.
//!
//! Samples a trajectory at `rake · n` time points, grouped into `rake`-wide
//! batches, and rejects the motion at the first batch that collides. Pure:
//! no I/O, no mutation of its arguments, safe to call concurrently on
//! disjoint arguments.

use flatprm_capability::Robot;
use flatprm_linalg::{Float, Polynomial, RakeBlock, RAKE};

/// Is `trajectory`, evaluated over `t ∈ [0, horizon]` at `resolution`
/// samples per unit time, collision-free against `env`?
///
/// # Panics
/// Panics if `horizon <= 0.0` — the validator is only ever called with a
/// horizon that has already passed through `flatprm_geometry::steer`, which
/// rejects non-positive horizons itself.
#[tracing::instrument(level = "debug", skip(robot, env, trajectory))]
pub fn validate_motion<R: Robot>(
    robot: &R,
    env: &R::Env,
    trajectory: &Polynomial,
    horizon: Float,
    resolution: Float,
) -> bool {
    assert!(horizon > 0.0, "motion validator requires a positive horizon");

    let n = ((horizon * resolution / RAKE as Float).ceil() as usize).max(1);

    let percents: [Float; RAKE] = std::array::from_fn(|k| (k + 1) as Float / RAKE as Float);
    let base_times: [Float; RAKE] = percents.map(|p| horizon * p);

    let eval_block = |times: [Float; RAKE]| -> RakeBlock {
        (0..robot.flat_dimension())
            .map(|j| trajectory.eval_rake(j, times))
            .collect()
    };

    let block = eval_block(base_times);
    if !robot.fkcc_dispatch(env, &block) {
        return false;
    }
    if n == 1 {
        return true;
    }

    let delta = horizon / (RAKE as Float * n as Float);
    for i in 1..n {
        #[allow(clippy::cast_precision_loss)]
        let shift = i as Float * delta;
        let times: [Float; RAKE] = std::array::from_fn(|k| base_times[k] - shift);
        let block = eval_block(times);
        if !robot.fkcc_dispatch(env, &block) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use flatprm_fixtures::{PlanarArm, SphereWorld};
    use flatprm_geometry::{steer, FlatState};
    use ndarray::array;

    use super::*;

    #[test]
    fn empty_environment_is_always_valid() {
        let arm = PlanarArm::new(2);
        let env = SphereWorld::empty();
        let start = FlatState::new(array![0.0, 0.0, 0.0, 0.0]);
        let goal = FlatState::new(array![1.0, -1.0, 0.0, 0.0]);
        let trajectory = steer(&start, &goal, 1.5, 2).unwrap();
        assert!(validate_motion(&arm, &env, &trajectory, 1.5, arm.resolution()));
    }

    #[test]
    fn obstacle_at_trajectory_midpoint_is_rejected() {
        // T = 1.5 steering through an obstacle intersecting the midpoint at
        // t = 0.75.
        let arm = PlanarArm::new(1);
        let start = FlatState::new(array![0.0, 0.0]);
        let goal = FlatState::new(array![std::f64::consts::PI, 0.0]);
        let trajectory = steer(&start, &goal, 1.5, 1).unwrap();
        let midpoint_angle = trajectory.eval(0.75)[0];
        let obstacle_point = (midpoint_angle.cos() as f32, midpoint_angle.sin() as f32);
        let env = SphereWorld::empty().push(obstacle_point, 0.3);
        assert!(!validate_motion(&arm, &env, &trajectory, 1.5, arm.resolution()));
    }

    #[test]
    fn large_enclosing_sphere_rejects_every_trajectory() {
        let arm = PlanarArm::new(2);
        let env = SphereWorld::empty().push((0.0, 0.0), 10.0);
        let start = FlatState::new(array![0.0, 0.0, 0.0, 0.0]);
        let goal = FlatState::new(array![0.5, -0.5, 0.0, 0.0]);
        let trajectory = steer(&start, &goal, 1.5, 2).unwrap();
        assert!(!validate_motion(&arm, &env, &trajectory, 1.5, arm.resolution()));
    }

    #[test]
    fn single_batch_short_horizon_still_samples_full_rake() {
        let arm = PlanarArm::new(1);
        let env = SphereWorld::empty();
        let start = FlatState::new(array![0.0, 0.0]);
        let goal = FlatState::new(array![0.1, 0.0]);
        let trajectory = steer(&start, &goal, 0.01, 1).unwrap();
        assert!(validate_motion(&arm, &env, &trajectory, 0.01, 1.0));
    }
}
