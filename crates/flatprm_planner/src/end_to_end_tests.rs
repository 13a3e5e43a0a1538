//! End-to-end planning scenarios exercised only through the crate's public
//! `solve` entry point.

use flatprm_capability::{PrmStar, Robot};
use flatprm_fixtures::{HaltonRng, PlanarArm, SphereWorld};
use flatprm_geometry::FlatState;
use ndarray::array;
use pretty_assertions::assert_eq;

use crate::{solve, RoadmapSettings};

fn settings(
    max_iterations: usize,
    max_samples: usize,
    dimension: usize,
) -> RoadmapSettings<PrmStar> {
    RoadmapSettings::new(max_iterations, max_samples, PrmStar::new(dimension, 2.0))
}

#[test]
fn direct_solution_in_empty_environment() {
    let arm = PlanarArm::new(2);
    let env = SphereWorld::empty();
    let start = FlatState::new(array![0.0, 0.0, 0.0, 0.0]);
    let goal = FlatState::new(array![0.3, -0.2, 0.0, 0.0]);
    let mut rng = HaltonRng::new();

    let result = solve(
        &arm,
        &env,
        &start,
        &[goal.clone()],
        &settings(1000, 200, arm.flatstate_dimension()),
        &mut rng,
    );

    assert_eq!(result.iterations, 0);
    assert_eq!(result.path.len(), 2);
    assert_eq!(result.path[0], start);
    assert_eq!(result.path[1], goal);
    assert!(result.cost > 0.0);
}

#[test]
fn no_solution_when_goal_is_enclosed() {
    let arm = PlanarArm::new(2);
    let env = SphereWorld::empty().push((0.0, 0.0), 10.0);
    let start = FlatState::new(array![0.0, 0.0, 0.0, 0.0]);
    let goal = FlatState::new(array![0.5, -0.5, 0.0, 0.0]);
    let mut rng = HaltonRng::new();
    let max_iterations = 50;
    let max_samples = 50;

    let result = solve(
        &arm,
        &env,
        &start,
        &[goal],
        &settings(max_iterations, max_samples, arm.flatstate_dimension()),
        &mut rng,
    );

    assert!(result.path.is_empty());
    assert_eq!(result.cost, f64::INFINITY);
    assert!(result.iterations == max_iterations || result.roadmap_size == max_samples);
}

#[test]
fn max_samples_of_two_with_direct_motion_takes_zero_iterations() {
    let arm = PlanarArm::new(1);
    let env = SphereWorld::empty();
    let start = FlatState::new(array![0.0, 0.0]);
    let goal = FlatState::new(array![0.1, 0.0]);
    let mut rng = HaltonRng::new();

    let result = solve(
        &arm,
        &env,
        &start,
        &[goal],
        &settings(100, 2, arm.flatstate_dimension()),
        &mut rng,
    );

    assert_eq!(result.iterations, 0);
    assert_eq!(result.path.len(), 2);
}

#[test]
fn zero_max_iterations_with_no_direct_solution_returns_empty() {
    let arm = PlanarArm::new(2);
    let env = SphereWorld::empty().push((0.0, 0.0), 10.0);
    let start = FlatState::new(array![0.0, 0.0, 0.0, 0.0]);
    let goal = FlatState::new(array![0.5, -0.5, 0.0, 0.0]);
    let mut rng = HaltonRng::new();

    let result = solve(
        &arm,
        &env,
        &start,
        &[goal],
        &settings(0, 50, arm.flatstate_dimension()),
        &mut rng,
    );

    assert!(result.path.is_empty());
    assert_eq!(result.cost, f64::INFINITY);
    assert_eq!(result.iterations, 0);
}

#[test]
fn consecutive_path_states_are_connected_and_endpoints_match() {
    let arm = PlanarArm::new(2);
    let env = SphereWorld::empty();
    let start = FlatState::new(array![0.0, 0.0, 0.0, 0.0]);
    let goal = FlatState::new(array![2.5, -1.8, 0.0, 0.0]);
    let mut rng = HaltonRng::new();

    let result = solve(
        &arm,
        &env,
        &start,
        &[goal.clone()],
        &settings(5000, 300, arm.flatstate_dimension()),
        &mut rng,
    );

    assert!(
        !result.path.is_empty(),
        "expected a path in an empty environment"
    );
    assert_eq!(result.path[0], start);
    assert_eq!(result.path.last(), Some(&goal));
    for window in result.path.windows(2) {
        let trajectory =
            flatprm_geometry::steer(&window[0], &window[1], 1.5, arm.flat_dimension())
                .expect("path edges were validated at a positive horizon during growth");
        assert!(flatprm_validate::validate_motion(
            &arm,
            &env,
            &trajectory,
            1.5,
            arm.resolution()
        ));
    }
}

#[test]
fn identical_invocations_are_deterministic() {
    let arm = PlanarArm::new(2);
    let env = SphereWorld::empty().push((1.0, 1.0), 0.2);
    let start = FlatState::new(array![0.0, 0.0, 0.0, 0.0]);
    let goal = FlatState::new(array![2.0, 2.0, 0.0, 0.0]);

    let run = || {
        let mut rng = HaltonRng::new();
        solve(
            &arm,
            &env,
            &start,
            &[goal.clone()],
            &settings(3000, 300, arm.flatstate_dimension()),
            &mut rng,
        )
    };

    let first = run();
    let second = run();
    assert_eq!(first.path, second.path);
    assert_eq!(first.cost, second.cost);
}
