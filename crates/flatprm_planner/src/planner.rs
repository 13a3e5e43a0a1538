//! The flat PRM growth loop and its two entry points, `solve` and
//! `build_roadmap`.

use std::time::Instant;

use flatprm_capability::{NeighborParams, Rng, Robot};
use flatprm_geometry::{steer, FlatState};
use flatprm_linalg::{broadcast_rake, Float};
use flatprm_nn::{CoordinateSource, KdTree};

use crate::astar;
use crate::roadmap::Roadmap;
use crate::settings::{PlanningResult, RoadmapSettings};
use crate::union_find::UnionFind;

/// The raw roadmap graph produced by [`build_roadmap`]: vertices plus
/// adjacency lists, with no A* extraction or goal short-circuiting.
#[derive(Debug, Clone)]
pub struct RoadmapGraph {
    pub vertices: Vec<FlatState>,
    pub adjacency: Vec<Vec<(usize, Float)>>,
}

/// Internal state threaded through the growth loop, shared by `solve` and
/// `build_roadmap`.
struct Growth {
    roadmap: Roadmap,
    nn: KdTree,
    union_find: UnionFind,
    iterations: usize,
}

impl Growth {
    fn new(capacity: usize, flatstate_dimension: usize) -> Self {
        Self {
            roadmap: Roadmap::with_capacity(capacity),
            nn: KdTree::new(flatstate_dimension),
            union_find: UnionFind::new(),
            iterations: 0,
        }
    }

    /// Seeds `start` at index 0 and every goal at `[1, 1 + goals.len())`,
    /// each in its own singleton component, all inserted into the NN
    /// index.
    fn seed(&mut self, start: &FlatState, goals: &[FlatState]) {
        let start_component = self.union_find.push_singleton();
        let start_index = self.roadmap.push(start.clone(), start_component);
        self.nn.insert(start_index, &self.roadmap);

        for goal in goals {
            let component = self.union_find.push_singleton();
            let index = self.roadmap.push(goal.clone(), component);
            self.nn.insert(index, &self.roadmap);
        }
    }

    /// One growth-loop iteration: sample, reject on collision, connect to
    /// nearby roadmap nodes, update connectivity. Returns the new node's
    /// index, or `None` if the sample was rejected by the static collision
    /// check.
    #[allow(clippy::too_many_arguments)]
    fn step<R, NP, RNG>(
        &mut self,
        robot: &R,
        env: &R::Env,
        settings: &RoadmapSettings<NP>,
        rng: &mut RNG,
    ) -> Option<usize>
    where
        R: Robot,
        NP: NeighborParams,
        RNG: Rng,
    {
        let mut sample = FlatState::new(rng.next(robot.flatstate_dimension()));
        robot.scale_flatstate(&mut sample);

        let configuration = sample.segment(robot.flat_dimension(), 0);
        if !robot.fkcc(env, &broadcast_rake(&configuration)) {
            return None;
        }

        let u = self.roadmap.push(sample, 0);

        let n = self.nn.size();
        let k = settings.neighbor_params.max_neighbors(n);
        let r = settings.neighbor_params.neighbor_radius(n);
        let mut candidates = Vec::new();
        let query = self.roadmap.coordinates(u).to_vec();
        self.nn.nearest(&mut candidates, &query, k, r, &self.roadmap);

        for &(v, _distance) in &candidates {
            let trajectory = steer(
                self.roadmap.state(v),
                self.roadmap.state(u),
                settings.horizon,
                robot.flat_dimension(),
            )
            .expect("growth-loop horizon is always positive");
            let valid = flatprm_validate::validate_motion(
                robot,
                env,
                &trajectory,
                settings.horizon,
                robot.resolution(),
            );
            if valid {
                let cost = self.roadmap.state(u).distance(self.roadmap.state(v));
                self.roadmap.connect(u, v, cost);
            }
        }

        self.nn.insert(u, &self.roadmap);

        if let Some(&(first_neighbor, _)) = self.roadmap.nodes[u].neighbors.first() {
            let first_component = self.roadmap.nodes[first_neighbor].component;
            self.roadmap.nodes[u].component = first_component;
            let neighbor_indices: Vec<usize> = self.roadmap.nodes[u]
                .neighbors
                .iter()
                .map(|&(v, _)| v)
                .collect();
            for neighbor in neighbor_indices {
                let neighbor_component = self.roadmap.nodes[neighbor].component;
                self.union_find.merge(first_component, neighbor_component);
            }
        } else {
            self.roadmap.nodes[u].component = self.union_find.push_singleton();
        }

        Some(u)
    }
}

/// Find a path from `start` to one of `goals`, growing a roadmap with
/// `settings` as needed.
#[tracing::instrument(level = "info", skip(robot, env, settings, rng))]
pub fn solve<R, NP, RNG>(
    robot: &R,
    env: &R::Env,
    start: &FlatState,
    goals: &[FlatState],
    settings: &RoadmapSettings<NP>,
    rng: &mut RNG,
) -> PlanningResult
where
    R: Robot,
    NP: NeighborParams,
    RNG: Rng,
{
    let clock = Instant::now();

    for goal in goals {
        let trajectory = steer(start, goal, settings.horizon, robot.flat_dimension())
            .expect("solve horizon is always positive");
        if flatprm_validate::validate_motion(
            robot,
            env,
            &trajectory,
            settings.horizon,
            robot.resolution(),
        ) {
            return PlanningResult {
                path: vec![start.clone(), goal.clone()],
                cost: start.distance(goal),
                elapsed_nanos: u64::try_from(clock.elapsed().as_nanos()).unwrap_or(u64::MAX),
                iterations: 0,
                roadmap_size: 2,
                reserved: 0,
            };
        }
    }

    let mut growth = Growth::new(settings.max_samples, robot.flatstate_dimension());
    growth.seed(start, goals);

    let goal_range = 1..(1 + goals.len());

    while growth.iterations < settings.max_iterations && growth.roadmap.len() < settings.max_samples
    {
        growth.iterations += 1;
        if growth.step(robot, env, settings, rng).is_none() {
            continue;
        }

        for goal_index in goal_range.clone() {
            if growth.union_find.find_root(growth.roadmap.nodes[0].component)
                == growth.union_find.find_root(growth.roadmap.nodes[goal_index].component)
            {
                let (path_indices, cost) = astar::search(&growth.roadmap, 0, goal_index);
                let path = path_indices
                    .into_iter()
                    .map(|i| growth.roadmap.state(i).clone())
                    .collect();
                return PlanningResult {
                    path,
                    cost,
                    elapsed_nanos: u64::try_from(clock.elapsed().as_nanos()).unwrap_or(u64::MAX),
                    iterations: growth.iterations,
                    roadmap_size: growth.roadmap.len(),
                    reserved: 0,
                };
            }
        }
    }

    PlanningResult::no_path(
        growth.iterations,
        growth.roadmap.len(),
        u64::try_from(clock.elapsed().as_nanos()).unwrap_or(u64::MAX),
    )
}

/// Grow a roadmap without goal short-circuiting or A* extraction, and
/// return the raw graph.
#[tracing::instrument(level = "info", skip(robot, env, settings, rng))]
pub fn build_roadmap<R, NP, RNG>(
    robot: &R,
    env: &R::Env,
    start: &FlatState,
    goals: &[FlatState],
    settings: &RoadmapSettings<NP>,
    rng: &mut RNG,
) -> RoadmapGraph
where
    R: Robot,
    NP: NeighborParams,
    RNG: Rng,
{
    let mut growth = Growth::new(settings.max_samples, robot.flatstate_dimension());
    growth.seed(start, goals);

    while growth.iterations < settings.max_iterations && growth.roadmap.len() < settings.max_samples
    {
        growth.iterations += 1;
        growth.step(robot, env, settings, rng);
    }

    let vertices = (0..growth.roadmap.len())
        .map(|i| growth.roadmap.state(i).clone())
        .collect();
    let adjacency = growth
        .roadmap
        .nodes
        .iter()
        .map(|node| node.neighbors.clone())
        .collect();

    RoadmapGraph {
        vertices,
        adjacency,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use flatprm_capability::PrmStar;
    use flatprm_fixtures::{HaltonRng, PlanarArm, SphereWorld};
    use pretty_assertions::assert_eq;

    use super::*;

    fn default_settings(max_iterations: usize, max_samples: usize, dimension: usize) -> RoadmapSettings<PrmStar> {
        RoadmapSettings::new(max_iterations, max_samples, PrmStar::new(dimension, 2.0))
    }

    #[test]
    fn edges_are_always_symmetric() {
        let arm = PlanarArm::new(2);
        let env = SphereWorld::empty();
        let mut rng = HaltonRng::new();
        let start = FlatState::new(ndarray::Array1::zeros(arm.flatstate_dimension()));
        let settings = default_settings(400, 100, arm.flatstate_dimension());

        let mut growth = Growth::new(settings.max_samples, arm.flatstate_dimension());
        growth.seed(&start, &[]);
        while growth.iterations < settings.max_iterations && growth.roadmap.len() < settings.max_samples {
            growth.iterations += 1;
            growth.step(&arm, &env, &settings, &mut rng);
        }

        for u in 0..growth.roadmap.len() {
            for &(v, cost) in &growth.roadmap.nodes[u].neighbors {
                let back = &growth.roadmap.nodes[v].neighbors;
                let occurrences = back.iter().filter(|&&(w, d)| w == u && (d - cost).abs() < 1e-12).count();
                assert_eq!(
                    occurrences, 1,
                    "edge ({u}, {v}) with cost {cost} must appear exactly once in the reverse adjacency"
                );
            }
        }
    }

    #[test]
    fn same_component_implies_bfs_connectivity() {
        let arm = PlanarArm::new(2);
        let env = SphereWorld::empty();
        let mut rng = HaltonRng::new();
        let start = FlatState::new(ndarray::Array1::zeros(arm.flatstate_dimension()));
        let settings = default_settings(400, 100, arm.flatstate_dimension());

        let mut growth = Growth::new(settings.max_samples, arm.flatstate_dimension());
        growth.seed(&start, &[]);
        while growth.iterations < settings.max_iterations && growth.roadmap.len() < settings.max_samples {
            growth.iterations += 1;
            growth.step(&arm, &env, &settings, &mut rng);
        }

        let n = growth.roadmap.len();
        let roots: Vec<usize> = (0..n)
            .map(|i| growth.union_find.find_root(growth.roadmap.nodes[i].component))
            .collect();

        for u in 0..n {
            for v in 0..n {
                if roots[u] != roots[v] {
                    continue;
                }
                assert!(bfs_connected(&growth.roadmap, u, v), "{u} and {v} share a component but are not BFS-connected");
            }
        }
    }

    fn bfs_connected(roadmap: &Roadmap, start: usize, goal: usize) -> bool {
        if start == goal {
            return true;
        }
        let mut visited = vec![false; roadmap.len()];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;
        while let Some(node) = queue.pop_front() {
            for &(neighbor, _) in &roadmap.nodes[node].neighbors {
                if neighbor == goal {
                    return true;
                }
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        false
    }
}
