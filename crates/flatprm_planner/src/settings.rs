//! Roadmap growth bounds and the planning result record.

use flatprm_geometry::FlatState;
use flatprm_linalg::Float;

/// Fixed steering horizon for every PRM edge. A known wart: a time-optimal
/// steering function would solve for `T` instead of fixing it, but the
/// horizon is kept as a settings field so call sites can override it
/// without touching the growth loop.
pub const DEFAULT_HORIZON: Float = 1.5;

/// Bounds and strategy objects governing one `solve`/`build_roadmap`
/// invocation.
#[derive(Debug, Clone)]
pub struct RoadmapSettings<NP> {
    /// Ceiling on total sampling attempts, including rejected samples.
    pub max_iterations: usize,
    /// Ceiling on accepted roadmap nodes, including the start and goals.
    pub max_samples: usize,
    pub neighbor_params: NP,
    pub horizon: Float,
}

impl<NP> RoadmapSettings<NP> {
    #[must_use]
    pub const fn new(max_iterations: usize, max_samples: usize, neighbor_params: NP) -> Self {
        Self {
            max_iterations,
            max_samples,
            neighbor_params,
            horizon: DEFAULT_HORIZON,
        }
    }

    #[must_use]
    pub const fn with_horizon(mut self, horizon: Float) -> Self {
        self.horizon = horizon;
        self
    }
}

/// The outcome of a `solve` invocation.
#[derive(Debug, Clone)]
pub struct PlanningResult {
    /// Ordered sequence of flat states from `start` to the reached goal;
    /// empty if no path was found.
    pub path: Vec<FlatState>,
    /// Solution cost, or `+∞` if no path was found.
    pub cost: Float,
    pub elapsed_nanos: u64,
    pub iterations: usize,
    /// Final roadmap size (number of accepted nodes, start and goals
    /// included).
    pub roadmap_size: usize,
    /// Reserved second size counter, unused by this implementation.
    pub reserved: usize,
}

impl PlanningResult {
    #[must_use]
    pub const fn no_path(iterations: usize, roadmap_size: usize, elapsed_nanos: u64) -> Self {
        Self {
            path: Vec::new(),
            cost: Float::INFINITY,
            elapsed_nanos,
            iterations,
            roadmap_size,
            reserved: 0,
        }
    }
}
