//! An N-link planar revolute manipulator `Robot`, checking collisions by
//! sampling points along each link and running a ball-vs-shape
//! intersection test against the environment via `parry2d`.

use flatprm_capability::Robot;
use flatprm_geometry::FlatState;
use flatprm_linalg::{Float, RakeBlock, Vector, RAKE};

use crate::sphere_world::SphereWorld;

/// How finely each link is sampled for collision checking (points per link,
/// beyond the two endpoints).
const SAMPLES_PER_LINK: usize = 4;

#[derive(Debug, Clone)]
pub struct PlanarArm {
    n_links: usize,
    link_length: Float,
    velocity_limit: Float,
    link_radius: f32,
    attachment_radius: f32,
    resolution: Float,
}

impl PlanarArm {
    /// Construct an arm of `n_links` equal-length unit links.
    ///
    /// # Panics
    /// Panics if `n_links == 0` — an arm with no joints is a malformed
    /// fixture, not a planning outcome.
    #[must_use]
    pub fn new(n_links: usize) -> Self {
        assert!(n_links > 0, "PlanarArm requires at least one link");
        Self {
            n_links,
            link_length: 1.0,
            velocity_limit: 1.0,
            link_radius: 0.05,
            attachment_radius: 0.1,
            resolution: 20.0,
        }
    }

    #[must_use]
    pub fn with_link_length(mut self, length: Float) -> Self {
        self.link_length = length;
        self
    }

    #[must_use]
    pub fn with_velocity_limit(mut self, limit: Float) -> Self {
        self.velocity_limit = limit;
        self
    }

    /// World-space joint positions `(0, 0), p1, p2, ..., p_n` for the given
    /// joint-angle configuration, by cumulative-angle forward kinematics.
    fn joint_positions(&self, configuration: &[Float]) -> Vec<(f32, f32)> {
        let mut points = Vec::with_capacity(configuration.len() + 1);
        let mut pos = (0.0_f64, 0.0_f64);
        let mut angle = 0.0_f64;
        points.push((pos.0 as f32, pos.1 as f32));
        for &joint_angle in configuration {
            angle += joint_angle;
            pos.0 += self.link_length * angle.cos();
            pos.1 += self.link_length * angle.sin();
            points.push((pos.0 as f32, pos.1 as f32));
        }
        points
    }

    fn configuration_collides(
        &self,
        env: &SphereWorld,
        configuration: &[Float],
        with_attachment: bool,
    ) -> bool {
        let joints = self.joint_positions(configuration);
        for pair in joints.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            for step in 0..=SAMPLES_PER_LINK {
                #[allow(clippy::cast_precision_loss)]
                let t = step as f32 / SAMPLES_PER_LINK as f32;
                let point = (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);
                if env.point_collides(point, self.link_radius) {
                    return true;
                }
            }
        }
        if with_attachment {
            if let Some(&end_effector) = joints.last() {
                if env.point_collides(end_effector, self.attachment_radius) {
                    return true;
                }
            }
        }
        false
    }

    fn block_lane(block: &RakeBlock, lane: usize) -> Vec<Float> {
        block.iter().map(|dim| dim[lane]).collect()
    }
}

impl Robot for PlanarArm {
    type Env = SphereWorld;

    fn dimension(&self) -> usize {
        self.n_links
    }

    fn flat_dimension(&self) -> usize {
        self.n_links
    }

    fn flat_order(&self) -> usize {
        2
    }

    fn resolution(&self) -> Float {
        self.resolution
    }

    fn scale_configuration(&self, configuration: &mut Vector<Float>) {
        for x in configuration.iter_mut() {
            *x = (*x * 2.0 - 1.0) * std::f64::consts::PI;
        }
    }

    fn scale_flatstate(&self, state: &mut FlatState) {
        let n = self.n_links;
        for i in 0..n {
            state.0[i] = (state.0[i] * 2.0 - 1.0) * std::f64::consts::PI;
        }
        for i in n..2 * n {
            state.0[i] = (state.0[i] * 2.0 - 1.0) * self.velocity_limit;
        }
    }

    fn fkcc(&self, env: &SphereWorld, block: &RakeBlock) -> bool {
        (0..RAKE).all(|lane| {
            let configuration = Self::block_lane(block, lane);
            !self.configuration_collides(env, &configuration, false)
        })
    }

    fn fkcc_attach(&self, env: &SphereWorld, block: &RakeBlock) -> bool {
        (0..RAKE).all(|lane| {
            let configuration = Self::block_lane(block, lane);
            !self.configuration_collides(env, &configuration, true)
        })
    }
}
