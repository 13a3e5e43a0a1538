//! A minimal sphere-based collision [`Environment`] built on `parry2d`.

use flatprm_capability::Environment;
use parry2d::na::{Isometry2, Vector2};
use parry2d::shape::Ball;

/// A single static sphere obstacle in the plane.
#[derive(Debug, Clone)]
pub struct Sphere {
    pub center: (f32, f32),
    pub radius: f32,
}

/// A collision environment made of static spheres, with an optional
/// `attachments` flag reporting whether an end-effector attachment should
/// also be checked for collisions.
#[derive(Debug, Clone, Default)]
pub struct SphereWorld {
    spheres: Vec<Sphere>,
    attachments: bool,
}

impl SphereWorld {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_attachments(mut self, attachments: bool) -> Self {
        self.attachments = attachments;
        self
    }

    #[must_use]
    pub fn push(mut self, center: (f32, f32), radius: f32) -> Self {
        self.spheres.push(Sphere { center, radius });
        self
    }

    #[must_use]
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// `true` iff a ball of the given radius centred at `point` intersects
    /// any sphere in this environment.
    #[must_use]
    pub fn point_collides(&self, point: (f32, f32), radius: f32) -> bool {
        let probe_pos = Isometry2::new(Vector2::new(point.0, point.1), 0.0);
        let probe = Ball::new(radius);
        self.spheres.iter().any(|sphere| {
            let sphere_pos = Isometry2::new(Vector2::new(sphere.center.0, sphere.center.1), 0.0);
            let sphere_shape = Ball::new(sphere.radius);
            parry2d::query::intersection_test(&probe_pos, &probe, &sphere_pos, &sphere_shape)
                .expect("ball-ball intersection test is always well-defined")
        })
    }
}

impl Environment for SphereWorld {
    fn attachments(&self) -> bool {
        self.attachments
    }
}
