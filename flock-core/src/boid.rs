use rand::Rng;

use crate::config::Bounds;
use crate::vector::Vector3D;

/// A single boid entity
#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub position: Vector3D,
    pub velocity: Vector3D,
    pub radius: f32,
}

impl Boid {
    pub fn new(position: Vector3D, velocity: Vector3D, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// A boid at a random point inside `bounds`, inset by `radius`, flying in a
    /// random direction at a random speed up to `max_velocity`.
    pub fn random<R: Rng + ?Sized>(
        bounds: &Bounds,
        radius: f32,
        max_velocity: f32,
        rng: &mut R,
    ) -> Self {
        let mut position = Vector3D::zero();
        for axis in 0..3 {
            let (lo, hi) = bounds.inset_range(axis, radius);
            // Interpolate rather than `gen_range`: `hi - lo` can overflow for
            // huge finite boxes.
            let t: f32 = rng.gen();
            *position.axis_mut(axis) = (lo * (1.0 - t) + hi * t).max(lo).min(hi);
        }

        let direction = Vector3D::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        )
        .normalize();
        let speed = rng.gen::<f32>() * max_velocity;

        Self::new(position, direction * speed, radius)
    }

    /// Applies `acceleration` over `dt`: velocity first, capped at
    /// `max_velocity`, then position.
    pub fn integrate(&mut self, acceleration: Vector3D, dt: f32, max_velocity: f32) {
        self.velocity += acceleration * dt;
        self.velocity = self.velocity.limit(max_velocity);
        self.position += self.velocity * dt;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    /// Unit facing direction for rendering; `+Z` while the boid is at rest.
    pub fn heading(&self) -> Vector3D {
        if self.velocity.magnitude_squared() > 0.0 {
            self.velocity.normalize()
        } else {
            Vector3D::Z
        }
    }
}

/// What the renderer needs to draw one boid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidState {
    pub position: Vector3D,
    pub heading: Vector3D,
    pub radius: f32,
}

impl From<&Boid> for BoidState {
    fn from(boid: &Boid) -> Self {
        Self {
            position: boid.position,
            heading: boid.heading(),
            radius: boid.radius,
        }
    }
}
