//! Seek, align and separate, blended into one acceleration per boid.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::boid::Boid;
use crate::config::{FlockConfig, SeekTarget};
use crate::neighbors::NeighborSearch;
use crate::vector::Vector3D;

/// Distances below this are treated as this when weighting separation.
pub const MIN_SEPARATION_DISTANCE: f32 = 1.0e-3;

/// The three scaled rule outputs for one boid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SteeringForces {
    pub seek: Vector3D,
    pub align: Vector3D,
    pub separate: Vector3D,
}

impl SteeringForces {
    /// Plain sum; the coefficients alone set the relative influence.
    pub fn total(&self) -> Vector3D {
        self.seek + self.align + self.separate
    }
}

/// Mean position of the flock, `None` when it is empty.
pub fn centroid(boids: &[Boid]) -> Option<Vector3D> {
    if boids.is_empty() {
        return None;
    }
    let sum: Vector3D = boids.iter().map(|b| b.position).sum();
    Some(sum / boids.len() as f32)
}

/// Resolves the seek target for this tick.
pub fn resolve_target(target: SeekTarget, boids: &[Boid]) -> Option<Vector3D> {
    match target {
        SeekTarget::Centroid => centroid(boids),
        SeekTarget::Point(point) => Some(point),
    }
}

/// Direction a coincident pair is pushed apart along: the lower index goes
/// towards `-X`, the higher towards `+X`.
pub(crate) fn nudge_axis(index: usize, other: usize) -> Vector3D {
    if index < other {
        -Vector3D::X
    } else {
        Vector3D::X
    }
}

pub fn seek(boid: &Boid, target: Vector3D, config: &FlockConfig) -> Vector3D {
    (target - boid.position).limit(config.max_velocity) * config.coefficients.seek
}

/// Normalized mean velocity of the candidates within the perception radius.
pub fn align(index: usize, boids: &[Boid], candidates: &[usize], config: &FlockConfig) -> Vector3D {
    let boid = &boids[index];
    let radius_sq = config.perception_radius * config.perception_radius;

    let mut sum = Vector3D::zero();
    let mut count = 0;
    for &j in candidates {
        let other = &boids[j];
        if j != index && boid.position.distance_squared(&other.position) < radius_sq {
            sum += other.velocity;
            count += 1;
        }
    }

    if count > 0 {
        (sum / count as f32).normalize() * config.coefficients.align
    } else {
        Vector3D::zero()
    }
}

/// Push away from every candidate inside the pair's separation zone,
/// weighted by inverse distance.
pub fn separate(
    index: usize,
    boids: &[Boid],
    candidates: &[usize],
    config: &FlockConfig,
) -> Vector3D {
    let boid = &boids[index];
    let mut steering = Vector3D::zero();

    for &j in candidates {
        if j == index {
            continue;
        }
        let other = &boids[j];
        let zone = boid.radius + other.radius + config.separation_margin;
        let diff = boid.position - other.position;
        let distance = diff.magnitude();
        if distance >= zone {
            continue;
        }

        let direction = if distance > 0.0 {
            diff / distance
        } else {
            nudge_axis(index, j)
        };
        steering += direction / distance.max(MIN_SEPARATION_DISTANCE);
    }

    steering * config.coefficients.separate
}

/// Query radius covering both the perception radius and every separation zone.
pub fn query_radius(boid: &Boid, max_radius: f32, config: &FlockConfig) -> f32 {
    config
        .perception_radius
        .max(boid.radius + max_radius + config.separation_margin)
}

/// Computes all three rules for boid `index` against the flock snapshot.
///
/// `scratch` is reused between calls to avoid reallocating the neighbor list.
pub fn forces<S: NeighborSearch + ?Sized>(
    index: usize,
    boids: &[Boid],
    search: &S,
    target: Vector3D,
    max_radius: f32,
    config: &FlockConfig,
    scratch: &mut Vec<usize>,
) -> SteeringForces {
    let boid = &boids[index];
    scratch.clear();
    search.neighbors(boids, index, query_radius(boid, max_radius, config), scratch);

    SteeringForces {
        seek: seek(boid, target, config),
        align: align(index, boids, scratch, config),
        separate: separate(index, boids, scratch, config),
    }
}

/// The blended acceleration for boid `index`.
pub fn steer<S: NeighborSearch + ?Sized>(
    index: usize,
    boids: &[Boid],
    search: &S,
    target: Vector3D,
    max_radius: f32,
    config: &FlockConfig,
    scratch: &mut Vec<usize>,
) -> Vector3D {
    forces(index, boids, search, target, max_radius, config, scratch).total()
}
