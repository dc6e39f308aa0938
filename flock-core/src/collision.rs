//! Boid-boid overlap and boundary resolution, run after integration.
//!
//! Boid-boid response is positional: overlapping pairs are pushed apart along
//! the line of centres and velocities are left alone. Residual overlap from
//! contacts between three or more boids is worked off over later ticks.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::boid::Boid;
use crate::config::Bounds;
use crate::neighbors::NeighborSearch;
use crate::steering::nudge_axis;
use crate::vector::{abs, Vector3D};

/// One overlapping pair, `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: usize,
    pub b: usize,
    /// Penetration depth, `r_a + r_b - distance`.
    pub depth: f32,
    /// Unit vector from `b` towards `a`.
    pub normal: Vector3D,
}

/// Sphere overlap test between two boids.
pub fn overlapping(a: &Boid, b: &Boid) -> bool {
    a.position.distance(&b.position) < a.radius + b.radius
}

/// Lists every overlapping pair once. `search` must already reflect the
/// current positions.
pub fn detect_contacts<S: NeighborSearch + ?Sized>(
    boids: &[Boid],
    search: &S,
    scratch: &mut Vec<usize>,
    contacts: &mut Vec<Contact>,
) {
    contacts.clear();
    let max_radius = boids.iter().map(|b| b.radius).fold(0.0, f32::max);

    for (a, boid) in boids.iter().enumerate() {
        scratch.clear();
        search.neighbors(boids, a, boid.radius + max_radius, scratch);

        for &b in scratch.iter().filter(|&&b| b > a) {
            let other = &boids[b];
            let diff = boid.position - other.position;
            let distance = diff.magnitude();
            let reach = boid.radius + other.radius;
            if distance >= reach {
                continue;
            }
            let normal = if distance > 0.0 {
                diff / distance
            } else {
                nudge_axis(a, b)
            };
            contacts.push(Contact {
                a,
                b,
                depth: reach - distance,
                normal,
            });
        }
    }
}

/// Moves each boid of every contact half the penetration depth away from its
/// partner. Displacements are summed first and applied together, so the
/// outcome does not depend on the order of `contacts`.
pub fn resolve_contacts(boids: &mut [Boid], contacts: &[Contact]) {
    if contacts.is_empty() {
        return;
    }
    let mut displacement = Vec::with_capacity(boids.len());
    displacement.resize(boids.len(), Vector3D::zero());

    for contact in contacts {
        let push = contact.normal * (contact.depth * 0.5);
        displacement[contact.a] += push;
        displacement[contact.b] -= push;
    }

    for (boid, offset) in boids.iter_mut().zip(displacement) {
        boid.position += offset;
    }
}

/// Detects and resolves boid-boid overlap, returning the number of contacts.
pub fn resolve_boid_collisions<S: NeighborSearch + ?Sized>(
    boids: &mut [Boid],
    search: &mut S,
    scratch: &mut Vec<usize>,
    contacts: &mut Vec<Contact>,
) -> usize {
    search.rebuild(boids);
    detect_contacts(boids, search, scratch, contacts);
    resolve_contacts(boids, contacts);
    contacts.len()
}

/// Keeps one boid fully inside `bounds`, bouncing the velocity component of
/// every violated axis back inwards. Returns whether any axis was violated.
pub fn resolve_boundary(boid: &mut Boid, bounds: &Bounds) -> bool {
    let mut hit = false;

    for axis in 0..3 {
        let (lo, hi) = bounds.inset_range(axis, boid.radius);
        let position = boid.position.axis_mut(axis);

        if !position.is_finite() {
            *position = (lo + hi) * 0.5;
            *boid.velocity.axis_mut(axis) = 0.0;
            hit = true;
        } else if *position < lo {
            *position = lo;
            let v = boid.velocity.axis_mut(axis);
            *v = abs(*v);
            hit = true;
        } else if *position > hi {
            *position = hi;
            let v = boid.velocity.axis_mut(axis);
            *v = -abs(*v);
            hit = true;
        }
    }

    hit
}

/// Applies [`resolve_boundary`] to the whole flock, returning how many boids
/// bounced.
pub fn resolve_boundaries(boids: &mut [Boid], bounds: &Bounds) -> usize {
    boids
        .iter_mut()
        .map(|boid| resolve_boundary(boid, bounds))
        .filter(|&hit| hit)
        .count()
}
