//! The flock and its per-tick orchestration.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::boid::{Boid, BoidState};
use crate::collision::{self, Contact};
use crate::config::{non_negative, BehaviorCoefficients, Bounds, FlockConfig, SeekTarget};
use crate::neighbors::{BruteForce, NeighborSearch};
use crate::steering;
use crate::vector::Vector3D;

/// Owns the boid population and advances it one tick at a time.
///
/// Every mutator takes `&mut self`, so a host can only read [`boids`] between
/// ticks, never while one is in progress. Parameter changes take effect on
/// the next call to [`advance`].
///
/// [`boids`]: FlockController::boids
/// [`advance`]: FlockController::advance
pub struct FlockController<S = BruteForce> {
    boids: Vec<Boid>,
    config: FlockConfig,
    search: S,
    rng: SmallRng,
    tick: u64,
    accelerations: Vec<Vector3D>,
    scratch: Vec<usize>,
    contacts: Vec<Contact>,
}

impl FlockController<BruteForce> {
    /// A flock of `count` random boids seeded from system entropy.
    #[cfg(feature = "std")]
    pub fn new(count: usize, config: FlockConfig) -> Self {
        Self::from_parts(count, config, BruteForce, SmallRng::from_entropy())
    }

    /// A flock of `count` random boids with reproducible placement.
    pub fn with_seed(count: usize, config: FlockConfig, seed: u64) -> Self {
        Self::with_search(count, config, seed, BruteForce)
    }

    /// A flock made of the given boids, in order.
    ///
    /// Radius is flock-wide, so every boid takes `config.boid_radius`.
    pub fn from_boids(boids: Vec<Boid>, config: FlockConfig, seed: u64) -> Self {
        let mut flock = Self::with_seed(0, config, seed);
        let radius = flock.config.boid_radius;
        flock.boids = boids
            .into_iter()
            .map(|boid| Boid { radius, ..boid })
            .collect();
        flock
    }
}

impl<S: NeighborSearch> FlockController<S> {
    /// A flock of `count` random boids using a custom neighbor search.
    pub fn with_search(count: usize, config: FlockConfig, seed: u64, search: S) -> Self {
        Self::from_parts(count, config, search, SmallRng::seed_from_u64(seed))
    }

    fn from_parts(count: usize, config: FlockConfig, search: S, rng: SmallRng) -> Self {
        let mut flock = Self {
            boids: Vec::new(),
            config: config.sanitized(),
            search,
            rng,
            tick: 0,
            accelerations: Vec::new(),
            scratch: Vec::new(),
            contacts: Vec::new(),
        };
        flock.reset(count);
        flock
    }

    /// Runs one tick: steering against the pre-tick snapshot, integration,
    /// boid-boid collision, then the boundary clamp.
    pub fn advance(&mut self, dt: f32) {
        let dt = non_negative("time step", dt);
        self.tick += 1;
        if self.boids.is_empty() {
            return;
        }

        let config = self.config;
        let target = steering::resolve_target(config.seek_target, &self.boids)
            .unwrap_or_else(|| config.bounds.center());
        let max_radius = self.boid_radius();

        self.search.rebuild(&self.boids);
        self.accelerations.clear();
        for index in 0..self.boids.len() {
            let acceleration = steering::steer(
                index,
                &self.boids,
                &self.search,
                target,
                max_radius,
                &config,
                &mut self.scratch,
            );
            self.accelerations.push(acceleration);
        }

        for (boid, acceleration) in self.boids.iter_mut().zip(&self.accelerations) {
            boid.integrate(*acceleration, dt, config.max_velocity);
        }

        let contacts = if config.boid_collisions {
            collision::resolve_boid_collisions(
                &mut self.boids,
                &mut self.search,
                &mut self.scratch,
                &mut self.contacts,
            )
        } else {
            0
        };
        let bounced = collision::resolve_boundaries(&mut self.boids, &config.bounds);

        log::trace!(
            "tick {}: {} boids, {} contacts, {} boundary hits",
            self.tick,
            self.boids.len(),
            contacts,
            bounced
        );
    }

    /// Replaces the flock with `count` fresh random boids.
    pub fn reset(&mut self, count: usize) {
        self.boids.clear();
        self.boids.reserve(count);
        for _ in 0..count {
            self.add_one();
        }
        log::debug!("flock reset to {} boids", count);
    }

    /// Appends one boid at a random point inside the bounds.
    pub fn add_one(&mut self) {
        let boid = Boid::random(
            &self.config.bounds,
            self.config.boid_radius,
            self.config.max_velocity,
            &mut self.rng,
        );
        self.boids.push(boid);
    }

    /// Removes the most recently added boid; `None` on an empty flock.
    pub fn remove_one(&mut self) -> Option<Boid> {
        self.boids.pop()
    }

    pub fn set_behavior(&mut self, seek: f32, align: f32, separate: f32) {
        self.config.coefficients = BehaviorCoefficients::new(seek, align, separate).sanitized();
        log::debug!("behavior set to {:?}", self.config.coefficients);
    }

    /// Sets the speed cap and slows down any boid already above it.
    pub fn set_velocity_limit(&mut self, max_velocity: f32) {
        let max_velocity = non_negative("velocity limit", max_velocity);
        self.config.max_velocity = max_velocity;
        for boid in &mut self.boids {
            boid.velocity = boid.velocity.limit(max_velocity);
        }
        log::debug!("velocity limit set to {}", max_velocity);
    }

    /// Resizes every boid.
    pub fn set_boid_radius(&mut self, radius: f32) {
        let radius = non_negative("boid radius", radius);
        self.config.boid_radius = radius;
        for boid in &mut self.boids {
            boid.radius = radius;
        }
        log::debug!("boid radius set to {}", radius);
    }

    pub fn set_perception_radius(&mut self, radius: f32) {
        self.config.perception_radius = non_negative("perception radius", radius);
    }

    pub fn set_seek_target(&mut self, target: SeekTarget) {
        self.config.seek_target = FlockConfig {
            seek_target: target,
            ..self.config
        }
        .sanitized()
        .seek_target;
    }

    /// Turns the boid-boid collision pass on or off. Boundary collision
    /// always runs.
    pub fn set_boid_collisions(&mut self, enabled: bool) {
        self.config.boid_collisions = enabled;
    }

    /// Moves the walls; boids left outside are pushed back in on the next tick.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.config.bounds = bounds;
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    /// Render-facing view of every boid.
    pub fn states(&self) -> impl Iterator<Item = BoidState> + '_ {
        self.boids.iter().map(BoidState::from)
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn coefficients(&self) -> BehaviorCoefficients {
        self.config.coefficients
    }

    pub fn velocity_limit(&self) -> f32 {
        self.config.max_velocity
    }

    pub fn boid_radius(&self) -> f32 {
        self.config.boid_radius
    }

    pub fn bounds(&self) -> &Bounds {
        &self.config.bounds
    }

    /// Number of calls to [`advance`](FlockController::advance) so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn centroid(&self) -> Option<Vector3D> {
        steering::centroid(&self.boids)
    }

    pub fn mean_speed(&self) -> f32 {
        if self.boids.is_empty() {
            return 0.0;
        }
        self.boids.iter().map(Boid::speed).sum::<f32>() / self.boids.len() as f32
    }

    /// Magnitude of the mean heading of moving boids: 1.0 when they all fly
    /// the same way, near 0.0 when headings cancel out.
    pub fn order_parameter(&self) -> f32 {
        let (sum, moving) = self
            .boids
            .iter()
            .filter(|b| b.velocity.magnitude_squared() > 0.0)
            .fold((Vector3D::zero(), 0usize), |(sum, n), b| {
                (sum + b.velocity.normalize(), n + 1)
            });
        if moving == 0 {
            0.0
        } else {
            (sum / moving as f32).magnitude()
        }
    }
}
