#![cfg_attr(not(feature = "std"), no_std)]

//! Core of a 3D flocking simulation.
//!
//! A [`FlockController`] owns a population of [`Boid`]s inside an
//! axis-aligned [`Bounds`] box. Each call to [`FlockController::advance`]
//! steers every boid (seek, align, separate), integrates it, resolves
//! boid-boid overlap and finally keeps everything inside the box.
//! Builds without `std` (with `alloc`) for embedded hosts.

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod boid;
pub mod collision;
pub mod config;
pub mod error;
pub mod flock;
pub mod neighbors;
pub mod steering;
pub mod vector;

pub use boid::{Boid, BoidState};
pub use collision::Contact;
pub use config::{BehaviorCoefficients, Bounds, FlockConfig, SeekTarget};
pub use error::FlockError;
pub use flock::FlockController;
pub use neighbors::{BruteForce, NeighborSearch, UniformGrid};
pub use steering::SteeringForces;
pub use vector::Vector3D;
