#![cfg_attr(not(feature = "std"), no_std)]

use serde::{Deserialize, Serialize};

/// Every control the viewer exposes, plus the bounding box.
///
/// Missing fields fall back to their defaults when deserializing, so a
/// settings file only needs the values it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
    pub boid_count: usize,
    pub seek_weight: f32,
    pub align_weight: f32,
    pub separate_weight: f32,
    pub max_velocity: f32,
    pub boid_radius: f32,
    pub perception_radius: f32,
    pub separation_margin: f32,
    /// Fixed seek target; `None` seeks the flock centroid.
    pub seek_target: Option<[f32; 3]>,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
    pub boid_collisions: bool,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            boid_count: 50,
            seek_weight: 5.5,
            align_weight: 6.5,
            separate_weight: 2.5,
            max_velocity: 1.0,
            boid_radius: 1.0,
            perception_radius: 6.0,
            separation_margin: 0.5,
            seek_target: None,
            bounds_min: [-20.0; 3],
            bounds_max: [20.0; 3],
            boid_collisions: true,
        }
    }
}

/// Snapshot of the flock after a tick, reported by the host loop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameStatus {
    pub tick: u64,
    pub boid_count: usize,
    pub centroid: Option<[f32; 3]>,
    pub mean_speed: f32,
    /// Alignment of headings, 0.0 (chaotic) to 1.0 (all parallel).
    pub order: f32,
}
