//! Headless host for the flock simulation: settings loading and the frame loop.

use anyhow::{Context, Result};
use flock_core::{
    BehaviorCoefficients, Bounds, FlockConfig, FlockController, FlockError, NeighborSearch,
    SeekTarget, Vector3D,
};
use flock_shared::{FlockSettings, FrameStatus};
use std::path::Path;
use std::time::{Duration, Instant};

/// Reads a JSON settings file.
pub fn load_settings(path: &Path) -> Result<FlockSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
    Ok(settings)
}

fn vector(v: [f32; 3]) -> Vector3D {
    Vector3D::new(v[0], v[1], v[2])
}

/// Builds the core configuration from host settings.
///
/// Out-of-range scalars are clamped by the core; only malformed bounds fail.
pub fn config_from_settings(settings: &FlockSettings) -> Result<FlockConfig, FlockError> {
    let bounds = Bounds::try_new(vector(settings.bounds_min), vector(settings.bounds_max))?;

    Ok(FlockConfig {
        coefficients: BehaviorCoefficients::new(
            settings.seek_weight,
            settings.align_weight,
            settings.separate_weight,
        ),
        max_velocity: settings.max_velocity,
        boid_radius: settings.boid_radius,
        perception_radius: settings.perception_radius,
        separation_margin: settings.separation_margin,
        seek_target: settings
            .seek_target
            .map_or(SeekTarget::Centroid, |p| SeekTarget::Point(vector(p))),
        bounds,
        boid_collisions: settings.boid_collisions,
    }
    .sanitized())
}

pub fn frame_status<S: NeighborSearch>(flock: &FlockController<S>) -> FrameStatus {
    FrameStatus {
        tick: flock.tick_count(),
        boid_count: flock.len(),
        centroid: flock.centroid().map(|c| [c.x, c.y, c.z]),
        mean_speed: flock.mean_speed(),
        order: flock.order_parameter(),
    }
}

/// How the host loop drives the flock.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub ticks: u64,
    /// Fixed step, or the target frame time when `realtime` is set.
    pub dt: f32,
    /// Report every n-th tick; 0 reports only the final one.
    pub report_every: u64,
    /// Sleep to the frame time and advance by the measured elapsed time,
    /// the way a GUI timer callback would.
    pub realtime: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            ticks: 600,
            dt: 1.0 / 60.0,
            report_every: 60,
            realtime: false,
        }
    }
}

/// Runs the frame loop, handing a status to `report` after selected ticks.
///
/// The flock is only read between calls to `advance`.
pub fn run<S, F>(flock: &mut FlockController<S>, options: &RunOptions, mut report: F) -> Result<()>
where
    S: NeighborSearch,
    F: FnMut(&FrameStatus) -> Result<()>,
{
    log::info!(
        "Running {} ticks of {} boids (dt = {}, realtime = {})",
        options.ticks,
        flock.len(),
        options.dt,
        options.realtime
    );

    let frame = if options.realtime && options.dt.is_finite() && options.dt > 0.0 {
        Duration::try_from_secs_f32(options.dt).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    };
    let mut last_frame = Instant::now();
    let started = Instant::now();

    for tick in 1..=options.ticks {
        let dt = if options.realtime {
            if let Some(remaining) = frame.checked_sub(last_frame.elapsed()) {
                std::thread::sleep(remaining);
            }
            let elapsed = last_frame.elapsed().as_secs_f32();
            last_frame = Instant::now();
            elapsed
        } else {
            options.dt
        };

        flock.advance(dt);

        let due = options.report_every > 0 && tick % options.report_every == 0;
        if due || tick == options.ticks {
            let status = frame_status(flock);
            log::debug!("{:?}", status);
            report(&status)?;
        }
    }

    let elapsed = started.elapsed().as_secs_f64();
    if elapsed > 0.0 {
        log::info!(
            "Finished {} ticks in {:.3}s ({:.1} ticks/s)",
            options.ticks,
            elapsed,
            options.ticks as f64 / elapsed
        );
    }

    Ok(())
}
