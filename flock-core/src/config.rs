use crate::error::FlockError;
use crate::vector::{abs, Vector3D};

/// Axis-aligned bounding volume that every boid must stay inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    min: Vector3D,
    max: Vector3D,
}

impl Bounds {
    /// Builds a box from its two corners, rejecting inverted or non-finite ones.
    pub fn try_new(min: Vector3D, max: Vector3D) -> Result<Self, FlockError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(FlockError::NonFiniteBounds);
        }
        for axis in 0..3 {
            if min.axis(axis) > max.axis(axis) {
                return Err(FlockError::InvalidBounds {
                    axis,
                    min: min.axis(axis),
                    max: max.axis(axis),
                });
            }
        }
        Ok(Self { min, max })
    }

    /// A cube centred on the origin, `[-half_extent, half_extent]^3`.
    pub fn cube(half_extent: f32) -> Self {
        let half = if half_extent.is_finite() {
            abs(half_extent)
        } else {
            0.0
        };
        Self {
            min: Vector3D::splat(-half),
            max: Vector3D::splat(half),
        }
    }

    pub fn min(&self) -> Vector3D {
        self.min
    }

    pub fn max(&self) -> Vector3D {
        self.max
    }

    pub fn center(&self) -> Vector3D {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3D {
        self.max - self.min
    }

    pub fn contains(&self, point: &Vector3D) -> bool {
        (0..3).all(|axis| {
            let p = point.axis(axis);
            p >= self.min.axis(axis) && p <= self.max.axis(axis)
        })
    }

    /// Range of valid centre coordinates on `axis` for a sphere of `radius`.
    ///
    /// When the box is narrower than the sphere the range collapses to the
    /// box centre on that axis.
    pub fn inset_range(&self, axis: usize, radius: f32) -> (f32, f32) {
        let lo = self.min.axis(axis) + radius;
        let hi = self.max.axis(axis) - radius;
        if lo <= hi {
            (lo, hi)
        } else {
            let mid = (self.min.axis(axis) + self.max.axis(axis)) * 0.5;
            (mid, mid)
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::cube(20.0)
    }
}

/// Weights of the three steering rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorCoefficients {
    pub seek: f32,
    pub align: f32,
    pub separate: f32,
}

impl BehaviorCoefficients {
    pub const fn new(seek: f32, align: f32, separate: f32) -> Self {
        Self {
            seek,
            align,
            separate,
        }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Copy with every weight clamped to a non-negative finite value.
    pub fn sanitized(self) -> Self {
        Self {
            seek: non_negative("seek coefficient", self.seek),
            align: non_negative("align coefficient", self.align),
            separate: non_negative("separate coefficient", self.separate),
        }
    }
}

impl Default for BehaviorCoefficients {
    fn default() -> Self {
        Self::new(5.5, 6.5, 2.5)
    }
}

/// Point the seek rule steers towards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SeekTarget {
    /// Centre of mass of the whole flock, recomputed every tick.
    #[default]
    Centroid,
    /// A fixed world-space point.
    Point(Vector3D),
}

/// Configuration for the flock simulation, read once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockConfig {
    pub coefficients: BehaviorCoefficients,
    pub max_velocity: f32,
    pub boid_radius: f32,
    pub perception_radius: f32,
    pub separation_margin: f32,
    pub seek_target: SeekTarget,
    pub bounds: Bounds,
    pub boid_collisions: bool,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            coefficients: BehaviorCoefficients::default(),
            max_velocity: 1.0,
            boid_radius: 1.0,
            perception_radius: 6.0,
            separation_margin: 0.5,
            seek_target: SeekTarget::Centroid,
            bounds: Bounds::default(),
            boid_collisions: true,
        }
    }
}

impl FlockConfig {
    /// Copy with every scalar clamped to a non-negative finite value.
    pub fn sanitized(self) -> Self {
        Self {
            coefficients: self.coefficients.sanitized(),
            max_velocity: non_negative("velocity limit", self.max_velocity),
            boid_radius: non_negative("boid radius", self.boid_radius),
            perception_radius: non_negative("perception radius", self.perception_radius),
            separation_margin: non_negative("separation margin", self.separation_margin),
            seek_target: match self.seek_target {
                SeekTarget::Point(p) if !p.is_finite() => {
                    log::warn!("non-finite seek target {:?}, using the flock centroid", p);
                    SeekTarget::Centroid
                }
                target => target,
            },
            ..self
        }
    }
}

/// Clamps a GUI-supplied scalar to `[0, inf)`, mapping NaN and infinities to 0.
pub(crate) fn non_negative(name: &str, value: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("{} {} is out of range, clamping to 0", name, value);
        0.0
    }
}
