use core::fmt;

/// Errors raised while building a flock from external settings.
///
/// The tick itself never fails; these only cover fallible construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlockError {
    /// A bounds corner had `min > max` on the given axis.
    InvalidBounds { axis: usize, min: f32, max: f32 },
    /// A bounds corner contained NaN or an infinity.
    NonFiniteBounds,
}

impl fmt::Display for FlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlockError::InvalidBounds { axis, min, max } => write!(
                f,
                "invalid bounds on axis {}: min {} is greater than max {}",
                ["x", "y", "z"][(*axis).min(2)],
                min,
                max
            ),
            FlockError::NonFiniteBounds => write!(f, "bounds corners must be finite"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FlockError {}
