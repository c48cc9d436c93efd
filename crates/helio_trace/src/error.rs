//! Error types for the geometry engine.
//!
//! Per-ray misses are never errors: a ray with no usable intersection is
//! encoded as an `f64::INFINITY` parametric distance in the output and
//! batch processing completes for the rest of the bundle.

use thiserror::Error;

/// Errors that can occur while configuring or driving a surface.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error("absorptivity must lie in [0, 1], got {0}")]
    InvalidAbsorptivity(f64),

    #[error("working frame is singular (determinant {0})")]
    SingularFrame(f64),
}

pub type TraceResult<T> = Result<T, TraceError>;
