//! Named constants pulled out of the kernels so the thresholds in
//! [`crate::precision`] and the engine's dispatcher read as intent, not
//! magic numbers.

/// Escape radius squared used by the scalar (Double/Extended) kernels,
/// `16^2`, large enough that the smooth iteration count's `log(log|z|²))`
/// term has stabilized well past the true escape boundary.
pub const SCALAR_ESCAPE_RADIUS_SQ: f64 = 256.0;

/// Escape radius squared used by the perturbation kernel. The delta-from-
/// reference formulation only needs `|z| > 2` to have escaped, and a
/// tighter radius here keeps the per-pixel iteration count closer to the
/// reference orbit's, reducing how often a pixel must fall back to a
/// reference-orbit rebase.
pub const PERTURBATION_ESCAPE_RADIUS_SQ: f64 = 4.0;

/// View width above which [`crate::precision::PrecisionMode::Double`] is used.
pub const DOUBLE_MODE_MIN_WIDTH: f64 = 1e-13;

/// View width above which [`crate::precision::PrecisionMode::Extended`] is
/// used (and below [`DOUBLE_MODE_MIN_WIDTH`]).
pub const EXTENDED_MODE_MIN_WIDTH: f64 = 1e-17;

/// Relative orbit/delta magnitude below which the linear (BLA) coefficient
/// is trusted to skip iterations instead of falling back to full delta
/// iteration from the start.
pub const LINEAR_SKIP_THRESHOLD: f64 = 1e-12;

/// SIMD lane width used by the perturbation kernel.
pub const SIMD_LANES: usize = 4;

/// Iterations processed per escape check in the perturbation kernel's
/// unrolled inner loop.
pub const UNROLL_FACTOR: usize = 4;
