//! Deep-zoom Mandelbrot computation engine.
//!
//! Given a rectangular region of the complex plane and an iteration budget,
//! [`compute`] fills a caller-supplied buffer with smooth iteration counts,
//! automatically choosing between plain `f64`, double-double, and
//! perturbation arithmetic depending on how deep the requested view is.
//! [`choose_precision_mode`] exposes that same classification without
//! rendering a frame, and [`compute_f64`] is a plain-`f64` legacy path for
//! callers that never zoom past double precision.

pub mod dispatch;
pub mod driver;
pub mod linear_approx;
pub mod perturbation;
pub mod reference_orbit;
pub mod scalar;

pub use dispatch::{choose_precision_mode, compute, compute_f64};
pub use deepzoom_core::error::EngineError;
pub use deepzoom_core::precision::PrecisionMode;
