//! The precision dispatcher: the two external entry points, `compute` and
//! `choose_precision_mode`, plus the legacy `f64`-only `compute_f64`.

use deepzoom_core::error::EngineError;
use deepzoom_core::precision::PrecisionMode;
use deepzoom_core::quad::Quad;

use crate::driver;
use crate::perturbation;
use crate::scalar::{DoubleKernel, ExtendedKernel};

fn validate_size(width: u32, height: u32, max_iter: u32) -> Result<(), EngineError> {
    if width == 0 || height == 0 || max_iter == 0 {
        return Err(EngineError::InvalidSize(format!(
            "width={width}, height={height}, max_iter={max_iter} must all be nonzero"
        )));
    }
    Ok(())
}

fn validate_buffer(out_len: usize, width: u32, height: u32) -> Result<(), EngineError> {
    let expected = width as usize * height as usize;
    if out_len != expected {
        return Err(EngineError::InvalidSize(format!(
            "output buffer has {out_len} cells, expected {expected} ({width}x{height})"
        )));
    }
    Ok(())
}

/// Classify a requested view width into the precision mode that would
/// render it, without allocating or computing a frame.
pub fn choose_precision_mode(
    xmin_str: &str,
    xmax_str: &str,
    _width: u32,
) -> Result<PrecisionMode, EngineError> {
    let xmin = Quad::parse(xmin_str)?;
    let xmax = Quad::parse(xmax_str)?;
    if xmax <= xmin {
        return Err(EngineError::InvalidRegion(format!(
            "xmax ({xmax_str}) must be greater than xmin ({xmin_str})"
        )));
    }
    let w = xmax.sub(xmin).to_f64();
    Ok(PrecisionMode::choose(w))
}

/// Render one frame into `out` (row-major, `width * height` cells).
///
/// Parses the four region bounds as quad-precision decimals, selects a
/// precision mode by view width, and dispatches to the matching kernel.
/// `out` must already be sized to `width * height`; on success every cell
/// is written, on failure its contents are unspecified.
#[allow(clippy::too_many_arguments)]
pub fn compute(
    xmin_str: &str,
    xmax_str: &str,
    ymin_str: &str,
    ymax_str: &str,
    width: u32,
    height: u32,
    max_iter: u32,
    out: &mut [f64],
) -> Result<(), EngineError> {
    validate_size(width, height, max_iter)?;
    validate_buffer(out.len(), width, height)?;

    let xmin = Quad::parse(xmin_str)?;
    let xmax = Quad::parse(xmax_str)?;
    let ymin = Quad::parse(ymin_str)?;
    let ymax = Quad::parse(ymax_str)?;

    if xmax <= xmin || ymax <= ymin {
        return Err(EngineError::InvalidRegion(format!(
            "region must satisfy xmax > xmin and ymax > ymin (xmin={xmin_str}, xmax={xmax_str}, ymin={ymin_str}, ymax={ymax_str})"
        )));
    }

    let w = xmax.sub(xmin).to_f64();
    let mode = PrecisionMode::choose(w);
    log::debug!("compute: {width}x{height}, max_iter={max_iter}, view_width={w:e}, mode={mode:?}");

    match mode {
        PrecisionMode::Double => {
            let kernel = DoubleKernel::new(
                xmin.to_f64(),
                xmax.to_f64(),
                ymin.to_f64(),
                ymax.to_f64(),
                width,
                height,
                max_iter,
            );
            driver::render(&kernel, width, out);
        }
        PrecisionMode::Extended => {
            let kernel = ExtendedKernel::new(xmin, xmax, ymin, ymax, width, height, max_iter);
            driver::render(&kernel, width, out);
        }
        PrecisionMode::Perturbation => {
            let kernel = perturbation::build(xmin, xmax, ymin, ymax, width, height, max_iter)?;
            driver::render(&kernel, width, out);
        }
    }

    Ok(())
}

/// Legacy entry point: `f64`-only bounds, always rendered with the Double
/// scalar kernel. No quad parsing, no mode dispatch.
#[allow(clippy::too_many_arguments)]
pub fn compute_f64(
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
    width: u32,
    height: u32,
    max_iter: u32,
    out: &mut [f64],
) -> Result<(), EngineError> {
    validate_size(width, height, max_iter)?;
    validate_buffer(out.len(), width, height)?;

    if xmax <= xmin || ymax <= ymin {
        return Err(EngineError::InvalidRegion(format!(
            "region must satisfy xmax > xmin and ymax > ymin (xmin={xmin}, xmax={xmax}, ymin={ymin}, ymax={ymax})"
        )));
    }

    let kernel = DoubleKernel::new(xmin, xmax, ymin, ymax, width, height, max_iter);
    driver::render(&kernel, width, out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_size() {
        let mut out = vec![0.0; 0];
        let err = compute("-2.0", "1.0", "-1.0", "1.0", 0, 4, 256, &mut out).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSize(_)));
    }

    #[test]
    fn rejects_mismatched_buffer_length() {
        let mut out = vec![0.0; 3];
        let err = compute("-2.0", "1.0", "-1.0", "1.0", 4, 4, 256, &mut out).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSize(_)));
    }

    #[test]
    fn rejects_inverted_region() {
        let mut out = vec![0.0; 16];
        let err = compute("1.0", "-2.0", "-1.0", "1.0", 4, 4, 256, &mut out).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRegion(_)));
    }

    #[test]
    fn rejects_malformed_coordinate_string() {
        let mut out = vec![0.0; 16];
        let err = compute("not-a-number", "1.0", "-1.0", "1.0", 4, 4, 256, &mut out).unwrap_err();
        assert!(matches!(err, EngineError::Quad(_)));
    }

    #[test]
    fn wide_view_chooses_double() {
        let mode = choose_precision_mode("-2.0", "1.0", 100).unwrap();
        assert_eq!(mode, PrecisionMode::Double);
    }

    #[test]
    fn s1_shallow_region_matches_expected_scenario() {
        let mut out = vec![0.0; 16];
        compute("-2.0", "1.0", "-1.0", "1.0", 4, 4, 256, &mut out).unwrap();
        // corner pixel (0,0) escapes quickly -> positive
        assert!(out[0] > 0.0);
    }

    #[test]
    fn s2_cardioid_and_bulb_points_are_interior() {
        let mut out = vec![0.0; 1];
        compute_f64(-0.01, 0.01, -0.01, 0.01, 1, 1, 256, &mut out).unwrap();
        assert_eq!(out[0], -256.0);

        let mut out2 = vec![0.0; 1];
        compute_f64(-1.01, -0.99, -0.01, 0.01, 1, 1, 256, &mut out2).unwrap();
        assert_eq!(out2[0], -256.0);
    }

    #[test]
    fn s3_mid_depth_view_chooses_extended() {
        let mode = choose_precision_mode("-0.75", "-0.75000000000000075", 100);
        // xmax < xmin in this order; swap for a valid width of 7.5e-16
        let mode = match mode {
            Ok(_) => mode,
            Err(_) => choose_precision_mode("-0.75000000000000075", "-0.75", 100),
        };
        assert_eq!(mode.unwrap(), PrecisionMode::Extended);
    }

    #[test]
    fn s5_determinism_across_repeated_runs() {
        let mut out1 = vec![0.0; 16];
        let mut out2 = vec![0.0; 16];
        compute("-2.0", "1.0", "-1.0", "1.0", 4, 4, 256, &mut out1).unwrap();
        compute("-2.0", "1.0", "-1.0", "1.0", 4, 4, 256, &mut out2).unwrap();
        assert_eq!(out1, out2);
    }

    #[test]
    fn single_pixel_frame_is_valid() {
        let mut out = vec![0.0; 1];
        compute("-2.0", "1.0", "-1.0", "1.0", 1, 1, 256, &mut out).unwrap();
        assert!(out[0] != 0.0);
    }
}
