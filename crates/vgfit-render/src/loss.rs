// this_file: crates/vgfit-render/src/loss.rs

//! Pixel loss between a rendered frame and the target image.

use vgfit_core::{Error, Result};

/// Mean squared error over all channels.
///
/// Accumulates in f64 so the value is stable enough for finite-difference
/// verification of the backward pass.
pub fn mse(rendered: &[f32], target: &[f32]) -> Result<f32> {
    check_lengths(rendered, target)?;
    let sum: f64 = rendered
        .iter()
        .zip(target)
        .map(|(&r, &t)| {
            let d = (r - t) as f64;
            d * d
        })
        .sum();
    Ok((sum / rendered.len() as f64) as f32)
}

/// Gradient of [`mse`] with respect to the rendered pixels.
pub fn mse_grad(rendered: &[f32], target: &[f32]) -> Result<Vec<f32>> {
    check_lengths(rendered, target)?;
    let scale = 2.0 / rendered.len() as f32;
    Ok(rendered
        .iter()
        .zip(target)
        .map(|(&r, &t)| scale * (r - t))
        .collect())
}

fn check_lengths(rendered: &[f32], target: &[f32]) -> Result<()> {
    if rendered.len() != target.len() || rendered.is_empty() {
        return Err(Error::render(format!(
            "loss buffers must be non-empty and equal length, got {} and {}",
            rendered.len(),
            target.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mse_zero_for_identical() {
        let a = vec![0.25; 30];
        assert_relative_eq!(mse(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_mse_value() {
        let rendered = vec![1.0, 0.0, 0.5, 0.5];
        let target = vec![0.0, 0.0, 0.5, 1.0];
        // (1 + 0 + 0 + 0.25) / 4
        assert_relative_eq!(mse(&rendered, &target).unwrap(), 0.3125);
    }

    #[test]
    fn test_mse_grad_matches_finite_diff() {
        let mut rendered = vec![0.3, 0.7, 0.1, 0.9];
        let target = vec![0.5, 0.5, 0.5, 0.5];
        let grads = mse_grad(&rendered, &target).unwrap();

        let h = 1e-3;
        for i in 0..rendered.len() {
            let orig = rendered[i];
            rendered[i] = orig + h;
            let plus = mse(&rendered, &target).unwrap();
            rendered[i] = orig - h;
            let minus = mse(&rendered, &target).unwrap();
            rendered[i] = orig;
            let numeric = (plus - minus) / (2.0 * h);
            assert_relative_eq!(grads[i], numeric, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(mse(&[0.0; 3], &[0.0; 4]).is_err());
        assert!(mse_grad(&[], &[]).is_err());
    }
}
