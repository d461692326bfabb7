// this_file: crates/vgfit-render/src/raster.rs

//! Forward rasterization with prefiltered signed-distance coverage.
//!
//! Every subpixel sample evaluates, for each shape whose dilated bounding
//! box reaches it, a signed distance to the shape boundary; coverage is a
//! smoothstep over the antialias band, which keeps the image differentiable
//! in the control points. Shapes composite source-over in painter's order
//! onto an opaque background.

use rayon::prelude::*;
use vgfit_core::{RenderConfig, Result};
use vgfit_scene::{Scene, Vec2};

/// Forward renderer over a fixed configuration.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render the scene to interleaved RGB f32 in [0, 1].
    pub fn render(&self, scene: &Scene) -> Result<Vec<f32>> {
        scene.validate()?;
        log::trace!(
            target: "vgfit::render",
            "forward {}x{} shapes={} samples={}",
            scene.width,
            scene.height,
            scene.num_shapes(),
            self.config.samples
        );

        let (w, h) = (scene.width as usize, scene.height as usize);
        let bounds = shape_pixel_bounds(scene, self.config.aa_radius);
        let offsets = sample_offsets(self.config.samples);
        let inv_samples = 1.0 / offsets.len() as f32;
        let aa = self.config.aa_radius;

        let mut pixels = vec![0.0f32; w * h * 3];
        pixels
            .par_chunks_mut(w * 3)
            .enumerate()
            .for_each(|(y, row)| {
                let mut active: Vec<usize> = Vec::with_capacity(scene.num_shapes());
                for x in 0..w {
                    active.clear();
                    active.extend(
                        (0..scene.num_shapes())
                            .filter(|&k| bounds[k].contains(x as i32, y as i32)),
                    );

                    let mut acc = [0.0f32; 3];
                    for offset in &offsets {
                        let p = Vec2::new(x as f32 + offset.x, y as f32 + offset.y);
                        let rgb = composite_sample(scene, &active, p, aa);
                        acc[0] += rgb[0];
                        acc[1] += rgb[1];
                        acc[2] += rgb[2];
                    }

                    let out = &mut row[x * 3..x * 3 + 3];
                    out[0] = acc[0] * inv_samples;
                    out[1] = acc[1] * inv_samples;
                    out[2] = acc[2] * inv_samples;
                }
            });

        Ok(pixels)
    }
}

/// Composite all active shapes at one sample point.
fn composite_sample(scene: &Scene, active: &[usize], p: Vec2, aa: f32) -> [f32; 3] {
    let bg = scene.background;
    let mut color = [bg.r, bg.g, bg.b];
    for &k in active {
        let shape = &scene.shapes[k];
        let (sd, _) = shape.path.signed_distance(p, scene.fill_rule);
        let coverage = sdf_coverage(sd, aa);
        if coverage <= 0.0 {
            continue;
        }
        let alpha = shape.fill.a.clamp(0.0, 1.0) * coverage;
        color[0] = color[0] * (1.0 - alpha) + shape.fill.r * alpha;
        color[1] = color[1] * (1.0 - alpha) + shape.fill.g * alpha;
        color[2] = color[2] * (1.0 - alpha) + shape.fill.b * alpha;
    }
    color
}

/// Smoothstep coverage over the antialias band around the boundary.
pub(crate) fn sdf_coverage(sd: f32, aa: f32) -> f32 {
    if aa > 0.0 {
        let t = ((sd + aa) / (2.0 * aa)).clamp(0.0, 1.0);
        1.0 - t * t * (3.0 - 2.0 * t)
    } else if sd < 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Derivative of [`sdf_coverage`] with respect to the signed distance.
pub(crate) fn sdf_coverage_deriv(sd: f32, aa: f32) -> f32 {
    if aa > 0.0 {
        let t = ((sd + aa) / (2.0 * aa)).clamp(0.0, 1.0);
        -(6.0 * t * (1.0 - t)) / (2.0 * aa)
    } else {
        0.0
    }
}

/// Stratified subpixel sample offsets within one pixel.
pub(crate) fn sample_offsets(samples: u32) -> Vec<Vec2> {
    let inv = 1.0 / samples as f32;
    let mut offsets = Vec::with_capacity((samples * samples) as usize);
    for sy in 0..samples {
        for sx in 0..samples {
            offsets.push(Vec2::new(
                (sx as f32 + 0.5) * inv,
                (sy as f32 + 0.5) * inv,
            ));
        }
    }
    offsets
}

/// Inclusive pixel-space bounds a shape can influence.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PixelBounds {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

impl PixelBounds {
    pub(crate) fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// Per-shape bounds dilated by the antialias band and sample extent.
pub(crate) fn shape_pixel_bounds(scene: &Scene, aa: f32) -> Vec<PixelBounds> {
    let margin = aa + 1.0;
    (0..scene.num_shapes())
        .map(|k| {
            let (min, max) = scene.shape_bounds(k, margin);
            PixelBounds {
                x0: min.x.floor() as i32,
                y0: min.y.floor() as i32,
                x1: max.x.ceil() as i32,
                y1: max.y.ceil() as i32,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vgfit_core::Rgba;
    use vgfit_scene::{PathGeometry, Shape};

    /// Scene with one shape filling the left half of a 16x16 canvas.
    fn half_canvas_scene() -> Scene {
        // Triangle-free rectangle: bottom edge, right edge at x=8, top edge;
        // the implicit closure is the left edge at x=0.
        let path = PathGeometry::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(8.0, 0.0),
            Vec2::new(8.0, 5.0),
            Vec2::new(8.0, 11.0),
            Vec2::new(8.0, 16.0),
            Vec2::new(5.0, 16.0),
            Vec2::new(3.0, 16.0),
            Vec2::new(0.0, 16.0),
        ])
        .unwrap();
        let mut scene = Scene::new(16, 16, Rgba::WHITE);
        scene.shapes.push(Shape {
            path,
            fill: Rgba::new(0.0, 0.0, 0.0, 1.0),
        });
        scene
    }

    #[test]
    fn test_sdf_coverage_limits() {
        assert_relative_eq!(sdf_coverage(-5.0, 1.0), 1.0);
        assert_relative_eq!(sdf_coverage(5.0, 1.0), 0.0);
        assert_relative_eq!(sdf_coverage(0.0, 1.0), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_sdf_coverage_monotone() {
        let mut prev = sdf_coverage(-2.0, 1.0);
        for i in 1..=40 {
            let sd = -2.0 + i as f32 * 0.1;
            let cov = sdf_coverage(sd, 1.0);
            assert!(cov <= prev + 1e-6);
            prev = cov;
        }
    }

    #[test]
    fn test_sdf_coverage_deriv_matches_finite_diff() {
        let aa = 1.5;
        let h = 1e-3;
        for &sd in &[-1.2f32, -0.4, 0.0, 0.3, 1.1] {
            let numeric = (sdf_coverage(sd + h, aa) - sdf_coverage(sd - h, aa)) / (2.0 * h);
            let analytic = sdf_coverage_deriv(sd, aa);
            assert_relative_eq!(analytic, numeric, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_hard_coverage_when_aa_zero() {
        assert_relative_eq!(sdf_coverage(-0.1, 0.0), 1.0);
        assert_relative_eq!(sdf_coverage(0.1, 0.0), 0.0);
        assert_relative_eq!(sdf_coverage_deriv(0.1, 0.0), 0.0);
    }

    #[test]
    fn test_sample_offsets_grid() {
        let offsets = sample_offsets(2);
        assert_eq!(offsets.len(), 4);
        assert_relative_eq!(offsets[0].x, 0.25);
        assert_relative_eq!(offsets[3].y, 0.75);

        let single = sample_offsets(1);
        assert_relative_eq!(single[0].x, 0.5);
    }

    #[test]
    fn test_render_half_black_half_white() {
        let scene = half_canvas_scene();
        let renderer = Renderer::new(RenderConfig::default()).unwrap();
        let pixels = renderer.render(&scene).unwrap();
        assert_eq!(pixels.len(), 16 * 16 * 3);

        // Deep inside the shape: black.
        let inside = 3 * (8 * 16 + 3);
        assert!(pixels[inside] < 0.05);
        // Far outside: background white.
        let outside = 3 * (8 * 16 + 14);
        assert!(pixels[outside] > 0.95);
        // Pixels straddling the x=8 boundary: partial coverage on both sides.
        let edge_in = 3 * (8 * 16 + 7);
        assert!(pixels[edge_in] > 0.05 && pixels[edge_in] < 0.5);
        let edge_out = 3 * (8 * 16 + 8);
        assert!(pixels[edge_out] > 0.5 && pixels[edge_out] < 0.95);
    }

    #[test]
    fn test_render_alpha_blends_toward_background() {
        let mut scene = half_canvas_scene();
        scene.shapes[0].fill = Rgba::new(0.0, 0.0, 0.0, 0.5);
        let renderer = Renderer::new(RenderConfig::default()).unwrap();
        let pixels = renderer.render(&scene).unwrap();
        let inside = 3 * (8 * 16 + 3);
        assert_relative_eq!(pixels[inside], 0.5, epsilon = 0.05);
    }

    #[test]
    fn test_painter_order_respected() {
        // Two overlapping full-canvas shapes: the later one wins.
        let mut scene = half_canvas_scene();
        let mut red = scene.shapes[0].clone();
        red.fill = Rgba::new(1.0, 0.0, 0.0, 1.0);
        scene.shapes.push(red);
        let renderer = Renderer::new(RenderConfig::default()).unwrap();
        let pixels = renderer.render(&scene).unwrap();
        let inside = 3 * (8 * 16 + 3);
        assert!(pixels[inside] > 0.9); // red channel
        assert!(pixels[inside + 1] < 0.1); // green channel
    }

    #[test]
    fn test_render_rejects_invalid_scene() {
        let scene = Scene::new(0, 4, Rgba::WHITE);
        let renderer = Renderer::new(RenderConfig::default()).unwrap();
        assert!(renderer.render(&scene).is_err());
    }
}
