// this_file: crates/vgfit-svg/src/writer.rs

//! SVG document writer for fitted scenes.
//!
//! Shapes are emitted in painter's order as filled `<path>` elements, one
//! `C` command per cubic segment. Open paths rely on SVG's implicit fill
//! closure, which matches how the rasterizer treats them.

use std::fmt::Write;
use vgfit_core::Rgba;
use vgfit_scene::{FillRule, Scene, Shape};

/// SVG writer with a fixed coordinate precision.
pub struct SvgWriter {
    precision: usize,
}

impl Default for SvgWriter {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

impl SvgWriter {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    /// Serialize the scene into an SVG document string.
    pub fn render(&self, scene: &Scene) -> String {
        let mut svg = String::with_capacity(128 + scene.num_shapes() * 160);

        let _ = write!(
            &mut svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = scene.width,
            h = scene.height
        );
        svg.push('\n');

        if scene.background != Rgba::WHITE {
            let _ = write!(
                &mut svg,
                r#"  <rect width="{w}" height="{h}" fill="{fill}"/>"#,
                w = scene.width,
                h = scene.height,
                fill = scene.background.to_hex_rgb()
            );
            svg.push('\n');
        }

        svg.push_str(r#"  <g id="paths">"#);
        svg.push('\n');

        for shape in &scene.shapes {
            let _ = write!(
                &mut svg,
                r#"    <path d="{d}" fill="{fill}""#,
                d = self.path_data(shape),
                fill = shape.fill.to_hex_rgb()
            );
            if shape.fill.a < 1.0 {
                let _ = write!(&mut svg, r#" fill-opacity="{:.3}""#, shape.fill.a);
            }
            if scene.fill_rule == FillRule::EvenOdd {
                svg.push_str(r#" fill-rule="evenodd""#);
            }
            svg.push_str("/>\n");
        }

        svg.push_str("  </g>\n</svg>\n");
        svg
    }

    /// Build the `d` attribute for one shape.
    fn path_data(&self, shape: &Shape) -> String {
        let p = self.precision;
        let points = shape.path.points();
        let mut d = String::with_capacity(points.len() * 16);

        let _ = write!(&mut d, "M{:.p$} {:.p$}", points[0].x, points[0].y);
        for seg in points[1..].chunks_exact(3) {
            let _ = write!(
                &mut d,
                " C{:.p$} {:.p$}, {:.p$} {:.p$}, {:.p$} {:.p$}",
                seg[0].x, seg[0].y, seg[1].x, seg[1].y, seg[2].x, seg[2].y
            );
        }
        d
    }
}
