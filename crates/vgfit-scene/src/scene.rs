// this_file: crates/vgfit-scene/src/scene.rs

//! Scene: canvas, background, and an ordered list of filled shapes.

use crate::path::PathGeometry;
use crate::vec2::Vec2;
use serde::{Deserialize, Serialize};
use vgfit_core::{Error, Result, Rgba};

/// Fill rule applied to every shape in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl std::str::FromStr for FillRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nonzero" => Ok(FillRule::NonZero),
            "evenodd" => Ok(FillRule::EvenOdd),
            other => Err(Error::config(format!(
                "unknown fill rule '{other}' (expected 'nonzero' or 'evenodd')"
            ))),
        }
    }
}

/// A filled path with its color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub path: PathGeometry,
    pub fill: Rgba,
}

/// Ordered scene in painter's order: index 0 is drawn first (bottom).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Rgba,
    pub fill_rule: FillRule,
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            width,
            height,
            background,
            fill_rule: FillRule::default(),
            shapes: Vec::new(),
        }
    }

    pub fn num_shapes(&self) -> usize {
        self.shapes.len()
    }

    /// Total number of control points across all shapes.
    pub fn num_points(&self) -> usize {
        self.shapes.iter().map(|s| s.path.num_points()).sum()
    }

    /// Check canvas and per-shape invariants (used after deserialization).
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::config(format!(
                "scene canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        for (i, shape) in self.shapes.iter().enumerate() {
            shape
                .path
                .validate()
                .map_err(|e| Error::config(format!("shape {i}: {e}")))?;
        }
        Ok(())
    }

    /// Bounding box of shape `index`, dilated by `margin` pixels.
    pub fn shape_bounds(&self, index: usize, margin: f32) -> (Vec2, Vec2) {
        let (min, max) = self.shapes[index].path.bounding_box();
        (
            min - Vec2::new(margin, margin),
            max + Vec2::new(margin, margin),
        )
    }

    /// Clamp every fill color into [0, 1].
    pub fn clamp_colors(&mut self) {
        for shape in &mut self.shapes {
            shape.fill = shape.fill.clamped();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_path() -> PathGeometry {
        PathGeometry::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_fill_rule_parse() {
        assert_eq!("nonzero".parse::<FillRule>().unwrap(), FillRule::NonZero);
        assert_eq!("evenodd".parse::<FillRule>().unwrap(), FillRule::EvenOdd);
        assert!("winding".parse::<FillRule>().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_canvas() {
        let scene = Scene::new(0, 10, Rgba::WHITE);
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_clamp_colors() {
        let mut scene = Scene::new(4, 4, Rgba::WHITE);
        scene.shapes.push(Shape {
            path: unit_path(),
            fill: Rgba::new(1.5, -0.2, 0.5, 0.9),
        });
        scene.clamp_colors();
        assert_eq!(scene.shapes[0].fill, Rgba::new(1.0, 0.0, 0.5, 0.9));
    }

    #[test]
    fn test_shape_bounds_margin() {
        let mut scene = Scene::new(8, 8, Rgba::WHITE);
        scene.shapes.push(Shape {
            path: unit_path(),
            fill: Rgba::BLACK,
        });
        let (min, max) = scene.shape_bounds(0, 2.0);
        assert!(min.x <= -2.0 && min.y <= -2.0);
        assert!(max.x >= 5.0 && max.y >= 5.0);
    }

    #[test]
    fn test_scene_json_round_trip() {
        let mut scene = Scene::new(16, 9, Rgba::WHITE);
        scene.shapes.push(Shape {
            path: unit_path(),
            fill: Rgba::new(0.1, 0.2, 0.3, 0.4),
        });
        let json = serde_json::to_string(&scene).unwrap();
        let back: Scene = serde_json::from_str(&json).unwrap();
        assert!(back.validate().is_ok());
        assert_eq!(back.width, 16);
        assert_eq!(back.shapes.len(), 1);
    }
}
