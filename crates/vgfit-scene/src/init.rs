// this_file: crates/vgfit-scene/src/init.rs

//! Random scene initialization.
//!
//! Every control point lands uniformly on the canvas; fills get a uniform
//! random RGB with alpha fixed at 0.5 so early iterations can blend before
//! opacity specializes.

use crate::path::PathGeometry;
use crate::rng::Pcg32;
use crate::scene::{Scene, Shape};
use crate::vec2::Vec2;
use vgfit_core::Rgba;

const INIT_STREAM: u64 = 0xda3e39cb94b95bdb;
const INIT_ALPHA: f32 = 0.5;

/// Build a random scene of `paths` open cubic paths on a canvas.
pub fn random_scene(
    width: u32,
    height: u32,
    paths: usize,
    segments: usize,
    seed: u64,
    background: Rgba,
) -> Scene {
    let mut rng = Pcg32::new(seed, INIT_STREAM);
    let mut scene = Scene::new(width, height, background);
    scene.shapes.reserve(paths);

    let (w, h) = (width as f32, height as f32);
    let num_points = 3 * segments + 1;

    for _ in 0..paths {
        let points = (0..num_points)
            .map(|_| Vec2::new(rng.uniform(0.0, w), rng.uniform(0.0, h)))
            .collect();
        // Counts are fixed at 3k+1 by construction.
        let path = PathGeometry::new(points).expect("generated control-point count is valid");

        let fill = Rgba::new(
            rng.next_f32(),
            rng.next_f32(),
            rng.next_f32(),
            INIT_ALPHA,
        );
        scene.shapes.push(Shape { path, fill });
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_shape_counts() {
        let scene = random_scene(64, 32, 10, 2, 4, Rgba::WHITE);
        assert_eq!(scene.num_shapes(), 10);
        for shape in &scene.shapes {
            assert_eq!(shape.path.num_points(), 7);
            assert_eq!(shape.path.num_segments(), 2);
        }
    }

    #[test]
    fn test_points_inside_canvas() {
        let scene = random_scene(100, 50, 32, 1, 7, Rgba::WHITE);
        for shape in &scene.shapes {
            for p in shape.path.points() {
                assert!((0.0..100.0).contains(&p.x));
                assert!((0.0..50.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn test_same_seed_same_scene() {
        let a = random_scene(64, 64, 8, 1, 123, Rgba::WHITE);
        let b = random_scene(64, 64, 8, 1, 123, Rgba::WHITE);
        for (sa, sb) in a.shapes.iter().zip(&b.shapes) {
            assert_eq!(sa.path, sb.path);
            assert_eq!(sa.fill, sb.fill);
        }
    }

    #[test]
    fn test_different_seed_different_scene() {
        let a = random_scene(64, 64, 4, 1, 1, Rgba::WHITE);
        let b = random_scene(64, 64, 4, 1, 2, Rgba::WHITE);
        assert_ne!(a.shapes[0].path, b.shapes[0].path);
    }

    #[test]
    fn test_initial_alpha_is_half() {
        let scene = random_scene(32, 32, 4, 1, 9, Rgba::WHITE);
        for shape in &scene.shapes {
            assert_eq!(shape.fill.a, 0.5);
        }
    }
}
