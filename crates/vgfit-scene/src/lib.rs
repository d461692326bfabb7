// this_file: crates/vgfit-scene/src/lib.rs

//! Scene model and differentiable-friendly Bezier geometry for vgfit.

pub mod bezier;
pub mod init;
pub mod path;
pub mod rng;
pub mod scene;
pub mod vec2;

pub use bezier::{solve_cubic, solve_quadratic, CubicSegment};
pub use init::random_scene;
pub use path::{BoundaryElement, ClosestBoundary, PathGeometry};
pub use rng::Pcg32;
pub use scene::{FillRule, Scene, Shape};
pub use vec2::Vec2;
