// this_file: crates/vgfit-render/src/lib.rs

//! Differentiable rasterization: forward rendering, loss, and gradients.

pub mod grad;
pub mod loss;
pub mod raster;

pub use grad::{render_backward, SceneGrads};
pub use loss::{mse, mse_grad};
pub use raster::Renderer;
