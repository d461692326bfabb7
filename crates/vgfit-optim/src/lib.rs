// this_file: crates/vgfit-optim/src/lib.rs

//! Optimization: Adam and the raster-to-vector fitting session.

pub mod adam;
pub mod session;

pub use adam::Adam;
pub use session::{FitOutcome, FitSession};
