// this_file: crates/vgfit-svg/src/lib.rs

//! SVG serialization for fitted scenes.

pub mod writer;

pub use writer::SvgWriter;
