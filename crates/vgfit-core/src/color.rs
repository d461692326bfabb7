// this_file: crates/vgfit-core/src/color.rs

//! Linear RGBA color and hex color parsing.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// RGBA color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub const BLACK: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Clamp every component into [0, 1].
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Convert to 8-bit channels, rounding.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Format the RGB part as a `#rrggbb` hex string.
    pub fn to_hex_rgb(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Parse a hex color string (`#rrggbb` or `#rrggbbaa`) or `transparent`.
pub fn parse_color(value: &str) -> Result<Rgba> {
    if value == "transparent" {
        return Ok(Rgba::new(0.0, 0.0, 0.0, 0.0));
    }

    let Some(hex) = value.strip_prefix('#') else {
        return Err(Error::InvalidColor {
            value: value.to_string(),
            reason: "expected '#rrggbb', '#rrggbbaa', or 'transparent'".to_string(),
        });
    };

    let channel = |range: std::ops::Range<usize>| -> Result<f32> {
        u8::from_str_radix(&hex[range], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|e| Error::InvalidColor {
                value: value.to_string(),
                reason: e.to_string(),
            })
    };

    match hex.len() {
        6 => Ok(Rgba::new(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            1.0,
        )),
        8 => Ok(Rgba::new(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        n => Err(Error::InvalidColor {
            value: value.to_string(),
            reason: format!("expected 6 or 8 hex digits, got {n}"),
        }),
    }
}
