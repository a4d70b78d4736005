//! Colour type and the built-in palettes of the three scene variants

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// sRGB colour with a straight (non-premultiplied) alpha in `0.0..=1.0`.
///
/// Serialized as a hex string (`#rrggbb` or `#rrggbbaa`).
/// The default is fully transparent black.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with alpha replaced, clamped to `0.0..=1.0`.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: clamp_unit(a), ..self }
    }

    /// Alpha as a byte, for hosts that want `u8` channels
    #[inline]
    pub fn alpha_u8(&self) -> u8 {
        (self.a * 255.0).round() as u8
    }

    /// CSS `rgba()` notation for canvas and style hosts.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
    }

    pub fn to_hex(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.alpha_u8())
        }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || ConfigError::InvalidColor(s.to_string());

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());

        match hex.len() {
            3 => {
                let nib = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| bad())
                };
                Ok(Self::rgb(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)? as f32 / 255.0)),
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Built-in colours
pub mod colors {
    use super::Rgba;

    // === Backgrounds ===
    pub const BG_WHITE: Rgba = Rgba::rgb(255, 255, 255);       // #ffffff
    pub const BG_CLEAR: Rgba = Rgba::rgba(0, 0, 0, 0.0);        // transparent, for DOM overlays

    // === Network ===
    pub const NODE: Rgba = Rgba::rgb(39, 56, 109);              // #27386d - node fill and glow
    pub const EDGE: Rgba = Rgba::rgb(40, 60, 85);               // #283c55 - resting connections
    pub const EDGE_HOT: Rgba = Rgba::rgb(30, 50, 100);          // #1e3264 - hovered connections and dots
    pub const HIGHLIGHT: Rgba = Rgba::rgb(255, 255, 255);       // inner specular dot

    // === Stream ===
    pub const STREAM: Rgba = Rgba::rgb(54, 87, 134);            // #365786 - glyphs and card borders

    // === Pellets ===
    pub const PELLETS: [Rgba; 5] = [
        Rgba::rgb(253, 251, 253), // #fdfbfd - bleached white
        Rgba::rgb(235, 224, 204), // #ebe0cc - sand
        Rgba::rgb(179, 209, 214), // #b3d1d6 - sea glass
        Rgba::rgb(152, 198, 226), // #98c6e2 - shallow blue
        Rgba::rgb(43, 56, 105),   // #2b3869 - deep navy
    ];
}
