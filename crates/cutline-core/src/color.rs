//! Display colors carried on timeline clips.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CutlineError;

/// 8-bit sRGB color, serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from 8-bit components.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self, CutlineError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(CutlineError::InvalidParameter(format!(
                "invalid hex color: {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| CutlineError::InvalidParameter(format!("invalid hex color: {hex:?}")))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    // Clip palette
    pub const VIOLET: Self = Self::rgb(0x8b, 0x5c, 0xf6);
    pub const EMERALD: Self = Self::rgb(0x10, 0xb9, 0x81);
    pub const BLUE: Self = Self::rgb(0x3b, 0x82, 0xf6);
    pub const AMBER: Self = Self::rgb(0xea, 0xb3, 0x08);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = CutlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = CutlineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let c = Color::from_hex("#8b5cf6").unwrap();
        assert_eq!(c, Color::VIOLET);
        assert_eq!(c.to_hex(), "#8b5cf6");
        assert_eq!(Color::from_hex("10B981").unwrap(), Color::EMERALD);
    }

    #[test]
    fn test_invalid_hex() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Color::BLUE).unwrap();
        assert_eq!(json, "\"#3b82f6\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::BLUE);
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
