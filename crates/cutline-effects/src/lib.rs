//! Cutline Effects - Color adjustments, looks and subtitle requests
//!
//! Holds the effects panel state. Nothing here touches pixels: applying the
//! panel produces an [`EffectsRequest`] describing what should be rendered.

pub mod subtitle;

pub use subtitle::{SubtitlePosition, SubtitleRequest, SubtitleStyle};

use std::fmt;
use std::str::FromStr;

use cutline_core::{CutlineError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Effect parameter descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
    pub unit: &'static str,
    pub default: f32,
    pub min: f32,
    pub max: f32,
}

impl ParamDescriptor {
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// One of the panel's slider adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    Brightness,
    Contrast,
    Saturation,
    Blur,
}

impl Adjustment {
    pub const ALL: [Adjustment; 4] = [
        Self::Brightness,
        Self::Contrast,
        Self::Saturation,
        Self::Blur,
    ];

    pub fn descriptor(self) -> ParamDescriptor {
        let percent = |name, display_name| ParamDescriptor {
            name,
            display_name,
            unit: "%",
            default: 100.0,
            min: 0.0,
            max: 200.0,
        };
        match self {
            Self::Brightness => percent("brightness", "Brightness"),
            Self::Contrast => percent("contrast", "Contrast"),
            Self::Saturation => percent("saturation", "Saturation"),
            Self::Blur => ParamDescriptor {
                name: "blur",
                display_name: "Blur",
                unit: "px",
                default: 0.0,
                min: 0.0,
                max: 20.0,
            },
        }
    }
}

impl FromStr for Adjustment {
    type Err = CutlineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.descriptor().name.eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CutlineError::InvalidParameter(format!("unknown adjustment: {s:?}")))
    }
}

/// Slider values of the effects panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorAdjustments {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub blur: f32,
}

impl ColorAdjustments {
    pub const fn new(brightness: f32, contrast: f32, saturation: f32, blur: f32) -> Self {
        Self {
            brightness,
            contrast,
            saturation,
            blur,
        }
    }

    pub fn get(&self, adjustment: Adjustment) -> f32 {
        match adjustment {
            Adjustment::Brightness => self.brightness,
            Adjustment::Contrast => self.contrast,
            Adjustment::Saturation => self.saturation,
            Adjustment::Blur => self.blur,
        }
    }

    /// Set a value clamped to the adjustment's range; returns the stored value.
    pub fn set(&mut self, adjustment: Adjustment, value: f32) -> Result<f32> {
        if !value.is_finite() {
            return Err(CutlineError::InvalidParameter(format!(
                "{} must be a finite number",
                adjustment.descriptor().name
            )));
        }
        let value = adjustment.descriptor().clamp(value);
        let slot = match adjustment {
            Adjustment::Brightness => &mut self.brightness,
            Adjustment::Contrast => &mut self.contrast,
            Adjustment::Saturation => &mut self.saturation,
            Adjustment::Blur => &mut self.blur,
        };
        *slot = value;
        Ok(value)
    }

    /// Whether every value is at its default.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for ColorAdjustments {
    fn default() -> Self {
        Self::new(100.0, 100.0, 100.0, 0.0)
    }
}

// ── Looks ────────────────────────────────────────────────────────

/// One-click looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookPreset {
    Warm,
    Cool,
    BlackAndWhite,
    Vintage,
    Vibrant,
    Natural,
}

impl LookPreset {
    pub const ALL: [LookPreset; 6] = [
        Self::Warm,
        Self::Cool,
        Self::BlackAndWhite,
        Self::Vintage,
        Self::Vibrant,
        Self::Natural,
    ];

    pub fn adjustments(self) -> ColorAdjustments {
        match self {
            Self::Warm => ColorAdjustments::new(105.0, 105.0, 120.0, 0.0),
            Self::Cool => ColorAdjustments::new(100.0, 110.0, 85.0, 0.0),
            Self::BlackAndWhite => ColorAdjustments::new(100.0, 120.0, 0.0, 0.0),
            Self::Vintage => ColorAdjustments::new(95.0, 85.0, 70.0, 1.0),
            Self::Vibrant => ColorAdjustments::new(105.0, 115.0, 150.0, 0.0),
            Self::Natural => ColorAdjustments::default(),
        }
    }
}

impl fmt::Display for LookPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warm => "Warm",
            Self::Cool => "Cool",
            Self::BlackAndWhite => "Black & White",
            Self::Vintage => "Vintage",
            Self::Vibrant => "Vibrant",
            Self::Natural => "Natural",
        })
    }
}

impl FromStr for LookPreset {
    type Err = CutlineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warm" => Ok(Self::Warm),
            "cool" => Ok(Self::Cool),
            "black-and-white" | "bw" | "b&w" | "black & white" => Ok(Self::BlackAndWhite),
            "vintage" => Ok(Self::Vintage),
            "vibrant" => Ok(Self::Vibrant),
            "natural" => Ok(Self::Natural),
            other => Err(CutlineError::InvalidParameter(format!(
                "unknown look preset: {other:?}"
            ))),
        }
    }
}

// ── Panel ────────────────────────────────────────────────────────

/// What the caller should render when the panel is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectsRequest {
    pub adjustments: ColorAdjustments,
    /// Look the adjustments came from, if untouched since
    pub preset: Option<LookPreset>,
}

/// Effects panel state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectsPanel {
    adjustments: ColorAdjustments,
    preset: Option<LookPreset>,
}

impl EffectsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adjustments(&self) -> ColorAdjustments {
        self.adjustments
    }

    pub fn preset(&self) -> Option<LookPreset> {
        self.preset
    }

    /// Move a slider. A manual change detaches the panel from its look.
    pub fn set(&mut self, adjustment: Adjustment, value: f32) -> Result<f32> {
        let value = self.adjustments.set(adjustment, value)?;
        self.preset = None;
        debug!("Set {} to {}", adjustment.descriptor().name, value);
        Ok(value)
    }

    pub fn apply_preset(&mut self, preset: LookPreset) {
        self.adjustments = preset.adjustments();
        self.preset = Some(preset);
        debug!("Applied look '{}'", preset);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply(&self) -> EffectsRequest {
        info!(
            "Effects requested: brightness {} contrast {} saturation {} blur {}",
            self.adjustments.brightness,
            self.adjustments.contrast,
            self.adjustments.saturation,
            self.adjustments.blur
        );
        EffectsRequest {
            adjustments: self.adjustments,
            preset: self.preset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_descriptors() {
        let adj = ColorAdjustments::default();
        for a in Adjustment::ALL {
            assert_eq!(adj.get(a), a.descriptor().default);
        }
        assert!(adj.is_identity());
    }

    #[test]
    fn test_set_clamps() {
        let mut panel = EffectsPanel::new();
        assert_eq!(panel.set(Adjustment::Brightness, 250.0).unwrap(), 200.0);
        assert_eq!(panel.set(Adjustment::Saturation, -5.0).unwrap(), 0.0);
        assert_eq!(panel.set(Adjustment::Blur, 25.0).unwrap(), 20.0);
        assert!(panel.set(Adjustment::Contrast, f32::INFINITY).is_err());
        assert_eq!(panel.adjustments().contrast, 100.0);
    }

    #[test]
    fn test_presets_within_ranges() {
        for preset in LookPreset::ALL {
            let adj = preset.adjustments();
            for a in Adjustment::ALL {
                let d = a.descriptor();
                let v = adj.get(a);
                assert!(v >= d.min && v <= d.max, "{preset} {} = {v}", d.name);
            }
        }
        assert_eq!(LookPreset::BlackAndWhite.adjustments().saturation, 0.0);
        assert!(LookPreset::Natural.adjustments().is_identity());
    }

    #[test]
    fn test_manual_change_detaches_preset() {
        let mut panel = EffectsPanel::new();
        panel.apply_preset(LookPreset::Vintage);
        assert_eq!(panel.apply().preset, Some(LookPreset::Vintage));

        panel.set(Adjustment::Blur, 3.0).unwrap();
        let request = panel.apply();
        assert_eq!(request.preset, None);
        assert_eq!(request.adjustments.blur, 3.0);
        assert_eq!(request.adjustments.saturation, 70.0);

        panel.reset();
        assert!(panel.adjustments().is_identity());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("B&W".parse::<LookPreset>().unwrap(), LookPreset::BlackAndWhite);
        assert_eq!("blur".parse::<Adjustment>().unwrap(), Adjustment::Blur);
        assert!("sepia".parse::<LookPreset>().is_err());
    }

    #[test]
    fn test_request_serializes() {
        let mut panel = EffectsPanel::new();
        panel.apply_preset(LookPreset::BlackAndWhite);
        let json = serde_json::to_value(panel.apply()).unwrap();
        assert_eq!(json["preset"], "black-and-white");
        assert_eq!(json["adjustments"]["saturation"], 0.0);
    }
}
