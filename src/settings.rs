//! Frame geometry settings for the three layouts.
//!
//! The classic layouts (stacked, row) share one settings shape; the editorial
//! layout is percentage-driven with hard clamp ranges. All pixel values are
//! absolute except in [`BorderMode::Percent`], where `border` and `bottom`
//! become percentages of the photo width. Padding and font sizes are always
//! pixels.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("editorial percentage must be a finite number, got {0}")]
    NonFinitePercent(f64),
}

/// How `border` and `bottom` in [`ClassicSettings`] are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    #[default]
    Pixels,
    /// `border` and `bottom` are percentages of the photo width.
    Percent,
}

/// Settings for the stacked and row layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicSettings {
    pub mode: BorderMode,
    pub border: u32,
    pub bottom: u32,
    pub pad: u32,
    pub date_size: u32,
    pub title_size: u32,
}

impl Default for ClassicSettings {
    fn default() -> Self {
        Self {
            mode: BorderMode::Pixels,
            border: 80,
            bottom: 240,
            pad: 40,
            date_size: 60,
            title_size: 80,
        }
    }
}

/// Classic settings with percent mode already converted to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedClassic {
    pub border: u32,
    pub bottom: u32,
    pub pad: u32,
    pub date_size: u32,
    pub title_size: u32,
}

impl ClassicSettings {
    /// Convert to pixel values for a photo of the given width.
    pub fn resolve(&self, photo_w: u32) -> ResolvedClassic {
        let (border, bottom) = match self.mode {
            BorderMode::Pixels => (self.border, self.bottom),
            BorderMode::Percent => (
                percent_of(photo_w, self.border as f64),
                percent_of(photo_w, self.bottom as f64),
            ),
        };
        ResolvedClassic {
            border,
            bottom,
            pad: self.pad,
            date_size: self.date_size,
            title_size: self.title_size,
        }
    }
}

/// Settings for the editorial layout.
///
/// `side_percent` is relative to the photo width; `top_percent` and
/// `bottom_percent` are relative to the photo height. The asymmetry is
/// intentional: side margins track the dominant dimension of landscape
/// photographs, the caption band tracks height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditorialSettings {
    pub side_percent: f64,
    pub top_percent: f64,
    pub bottom_percent: f64,
}

impl Default for EditorialSettings {
    fn default() -> Self {
        Self {
            side_percent: 3.0,
            top_percent: 1.0,
            bottom_percent: 14.0,
        }
    }
}

impl EditorialSettings {
    /// Clamp every percentage into its allowed range.
    pub fn clamped(&self) -> Self {
        Self {
            side_percent: self.side_percent.clamp(2.0, 4.0),
            top_percent: self.top_percent.clamp(0.0, 2.0),
            bottom_percent: self.bottom_percent.clamp(12.0, 16.0),
        }
    }
}

/// Which frame layout to render, with its settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum RenderSettings {
    Stacked(ClassicSettings),
    Row(ClassicSettings),
    Editorial(EditorialSettings),
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings::Stacked(ClassicSettings::default())
    }
}

impl RenderSettings {
    /// Reject settings the layout engine cannot consume.
    ///
    /// Classic settings are unsigned integers and always valid; editorial
    /// percentages must be finite (clamping handles out-of-range values).
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let RenderSettings::Editorial(e) = self {
            for v in [e.side_percent, e.top_percent, e.bottom_percent] {
                if !v.is_finite() {
                    return Err(SettingsError::NonFinitePercent(v));
                }
            }
        }
        Ok(())
    }
}

fn percent_of(base: u32, percent: f64) -> u32 {
    (base as f64 * percent / 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_mode_resolves_unchanged() {
        let settings = ClassicSettings::default();
        let resolved = settings.resolve(1000);
        assert_eq!(resolved.border, 80);
        assert_eq!(resolved.bottom, 240);
        assert_eq!(resolved.pad, 40);
    }

    #[test]
    fn percent_mode_scales_border_and_bottom_only() {
        let settings = ClassicSettings {
            mode: BorderMode::Percent,
            border: 8,
            bottom: 24,
            pad: 40,
            ..ClassicSettings::default()
        };
        let resolved = settings.resolve(1000);
        assert_eq!(resolved.border, 80);
        assert_eq!(resolved.bottom, 240);
        // Padding and font sizes stay in pixels.
        assert_eq!(resolved.pad, 40);
        assert_eq!(resolved.date_size, 60);
    }

    #[test]
    fn percent_mode_rounds_half_up() {
        let settings = ClassicSettings {
            mode: BorderMode::Percent,
            border: 3,
            bottom: 14,
            ..ClassicSettings::default()
        };
        // 3% of 1015 = 30.45 → 30; 14% of 1015 = 142.1 → 142
        let resolved = settings.resolve(1015);
        assert_eq!(resolved.border, 30);
        assert_eq!(resolved.bottom, 142);
    }

    #[test]
    fn editorial_clamps_into_range() {
        let clamped = EditorialSettings {
            side_percent: 10.0,
            top_percent: -1.0,
            bottom_percent: 5.0,
        }
        .clamped();
        assert_eq!(clamped.side_percent, 4.0);
        assert_eq!(clamped.top_percent, 0.0);
        assert_eq!(clamped.bottom_percent, 12.0);
    }

    #[test]
    fn editorial_defaults_are_inside_clamp_ranges() {
        let defaults = EditorialSettings::default();
        assert_eq!(defaults.clamped(), defaults);
    }

    #[test]
    fn validate_rejects_non_finite_percent() {
        let settings = RenderSettings::Editorial(EditorialSettings {
            side_percent: f64::NAN,
            ..EditorialSettings::default()
        });
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(RenderSettings::default().validate().is_ok());
        let editorial = RenderSettings::Editorial(EditorialSettings::default());
        assert!(editorial.validate().is_ok());
    }
}
