//! Fixed compression presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::resize::ResizeBox;

/// Named size/quality presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetSize {
    Small,
    Medium,
    Large,
}

/// The resize box and quality a preset stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSettings {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub quality: u8,
}

impl PresetSettings {
    pub fn resize_box(&self) -> ResizeBox {
        ResizeBox::new(self.max_width, self.max_height)
    }
}

impl PresetSize {
    pub const ALL: [PresetSize; 3] = [PresetSize::Small, PresetSize::Medium, PresetSize::Large];

    pub fn settings(self) -> PresetSettings {
        match self {
            PresetSize::Small => PresetSettings {
                max_width: Some(1280),
                max_height: None,
                quality: 60,
            },
            PresetSize::Medium => PresetSettings {
                max_width: Some(1920),
                max_height: None,
                quality: 75,
            },
            PresetSize::Large => PresetSettings {
                max_width: None,
                max_height: None,
                quality: 85,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PresetSize::Small => "small",
            PresetSize::Medium => "medium",
            PresetSize::Large => "large",
        }
    }
}

impl fmt::Display for PresetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetSize {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(PresetSize::Small),
            "medium" => Ok(PresetSize::Medium),
            "large" => Ok(PresetSize::Large),
            other => Err(UnknownPreset(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown preset: {0}")]
pub struct UnknownPreset(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_table() {
        assert_eq!(
            PresetSize::Small.settings(),
            PresetSettings {
                max_width: Some(1280),
                max_height: None,
                quality: 60
            }
        );
        assert_eq!(PresetSize::Medium.settings().max_width, Some(1920));
        assert_eq!(PresetSize::Medium.settings().quality, 75);
        assert_eq!(PresetSize::Large.settings().resize_box(), ResizeBox::unbounded());
        assert_eq!(PresetSize::Large.settings().quality, 85);
    }

    #[test]
    fn test_every_preset_has_valid_settings() {
        for preset in PresetSize::ALL {
            let settings = preset.settings();
            assert!((1..=100).contains(&settings.quality), "{preset}");
            assert!(settings.max_height.is_none(), "{preset}");
            assert_eq!(preset.as_str().parse::<PresetSize>(), Ok(preset));
        }
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("Small".parse::<PresetSize>(), Ok(PresetSize::Small));
        assert_eq!(
            "tiny".parse::<PresetSize>(),
            Err(UnknownPreset("tiny".to_string()))
        );
    }
}
