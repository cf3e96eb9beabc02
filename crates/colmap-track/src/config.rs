use std::str::FromStr;

use serde::{Deserialize, Serialize};

use colmap_track_3d::camera::DEFAULT_SENSOR_WIDTH_MM;
use colmap_track_3d::trajectory::DEFAULT_SCALE;

use crate::ImportError;

/// Default timeline frame rate.
pub const DEFAULT_FPS: u32 = 24;

/// Settings of a scene import.
///
/// Missing fields fall back to their defaults when deserialized, so a partial
/// JSON document such as `{"fps": 30}` is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Physical sensor width used for the focal length conversion and as aperture.
    pub sensor_width_mm: f64,
    /// Uniform scale applied to camera positions and points.
    pub scale: f64,
    /// Timeline frame rate; one image per frame.
    pub fps: u32,
    /// Whether points3D.txt is read and converted.
    pub include_points: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            sensor_width_mm: DEFAULT_SENSOR_WIDTH_MM,
            scale: DEFAULT_SCALE,
            fps: DEFAULT_FPS,
            include_points: true,
        }
    }
}

impl ImportConfig {
    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<(), ImportError> {
        if !self.sensor_width_mm.is_finite() || self.sensor_width_mm <= 0.0 {
            return Err(ImportError::InvalidConfig(format!(
                "sensor width must be positive, got {}",
                self.sensor_width_mm
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ImportError::InvalidConfig(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if self.fps == 0 {
            return Err(ImportError::InvalidConfig(
                "frame rate must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Common video frame rates and the integer timeline rate used for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpsPreset {
    /// 23.976 fps film pulldown
    Fps23_98,
    /// 24 fps
    Fps24,
    /// 25 fps
    Fps25,
    /// 29.97 fps NTSC
    Fps29_97,
    /// 30 fps
    Fps30,
    /// 48 fps
    Fps48,
    /// 50 fps
    Fps50,
    /// 59.94 fps NTSC
    Fps59_94,
    /// 60 fps
    Fps60,
    /// 100 fps
    Fps100,
    /// 120 fps
    Fps120,
}

impl FpsPreset {
    /// All presets in ascending rate order.
    pub const ALL: [FpsPreset; 11] = [
        FpsPreset::Fps23_98,
        FpsPreset::Fps24,
        FpsPreset::Fps25,
        FpsPreset::Fps29_97,
        FpsPreset::Fps30,
        FpsPreset::Fps48,
        FpsPreset::Fps50,
        FpsPreset::Fps59_94,
        FpsPreset::Fps60,
        FpsPreset::Fps100,
        FpsPreset::Fps120,
    ];

    /// The label of the preset, e.g. `"29.97"`.
    pub fn label(&self) -> &'static str {
        match self {
            FpsPreset::Fps23_98 => "23.98",
            FpsPreset::Fps24 => "24",
            FpsPreset::Fps25 => "25",
            FpsPreset::Fps29_97 => "29.97",
            FpsPreset::Fps30 => "30",
            FpsPreset::Fps48 => "48",
            FpsPreset::Fps50 => "50",
            FpsPreset::Fps59_94 => "59.94",
            FpsPreset::Fps60 => "60",
            FpsPreset::Fps100 => "100",
            FpsPreset::Fps120 => "120",
        }
    }

    /// The integer timeline rate; fractional NTSC rates round up.
    pub fn timeline_fps(&self) -> u32 {
        match self {
            FpsPreset::Fps23_98 | FpsPreset::Fps24 => 24,
            FpsPreset::Fps25 => 25,
            FpsPreset::Fps29_97 | FpsPreset::Fps30 => 30,
            FpsPreset::Fps48 => 48,
            FpsPreset::Fps50 => 50,
            FpsPreset::Fps59_94 | FpsPreset::Fps60 => 60,
            FpsPreset::Fps100 => 100,
            FpsPreset::Fps120 => 120,
        }
    }
}

impl FromStr for FpsPreset {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Self::ALL
            .into_iter()
            .find(|preset| preset.label() == label)
            .ok_or_else(|| ImportError::InvalidConfig(format!("unknown fps preset: {s}")))
    }
}
