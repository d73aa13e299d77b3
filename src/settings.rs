// settings.rs - Scene settings snapshot
//
// Produced by whatever UI sits on top (sliders in the browser, flags and a
// TOML file for treesnap). Only particle_count forces a rebuild; the other
// fields apply to the next frame.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::{Result, SceneError};

pub const ROTATION_SPEED_RANGE: (f32, f32) = (0.0, 0.05);
pub const PARTICLE_COUNT_RANGE: (u32, u32) = (500, 9000);
pub const GLOW_INTENSITY_RANGE: (f32, f32) = (0.0, 20.0);

#[wasm_bindgen]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TreeColor {
    #[default]
    PinkGold,
    Gold,
    Green,
    Rainbow,
}

impl TreeColor {
    pub fn as_str(self) -> &'static str {
        match self {
            TreeColor::PinkGold => "pink-gold",
            TreeColor::Gold => "gold",
            TreeColor::Green => "green",
            TreeColor::Rainbow => "rainbow",
        }
    }

    /// Cycle order used by the color button: pink-gold, green, rainbow, gold.
    pub fn next(self) -> Self {
        match self {
            TreeColor::PinkGold => TreeColor::Green,
            TreeColor::Green => TreeColor::Rainbow,
            TreeColor::Rainbow => TreeColor::Gold,
            TreeColor::Gold => TreeColor::PinkGold,
        }
    }
}

impl FromStr for TreeColor {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pink-gold" => Ok(TreeColor::PinkGold),
            "gold" => Ok(TreeColor::Gold),
            "green" => Ok(TreeColor::Green),
            "rainbow" => Ok(TreeColor::Rainbow),
            other => Err(SceneError::UnknownColor(other.to_string())),
        }
    }
}

impl fmt::Display for TreeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Radians added to the tree rotation every frame
    pub rotation_speed: f32,
    pub particle_count: u32,
    pub glow_intensity: f32,
    pub tree_color: TreeColor,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            rotation_speed: 0.003,
            particle_count: 9000,
            glow_intensity: 12.0,
            tree_color: TreeColor::PinkGold,
        }
    }
}

#[wasm_bindgen]
impl SceneSettings {
    #[wasm_bindgen(constructor)]
    pub fn new(
        rotation_speed: f32,
        particle_count: u32,
        glow_intensity: f32,
        tree_color: &str,
    ) -> std::result::Result<SceneSettings, JsValue> {
        let settings = SceneSettings {
            rotation_speed,
            particle_count,
            glow_intensity,
            tree_color: tree_color.parse()?,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl SceneSettings {
    pub fn validate(&self) -> Result<()> {
        check_range("rotation_speed", self.rotation_speed, ROTATION_SPEED_RANGE)?;
        check_range("glow_intensity", self.glow_intensity, GLOW_INTENSITY_RANGE)?;

        let (min, max) = PARTICLE_COUNT_RANGE;
        if !(min..=max).contains(&self.particle_count) {
            return Err(SceneError::OutOfRange {
                field: "particle_count",
                min: min as f64,
                max: max as f64,
                value: self.particle_count as f64,
            });
        }
        Ok(())
    }

    /// True when moving from `self` to `next` needs a full store rebuild.
    pub fn needs_rebuild(&self, next: &SceneSettings) -> bool {
        self.particle_count != next.particle_count
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: SceneSettings =
            toml::from_str(text).map_err(|e| SceneError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

fn check_range(field: &'static str, value: f32, (min, max): (f32, f32)) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(SceneError::OutOfRange {
            field,
            min: min as f64,
            max: max as f64,
            value: value as f64,
        })
    }
}
