// config.rs - Scene settings from a TOML file plus flag overrides

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tree_engine::{SceneSettings, TreeColor};

#[derive(Args, Debug, Default)]
pub struct SceneArgs {
    /// TOML file with rotation_speed, particle_count, glow_intensity, tree_color
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// pink-gold, gold, green or rainbow
    #[arg(long)]
    pub color: Option<TreeColor>,

    #[arg(long)]
    pub particles: Option<u32>,

    #[arg(long)]
    pub glow: Option<f32>,

    /// Radians per frame
    #[arg(long)]
    pub rotation: Option<f32>,
}

impl SceneArgs {
    /// File values first, then flags; the result is validated.
    pub fn resolve(&self) -> Result<SceneSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                SceneSettings::from_toml_str(&text)
                    .with_context(|| format!("Invalid settings in {}", path.display()))?
            }
            None => SceneSettings::default(),
        };

        if let Some(color) = self.color {
            settings.tree_color = color;
        }
        if let Some(count) = self.particles {
            settings.particle_count = count;
        }
        if let Some(glow) = self.glow {
            settings.glow_intensity = glow;
        }
        if let Some(speed) = self.rotation {
            settings.rotation_speed = speed;
        }

        settings.validate()?;
        Ok(settings)
    }
}
