//! Loading a [`VortexConfig`] from a TOML file or a named preset.
//!
//! Lookup order: the file named by `VORTEX_CONFIG`, then `vortex.toml` in the
//! working directory, then the preset named by `VORTEX_PRESET`, then defaults.
//! A file may set `preset = "landing"`; its other keys override that preset.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::VortexError;
use crate::types::{Preset, ResizePolicy, VortexConfig};

pub const CONFIG_ENV: &str = "VORTEX_CONFIG";
pub const PRESET_ENV: &str = "VORTEX_PRESET";
pub const DEFAULT_CONFIG_FILE: &str = "vortex.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    preset: Preset,
    background_color: Option<String>,
    particle_count: Option<usize>,
    particle_size: Option<f32>,
    default_speed: Option<f32>,
    base_hue: Option<f32>,
    range_hue: Option<f32>,
    range_y: Option<f32>,
    range_speed: Option<f32>,
    resize_policy: Option<ResizePolicy>,
    seed: Option<u64>,
}

impl SettingsFile {
    fn into_config(self) -> VortexConfig {
        let base = self.preset.config();
        VortexConfig {
            background_color: self.background_color.unwrap_or(base.background_color),
            particle_count: self.particle_count.unwrap_or(base.particle_count),
            particle_size: self.particle_size.unwrap_or(base.particle_size),
            default_speed: self.default_speed.unwrap_or(base.default_speed),
            base_hue: self.base_hue.unwrap_or(base.base_hue),
            range_hue: self.range_hue.unwrap_or(base.range_hue),
            range_y: self.range_y.unwrap_or(base.range_y),
            range_speed: self.range_speed.unwrap_or(base.range_speed),
            resize_policy: self.resize_policy.unwrap_or(base.resize_policy),
            seed: self.seed.or(base.seed),
        }
    }
}

/// Parses and validates a settings document. `origin` is only used in errors.
pub fn parse_config(text: &str, origin: &Path) -> Result<VortexConfig, VortexError> {
    let file: SettingsFile = toml::from_str(text).map_err(|source| VortexError::ConfigParse {
        path: origin.to_path_buf(),
        source,
    })?;
    let config = file.into_config();
    config.validate()?;
    Ok(config)
}

pub fn load_file(path: &Path) -> Result<VortexConfig, VortexError> {
    let text = std::fs::read_to_string(path).map_err(|source| VortexError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text, path)
}

/// Resolves the configuration from the environment and working directory.
pub fn load() -> Result<VortexConfig, VortexError> {
    let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let preset = std::env::var(PRESET_ENV).ok();
    resolve(env_path, preset.as_deref(), Path::new(DEFAULT_CONFIG_FILE))
}

fn resolve(
    env_path: Option<PathBuf>,
    preset: Option<&str>,
    default_file: &Path,
) -> Result<VortexConfig, VortexError> {
    if let Some(path) = env_path {
        info!(path = %path.display(), "loading vortex config");
        return load_file(&path);
    }

    if default_file.is_file() {
        info!(path = %default_file.display(), "loading vortex config");
        return load_file(default_file);
    }

    let preset = match preset {
        Some(name) => name.parse::<Preset>()?,
        None => Preset::Default,
    };
    debug!(preset = preset.name(), "no config file, using preset");
    let config = preset.config();
    config.validate()?;
    Ok(config)
}
