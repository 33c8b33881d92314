use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::VortexError;

/// Upper bound on `particle_count`.
pub const MAX_PARTICLES: usize = 1_000_000;

/// What the animator does with the particle pool when the canvas changes size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePolicy {
    /// Keep every particle; only the wrap bounds change.
    #[default]
    Keep,
    /// Discard the pool and seed a fresh one over the new extent.
    Reseed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VortexConfig {
    pub background_color: String,
    pub particle_count: usize,
    pub particle_size: f32,
    pub default_speed: f32,
    pub base_hue: f32,
    pub range_hue: f32,
    pub range_y: f32,
    pub range_speed: f32,
    pub resize_policy: ResizePolicy,
    /// Seeds both the particle RNG and the noise field. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for VortexConfig {
    fn default() -> Self {
        Self {
            background_color: "#111111".to_owned(),
            particle_count: 700,
            particle_size: 1.5,
            default_speed: 3.0,
            base_hue: 220.0,
            range_hue: 60.0,
            range_y: 100.0,
            range_speed: 1.0,
            resize_policy: ResizePolicy::Keep,
            seed: None,
        }
    }
}

impl VortexConfig {
    /// Checks every precondition the animator relies on and returns the
    /// parsed background color.
    pub fn validate(&self) -> Result<Rgba, VortexError> {
        let finite = [
            ("particle_size", self.particle_size),
            ("default_speed", self.default_speed),
            ("base_hue", self.base_hue),
            ("range_hue", self.range_hue),
            ("range_y", self.range_y),
            ("range_speed", self.range_speed),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(VortexError::invalid(field, format!("{value} is not finite")));
            }
        }

        let non_negative = [
            ("particle_size", self.particle_size),
            ("default_speed", self.default_speed),
            ("range_hue", self.range_hue),
            ("range_speed", self.range_speed),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(VortexError::invalid(field, format!("{value} is negative")));
            }
        }

        if self.range_y <= 0.0 {
            return Err(VortexError::invalid(
                "range_y",
                format!("{} must be greater than zero", self.range_y),
            ));
        }

        if self.particle_count > MAX_PARTICLES {
            return Err(VortexError::invalid(
                "particle_count",
                format!("{} exceeds {MAX_PARTICLES}", self.particle_count),
            ));
        }

        self.background_color
            .parse::<Rgba>()
            .map_err(|err| VortexError::invalid("background_color", err.to_string()))
    }
}

/// Configurations the landing and dashboard pages mount the field with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    Default,
    /// Full-screen hero background of the landing page.
    Landing,
    /// Backdrop behind the search dashboard.
    Dashboard,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Default, Preset::Landing, Preset::Dashboard];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Landing => "landing",
            Preset::Dashboard => "dashboard",
        }
    }

    pub fn config(self) -> VortexConfig {
        let base = VortexConfig::default();
        match self {
            Preset::Default => base,
            Preset::Landing => VortexConfig {
                background_color: "#0a0a1f".to_owned(),
                base_hue: 265.0,
                range_hue: 40.0,
                particle_count: 800,
                range_y: 150.0,
                range_speed: 1.5,
                ..base
            },
            Preset::Dashboard => VortexConfig {
                background_color: "#0a0a1f".to_owned(),
                base_hue: 210.0,
                range_hue: 40.0,
                particle_count: 600,
                range_y: 150.0,
                range_speed: 1.2,
                ..base
            },
        }
    }
}

impl FromStr for Preset {
    type Err = VortexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| VortexError::UnknownPreset(s.to_owned()))
    }
}

/// Canvas extent in pixels, as last observed by the animator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let color = VortexConfig::default().validate().unwrap();
        assert_eq!(color.to_rgba8(), [0x11, 0x11, 0x11, 0xff]);
        for preset in Preset::ALL {
            preset.config().validate().unwrap();
        }
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            VortexConfig {
                range_y: 0.0,
                ..Default::default()
            },
            VortexConfig {
                particle_size: -1.0,
                ..Default::default()
            },
            VortexConfig {
                default_speed: f32::NAN,
                ..Default::default()
            },
            VortexConfig {
                particle_count: MAX_PARTICLES + 1,
                ..Default::default()
            },
            VortexConfig {
                background_color: "navy".to_owned(),
                ..Default::default()
            },
        ];

        for config in cases {
            let err = config.validate().unwrap_err();
            assert!(matches!(err, VortexError::InvalidConfig { .. }), "{err}");
        }
    }

    #[test]
    fn preset_lookup_is_case_insensitive() {
        assert_eq!("Landing".parse::<Preset>().unwrap(), Preset::Landing);
        assert_eq!(" dashboard ".parse::<Preset>().unwrap(), Preset::Dashboard);
        assert!(matches!(
            "hero".parse::<Preset>(),
            Err(VortexError::UnknownPreset(_))
        ));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: VortexConfig = toml::from_str(
            r##"
            particle_count = 12
            background_color = "#000000"
            resize_policy = "reseed"
            "##,
        )
        .unwrap();

        assert_eq!(config.particle_count, 12);
        assert_eq!(config.resize_policy, ResizePolicy::Reseed);
        assert_eq!(config.base_hue, 220.0);
        assert_eq!(config.seed, None);
    }
}
