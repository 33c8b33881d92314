//! Drifting particle field driven by coherent noise, painted onto a 2D canvas
//! once per display refresh.

pub mod animator;
pub mod color;
pub mod error;
pub mod noise_field;
pub mod particles;
pub mod scheduler;
pub mod settings;
pub mod surface;
pub mod types;

pub use animator::{Animator, AnimatorState};
pub use color::Rgba;
pub use error::VortexError;
pub use noise_field::{NoiseSource, SimplexNoise};
pub use particles::{fade_alpha, step_particles, Particle};
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
pub use surface::{CanvasHost, DrawContext, PixelCanvas};
pub use types::{Bounds, Preset, ResizePolicy, VortexConfig};
