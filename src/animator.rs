//! The particle field animator: owns the pool, the noise field and the frame
//! loop, and reacts to mount, resize and teardown.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::color::Rgba;
use crate::error::VortexError;
use crate::noise_field::{NoiseSource, SimplexNoise};
use crate::particles::{paint_particles, seed_particles, step_particles, Particle};
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::surface::{CanvasHost, DrawContext};
use crate::types::{Bounds, ResizePolicy, VortexConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorState {
    /// Constructed but not mounted on a canvas.
    Idle,
    /// Mounted; waiting for the canvas to report a non-zero size.
    AwaitingSize,
    /// A frame is scheduled or being drawn.
    Running,
    /// Stopped by the host; the pool is kept.
    Paused,
    /// Torn down. A new `mount` starts from scratch.
    Stopped,
    /// The host could not provide a drawing context. Terminal.
    Unsupported,
}

pub struct Animator<S: FrameScheduler, N = SimplexNoise> {
    config: VortexConfig,
    background: Rgba,
    scheduler: S,
    noise: N,
    rng: StdRng,
    bounds: Bounds,
    particles: Vec<Particle>,
    seeded: bool,
    time: u64,
    state: AnimatorState,
    pending: Option<FrameHandle>,
}

impl<S: FrameScheduler> Animator<S> {
    /// Validates `config` and builds an animator over OpenSimplex noise.
    ///
    /// With `config.seed` set, both the particle attributes and the noise
    /// field are reproducible.
    pub fn new(config: VortexConfig, scheduler: S) -> Result<Self, VortexError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let noise = SimplexNoise::new(rng.gen());
        Self::with_noise(config, scheduler, noise, rng)
    }
}

impl<S: FrameScheduler, N: NoiseSource> Animator<S, N> {
    pub fn with_noise(
        config: VortexConfig,
        scheduler: S,
        noise: N,
        rng: StdRng,
    ) -> Result<Self, VortexError> {
        let background = config.validate()?;
        Ok(Self {
            config,
            background,
            scheduler,
            noise,
            rng,
            bounds: Bounds::default(),
            particles: Vec::new(),
            seeded: false,
            time: 0,
            state: AnimatorState::Idle,
            pending: None,
        })
    }

    /// Attaches to `host` and starts animating once it has a non-zero size.
    ///
    /// Mounting again after [`teardown`](Self::teardown) reseeds from scratch.
    pub fn mount(&mut self, host: &mut dyn CanvasHost) {
        if !matches!(self.state, AnimatorState::Idle | AnimatorState::Stopped) {
            return;
        }

        if host.context().is_none() {
            self.state = AnimatorState::Unsupported;
            return;
        }

        self.bounds = Bounds::default();
        self.particles.clear();
        self.seeded = false;
        self.time = 0;
        self.state = AnimatorState::AwaitingSize;

        let (width, height) = host.size();
        self.resize(width, height);
    }

    /// Feeds a new canvas size observation. Repeats of the current size are
    /// ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.is_mounted() {
            return;
        }

        let next = Bounds::new(width, height);
        if next == self.bounds {
            return;
        }
        self.bounds = next;
        debug!(width, height, "vortex canvas resized");

        if next.is_empty() {
            if self.state == AnimatorState::Running {
                self.cancel_pending();
                self.state = AnimatorState::AwaitingSize;
            }
            return;
        }

        if !self.seeded || self.config.resize_policy == ResizePolicy::Reseed {
            self.seed();
        }

        if self.state == AnimatorState::AwaitingSize {
            self.state = AnimatorState::Running;
            self.schedule();
        }
    }

    /// Resumes a paused animator.
    pub fn start(&mut self) {
        if self.state != AnimatorState::Paused {
            return;
        }

        if self.bounds.is_empty() {
            self.state = AnimatorState::AwaitingSize;
        } else {
            self.state = AnimatorState::Running;
            self.schedule();
        }
    }

    /// Pauses the loop, keeping the particle pool.
    pub fn stop(&mut self) {
        match self.state {
            AnimatorState::Running => {
                self.cancel_pending();
                self.state = AnimatorState::Paused;
            }
            AnimatorState::AwaitingSize => self.state = AnimatorState::Paused,
            _ => {}
        }
    }

    /// Runs the frame identified by `handle`: clears, steps, paints, and
    /// schedules the next one.
    ///
    /// Returns `false` without drawing if the handle is stale (cancelled,
    /// superseded, or delivered after teardown).
    pub fn on_frame(&mut self, handle: FrameHandle, host: &mut dyn CanvasHost) -> bool {
        if self.state != AnimatorState::Running || self.pending != Some(handle) {
            return false;
        }
        self.pending = None;

        let Some(ctx) = host.context() else {
            self.state = AnimatorState::Unsupported;
            return false;
        };

        step_particles(
            &mut self.particles,
            self.bounds,
            self.config.range_y,
            self.time,
            &self.noise,
        );
        Self::draw(&self.particles, self.background, self.config.range_y, ctx);

        self.time += 1;
        self.schedule();
        true
    }

    /// Paints the current pool without advancing it.
    pub fn paint(&self, ctx: &mut dyn DrawContext) {
        if self.seeded {
            Self::draw(&self.particles, self.background, self.config.range_y, ctx);
        }
    }

    /// Cancels the pending frame, drops the pool and ignores further resizes.
    pub fn teardown(&mut self) {
        self.cancel_pending();
        if self.state == AnimatorState::Unsupported {
            return;
        }
        self.particles.clear();
        self.seeded = false;
        self.state = AnimatorState::Stopped;
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Frames drawn since the last `mount`.
    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &VortexConfig {
        &self.config
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn is_mounted(&self) -> bool {
        matches!(
            self.state,
            AnimatorState::AwaitingSize | AnimatorState::Running | AnimatorState::Paused
        )
    }

    fn seed(&mut self) {
        self.particles = seed_particles(&self.config, self.bounds, &mut self.rng);
        self.seeded = true;
        debug!(
            count = self.particles.len(),
            width = self.bounds.width,
            height = self.bounds.height,
            "seeded vortex particles"
        );
    }

    fn schedule(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.scheduler.request_frame());
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    fn draw(particles: &[Particle], background: Rgba, range_y: f32, ctx: &mut dyn DrawContext) {
        ctx.set_fill_color(background);
        ctx.fill_surface();
        paint_particles(particles, range_y, ctx);
    }
}

impl<S: FrameScheduler, N> Drop for Animator<S, N> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}
