#![deny(unsafe_code)]
//! Animated point field.
//!
//! A jittered grid of points is linked to each point's nearest neighbors. Every
//! point drifts around its origin on an endless chain of eased transitions, and
//! points near a target (the pointer, or the surface center) light up together
//! with their links.
//!
//! [`Plexus`] is one mounted instance. The host owns the clock and the input
//! sources: it calls [`Plexus::tick`] once per display frame and forwards input
//! through [`Plexus::handle_event`]. [`Plexus::unmount`] stops the frame loop,
//! cancels every transition, and detaches every listener in one step.

pub mod activation;
pub mod field;
pub mod motion;
pub mod render;
pub mod tracker;

use glam::DVec2;
use plexus_core::{FieldConfig, PlexusError, Surface, Viewport, Xorshift64};
use serde::Serialize;
use tracing::{debug, info, warn};

pub use activation::Tier;
pub use field::{Field, FieldStats, Marker, Point};
pub use motion::MotionScheduler;
pub use render::{FrameStats, FrameStatus, RenderLoop};
pub use tracker::{InputCapability, InteractionTracker};

/// Input delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Page-relative pointer position.
    PointerMove { x: f64, y: f64 },
    /// Vertical scroll offset of the page.
    Scroll { offset_y: f64 },
    /// New surface size.
    Resize { width: f64, height: f64 },
}

/// Which input listeners are attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Listeners {
    pub pointer_move: bool,
    pub scroll: bool,
    pub resize: bool,
}

impl Listeners {
    fn install(capability: InputCapability) -> Self {
        Self {
            pointer_move: !capability.touch,
            scroll: true,
            resize: true,
        }
    }

    /// Whether at least one listener is attached.
    pub fn any(&self) -> bool {
        self.pointer_move || self.scroll || self.resize
    }
}

/// Outcome of one [`Plexus::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub status: FrameStatus,
    pub completed_transitions: usize,
    pub stats: FrameStats,
}

impl TickReport {
    /// Lines plus markers drawn by the frame.
    pub fn draw_calls(&self) -> usize {
        self.stats.draw_calls()
    }
}

/// A mounted field bound to one drawing surface.
pub struct Plexus<S: Surface> {
    surface: S,
    config: FieldConfig,
    viewport: Viewport,
    field: Field,
    tracker: InteractionTracker,
    motion: MotionScheduler,
    render: RenderLoop,
    rng: Xorshift64,
    listeners: Listeners,
    clock: f64,
}

impl<S: Surface> Plexus<S> {
    /// Mounts on an already acquired surface. The clock starts at 0.
    pub fn mount(
        surface: S,
        config: FieldConfig,
        capability: InputCapability,
    ) -> Result<Self, PlexusError> {
        Self::mount_with(|_| Ok(surface), config, capability)
    }

    /// Validates `config`, then acquires the surface, then builds and starts everything.
    ///
    /// If `acquire` fails nothing has been started and the error is returned as is.
    pub fn mount_with<F>(
        acquire: F,
        config: FieldConfig,
        capability: InputCapability,
    ) -> Result<Self, PlexusError>
    where
        F: FnOnce(&Viewport) -> Result<S, PlexusError>,
    {
        config.validate()?;
        let viewport = config.viewport()?;
        let mut surface = acquire(&viewport)?;
        let (width, height) = viewport.pixel_size();
        surface.resize(width, height);

        let mut rng = Xorshift64::new(config.seed);
        let field = Field::generate(&config, &mut rng)?;
        let mut motion = MotionScheduler::new(&config);
        motion.start(&field, &mut rng, 0.0);
        let listeners = Listeners::install(capability);

        info!(
            width = viewport.width,
            height = viewport.height,
            points = field.len(),
            seed = config.seed,
            touch = capability.touch,
            "field mounted"
        );

        Ok(Self {
            surface,
            tracker: InteractionTracker::new(viewport),
            config,
            viewport,
            field,
            motion,
            render: RenderLoop::new(),
            rng,
            listeners,
            clock: 0.0,
        })
    }

    /// Advances motion to `now` (seconds since mount) and runs one frame.
    ///
    /// Time never runs backwards: an earlier `now` is treated as the last one seen,
    /// and a non-finite `now` is ignored the same way.
    pub fn tick(&mut self, now: f64) -> TickReport {
        if !self.render.is_running() {
            return TickReport {
                status: FrameStatus::Stopped,
                completed_transitions: 0,
                stats: FrameStats::default(),
            };
        }
        if now.is_finite() {
            self.clock = self.clock.max(now);
        } else {
            warn!(now, "non-finite frame time ignored");
        }
        let completed_transitions = self.motion.advance(&mut self.field, &mut self.rng, self.clock);
        let (status, stats) = self.render.frame(
            &mut self.field,
            self.tracker.target(),
            self.tracker.is_animating(),
            &mut self.surface,
        );
        TickReport {
            status,
            completed_transitions,
            stats,
        }
    }

    /// Routes an input event to its listener.
    ///
    /// Returns `Ok(false)` when no listener for that event is attached: pointer
    /// moves on touch devices, and everything after unmount.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<bool, PlexusError> {
        match event {
            InputEvent::PointerMove { x, y } if self.listeners.pointer_move => {
                self.tracker.pointer_moved(DVec2::new(x, y));
                Ok(true)
            }
            InputEvent::Scroll { offset_y } if self.listeners.scroll => {
                if self.tracker.scrolled(offset_y, self.viewport.height) {
                    debug!(offset_y, animating = self.tracker.is_animating(), "animation toggled by scroll");
                }
                Ok(true)
            }
            InputEvent::Resize { width, height } if self.listeners.resize => {
                self.resize(width, height)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Resizes the surface, which clears it. The points are not regenerated and
    /// keep their origins even if they now fall outside the surface. The target
    /// is left where it was, including the mount-time center.
    fn resize(&mut self, width: f64, height: f64) -> Result<(), PlexusError> {
        let viewport = Viewport::new(width, height)?;
        let (w, h) = viewport.pixel_size();
        self.surface.resize(w, h);
        self.viewport = viewport;
        info!(width, height, "surface resized");
        Ok(())
    }

    /// Stops the frame loop, cancels all transitions, and detaches all listeners.
    ///
    /// Idempotent. Afterwards `tick` reports [`FrameStatus::Stopped`] and events are ignored.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.render.stop();
        self.motion.cancel();
        self.listeners = Listeners::default();
        info!(frames = self.render.frames_drawn(), "field unmounted");
    }

    /// True from mount until [`unmount`](Self::unmount).
    pub fn is_mounted(&self) -> bool {
        self.render.is_running()
    }

    /// The points, including their current positions and activation.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Current target and suspend flag.
    pub fn tracker(&self) -> &InteractionTracker {
        &self.tracker
    }

    /// In-flight transitions; empty after unmount.
    pub fn motion(&self) -> &MotionScheduler {
        &self.motion
    }

    /// Listeners attached at mount; none after unmount.
    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    /// Current surface size, updated by resizes.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The configuration the field was mounted with.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// The drawing surface, e.g. to inspect recorded commands.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Gives the surface back, e.g. to snapshot it after the last frame.
    pub fn into_surface(self) -> S {
        self.surface
    }
}
