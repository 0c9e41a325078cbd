//! Trail behavior configuration.
//!
//! A single parameter table drives every phase of the simulation: spawning,
//! integration, pruning, and rendering. The two built-in presets reproduce
//! the classic cursor effects:
//!
//! | Preset | Character |
//! |--------|-----------|
//! | [`TrailConfig::fluid`] | Dense, sinking blobs joined by a connective mesh |
//! | [`TrailConfig::smoke`] | Large, rising, slowly rotating puffs |
//!
//! # Example
//!
//! ```
//! use wisp::TrailConfig;
//!
//! let config = TrailConfig::fluid()
//!     .with_capacity(80)
//!     .with_drag(0.99);
//! assert_eq!(config.capacity, 80);
//! ```

use std::ops::Range;

use crate::visuals::TrailPalette;

/// Connective-edge rendering between nearby particles.
///
/// Every unordered pair of particles closer than `radius` gets a straight
/// line whose opacity falls off linearly with distance. This is an O(n²)
/// pass per frame; the particle capacity is what keeps it bounded, so treat
/// the cap as a hard limit rather than a tunable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionStyle {
    /// Maximum distance (px) at which two particles are joined.
    pub radius: f32,
    /// Base line opacity, applied on top of the per-pair falloff.
    pub alpha: f32,
}

impl Default for ConnectionStyle {
    fn default() -> Self {
        Self {
            radius: 60.0,
            alpha: 0.2,
        }
    }
}

/// Full parameter table for one trail simulation.
///
/// All values are in screen pixels and frames: the simulation advances one
/// fixed step per display refresh, matching how the effect is perceived at
/// the host's native cadence. The vertical axis grows downward, so a
/// positive `vertical_bias` sinks and a negative one rises.
#[derive(Debug, Clone)]
pub struct TrailConfig {
    /// Minimum pointer speed (px/frame) before any particles spawn.
    pub spawn_threshold: f32,
    /// Divisor k in `spawned = clamp(floor(speed / k), 0, max_spawn_per_event)`.
    pub spawn_divisor: f32,
    /// Hard cap on particles spawned by a single pointer event.
    pub max_spawn_per_event: usize,
    /// Store capacity; the oldest particles are evicted past this (FIFO).
    pub capacity: usize,

    /// Uniform position jitter (± px) around the pointer at spawn.
    pub position_jitter: f32,
    /// Fraction of the pointer delta carried into the initial velocity.
    pub velocity_scale: f32,
    /// Uniform velocity jitter (± px/frame) per axis at spawn.
    pub velocity_jitter: f32,
    /// Constant added to the initial vertical velocity (negative = launched upward).
    pub vertical_kick: f32,

    /// Lifespan draw range, in frames.
    pub lifespan: Range<u32>,
    /// Radius draw range, in px.
    pub radius: Range<f32>,
    /// Base opacity draw range, in (0, 1].
    pub base_opacity: Range<f32>,

    /// Per-frame velocity damping factor.
    pub drag: f32,
    /// Constant per-frame vertical acceleration (px/frame²).
    pub vertical_bias: f32,
    /// Uniform per-frame turbulence (± px/frame) per axis; 0 disables.
    pub turbulence: f32,
    /// Whether particles carry a rotation angle advanced each frame.
    pub spin: bool,
    /// Angular velocity draw range (± rad/frame) when `spin` is on.
    pub spin_rate: f32,

    /// Rendered radius growth over a lifetime (0.2 = 20% larger at death).
    pub growth: f32,
    /// Global opacity damping applied to every particle.
    pub master_alpha: f32,
    /// Connective mesh between nearby particles, if any.
    pub connections: Option<ConnectionStyle>,
    /// Hide the whole field while the pointer is outside the surface.
    pub hide_when_pointer_left: bool,

    /// Color ramps per theme.
    pub palette: TrailPalette,
}

impl TrailConfig {
    /// Fluid preset: dense sinking blobs with a connective mesh.
    ///
    /// Spawns readily (threshold 0.8 px/frame, k = 3), caps the store at
    /// 120, and joins particles within 60 px with fading edges.
    pub fn fluid() -> Self {
        Self {
            spawn_threshold: 0.8,
            spawn_divisor: 3.0,
            max_spawn_per_event: 8,
            capacity: 120,
            position_jitter: 12.5,
            velocity_scale: 0.08,
            velocity_jitter: 1.15,
            vertical_kick: 0.0,
            lifespan: 60..100,
            radius: 12.0..32.0,
            base_opacity: 0.7..0.9,
            drag: 0.985,
            vertical_bias: 0.015,
            turbulence: 0.04,
            spin: false,
            spin_rate: 0.0,
            growth: 0.2,
            master_alpha: 0.5,
            connections: Some(ConnectionStyle::default()),
            hide_when_pointer_left: false,
            palette: TrailPalette::fluid(),
        }
    }

    /// Smoke preset: large buoyant puffs that rotate and fade.
    ///
    /// Spawns more sparsely (threshold 1.0 px/frame, k = 5), caps the store
    /// at 100, drifts upward, and hides entirely while the pointer is gone.
    pub fn smoke() -> Self {
        Self {
            spawn_threshold: 1.0,
            spawn_divisor: 5.0,
            max_spawn_per_event: 8,
            capacity: 100,
            position_jitter: 10.0,
            velocity_scale: 0.1,
            velocity_jitter: 1.0,
            vertical_kick: -1.0,
            lifespan: 60..100,
            radius: 20.0..60.0,
            base_opacity: 0.8..1.0,
            drag: 0.98,
            vertical_bias: -0.02,
            turbulence: 0.0,
            spin: true,
            spin_rate: 0.01,
            growth: 0.5,
            master_alpha: 1.0,
            connections: None,
            hide_when_pointer_left: true,
            palette: TrailPalette::smoke(),
        }
    }

    /// Set the store capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the spawn speed threshold (px/frame).
    pub fn with_spawn_threshold(mut self, threshold: f32) -> Self {
        self.spawn_threshold = threshold;
        self
    }

    /// Set the spawn divisor k.
    pub fn with_spawn_divisor(mut self, divisor: f32) -> Self {
        self.spawn_divisor = divisor;
        self
    }

    /// Set the per-frame velocity damping factor.
    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    /// Set the lifespan draw range, in frames.
    pub fn with_lifespan(mut self, lifespan: Range<u32>) -> Self {
        self.lifespan = lifespan;
        self
    }

    /// Enable or disable the connective mesh.
    pub fn with_connections(mut self, connections: Option<ConnectionStyle>) -> Self {
        self.connections = connections;
        self
    }

    /// Replace the color palette.
    pub fn with_palette(mut self, palette: TrailPalette) -> Self {
        self.palette = palette;
        self
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self::fluid()
    }
}
