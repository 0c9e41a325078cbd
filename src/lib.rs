//! # wisp - pointer-trail particle effects
//!
//! A decaying field of gradient blobs that follows the pointer: fast
//! movement spawns particles, every frame integrates simple physics and
//! prunes the expired, and the survivors are painted onto a transparent
//! full-viewport overlay above everything else.
//!
//! ## Quick Start
//!
//! ```no_run
//! use wisp::{DeviceClass, Theme, TrailConfig};
//!
//! fn main() -> Result<(), wisp::TrailError> {
//!     wisp::run(TrailConfig::fluid(), Theme::Dark, DeviceClass::Desktop)
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### One simulation, two classic looks
//!
//! Everything is driven by a [`TrailConfig`] parameter table; the presets
//! reproduce the two classic cursor effects:
//!
//! | Preset | Motion | Extras |
//! |--------|--------|--------|
//! | [`TrailConfig::fluid`] | sinks, turbulent | connective mesh between nearby blobs |
//! | [`TrailConfig::smoke`] | rises, rotates | hides while the pointer is away |
//!
//! ### The frame pipeline
//!
//! Pointer events feed [`TrailSimulation::pointer_moved`], which spawns a
//! burst sized by pointer speed. Each display refresh then runs
//! [`TrailSimulation::tick`] (integrate, age, prune, FIFO-evict past the
//! cap) and repaints from scratch. The store is bounded, so a wild pointer
//! degrades by dropping the oldest particles instead of growing.
//!
//! ### Determinism
//!
//! The only randomness is the seedable RNG owned by the simulation;
//! [`TrailSimulation::with_seed`] replays a pointer script identically,
//! which is how the test suite drives scenarios frame by frame without a
//! display.
//!
//! ### Theming
//!
//! The host's [`Theme`] is read once per render pass to pick the color
//! ramp and the compositing mode (additive in the dark, alpha in the
//! light). On touch or small-viewport devices ([`DeviceClass`]) the whole
//! subsystem stays idle: no surface, no listeners, no frames.

mod config;
mod emitter;
mod error;
mod input;
mod particle;
mod render;
mod shader;
mod simulation;
mod time;
mod visuals;
mod window;

pub use config::{ConnectionStyle, TrailConfig};
pub use emitter::{emit, spawn_count};
pub use error::{GpuError, TrailError};
pub use glam::Vec2;
pub use input::{DeviceClass, PointerTracker};
pub use particle::{Particle, ParticleStore};
pub use render::FrameGeometry;
pub use shader::{BlobInstance, LineVertex};
pub use simulation::TrailSimulation;
pub use time::FrameClock;
pub use visuals::{BlendMode, GradientStops, Theme, TrailPalette};
pub use window::{run, Phase, TrailApp};

/// Convenient re-exports for common usage.
///
/// ```no_run
/// use wisp::prelude::*;
/// # fn main() {}
/// ```
pub mod prelude {
    pub use crate::config::{ConnectionStyle, TrailConfig};
    pub use crate::input::DeviceClass;
    pub use crate::render::FrameGeometry;
    pub use crate::simulation::TrailSimulation;
    pub use crate::time::FrameClock;
    pub use crate::visuals::{BlendMode, Theme, TrailPalette};
    pub use crate::window::{run, Phase, TrailApp};
    pub use crate::Vec2;
}
