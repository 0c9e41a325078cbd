//! Simulation context: pointer in, decaying particle field out.
//!
//! [`TrailSimulation`] owns all mutable simulation state - the particle
//! store, the pointer tracker, and the RNG - and exposes exactly two
//! entry points:
//!
//! - [`pointer_moved`](TrailSimulation::pointer_moved) from the pointer
//!   event source, which may spawn particles;
//! - [`tick`](TrailSimulation::tick) from the frame scheduler, which
//!   advances physics by one frame and prunes the store.
//!
//! Both run on the same thread; the only ordering contract is that events
//! enqueue particles and the next tick integrates them, so no frame ever
//! skips an enqueued particle. With a seeded RNG the whole thing is
//! deterministic and can be driven frame by frame in tests without a
//! display clock.
//!
//! # Example
//!
//! ```
//! use wisp::{TrailConfig, TrailSimulation};
//!
//! let mut sim = TrailSimulation::with_seed(TrailConfig::fluid(), 1234);
//! sim.pointer_moved(100.0, 100.0);
//! sim.pointer_moved(150.0, 100.0); // fast move: spawns a burst
//! sim.tick();
//! assert!(sim.len() > 0);
//! ```

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::TrailConfig;
use crate::emitter;
use crate::input::PointerTracker;
use crate::particle::{Particle, ParticleStore};

/// One pointer-trail particle simulation.
pub struct TrailSimulation {
    config: TrailConfig,
    store: ParticleStore,
    pointer: PointerTracker,
    rng: SmallRng,
    pointer_inside: bool,
    frame: u64,
}

impl TrailSimulation {
    /// Create a simulation with OS-sourced randomness.
    pub fn new(config: TrailConfig) -> Self {
        Self::from_rng(config, SmallRng::from_entropy())
    }

    /// Create a simulation that replays identically for a given seed.
    pub fn with_seed(config: TrailConfig, seed: u64) -> Self {
        Self::from_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn from_rng(config: TrailConfig, rng: SmallRng) -> Self {
        let store = ParticleStore::new(config.capacity);
        Self {
            config,
            store,
            pointer: PointerTracker::new(),
            rng,
            pointer_inside: false,
            frame: 0,
        }
    }

    /// Feed one pointer-move event.
    ///
    /// Records the position, and spawns a velocity-sized burst of particles
    /// when the movement clears the noise threshold. Returns the number of
    /// particles spawned.
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> usize {
        self.pointer_inside = true;
        let delta = self.pointer.record(x, y);
        emitter::emit(
            &self.config,
            &mut self.rng,
            self.pointer.position(),
            delta,
            &mut self.store,
        )
    }

    /// Note that the pointer left the surface.
    ///
    /// Only affects rendering, and only for configurations with
    /// `hide_when_pointer_left`; the field keeps integrating either way.
    pub fn pointer_left(&mut self) {
        self.pointer_inside = false;
    }

    /// Advance the simulation by exactly one frame.
    ///
    /// Integrates every live particle in store order, then removes expired
    /// particles and truncates the store to its capacity (oldest first).
    pub fn tick(&mut self) {
        let config = &self.config;
        for p in self.store.particles_mut() {
            integrate(p, config, &mut self.rng);
        }
        self.store.retain_alive();
        self.store.enforce_cap();
        self.frame += 1;
    }

    /// Opacity factor from pointer presence: 0 hides the field entirely.
    pub fn visibility(&self) -> f32 {
        if self.config.hide_when_pointer_left && !self.pointer_inside {
            0.0
        } else {
            1.0
        }
    }

    /// Live particles in spawn order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        self.store.particles()
    }

    /// Number of live particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the field is currently empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Frames advanced so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &TrailConfig {
        &self.config
    }
}

/// Advance one particle by one frame.
fn integrate(p: &mut Particle, config: &TrailConfig, rng: &mut SmallRng) {
    p.position += p.velocity;
    p.age += 1;

    p.velocity *= config.drag;
    p.velocity.y += config.vertical_bias;

    if config.turbulence > 0.0 {
        let t = config.turbulence;
        p.velocity += Vec2::new(rng.gen_range(-t..t), rng.gen_range(-t..t));
    }

    if config.spin {
        p.angle += p.spin;
    }
}
