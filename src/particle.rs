//! Particle entity and the ordered, capacity-capped store.
//!
//! The [`ParticleStore`] is the exclusive owner of every live particle.
//! Other phases (emitter, integrator, renderer) operate on it by iteration
//! or index within a single frame; nothing retains a particle reference
//! across frames.

use glam::Vec2;

/// A single trail particle.
///
/// `lifespan`, `radius`, and `base_opacity` are drawn once at spawn and
/// never mutated afterwards. `age` counts whole frames and is incremented
/// by the integrator; a particle with `age >= lifespan` is removed before
/// the next render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Screen-space position (px, y grows downward).
    pub position: Vec2,
    /// Velocity in px/frame.
    pub velocity: Vec2,
    /// Frames lived so far.
    pub age: u32,
    /// Total frames this particle lives.
    pub lifespan: u32,
    /// Base blob radius (px).
    pub radius: f32,
    /// Base opacity in (0, 1].
    pub base_opacity: f32,
    /// Rotation angle (rad), advanced only when spin is configured.
    pub angle: f32,
    /// Angular velocity (rad/frame).
    pub spin: f32,
}

impl Particle {
    /// Fraction of the lifetime already spent, clamped to [0, 1].
    ///
    /// A degenerate zero lifespan reads as fully spent rather than dividing
    /// by zero.
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        if self.lifespan == 0 {
            return 1.0;
        }
        (self.age as f32 / self.lifespan as f32).min(1.0)
    }

    /// Whether this particle has reached the end of its lifespan.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.age >= self.lifespan
    }
}

/// Ordered particle sequence with FIFO eviction.
///
/// Insertion order is spawn order. When the store grows past its capacity
/// the *oldest* particles are discarded, not the lowest-energy ones; under
/// a fast-moving pointer this doubles as the backpressure policy.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    capacity: usize,
}

impl ParticleStore {
    /// Create an empty store with the given capacity cap.
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a freshly spawned particle.
    ///
    /// The cap is not enforced here; the frame step enforces it after
    /// pruning so that a burst of events never skips an enqueued particle.
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Remove every expired particle, preserving spawn order.
    pub fn retain_alive(&mut self) {
        self.particles.retain(|p| !p.is_expired());
    }

    /// Truncate from the front down to the capacity cap.
    pub fn enforce_cap(&mut self) {
        let len = self.particles.len();
        if len > self.capacity {
            self.particles.drain(..len - self.capacity);
        }
    }

    /// Number of live particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the store holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Configured capacity cap.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Immutable view of the particles in spawn order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable view for the integrator.
    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Iterate in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(age: u32, lifespan: u32) -> Particle {
        Particle {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            age,
            lifespan,
            radius: 10.0,
            base_opacity: 0.8,
            angle: 0.0,
            spin: 0.0,
        }
    }

    #[test]
    fn test_life_ratio() {
        assert_eq!(particle(0, 60).life_ratio(), 0.0);
        assert_eq!(particle(30, 60).life_ratio(), 0.5);
        assert_eq!(particle(60, 60).life_ratio(), 1.0);
        // Past-lifespan and degenerate values stay clamped
        assert_eq!(particle(90, 60).life_ratio(), 1.0);
        assert_eq!(particle(0, 0).life_ratio(), 1.0);
    }

    #[test]
    fn test_retain_alive_preserves_order() {
        let mut store = ParticleStore::new(10);
        store.push(particle(60, 60)); // expired
        store.push(particle(1, 60));
        store.push(particle(99, 60)); // expired
        store.push(particle(2, 60));
        store.retain_alive();

        assert_eq!(store.len(), 2);
        assert_eq!(store.particles()[0].age, 1);
        assert_eq!(store.particles()[1].age, 2);
    }

    #[test]
    fn test_fifo_eviction_keeps_newest() {
        let mut store = ParticleStore::new(3);
        for age in 0..5 {
            store.push(particle(age, 100));
        }
        store.enforce_cap();

        assert_eq!(store.len(), 3);
        let ages: Vec<u32> = store.iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![2, 3, 4]);
    }

    #[test]
    fn test_enforce_cap_noop_under_capacity() {
        let mut store = ParticleStore::new(5);
        store.push(particle(0, 100));
        store.enforce_cap();
        assert_eq!(store.len(), 1);
    }
}
