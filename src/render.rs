//! Per-frame geometry construction.
//!
//! Every frame is a full rebuild: the particle store is walked once to
//! produce blob instances, and - when the configuration has a connective
//! mesh - once more pairwise to produce line segments. Nothing is kept
//! between frames, which keeps the render path trivially correct under
//! removal and eviction.
//!
//! Keeping this math off the GPU surface means the whole visual contract
//! (fade curves, growth, edge opacity) is testable with plain asserts.

use crate::config::TrailConfig;
use crate::particle::Particle;
use crate::shader::{BlobInstance, LineVertex};

/// CPU-side geometry for one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameGeometry {
    /// One instance per live particle, in spawn order.
    pub blobs: Vec<BlobInstance>,
    /// Two vertices per connective segment.
    pub lines: Vec<LineVertex>,
}

impl FrameGeometry {
    /// Build geometry for the current store contents.
    ///
    /// `visibility` scales every blob's opacity; the pointer-left fade
    /// passes 0.0 here to hide the field without discarding it.
    pub fn build(particles: &[Particle], config: &TrailConfig, visibility: f32) -> Self {
        let mut geometry = FrameGeometry {
            blobs: Vec::with_capacity(particles.len()),
            lines: Vec::new(),
        };
        geometry.rebuild(particles, config, visibility);
        geometry
    }

    /// Rebuild in place, reusing the allocations from previous frames.
    pub fn rebuild(&mut self, particles: &[Particle], config: &TrailConfig, visibility: f32) {
        self.blobs.clear();
        self.lines.clear();

        for p in particles {
            // An expired particle still in the store (possible only between
            // prune passes) is skipped rather than drawn negative.
            if p.is_expired() {
                continue;
            }
            self.blobs.push(blob_instance(p, config, visibility));
        }

        if let Some(style) = &config.connections {
            for i in 0..particles.len() {
                for j in (i + 1)..particles.len() {
                    let a = &particles[i];
                    let b = &particles[j];
                    let distance = a.position.distance(b.position);
                    if distance >= style.radius {
                        continue;
                    }
                    let life_factor = 1.0 - (a.life_ratio() + b.life_ratio()) / 2.0;
                    let alpha = (1.0 - distance / style.radius) * life_factor * visibility;
                    self.lines.push(LineVertex {
                        position: a.position.to_array(),
                        alpha,
                    });
                    self.lines.push(LineVertex {
                        position: b.position.to_array(),
                        alpha,
                    });
                }
            }
        }
    }

    /// Number of connective segments this frame.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.lines.len() / 2
    }
}

fn blob_instance(p: &Particle, config: &TrailConfig, visibility: f32) -> BlobInstance {
    let life_ratio = p.life_ratio();
    BlobInstance {
        center: p.position.to_array(),
        radius: p.radius * (1.0 + life_ratio * config.growth),
        opacity: p.base_opacity * (1.0 - life_ratio) * config.master_alpha * visibility,
        angle: p.angle,
        _pad: 0.0,
    }
}
