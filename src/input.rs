//! Pointer tracking and the device capability signal.
//!
//! [`PointerTracker`] turns the stream of absolute pointer positions into
//! per-event movement deltas. It is plain state owned by the simulation
//! context, so tests can drive it with synthetic event sequences.

use glam::Vec2;

/// Current and previous pointer position.
///
/// Updated solely from pointer-move events; the delta of each movement is
/// returned to the caller so the emitter can derive a spawn velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    current: Vec2,
    previous: Vec2,
    has_sample: bool,
}

impl PointerTracker {
    /// Create a tracker with no recorded position yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer position and return the delta from the previous one.
    ///
    /// The very first event has no previous sample and yields a zero delta,
    /// so a pointer appearing mid-screen does not fire a spawn burst.
    pub fn record(&mut self, x: f32, y: f32) -> Vec2 {
        let next = Vec2::new(x, y);
        if !self.has_sample {
            self.has_sample = true;
            self.previous = next;
            self.current = next;
            return Vec2::ZERO;
        }
        self.previous = self.current;
        self.current = next;
        self.current - self.previous
    }

    /// Most recently recorded position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.current
    }

    /// Position recorded before the current one.
    #[inline]
    pub fn previous(&self) -> Vec2 {
        self.previous
    }
}

/// Coarse device capability signal.
///
/// On touch or small-viewport devices the trail stays entirely idle: no
/// surface, no listeners, no frames. The signal is supplied by the host;
/// the subsystem never probes hardware itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Pointer-driven device; the trail runs.
    Desktop,
    /// Touch or small-viewport device; the trail stays idle.
    TouchOrSmall,
}

impl DeviceClass {
    /// Whether the trail should run at all on this device.
    #[inline]
    pub fn supports_trail(&self) -> bool {
        matches!(self, DeviceClass::Desktop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_yields_zero_delta() {
        let mut tracker = PointerTracker::new();
        let delta = tracker.record(400.0, 300.0);
        assert_eq!(delta, Vec2::ZERO);
        assert_eq!(tracker.position(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_delta_between_events() {
        let mut tracker = PointerTracker::new();
        tracker.record(0.0, 0.0);
        let delta = tracker.record(50.0, 0.0);
        assert_eq!(delta, Vec2::new(50.0, 0.0));
        assert_eq!(delta.length(), 50.0);
        assert_eq!(tracker.previous(), Vec2::ZERO);
    }

    #[test]
    fn test_device_class() {
        assert!(DeviceClass::Desktop.supports_trail());
        assert!(!DeviceClass::TouchOrSmall.supports_trail());
    }
}
