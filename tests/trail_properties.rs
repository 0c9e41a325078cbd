//! End-to-end properties of the trail pipeline.
//!
//! These drive the public API the way the host would - pointer events in,
//! frames ticked by hand - with seeded RNGs so every scenario replays
//! identically.

use wisp::{
    DeviceClass, FrameGeometry, Phase, Theme, TrailApp, TrailConfig, TrailSimulation, Vec2,
};

// ============================================================================
// Emission
// ============================================================================

#[test]
fn test_fast_horizontal_drag_spawns_full_burst() {
    // (0,0) -> (50,0) in one event: speed 50, k = 3, so min(floor(50/3), 8) = 8.
    let mut sim = TrailSimulation::with_seed(TrailConfig::fluid(), 11);
    sim.pointer_moved(0.0, 0.0);
    let spawned = sim.pointer_moved(50.0, 0.0);
    assert_eq!(spawned, 8);

    let jitter = sim.config().velocity_jitter;
    for p in sim.particles() {
        // vx = 50 * 0.08 ± jitter; vy is jitter only.
        assert!((p.velocity.x - 4.0).abs() <= jitter);
        assert!(p.velocity.y.abs() <= jitter);
    }
}

#[test]
fn test_sub_threshold_movement_leaves_store_unchanged() {
    let mut sim = TrailSimulation::with_seed(TrailConfig::fluid(), 12);
    sim.pointer_moved(100.0, 100.0);
    let before = sim.len();
    let spawned = sim.pointer_moved(100.3, 100.0);
    assert_eq!(spawned, 0);
    assert_eq!(sim.len(), before);
}

// ============================================================================
// Lifetime and capacity invariants
// ============================================================================

#[test]
fn test_fixed_lifespan_particle_absent_after_final_tick() {
    let mut config = TrailConfig::fluid();
    config.lifespan = 60..61;
    let mut sim = TrailSimulation::with_seed(config, 13);
    sim.pointer_moved(0.0, 0.0);
    sim.pointer_moved(50.0, 0.0);
    assert_eq!(sim.len(), 8);

    for _ in 0..60 {
        sim.tick();
    }
    assert!(sim.is_empty());
}

#[test]
fn test_invariants_hold_across_a_wild_drag() {
    let mut sim = TrailSimulation::with_seed(TrailConfig::fluid(), 14);
    let cap = sim.config().capacity;

    sim.pointer_moved(0.0, 0.0);
    for frame in 0..300u32 {
        // Sawtooth drag fast enough to spawn the full burst every event.
        let x = (frame % 2) as f32 * 500.0;
        let y = (frame as f32 * 7.0) % 400.0;
        sim.pointer_moved(x, y);
        sim.tick();

        assert!(sim.len() <= cap, "cap exceeded at frame {frame}");
        for p in sim.particles() {
            assert!(p.age < p.lifespan, "expired particle survives at frame {frame}");
        }
    }
}

#[test]
fn test_overflow_keeps_only_most_recent_spawns() {
    let config = TrailConfig::fluid().with_capacity(16);
    let mut sim = TrailSimulation::with_seed(config, 15);

    // Far more than 16 spawns, then a settling tick.
    sim.pointer_moved(0.0, 0.0);
    for i in 1..10 {
        sim.pointer_moved((i % 2) as f32 * 500.0, 0.0);
    }
    sim.tick();

    assert_eq!(sim.len(), 16);
    // Everything kept is from the final events: one frame old at most.
    for p in sim.particles() {
        assert_eq!(p.age, 1);
    }
}

// ============================================================================
// Rendering math
// ============================================================================

#[test]
fn test_two_close_particles_make_one_half_opacity_edge() {
    // Distance 30 under the 60 px threshold: one segment per frame at
    // (1 - 30/60) * lifeFactor = 0.5 * lifeFactor, fresh pair => 0.5.
    let config = TrailConfig::fluid();
    let template = wisp::Particle {
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
        age: 0,
        lifespan: 80,
        radius: 15.0,
        base_opacity: 0.8,
        angle: 0.0,
        spin: 0.0,
    };
    let particles = vec![
        template,
        wisp::Particle {
            position: Vec2::new(30.0, 0.0),
            ..template
        },
    ];

    let geometry = FrameGeometry::build(&particles, &config, 1.0);
    assert_eq!(geometry.segment_count(), 1);
    assert!((geometry.lines[0].alpha - 0.5).abs() < 1e-6);
}

#[test]
fn test_smoke_field_hides_after_pointer_leaves() {
    let mut sim = TrailSimulation::with_seed(TrailConfig::smoke(), 16);
    sim.pointer_moved(0.0, 0.0);
    sim.pointer_moved(100.0, 0.0);
    sim.tick();
    assert!(!sim.is_empty());

    sim.pointer_left();
    let geometry = FrameGeometry::build(sim.particles(), sim.config(), sim.visibility());
    assert!(!geometry.blobs.is_empty());
    assert!(geometry.blobs.iter().all(|b| b.opacity == 0.0));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_touch_device_runs_nothing() {
    // run() must return immediately: no window, no surface, no frames.
    let result = wisp::run(TrailConfig::fluid(), Theme::Dark, DeviceClass::TouchOrSmall);
    assert!(result.is_ok());

    let app = TrailApp::new(TrailConfig::fluid(), Theme::Dark, DeviceClass::TouchOrSmall);
    assert_eq!(app.phase(), Phase::Idle);
    assert!(!app.should_activate());
}

#[test]
fn test_double_teardown_is_harmless() {
    let mut app = TrailApp::new(TrailConfig::smoke(), Theme::Light, DeviceClass::Desktop);
    app.shutdown();
    app.shutdown();
    assert_eq!(app.phase(), Phase::Stopped);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_identical_seeds_produce_identical_fields() {
    let script = |seed: u64| {
        let mut sim = TrailSimulation::with_seed(TrailConfig::smoke(), seed);
        sim.pointer_moved(10.0, 10.0);
        for i in 0..50u32 {
            sim.pointer_moved(10.0 + (i as f32) * 13.0 % 800.0, 10.0 + (i as f32) * 5.0);
            sim.tick();
        }
        sim.particles().to_vec()
    };

    assert_eq!(script(77), script(77));
    assert_ne!(script(77), script(78));
}
