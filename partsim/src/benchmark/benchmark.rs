use std::time::Instant;

use crate::simulation::controller::PhysicsController;
use crate::simulation::params::PhysicsParams;
use crate::simulation::plane::Plane;
use crate::simulation::states::{ElasticBody, HardBody, NVec3, Particle};

/// Helper to build a controller with `n` free particles packed in a loose
/// cloud above a floor, plus one elastic body of `n / 4` particles
fn make_controller(n: usize) -> PhysicsController {
    let cloud = |i: usize, offset: f64| {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0 + 6.0 + offset,
            (i_f * 0.07).sin() * 5.0,
        );
        Particle::new(x, 0.25)
    };

    let mut controller = PhysicsController::new(PhysicsParams::default());
    controller.set_particles((0..n).map(|i| cloud(i, 0.0)).collect());
    controller.set_elastic_bodies(vec![ElasticBody::new(
        "bench",
        (0..n / 4).map(|i| cloud(i, 0.1)).collect(),
    )]);
    controller.set_hard_bodies(vec![HardBody::new(
        Particle::new(NVec3::zeros(), 0.0),
        Plane::new(NVec3::y_axis(), 0.25),
    )]);
    controller
}

/// Time `step` for a range of working-set sizes
/// Paste output directly into a spreadsheet to graph the O(n^2) curve
pub fn bench_step() {
    let dt = 1.0 / 60.0;

    println!("N,step_ms,pairs");

    for n in (100..=3200).step_by(100) {
        // Small n: average over a few steps to smooth noise
        let steps = if n <= 800 { 10 } else { 2 };
        let mut controller = make_controller(n);

        // Warm-up so the scratch buffers are already sized
        controller.step(dt);

        let t0 = Instant::now();
        for _ in 0..steps {
            controller.step(dt);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6},{}", controller.registry.len(), ms, controller.last_report().collisions.pairs);
    }
}
