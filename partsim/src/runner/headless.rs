//! Headless host loop
//!
//! Stands in for a render loop: calls `step(dt)` once per frame for the
//! configured number of frames and reports what happened.

use log::info;

use crate::simulation::controller::PhysicsController;
use crate::simulation::scenario::Scenario;

/// Aggregate of a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub t: f64, // simulated time at the end
    pub colliding_pairs: usize, // summed over all frames
    pub stopped: usize, // plane stops summed over all frames
    pub min_y: f64, // lowest particle center at the end
    pub max_y: f64, // highest particle center at the end
}

/// Lowest and highest particle center, `None` for an empty scene
pub fn height_range(controller: &PhysicsController) -> Option<(f64, f64)> {
    let reg = &controller.registry;
    let set = reg.flatten();
    set.iter()
        .map(|r| reg.particle(r).x.y)
        .fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
}

pub fn run_headless(scenario: &mut Scenario) -> RunSummary {
    let Scenario { engine, controller } = scenario;
    info!(
        "run_headless: {} particles, {} frames at dt = {}",
        controller.registry.len(),
        engine.frames,
        engine.dt
    );

    let mut summary = RunSummary::default();
    for frame in 1..=engine.frames {
        controller.step(engine.dt);
        let report = controller.last_report();
        summary.colliding_pairs += report.collisions.pairs;
        summary.stopped += report.stopped;

        if engine.log_every > 0 && frame % engine.log_every == 0 {
            let (lo, hi) = height_range(controller).unwrap_or_default();
            info!(
                "frame {frame}: t = {:.3}, {} colliding pairs, y in [{lo:.3}, {hi:.3}]",
                controller.t, report.collisions.pairs
            );
        }
    }

    let (min_y, max_y) = height_range(controller).unwrap_or_default();
    summary.frames = engine.frames;
    summary.t = controller.t;
    summary.min_y = min_y;
    summary.max_y = max_y;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::params::PhysicsParams;
    use crate::simulation::states::{ElasticBody, NVec3, Particle};

    #[test]
    fn height_range_spans_every_group() {
        let mut controller = PhysicsController::new(PhysicsParams::default());
        assert_eq!(height_range(&controller), None);

        controller.set_particles(vec![Particle::new(NVec3::new(0.0, 2.0, 0.0), 0.5)]);
        controller.set_elastic_bodies(vec![ElasticBody::new(
            "strip",
            vec![
                Particle::new(NVec3::new(1.0, -3.0, 0.0), 0.5),
                Particle::new(NVec3::new(2.0, 7.5, 0.0), 0.5),
            ],
        )]);
        assert_eq!(height_range(&controller), Some((-3.0, 7.5)));
    }
}
