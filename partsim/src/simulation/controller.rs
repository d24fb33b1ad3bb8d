//! Tick driver
//!
//! `PhysicsController::step(dt)` runs one synchronous tick:
//! flatten -> gravity -> collision -> penetration. Each stage sees all of the
//! previous stage's writes; nothing runs concurrently.

use log::debug;

use crate::simulation::collision::{CollisionResolver, CollisionStats};
use crate::simulation::gravity::apply_gravity;
use crate::simulation::params::PhysicsParams;
use crate::simulation::penetration::update_positions;
use crate::simulation::registry::ParticleRegistry;
use crate::simulation::states::{ElasticBody, HardBody, Particle};

/// What happened during the last tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub particles: usize, // size of the working set
    pub collisions: CollisionStats,
    pub stopped: usize, // particles held back by a plane
}

#[derive(Debug, Clone, Default)]
pub struct PhysicsController {
    pub registry: ParticleRegistry,
    pub params: PhysicsParams,
    resolver: CollisionResolver,
    last: StepReport,
    pub t: f64, // simulated time
    pub frame: u64,
}

impl PhysicsController {
    pub fn new(params: PhysicsParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Replace all free particles; call between ticks only
    pub fn set_particles(&mut self, particles: Vec<Particle>) {
        self.registry.set_particles(particles);
    }

    /// Replace all elastic bodies; call between ticks only
    pub fn set_elastic_bodies(&mut self, elastic_bodies: Vec<ElasticBody>) {
        self.registry.set_elastic_bodies(elastic_bodies);
    }

    /// Replace all hard bodies; call between ticks only
    pub fn set_hard_bodies(&mut self, hard_bodies: Vec<HardBody>) {
        self.registry.set_hard_bodies(hard_bodies);
    }

    /// Summary of the most recent `step`
    pub fn last_report(&self) -> StepReport {
        self.last
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f64) {
        let set = self.registry.flatten();

        apply_gravity(&mut self.registry, &set, &self.params, dt);
        let collisions = self.resolver.resolve(&mut self.registry, &set, &self.params, dt);
        let stopped = update_positions(&mut self.registry, &set);

        self.t += dt;
        self.frame += 1;

        self.last = StepReport {
            particles: set.len(),
            collisions,
            stopped,
        };
        debug!(
            "frame {} t={:.4}: {} particles, {} colliding pairs, {} stopped",
            self.frame, self.t, self.last.particles, collisions.pairs, stopped
        );
    }
}
