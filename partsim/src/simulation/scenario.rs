//! Build a ready-to-run simulation from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing), validates it and produces the
//! runtime bundle:
//! - frame clock settings (`Engine`)
//! - a `PhysicsController` holding the constants and all three groups

use nalgebra::Unit;

use crate::configuration::config::{
    DampeningConfig, HardBodyConfig, ParticleConfig, PhysicsConfig, ResponseConfig, ScenarioConfig,
};
use crate::configuration::error::{ConfigError, Result};
use crate::simulation::controller::PhysicsController;
use crate::simulation::engine::Engine;
use crate::simulation::params::{DampeningSource, PhysicsParams, ResponseMode};
use crate::simulation::plane::{Plane, MIN_AXIS_NORM};
use crate::simulation::states::{ElasticBody, HardBody, NVec3, Particle};

/// Fully-initialized simulation, ready for a host loop
#[derive(Debug, Clone)]
pub struct Scenario {
    pub engine: Engine,
    pub controller: PhysicsController,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        cfg.validate()?;

        let engine = Engine {
            dt: cfg.engine.dt,
            frames: cfg.engine.frames,
            log_every: cfg.engine.log_every,
        };

        let mut controller = PhysicsController::new(physics_params(&cfg.physics));
        controller.set_particles(cfg.particles.iter().map(particle).collect());
        controller.set_elastic_bodies(
            cfg.elastic_bodies
                .iter()
                .map(|eb| ElasticBody::new(eb.name.clone(), eb.particles.iter().map(particle).collect()))
                .collect(),
        );
        let hard_bodies = cfg
            .hard_bodies
            .iter()
            .enumerate()
            .map(|(i, hb)| hard_body(i, hb))
            .collect::<Result<Vec<_>>>()?;
        controller.set_hard_bodies(hard_bodies);

        Ok(Self { engine, controller })
    }
}

// helpers ==============================================================================

fn physics_params(p: &PhysicsConfig) -> PhysicsParams {
    PhysicsParams {
        gravitational_force: p.gravitational_force,
        avg_weight: p.avg_weight,
        energy_leak_upon_bounce: p.energy_leak_upon_bounce,
        coefficient_of_repulsion: p.coefficient_of_repulsion,
        response: match p.response {
            ResponseConfig::Sequential => ResponseMode::Sequential,
            ResponseConfig::Snapshot => ResponseMode::Snapshot,
        },
        dampening: match p.dampening {
            DampeningConfig::Partner => DampeningSource::Partner,
            DampeningConfig::SelfIndexed => DampeningSource::SelfIndexed,
        },
        gravity_on_hard_bodies: p.gravity_on_hard_bodies,
    }
}

// vectors are length-checked by `validate`
fn nvec3(v: &[f64]) -> NVec3 {
    NVec3::new(v[0], v[1], v[2])
}

fn particle(pc: &ParticleConfig) -> Particle {
    Particle::new(nvec3(&pc.x), pc.radius)
        .with_velocity(nvec3(&pc.v))
        .with_weight_coefficient(pc.weight_coefficient)
        .with_bouncy_factor(pc.bouncy_factor)
        .with_dampening_effect(pc.dampening_effect)
}

fn hard_body(index: usize, hb: &HardBodyConfig) -> Result<HardBody> {
    let body = Particle::new(nvec3(&hb.x), hb.radius)
        .with_weight_coefficient(hb.weight_coefficient)
        .with_dampening_effect(hb.dampening_effect);

    let normal = Unit::try_new(nvec3(&hb.normal), MIN_AXIS_NORM).ok_or(ConfigError::ZeroNormal { index })?;
    let mut plane = Plane::new(normal, hb.standoff);
    if let Some(ext) = &hb.extent {
        plane = plane
            .with_extent(nvec3(&ext.u_axis), ext.half_u, ext.half_v)
            .ok_or(ConfigError::BadExtentAxis { index })?;
    }

    Ok(HardBody::new(body, plane))
}
