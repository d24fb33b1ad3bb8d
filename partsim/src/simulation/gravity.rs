//! Uniform downward gravity
//!
//! Kicks velocities only; positions are committed later by the
//! penetration stage.

use crate::simulation::params::PhysicsParams;
use crate::simulation::registry::{ParticleRegistry, WorkingSet};
use crate::simulation::states::NVec3;

/// v += (0, g, 0) * dt for every non-rigid particle in `set`
///
/// Hard bodies are included only when `params.gravity_on_hard_bodies` is set.
pub fn apply_gravity(registry: &mut ParticleRegistry, set: &WorkingSet, params: &PhysicsParams, dt: f64) {
    let kick = NVec3::new(0.0, params.gravitational_force, 0.0) * dt;
    if kick == NVec3::zeros() {
        return;
    }

    for r in set.iter().filter(|r| params.gravity_on_hard_bodies || !r.is_rigid()) {
        registry.particle_mut(r).v += kick;
    }
}
