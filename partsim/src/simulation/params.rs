//! Physical constants for one simulation tick
//!
//! `PhysicsParams` is immutable while a tick runs and is passed into every
//! stage explicitly:
//! - gravity, overlap baseline, energy leak and repulsion coefficient,
//! - how the response pass combines several colliding neighbours,
//! - whose dampening a colliding pair applies,
//! - whether hard bodies fall under gravity

/// How the response pass combines the impulses from several neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Each colliding pair updates the velocity in place, in row order, so
    /// leak and dampening compound once per neighbour
    #[default]
    Sequential,
    /// All impulses are summed against the pre-pass velocity, then leak and
    /// the mean partner dampening are applied once
    Snapshot,
}

/// Whose dampening effect attenuates a particle after a collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DampeningSource {
    /// The colliding partner's coefficient
    #[default]
    Partner,
    /// The particle's own coefficient, once per colliding pair
    SelfIndexed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsParams {
    pub gravitational_force: f64, // signed y acceleration, negative is down
    pub avg_weight: f64, // overlap baseline subtracted before pressure
    pub energy_leak_upon_bounce: f64, // global post-collision velocity scale in [0, 1]
    pub coefficient_of_repulsion: f64, // collision impulse scale
    pub response: ResponseMode,
    pub dampening: DampeningSource,
    pub gravity_on_hard_bodies: bool,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravitational_force: -0.1,
            // very low gives a firm bounce
            avg_weight: 0.0,
            energy_leak_upon_bounce: 0.9,
            coefficient_of_repulsion: 10.0,
            response: ResponseMode::Sequential,
            dampening: DampeningSource::Partner,
            gravity_on_hard_bodies: false,
        }
    }
}

impl PhysicsParams {
    /// Default constants with gravity switched off
    pub fn weightless() -> Self {
        Self {
            gravitational_force: 0.0,
            ..Self::default()
        }
    }
}
