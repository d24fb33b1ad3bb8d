//! Core state types for the particle simulation.
//!
//! Defines the three population groups the controller works on:
//! - `Particle`    the atomic point-mass unit (free or owned by a body)
//! - `ElasticBody` an ordered group of particles with no explicit constraints
//! - `HardBody`    a rigid obstacle, collidable as one particle and swept as a plane
//!
//! The simulator only mutates `x` and `v`; everything else is set by whoever
//! builds the scene.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

use crate::simulation::plane::{Plane, PlaneHit};

/// Below this separation two centers are treated as coincident
pub const COINCIDENT_EPS: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: NVec3, // center
    pub v: NVec3, // velocity, displacement per tick
    pub radius: f64, // collision extent
    pub weight_coefficient: f64, // scales overlap into pressure
    pub bouncy_factor: f64, // post-collision scaling, carried but not applied
    pub dampening_effect: f64, // applied to the *other* particle of a colliding pair
}

impl Particle {
    /// Particle at rest at `x` with unit coefficients
    pub fn new(x: NVec3, radius: f64) -> Self {
        Self {
            x,
            v: NVec3::zeros(),
            radius,
            weight_coefficient: 1.0,
            bouncy_factor: 1.0,
            dampening_effect: 1.0,
        }
    }

    pub fn with_velocity(mut self, v: NVec3) -> Self {
        self.v = v;
        self
    }

    pub fn with_weight_coefficient(mut self, weight_coefficient: f64) -> Self {
        self.weight_coefficient = weight_coefficient;
        self
    }

    pub fn with_dampening_effect(mut self, dampening_effect: f64) -> Self {
        self.dampening_effect = dampening_effect;
        self
    }

    pub fn with_bouncy_factor(mut self, bouncy_factor: f64) -> Self {
        self.bouncy_factor = bouncy_factor;
        self
    }

    pub fn center(&self) -> NVec3 { self.x }
    pub fn set_center(&mut self, x: NVec3) { self.x = x; }
    pub fn velocity(&self) -> NVec3 { self.v }
    pub fn set_velocity(&mut self, v: NVec3) { self.v = v; }
    pub fn radius(&self) -> f64 { self.radius }
    pub fn weight_coefficient(&self) -> f64 { self.weight_coefficient }
    pub fn bouncy_factor(&self) -> f64 { self.bouncy_factor }
    pub fn dampening_effect(&self) -> f64 { self.dampening_effect }

    /// Distance between the two centers
    pub fn distance(&self, other: &Particle) -> f64 {
        (self.x - other.x).norm()
    }

    /// Unit vector pointing from `other` toward `self`
    ///
    /// Returns `None` when the centers coincide and no direction exists;
    /// the caller picks a fallback instead of propagating NaN.
    pub fn normalized_relative_pos(&self, other: &Particle) -> Option<NVec3> {
        (self.x - other.x).try_normalize(COINCIDENT_EPS)
    }
}

/// Ordered group of particles moving together under gravity and collision
#[derive(Debug, Clone, Default)]
pub struct ElasticBody {
    pub name: String,
    pub particles: Vec<Particle>,
}

impl ElasticBody {
    pub fn new(name: impl Into<String>, particles: Vec<Particle>) -> Self {
        Self {
            name: name.into(),
            particles,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}

/// Rigid obstacle
///
/// `body` takes part in collision detection like any other particle.
/// `plane` passes through `body.x` and is what penetration prevention sweeps
/// particles against.
#[derive(Debug, Clone)]
pub struct HardBody {
    pub body: Particle,
    pub plane: Plane,
}

impl HardBody {
    pub fn new(body: Particle, plane: Plane) -> Self {
        Self { body, plane }
    }

    /// Standoff distance kept between a stopped particle and the surface
    pub fn radius(&self) -> f64 {
        self.plane.standoff
    }

    /// Sweep the segment `start -> end` against this body's plane
    pub fn line_intersection(&self, start: NVec3, end: NVec3) -> Option<PlaneHit> {
        self.plane.line_intersection(self.body.x, start, end)
    }
}
