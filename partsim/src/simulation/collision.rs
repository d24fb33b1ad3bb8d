//! Soft all-pairs collision response
//!
//! Two passes over the working set, O(n^2) per tick:
//!
//! 1. **Detection.** For every ordered pair `(i, j)`, `i != j`, whose spheres
//!    overlap (`distance < r_i + r_j`) record
//!    - `N[i,j]` unit push direction from `j` toward `i`,
//!    - `W[i,j] = |1 - distance / (r_i + r_j)|`, 0 at first contact, 1 fully overlapped,
//!
//!    and per particle the pressure
//!    `H[i] = max(0, weight_i * (sum_j W[i,j] - avg_weight))`.
//!
//! 2. **Response.** For every colliding pair
//!    `dv = dt * repulsion * (H[i] + H[j]) * W[i,j] * N[i,j]`
//!    and `v_i = (v_i + dv) * energy_leak * damp`, applied per pair in row
//!    order (see [`ResponseMode`] for the snapshot alternative).
//!
//! The scratch matrices live in the resolver and are reused between ticks;
//! they are resized, never shared.

use crate::simulation::params::{DampeningSource, PhysicsParams, ResponseMode};
use crate::simulation::registry::{ParticleRegistry, WorkingSet};
use crate::simulation::states::NVec3;

/// Per-tick summary of the collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    pub pairs: usize, // ordered colliding pairs (each contact counts twice)
    pub touched: usize, // particles with at least one colliding neighbour
}

/// Push direction for a pair whose centers coincide
///
/// Antisymmetric in `(i, j)` so the two particles still separate: the one
/// later in the working set goes up, the earlier one down.
pub fn fallback_direction(i: usize, j: usize) -> NVec3 {
    if i > j { NVec3::y() } else { -NVec3::y() }
}

#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    n: usize,
    normals: Vec<NVec3>, // N, row-major n x n
    weights: Vec<f64>,   // W, row-major n x n
    collide: Vec<bool>,  // row-major n x n
    pressure: Vec<f64>,  // H, one per particle
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Side length of the scratch matrices after the last `resolve`
    pub fn capacity(&self) -> usize {
        self.n
    }

    // row-major slot of (i, j), None outside the last working set
    fn cell(&self, i: usize, j: usize) -> Option<usize> {
        (i < self.n && j < self.n).then(|| i * self.n + j)
    }

    pub fn collides(&self, i: usize, j: usize) -> bool {
        self.cell(i, j).is_some_and(|k| self.collide[k])
    }

    pub fn weight(&self, i: usize, j: usize) -> Option<f64> {
        self.cell(i, j).and_then(|k| self.weights.get(k).copied())
    }

    pub fn normal(&self, i: usize, j: usize) -> Option<NVec3> {
        self.cell(i, j).and_then(|k| self.normals.get(k).copied())
    }

    pub fn pressure(&self, i: usize) -> Option<f64> {
        self.pressure.get(i).copied()
    }

    /// Clear and size the scratch buffers for `n` particles, keeping capacity
    fn reset(&mut self, n: usize) {
        self.n = n;
        let nn = n * n;

        self.normals.clear();
        self.normals.resize(nn, NVec3::zeros());
        self.weights.clear();
        self.weights.resize(nn, 0.0);
        self.collide.clear();
        self.collide.resize(nn, false);
        self.pressure.clear();
        self.pressure.resize(n, 0.0);
    }

    /// Run detection and response over `set`, writing corrected velocities
    /// back into `registry`
    pub fn resolve(
        &mut self,
        registry: &mut ParticleRegistry,
        set: &WorkingSet,
        params: &PhysicsParams,
        dt: f64,
    ) -> CollisionStats {
        self.detect(registry, set, params);
        self.respond(registry, set, params, dt)
    }

    /// Detection pass: fills N, W, collide and H
    fn detect(&mut self, registry: &ParticleRegistry, set: &WorkingSet, params: &PhysicsParams) {
        let n = set.len();
        self.reset(n);

        for i in 0..n {
            let pi = registry.particle(set.refs[i]);
            let mut w_i = 0.0;

            for j in 0..n {
                if i == j {
                    continue;
                }
                let pj = registry.particle(set.refs[j]);

                let radius = pi.radius + pj.radius;
                let distance = pi.distance(pj);
                if distance < radius {
                    let k = i * n + j;
                    self.normals[k] = pi
                        .normalized_relative_pos(pj)
                        .unwrap_or_else(|| fallback_direction(i, j));
                    self.weights[k] = (1.0 - distance / radius).abs();
                    self.collide[k] = true;
                    w_i += self.weights[k];
                }
            }

            self.pressure[i] = (pi.weight_coefficient * (w_i - params.avg_weight)).max(0.0);
        }
    }

    /// Response pass: one velocity update per colliding pair touching `i`
    fn respond(
        &self,
        registry: &mut ParticleRegistry,
        set: &WorkingSet,
        params: &PhysicsParams,
        dt: f64,
    ) -> CollisionStats {
        let n = self.n;
        let mut stats = CollisionStats::default();
        let scale = dt * params.coefficient_of_repulsion;
        let leak = params.energy_leak_upon_bounce;

        for i in 0..n {
            let row = &self.collide[i * n..(i + 1) * n];
            let contacts = row.iter().filter(|&&c| c).count();
            if contacts == 0 {
                continue;
            }
            stats.pairs += contacts;
            stats.touched += 1;

            let pi = registry.particle(set.refs[i]);
            let v0 = pi.v;
            let own_damp = pi.dampening_effect;

            let damp_of = |j: usize| match params.dampening {
                DampeningSource::Partner => registry.particle(set.refs[j]).dampening_effect,
                DampeningSource::SelfIndexed => own_damp,
            };
            let impulse = |j: usize| {
                let k = i * n + j;
                scale * (self.pressure[i] + self.pressure[j]) * self.weights[k] * self.normals[k]
            };

            let v = match params.response {
                ResponseMode::Sequential => {
                    let mut v = v0;
                    for j in (0..n).filter(|&j| row[j]) {
                        v = (v + impulse(j)) * leak * damp_of(j);
                    }
                    v
                }
                ResponseMode::Snapshot => {
                    let mut dv = NVec3::zeros();
                    let mut damp = 0.0;
                    for j in (0..n).filter(|&j| row[j]) {
                        dv += impulse(j);
                        damp += damp_of(j);
                    }
                    (v0 + dv) * leak * (damp / contacts as f64)
                }
            };

            registry.particle_mut(set.refs[i]).v = v;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::Particle;

    fn registry_of(particles: Vec<Particle>) -> (ParticleRegistry, WorkingSet) {
        let mut reg = ParticleRegistry::new();
        reg.set_particles(particles);
        let set = reg.flatten();
        (reg, set)
    }

    #[test]
    fn scratch_is_resized_between_ticks() {
        let mut resolver = CollisionResolver::new();
        let params = PhysicsParams::weightless();

        let (mut reg, set) = registry_of(vec![
            Particle::new(NVec3::zeros(), 1.0),
            Particle::new(NVec3::new(1.0, 0.0, 0.0), 1.0),
            Particle::new(NVec3::new(10.0, 0.0, 0.0), 1.0),
        ]);
        resolver.resolve(&mut reg, &set, &params, 0.1);
        assert_eq!(resolver.capacity(), 3);
        assert!(resolver.collides(0, 1));
        assert!(!resolver.collides(0, 2));

        let (mut reg, set) = registry_of(vec![Particle::new(NVec3::zeros(), 1.0)]);
        let stats = resolver.resolve(&mut reg, &set, &params, 0.1);
        assert_eq!(resolver.capacity(), 1);
        assert!(!resolver.collides(0, 1));
        assert_eq!(stats, CollisionStats::default());
    }

    #[test]
    fn weights_and_pressure_follow_overlap() {
        let mut resolver = CollisionResolver::new();
        let params = PhysicsParams { avg_weight: 0.1, ..PhysicsParams::weightless() };
        let (mut reg, set) = registry_of(vec![
            Particle::new(NVec3::zeros(), 1.0).with_weight_coefficient(2.0),
            Particle::new(NVec3::new(1.5, 0.0, 0.0), 1.0),
        ]);
        resolver.resolve(&mut reg, &set, &params, 0.1);

        assert!((resolver.weight(0, 1).unwrap() - 0.25).abs() < 1e-12);
        assert!((resolver.weight(1, 0).unwrap() - 0.25).abs() < 1e-12);
        assert!((resolver.pressure(0).unwrap() - 2.0 * 0.15).abs() < 1e-12);
        assert!((resolver.pressure(1).unwrap() - 0.15).abs() < 1e-12);
        assert_eq!(resolver.normal(0, 1), Some(NVec3::new(-1.0, 0.0, 0.0)));
        assert_eq!(resolver.normal(1, 0), Some(NVec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn accessors_outside_working_set_are_none() {
        let mut resolver = CollisionResolver::new();
        assert_eq!(resolver.weight(0, 0), None);
        assert_eq!(resolver.pressure(0), None);

        let (mut reg, set) = registry_of(vec![
            Particle::new(NVec3::zeros(), 1.0),
            Particle::new(NVec3::new(1.5, 0.0, 0.0), 1.0),
        ]);
        resolver.resolve(&mut reg, &set, &PhysicsParams::weightless(), 0.1);

        // (0, 2) would alias (1, 0) in the flat buffer
        assert_eq!(resolver.weight(0, 2), None);
        assert_eq!(resolver.normal(2, 0), None);
        assert_eq!(resolver.pressure(2), None);
        assert!(!resolver.collides(0, 2));
        assert!(resolver.weight(0, 1).is_some());
    }

    #[test]
    fn pressure_clamps_at_zero_below_baseline() {
        let mut resolver = CollisionResolver::new();
        let params = PhysicsParams { avg_weight: 0.9, ..PhysicsParams::weightless() };
        let (mut reg, set) = registry_of(vec![
            Particle::new(NVec3::zeros(), 1.0),
            Particle::new(NVec3::new(1.5, 0.0, 0.0), 1.0),
        ]);
        resolver.resolve(&mut reg, &set, &params, 0.1);
        assert_eq!(resolver.pressure(0), Some(0.0));
        assert_eq!(resolver.pressure(1), Some(0.0));
    }

    #[test]
    fn coincident_centers_use_opposite_fallbacks() {
        let mut resolver = CollisionResolver::new();
        let params = PhysicsParams::weightless();
        let (mut reg, set) = registry_of(vec![
            Particle::new(NVec3::zeros(), 1.0),
            Particle::new(NVec3::zeros(), 1.0),
        ]);
        resolver.resolve(&mut reg, &set, &params, 0.1);

        assert_eq!(resolver.normal(0, 1), Some(-NVec3::y()));
        assert_eq!(resolver.normal(1, 0), Some(NVec3::y()));
        let v0 = reg.particles()[0].v;
        let v1 = reg.particles()[1].v;
        assert!(v0.iter().chain(v1.iter()).all(|c| c.is_finite()));
        assert!(v0.y < 0.0 && v1.y > 0.0);
    }

    #[test]
    fn sequential_and_snapshot_agree_for_single_contact() {
        let particles = vec![
            Particle::new(NVec3::zeros(), 1.0).with_velocity(NVec3::new(0.3, 0.0, 0.0)),
            Particle::new(NVec3::new(1.2, 0.0, 0.0), 1.0),
        ];
        let seq = PhysicsParams::weightless();
        let snap = PhysicsParams { response: ResponseMode::Snapshot, ..PhysicsParams::weightless() };

        let (mut a, set) = registry_of(particles.clone());
        CollisionResolver::new().resolve(&mut a, &set, &seq, 0.1);
        let (mut b, set) = registry_of(particles);
        CollisionResolver::new().resolve(&mut b, &set, &snap, 0.1);

        assert!((a.particles()[0].v - b.particles()[0].v).norm() < 1e-12);
    }

    #[test]
    fn sequential_compounds_leak_per_neighbour() {
        // middle particle touches both outer ones
        let particles = vec![
            Particle::new(NVec3::new(-1.5, 0.0, 0.0), 1.0),
            Particle::new(NVec3::zeros(), 1.0).with_velocity(NVec3::new(0.0, 1.0, 0.0)),
            Particle::new(NVec3::new(1.5, 0.0, 0.0), 1.0),
        ];
        let seq = PhysicsParams::weightless();
        let snap = PhysicsParams { response: ResponseMode::Snapshot, ..PhysicsParams::weightless() };

        let (mut a, set) = registry_of(particles.clone());
        CollisionResolver::new().resolve(&mut a, &set, &seq, 0.1);
        let (mut b, set) = registry_of(particles);
        CollisionResolver::new().resolve(&mut b, &set, &snap, 0.1);

        // the pushes are along x, so y only sees the leak
        assert!((a.particles()[1].v.y - 0.81).abs() < 1e-12);
        assert!((b.particles()[1].v.y - 0.9).abs() < 1e-12);
    }

    #[test]
    fn dampening_source_selects_coefficient() {
        let particles = vec![
            Particle::new(NVec3::zeros(), 1.0)
                .with_velocity(NVec3::new(0.0, 1.0, 0.0))
                .with_dampening_effect(0.5),
            Particle::new(NVec3::new(1.9, 0.0, 0.0), 1.0).with_dampening_effect(0.25),
        ];
        let partner = PhysicsParams { energy_leak_upon_bounce: 1.0, ..PhysicsParams::weightless() };
        let own = PhysicsParams { dampening: DampeningSource::SelfIndexed, ..partner.clone() };

        let (mut a, set) = registry_of(particles.clone());
        CollisionResolver::new().resolve(&mut a, &set, &partner, 0.1);
        let (mut b, set) = registry_of(particles);
        CollisionResolver::new().resolve(&mut b, &set, &own, 0.1);

        assert!((a.particles()[0].v.y - 0.25).abs() < 1e-12);
        assert!((b.particles()[0].v.y - 0.5).abs() < 1e-12);
    }
}
