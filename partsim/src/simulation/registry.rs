//! Population groups and the per-tick working set
//!
//! The registry owns free particles, elastic bodies and hard bodies. Each tick
//! it flattens them into a `WorkingSet` of handles in a fixed order:
//! hard bodies, free particles, then every elastic body's particles in body
//! order. The handles stay valid for the whole tick because the groups are
//! only replaced between ticks.

use crate::simulation::states::{ElasticBody, HardBody, Particle};

/// Handle to one simulatable particle, resolved once when the set is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleRef {
    Hard(usize),
    Free(usize),
    Elastic { body: usize, index: usize },
}

impl ParticleRef {
    pub fn is_rigid(&self) -> bool {
        matches!(self, ParticleRef::Hard(_))
    }
}

/// Flattened, ordered list of every particle taking part in this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingSet {
    pub refs: Vec<ParticleRef>,
}

impl WorkingSet {
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ParticleRef> + '_ {
        self.refs.iter().copied()
    }

    /// Free and elastic-body particles only (the gravity subset)
    pub fn non_rigid(&self) -> impl Iterator<Item = ParticleRef> + '_ {
        self.iter().filter(|r| !r.is_rigid())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticleRegistry {
    particles: Vec<Particle>,
    elastic_bodies: Vec<ElasticBody>,
    hard_bodies: Vec<HardBody>,
}

impl ParticleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_particles(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
    }

    pub fn set_elastic_bodies(&mut self, elastic_bodies: Vec<ElasticBody>) {
        self.elastic_bodies = elastic_bodies;
    }

    pub fn set_hard_bodies(&mut self, hard_bodies: Vec<HardBody>) {
        self.hard_bodies = hard_bodies;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn elastic_bodies(&self) -> &[ElasticBody] {
        &self.elastic_bodies
    }

    pub fn hard_bodies(&self) -> &[HardBody] {
        &self.hard_bodies
    }

    /// Total number of particles a flattened set would hold
    pub fn len(&self) -> usize {
        self.hard_bodies.len()
            + self.particles.len()
            + self.elastic_bodies.iter().map(|b| b.particles.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build this tick's working set: hard, free, then elastic in body order
    pub fn flatten(&self) -> WorkingSet {
        let mut refs = Vec::with_capacity(self.len());
        refs.extend((0..self.hard_bodies.len()).map(ParticleRef::Hard));
        refs.extend((0..self.particles.len()).map(ParticleRef::Free));
        for (body, eb) in self.elastic_bodies.iter().enumerate() {
            refs.extend((0..eb.particles.len()).map(|index| ParticleRef::Elastic { body, index }));
        }
        WorkingSet { refs }
    }

    /// Resolve a handle from the current tick's working set
    ///
    /// Panics if the handle is stale, which means a group was replaced mid-tick.
    pub fn particle(&self, r: ParticleRef) -> &Particle {
        match r {
            ParticleRef::Hard(i) => &self.hard_bodies[i].body,
            ParticleRef::Free(i) => &self.particles[i],
            ParticleRef::Elastic { body, index } => &self.elastic_bodies[body].particles[index],
        }
    }

    pub fn particle_mut(&mut self, r: ParticleRef) -> &mut Particle {
        match r {
            ParticleRef::Hard(i) => &mut self.hard_bodies[i].body,
            ParticleRef::Free(i) => &mut self.particles[i],
            ParticleRef::Elastic { body, index } => &mut self.elastic_bodies[body].particles[index],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::plane::Plane;
    use crate::simulation::states::NVec3;

    fn dot(x: f64) -> Particle {
        Particle::new(NVec3::new(x, 0.0, 0.0), 0.1)
    }

    #[test]
    fn flatten_orders_hard_free_elastic() {
        let mut reg = ParticleRegistry::new();
        reg.set_particles(vec![dot(1.0), dot(2.0)]);
        reg.set_elastic_bodies(vec![
            ElasticBody::new("a", vec![dot(3.0)]),
            ElasticBody::new("b", vec![dot(4.0), dot(5.0)]),
        ]);
        reg.set_hard_bodies(vec![HardBody::new(dot(0.0), Plane::new(NVec3::y_axis(), 0.0))]);

        let set = reg.flatten();
        assert_eq!(
            set.refs,
            vec![
                ParticleRef::Hard(0),
                ParticleRef::Free(0),
                ParticleRef::Free(1),
                ParticleRef::Elastic { body: 0, index: 0 },
                ParticleRef::Elastic { body: 1, index: 0 },
                ParticleRef::Elastic { body: 1, index: 1 },
            ]
        );
        let xs: Vec<f64> = set.iter().map(|r| reg.particle(r).x.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(set.non_rigid().count(), 5);
    }

    #[test]
    fn empty_registry_flattens_to_empty_set() {
        let reg = ParticleRegistry::new();
        assert!(reg.flatten().is_empty());
        assert!(reg.is_empty());
    }
}
