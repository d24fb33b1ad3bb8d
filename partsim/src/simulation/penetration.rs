//! Swept position commit against hard-body planes
//!
//! A particle's proposed move is one Euler step, `x + v`. The segment is
//! tested against every hard-body plane; if any plane is crossed the particle
//! stops at the nearest resting point `hit + normal * standoff` instead of
//! passing through. Two-plane sliding is not modelled: the nearest surface
//! wins outright.

use log::trace;

use crate::simulation::registry::{ParticleRef, ParticleRegistry, WorkingSet};
use crate::simulation::states::{HardBody, NVec3};

/// Final center for a particle moving `start -> start + velocity`
///
/// `skip` names a hard body to leave out, used so a hard body is never swept
/// against its own plane. Ties keep the first body in list order.
pub fn prevent_penetration(start: NVec3, velocity: NVec3, hard_bodies: &[HardBody], skip: Option<usize>) -> NVec3 {
    let end = start + velocity;

    let mut nearest: Option<(NVec3, f64)> = None;
    for (k, hb) in hard_bodies.iter().enumerate() {
        if skip == Some(k) {
            continue;
        }
        let Some(hit) = hb.line_intersection(start, end) else {
            continue;
        };

        let resting = hit.point + hit.normal * hb.radius();
        let dist = (resting - start).norm();
        trace!("segment {start:?} -> {end:?} hits hard body {k} at {:?}", hit.point);

        match nearest {
            Some((_, best)) if dist >= best => {}
            _ => nearest = Some((resting, dist)),
        }
    }

    nearest.map_or(end, |(resting, _)| resting)
}

/// Commit positions for every particle in `set`
///
/// Returns how many particles were stopped at a surface this tick.
pub fn update_positions(registry: &mut ParticleRegistry, set: &WorkingSet) -> usize {
    let mut stopped = 0;

    for r in set.iter() {
        let skip = match r {
            ParticleRef::Hard(k) => Some(k),
            _ => None,
        };
        let p = registry.particle(r);
        let (start, velocity) = (p.x, p.v);

        let x = prevent_penetration(start, velocity, registry.hard_bodies(), skip);
        if x != start + velocity {
            stopped += 1;
        }
        registry.particle_mut(r).x = x;
    }

    stopped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::plane::Plane;
    use crate::simulation::states::Particle;
    use approx::assert_relative_eq;

    fn wall(x: f64, normal: NVec3, standoff: f64) -> HardBody {
        HardBody::new(
            Particle::new(NVec3::new(x, 0.0, 0.0), 0.0),
            Plane::new(nalgebra::Unit::new_normalize(normal), standoff),
        )
    }

    #[test]
    fn no_planes_is_plain_euler() {
        let x = prevent_penetration(NVec3::new(1.0, 2.0, 3.0), NVec3::new(0.5, -1.0, 0.0), &[], None);
        assert_eq!(x, NVec3::new(1.5, 1.0, 3.0));
    }

    #[test]
    fn nearest_of_two_walls_wins() {
        let walls = vec![
            wall(0.0, NVec3::x(), 0.1),
            wall(2.0, NVec3::x(), 0.1),
        ];
        let x = prevent_penetration(NVec3::new(5.0, 0.0, 0.0), NVec3::new(-10.0, 0.0, 0.0), &walls, None);
        assert_relative_eq!(x.x, 2.1, epsilon = 1e-12);

        // same answer regardless of list order
        let reversed: Vec<HardBody> = walls.into_iter().rev().collect();
        let x = prevent_penetration(NVec3::new(5.0, 0.0, 0.0), NVec3::new(-10.0, 0.0, 0.0), &reversed, None);
        assert_relative_eq!(x.x, 2.1, epsilon = 1e-12);
    }

    #[test]
    fn skipped_body_is_ignored() {
        let walls = vec![wall(0.0, NVec3::x(), 0.5)];
        let x = prevent_penetration(NVec3::new(1.0, 0.0, 0.0), NVec3::new(-2.0, 0.0, 0.0), &walls, Some(0));
        assert_relative_eq!(x.x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn approach_from_behind_rests_behind() {
        let walls = vec![wall(0.0, NVec3::x(), 0.5)];
        let x = prevent_penetration(NVec3::new(-3.0, 0.0, 0.0), NVec3::new(6.0, 0.0, 0.0), &walls, None);
        assert_relative_eq!(x.x, -0.5, epsilon = 1e-12);
    }
}
