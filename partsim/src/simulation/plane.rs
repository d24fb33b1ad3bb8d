//! Plane geometry for hard bodies
//!
//! A plane is stored relative to an anchor point (the owning hard body's
//! center) so that moving the body moves its surface with it.
//! Planes are infinite unless given a rectangular `PlaneExtent`.

use nalgebra::Unit;

use crate::simulation::states::NVec3;

/// Shortest normal or in-plane axis that can still be normalized
pub const MIN_AXIS_NORM: f64 = 1e-9;

/// Rectangular bound of a plane around its anchor
/// - `u_axis` lies in the plane, `v_axis = normal x u_axis`
/// - a hit counts only if `|rel . u| <= half_u` and `|rel . v| <= half_v`
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneExtent {
    pub u_axis: Unit<NVec3>,
    pub half_u: f64,
    pub half_v: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: Unit<NVec3>,
    pub standoff: f64, // offset kept between a stopped particle and the surface
    pub extent: Option<PlaneExtent>,
}

/// Result of a successful segment/plane test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneHit {
    pub point: NVec3, // where the segment meets the surface
    pub normal: NVec3, // unit normal facing the side the segment started on
}

impl Plane {
    /// Infinite plane
    pub fn new(normal: Unit<NVec3>, standoff: f64) -> Self {
        Self {
            normal,
            standoff,
            extent: None,
        }
    }

    /// Bound the plane to a `2*half_u` by `2*half_v` rectangle
    ///
    /// `u_axis` is projected into the plane first. Returns `None` if it is
    /// parallel to the normal.
    pub fn with_extent(mut self, u_axis: NVec3, half_u: f64, half_v: f64) -> Option<Self> {
        let n = self.normal.into_inner();
        let in_plane = u_axis - n * n.dot(&u_axis);
        let u_axis = Unit::try_new(in_plane, MIN_AXIS_NORM)?;
        self.extent = Some(PlaneExtent { u_axis, half_u, half_v });
        Some(self)
    }

    /// Signed distance of `p` from the plane through `anchor`
    pub fn signed_distance(&self, anchor: NVec3, p: NVec3) -> f64 {
        (p - anchor).dot(&*self.normal)
    }

    /// Whether a point already on the plane lies inside the extent
    pub fn contains(&self, anchor: NVec3, point: NVec3) -> bool {
        match &self.extent {
            None => true,
            Some(ext) => {
                let rel = point - anchor;
                let v_axis = self.normal.cross(&*ext.u_axis);
                rel.dot(&*ext.u_axis).abs() <= ext.half_u && rel.dot(&v_axis).abs() <= ext.half_v
            }
        }
    }

    /// Test the segment `start -> end` against the plane through `anchor`
    ///
    /// The segment hits when it goes from strictly one side onto or past the
    /// surface. A segment that starts exactly on the plane hits only when it
    /// moves behind the front face, so a particle resting on a zero-standoff
    /// plane stays there instead of sinking, and can still lift off.
    pub fn line_intersection(&self, anchor: NVec3, start: NVec3, end: NVec3) -> Option<PlaneHit> {
        let d0 = self.signed_distance(anchor, start);
        let d1 = self.signed_distance(anchor, end);

        let crosses = (d0 > 0.0 && d1 <= 0.0) || (d0 < 0.0 && d1 >= 0.0) || (d0 == 0.0 && d1 < 0.0);
        if !crosses {
            return None;
        }

        // d0 and d1 differ in sign (or exactly one is 0), so the denominator is nonzero
        let t = d0 / (d0 - d1);
        let point = start + (end - start) * t;
        if !self.contains(anchor, point) {
            return None;
        }

        let n = self.normal.into_inner();
        let normal = if d0 >= 0.0 { n } else { -n };
        Some(PlaneHit { point, normal })
    }
}
