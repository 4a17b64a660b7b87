//! Great-circle edges and their crossings with cap boundaries.

use glam::DVec3;

use crate::cap::Cap;
use crate::constants::EPSILON;
use crate::quadratic::Quadratic;
use crate::vector::cos_between;

/// Great-circle arc between two points, shorter than a half circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    start: DVec3,
    end: DVec3,
    cos_angle: f64,
}

/// Up to two points where an arc crosses a cap boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeCrossings {
    points: [DVec3; 2],
    len: usize,
}

impl EdgeCrossings {
    fn push(&mut self, p: DVec3) {
        self.points[self.len] = p;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[DVec3] {
        &self.points[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &DVec3> {
        self.as_slice().iter()
    }
}

impl Arc {
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self {
            start,
            end,
            cos_angle: cos_between(start, end),
        }
    }

    #[inline]
    pub fn start(&self) -> DVec3 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DVec3 {
        self.end
    }

    /// Cosine of the angle subtended by the arc.
    #[inline]
    pub fn cos_angle(&self) -> f64 {
        self.cos_angle
    }

    /// The quadratic whose roots parametrize where the arc's great circle
    /// meets the cap boundary.
    ///
    /// With `u = tan(θ/2)` and the rational parametrization
    /// `p(r) = start·(1 + (u²(1-r) - 1)·r) + end·r·(1 + u²)`, the boundary
    /// condition `cap.vector·p(r) = d·|p(r)|` reduces to this quadratic in `r`.
    /// `r = 0` is `start`, `r = 1` is `end`.
    fn boundary_equation(&self, cap: &Cap) -> (Quadratic, f64) {
        let u_sq = (1.0 - self.cos_angle) / (1.0 + self.cos_angle);
        let gamma1 = cap.vector().dot(self.start);
        let gamma2 = cap.vector().dot(self.end);
        let d = cap.distance();

        let a = -u_sq * (gamma1 + d);
        let b = gamma1 * (u_sq - 1.0) + gamma2 * (u_sq + 1.0);
        let c = gamma1 - d;
        (Quadratic::new(a, b, c), u_sq)
    }

    /// Points strictly inside the arc (excluding ε-neighbourhoods of both
    /// endpoints) where it crosses the cap boundary. Returned on the unit
    /// sphere.
    pub fn intersect(&self, cap: &Cap) -> EdgeCrossings {
        let (quadratic, u_sq) = self.boundary_equation(cap);
        let mut crossings = EdgeCrossings::default();
        for r in quadratic.real_roots() {
            if r > EPSILON && r < 1.0 - EPSILON {
                crossings.push(self.point_at(r, u_sq).normalize());
            }
        }
        crossings
    }

    /// True when the arc crosses the cap boundary somewhere in its interior.
    #[inline]
    pub fn crosses(&self, cap: &Cap) -> bool {
        !self.intersect(cap).is_empty()
    }

    #[inline]
    fn point_at(&self, r: f64, u_sq: f64) -> DVec3 {
        self.start * (1.0 + (u_sq * (1.0 - r) - 1.0) * r) + self.end * (r * (1.0 + u_sq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_small_cap() {
        // Meridian from the equator to the north pole crosses a 10° polar cap.
        let arc = Arc::new(DVec3::Y, DVec3::Z);
        let cap = Cap::from_radius(DVec3::Z, 10f64.to_radians());
        let crossings = arc.intersect(&cap);
        assert_eq!(crossings.len(), 1);

        let p = crossings.as_slice()[0];
        assert!((p.length() - 1.0).abs() < 1e-9);
        assert!((p.z - cap.distance()).abs() < 1e-9);
        assert!(p.x.abs() < 1e-9);
    }

    #[test]
    fn test_crossing_great_circle() {
        // Tilted arc running from the northern into the southern hemisphere.
        let arc = Arc::new(
            DVec3::new(1.0, 0.0, 0.5).normalize(),
            DVec3::new(0.0, 1.0, -0.5).normalize(),
        );
        let equator = Cap::new(DVec3::Z, 0.0);
        let crossings = arc.intersect(&equator);
        assert_eq!(crossings.len(), 1);
        assert!(crossings.as_slice()[0].z.abs() < 1e-9);
    }

    #[test]
    fn test_two_crossings() {
        // A cap straddling the middle of an equatorial arc is crossed twice.
        let arc = Arc::new(DVec3::X, DVec3::Y);
        let mid = DVec3::new(1.0, 1.0, 0.0).normalize();
        let cap = Cap::from_radius(mid, 20f64.to_radians());
        let crossings = arc.intersect(&cap);
        assert_eq!(crossings.len(), 2);
        for p in crossings.iter() {
            assert!((p.dot(mid) - cap.distance()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_no_crossing() {
        let arc = Arc::new(DVec3::X, DVec3::Y);
        let far = Cap::from_radius(DVec3::Z, 0.2);
        assert!(!arc.crosses(&far));

        // Endpoints lying on the boundary do not count as crossings.
        let equator = Cap::new(DVec3::Z, 0.0);
        assert!(!arc.crosses(&equator));
    }
}
