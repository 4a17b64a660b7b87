use glam::DVec3;

use crate::constants::EPSILON;
use crate::vector::angle_between;

/// Sign of a single cap, taken from its plane distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
    Zero,
}

/// A spherical cap `{p : vector·p > distance}`.
///
/// The cap is centered on `vector` and has angular radius `acos(distance)`.
/// Positive distances give caps smaller than a hemisphere, negative ones
/// give caps larger than a hemisphere, and zero is a hemisphere bounded by
/// a great circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cap {
    vector: DVec3,
    distance: f64,
}

impl Cap {
    /// Build a cap; `vector` is normalized, `distance` is expected in (-1, 1).
    pub fn new(vector: DVec3, distance: f64) -> Self {
        Self {
            vector: vector.normalize(),
            distance,
        }
    }

    /// Cap of the given angular radius (radians) around `center`.
    pub fn from_radius(center: DVec3, radius: f64) -> Self {
        Self::new(center, radius.cos())
    }

    #[inline]
    pub fn vector(&self) -> DVec3 {
        self.vector
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Angular radius in radians.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.distance.clamp(-1.0, 1.0).acos()
    }

    pub fn sign(&self) -> Sign {
        if self.distance > EPSILON {
            Sign::Positive
        } else if self.distance < -EPSILON {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    /// Point is definitely inside: `vector·p > distance + ε`.
    #[inline]
    pub fn contains_strict(&self, p: DVec3) -> bool {
        self.vector.dot(p) > self.distance + EPSILON
    }

    /// Point is not definitely outside: `vector·p > distance - ε`.
    #[inline]
    pub fn contains_loose(&self, p: DVec3) -> bool {
        self.vector.dot(p) > self.distance - EPSILON
    }

    /// The caps share at least one point (intersect, nest or coincide).
    pub fn overlaps(&self, other: &Cap) -> bool {
        let separation = angle_between(self.vector, other.vector);
        separation <= self.radius() + other.radius() + EPSILON
    }

    /// The caps are disjoint.
    #[inline]
    pub fn excludes(&self, other: &Cap) -> bool {
        !self.overlaps(other)
    }

    /// `other` lies entirely within this cap.
    pub fn contains_cap(&self, other: &Cap) -> bool {
        let separation = angle_between(self.vector, other.vector);
        self.radius() - other.radius() >= separation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_new_normalizes() {
        let cap = Cap::new(DVec3::new(0.0, 0.0, 5.0), 0.5);
        assert_eq!(cap.vector(), DVec3::Z);
        assert_eq!(cap.distance(), 0.5);
    }

    #[test]
    fn test_sign_thresholds() {
        assert_eq!(Cap::new(DVec3::Z, 0.1).sign(), Sign::Positive);
        assert_eq!(Cap::new(DVec3::Z, -0.1).sign(), Sign::Negative);
        assert_eq!(Cap::new(DVec3::Z, 0.0).sign(), Sign::Zero);
        assert_eq!(Cap::new(DVec3::Z, EPSILON * 0.5).sign(), Sign::Zero);
    }

    #[test]
    fn test_strict_and_loose_on_boundary() {
        let hemisphere = Cap::new(DVec3::Z, 0.0);
        let on_equator = DVec3::X;
        assert!(!hemisphere.contains_strict(on_equator));
        assert!(hemisphere.contains_loose(on_equator));

        assert!(hemisphere.contains_strict(DVec3::Z));
        assert!(!hemisphere.contains_loose(-DVec3::Z));
    }

    #[test]
    fn test_overlap_and_exclusion() {
        let north = Cap::from_radius(DVec3::Z, 0.3);
        let near = Cap::from_radius(DVec3::new(0.0, 0.5, 1.0), 0.3);
        let south = Cap::from_radius(-DVec3::Z, 0.3);

        assert!(north.overlaps(&near));
        assert!(!north.excludes(&near));
        assert!(north.excludes(&south));
        assert!(!south.overlaps(&north));
    }

    #[test]
    fn test_cap_containment() {
        let big = Cap::from_radius(DVec3::Z, 1.0);
        let small = Cap::from_radius(DVec3::new(0.0, 0.2, 1.0), 0.2);
        assert!(big.contains_cap(&small));
        assert!(!small.contains_cap(&big));
        // Overlapping but not nested.
        let offset = Cap::from_radius(DVec3::X, 1.0);
        assert!(!big.contains_cap(&offset));
        assert!(big.overlaps(&offset));
    }

    #[test]
    fn test_radius() {
        let hemisphere = Cap::new(DVec3::Y, 0.0);
        assert!((hemisphere.radius() - FRAC_PI_2).abs() < 1e-12);
    }
}
