//! Small helpers on top of [`glam::DVec3`], which serves as the vector type
//! for all geometry in this crate.

use glam::DVec3;

/// Midpoint of two points on the unit sphere, projected back onto the sphere.
///
/// Undefined for antipodal inputs (the chord midpoint is the origin).
#[inline]
pub fn midpoint(a: DVec3, b: DVec3) -> DVec3 {
    ((a + b) * 0.5).normalize()
}

/// Unit vector for a latitude/longitude pair given in degrees.
pub fn latlon_to_vector(lat_deg: f64, lon_deg: f64) -> DVec3 {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    DVec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Cosine of the angle between two (not necessarily unit) vectors.
#[inline]
pub(crate) fn cos_between(a: DVec3, b: DVec3) -> f64 {
    a.dot(b) / (a.length() * b.length())
}

/// Angle between two unit vectors, clamped against rounding past ±1.
#[inline]
pub(crate) fn angle_between(a: DVec3, b: DVec3) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_on_sphere() {
        let m = midpoint(DVec3::X, DVec3::Y);
        assert!((m.length() - 1.0).abs() < 1e-12);
        assert!((m.x - m.y).abs() < 1e-12);
        assert_eq!(m.z, 0.0);
    }

    #[test]
    fn test_latlon_axes() {
        let north = latlon_to_vector(90.0, 0.0);
        assert!((north - DVec3::Z).length() < 1e-12);

        let east = latlon_to_vector(0.0, 90.0);
        assert!((east - DVec3::Y).length() < 1e-12);

        let origin = latlon_to_vector(0.0, 0.0);
        assert!((origin - DVec3::X).length() < 1e-12);
    }

    #[test]
    fn test_angle_between_clamps() {
        // Slightly longer than unit: dot would exceed 1 without the clamp.
        let a = DVec3::new(1.0 + 1e-15, 0.0, 0.0);
        assert_eq!(angle_between(a, a), 0.0);
        assert!((cos_between(DVec3::X * 3.0, DVec3::Y * 2.0)).abs() < 1e-12);
    }
}
