//! Convex regions: the intersection of a list of caps.

use glam::DVec3;

use crate::cap::{Cap, Sign};
use crate::error::HtmError;
use crate::vector::midpoint;

/// Aggregate sign of a convex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvexSign {
    /// Every non-zero cap is positive.
    Positive,
    /// Every non-zero cap is negative.
    Negative,
    /// All caps are hemispheres (or there are no caps).
    Zero,
    /// Both positive and negative caps are present.
    Mixed,
}

/// Where a single point stands relative to every cap of a convex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CornerState {
    /// Strictly inside every cap.
    Inside,
    /// Loosely inside every cap but strictly inside not all of them.
    OnBoundary,
    /// Fails the loose test for at least one cap.
    Outside,
}

impl CornerState {
    pub(crate) fn of_cap(cap: &Cap, p: DVec3) -> Self {
        if !cap.contains_loose(p) {
            CornerState::Outside
        } else if !cap.contains_strict(p) {
            CornerState::OnBoundary
        } else {
            CornerState::Inside
        }
    }
}

/// Intersection of caps, optionally remembering the vertices it was built from.
///
/// The region is assumed simple and connected. Self-intersecting or
/// disconnected vertex polygons are not detected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Convex {
    caps: Vec<Cap>,
    vertices: Vec<DVec3>,
}

impl Convex {
    /// An empty convex. Cells classify as `Undefined` against it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convex bounded by the given caps.
    pub fn from_caps(caps: Vec<Cap>) -> Self {
        let mut convex = Self {
            caps,
            vertices: Vec::new(),
        };
        convex.sort_if_positive();
        convex
    }

    /// Convex polygon whose edges are great-circle arcs between consecutive
    /// vertices (the last vertex connects back to the first).
    ///
    /// Vertices must be in counter-clockwise order seen from outside the
    /// sphere; they are normalized, so scaled points are accepted.
    pub fn from_vertices(vertices: &[DVec3]) -> Result<Self, HtmError> {
        if vertices.len() < 3 {
            return Err(HtmError::InsufficientVertices(vertices.len()));
        }

        let n = vertices.len();
        let mut normalized = Vec::with_capacity(n);
        for (i, v) in vertices.iter().enumerate() {
            // A zero or non-finite vertex has no direction.
            match v.try_normalize() {
                Some(unit) => normalized.push(unit),
                None => return Err(HtmError::DegenerateEdge(i)),
            }
        }
        let vertices = normalized;

        let mut caps = Vec::with_capacity(n);
        for i in 0..n {
            let normal = vertices[i].cross(vertices[(i + 1) % n]);
            if normal.length_squared() < f64::EPSILON {
                return Err(HtmError::DegenerateEdge(i));
            }
            caps.push(Cap::new(normal, 0.0));
        }

        let mut convex = Self { caps, vertices };
        convex.sort_if_positive();
        Ok(convex)
    }

    pub fn push_cap(&mut self, cap: Cap) {
        self.caps.push(cap);
    }

    #[inline]
    pub fn caps(&self) -> &[Cap] {
        &self.caps
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.caps.is_empty()
    }

    /// Aggregate sign; stops scanning as soon as both signs have been seen.
    pub fn sign(&self) -> ConvexSign {
        let mut sign = ConvexSign::Zero;
        for cap in &self.caps {
            match (cap.sign(), sign) {
                (Sign::Positive, ConvexSign::Zero) => sign = ConvexSign::Positive,
                (Sign::Negative, ConvexSign::Zero) => sign = ConvexSign::Negative,
                (Sign::Positive, ConvexSign::Negative) | (Sign::Negative, ConvexSign::Positive) => {
                    return ConvexSign::Mixed;
                }
                _ => {}
            }
        }
        sign
    }

    /// Strictly inside every cap.
    pub fn contains_strict(&self, p: DVec3) -> bool {
        self.caps.iter().all(|cap| cap.contains_strict(p))
    }

    /// Loosely inside every cap.
    pub fn contains_loose(&self, p: DVec3) -> bool {
        self.caps.iter().all(|cap| cap.contains_loose(p))
    }

    pub(crate) fn corner_state(&self, p: DVec3) -> CornerState {
        let mut state = CornerState::Inside;
        for cap in &self.caps {
            match CornerState::of_cap(cap, p) {
                CornerState::Outside => return CornerState::Outside,
                CornerState::OnBoundary => state = CornerState::OnBoundary,
                CornerState::Inside => {}
            }
        }
        state
    }

    /// Number of `corners` counted as inside the convex.
    ///
    /// If any corner is outside some cap, only strictly inside corners count.
    /// Otherwise corners on a constraint boundary count as inside too.
    pub(crate) fn inside_corners(&self, corners: &[DVec3; 3]) -> usize {
        count_corners(corners.iter().map(|&c| self.corner_state(c)))
    }

    /// A point well inside the region, if one can be derived cheaply.
    ///
    /// Vertex-built convexes use the midpoint of the midpoints of the first
    /// three vertices. Cap-built ones fall back to the first cap center that
    /// loosely satisfies every cap.
    pub(crate) fn interior_probe(&self) -> Option<DVec3> {
        if let [v0, v1, v2, ..] = self.vertices[..] {
            return Some(midpoint(midpoint(v0, v1), midpoint(v1, v2)));
        }
        self.caps
            .iter()
            .map(|cap| cap.vector())
            .find(|&center| self.contains_loose(center))
    }

    /// Reorder caps smallest-first (largest distance first).
    ///
    /// Only a hint for classification order; the region is unchanged.
    fn sort_if_positive(&mut self) {
        if self.sign() == ConvexSign::Positive {
            self.caps
                .sort_by(|a, b| b.distance().total_cmp(&a.distance()));
        }
    }
}

/// Apply the corner policy to per-corner states.
pub(crate) fn count_corners(states: impl Iterator<Item = CornerState>) -> usize {
    let mut inside = 0;
    let mut on_boundary = 0;
    let mut any_outside = false;
    for state in states {
        match state {
            CornerState::Inside => inside += 1,
            CornerState::OnBoundary => on_boundary += 1,
            CornerState::Outside => any_outside = true,
        }
    }
    if any_outside {
        inside
    } else {
        inside + on_boundary
    }
}
