//! Spherical triangles of the mesh and their classification against regions.

use glam::DVec3;

use crate::arc::Arc;
use crate::cap::{Cap, Sign};
use crate::cell_id::CellId;
use crate::constants::EPSILON;
use crate::convex::{count_corners, Convex, ConvexSign, CornerState};
use crate::vector::midpoint;

/// How a cell relates to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Markup {
    /// Entirely inside.
    Full,
    /// Overlaps the boundary (or could not be ruled out).
    Partial,
    /// Entirely outside.
    Outside,
    /// The region has no constraints.
    Undefined,
}

/// A spherical triangle with counter-clockwise vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    vertices: [DVec3; 3],
    arcs: [Arc; 3],
    id: CellId,
}

impl Cell {
    pub fn new(v0: DVec3, v1: DVec3, v2: DVec3, id: CellId) -> Self {
        Self {
            vertices: [v0, v1, v2],
            arcs: [Arc::new(v0, v1), Arc::new(v1, v2), Arc::new(v2, v0)],
            id,
        }
    }

    #[inline]
    pub fn id(&self) -> CellId {
        self.id
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.id.level()
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec3; 3] {
        &self.vertices
    }

    #[inline]
    pub fn arcs(&self) -> &[Arc; 3] {
        &self.arcs
    }

    /// Split into 4 children through the edge midpoints.
    ///
    /// Children 0..=2 keep corner `i` of this cell; child 3 is the central
    /// triangle.
    pub fn expand(&self) -> [Cell; 4] {
        let [v0, v1, v2] = self.vertices;
        let w0 = midpoint(v1, v2);
        let w1 = midpoint(v0, v2);
        let w2 = midpoint(v0, v1);
        let [c0, c1, c2, c3] = self.id.children();
        [
            Cell::new(v0, w2, w1, c0),
            Cell::new(v1, w0, w2, c1),
            Cell::new(v2, w1, w0, c2),
            Cell::new(w0, w1, w2, c3),
        ]
    }

    /// Cap cut by the plane through the three vertices.
    pub fn bounding_cap(&self) -> Cap {
        let [v0, v1, v2] = self.vertices;
        let normal = (v1 - v0).cross(v2 - v1).normalize();
        Cap::new(normal, v0.dot(normal))
    }

    /// Smallest signed sine of the angle between `p` and the three edge
    /// planes. Non-negative exactly when `p` is inside or on the triangle.
    pub fn edge_margin(&self, p: DVec3) -> f64 {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
            .iter()
            .map(|&(u, v)| u.cross(v).normalize().dot(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Point-in-triangle test, loose at the edges.
    pub fn contains(&self, p: DVec3) -> bool {
        let bounding = self.bounding_cap();
        if !bounding.contains_loose(p) {
            return false;
        }

        // Project p onto the plane of the triangle and test winding there.
        let lambda = bounding.distance() / p.dot(bounding.vector());
        let in_plane = p * lambda;

        let pa = self.vertices[0] - in_plane;
        let pb = self.vertices[1] - in_plane;
        let pc = self.vertices[2] - in_plane;
        let cross1 = pa.cross(pb);
        let cross2 = pb.cross(pc);
        let cross3 = pc.cross(pa);

        cross1.dot(cross2) >= -EPSILON
            && cross2.dot(cross3) >= -EPSILON
            && cross3.dot(cross1) >= -EPSILON
    }

    /// Classify this cell against a convex region.
    pub fn classify(&self, convex: &Convex) -> Markup {
        if convex.is_empty() {
            return Markup::Undefined;
        }
        match convex.sign() {
            ConvexSign::Positive | ConvexSign::Zero => self.classify_positive(convex),
            ConvexSign::Negative => self.classify_negative(convex),
            ConvexSign::Mixed => self.classify_mixed(convex),
        }
    }

    /// Classify this cell against a single cap.
    pub fn classify_cap(&self, cap: &Cap) -> Markup {
        match self.corners_in_cap(cap) {
            3 => return Markup::Full,
            1 | 2 => return Markup::Partial,
            _ => {}
        }

        if !self.bounding_cap().overlaps(cap) {
            return Markup::Outside;
        }
        if self.arcs.iter().any(|arc| arc.crosses(cap)) {
            return Markup::Partial;
        }
        // Remaining cases: the cap sits inside the cell, or it is near but
        // disjoint.
        if self.contains(cap.vector()) {
            Markup::Partial
        } else {
            Markup::Outside
        }
    }

    fn classify_positive(&self, convex: &Convex) -> Markup {
        match convex.inside_corners(&self.vertices) {
            3 => return Markup::Full,
            1 | 2 => return Markup::Partial,
            _ => {}
        }

        let bounding = self.bounding_cap();
        if convex.caps().iter().any(|cap| !cap.overlaps(&bounding)) {
            return Markup::Outside;
        }

        if convex.vertices().iter().any(|&v| self.contains(v)) {
            return Markup::Partial;
        }
        if self
            .edge_midpoints()
            .iter()
            .any(|&m| convex.contains_strict(m))
        {
            return Markup::Partial;
        }

        for (i, cap) in convex.caps().iter().enumerate() {
            let mut crossed = false;
            for arc in &self.arcs {
                let crossings = arc.intersect(cap);
                crossed |= !crossings.is_empty();

                // A crossing only matters if it lies on the region's boundary,
                // i.e. inside every other cap.
                let on_boundary = crossings.iter().any(|&p| {
                    convex
                        .caps()
                        .iter()
                        .enumerate()
                        .all(|(j, other)| j == i || other.contains_loose(p))
                });
                if on_boundary {
                    return Markup::Partial;
                }
            }

            if !crossed && self.corners_in_cap(cap) != 3 {
                return self.probe_markup(convex);
            }
        }

        self.probe_markup(convex)
    }

    fn classify_negative(&self, convex: &Convex) -> Markup {
        match convex.inside_corners(&self.vertices) {
            3 => {
                // Corners are all kept, but a hole may still puncture the cell.
                // A negative cap's hole is centred on -v, not on v.
                let hole_inside = convex
                    .caps()
                    .iter()
                    .any(|cap| self.contains(-cap.vector()));
                if hole_inside || self.crosses_any(convex.caps()) {
                    Markup::Partial
                } else {
                    Markup::Full
                }
            }
            1 | 2 => Markup::Partial,
            // Every corner is in a hole. Patches of the region inside the
            // cell without touching an edge are missed and reported Outside.
            _ => {
                if self.crosses_any(convex.caps()) {
                    Markup::Partial
                } else {
                    Markup::Outside
                }
            }
        }
    }

    fn classify_mixed(&self, convex: &Convex) -> Markup {
        match convex.inside_corners(&self.vertices) {
            3 => {
                if self.crosses_any(convex.caps()) {
                    Markup::Partial
                } else {
                    Markup::Full
                }
            }
            1 | 2 => Markup::Partial,
            _ => {
                // Outside any positive cap means outside the intersection.
                let excluded = convex.caps().iter().any(|cap| {
                    cap.sign() == Sign::Positive && self.classify_cap(cap) == Markup::Outside
                });
                if excluded {
                    Markup::Outside
                } else {
                    Markup::Partial
                }
            }
        }
    }

    fn corners_in_cap(&self, cap: &Cap) -> usize {
        count_corners(self.vertices.iter().map(|&v| CornerState::of_cap(cap, v)))
    }

    fn crosses_any(&self, caps: &[Cap]) -> bool {
        self.arcs
            .iter()
            .any(|arc| caps.iter().any(|cap| arc.crosses(cap)))
    }

    fn edge_midpoints(&self) -> [DVec3; 3] {
        let [v0, v1, v2] = self.vertices;
        [midpoint(v0, v1), midpoint(v1, v2), midpoint(v2, v0)]
    }

    /// Partial if a point known to be inside the region lies in the cell.
    fn probe_markup(&self, convex: &Convex) -> Markup {
        match convex.interior_probe() {
            Some(p) if self.contains(p) => Markup::Partial,
            _ => Markup::Outside,
        }
    }
}
