//! Hierarchical Triangular Mesh (HTM) index on the unit sphere.
//!
//! The sphere is split into 8 spherical triangles (the octants), each of
//! which is recursively split into 4 children. Every cell carries a
//! bit-packed [`CellId`] whose numeric order matches the hierarchy, so a set
//! of cells can be expressed as a handful of id ranges.
//!
//! [`Cover`] walks the hierarchy breadth-first down to a bounded depth and
//! classifies each cell against a spherical [`Convex`] region as
//! [`Markup::Full`], [`Markup::Partial`] or [`Markup::Outside`]. The result
//! compacts into a [`RangeSet`].
//!
//! # Example
//!
//! ```
//! use glam::DVec3;
//! use htm_index::{Convex, Cover, Markup};
//!
//! // One full octant, vertices in counter-clockwise order.
//! let convex = Convex::from_vertices(&[
//!     DVec3::X,
//!     DVec3::Y,
//!     DVec3::Z,
//! ])
//! .expect("three distinct vertices");
//!
//! let mut cover = Cover::new(&convex, 3);
//! cover.run();
//!
//! let full = cover.cells_of(Markup::Full);
//! assert!(full.iter().any(|cell| cell.id().name() == "N3"));
//! ```

mod arc;
mod cap;
mod cell;
mod cell_id;
mod constants;
mod convex;
mod cover;
mod error;
mod quadratic;
mod range_set;
mod root;

pub mod vector;

pub use arc::{Arc, EdgeCrossings};
pub use cap::{Cap, Sign};
pub use cell::{Cell, Markup};
pub use cell_id::{CellId, MAX_LEVEL};
pub use constants::EPSILON;
pub use convex::{Convex, ConvexSign};
pub use cover::{Cover, CoverConfig, CoverState};
pub use error::HtmError;
pub use quadratic::Quadratic;
pub use range_set::{merge_ranges, RangeSet};
pub use root::{cell_of, locate, roots};
