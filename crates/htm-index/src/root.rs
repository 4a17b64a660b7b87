//! The 8 fixed top-level cells and point location.

use std::sync::OnceLock;

use glam::DVec3;

use crate::cell::Cell;
use crate::cell_id::{CellId, MAX_LEVEL};

static ROOTS: OnceLock<[Cell; 8]> = OnceLock::new();

/// The octahedral root cells, ordered S0..S3, N0..N3 (ids 8..=15).
///
/// Built on first use and shared read-only afterwards.
pub fn roots() -> &'static [Cell; 8] {
    ROOTS.get_or_init(build_roots)
}

fn build_roots() -> [Cell; 8] {
    let z = DVec3::Z;
    let x = DVec3::X;
    let y = DVec3::Y;
    let nx = DVec3::NEG_X;
    let ny = DVec3::NEG_Y;
    let nz = DVec3::NEG_Z;

    [
        Cell::new(x, nz, y, CellId::from_raw(8)),
        Cell::new(y, nz, nx, CellId::from_raw(9)),
        Cell::new(nx, nz, ny, CellId::from_raw(10)),
        Cell::new(ny, nz, x, CellId::from_raw(11)),
        Cell::new(x, z, ny, CellId::from_raw(12)),
        Cell::new(ny, z, nx, CellId::from_raw(13)),
        Cell::new(nx, z, y, CellId::from_raw(14)),
        Cell::new(y, z, x, CellId::from_raw(15)),
    ]
}

/// Id of the cell at `level` containing `point`.
///
/// Descends from the roots, at each step taking the child that contains the
/// point with the widest margin to its edges. Points exactly on a shared edge
/// go to the first such child in id order.
pub fn locate(point: DVec3, level: u32) -> CellId {
    let point = point.normalize();
    let level = level.min(MAX_LEVEL);
    let mut cell = pick(roots(), point).clone();
    while cell.level() < level {
        let children = cell.expand();
        cell = pick(&children, point).clone();
    }
    cell.id()
}

/// Geometry of the cell with `id`, rebuilt by descending from its root.
pub fn cell_of(id: CellId) -> Cell {
    let root = id.truncate(0);
    let mut cell = roots()[(root.id() - 8) as usize].clone();
    for level in 1..=id.level() {
        let target = id.truncate(level);
        let children = cell.expand();
        cell = children[(target.id() & 3) as usize].clone();
    }
    cell
}

/// Candidate with the largest edge margin. `candidates` is never empty.
fn pick(candidates: &[Cell], point: DVec3) -> &Cell {
    let mut best = &candidates[0];
    let mut best_margin = best.edge_margin(point);
    for cell in &candidates[1..] {
        let margin = cell.edge_margin(point);
        if margin > best_margin {
            best = cell;
            best_margin = margin;
        }
    }
    best
}
