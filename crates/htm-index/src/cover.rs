//! Breadth-first covering of a convex region by mesh cells.
//!
//! Cells are classified level by level starting from the 8 roots. `Full`
//! and `Outside` cells end their branch; `Partial` cells are split and their
//! children are classified on the next level. The traversal stops after
//! `max_level`, and the `Partial` cells of the last level form the frontier.

use std::collections::VecDeque;

use rayon::prelude::*;

use crate::cell::{Cell, Markup};
use crate::cell_id::MAX_LEVEL;
use crate::convex::Convex;
use crate::range_set::RangeSet;
use crate::root::roots;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverConfig {
    /// Deepest level that is classified. Clamped to [`MAX_LEVEL`].
    pub max_level: u32,
    /// Process the 8 root subtrees on the rayon thread pool.
    pub parallel: bool,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            max_level: 10,
            parallel: false,
        }
    }
}

/// Whether results are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverState {
    /// `run` has not completed yet; accessors return empty results.
    Idle,
    Done,
}

/// Covering of one convex down to a bounded depth. May be re-run.
pub struct Cover<'a> {
    convex: &'a Convex,
    config: CoverConfig,
    state: CoverState,
    full: Vec<Cell>,
    partial: Vec<Cell>,
}

/// Output of one traversal.
#[derive(Debug, Default)]
struct Traversal {
    full: Vec<Cell>,
    /// Partial cells of the last level processed.
    partial: Vec<Cell>,
}

impl<'a> Cover<'a> {
    pub fn new(convex: &'a Convex, max_level: u32) -> Self {
        Self::with_config(
            convex,
            CoverConfig {
                max_level,
                ..CoverConfig::default()
            },
        )
    }

    pub fn with_config(convex: &'a Convex, config: CoverConfig) -> Self {
        Self {
            convex,
            config,
            state: CoverState::Idle,
            full: Vec::new(),
            partial: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> CoverState {
        self.state
    }

    #[inline]
    pub fn max_level(&self) -> u32 {
        self.config.max_level.min(MAX_LEVEL)
    }

    /// Compute the covering, replacing any previous result.
    pub fn run(&mut self) {
        self.state = CoverState::Idle;
        let max_level = self.max_level();

        let traversal = if self.config.parallel {
            traverse_parallel(self.convex, max_level)
        } else {
            traverse(self.convex, max_level, roots().iter().cloned().collect())
        };

        log::debug!(
            "cover to level {}: {} full, {} partial",
            max_level,
            traversal.full.len(),
            traversal.partial.len()
        );

        self.full = traversal.full;
        self.partial = traversal.partial;
        self.state = CoverState::Done;
    }

    /// Cells classified `Full` at any level.
    pub fn full_cells(&self) -> &[Cell] {
        match self.state {
            CoverState::Done => &self.full,
            CoverState::Idle => &[],
        }
    }

    /// `Partial` cells of the deepest level reached.
    pub fn partial_cells(&self) -> &[Cell] {
        match self.state {
            CoverState::Done => &self.partial,
            CoverState::Idle => &[],
        }
    }

    /// All covering cells: `Full` ones followed by the frontier `Partial` ones.
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = self.full_cells().to_vec();
        cells.extend_from_slice(self.partial_cells());
        cells
    }

    /// Covering cells of one kind; empty for `Outside` and `Undefined`.
    pub fn cells_of(&self, markup: Markup) -> Vec<Cell> {
        match markup {
            Markup::Full => self.full_cells().to_vec(),
            Markup::Partial => self.partial_cells().to_vec(),
            Markup::Outside | Markup::Undefined => Vec::new(),
        }
    }

    /// All covering cells as id ranges at `level`.
    pub fn id_ranges(&self, level: u32) -> RangeSet {
        RangeSet::from_cells(self.full_cells().iter().chain(self.partial_cells()), level)
    }

    /// Covering cells of one kind as id ranges at `level`.
    pub fn id_ranges_of(&self, markup: Markup, level: u32) -> RangeSet {
        match markup {
            Markup::Full => RangeSet::from_cells(self.full_cells(), level),
            Markup::Partial => RangeSet::from_cells(self.partial_cells(), level),
            Markup::Outside | Markup::Undefined => RangeSet::new(level),
        }
    }
}

/// Level-synchronous walk over `queue`.
///
/// The queue only ever holds cells of the level being drained followed by
/// their children one level deeper, so a change of level at the front marks
/// the end of a level.
fn traverse(convex: &Convex, max_level: u32, mut queue: VecDeque<Cell>) -> Traversal {
    let mut full = Vec::new();
    let mut last_partial: Vec<Cell> = Vec::new();

    while let Some(level) = queue.front().map(Cell::level) {
        let mut partial = Vec::new();
        let mut discarded = 0usize;

        while let Some(cell) = queue.pop_front() {
            if cell.level() != level {
                queue.push_front(cell);
                break;
            }
            match cell.classify(convex) {
                Markup::Full => full.push(cell),
                Markup::Partial => {
                    if level < max_level {
                        queue.extend(cell.expand());
                    }
                    partial.push(cell);
                }
                Markup::Outside | Markup::Undefined => discarded += 1,
            }
        }

        log::debug!(
            "level {}: {} partial, {} full so far, {} discarded",
            level,
            partial.len(),
            full.len(),
            discarded
        );
        last_partial = partial;

        if level >= max_level {
            break;
        }
    }

    Traversal {
        full,
        partial: last_partial,
    }
}

/// Independent traversals of the 8 root subtrees.
///
/// A subtree that stops before the deepest level ends with an empty partial
/// list, so concatenating the per-root frontiers matches the sequential run.
fn traverse_parallel(convex: &Convex, max_level: u32) -> Traversal {
    let parts: Vec<Traversal> = roots()
        .as_slice()
        .par_iter()
        .map(|root| traverse(convex, max_level, VecDeque::from([root.clone()])))
        .collect();

    parts.into_iter().fold(Traversal::default(), |mut acc, part| {
        acc.full.extend(part.full);
        acc.partial.extend(part.partial);
        acc
    })
}
