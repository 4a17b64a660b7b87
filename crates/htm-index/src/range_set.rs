//! Compacted sets of id ranges at a fixed level.

use crate::cell::Cell;
use crate::cell_id::{CellId, MAX_LEVEL};

/// Sorted, non-overlapping, non-adjacent closed ranges of cell ids, all
/// expressed at one level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    level: u32,
    ranges: Vec<(CellId, CellId)>,
}

impl RangeSet {
    /// Empty set at `level`, clamped to [`MAX_LEVEL`].
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(MAX_LEVEL),
            ranges: Vec::new(),
        }
    }

    /// Ranges covering every descendant at `level` of the given cells.
    ///
    /// Cells deeper than `level` contribute their ancestor at `level`.
    /// `level` is clamped to [`MAX_LEVEL`].
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a Cell>, level: u32) -> Self {
        Self::from_ids(cells.into_iter().map(Cell::id), level)
    }

    pub fn from_ids(ids: impl IntoIterator<Item = CellId>, level: u32) -> Self {
        let level = level.min(MAX_LEVEL);
        let raw = ids
            .into_iter()
            .map(|id| {
                let (low, high) = id.extend(level);
                (low.id(), high.id())
            })
            .collect();
        Self::from_merged(level, merge_ranges(raw))
    }

    /// Build from explicit pairs; the level is that of the first low bound.
    /// A pair given high-first covers the same span as its reverse.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (CellId, CellId)>) -> Self {
        let pairs: Vec<(CellId, CellId)> = pairs.into_iter().collect();
        let Some(&(first, _)) = pairs.first() else {
            return Self::default();
        };
        let level = first.level();
        let raw = pairs
            .into_iter()
            .map(|(low, high)| {
                let (low, high) = (low.extend(level).0.id(), high.extend(level).1.id());
                (low.min(high), low.max(high))
            })
            .collect();
        Self::from_merged(level, merge_ranges(raw))
    }

    fn from_merged(level: u32, merged: Vec<(u64, u64)>) -> Self {
        // Every id between two valid ids of one level is itself valid.
        let ranges = merged
            .into_iter()
            .map(|(low, high)| (CellId::from_raw(low), CellId::from_raw(high)))
            .collect();
        Self { level, ranges }
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn ranges(&self) -> &[(CellId, CellId)] {
        &self.ranges
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(CellId, CellId)> {
        self.ranges.iter()
    }

    /// Number of level-`self.level()` cells covered.
    pub fn cell_count(&self) -> u64 {
        self.ranges
            .iter()
            .map(|(low, high)| high.id() - low.id() + 1)
            .sum()
    }

    /// The whole of `id` lies within the set.
    pub fn contains(&self, id: CellId) -> bool {
        let that = id.level();
        if self.level <= that {
            self.ranges_at(that).any(|(low, high)| low <= id && id <= high)
        } else {
            let (low, high) = id.extend(self.level);
            self.ranges
                .iter()
                .any(|&(lo, hi)| lo <= low && high <= hi)
        }
    }

    /// Some part of `id` lies within the set.
    pub fn overlaps(&self, id: CellId) -> bool {
        let that = id.level();
        if self.level <= that {
            self.ranges_at(that).any(|(low, high)| low <= id && id <= high)
        } else {
            let (low, high) = id.extend(self.level);
            self.ranges
                .iter()
                .any(|&(lo, hi)| low <= hi && lo <= high)
        }
    }

    /// Stored ranges re-expressed at a deeper `level`.
    fn ranges_at(&self, level: u32) -> impl Iterator<Item = (CellId, CellId)> + '_ {
        self.ranges
            .iter()
            .map(move |&(low, high)| (low.extend(level).0, high.extend(level).1))
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = &'a (CellId, CellId);
    type IntoIter = std::slice::Iter<'a, (CellId, CellId)>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

/// Sort closed ranges by `(low, high)` and merge overlapping or adjacent ones.
pub fn merge_ranges(mut ranges: Vec<(u64, u64)>) -> Vec<(u64, u64)> {
    ranges.sort_unstable();

    let mut merged: Vec<(u64, u64)> = Vec::with_capacity(ranges.len());
    for (low, high) in ranges {
        match merged.last_mut() {
            Some(last) if low <= last.1.saturating_add(1) => last.1 = last.1.max(high),
            _ => merged.push((low, high)),
        }
    }
    merged
}
