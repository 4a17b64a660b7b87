//! Bit-packed hierarchical cell identifiers.
//!
//! The two most significant used bits mark the hemisphere (`10` = S,
//! `11` = N); each following 2-bit group is the child index chosen at one
//! subdivision. The 8 roots are ids 8..=15:
//!
//! | name | binary | id |
//! |------|--------|----|
//! | S0   | 1000   | 8  |
//! | S3   | 1011   | 11 |
//! | N0   | 1100   | 12 |
//! | N3   | 1111   | 15 |
//!
//! Numeric order equals pre-order on the tree, so all descendants of a cell
//! at a fixed level form one contiguous id range.

use std::fmt;
use std::str::FromStr;

use crate::error::HtmError;

/// Deepest level representable in 64 bits.
pub const MAX_LEVEL: u32 = 30;

/// Identifier of a cell in the mesh hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(u64);

impl CellId {
    /// Validate a raw id.
    pub fn from_id(id: u64) -> Result<Self, HtmError> {
        if is_valid_id(id) {
            Ok(Self(id))
        } else {
            Err(HtmError::InvalidId(id))
        }
    }

    /// Parse a name such as `N0`, `S3120`.
    pub fn from_name(name: &str) -> Result<Self, HtmError> {
        let invalid = || HtmError::InvalidName(name.to_string());
        let bytes = name.as_bytes();
        if bytes.len() < 2 || bytes.len() > MAX_LEVEL as usize + 2 {
            return Err(invalid());
        }

        let mut id: u64 = match bytes[0] {
            b'S' => 2,
            b'N' => 3,
            _ => return Err(invalid()),
        };
        for &digit in &bytes[1..] {
            if !(b'0'..=b'3').contains(&digit) {
                return Err(invalid());
            }
            id = (id << 2) | u64::from(digit - b'0');
        }
        Ok(Self(id))
    }

    /// Caller guarantees `id` is well formed.
    #[inline]
    pub(crate) const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn id(self) -> u64 {
        self.0
    }

    /// Number of subdivisions below the root (roots are level 0).
    #[inline]
    pub fn level(self) -> u32 {
        (63 - self.0.leading_zeros() - 3) / 2
    }

    /// True for the southern hemisphere roots and their descendants.
    #[inline]
    pub fn is_south(self) -> bool {
        (self.0 >> (2 * self.level() + 2)) & 1 == 0
    }

    /// Textual form: hemisphere letter followed by one digit per level.
    pub fn name(self) -> String {
        let level = self.level();
        let mut name = String::with_capacity(level as usize + 2);
        name.push(if self.is_south() { 'S' } else { 'N' });
        for shift in (0..=level).rev() {
            let digit = (self.0 >> (2 * shift)) & 3;
            name.push(char::from(b'0' + digit as u8));
        }
        name
    }

    /// Child `k` (0..=3), or `None` past [`MAX_LEVEL`] or for `k > 3`.
    pub fn child(self, k: u32) -> Option<Self> {
        if k > 3 || self.level() >= MAX_LEVEL {
            return None;
        }
        Some(Self((self.0 << 2) | u64::from(k)))
    }

    /// All four children in index order.
    #[inline]
    pub fn children(self) -> [Self; 4] {
        debug_assert!(self.level() < MAX_LEVEL);
        let base = self.0 << 2;
        [Self(base), Self(base | 1), Self(base | 2), Self(base | 3)]
    }

    /// Parent cell, `None` for roots.
    pub fn parent(self) -> Option<Self> {
        (self.level() > 0).then(|| Self(self.0 >> 2))
    }

    /// Ancestor at `level`; unchanged when `level` is not shallower.
    pub fn truncate(self, level: u32) -> Self {
        let current = self.level();
        if level < current {
            Self(self.0 >> (2 * (current - level)))
        } else {
            self
        }
    }

    /// Range `(low, high)` of all descendants at `level`.
    ///
    /// When `level` is not deeper than this cell, degenerates to the
    /// single-point range of the ancestor at `level`. Levels past
    /// [`MAX_LEVEL`] are treated as `MAX_LEVEL`.
    pub fn extend(self, level: u32) -> (Self, Self) {
        let level = level.min(MAX_LEVEL);
        let current = self.level();
        if current < level {
            let shift = 2 * (level - current);
            let low = self.0 << shift;
            let high = low + ((1u64 << shift) - 1);
            (Self(low), Self(high))
        } else {
            let ancestor = self.truncate(level);
            (ancestor, ancestor)
        }
    }

    /// `other` is this cell or one of its descendants.
    pub fn is_ancestor_of(self, other: CellId) -> bool {
        other.level() >= self.level() && other.truncate(self.level()) == self
    }
}

#[inline]
fn is_valid_id(id: u64) -> bool {
    // Sentinel bit must sit at an odd position: 3, 5, ..., 63.
    id >= 8 && (63 - id.leading_zeros()) % 2 == 1
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for CellId {
    type Err = HtmError;

    /// Accepts either a name (`N01`) or a decimal id (`49`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.as_bytes().first() {
            Some(b'N' | b'S') => Self::from_name(s),
            _ => s
                .parse::<u64>()
                .map_err(|_| HtmError::InvalidName(s.to_string()))
                .and_then(Self::from_id),
        }
    }
}

impl From<CellId> for u64 {
    fn from(id: CellId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_ids() {
        let names = ["S0", "S1", "S2", "S3", "N0", "N1", "N2", "N3"];
        for (i, name) in names.iter().enumerate() {
            let id = CellId::from_name(name).unwrap();
            assert_eq!(id.id(), 8 + i as u64);
            assert_eq!(id.level(), 0);
            assert_eq!(&id.name(), name);
        }
    }

    #[test]
    fn test_north_zero_and_child() {
        let n0 = CellId::from_name("N0").unwrap();
        assert_eq!(n0.id(), 0b1100);
        let child = n0.child(0).unwrap();
        assert_eq!(child.id(), 0b110000);
        assert_eq!(child.level(), 1);
        assert_eq!(child.name(), "N00");
        assert_eq!(child.parent(), Some(n0));
        assert_eq!(n0.parent(), None);
    }

    #[test]
    fn test_invalid_names() {
        for bad in ["", "N", "X0", "N4", "n0", "S01a", "N0 "] {
            assert_eq!(
                CellId::from_name(bad),
                Err(HtmError::InvalidName(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
        let too_deep = format!("N{}", "0".repeat(MAX_LEVEL as usize + 2));
        assert!(CellId::from_name(&too_deep).is_err());
        let deepest = format!("N{}", "3".repeat(MAX_LEVEL as usize + 1));
        let id = CellId::from_name(&deepest).unwrap();
        assert_eq!(id.level(), MAX_LEVEL);
        assert_eq!(id.id(), u64::MAX);
    }

    #[test]
    fn test_invalid_ids() {
        for bad in [0u64, 1, 7, 16, 31, 64] {
            assert_eq!(CellId::from_id(bad), Err(HtmError::InvalidId(bad)));
        }
        assert!(CellId::from_id(8).is_ok());
        assert!(CellId::from_id(0b110000).is_ok());
    }

    #[test]
    fn test_child_bounds() {
        let s1 = CellId::from_name("S1").unwrap();
        assert_eq!(s1.child(4), None);
        let deepest = CellId::from_id(u64::MAX).unwrap();
        assert_eq!(deepest.child(0), None);
        assert_eq!(s1.children()[2], s1.child(2).unwrap());
    }

    #[test]
    fn test_truncate_and_extend() {
        let id = CellId::from_name("N0123").unwrap();
        assert_eq!(id.level(), 3);
        assert_eq!(id.truncate(1).name(), "N01");
        assert_eq!(id.truncate(1).level(), 1);
        assert_eq!(id.truncate(5), id);

        let (low, high) = id.extend(5);
        assert_eq!(low.name(), "N012300");
        assert_eq!(high.name(), "N012333");
        assert_eq!(high.id() - low.id(), 15);

        let (low, high) = id.extend(1);
        assert_eq!(low, high);
        assert_eq!(low.name(), "N01");
    }

    #[test]
    fn test_extend_past_max_level_clamps() {
        let n0 = CellId::from_name("N0").unwrap();
        let (low, high) = n0.extend(MAX_LEVEL + 10);
        assert_eq!((low, high), n0.extend(MAX_LEVEL));
        assert_eq!(low.level(), MAX_LEVEL);
        assert_eq!(CellId::from_id(low.id()), Ok(low));
        assert_eq!(CellId::from_id(high.id()), Ok(high));
        assert_eq!(high.truncate(0), n0);
    }

    #[test]
    fn test_children_inside_extended_range() {
        let parent = CellId::from_name("S21").unwrap();
        let (low, high) = parent.extend(parent.level() + 1);
        for child in parent.children() {
            assert!(low <= child && child <= high);
            assert!(parent.is_ancestor_of(child));
        }
        assert!(!parent.is_ancestor_of(CellId::from_name("S22").unwrap()));
    }

    #[test]
    fn test_from_str_accepts_names_and_ids() {
        assert_eq!("N0".parse::<CellId>().unwrap().id(), 12);
        assert_eq!(" 48 ".parse::<CellId>().unwrap().name(), "N00");
        assert!("abc".parse::<CellId>().is_err());
        assert!("5".parse::<CellId>().is_err());
    }

    #[test]
    fn test_display() {
        let id = CellId::from_name("S302").unwrap();
        assert_eq!(format!("{id}"), "S302");
        assert_eq!(u64::from(id), id.id());
    }
}
