//! Side identification and per-side data storage.
//!
//! ## SideId
//!
//! A duel always has exactly two sides. `SideId(0)` acts first.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `SideId`, so per-side data never
//! needs a bounds check or a length assertion.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two sides of a duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SideId(pub u8);

impl SideId {
    /// The side that takes the first turn.
    pub const FIRST: SideId = SideId(0);
    /// The side that takes the second turn.
    pub const SECOND: SideId = SideId(1);

    /// Create a side ID. Only 0 and 1 are valid.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!(id < 2, "A duel has exactly two sides");
        Self(id)
    }

    /// Get the raw side index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other side.
    ///
    /// ```
    /// use soulfire_engine::core::SideId;
    ///
    /// assert_eq!(SideId::FIRST.opponent(), SideId::SECOND);
    /// assert_eq!(SideId::SECOND.opponent(), SideId::FIRST);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Both sides, in turn order.
    pub fn both() -> impl Iterator<Item = SideId> {
        [SideId::FIRST, SideId::SECOND].into_iter()
    }
}

impl std::fmt::Display for SideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Side {}", self.0)
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use soulfire_engine::core::{SideId, SideMap};
///
/// let mut vitality: SideMap<i32> = SideMap::with_value(20);
/// vitality[SideId::SECOND] -= 3;
/// assert_eq!(vitality[SideId::FIRST], 20);
/// assert_eq!(vitality[SideId::SECOND], 17);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a SideMap with values from a factory function.
    pub fn new(mut factory: impl FnMut(SideId) -> T) -> Self {
        Self {
            data: [factory(SideId::FIRST), factory(SideId::SECOND)],
        }
    }

    /// Create a SideMap from explicit values in turn order.
    pub fn from_pair(first: T, second: T) -> Self {
        Self {
            data: [first, second],
        }
    }

    /// Create a SideMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a SideMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: SideId) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: SideId) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (SideId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SideId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (SideId(i as u8), v))
    }

    /// Iterate over (SideId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SideId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (SideId(i as u8), v))
    }
}

impl<T> Index<SideId> for SideMap<T> {
    type Output = T;

    fn index(&self, side: SideId) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<SideId> for SideMap<T> {
    fn index_mut(&mut self, side: SideId) -> &mut Self::Output {
        self.get_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_id_basics() {
        assert_eq!(SideId::FIRST.index(), 0);
        assert_eq!(SideId::SECOND.index(), 1);
        assert_eq!(format!("{}", SideId::SECOND), "Side 1");
    }

    #[test]
    fn test_side_id_both() {
        let sides: Vec<_> = SideId::both().collect();
        assert_eq!(sides, vec![SideId::FIRST, SideId::SECOND]);
    }

    #[test]
    #[should_panic(expected = "exactly two sides")]
    fn test_side_id_out_of_range() {
        let _ = SideId::new(2);
    }

    #[test]
    fn test_side_map_new() {
        let map: SideMap<i32> = SideMap::new(|s| s.index() as i32 * 10);
        assert_eq!(map[SideId::FIRST], 0);
        assert_eq!(map[SideId::SECOND], 10);
    }

    #[test]
    fn test_side_map_mutation() {
        let mut map: SideMap<Vec<i32>> = SideMap::with_default();
        map[SideId::SECOND].push(4);

        assert!(map[SideId::FIRST].is_empty());
        assert_eq!(map[SideId::SECOND], vec![4]);
    }

    #[test]
    fn test_side_map_iter() {
        let map = SideMap::from_pair("a", "b");
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(SideId::FIRST, &"a"), (SideId::SECOND, &"b")]);
    }

    #[test]
    fn test_side_map_serialization() {
        let map = SideMap::from_pair(1, 2);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: SideMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
