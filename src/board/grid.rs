//! Battle grid.
//!
//! A `rows × cols` board of optional units. The first side's home territory
//! is the lower half of the rows (row 0 is its back row); the second side's
//! is the upper half. Distance is Chebyshev: diagonal steps cost the same as
//! orthogonal ones.

use serde::{Deserialize, Serialize};

use super::unit::Unit;
use crate::core::player::SideId;

/// A board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Chebyshev distance: the larger of the row and column deltas.
    ///
    /// ```
    /// use soulfire_engine::board::Coord;
    ///
    /// assert_eq!(Coord::new(0, 0).distance(Coord::new(2, 1)), 2);
    /// assert_eq!(Coord::new(3, 3).distance(Coord::new(3, 3)), 0);
    /// ```
    #[must_use]
    pub fn distance(self, other: Coord) -> u8 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: u8,
    cols: u8,
    cells: Vec<Option<Unit>>,
}

impl Grid {
    #[must_use]
    pub fn new(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; usize::from(rows) * usize::from(cols)],
        }
    }

    #[must_use]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> u8 {
        self.cols
    }

    #[must_use]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.in_bounds(coord)
            .then(|| usize::from(coord.row) * usize::from(self.cols) + usize::from(coord.col))
    }

    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Unit> {
        self.index(coord).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Unit> {
        let i = self.index(coord)?;
        self.cells[i].as_mut()
    }

    #[must_use]
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.in_bounds(coord) && self.get(coord).is_none()
    }

    /// Side whose home territory contains `coord`. Each side owns half the
    /// rows; `EngineConfig::validate` keeps the row count even.
    #[must_use]
    pub fn territory_of(&self, coord: Coord) -> SideId {
        if coord.row < self.rows / 2 {
            SideId::FIRST
        } else {
            SideId::SECOND
        }
    }

    #[must_use]
    pub fn is_home(&self, coord: Coord, side: SideId) -> bool {
        self.in_bounds(coord) && self.territory_of(coord) == side
    }

    /// Rows between `coord` and `side`'s back row. 0 on the back row.
    #[must_use]
    pub fn advance(&self, coord: Coord, side: SideId) -> u8 {
        if side == SideId::FIRST {
            coord.row
        } else {
            self.rows.saturating_sub(1).saturating_sub(coord.row)
        }
    }

    /// Centre of `side`'s back row.
    #[must_use]
    pub fn anchor(&self, side: SideId) -> Coord {
        let row = if side == SideId::FIRST { 0 } else { self.rows.saturating_sub(1) };
        Coord::new(row, self.cols / 2)
    }

    /// Every cell, row by row.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Coord::new(row, col)))
    }

    /// Every cell of `side`'s home territory.
    pub fn home_cells(&self, side: SideId) -> impl Iterator<Item = Coord> + '_ {
        self.coords().filter(move |&c| self.territory_of(c) == side)
    }

    /// Put a unit on an empty cell, refreshing its territory flag.
    ///
    /// Returns the unit back if the cell is occupied or out of bounds.
    pub fn place(&mut self, coord: Coord, mut unit: Unit) -> Result<(), Unit> {
        let territory = self.in_bounds(coord).then(|| self.territory_of(coord));
        match (self.index(coord), territory) {
            (Some(i), Some(territory)) if self.cells[i].is_none() => {
                unit.in_enemy_territory = territory != unit.owner;
                self.cells[i] = Some(unit);
                Ok(())
            }
            _ => Err(unit),
        }
    }

    pub fn remove(&mut self, coord: Coord) -> Option<Unit> {
        let i = self.index(coord)?;
        self.cells[i].take()
    }

    /// Move the unit at `from` to an empty `to`. Returns `false` if nothing moved.
    pub fn relocate(&mut self, from: Coord, to: Coord) -> bool {
        if !self.is_empty(to) {
            return false;
        }
        match self.remove(from) {
            Some(unit) => match self.place(to, unit) {
                Ok(()) => true,
                Err(unit) => {
                    // `to` was checked above, so this only restores `from`.
                    let _ = self.place(from, unit);
                    false
                }
            },
            None => false,
        }
    }

    /// All units with their positions.
    pub fn units(&self) -> impl Iterator<Item = (Coord, &Unit)> + '_ {
        self.coords()
            .zip(self.cells.iter())
            .filter_map(|(coord, cell)| cell.as_ref().map(|unit| (coord, unit)))
    }

    pub fn units_mut(&mut self) -> impl Iterator<Item = &mut Unit> + '_ {
        self.cells.iter_mut().filter_map(Option::as_mut)
    }

    /// Units owned by `side`.
    pub fn units_of(&self, side: SideId) -> impl Iterator<Item = (Coord, &Unit)> + '_ {
        self.units().filter(move |(_, unit)| unit.owner == side)
    }

    #[must_use]
    pub fn unit_count(&self, side: SideId) -> usize {
        self.units_of(side).count()
    }

    /// Closest unit owned by `side` to `from`, with its distance.
    #[must_use]
    pub fn nearest_unit_of(&self, side: SideId, from: Coord) -> Option<(Coord, u8)> {
        self.units_of(side)
            .map(|(coord, _)| (coord, from.distance(coord)))
            .min_by_key(|&(coord, distance)| (distance, coord))
    }

    /// Cells within `range` of `origin`, excluding `origin` itself.
    pub fn cells_within(&self, origin: Coord, range: u8) -> impl Iterator<Item = Coord> + '_ {
        self.coords()
            .filter(move |&c| c != origin && origin.distance(c) <= range)
    }
}
