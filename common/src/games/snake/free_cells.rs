use std::collections::HashMap;
use std::fmt;

use crate::games::SessionRng;
use super::types::{Bounds, GridCoordinate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoFreeCellError;

impl fmt::Display for NoFreeCellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No free cell left on the board")
    }
}

impl std::error::Error for NoFreeCellError {}

/// Cells nobody stands on.
///
/// Kept as a dense vector plus a position index so that insertion, removal and a
/// uniform random pick are all constant time. Removal swaps the last cell into the
/// hole, which makes iteration order depend on history; draws stay reproducible for
/// a given seed because the history itself is deterministic.
#[derive(Debug, Clone, Default)]
pub struct FreeCellSet {
    cells: Vec<GridCoordinate>,
    index: HashMap<GridCoordinate, usize>,
}

impl FreeCellSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bounds(bounds: &Bounds) -> Self {
        let mut set = Self {
            cells: Vec::with_capacity(bounds.area()),
            index: HashMap::with_capacity(bounds.area()),
        };
        for cell in bounds.cells() {
            set.add(cell);
        }
        set
    }

    /// Marks `cell` free. Adding a cell that is already free does nothing.
    pub fn add(&mut self, cell: GridCoordinate) {
        if self.index.contains_key(&cell) {
            return;
        }
        self.index.insert(cell, self.cells.len());
        self.cells.push(cell);
    }

    /// Marks `cell` occupied. Removing a cell that is not free is ignored.
    pub fn remove(&mut self, cell: &GridCoordinate) {
        let Some(position) = self.index.remove(cell) else {
            return;
        };
        self.cells.swap_remove(position);
        if let Some(moved) = self.cells.get(position) {
            self.index.insert(*moved, position);
        }
    }

    pub fn contains(&self, cell: &GridCoordinate) -> bool {
        self.index.contains_key(cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCoordinate> {
        self.cells.iter()
    }

    pub fn random_free(&self, rng: &mut SessionRng) -> Result<GridCoordinate, NoFreeCellError> {
        if self.cells.is_empty() {
            return Err(NoFreeCellError);
        }
        let position = rng.random_range(0..self.cells.len());
        Ok(self.cells[position])
    }
}
