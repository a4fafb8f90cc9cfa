use std::fmt;

use super::types::GridCoordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    InvalidSettings(String),
    CellUnavailable(GridCoordinate),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::InvalidSettings(e) => write!(f, "Invalid arena settings: {}", e),
            ArenaError::CellUnavailable(cell) => write!(f, "Cell {} is not free", cell),
        }
    }
}

impl std::error::Error for ArenaError {}
