use std::fmt;

use serde::{Deserialize, Serialize};

/// One-based ordinal of an agent in configuration order. Ticks process agents in
/// ascending id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    pub fn new(ordinal: u32) -> Self {
        Self(ordinal)
    }

    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    pub fn ordinal(&self) -> u32 {
        self.0
    }
}

impl From<u32> for AgentId {
    fn from(ordinal: u32) -> Self {
        Self(ordinal)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0)
    }
}
