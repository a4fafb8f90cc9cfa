use crate::AgentId;
use super::collision::Collision;
use super::types::{Direction, GridCoordinate};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
    OtherSnakeCollision,
}

impl DeathReason {
    pub fn from_collision(collision: Collision) -> Option<Self> {
        match collision {
            Collision::Wall => Some(DeathReason::WallCollision),
            Collision::SelfBody => Some(DeathReason::SelfCollision),
            Collision::OtherAgent => Some(DeathReason::OtherSnakeCollision),
            Collision::Apple | Collision::Free => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionRequest {
    pub agent: AgentId,
    pub heading: Direction,
}

impl DirectionRequest {
    pub fn new(agent: AgentId, heading: Direction) -> Self {
        Self { agent, heading }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Standing {
    pub agent: AgentId,
    pub label: String,
    pub color: String,
    /// 1 for the first agent out.
    pub ordinal: u32,
    pub eliminated_at_tick: u64,
    pub reason: DeathReason,
    pub apples_eaten: u32,
    pub length: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    /// Best first: the last agent eliminated leads.
    pub standings: Vec<Standing>,
    pub winner: Option<AgentId>,
    pub ticks: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaEvent {
    Moved {
        agent: AgentId,
        new_head: GridCoordinate,
        vacated_tail: GridCoordinate,
        grew: bool,
    },
    Eliminated {
        agent: AgentId,
        ordinal: u32,
        reason: DeathReason,
    },
    ApplePlaced {
        cell: GridCoordinate,
    },
    BoardFull,
    RoundOver(RoundSummary),
}
