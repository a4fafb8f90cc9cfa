mod arena;
mod collision;
mod direction;
mod error;
mod events;
mod free_cells;
mod session;
mod settings;
mod snake;
mod types;

pub use arena::Arena;
pub use collision::{classify, Collision, OccupancySnapshot};
pub use direction::DirectionController;
pub use error::ArenaError;
pub use events::{ArenaEvent, DeathReason, DirectionRequest, RoundSummary, Standing};
pub use free_cells::{FreeCellSet, NoFreeCellError};
pub use session::ArenaSession;
pub use settings::{AgentSettings, ArenaSettings};
pub use snake::{Advance, SnakeAgent};
pub use types::{Bounds, Direction, GridCoordinate, Segment};
