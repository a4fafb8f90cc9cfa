mod broadcaster;
mod session_rng;

pub mod snake;

pub use broadcaster::ArenaBroadcaster;
pub use session_rng::SessionRng;
