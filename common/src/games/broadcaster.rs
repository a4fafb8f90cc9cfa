use std::future::Future;

use super::snake::{ArenaEvent, RoundSummary};

/// Host side of a running round: receives every tick's events as they happen.
pub trait ArenaBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_events(&self, tick: u64, events: Vec<ArenaEvent>) -> impl Future<Output = ()> + Send;

    fn broadcast_round_over(&self, summary: RoundSummary) -> impl Future<Output = ()> + Send;
}
