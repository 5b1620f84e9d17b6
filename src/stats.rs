//! Point-in-time operational snapshot: backlog and throughput.

use crate::broker::Broker;
use crate::counter::CounterStore;
use crate::error::Result;
use crate::model::Stats;
use std::sync::Arc;

/// Reads queue depth and counter-store state without consuming or mutating
/// anything. Safe to call concurrently and arbitrarily often.
pub struct StatsAggregator {
    broker: Arc<Broker>,
    counter: CounterStore,
    queue: String,
}

impl StatsAggregator {
    pub fn new(broker: Arc<Broker>, counter: CounterStore, queue: impl Into<String>) -> Self {
        Self {
            broker,
            counter,
            queue: queue.into(),
        }
    }

    /// Take a snapshot.
    ///
    /// Three independent reads, not a transaction — the numbers are not
    /// mutually consistent at a single instant. Counter-store failure is
    /// surfaced as an error rather than a fabricated zero.
    pub async fn snapshot(&self) -> Result<Stats> {
        let queue_depth = self.broker.depth(&self.queue).await?;
        let key_count = self.counter.key_count().await?;
        let processed_count = self.counter.processed_count().await?;

        Ok(Stats {
            key_count,
            queue_depth,
            processed_count,
        })
    }
}
