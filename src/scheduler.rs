use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::delivery::Flusher;

/// Fires the flusher once per period, starting one period after creation.
///
/// Missed ticks are skipped, not replayed. The task is aborted on drop.
pub(crate) struct FlushScheduler {
    join_handle: JoinHandle<()>,
}

impl FlushScheduler {
    pub fn spawn(period: Duration, flusher: Flusher) -> Self {
        let start = Instant::now() + period;
        let join_handle = tokio::spawn(async move {
            let mut interval = interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                flusher.on_tick();
            }
        });
        FlushScheduler { join_handle }
    }
}

impl Drop for FlushScheduler {
    fn drop(&mut self) {
        self.join_handle.abort();
    }
}
