use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::limiter::ip_window::IpWindowLimiter;

/// Periodically drops IP windows that no longer hold a live attempt.
/// Windows are also pruned on access; this only bounds memory for clients that never return.
pub async fn start_ip_window_eviction(limiter: IpWindowLimiter, every: Duration) {
    let mut interval = interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let evicted = limiter.evict_idle();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = limiter.tracked_keys(), "evicted idle IP windows");
        }
    }
}
