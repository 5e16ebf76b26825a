use std::sync::Arc;

use tracing::info;

use crate::common::now_ms;
use crate::server::AppState;

/// Spawns the periodic expiry sweep. Runs at the heartbeat interval, which
/// the config layer guarantees is strictly below the listener timeout, so a
/// client pinging on schedule is never swept.
pub fn spawn(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    let period = std::time::Duration::from_secs(state.config.radio.heartbeat_interval_secs);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick fires immediately; skip it so a fresh node does not
        // sweep before anyone could have pinged.
        interval.tick().await;

        loop {
            interval.tick().await;
            let removed = state.presence.sweep_expired(now_ms());
            if removed.is_empty() {
                continue;
            }
            for record in &removed {
                info!(
                    "swept expired listener: id={} category={} last_heartbeat={}",
                    record.id, record.category, record.last_heartbeat_ms
                );
            }
            state.broadcast_listener_counts();
        }
    })
}
