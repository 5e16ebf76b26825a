use serde::Serialize;

use crate::common::now_ms;
use crate::protocol::models::ListenerCounts;
use crate::server::AppState;

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub listeners: ListenerCounts,
    pub chat_messages: usize,
    /// Milliseconds since the node started.
    pub uptime: u64,
    pub memory: Memory,
}

#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub used: u64,
    pub free: u64,
    pub total: u64,
}

pub fn collect_stats(state: &AppState) -> PlatformStats {
    let snapshot = state.presence.snapshot(now_ms());
    let (used, total) = read_memory_stats();

    PlatformStats {
        listeners: ListenerCounts::from(&snapshot),
        chat_messages: state.chat.len(),
        uptime: state.start_time.elapsed().as_millis() as u64,
        memory: Memory {
            used,
            free: total.saturating_sub(used),
            total,
        },
    }
}

/// Returns (process RSS, system total) in bytes, from /proc. Both are zero on
/// platforms without procfs.
fn read_memory_stats() -> (u64, u64) {
    let rss = std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|s| {
            s.lines().find(|l| l.starts_with("VmRSS:")).and_then(|l| {
                l.split_whitespace()
                    .nth(1)
                    .and_then(|v| v.parse::<u64>().ok())
            })
        })
        .map(|kb| kb * 1024)
        .unwrap_or(0);

    let total = std::fs::read_to_string("/proc/meminfo")
        .ok()
        .and_then(|s| {
            s.lines().find(|l| l.starts_with("MemTotal:")).and_then(|l| {
                l.split_whitespace()
                    .nth(1)
                    .and_then(|v| v.parse::<u64>().ok())
            })
        })
        .map(|kb| kb * 1024)
        .unwrap_or(0);

    (rss, total)
}
