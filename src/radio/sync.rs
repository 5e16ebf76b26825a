use serde::Serialize;

use crate::common::{RadioError, UnixMillis};

/// Position within the current virtual track slot. Every observer computing
/// this from the same `started_at` and duration within the same second sees
/// the same value; that shared arithmetic is the whole synchronization
/// mechanism, no client-to-client messaging involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackPosition {
    pub elapsed_seconds: u64,
    pub remaining_seconds: u64,
    pub total_duration: u64,
}

/// Maps wall-clock time onto the repeating track slot.
///
/// A `now` earlier than `started_at` (skewed client clock) clamps total
/// elapsed to zero instead of wrapping. `elapsed_seconds` is always in
/// `[0, duration)` and `remaining_seconds` in `(0, duration]`.
pub fn playback_position(
    started_at_ms: UnixMillis,
    track_duration_secs: u64,
    now_ms: UnixMillis,
) -> Result<PlaybackPosition, RadioError> {
    if track_duration_secs == 0 {
        return Err(RadioError::InvalidConfiguration(
            "track duration must be positive".into(),
        ));
    }

    let elapsed_secs = now_ms.saturating_sub(started_at_ms) / 1000;
    let elapsed_in_track = elapsed_secs % track_duration_secs;

    Ok(PlaybackPosition {
        elapsed_seconds: elapsed_in_track,
        remaining_seconds: track_duration_secs - elapsed_in_track,
        total_duration: track_duration_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_five_seconds_into_second_cycle() {
        // 185s into a 180s slot: 5 elapsed, 175 remaining.
        let pos = playback_position(0, 180, 185_000).unwrap();
        assert_eq!(pos.elapsed_seconds, 5);
        assert_eq!(pos.remaining_seconds, 175);
        assert_eq!(pos.total_duration, 180);
    }

    #[test]
    fn elapsed_plus_remaining_is_duration() {
        for now in [0u64, 1_000, 59_000, 180_000, 185_000, 999_999_000] {
            let pos = playback_position(0, 180, now).unwrap();
            assert!(pos.elapsed_seconds < 180);
            assert_eq!(pos.elapsed_seconds + pos.remaining_seconds, 180);
        }
    }

    #[test]
    fn periodic_in_track_duration() {
        let base = playback_position(7_000, 180, 42_000).unwrap();
        for k in 0u64..5 {
            let shifted = playback_position(7_000, 180, 42_000 + k * 180_000).unwrap();
            assert_eq!(shifted, base);
        }
    }

    #[test]
    fn clock_ahead_of_start_clamps_to_zero() {
        let pos = playback_position(100_000, 180, 50_000).unwrap();
        assert_eq!(pos.elapsed_seconds, 0);
        assert_eq!(pos.remaining_seconds, 180);
    }

    #[test]
    fn slot_start_has_full_remaining() {
        let pos = playback_position(1_000, 180, 1_000).unwrap();
        assert_eq!(pos.elapsed_seconds, 0);
        assert_eq!(pos.remaining_seconds, 180);
    }

    #[test]
    fn zero_duration_is_invalid() {
        assert!(matches!(
            playback_position(0, 0, 1_000),
            Err(RadioError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn sub_second_elapsed_floors_to_zero() {
        let pos = playback_position(0, 180, 999).unwrap();
        assert_eq!(pos.elapsed_seconds, 0);
    }
}
