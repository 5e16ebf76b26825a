use serde::{Deserialize, Serialize};

use crate::common::{RadioError, UnixMillis};
use crate::radio::sync::{PlaybackPosition, playback_position};

/// Display metadata for the track occupying the current slot. Supplied by the
/// playlist-advance collaborator; the node never invents it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub song_id: String,
    pub title: String,
    pub artist_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

/// The shared virtual track slot. `started_at_ms` is reset only when the
/// external playlist collaborator advances the track.
#[derive(Debug, Clone)]
pub struct StreamState {
    pub started_at_ms: UnixMillis,
    pub track_duration_secs: u64,
    pub current_song: Option<NowPlaying>,
}

impl StreamState {
    pub fn new(track_duration_secs: u64, now_ms: UnixMillis) -> Result<Self, RadioError> {
        if track_duration_secs == 0 {
            return Err(RadioError::InvalidConfiguration(
                "track duration must be positive".into(),
            ));
        }
        Ok(Self {
            started_at_ms: now_ms,
            track_duration_secs,
            current_song: None,
        })
    }

    /// `onTrackAdvance`: rolls the slot over to a new track.
    pub fn advance_track(
        &mut self,
        track_duration_secs: u64,
        song: Option<NowPlaying>,
        now_ms: UnixMillis,
    ) -> Result<(), RadioError> {
        if track_duration_secs == 0 {
            return Err(RadioError::InvalidConfiguration(
                "track duration must be positive".into(),
            ));
        }
        self.started_at_ms = now_ms;
        self.track_duration_secs = track_duration_secs;
        self.current_song = song;
        Ok(())
    }

    pub fn position(&self, now_ms: UnixMillis) -> Result<PlaybackPosition, RadioError> {
        playback_position(self.started_at_ms, self.track_duration_secs, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_resets_slot_start() {
        let mut stream = StreamState::new(180, 1_000).unwrap();
        let pos = stream.position(91_000).unwrap();
        assert_eq!(pos.elapsed_seconds, 90);

        stream.advance_track(240, None, 91_000).unwrap();
        let pos = stream.position(91_000).unwrap();
        assert_eq!(pos.elapsed_seconds, 0);
        assert_eq!(pos.total_duration, 240);
    }

    #[test]
    fn advance_rejects_zero_duration() {
        let mut stream = StreamState::new(180, 0).unwrap();
        assert!(stream.advance_track(0, None, 5_000).is_err());
        // Failed advance leaves the slot untouched.
        assert_eq!(stream.track_duration_secs, 180);
        assert_eq!(stream.started_at_ms, 0);
    }

    #[test]
    fn new_rejects_zero_duration() {
        assert!(StreamState::new(0, 0).is_err());
    }

    #[test]
    fn advance_replaces_song_metadata() {
        let mut stream = StreamState::new(180, 0).unwrap();
        let song = NowPlaying {
            song_id: "s1".into(),
            title: "Abyssal Drift".into(),
            artist_name: "Deepmind Molt".into(),
            genre: Some("ambient".into()),
            mood: None,
        };
        stream.advance_track(200, Some(song), 1_000).unwrap();
        assert_eq!(stream.current_song.as_ref().unwrap().title, "Abyssal Drift");

        stream.advance_track(180, None, 2_000).unwrap();
        assert!(stream.current_song.is_none());
    }
}
