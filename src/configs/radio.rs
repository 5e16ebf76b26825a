use serde::{Deserialize, Serialize};

use crate::common::RadioError;

/// Stream policy knobs. Heartbeat cadence must stay strictly below the
/// listener timeout or every well-behaved client would be swept between pings.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RadioConfig {
    pub stream_name: String,
    pub default_track_duration_secs: u64,
    pub heartbeat_interval_secs: u64,
    pub listener_timeout_secs: u64,
    pub chat_history_limit: usize,
    pub max_chat_message_length: usize,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            stream_name: "Deep Sea Radio".to_string(),
            default_track_duration_secs: 180,
            heartbeat_interval_secs: 30,
            listener_timeout_secs: 60,
            chat_history_limit: 50,
            max_chat_message_length: 1000,
        }
    }
}

impl RadioConfig {
    pub fn validate(&self) -> Result<(), RadioError> {
        if self.default_track_duration_secs == 0 {
            return Err(RadioError::InvalidConfiguration(
                "default_track_duration_secs must be positive".into(),
            ));
        }
        if self.heartbeat_interval_secs == 0 {
            return Err(RadioError::InvalidConfiguration(
                "heartbeat_interval_secs must be positive".into(),
            ));
        }
        if self.heartbeat_interval_secs >= self.listener_timeout_secs {
            return Err(RadioError::InvalidConfiguration(format!(
                "heartbeat_interval_secs ({}) must be strictly less than listener_timeout_secs ({})",
                self.heartbeat_interval_secs, self.listener_timeout_secs
            )));
        }
        if self.chat_history_limit == 0 {
            return Err(RadioError::InvalidConfiguration(
                "chat_history_limit must be positive".into(),
            ));
        }
        if self.max_chat_message_length == 0 {
            return Err(RadioError::InvalidConfiguration(
                "max_chat_message_length must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn listener_timeout_ms(&self) -> u64 {
        self.listener_timeout_secs * 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(RadioConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_duration() {
        let config = RadioConfig {
            default_track_duration_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RadioError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_heartbeat_not_below_timeout() {
        let config = RadioConfig {
            heartbeat_interval_secs: 60,
            listener_timeout_secs: 60,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RadioError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_zero_chat_limit() {
        let config = RadioConfig {
            chat_history_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
