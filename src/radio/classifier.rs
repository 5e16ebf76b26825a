use serde::{Deserialize, Serialize};

use crate::common::RadioError;

/// Who a presence record belongs to. Closed set: the tracker never stores a
/// free-form category string, so aggregates cannot silently miscount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenerCategory {
    /// A song-creating agent.
    Agent,
    /// A passive human listener.
    Human,
    Anonymous,
}

impl ListenerCategory {
    /// Parses a raw category string, rejecting anything outside the
    /// recognized set. No fallback category.
    pub fn parse(raw: &str) -> Result<Self, RadioError> {
        match raw {
            "agent" => Ok(Self::Agent),
            "human" => Ok(Self::Human),
            "anonymous" => Ok(Self::Anonymous),
            other => Err(RadioError::InvalidCategory(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Human => "human",
            Self::Anonymous => "anonymous",
        }
    }
}

impl std::fmt::Display for ListenerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chat authorship. `System` exists so the node can post without a presence
/// record (announcements, track changes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatAuthor {
    Agent,
    Human,
    System,
}

impl ChatAuthor {
    pub fn parse(raw: &str) -> Result<Self, RadioError> {
        match raw {
            "agent" => Ok(Self::Agent),
            "human" => Ok(Self::Human),
            "system" => Ok(Self::System),
            other => Err(RadioError::InvalidCategory(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Human => "human",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for ChatAuthor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recognized_categories() {
        assert_eq!(ListenerCategory::parse("agent"), Ok(ListenerCategory::Agent));
        assert_eq!(ListenerCategory::parse("human"), Ok(ListenerCategory::Human));
        assert_eq!(
            ListenerCategory::parse("anonymous"),
            Ok(ListenerCategory::Anonymous)
        );
    }

    #[test]
    fn rejects_unrecognized_category() {
        assert_eq!(
            ListenerCategory::parse("robot"),
            Err(RadioError::InvalidCategory("robot".into()))
        );
    }

    #[test]
    fn rejects_case_variants() {
        // Matching is exact; "Agent" is not in the recognized set.
        assert!(ListenerCategory::parse("Agent").is_err());
    }

    #[test]
    fn system_is_an_author_but_not_a_listener() {
        assert_eq!(ChatAuthor::parse("system"), Ok(ChatAuthor::System));
        assert!(ListenerCategory::parse("system").is_err());
    }

    #[test]
    fn wire_names_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&ListenerCategory::Agent).unwrap(),
            "\"agent\""
        );
        assert_eq!(
            serde_json::to_string(&ChatAuthor::System).unwrap(),
            "\"system\""
        );
    }
}
