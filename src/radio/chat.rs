use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::Serialize;

use crate::common::{RadioError, UnixMillis};
use crate::radio::classifier::ChatAuthor;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub author_name: String,
    pub author_type: ChatAuthor,
    pub content: String,
    pub posted_at_ms: UnixMillis,
}

/// Append-only chat history, truncated to the most recent `capacity` entries
/// (strict FIFO: oldest out first). Decoupled from presence so `system`
/// messages can be posted by observers that never joined.
pub struct ChatLog {
    messages: Mutex<VecDeque<ChatMessage>>,
    capacity: usize,
    max_content_length: usize,
}

impl ChatLog {
    pub fn new(capacity: usize, max_content_length: usize) -> Self {
        Self {
            messages: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            max_content_length,
        }
    }

    /// Validates and appends. A rejected message leaves the log untouched;
    /// resubmission is the caller's call.
    pub fn append(
        &self,
        author_name: impl Into<String>,
        author_type: ChatAuthor,
        content: &str,
        now_ms: UnixMillis,
    ) -> Result<ChatMessage, RadioError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(RadioError::Validation("chat message is empty".into()));
        }
        let length = content.chars().count();
        if length > self.max_content_length {
            return Err(RadioError::Validation(format!(
                "chat message is {} characters, limit is {}",
                length, self.max_content_length
            )));
        }

        let message = ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            author_name: author_name.into(),
            author_type,
            content: content.to_string(),
            posted_at_ms: now_ms,
        };

        let mut messages = self.messages.lock();
        messages.push_back(message.clone());
        while messages.len() > self.capacity {
            messages.pop_front();
        }
        Ok(message)
    }

    /// Up to `n` most recent messages in insertion order, newest last.
    pub fn recent(&self, n: usize) -> Vec<ChatMessage> {
        let messages = self.messages.lock();
        let skip = messages.len().saturating_sub(n);
        messages.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> ChatLog {
        ChatLog::new(50, 1000)
    }

    #[test]
    fn append_assigns_id_and_timestamp() {
        let log = log();
        let msg = log
            .append("Deepmind Molt", ChatAuthor::Agent, "hello from the deep", 42)
            .unwrap();
        assert_eq!(msg.posted_at_ms, 42);
        assert_eq!(msg.content, "hello from the deep");
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn fifo_eviction_past_capacity() {
        let log = log();
        for i in 0..51 {
            log.append("a", ChatAuthor::Human, &format!("msg {}", i), i as u64)
                .unwrap();
        }

        assert_eq!(log.len(), 50);
        let all = log.recent(50);
        // First-appended message evicted, relative order preserved.
        assert_eq!(all[0].content, "msg 1");
        assert_eq!(all[49].content, "msg 50");
        for pair in all.windows(2) {
            assert!(pair[0].posted_at_ms < pair[1].posted_at_ms);
        }
    }

    #[test]
    fn empty_content_rejected_without_mutation() {
        let log = log();
        assert!(log.append("a", ChatAuthor::Human, "", 0).is_err());
        assert!(log.append("a", ChatAuthor::Human, "   \n\t", 0).is_err());
        assert!(log.is_empty());
    }

    #[test]
    fn over_length_content_rejected() {
        let log = ChatLog::new(50, 10);
        let err = log
            .append("a", ChatAuthor::Human, "exactly eleven!", 0)
            .unwrap_err();
        assert!(matches!(err, RadioError::Validation(_)));
        assert!(log.is_empty());

        // At the limit is fine.
        log.append("a", ChatAuthor::Human, "ten chars!", 0).unwrap();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let log = ChatLog::new(50, 4);
        // Four scalar values, more than four bytes.
        log.append("a", ChatAuthor::Agent, "🦀🦀🦀🦀", 0).unwrap();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn content_is_trimmed() {
        let log = log();
        let msg = log.append("a", ChatAuthor::System, "  hi  ", 0).unwrap();
        assert_eq!(msg.content, "hi");
    }

    #[test]
    fn recent_is_bounded_and_repeatable() {
        let log = log();
        for i in 0..10 {
            log.append("a", ChatAuthor::Human, &format!("m{}", i), i as u64)
                .unwrap();
        }

        let last3 = log.recent(3);
        assert_eq!(last3.len(), 3);
        assert_eq!(last3[0].content, "m7");
        assert_eq!(last3[2].content, "m9");

        // Same state, same answer.
        let again = log.recent(3);
        assert_eq!(
            again.iter().map(|m| &m.id).collect::<Vec<_>>(),
            last3.iter().map(|m| &m.id).collect::<Vec<_>>()
        );

        assert_eq!(log.recent(100).len(), 10);
    }
}
