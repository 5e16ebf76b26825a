pub mod chat;
pub mod classifier;
pub mod presence;
pub mod stream;
pub mod sync;

pub use chat::{ChatLog, ChatMessage};
pub use classifier::{ChatAuthor, ListenerCategory};
pub use presence::{ListenerRecord, PresenceSnapshot, PresenceTracker};
pub use stream::{NowPlaying, StreamState};
pub use sync::{PlaybackPosition, playback_position};
