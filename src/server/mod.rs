pub mod app_state;
pub mod sweeper;

pub use app_state::{AppState, WsSession};
