pub mod common;
pub mod configs;
pub mod monitoring;
pub mod protocol;
pub mod radio;
pub mod server;
pub mod transport;
