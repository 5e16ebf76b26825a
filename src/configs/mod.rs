pub mod base;
pub mod radio;
pub mod server;

pub use base::*;
pub use radio::*;
pub use server::*;
