pub mod radio;
pub mod stats;
