pub mod config;
pub mod core;
pub mod display;
pub mod error;
pub mod network;
pub mod player;
pub mod session;
pub mod telemetry;


pub use error::ClientError;
