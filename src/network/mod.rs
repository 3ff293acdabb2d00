pub mod client;
pub mod protocol;

pub use client::{outbound_channel, NetworkClient, OutboundSender};
pub use protocol::{InboundEvent, OutboundEvent};
