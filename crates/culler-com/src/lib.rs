//! Framed TCP messaging between the agent and its monitors.
//!
//! The agent broadcasts telemetry through a [`SenderServer`] and takes
//! operator commands through a [`CommandServer`]. Monitors connect with the
//! matching [`ReceiverClient`] / [`CommandClient`]. Frames are a u32
//! little-endian length prefix followed by a [`culler_codec::Codec`] payload.

pub mod command;
pub mod error;
pub mod framing;
pub mod receiver;
pub mod sender;

pub use command::{CommandClient, CommandServer};
pub use error::ComError;
pub use receiver::ReceiverClient;
pub use sender::SenderServer;
