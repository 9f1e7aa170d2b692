//! frame/mod.rs
//! Canonical in-memory model of one bus event.
//!
//! Responsibilities:
//! - Define the `Frame` sum type and the timestamped `Record`
//! - Map records to and from the collaborator `Message` shape
//! - Own the CAN-FD DLC table
//!
//! Non-responsibilities:
//! - Wire layout (see `object`)

pub mod dlc;
pub mod message;
pub mod types;

pub use dlc::*;
pub use message::Message;
pub use types::*;
