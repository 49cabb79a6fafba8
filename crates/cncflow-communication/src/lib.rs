//! # CNCFlow Communication
//!
//! Controller client implementations for CNCFlow.
//! The channel controller hands job commands to a transport task and fans
//! controller notifications out to registered listeners.

pub mod communication;

pub use communication::{channel::ChannelController, JobCommand};
