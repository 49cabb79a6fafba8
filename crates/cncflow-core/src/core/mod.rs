//! Controller abstractions
//!
//! The controller client is the imperative side of the machine connection:
//! it issues job commands and delivers status notifications to listeners.

pub mod client;
pub mod event;
pub mod listener;

pub use client::ControllerClient;
pub use event::{ControllerEvent, EventDispatcher};
pub use listener::{ControllerListener, ControllerListenerHandle};
