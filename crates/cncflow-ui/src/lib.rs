//! # CNCFlow UI
//!
//! Toolkit-independent view models for CNCFlow. A host view feeds them
//! connection state and forwards button presses; they drive the controller
//! client and keep sibling views in sync through the event bus.

pub mod toolbar;

pub use toolbar::{ButtonStates, Toolbar, ToolbarButton, ToolbarProps};
