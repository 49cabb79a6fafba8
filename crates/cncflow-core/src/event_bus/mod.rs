//! Application event bus
//!
//! Components talk through typed [`AppEvent`]s grouped by [`EventCategory`].
//! The toolbar listens for workflow overrides and announces job commands;
//! the record store announces record updates; the console announces
//! connection and machine state changes.
//!
//! ```rust,ignore
//! let bus = Arc::new(EventBus::new());
//! let id = bus.subscribe(EventFilter::Categories(vec![EventCategory::Job]), |event| {
//!     if let AppEvent::Job(job) = event {
//!         println!("{}", job.topic());
//!     }
//! });
//! bus.publish(AppEvent::Job(JobEvent::Start)).ok();
//! bus.unsubscribe(id);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
