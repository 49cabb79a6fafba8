//! The bus itself.
//!
//! Handlers registered with [`EventBus::subscribe`] run synchronously on the
//! publishing thread. Async consumers take a [`EventBus::receiver`] instead.
//! A bus is built once by the application and shared behind an `Arc`.

use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{AppEvent, EventCategory};

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.simple().to_string()[..8])
    }
}

/// Which events a handler wants
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type Handler = Arc<dyn Fn(AppEvent) + Send + Sync>;

struct Subscription {
    filter: EventFilter,
    handler: Handler,
}

/// Bus tuning, usually built from the `event_bus` settings section
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Slots in the broadcast channel before slow receivers lag
    pub channel_capacity: usize,
    /// Record published events for [`EventBus::history`]
    pub enable_history: bool,
    pub max_history_size: usize,
    /// Entries older than this are dropped on the next publish
    pub history_retention: Duration,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            enable_history: false,
            max_history_size: 1000,
            history_retention: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventBusError {
    /// Neither a handler nor a receiver saw the event
    #[error("No active subscribers")]
    NoSubscribers,
}

/// Publish/subscribe hub for [`AppEvent`]s
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    history: Mutex<VecDeque<(Instant, AppEvent)>>,
    config: EventBusConfig,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity);
        Self {
            sender,
            subscriptions: RwLock::new(HashMap::new()),
            history: Mutex::new(VecDeque::new()),
            config,
        }
    }

    /// Deliver `event` to matching handlers, then to broadcast receivers.
    ///
    /// Returns the number of receivers. Handlers are collected before any of
    /// them runs, so a handler may publish or unsubscribe itself.
    pub fn publish(&self, event: AppEvent) -> Result<usize, EventBusError> {
        if self.config.enable_history {
            self.record(&event);
        }

        let (handlers, subscribed) = {
            let subscriptions = self.subscriptions.read();
            let handlers: Vec<Handler> = subscriptions
                .values()
                .filter(|s| s.filter.matches(&event))
                .map(|s| s.handler.clone())
                .collect();
            (handlers, !subscriptions.is_empty())
        };

        tracing::trace!("Publishing {}", event.description());
        for handler in &handlers {
            handler(event.clone());
        }

        match self.sender.send(event) {
            Ok(receivers) => Ok(receivers),
            Err(_) if subscribed => Ok(0),
            Err(_) => Err(EventBusError::NoSubscribers),
        }
    }

    /// Register a handler. It runs on the publisher's thread and should be quick.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.subscriptions.write().insert(
            id,
            Subscription {
                filter,
                handler: Arc::new(handler),
            },
        );
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Broadcast receiver for consumers running in a tokio task
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// `false` if the subscription was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.subscriptions.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    /// Recorded events, oldest first, optionally only those at or after `since`.
    /// Empty unless history is enabled.
    pub fn history(&self, since: Option<Instant>) -> Vec<AppEvent> {
        self.history
            .lock()
            .iter()
            .filter(|(at, _)| since.map_or(true, |since| *at >= since))
            .map(|(_, event)| event.clone())
            .collect()
    }

    fn record(&self, event: &AppEvent) {
        let now = Instant::now();
        let mut history = self.history.lock();
        history.push_back((now, event.clone()));

        let retention = self.config.history_retention;
        while history
            .front()
            .is_some_and(|(at, _)| now.duration_since(*at) > retention)
        {
            history.pop_front();
        }
        let excess = history.len().saturating_sub(self.config.max_history_size);
        history.drain(..excess);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}
