use std::sync::Arc;

use crate::mapping::{PropertyMapping, TargetRef};

/// Lifecycle notifications emitted around queue and removal operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemovalEventKind {
    /// About to queue an object's field for removal.
    PreAddRemoveQueue,
    /// The field was queued.
    PostAddRemoveQueue,
    /// About to delete a stored file.
    PreRemove,
    /// The file was deleted and the filename attribute erased.
    PostRemove,
}

/// Payload handed to observers: the tracked object plus its resolved mapping.
#[derive(Clone)]
pub struct RemovalEvent {
    pub target: TargetRef,
    pub mapping: Arc<dyn PropertyMapping>,
}

/// Synchronous notification sink.
///
/// Observers run inline on the caller's stack; whatever side effects they have
/// are their own business and never alter the handler's control flow.
pub trait NotificationBus: Send + Sync {
    fn dispatch(&self, kind: RemovalEventKind, event: &RemovalEvent);
}

/// Bus that drops every notification.
pub struct NullNotificationBus;

impl NotificationBus for NullNotificationBus {
    fn dispatch(&self, _kind: RemovalEventKind, _event: &RemovalEvent) {}
}

type Observer = Box<dyn Fn(&RemovalEvent) + Send + Sync>;

/// In-process observer registry.
///
/// Observers subscribed to a kind run in registration order. There is no
/// error isolation between them; a panicking observer unwinds through the
/// dispatching operation.
#[derive(Default)]
pub struct EventBus {
    observers: Vec<(RemovalEventKind, Observer)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: RemovalEventKind, observer: F)
    where
        F: Fn(&RemovalEvent) + Send + Sync + 'static,
    {
        self.observers.push((kind, Box::new(observer)));
    }
}

impl NotificationBus for EventBus {
    fn dispatch(&self, kind: RemovalEventKind, event: &RemovalEvent) {
        for (registered, observer) in &self.observers {
            if *registered == kind {
                observer(event);
            }
        }
    }
}
