use std::sync::Arc;

use tracing::{debug, info};

use crate::error::HandlerError;
use crate::event::{NotificationBus, RemovalEvent, RemovalEventKind};
use crate::mapping::{MappingResolver, TargetRef};
use crate::queue::RemovalQueue;
use crate::storage::StorageBackend;

/// Queues file removals while an ORM flush is in progress and performs them
/// once it completed, so a rolled-back transaction never loses its files.
///
/// Typical wiring: a pre-flush lifecycle hook calls [`add_to_queue`] for every
/// object losing an upload, the post-flush hook calls
/// [`remove_files_in_queue`] and re-persists the returned objects (their
/// filename attributes were erased in memory only).
///
/// [`add_to_queue`]: RemoveHandler::add_to_queue
/// [`remove_files_in_queue`]: RemoveHandler::remove_files_in_queue
pub struct RemoveHandler {
    resolver: Arc<dyn MappingResolver>,
    storage: Arc<dyn StorageBackend>,
    bus: Arc<dyn NotificationBus>,
    queue: RemovalQueue,
}

impl RemoveHandler {
    pub fn new(
        resolver: Arc<dyn MappingResolver>,
        storage: Arc<dyn StorageBackend>,
        bus: Arc<dyn NotificationBus>,
    ) -> Self {
        Self {
            resolver,
            storage,
            bus,
            queue: RemovalQueue::new(),
        }
    }

    /// Queue one uploadable field of `target` for removal during the
    /// post-flush hook.
    ///
    /// Fails with [`HandlerError::MappingNotFound`] before any notification
    /// when the field has no mapping configured.
    pub fn add_to_queue(&mut self, target: &TargetRef, field_name: &str) -> Result<(), HandlerError> {
        let mapping = self.resolver.get_mapping(target.as_ref(), field_name)?;

        let event = RemovalEvent {
            target: Arc::clone(target),
            mapping: Arc::clone(&mapping),
        };

        self.bus.dispatch(RemovalEventKind::PreAddRemoveQueue, &event);

        self.queue.enqueue(target, field_name);
        debug!(
            "Queued '{}' of {} for removal",
            field_name,
            target.target_name()
        );

        self.bus.dispatch(RemovalEventKind::PostAddRemoveQueue, &event);
        Ok(())
    }

    /// Drop a whole object (`field_name: None`), or a single field of it,
    /// from the remove-queue.
    pub fn remove_from_queue(&mut self, target: &TargetRef, field_name: Option<&str>) {
        self.queue.dequeue(target, field_name);
    }

    /// Read access to the remove-queue.
    pub fn queue(&self) -> &RemovalQueue {
        &self.queue
    }

    /// Remove all queued files.
    ///
    /// Returns the objects whose filename attributes were erased, in
    /// processing order; the caller must re-persist them. On error the
    /// already-processed objects stay dequeued and the rest stays queued.
    pub async fn remove_files_in_queue(&mut self) -> Result<Vec<TargetRef>, HandlerError> {
        let mut updated = Vec::new();

        for target in self.queue.targets() {
            for field_name in self.queue.fields_for(&target) {
                self.remove(&target, &field_name).await?;
            }

            self.queue.dequeue(&target, None);
            updated.push(target);
        }

        if !updated.is_empty() {
            info!("🧹 Removed queued uploads for {} object(s)", updated.len());
        }

        Ok(updated)
    }

    /// Delete the stored file for one field and erase the object's in-memory
    /// filename attribute. A field with no current upload is a silent no-op.
    pub async fn remove(&self, target: &TargetRef, field_name: &str) -> Result<(), HandlerError> {
        let mapping = self.resolver.get_mapping(target.as_ref(), field_name)?;

        // nothing stored, avoid dispatching useless events
        let current = mapping.file_name(target.as_ref());
        if current.as_deref().unwrap_or("").is_empty() {
            return Ok(());
        }

        let event = RemovalEvent {
            target: Arc::clone(target),
            mapping: Arc::clone(&mapping),
        };

        self.bus.dispatch(RemovalEventKind::PreRemove, &event);

        self.storage.remove(target.as_ref(), mapping.as_ref()).await?;
        mapping.erase(target.as_ref());

        self.bus.dispatch(RemovalEventKind::PostRemove, &event);
        Ok(())
    }
}
