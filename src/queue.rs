use std::sync::Arc;

use crate::mapping::TargetRef;

struct QueueEntry {
    target: TargetRef,
    field_names: Vec<String>,
}

/// Registry of objects pending file removal, keyed by reference identity.
///
/// Entries keep insertion order so the flush hook processes objects in the
/// order they were queued. Field names behave as a set but also remember
/// insertion order.
#[derive(Default)]
pub struct RemovalQueue {
    entries: Vec<QueueEntry>,
}

impl RemovalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the object's entry, creating the entry on first use.
    /// Re-enqueuing an already queued field is a no-op.
    pub fn enqueue(&mut self, target: &TargetRef, field_name: &str) {
        if let Some(entry) = self.entry_mut(target) {
            if !entry.field_names.iter().any(|f| f == field_name) {
                entry.field_names.push(field_name.to_string());
            }
        } else {
            self.entries.push(QueueEntry {
                target: Arc::clone(target),
                field_names: vec![field_name.to_string()],
            });
        }
    }

    /// Remove the whole entry (`field_name: None`) or a single field name.
    ///
    /// Removing a field never deletes the entry, even when the field set
    /// becomes empty; wholesale removal is an explicit caller decision.
    /// Dequeuing an absent object or field is a no-op.
    pub fn dequeue(&mut self, target: &TargetRef, field_name: Option<&str>) {
        match field_name {
            None => self.entries.retain(|e| !Arc::ptr_eq(&e.target, target)),
            Some(field) => {
                if let Some(entry) = self.entry_mut(target) {
                    entry.field_names.retain(|f| f != field);
                }
            }
        }
    }

    pub fn contains(&self, target: &TargetRef) -> bool {
        self.entry(target).is_some()
    }

    /// Field names queued for the object, empty when it is not queued.
    pub fn fields_for(&self, target: &TargetRef) -> Vec<String> {
        self.entry(target)
            .map(|e| e.field_names.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of queued objects in insertion order.
    ///
    /// Flush iteration must run over this copy: the removal loop (and any
    /// observer it notifies) mutates the queue while iterating.
    pub fn targets(&self) -> Vec<TargetRef> {
        self.entries.iter().map(|e| Arc::clone(&e.target)).collect()
    }

    fn entry(&self, target: &TargetRef) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| Arc::ptr_eq(&e.target, target))
    }

    fn entry_mut(&mut self, target: &TargetRef) -> Option<&mut QueueEntry> {
        self.entries
            .iter_mut()
            .find(|e| Arc::ptr_eq(&e.target, target))
    }
}
