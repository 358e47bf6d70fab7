//! Deferred removal of uploaded files for persisted domain objects.
//!
//! Objects whose uploads should go away are queued while the ORM flush is
//! still in progress and processed once it completed, so a rolled-back
//! transaction never loses files. Physical deletion is delegated to a
//! [`storage::StorageBackend`]; observers are notified through a
//! [`event::NotificationBus`].

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod mapping;
pub mod queue;
pub mod storage;

pub use config::StorageConfig;
pub use error::HandlerError;
pub use event::{EventBus, NotificationBus, NullNotificationBus, RemovalEvent, RemovalEventKind};
pub use handler::RemoveHandler;
pub use mapping::{
    FieldMapping, MappingRegistry, MappingResolver, PropertyMapping, TargetRef, UploadTarget,
};
pub use queue::RemovalQueue;
pub use storage::{FilesystemStorage, StorageBackend};
