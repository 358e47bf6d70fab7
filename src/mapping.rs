use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::HandlerError;

/// Domain object carrying one or more uploadable fields.
///
/// The remove handler tracks objects by reference identity (`Arc::ptr_eq`),
/// never by value, so implementors only need to expose themselves for
/// downcasting by their concrete mappings.
pub trait UploadTarget: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Label used in error messages and logs.
    fn target_name(&self) -> &str {
        "upload target"
    }
}

impl std::fmt::Debug for dyn UploadTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.target_name())
    }
}

/// Shared handle to a tracked object.
pub type TargetRef = Arc<dyn UploadTarget>;

/// Descriptor binding one (object, field) pair to its configured storage
/// location and current filename.
pub trait PropertyMapping: Send + Sync {
    fn field_name(&self) -> &str;

    /// Directory, relative to the storage root, this field uploads into.
    fn upload_destination(&self) -> &str;

    /// Current stored filename, `None` when nothing is uploaded.
    fn file_name(&self, target: &dyn UploadTarget) -> Option<String>;

    /// Clear the in-memory filename attribute. Does not persist anything;
    /// the caller re-saves the object after the flush hook returns.
    fn erase(&self, target: &dyn UploadTarget);
}

impl std::fmt::Debug for dyn PropertyMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyMapping")
            .field("field_name", &self.field_name())
            .field("upload_destination", &self.upload_destination())
            .finish()
    }
}

/// Resolves the mapping configured for an (object, field) pair.
pub trait MappingResolver: Send + Sync {
    fn get_mapping(
        &self,
        target: &dyn UploadTarget,
        field_name: &str,
    ) -> Result<Arc<dyn PropertyMapping>, HandlerError>;
}

/// Accessor-based mapping for one uploadable field of a concrete entity type.
pub struct FieldMapping<T> {
    field_name: String,
    upload_destination: String,
    get: Box<dyn Fn(&T) -> Option<String> + Send + Sync>,
    clear: Box<dyn Fn(&T) + Send + Sync>,
}

impl<T: 'static> FieldMapping<T> {
    pub fn new(
        field_name: impl Into<String>,
        upload_destination: impl Into<String>,
        get: impl Fn(&T) -> Option<String> + Send + Sync + 'static,
        clear: impl Fn(&T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            upload_destination: upload_destination.into(),
            get: Box::new(get),
            clear: Box::new(clear),
        }
    }
}

impl<T: Send + Sync + 'static> PropertyMapping for FieldMapping<T> {
    fn field_name(&self) -> &str {
        &self.field_name
    }

    fn upload_destination(&self) -> &str {
        &self.upload_destination
    }

    fn file_name(&self, target: &dyn UploadTarget) -> Option<String> {
        let target = target.as_any().downcast_ref::<T>()?;
        (self.get)(target).filter(|name| !name.is_empty())
    }

    fn erase(&self, target: &dyn UploadTarget) {
        if let Some(target) = target.as_any().downcast_ref::<T>() {
            (self.clear)(target);
        }
    }
}

/// Mapping resolver backed by a (entity type, field name) registry.
#[derive(Default)]
pub struct MappingRegistry {
    mappings: HashMap<(TypeId, String), Arc<dyn PropertyMapping>>,
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Send + Sync + 'static>(&mut self, mapping: FieldMapping<T>) {
        let key = (TypeId::of::<T>(), mapping.field_name.clone());
        self.mappings.insert(key, Arc::new(mapping));
    }
}

impl MappingResolver for MappingRegistry {
    fn get_mapping(
        &self,
        target: &dyn UploadTarget,
        field_name: &str,
    ) -> Result<Arc<dyn PropertyMapping>, HandlerError> {
        let key = (target.as_any().type_id(), field_name.to_string());
        self.mappings
            .get(&key)
            .cloned()
            .ok_or_else(|| HandlerError::MappingNotFound {
                field: field_name.to_string(),
                target: target.target_name().to_string(),
            })
    }
}
