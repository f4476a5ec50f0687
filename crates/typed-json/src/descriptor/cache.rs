//! Process-wide descriptor cache.
//!
//! Descriptors are immutable, so one instance per distinct shape can be
//! shared. Two indexes are kept: by Rust type for the typed layer, and by
//! structure for explicitly built descriptors. Building happens outside the
//! write lock; when two threads race on a new shape, the first insert wins
//! and the other thread's copy is dropped.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use super::{RecordDescriptor, TypeDescriptor};
use crate::typed::JsonType;

#[derive(Debug, Default)]
pub struct DescriptorCache {
    by_type: RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>,
    // Keyed by signature; records with equal signatures but different
    // defaults or policies share a bucket and are told apart by equality.
    by_shape: RwLock<HashMap<String, Vec<Arc<TypeDescriptor>>>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static DescriptorCache {
        static GLOBAL: OnceLock<DescriptorCache> = OnceLock::new();
        GLOBAL.get_or_init(DescriptorCache::new)
    }

    /// The descriptor of `T`, built on first use.
    pub fn of<T: JsonType + 'static>(&self) -> Arc<TypeDescriptor> {
        let id = TypeId::of::<T>();
        if let Some(found) = self
            .by_type
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return found.clone();
        }

        let built = self.intern(T::descriptor());
        let mut by_type = self.by_type.write().unwrap_or_else(PoisonError::into_inner);
        by_type
            .entry(id)
            .or_insert_with(|| {
                tracing::debug!(type_name = std::any::type_name::<T>(), descriptor = %built, "cached type descriptor");
                built
            })
            .clone()
    }

    /// Returns the shared instance structurally equal to `descriptor`,
    /// storing it if the shape is new.
    pub fn intern(&self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let signature = descriptor.to_string();
        if let Some(bucket) = self
            .by_shape
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&signature)
        {
            if let Some(found) = bucket.iter().find(|d| ***d == descriptor) {
                return found.clone();
            }
        }

        let mut by_shape = self.by_shape.write().unwrap_or_else(PoisonError::into_inner);
        let bucket = by_shape.entry(signature).or_default();
        if let Some(found) = bucket.iter().find(|d| ***d == descriptor) {
            return found.clone();
        }
        let shared = Arc::new(descriptor);
        bucket.push(shared.clone());
        shared
    }

    /// Number of distinct shapes held.
    pub fn len(&self) -> usize {
        self.by_shape
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The cached descriptor of `T` from the global cache.
pub fn descriptor_of<T: JsonType + 'static>() -> Arc<TypeDescriptor> {
    DescriptorCache::global().of::<T>()
}

/// The record descriptor of a record type `T`.
///
/// Types whose descriptor is not a record get an empty record named after
/// their signature; nothing declared by them would be stored in it.
pub fn record_descriptor_of<T: JsonType + 'static>() -> Arc<RecordDescriptor> {
    let descriptor = descriptor_of::<T>();
    match descriptor.as_record() {
        Some(record) => record.clone(),
        None => Arc::new(RecordDescriptor::new(descriptor.to_string())),
    }
}
