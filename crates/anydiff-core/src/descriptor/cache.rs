//! Process-wide descriptor cache.
//!
//! Descriptors are built lazily on first use and never mutated afterwards.
//! Two threads racing on the same type may both build it; whichever insert
//! lands last wins, and both descriptors are equivalent.

use super::{Diffable, TypeDescriptor};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

type DescriptorMap = HashMap<TypeId, Arc<TypeDescriptor>>;

static DESCRIPTORS: OnceLock<RwLock<DescriptorMap>> = OnceLock::new();

fn registry() -> &'static RwLock<DescriptorMap> {
    DESCRIPTORS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Get the shared descriptor for `T`, building it on first use.
pub fn descriptor_of<T: Diffable>() -> Arc<TypeDescriptor> {
    let type_id = TypeId::of::<T>();

    {
        let map = registry().read().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(descriptor) = map.get(&type_id) {
            return Arc::clone(descriptor);
        }
    }

    // Built outside the lock: describe() may itself touch the cache.
    let descriptor = Arc::new(T::describe());
    tracing::trace!(
        component = module_path!(),
        type_name = descriptor.type_name(),
        members = descriptor.members().len(),
        "type descriptor built"
    );

    let mut map = registry()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    map.insert(type_id, Arc::clone(&descriptor));
    descriptor
}

/// Number of descriptors currently cached
pub fn cached_descriptor_count() -> usize {
    registry()
        .read()
        .map(|map| map.len())
        .unwrap_or_else(|poisoned| poisoned.into_inner().len())
}
