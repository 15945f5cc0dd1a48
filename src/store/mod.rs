//! Content directory store interface
//!
//! The layout builders only decide *where* an object goes. Persisting
//! containers and items is the job of a [`Store`] implementation.

mod cache;
mod memory;

pub use cache::ContainerCache;
pub use memory::{ContainerNode, ItemNode, MemoryStore, ROOT_ID};

use crate::model::{Chain, MediaObject, ObjectId};

/// Hierarchical store consumed by the layout builders
pub trait Store {
    /// Materialize a chain and return the id of its leaf container.
    ///
    /// Must be idempotent on the title path: containers that already exist are
    /// reused and their metadata merged with the incoming descriptor.
    /// Returns `None` for an empty chain.
    fn add_container_tree(&mut self, chain: &Chain) -> Option<ObjectId>;

    /// Add `obj` (or a reference to its canonical object) under `parent`.
    ///
    /// Returns `None` if nothing was added, e.g. the same object already sits
    /// in that container at the same position.
    fn add_cds_object(
        &mut self,
        obj: &MediaObject,
        parent: ObjectId,
        class_hint: Option<&str>,
    ) -> Option<ObjectId>;

    /// Update the metadata of an object that already exists
    fn update_cds_object(&mut self, obj: &MediaObject) -> Option<ObjectId>;

    /// Id of the item `add_cds_object` would treat as a duplicate of `obj` in `parent`.
    ///
    /// Lets callers tell "already there" apart from a rejected submission.
    fn find_cds_object(&self, _obj: &MediaObject, _parent: ObjectId) -> Option<ObjectId> {
        None
    }

    /// Canonical object stored for a file location
    fn get_cds_object(&self, _location: &str) -> Option<MediaObject> {
        None
    }
}

impl<S: Store + ?Sized> Store for &mut S {
    fn add_container_tree(&mut self, chain: &Chain) -> Option<ObjectId> {
        (**self).add_container_tree(chain)
    }

    fn add_cds_object(
        &mut self,
        obj: &MediaObject,
        parent: ObjectId,
        class_hint: Option<&str>,
    ) -> Option<ObjectId> {
        (**self).add_cds_object(obj, parent, class_hint)
    }

    fn update_cds_object(&mut self, obj: &MediaObject) -> Option<ObjectId> {
        (**self).update_cds_object(obj)
    }

    fn find_cds_object(&self, obj: &MediaObject, parent: ObjectId) -> Option<ObjectId> {
        (**self).find_cds_object(obj, parent)
    }

    fn get_cds_object(&self, location: &str) -> Option<MediaObject> {
        (**self).get_cds_object(location)
    }
}
