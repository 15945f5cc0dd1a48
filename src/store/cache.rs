use super::Store;
use crate::model::{Chain, MediaObject, ObjectId};
use std::collections::HashMap;

/// Explicit container-id cache in front of a store, keyed by the full title path.
///
/// The cache is owned by the caller and lives as long as it wants it to; there is
/// no process-wide state. Chains whose descriptors carry metadata or resources
/// always reach the store so its metadata merge still happens.
#[derive(Debug)]
pub struct ContainerCache<S: Store> {
    store: S,
    ids: HashMap<String, ObjectId>,
    hits: usize,
}

impl<S: Store> ContainerCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            ids: HashMap::new(),
            hits: 0,
        }
    }

    /// Number of chains answered from the cache
    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}

impl<S: Store> Store for ContainerCache<S> {
    fn add_container_tree(&mut self, chain: &Chain) -> Option<ObjectId> {
        let plain = chain
            .containers()
            .iter()
            .all(|c| c.meta.is_empty() && c.res.is_empty());
        let path = chain.path();

        if plain {
            if let Some(id) = self.ids.get(&path) {
                self.hits += 1;
                return Some(*id);
            }
        }

        let id = self.store.add_container_tree(chain)?;
        self.ids.insert(path, id);
        Some(id)
    }

    fn add_cds_object(
        &mut self,
        obj: &MediaObject,
        parent: ObjectId,
        class_hint: Option<&str>,
    ) -> Option<ObjectId> {
        self.store.add_cds_object(obj, parent, class_hint)
    }

    fn update_cds_object(&mut self, obj: &MediaObject) -> Option<ObjectId> {
        self.store.update_cds_object(obj)
    }

    fn find_cds_object(&self, obj: &MediaObject, parent: ObjectId) -> Option<ObjectId> {
        self.store.find_cds_object(obj, parent)
    }

    fn get_cds_object(&self, location: &str) -> Option<MediaObject> {
        self.store.get_cds_object(location)
    }
}
