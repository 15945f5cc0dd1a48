use super::Store;
use crate::model::{upnp_class, Chain, ContainerDescriptor, MediaObject, ObjectId, ObjectType};
use crate::util::escape_slash;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

/// Id of the invisible root container
pub const ROOT_ID: ObjectId = ObjectId(0);

/// A container created from a chain
#[derive(Debug, Clone)]
pub struct ContainerNode {
    pub id: ObjectId,
    pub parent_id: ObjectId,
    /// Escaped title path from the root, e.g. `/Audio/Artists/AC\/DC`
    pub path: String,
    pub descriptor: ContainerDescriptor,
}

/// An item stored in the tree (or a canonical file object outside of it)
#[derive(Debug, Clone)]
pub struct ItemNode {
    pub id: ObjectId,
    /// `None` for canonical objects registered with [`MemoryStore::add_file`]
    pub parent_id: Option<ObjectId>,
    pub object: MediaObject,
}

/// In-memory store with path-keyed container deduplication
#[derive(Debug, Default)]
pub struct MemoryStore {
    containers: BTreeMap<ObjectId, ContainerNode>,
    items: BTreeMap<ObjectId, ItemNode>,
    by_path: HashMap<String, ObjectId>,
    by_location: HashMap<String, ObjectId>,
    children: HashMap<ObjectId, Vec<ObjectId>>,
    next_id: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Register a canonical file object and return it with its new id.
    ///
    /// Virtual placements reference this object through `ref_id`.
    pub fn add_file(&mut self, mut obj: MediaObject) -> MediaObject {
        if let Some(id) = self.by_location.get(&obj.location) {
            obj.id = Some(*id);
            return obj;
        }

        let id = self.allocate(None);
        obj.id = Some(id);
        self.by_location.insert(obj.location.clone(), id);
        self.items.insert(
            id,
            ItemNode {
                id,
                parent_id: None,
                object: obj.clone(),
            },
        );
        obj
    }

    fn allocate(&mut self, wanted: Option<ObjectId>) -> ObjectId {
        if let Some(id) = wanted {
            if !self.containers.contains_key(&id) && !self.items.contains_key(&id) && id != ROOT_ID {
                self.next_id = self.next_id.max(id.0 + 1);
                return id;
            }
        }
        let id = ObjectId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    pub fn container(&self, id: ObjectId) -> Option<&ContainerNode> {
        self.containers.get(&id)
    }

    pub fn item(&self, id: ObjectId) -> Option<&ItemNode> {
        self.items.get(&id)
    }

    /// Container found by its unescaped title path
    pub fn find_container<S: AsRef<str>>(&self, titles: &[S]) -> Option<&ContainerNode> {
        let path: String = titles
            .iter()
            .map(|t| format!("/{}", escape_slash(t.as_ref())))
            .collect();
        self.by_path.get(&path).and_then(|id| self.containers.get(id))
    }

    /// Items placed directly inside a container, in insertion order
    pub fn items_in(&self, parent: ObjectId) -> Vec<&ItemNode> {
        self.children
            .get(&parent)
            .into_iter()
            .flatten()
            .filter_map(|id| self.items.get(id))
            .collect()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Number of items placed in the tree (canonical objects excluded)
    pub fn item_count(&self) -> usize {
        self.items.values().filter(|i| i.parent_id.is_some()).count()
    }

    /// Indented text rendering of the virtual tree
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.render_children(ROOT_ID, 0, &mut out);
        out
    }

    fn render_children(&self, parent: ObjectId, depth: usize, out: &mut String) {
        let Some(children) = self.children.get(&parent) else {
            return;
        };

        let mut containers: Vec<&ContainerNode> = children
            .iter()
            .filter_map(|id| self.containers.get(id))
            .collect();
        containers.sort_by(|a, b| a.descriptor.title.cmp(&b.descriptor.title));

        let mut items: Vec<&ItemNode> = children.iter().filter_map(|id| self.items.get(id)).collect();
        items.sort_by_key(|i| (i.object.playlist_order, i.object.title.clone()));

        let indent = "  ".repeat(depth);
        for container in containers {
            let _ = writeln!(out, "{}{}/", indent, container.descriptor.title);
            self.render_children(container.id, depth + 1, out);
        }
        for item in items {
            let _ = writeln!(out, "{}{}", indent, item.object.title);
        }
    }

    fn create_container(
        &mut self,
        parent_id: ObjectId,
        path: String,
        descriptor: &ContainerDescriptor,
    ) -> ObjectId {
        let id = self.allocate(descriptor.id);
        log::debug!("Creating container {} ({})", path, id);
        self.by_path.insert(path.clone(), id);
        self.children.entry(parent_id).or_default().push(id);
        self.containers.insert(
            id,
            ContainerNode {
                id,
                parent_id,
                path,
                descriptor: ContainerDescriptor {
                    id: Some(id),
                    ..descriptor.clone()
                },
            },
        );
        id
    }

    fn merge_container(&mut self, id: ObjectId, incoming: &ContainerDescriptor) {
        let Some(node) = self.containers.get_mut(&id) else {
            return;
        };
        let existing = &mut node.descriptor;
        existing.meta.merge(&incoming.meta);
        if existing.res.is_empty() && !incoming.res.is_empty() {
            existing.res = incoming.res.clone();
            existing.aux = incoming.aux.clone();
            existing.ref_id = incoming.ref_id;
        }
        if existing.upnp_class == upnp_class::CONTAINER && incoming.upnp_class != upnp_class::CONTAINER {
            existing.upnp_class = incoming.upnp_class.clone();
        }
        existing.searchable |= incoming.searchable;
    }

    /// Identity of an object for duplicate detection inside one container
    fn identity(obj: &MediaObject) -> String {
        match (obj.ref_id, obj.object_type) {
            (Some(ref_id), _) => format!("ref:{ref_id}"),
            (None, ObjectType::ExternalUrl) => format!("url:{}", obj.location),
            (None, _) => format!("loc:{}", obj.location),
        }
    }
}

impl Store for MemoryStore {
    fn add_container_tree(&mut self, chain: &Chain) -> Option<ObjectId> {
        let mut parent = ROOT_ID;
        let mut path = String::new();

        for descriptor in chain.containers() {
            path.push('/');
            path.push_str(&escape_slash(&descriptor.title));

            parent = match self.by_path.get(&path).copied() {
                Some(id) => {
                    self.merge_container(id, descriptor);
                    id
                }
                None => self.create_container(parent, path.clone(), descriptor),
            };
        }

        (!chain.is_empty()).then_some(parent)
    }

    fn add_cds_object(
        &mut self,
        obj: &MediaObject,
        parent: ObjectId,
        class_hint: Option<&str>,
    ) -> Option<ObjectId> {
        if parent != ROOT_ID && !self.containers.contains_key(&parent) {
            log::warn!("Container {} does not exist, dropping {}", parent, obj.location);
            return None;
        }

        if let (Some(hint), Some(node)) = (class_hint, self.containers.get_mut(&parent)) {
            if node.descriptor.upnp_class == upnp_class::CONTAINER {
                node.descriptor.upnp_class = hint.to_string();
            }
        }

        if let Some(existing) = self.find_cds_object(obj, parent) {
            log::debug!("{} already present in container {} as {}", obj.location, parent, existing);
            return None;
        }

        let id = self.allocate(None);
        let mut stored = obj.clone();
        stored.id = Some(id);
        self.children.entry(parent).or_default().push(id);
        self.items.insert(
            id,
            ItemNode {
                id,
                parent_id: Some(parent),
                object: stored,
            },
        );
        Some(id)
    }

    fn update_cds_object(&mut self, obj: &MediaObject) -> Option<ObjectId> {
        let id = obj
            .id
            .or_else(|| self.by_location.get(&obj.location).copied())?;
        let node = self.items.get_mut(&id)?;
        node.object.title = obj.title.clone();
        node.object.upnp_class = obj.upnp_class.clone();
        node.object.meta.merge(&obj.meta);
        node.object.aux.extend(obj.aux.clone());
        Some(id)
    }

    fn find_cds_object(&self, obj: &MediaObject, parent: ObjectId) -> Option<ObjectId> {
        let identity = Self::identity(obj);
        self.items_in(parent)
            .into_iter()
            .find(|item| {
                Self::identity(&item.object) == identity && item.object.playlist_order == obj.playlist_order
            })
            .map(|item| item.id)
    }

    fn get_cds_object(&self, location: &str) -> Option<MediaObject> {
        self.by_location
            .get(location)
            .and_then(|id| self.items.get(id))
            .map(|node| node.object.clone())
    }
}
