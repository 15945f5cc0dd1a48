use super::meta::MetaData;
use super::object::{ObjectId, Resource};
use crate::util::container_chain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of a chain, built fresh for every submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerDescriptor {
    /// Well-known id from the box configuration
    pub id: Option<ObjectId>,

    pub title: String,

    pub upnp_class: String,

    pub searchable: bool,

    /// Protocol-level shortcut name
    pub upnp_shortcut: Option<String>,

    pub sort_key: Option<String>,

    pub meta: MetaData,

    /// Resources inherited from the leaf object
    pub res: Vec<Resource>,

    pub aux: BTreeMap<String, String>,

    /// Object whose resources this container borrows
    pub ref_id: Option<ObjectId>,
}

impl ContainerDescriptor {
    pub fn new(title: impl Into<String>, upnp_class: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            upnp_class: upnp_class.into(),
            ..Default::default()
        }
    }

    /// Copy of this descriptor under a different title
    pub fn titled(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    pub fn with_class(mut self, upnp_class: impl Into<String>) -> Self {
        self.upnp_class = upnp_class.into();
        self
    }

    pub fn with_searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.add(key, value);
        self
    }
}

/// Ordered containers from a root to the leaf container of one axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chain(Vec<ContainerDescriptor>);

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, container: ContainerDescriptor) {
        self.0.push(container);
    }

    /// Builder form of [`Chain::push`]
    pub fn then(mut self, container: ContainerDescriptor) -> Self {
        self.0.push(container);
        self
    }

    pub fn containers(&self) -> &[ContainerDescriptor] {
        &self.0
    }

    pub fn last_mut(&mut self) -> Option<&mut ContainerDescriptor> {
        self.0.last_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.0.iter().map(|c| c.title.as_str()).collect()
    }

    /// Escaped path string, e.g. `/Audio/Artists/AC\/DC`
    pub fn path(&self) -> String {
        container_chain(&self.titles())
    }
}

impl From<Vec<ContainerDescriptor>> for Chain {
    fn from(containers: Vec<ContainerDescriptor>) -> Self {
        Self(containers)
    }
}

impl FromIterator<ContainerDescriptor> for Chain {
    fn from_iter<I: IntoIterator<Item = ContainerDescriptor>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
