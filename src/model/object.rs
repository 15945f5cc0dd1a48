use super::meta::{upnp_class, MetaData, M_TITLE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier assigned by the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of object as the content directory sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectType {
    Container,
    #[default]
    Item,
    /// Item that points to a remote URL instead of a local file
    ExternalUrl,
}

/// Broad media category, derived from the mimetype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
    Image,
    Other,
}

/// One resource (stream, thumbnail, subtitle, ...) attached to an object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Handler or purpose of the resource, e.g. `default` or `thumbnail`
    pub handler: String,

    /// Protocol and resource attributes (protocolInfo, size, resolution...)
    pub attributes: BTreeMap<String, String>,
}

impl Resource {
    pub fn new(handler: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// The item being imported, plus everything the metadata extractors found
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaObject {
    /// Assigned by the store once the object exists
    pub id: Option<ObjectId>,

    /// Canonical object this one references, if any
    pub ref_id: Option<ObjectId>,

    pub object_type: ObjectType,

    /// Source path or URL
    pub location: String,

    /// Display title
    pub title: String,

    pub mimetype: String,

    /// Leaf content type (`object.item.audioItem.musicTrack`, ...)
    pub upnp_class: String,

    pub meta: MetaData,

    /// Source-specific extras (EXIF tags, NFO fields, online service data)
    pub aux: BTreeMap<String, String>,

    pub res: Vec<Resource>,

    pub sort_key: String,

    /// Transport protocol for external URLs (`http-get`)
    pub protocol: Option<String>,

    /// Position inside a playlist container
    pub playlist_order: Option<u32>,
}

impl MediaObject {
    /// Create an item for a file or URL
    pub fn new(location: impl Into<String>, mimetype: impl Into<String>) -> Self {
        let location = location.into();
        let title = location
            .rsplit('/')
            .next()
            .unwrap_or(location.as_str())
            .to_string();
        let mimetype = mimetype.into();
        let upnp_class = default_class(&mimetype).to_string();

        Self {
            location,
            title,
            mimetype,
            upnp_class,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_class(mut self, upnp_class: impl Into<String>) -> Self {
        self.upnp_class = upnp_class.into();
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.add(key, value);
        self
    }

    pub fn with_aux(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.aux.insert(key.into(), value.into());
        self
    }

    pub fn with_resource(mut self, res: Resource) -> Self {
        self.res.push(res);
        self
    }

    /// Media category from the mimetype; `application/ogg` counts as audio.
    pub fn kind(&self) -> MediaKind {
        match self.mimetype.split('/').next().unwrap_or_default() {
            "audio" => MediaKind::Audio,
            "video" => MediaKind::Video,
            "image" => MediaKind::Image,
            _ if self.mimetype == "application/ogg" => MediaKind::Audio,
            _ => MediaKind::Other,
        }
    }

    /// Title from the metadata, falling back to the object title
    pub fn meta_title(&self) -> &str {
        self.meta.get_non_empty(M_TITLE).unwrap_or(&self.title)
    }

    pub fn aux_value(&self, key: &str) -> Option<&str> {
        self.aux.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Copy of this object as submitted under one chain.
    ///
    /// The copy references the original once it has been stored, so every
    /// virtual placement points back to the same canonical item.
    pub fn snapshot(&self) -> Self {
        let mut copy = self.clone();
        if copy.ref_id.is_none() {
            copy.ref_id = self.id;
        }
        copy
    }
}

fn default_class(mimetype: &str) -> &'static str {
    match mimetype.split('/').next().unwrap_or_default() {
        "audio" => upnp_class::MUSIC_TRACK,
        "video" => upnp_class::VIDEO_ITEM,
        "image" => upnp_class::IMAGE_ITEM,
        _ => upnp_class::ITEM,
    }
}
