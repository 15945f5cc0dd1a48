//! Virtual layout builders
//!
//! Each `import_*` entry point takes one media object, works out every
//! virtual folder it belongs in, and submits one chain per axis to a
//! [`Store`]. The ids of everything created are returned in submission order.

mod audio;
mod chains;
pub mod classify;
mod detail;
mod fs;
mod metafile;
mod online;
mod playlist;
mod structured;
mod visual;

pub use chains::{append_directories, prepare_chains, ResolvedBoxes};

use crate::config::{AudioLayout, LayoutConfig, VisualLayout};
use crate::error::Result;
use crate::model::{Chain, MediaKind, MediaObject, ObjectId, ObjectType, Resource};
use crate::playlist::PlaylistType;
use crate::store::Store;

/// The physical container an object was found in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParentContainer {
    pub id: ObjectId,
    /// Resources of the container itself (folder artwork and the like)
    pub res: Vec<Resource>,
}

/// Per-invocation arguments of the import entry points
#[derive(Debug, Clone, Default)]
pub struct ImportContext {
    /// Root directory of the import; directory chains are relative to it
    pub root_path: String,

    pub container: Option<ParentContainer>,

    pub autoscan_id: Option<u32>,

    /// Class for album containers, when the import pipeline overrides it
    pub container_class: Option<String>,
}

impl ImportContext {
    pub fn new(root_path: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            ..Default::default()
        }
    }

    pub fn with_container(mut self, container: ParentContainer) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_autoscan_id(mut self, id: u32) -> Self {
        self.autoscan_id = Some(id);
        self
    }

    pub fn with_container_class(mut self, class: impl Into<String>) -> Self {
        self.container_class = Some(class.into());
        self
    }
}

/// Collects the ids of one import run
struct Submitter<'s> {
    store: &'s mut dyn Store,
    ids: Vec<ObjectId>,
}

impl<'s> Submitter<'s> {
    fn new(store: &'s mut dyn Store) -> Self {
        Self {
            store,
            ids: Vec::new(),
        }
    }

    /// Materialize `chain` and add `item` under its leaf.
    ///
    /// A store no-op is not an error: the item already sits in that container.
    fn submit(&mut self, item: &MediaObject, chain: &Chain, class_hint: Option<&str>) -> Option<ObjectId> {
        let Some(parent) = self.store.add_container_tree(chain) else {
            log::debug!("Empty chain for {}, nothing submitted", item.location);
            return None;
        };

        match self.store.add_cds_object(item, parent, class_hint) {
            Some(id) => {
                self.ids.push(id);
                Some(id)
            }
            None => {
                log::debug!("{} not added to {}", item.location, chain.path());
                None
            }
        }
    }

    /// Like [`Submitter::submit`], but an item already sitting in the leaf
    /// container at the same position counts as placed.
    ///
    /// Only newly created ids are collected.
    fn submit_or_present(&mut self, item: &MediaObject, chain: &Chain, class_hint: Option<&str>) -> Option<ObjectId> {
        let parent = self.store.add_container_tree(chain)?;
        match self.store.add_cds_object(item, parent, class_hint) {
            Some(id) => {
                self.ids.push(id);
                Some(id)
            }
            None => self.store.find_cds_object(item, parent),
        }
    }

    fn store(&self) -> &dyn Store {
        &*self.store
    }

    fn finish(self) -> Vec<ObjectId> {
        self.ids
    }
}

/// Copy of `obj` titled for one submission
fn titled(obj: &MediaObject, title: impl Into<String>) -> MediaObject {
    let mut item = obj.snapshot();
    item.title = title.into();
    item
}

/// Layout engine bound to one validated configuration
#[derive(Debug, Clone, Copy)]
pub struct Layout<'c> {
    config: &'c LayoutConfig,
}

impl<'c> Layout<'c> {
    pub fn new(config: &'c LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        self.config
    }

    /// Pick the builder for `obj` from its mimetype and the configured options.
    ///
    /// Objects of an unsupported type are logged and produce no chains.
    pub fn import(&self, obj: &MediaObject, ctx: &ImportContext, store: &mut dyn Store) -> Result<Vec<ObjectId>> {
        if PlaylistType::from_mimetype(&obj.mimetype).is_some() {
            return self.import_playlist(obj, ctx, store);
        }

        let options = &self.config.options;
        match obj.kind() {
            MediaKind::Audio => match options.audio_layout {
                AudioLayout::Default => self.import_audio(obj, ctx, store),
                AudioLayout::Structured => self.import_audio_structured(obj, ctx, store),
            },
            MediaKind::Video if obj.object_type == ObjectType::ExternalUrl => {
                self.import_online_item(obj, ctx, store)
            }
            MediaKind::Video => match options.visual_layout {
                VisualLayout::Default => self.import_video(obj, ctx, store),
                VisualLayout::Detail => self.import_video_detail(obj, ctx, store),
            },
            MediaKind::Image => match options.visual_layout {
                VisualLayout::Default => self.import_image(obj, ctx, store),
                VisualLayout::Detail => self.import_image_detail(obj, ctx, store),
            },
            MediaKind::Other => {
                log::debug!("No layout for {} ({})", obj.location, obj.mimetype);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_other_types_are_ignored() {
        let config = LayoutConfig::builtin().unwrap();
        let mut store = MemoryStore::new();
        let obj = store.add_file(MediaObject::new("/docs/readme.txt", "text/plain"));

        let ids = Layout::new(&config)
            .import(&obj, &ImportContext::new("/docs"), &mut store)
            .unwrap();

        assert!(ids.is_empty());
        assert_eq!(store.container_count(), 0);
    }

    #[test]
    fn test_submitter_skips_duplicates() {
        let mut store = MemoryStore::new();
        let obj = store.add_file(MediaObject::new("/music/a.mp3", "audio/mpeg"));
        let chain: Chain = vec![crate::model::ContainerDescriptor::new(
            "Audio",
            crate::model::upnp_class::CONTAINER,
        )]
        .into();

        let mut submitter = Submitter::new(&mut store);
        assert!(submitter.submit(&obj.snapshot(), &chain, None).is_some());
        assert!(submitter.submit(&obj.snapshot(), &chain, None).is_none());
        assert!(submitter.submit(&obj.snapshot(), &Chain::new(), None).is_none());
        assert_eq!(submitter.finish().len(), 1);
    }

    #[test]
    fn test_submit_or_present_reports_existing_item() {
        let mut store = MemoryStore::new();
        let obj = store.add_file(MediaObject::new("/music/a.mp3", "audio/mpeg"));
        let chain: Chain = vec![crate::model::ContainerDescriptor::new(
            "Playlists",
            crate::model::upnp_class::CONTAINER,
        )]
        .into();

        let mut submitter = Submitter::new(&mut store);
        let first = submitter.submit_or_present(&obj.snapshot(), &chain, None);
        assert!(first.is_some());
        assert_eq!(submitter.submit_or_present(&obj.snapshot(), &chain, None), first);
        assert_eq!(submitter.finish().len(), 1);
    }

    #[test]
    fn test_context_with_default_container() {
        let ctx = ImportContext::new("/music").with_container(ParentContainer::default());
        let container = ctx.container.unwrap();

        assert_eq!(container.id, ObjectId::default());
        assert!(container.res.is_empty());
    }

    #[test]
    fn test_titled_copy_leaves_original() {
        let obj = MediaObject::new("/music/a.mp3", "audio/mpeg").with_id(ObjectId(5));
        let item = titled(&obj, "Artist - Album - Song");

        assert_eq!(item.title, "Artist - Album - Song");
        assert_eq!(item.ref_id, Some(ObjectId(5)));
        assert_eq!(obj.title, "a.mp3");
    }
}
