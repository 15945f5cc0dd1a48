use super::chains::prepare_chains;
use super::{ImportContext, Layout, Submitter};
use crate::config::keys;
use crate::error::{PlaylistError, Result};
use crate::model::meta::M_DESCRIPTION;
use crate::model::{upnp_class, Chain, ContainerDescriptor, MediaObject, ObjectId, ObjectType, Resource};
use crate::playlist::{playlist_dir, resolve_location, EntryLocation, PlaylistEntry, PlaylistType};
use crate::store::Store;
use crate::util::{last_path, strip_extension};

const PLAYLIST_BOXES: &[&str] = &[
    keys::PLAYLIST_ROOT,
    keys::PLAYLIST_ALL,
    keys::PLAYLIST_ALL_DIRECTORIES,
];

const DEFAULT_URL_MIMETYPE: &str = "audio/mpeg";
const DEFAULT_PROTOCOL: &str = "http-get";

/// Item for an entry that points to a URL
fn external_item(entry: &PlaylistEntry, url: &str, playlist_title: &str, kind: PlaylistType) -> MediaObject {
    let mimetype = entry.mimetype.as_deref().unwrap_or(DEFAULT_URL_MIMETYPE);
    let protocol = entry.protocol.as_deref().unwrap_or(DEFAULT_PROTOCOL);
    let description = match (&entry.description, kind) {
        (Some(description), _) => description.clone(),
        (None, PlaylistType::Asx) => format!("Entry from {playlist_title}"),
        (None, _) => format!("Song from {playlist_title}"),
    };

    let mut res = Resource::new("default").with_attribute("protocolInfo", format!("{protocol}:*:{mimetype}:*"));
    if let Some(size) = entry.size {
        res = res.with_attribute("size", size.to_string());
    }

    let mut item = MediaObject::new(url, mimetype)
        .with_title(entry.title.as_deref().unwrap_or(url))
        .with_class(upnp_class::MUSIC_TRACK)
        .with_meta(M_DESCRIPTION, description)
        .with_resource(res);
    item.object_type = ObjectType::ExternalUrl;
    item.protocol = Some(protocol.to_string());
    item
}

impl Layout<'_> {
    /// Read a playlist file and place its entries below `Playlists`.
    ///
    /// Unknown formats and unreadable files are logged and produce no ids.
    pub fn import_playlist(&self, obj: &MediaObject, ctx: &ImportContext, store: &mut dyn Store) -> Result<Vec<ObjectId>> {
        log::info!("Processing playlist: {}", obj.location);

        if PlaylistType::from_mimetype(&obj.mimetype).is_none() {
            let err = PlaylistError::UnrecognizedFormat {
                mimetype: obj.mimetype.clone(),
                location: obj.location.clone(),
            };
            log::warn!("{}", err);
            return Ok(Vec::new());
        }

        let content = match std::fs::read_to_string(&obj.location) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("{} ({})", PlaylistError::from(e), obj.location);
                return Ok(Vec::new());
            }
        };

        self.import_playlist_content(obj, &content, ctx, store)
    }

    /// Place the entries of an already loaded playlist.
    ///
    /// Entries without an explicit position are numbered from 1; the counter
    /// only moves on when an entry landed in (or already sat in) at least one
    /// container, so importing the same playlist again keeps its order.
    pub fn import_playlist_content(
        &self,
        obj: &MediaObject,
        content: &str,
        _ctx: &ImportContext,
        store: &mut dyn Store,
    ) -> Result<Vec<ObjectId>> {
        let Some(kind) = PlaylistType::from_mimetype(&obj.mimetype) else {
            let err = PlaylistError::UnrecognizedFormat {
                mimetype: obj.mimetype.clone(),
                location: obj.location.clone(),
            };
            log::warn!("{}", err);
            return Ok(Vec::new());
        };

        let boxes = prepare_chains(PLAYLIST_BOXES, &self.config.boxes, &[])?;

        let entries = match kind.parse(content) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("{} ({})", e, obj.location);
                return Ok(Vec::new());
            }
        };
        log::debug!("{} {} entries in {}", entries.len(), kind.name(), obj.location);

        let title = strip_extension(&obj.title).to_string();
        let playlist_container = |title: &str| ContainerDescriptor::new(title, upnp_class::PLAYLIST_CONTAINER);

        let all_chain = boxes.enabled(keys::PLAYLIST_ALL).then(|| -> Result<Chain> {
            Ok(boxes
                .chain(&[keys::PLAYLIST_ROOT, keys::PLAYLIST_ALL])?
                .then(playlist_container(&title)))
        });
        let all_chain = all_chain.transpose()?;

        let parent_dir = last_path(&obj.location);
        let dir_chain = (boxes.enabled(keys::PLAYLIST_ALL_DIRECTORIES) && !parent_dir.is_empty())
            .then(|| -> Result<Chain> {
                Ok(boxes
                    .chain(&[keys::PLAYLIST_ROOT, keys::PLAYLIST_ALL_DIRECTORIES])?
                    .then(playlist_container(&parent_dir))
                    .then(playlist_container(&title)))
            });
        let dir_chain = dir_chain.transpose()?;

        let base_dir = playlist_dir(&obj.location);
        let mut submitter = Submitter::new(store);
        let mut counter = 1;

        for entry in &entries {
            let mut item = match resolve_location(&entry.location, base_dir) {
                EntryLocation::Remote(url) => external_item(entry, &url, &title, kind),
                EntryLocation::Local(path) => match submitter.store().get_cds_object(&path) {
                    Some(found) => {
                        let mut item = found.snapshot();
                        item.title = found.meta_title().to_string();
                        item
                    }
                    None => {
                        log::debug!("Playlist entry {} is not in the store, skipping", path);
                        continue;
                    }
                },
            };
            item.playlist_order = Some(entry.order.unwrap_or(counter));

            let mut placed = false;
            for chain in all_chain.iter().chain(dir_chain.iter()) {
                placed |= submitter
                    .submit_or_present(&item, chain, Some(upnp_class::PLAYLIST_CONTAINER))
                    .is_some();
            }
            if placed {
                counter += 1;
            }
        }

        Ok(submitter.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoxEntry, LayoutConfig};
    use crate::model::meta::M_TITLE;
    use crate::store::MemoryStore;

    fn playlist(location: &str, mimetype: &str) -> MediaObject {
        MediaObject::new(location, mimetype)
    }

    /// Memory store that refuses every item for one location
    struct RejectingStore {
        inner: MemoryStore,
        rejected: &'static str,
    }

    impl Store for RejectingStore {
        fn add_container_tree(&mut self, chain: &Chain) -> Option<ObjectId> {
            self.inner.add_container_tree(chain)
        }

        fn add_cds_object(&mut self, obj: &MediaObject, parent: ObjectId, class_hint: Option<&str>) -> Option<ObjectId> {
            if obj.location == self.rejected {
                return None;
            }
            self.inner.add_cds_object(obj, parent, class_hint)
        }

        fn update_cds_object(&mut self, obj: &MediaObject) -> Option<ObjectId> {
            self.inner.update_cds_object(obj)
        }
    }

    fn orders(store: &MemoryStore, titles: &[&str]) -> Vec<(String, Option<u32>)> {
        let container = store.find_container(titles).unwrap();
        store
            .items_in(container.id)
            .iter()
            .map(|item| (item.object.title.clone(), item.object.playlist_order))
            .collect()
    }

    #[test]
    fn test_m3u_entries_in_both_chains() {
        let config = LayoutConfig::builtin().unwrap();
        let mut store = MemoryStore::new();
        store.add_file(MediaObject::new("/music/rock/one.mp3", "audio/mpeg").with_meta(M_TITLE, "One"));
        store.add_file(MediaObject::new("/music/two.mp3", "audio/mpeg").with_meta(M_TITLE, "Two"));
        let list = playlist("/music/rock/Best.m3u", "audio/x-mpegurl");
        let content = "#EXTM3U\none.mp3\n/music/two.mp3\nmissing.mp3\n";

        let ids = Layout::new(&config)
            .import_playlist_content(&list, content, &ImportContext::new("/music"), &mut store)
            .unwrap();

        assert_eq!(ids.len(), 4);
        let all = store.find_container(&["Playlists", "All Playlists", "Best"]).unwrap();
        assert_eq!(all.descriptor.upnp_class, upnp_class::PLAYLIST_CONTAINER);
        let items = store.items_in(all.id);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].object.title, "One");
        assert_eq!(items[0].object.playlist_order, Some(1));
        assert_eq!(items[1].object.title, "Two");
        assert_eq!(items[1].object.playlist_order, Some(2));

        let by_dir = store
            .find_container(&["Playlists", "Directories", "rock", "Best"])
            .unwrap();
        assert_eq!(store.items_in(by_dir.id).len(), 2);
    }

    #[test]
    fn test_reimport_keeps_entries_and_order() {
        let config = LayoutConfig::builtin().unwrap();
        let mut store = MemoryStore::new();
        for (location, title) in [("/music/a.mp3", "A"), ("/music/b.mp3", "B"), ("/music/c.mp3", "C")] {
            store.add_file(MediaObject::new(location, "audio/mpeg").with_meta(M_TITLE, title));
        }
        let list = playlist("/music/mix.m3u", "audio/x-mpegurl");
        let content = "/music/a.mp3\n/music/b.mp3\n/music/c.mp3\n";
        let layout = Layout::new(&config);

        let first = layout
            .import_playlist_content(&list, content, &ImportContext::default(), &mut store)
            .unwrap();
        let second = layout
            .import_playlist_content(&list, content, &ImportContext::default(), &mut store)
            .unwrap();

        assert_eq!(first.len(), 6);
        assert!(second.is_empty());
        let expected = vec![
            ("A".to_string(), Some(1)),
            ("B".to_string(), Some(2)),
            ("C".to_string(), Some(3)),
        ];
        assert_eq!(orders(&store, &["Playlists", "All Playlists", "mix"]), expected);
        assert_eq!(orders(&store, &["Playlists", "Directories", "music", "mix"]), expected);
    }

    #[test]
    fn test_rejected_entry_does_not_advance_order() {
        let config = LayoutConfig::builtin().unwrap();
        let mut store = RejectingStore {
            inner: MemoryStore::new(),
            rejected: "http://radio.example/b",
        };
        let list = playlist("/lists/mix.m3u", "audio/x-mpegurl");
        let content = "http://radio.example/a\nhttp://radio.example/b\nhttp://radio.example/c\n";

        let ids = Layout::new(&config)
            .import_playlist_content(&list, content, &ImportContext::default(), &mut store)
            .unwrap();

        assert_eq!(ids.len(), 4);
        let expected = vec![
            ("http://radio.example/a".to_string(), Some(1)),
            ("http://radio.example/c".to_string(), Some(2)),
        ];
        assert_eq!(orders(&store.inner, &["Playlists", "All Playlists", "mix"]), expected);
        assert_eq!(orders(&store.inner, &["Playlists", "Directories", "lists", "mix"]), expected);
    }

    #[test]
    fn test_remote_entries() {
        let config = LayoutConfig::builtin().unwrap();
        let mut store = MemoryStore::new();
        let list = playlist("/lists/radio.pls", "audio/x-scpls");
        let content = "[playlist]\nFile1=http://radio.example/a\nTitle1=Radio A\nFile2=http://radio.example/b\nMimeType2=audio/aac\n";

        Layout::new(&config)
            .import_playlist_content(&list, content, &ImportContext::default(), &mut store)
            .unwrap();

        let all = store.find_container(&["Playlists", "All Playlists", "radio"]).unwrap();
        let items = store.items_in(all.id);
        assert_eq!(items.len(), 2);

        let first = &items[0].object;
        assert_eq!(first.title, "Radio A");
        assert_eq!(first.object_type, ObjectType::ExternalUrl);
        assert_eq!(first.mimetype, "audio/mpeg");
        assert_eq!(first.protocol.as_deref(), Some("http-get"));
        assert_eq!(first.upnp_class, upnp_class::MUSIC_TRACK);
        assert_eq!(first.meta.get(M_DESCRIPTION), Some("Song from radio"));

        let second = &items[1].object;
        assert_eq!(second.title, "http://radio.example/b");
        assert_eq!(second.mimetype, "audio/aac");
        assert_eq!(second.playlist_order, Some(2));
    }

    #[test]
    fn test_directories_box_disabled() {
        let config = LayoutConfig::builtin()
            .unwrap()
            .with_box(BoxEntry::new(keys::PLAYLIST_ALL_DIRECTORIES, "Directories", upnp_class::CONTAINER).disabled());
        let mut store = MemoryStore::new();
        let list = playlist("/lists/web.m3u", "audio/x-mpegurl");

        let ids = Layout::new(&config)
            .import_playlist_content(&list, "http://a.example/1\n", &ImportContext::default(), &mut store)
            .unwrap();

        assert_eq!(ids.len(), 1);
        assert!(store.find_container(&["Playlists", "Directories"]).is_none());
    }

    #[test]
    fn test_unknown_mimetype_is_skipped() {
        let config = LayoutConfig::builtin().unwrap();
        let mut store = MemoryStore::new();
        let list = playlist("/lists/notes.txt", "text/plain");

        let ids = Layout::new(&config)
            .import_playlist(&list, &ImportContext::default(), &mut store)
            .unwrap();

        assert!(ids.is_empty());
        assert_eq!(store.container_count(), 0);
    }

    #[test]
    fn test_asx_description() {
        let config = LayoutConfig::builtin().unwrap();
        let mut store = MemoryStore::new();
        let list = playlist("/lists/show.asx", "video/x-ms-asx");
        let content = r#"<asx><entry><ref href="http://tv.example/1.wmv"/></entry></asx>"#;

        Layout::new(&config)
            .import_playlist_content(&list, content, &ImportContext::default(), &mut store)
            .unwrap();

        let all = store.find_container(&["Playlists", "All Playlists", "show"]).unwrap();
        let item = &store.items_in(all.id)[0].object;
        assert_eq!(item.meta.get(M_DESCRIPTION), Some("Entry from show"));
    }
}
