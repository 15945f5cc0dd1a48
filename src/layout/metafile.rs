use super::{ImportContext, Layout};
use crate::error::Result;
use crate::metadata::{parse_nfo, read_nfo, NfoDocument};
use crate::model::{MediaObject, ObjectId};
use crate::store::Store;
use std::path::Path;

impl Layout<'_> {
    /// Merge the NFO sidecar `meta` into the stored object `obj`.
    ///
    /// Returns the id of the updated object. Unreadable or invalid sidecars
    /// are logged and leave the object alone.
    pub fn import_metadata(
        &self,
        meta: &MediaObject,
        obj: &MediaObject,
        _ctx: &ImportContext,
        store: &mut dyn Store,
    ) -> Result<Vec<ObjectId>> {
        log::info!("Processing metafile: {} for {}", meta.location, obj.location);

        match read_nfo(Path::new(&meta.location)) {
            Ok(doc) => Ok(self.apply_metadata(&doc, obj, store)),
            Err(e) => {
                log::warn!("{} ({})", e, meta.location);
                Ok(Vec::new())
            }
        }
    }

    /// Same as [`Layout::import_metadata`] for NFO content already in memory
    pub fn import_metadata_content(
        &self,
        content: &str,
        obj: &MediaObject,
        store: &mut dyn Store,
    ) -> Result<Vec<ObjectId>> {
        match parse_nfo(content) {
            Ok(doc) => Ok(self.apply_metadata(&doc, obj, store)),
            Err(e) => {
                log::warn!("{} (metadata for {})", e, obj.location);
                Ok(Vec::new())
            }
        }
    }

    fn apply_metadata(
        &self,
        doc: &NfoDocument,
        obj: &MediaObject,
        store: &mut dyn Store,
    ) -> Vec<ObjectId> {
        let mut updated = obj.clone();
        doc.apply(&mut updated);
        match store.update_cds_object(&updated) {
            Some(id) => vec![id],
            None => {
                log::debug!("{} is not in the store, metadata dropped", obj.location);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::model::meta::M_DIRECTOR;
    use crate::model::upnp_class;
    use crate::store::MemoryStore;

    #[test]
    fn test_metadata_updates_stored_object() {
        let config = LayoutConfig::builtin().unwrap();
        let mut store = MemoryStore::new();
        let obj = store.add_file(MediaObject::new("/video/bbb.mkv", "video/x-matroska"));
        let content = "<movie><title>Big Buck Bunny</title><director>Sacha Goedegebure</director></movie>";

        let ids = Layout::new(&config)
            .import_metadata_content(content, &obj, &mut store)
            .unwrap();

        assert_eq!(ids, vec![obj.id.unwrap()]);
        let stored = store.get_cds_object("/video/bbb.mkv").unwrap();
        assert_eq!(stored.title, "Big Buck Bunny");
        assert_eq!(stored.upnp_class, upnp_class::MOVIE);
        assert_eq!(stored.meta.get(M_DIRECTOR), Some("Sacha Goedegebure"));
    }

    #[test]
    fn test_missing_sidecar_is_not_fatal() {
        let config = LayoutConfig::builtin().unwrap();
        let mut store = MemoryStore::new();
        let obj = store.add_file(MediaObject::new("/video/a.mkv", "video/x-matroska"));
        let nfo = MediaObject::new("/nonexistent/a.nfo", "text/xml");

        let ids = Layout::new(&config)
            .import_metadata(&nfo, &obj, &ImportContext::default(), &mut store)
            .unwrap();

        assert!(ids.is_empty());
    }
}
