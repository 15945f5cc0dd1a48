use super::chains::append_directories;
use super::{ImportContext, Layout, Submitter};
use crate::error::Result;
use crate::model::{upnp_class, Chain, ContainerDescriptor, MediaObject, ObjectId};
use crate::store::Store;
use crate::util::root_path;

impl Layout<'_> {
    /// Mirror the object's directories below the import root, without a box prefix.
    ///
    /// Objects sitting directly in the import root produce no chain.
    pub fn import_fs_containers(
        &self,
        obj: &MediaObject,
        ctx: &ImportContext,
        store: &mut dyn Store,
    ) -> Result<Vec<ObjectId>> {
        let dir = root_path(&ctx.root_path, &obj.location);
        if dir.is_empty() {
            return Ok(Vec::new());
        }

        let mut chain = Chain::new();
        let template = ContainerDescriptor::new("", upnp_class::CONTAINER);
        append_directories(&mut chain, &dir, &template, obj, ctx, self.config.options.parent_count);

        let mut submitter = Submitter::new(store);
        submitter.submit(&obj.snapshot(), &chain, None);
        Ok(submitter.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::store::MemoryStore;

    #[test]
    fn test_fs_containers() {
        let config = LayoutConfig::builtin().unwrap();
        let mut store = MemoryStore::new();
        let layout = Layout::new(&config);
        let ctx = ImportContext::new("/media");

        let nested = store.add_file(MediaObject::new("/media/Shows/S01/e01.mkv", "video/x-matroska"));
        let flat = store.add_file(MediaObject::new("/media/intro.mkv", "video/x-matroska"));

        assert_eq!(layout.import_fs_containers(&nested, &ctx, &mut store).unwrap().len(), 1);
        assert!(layout.import_fs_containers(&flat, &ctx, &mut store).unwrap().is_empty());

        let leaf = store.find_container(&["Shows", "S01"]).unwrap();
        assert_eq!(store.items_in(leaf.id).len(), 1);
        assert_eq!(store.container_count(), 2);
    }
}
