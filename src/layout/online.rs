use super::chains::prepare_chains;
use super::classify::aux;
use super::{ImportContext, Layout, Submitter};
use crate::config::keys;
use crate::error::Result;
use crate::model::meta::{M_DATE, M_GENRE, M_UPNP_DATE};
use crate::model::{upnp_class, ContainerDescriptor, MediaObject, ObjectId};
use crate::store::Store;

const TRAILER_BOXES: &[&str] = &[
    keys::TRAILER_ROOT,
    keys::TRAILER_APPLE,
    keys::TRAILER_ALL,
    keys::TRAILER_ALL_GENRES,
    keys::TRAILER_REL_DATE,
    keys::TRAILER_POST_DATE,
    keys::TRAILER_UNKNOWN,
];

const TRAILER_BASE: &[&str] = &[keys::TRAILER_ROOT, keys::TRAILER_APPLE];

/// `YYYY-MM` part of a date, when the date is long enough to have one
fn year_month(date: &str) -> Option<String> {
    (date.chars().count() >= 7).then(|| date.chars().take(7).collect())
}

fn month_container(period: &str) -> ContainerDescriptor {
    ContainerDescriptor::new(period, upnp_class::CONTAINER)
        .with_searchable(true)
        .with_meta(M_DATE, period)
        .with_meta(M_UPNP_DATE, period)
}

impl Layout<'_> {
    /// Online service items: all trailers, genres, release and post dates.
    pub fn import_online_item(
        &self,
        obj: &MediaObject,
        _ctx: &ImportContext,
        store: &mut dyn Store,
    ) -> Result<Vec<ObjectId>> {
        let boxes = prepare_chains(TRAILER_BOXES, &self.config.boxes, TRAILER_BASE)?;
        let mut item = obj.snapshot();
        item.sort_key.clear();
        let mut submitter = Submitter::new(store);

        let base = boxes.chain(TRAILER_BASE)?;
        submitter.submit(&item, &base.clone().then(boxes.get(keys::TRAILER_ALL)?.clone()), None);

        if boxes.enabled(keys::TRAILER_ALL_GENRES) {
            if let Some(genre) = obj.meta.get_non_empty(M_GENRE) {
                for genre in genre.split(", ").filter(|g| !g.is_empty()) {
                    let container = ContainerDescriptor::new(genre, upnp_class::MUSIC_GENRE)
                        .with_searchable(true)
                        .with_meta(M_GENRE, genre);
                    let chain = base
                        .clone()
                        .then(boxes.get(keys::TRAILER_ALL_GENRES)?.clone())
                        .then(container);
                    submitter.submit(&item, &chain, None);
                }
            }
        }

        if boxes.enabled(keys::TRAILER_REL_DATE) {
            if let Some(period) = obj.meta.get_non_empty(M_DATE).and_then(year_month) {
                let chain = base
                    .clone()
                    .then(boxes.get(keys::TRAILER_REL_DATE)?.clone())
                    .then(month_container(&period));
                submitter.submit(&item, &chain, None);
            }
        }

        if boxes.enabled(keys::TRAILER_POST_DATE) {
            if let Some(period) = obj.aux_value(aux::TRAILER_POST_DATE).and_then(year_month) {
                let chain = base
                    .then(boxes.get(keys::TRAILER_POST_DATE)?.clone())
                    .then(month_container(&period));
                submitter.submit(&item, &chain, None);
            }
        }

        Ok(submitter.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::model::ObjectType;
    use crate::store::MemoryStore;

    #[test]
    fn test_year_month() {
        assert_eq!(year_month("2024-03-15").as_deref(), Some("2024-03"));
        assert_eq!(year_month("2024"), None);
    }

    #[test]
    fn test_trailer_chains() {
        let config = LayoutConfig::builtin().unwrap();
        let mut store = MemoryStore::new();
        let mut trailer = MediaObject::new("http://trailers.example/dune.mov", "video/quicktime")
            .with_meta(M_GENRE, "Science Fiction, Thriller")
            .with_meta(M_DATE, "2024-03-01")
            .with_aux(aux::TRAILER_POST_DATE, "2023-12-20");
        trailer.object_type = ObjectType::ExternalUrl;
        trailer.sort_key = "dune".to_string();
        let obj = store.add_file(trailer);

        let ids = Layout::new(&config)
            .import(&obj, &ImportContext::default(), &mut store)
            .unwrap();

        assert_eq!(ids.len(), 5);
        let base = ["Online Services", "Apple Trailers"];
        for tail in [
            vec!["All Trailers"],
            vec!["Genres", "Science Fiction"],
            vec!["Genres", "Thriller"],
            vec!["Release Date", "2024-03"],
            vec!["Post Date", "2023-12"],
        ] {
            let path: Vec<&str> = base.iter().copied().chain(tail).collect();
            assert!(store.find_container(&path).is_some(), "missing {:?}", path);
        }

        let all = store
            .find_container(&["Online Services", "Apple Trailers", "All Trailers"])
            .unwrap();
        assert!(store.items_in(all.id)[0].object.sort_key.is_empty());
    }
}
