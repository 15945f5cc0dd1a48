use super::chains::{append_directories, prepare_chains, with_resources};
use super::classify::{directory_segments, genres};
use super::{titled, ImportContext, Layout, Submitter};
use crate::config::keys;
use crate::error::Result;
use crate::model::meta::{
    M_ALBUM, M_ARTIST, M_COMPOSER, M_DATE, M_DESCRIPTION, M_GENRE, M_UPNP_DATE,
};
use crate::model::{upnp_class, ContainerDescriptor, MediaObject, ObjectId};
use crate::store::Store;
use crate::util::get_year;

const UNKNOWN: &str = "Unknown";
const NO_COMPOSER: &str = "None";

const AUDIO_BOXES: &[&str] = &[
    keys::AUDIO_ROOT,
    keys::AUDIO_ALL,
    keys::AUDIO_ALL_ARTISTS,
    keys::AUDIO_ALL_GENRES,
    keys::AUDIO_ALL_ALBUMS,
    keys::AUDIO_ALL_YEARS,
    keys::AUDIO_ALL_COMPOSERS,
    keys::AUDIO_ALL_SONGS,
    keys::AUDIO_ALL_TRACKS,
    keys::AUDIO_ARTIST_CHRONOLOGY,
    keys::AUDIO_ALL_DIRECTORIES,
];

/// Facets of an audio track
#[derive(Debug, Clone)]
pub(super) struct AudioFacets {
    pub title: String,
    pub artist: String,
    pub artist_full: Option<String>,
    pub album: String,
    pub album_full: Option<String>,
    /// Year, or `None` when the track carries no date
    pub year: Option<String>,
    pub genres: Vec<String>,
    pub composer: String,
    /// `artist, album, title, year, genre` with absent parts left out
    pub description: String,
}

impl AudioFacets {
    pub fn from_object(obj: &MediaObject, genres: Vec<String>) -> Self {
        let title = obj.meta_title().to_string();
        let artist_full = obj.meta.get_non_empty(M_ARTIST).map(str::to_string);
        let album_full = obj.meta.get_non_empty(M_ALBUM).map(str::to_string);
        let year = obj.meta.get_non_empty(M_DATE).map(get_year);
        let raw_genre = obj.meta.get_non_empty(M_GENRE);

        let mut parts: Vec<&str> = Vec::new();
        parts.extend(artist_full.as_deref());
        parts.extend(album_full.as_deref());
        parts.push(&title);
        parts.extend(year.as_deref());
        parts.extend(raw_genre);
        let description = parts.join(", ");

        Self {
            artist: artist_full.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            album: album_full.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            composer: obj
                .meta
                .get_non_empty(M_COMPOSER)
                .unwrap_or(NO_COMPOSER)
                .to_string(),
            genres: if genres.is_empty() {
                vec![UNKNOWN.to_string()]
            } else {
                genres
            },
            title,
            artist_full,
            album_full,
            year,
            description,
        }
    }

    /// `artist - album - title`, leaving out what is unknown
    pub fn full_name(&self) -> String {
        let mut name = self.artist_full.clone().unwrap_or_default();
        match &self.album_full {
            Some(album) => {
                name.push_str(" - ");
                name.push_str(album);
                name.push_str(" - ");
            }
            None => name.push_str(" - "),
        }
        name.push_str(&self.title);
        name
    }

    /// Copy of `obj` with the derived date and description filled in
    pub fn annotate(&self, obj: &MediaObject) -> MediaObject {
        let mut item = obj.snapshot();
        if let Some(year) = &self.year {
            item.meta.set(M_UPNP_DATE, year.as_str());
        }
        if item.meta.get_non_empty(M_DESCRIPTION).is_none() {
            item.meta.set(M_DESCRIPTION, self.description.as_str());
        }
        item
    }
}

impl Layout<'_> {
    /// Default audio layout: artists, albums, genres, years, composers and directories.
    pub fn import_audio(&self, obj: &MediaObject, ctx: &ImportContext, store: &mut dyn Store) -> Result<Vec<ObjectId>> {
        let boxes = prepare_chains(AUDIO_BOXES, &self.config.boxes, &[keys::AUDIO_ROOT, keys::AUDIO_ALL])?;
        let facets = AudioFacets::from_object(obj, genres(obj, self.config));
        let item = facets.annotate(obj);
        let year = facets.year.as_deref().unwrap_or(UNKNOWN);
        let mut submitter = Submitter::new(store);

        let artist = ContainerDescriptor::new(facets.artist.as_str(), upnp_class::MUSIC_ARTIST)
            .with_searchable(true)
            .with_meta(M_ARTIST, facets.artist.as_str());
        let album_class = ctx
            .container_class
            .as_deref()
            .unwrap_or(upnp_class::MUSIC_ALBUM);
        let mut album = ContainerDescriptor::new(facets.album.as_str(), album_class)
            .with_searchable(true)
            .with_meta(M_ALBUM, facets.album.as_str())
            .with_meta(M_ARTIST, facets.artist.as_str());
        if let Some(year) = &facets.year {
            album.meta.set(M_UPNP_DATE, year.as_str());
        }
        let album = with_resources(album, obj, ctx);

        let artists_enabled = boxes.enabled(keys::AUDIO_ALL_ARTISTS);
        let title = titled(&item, facets.title.as_str());
        let full_name = titled(&item, facets.full_name());

        submitter.submit(&title, &boxes.chain(&[keys::AUDIO_ROOT, keys::AUDIO_ALL])?, None);

        if boxes.all_enabled(&[keys::AUDIO_ALL_ARTISTS, keys::AUDIO_ALL_SONGS]) {
            let chain = boxes
                .chain(&[keys::AUDIO_ROOT, keys::AUDIO_ALL_ARTISTS])?
                .then(artist.clone())
                .then(boxes.get(keys::AUDIO_ALL_SONGS)?.clone());
            submitter.submit(&title, &chain, None);
        }

        if boxes.enabled(keys::AUDIO_ALL_TRACKS) {
            submitter.submit(&full_name, &boxes.chain(&[keys::AUDIO_ROOT, keys::AUDIO_ALL_TRACKS])?, None);

            if artists_enabled {
                let chain = boxes
                    .chain(&[keys::AUDIO_ROOT, keys::AUDIO_ALL_ARTISTS])?
                    .then(artist.clone())
                    .then(boxes.get(keys::AUDIO_ALL_TRACKS)?.clone());
                submitter.submit(&full_name, &chain, None);
            }
        }

        if artists_enabled {
            let chain = boxes
                .chain(&[keys::AUDIO_ROOT, keys::AUDIO_ALL_ARTISTS])?
                .then(artist.clone())
                .then(album.clone());
            submitter.submit(&title, &chain, Some(album_class));
        }

        if boxes.enabled(keys::AUDIO_ALL_ALBUMS) {
            let chain = boxes
                .chain(&[keys::AUDIO_ROOT, keys::AUDIO_ALL_ALBUMS])?
                .then(album.clone());
            submitter.submit(&title, &chain, Some(album_class));
        }

        if boxes.enabled(keys::AUDIO_ALL_GENRES) {
            for genre in &facets.genres {
                let container = ContainerDescriptor::new(genre.as_str(), upnp_class::MUSIC_GENRE)
                    .with_searchable(true)
                    .with_meta(M_GENRE, genre.as_str());
                let chain = boxes
                    .chain(&[keys::AUDIO_ROOT, keys::AUDIO_ALL_GENRES])?
                    .then(container);
                submitter.submit(&title, &chain, Some(upnp_class::MUSIC_GENRE));
            }
        }

        if boxes.enabled(keys::AUDIO_ALL_COMPOSERS) {
            let container = ContainerDescriptor::new(facets.composer.as_str(), upnp_class::MUSIC_COMPOSER)
                .with_searchable(true)
                .with_meta(M_COMPOSER, facets.composer.as_str());
            let chain = boxes
                .chain(&[keys::AUDIO_ROOT, keys::AUDIO_ALL_COMPOSERS])?
                .then(container);
            submitter.submit(&title, &chain, Some(upnp_class::MUSIC_COMPOSER));
        }

        if boxes.enabled(keys::AUDIO_ALL_YEARS) {
            let container = ContainerDescriptor::new(year, upnp_class::CONTAINER)
                .with_searchable(true)
                .with_meta(M_UPNP_DATE, year);
            let chain = boxes
                .chain(&[keys::AUDIO_ROOT, keys::AUDIO_ALL_YEARS])?
                .then(container);
            submitter.submit(&title, &chain, None);
        }

        let dir = directory_segments(obj, ctx, self.config);
        if boxes.enabled(keys::AUDIO_ALL_DIRECTORIES) && !dir.is_empty() {
            let mut chain = boxes.chain(&[keys::AUDIO_ROOT, keys::AUDIO_ALL_DIRECTORIES])?;
            let template = ContainerDescriptor::new("", upnp_class::CONTAINER);
            append_directories(&mut chain, &dir, &template, obj, ctx, self.config.options.parent_count);
            submitter.submit(&title, &chain, None);
        }

        if artists_enabled && boxes.enabled(keys::AUDIO_ARTIST_CHRONOLOGY) {
            let period = ContainerDescriptor::new(format!("{} - {}", year, facets.album), album_class);
            let chain = boxes
                .chain(&[keys::AUDIO_ROOT, keys::AUDIO_ALL_ARTISTS])?
                .then(artist)
                .then(boxes.get(keys::AUDIO_ARTIST_CHRONOLOGY)?.clone())
                .then(period);
            submitter.submit(&title, &chain, None);
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

    fn track() -> MediaObject {
        MediaObject::new("/music/Queen/Opera/song.mp3", "audio/mpeg")
            .with_meta(M_TITLE, "Bohemian Rhapsody")
            .with_meta(M_ARTIST, "Queen")
            .with_meta(M_ALBUM, "A Night at the Opera")
            .with_meta(M_DATE, "1975-10-31")
            .with_meta(M_GENRE, "Rock")
    }

    #[test]
    fn test_facets_and_description() {
        let obj = track();
        let facets = AudioFacets::from_object(&obj, vec!["Rock".to_string()]);

        assert_eq!(facets.year.as_deref(), Some("1975"));
        assert_eq!(facets.full_name(), "Queen - A Night at the Opera - Bohemian Rhapsody");
        assert_eq!(
            facets.description,
            "Queen, A Night at the Opera, Bohemian Rhapsody, 1975, Rock"
        );

        let item = facets.annotate(&obj);
        assert_eq!(item.meta.get(M_UPNP_DATE), Some("1975"));
        assert_eq!(item.meta.get(M_DESCRIPTION), Some(facets.description.as_str()));
    }

    #[test]
    fn test_missing_tags_use_placeholders() {
        let obj = MediaObject::new("/music/untitled.mp3", "audio/mpeg");
        let facets = AudioFacets::from_object(&obj, Vec::new());

        assert_eq!(facets.artist, "Unknown");
        assert_eq!(facets.album, "Unknown");
        assert_eq!(facets.genres, vec!["Unknown"]);
        assert_eq!(facets.composer, "None");
        assert_eq!(facets.full_name(), " - untitled.mp3");
        assert_eq!(facets.description, "untitled.mp3");
    }

    #[test]
    fn test_audio_chains() {
        let config = LayoutConfig::builtin().unwrap();
        let mut store = MemoryStore::new();
        let obj = store.add_file(track());
        let ctx = ImportContext::new("/music");

        let ids = Layout::new(&config).import_audio(&obj, &ctx, &mut store).unwrap();
        assert_eq!(ids.len(), 11);

        for path in [
            vec!["Audio", "All Audio"],
            vec!["Audio", "Artists", "Queen", "All Songs"],
            vec!["Audio", "All - full name"],
            vec!["Audio", "Artists", "Queen", "A Night at the Opera"],
            vec!["Audio", "Albums", "A Night at the Opera"],
            vec!["Audio", "Genres", "Rock"],
            vec!["Audio", "Composers", "None"],
            vec!["Audio", "Year", "1975"],
            vec!["Audio", "Directories", "Queen", "Opera"],
            vec!["Audio", "Artists", "Queen", "Album Chronology", "1975 - A Night at the Opera"],
        ] {
            assert!(store.find_container(&path).is_some(), "missing {:?}", path);
        }

        let tracks = store.find_container(&["Audio", "All - full name"]).unwrap();
        let items = store.items_in(tracks.id);
        assert_eq!(items[0].object.title, "Queen - A Night at the Opera - Bohemian Rhapsody");
        assert_eq!(items[0].object.ref_id, obj.id);

        let album = store
            .find_container(&["Audio", "Albums", "A Night at the Opera"])
            .unwrap();
        assert_eq!(album.descriptor.upnp_class, upnp_class::MUSIC_ALBUM);
        assert_eq!(album.descriptor.ref_id, obj.id);
    }

    #[test]
    fn test_disabled_axis_is_skipped() {
        let config = LayoutConfig::builtin()
            .unwrap()
            .with_box(BoxEntry::new(keys::AUDIO_ALL_COMPOSERS, "Composers", upnp_class::CONTAINER).disabled());
        let mut store = MemoryStore::new();
        let obj = store.add_file(track());

        let ids = Layout::new(&config)
            .import_audio(&obj, &ImportContext::new("/music"), &mut store)
            .unwrap();

        assert_eq!(ids.len(), 10);
        assert!(store.find_container(&["Audio", "Composers"]).is_none());
    }

    #[test]
    fn test_reimport_reuses_containers() {
        let config = LayoutConfig::builtin().unwrap();
        let mut store = MemoryStore::new();
        let obj = store.add_file(track());
        let layout = Layout::new(&config);
        let ctx = ImportContext::new("/music");

        layout.import_audio(&obj, &ctx, &mut store).unwrap();
        let containers = store.container_count();
        let again = layout.import_audio(&obj, &ctx, &mut store).unwrap();

        assert!(again.is_empty());
        assert_eq!(store.container_count(), containers);
    }
}
