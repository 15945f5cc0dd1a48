use super::audio::AudioFacets;
use super::chains::{prepare_chains, ResolvedBoxes};
use super::classify::genres;
use super::{titled, ImportContext, Layout, Submitter};
use crate::config::{keys, BoxLayout};
use crate::error::{ConfigError, Result};
use crate::model::meta::M_DESCRIPTION;
use crate::model::{upnp_class, Chain, ContainerDescriptor, MediaObject, ObjectId};
use crate::store::Store;
use crate::util::{abcbox, initial};

const STRUCTURED_BOXES: &[&str] = &[
    keys::STRUCTURED_ALL_ALBUMS,
    keys::STRUCTURED_ALL_ARTISTS,
    keys::STRUCTURED_ALL_GENRES,
    keys::STRUCTURED_ALL_TRACKS,
    keys::STRUCTURED_ALL_YEARS,
];

const UNKNOWN_DATE: &str = "-Unknown-";
const ALL: &str = "-all-";
const ALL_ALL: &str = "--all--";

fn folder(title: impl Into<String>) -> ContainerDescriptor {
    ContainerDescriptor::new(title, upnp_class::CONTAINER)
}

fn initial_folder(value: &str) -> ContainerDescriptor {
    folder(initial(value).map(String::from).unwrap_or_default())
}

/// `1975` -> `1970 - 1979`
fn decade(year: &str) -> Option<String> {
    let prefix = year.get(..3)?;
    let tens: u32 = prefix.parse().ok()?;
    Some(format!("{}0 - {}", prefix, tens * 10 + 9))
}

/// Box root of one structured axis plus its alphabet bucket type
struct Axis {
    root: ContainerDescriptor,
    size: u32,
}

impl Axis {
    fn resolve(boxes: &ResolvedBoxes, key: &str, layout: &BoxLayout) -> Result<Self, ConfigError> {
        Ok(Self {
            root: boxes.get(key)?.clone(),
            size: layout.get(key)?.size,
        })
    }

    fn chain(&self) -> Chain {
        Chain::new().then(self.root.clone())
    }

    fn abc(&self, value: &str) -> ContainerDescriptor {
        folder(abcbox(value, self.size, '-'))
    }
}

impl Layout<'_> {
    /// Structured audio layout with alphabet buckets and decade folders.
    pub fn import_audio_structured(
        &self,
        obj: &MediaObject,
        _ctx: &ImportContext,
        store: &mut dyn Store,
    ) -> Result<Vec<ObjectId>> {
        let boxes = prepare_chains(STRUCTURED_BOXES, &self.config.boxes, STRUCTURED_BOXES)?;
        let layout = &self.config.boxes;
        let facets = AudioFacets::from_object(obj, genres(obj, self.config));
        let item = facets.annotate(obj);
        let mut submitter = Submitter::new(store);

        let title = facets.title.as_str();
        let artist = facets.artist.as_str();
        let album = facets.album.as_str();
        let genre = facets.genres[0].as_str();
        let date = facets.year.as_deref().unwrap_or(UNKNOWN_DATE);
        let decade = facets
            .year
            .as_deref()
            .and_then(decade)
            .unwrap_or_else(|| UNKNOWN_DATE.to_string());

        let various = obj
            .meta
            .get_non_empty(M_DESCRIPTION)
            .is_some_and(|d| d.eq_ignore_ascii_case("various"));
        let (album_artist, track_title) = if various {
            (format!("{album} - Various"), format!("{title} - {artist}"))
        } else {
            (format!("{album} - {artist}"), title.to_string())
        };

        let album_leaf = ContainerDescriptor::new(album_artist.as_str(), upnp_class::MUSIC_ALBUM);
        let artist_leaf = ContainerDescriptor::new(artist, upnp_class::MUSIC_ARTIST);
        let track = titled(&item, track_title.as_str());
        let with_album = titled(&item, format!("{title} ({album}, {date})"));
        let with_artist = titled(
            &item,
            format!("{} - {}", title, facets.artist_full.as_deref().unwrap_or(artist)),
        );
        let album_hint = Some(upnp_class::MUSIC_ALBUM);
        let artist_hint = Some(upnp_class::MUSIC_ARTIST);

        if boxes.enabled(keys::STRUCTURED_ALL_ALBUMS) {
            let axis = Axis::resolve(&boxes, keys::STRUCTURED_ALL_ALBUMS, layout)?;
            let chain = axis
                .chain()
                .then(axis.abc(album))
                .then(initial_folder(album))
                .then(album_leaf.clone());
            submitter.submit(&track, &chain, album_hint);

            let chain = axis
                .chain()
                .then(axis.abc(album))
                .then(folder(ALL))
                .then(album_leaf.clone());
            submitter.submit(&track, &chain, album_hint);

            let chain = axis.chain().then(folder(ALL_ALL)).then(album_leaf.clone());
            submitter.submit(&track, &chain, album_hint);
        }

        if boxes.enabled(keys::STRUCTURED_ALL_ARTISTS) {
            let axis = Axis::resolve(&boxes, keys::STRUCTURED_ALL_ARTISTS, layout)?;
            let chain = axis.chain().then(folder(ALL_ALL)).then(artist_leaf.clone());
            submitter.submit(&with_album, &chain, artist_hint);

            let chain = axis
                .chain()
                .then(axis.abc(artist))
                .then(folder(ALL))
                .then(artist_leaf.clone());
            submitter.submit(&with_album, &chain, artist_hint);

            let by_initial = axis
                .chain()
                .then(axis.abc(artist))
                .then(initial_folder(artist))
                .then(artist_leaf.clone());
            submitter.submit(&with_album, &by_initial.clone().then(folder(ALL)), artist_hint);

            let album_by_date = ContainerDescriptor::new(format!("{album} ({date})"), upnp_class::MUSIC_ALBUM);
            submitter.submit(&track, &by_initial.then(album_by_date), album_hint);
        }

        if boxes.enabled(keys::STRUCTURED_ALL_GENRES) {
            let axis = Axis::resolve(&boxes, keys::STRUCTURED_ALL_GENRES, layout)?;
            let genre_folder = ContainerDescriptor::new(genre, upnp_class::MUSIC_GENRE);

            let chain = axis.chain().then(genre_folder.clone()).then(folder(ALL_ALL));
            submitter.submit(&with_artist, &chain, Some(upnp_class::MUSIC_GENRE));

            let chain = axis
                .chain()
                .then(genre_folder)
                .then(axis.abc(artist))
                .then(initial_folder(artist))
                .then(album_leaf.clone());
            submitter.submit(&with_artist, &chain, album_hint);
        }

        if boxes.enabled(keys::STRUCTURED_ALL_TRACKS) {
            let axis = Axis::resolve(&boxes, keys::STRUCTURED_ALL_TRACKS, layout)?;
            let chain = axis.chain().then(axis.abc(title)).then(initial_folder(title));
            let full = titled(&item, format!("{title} - {artist} ({album}, {date})"));
            submitter.submit(&full, &chain, artist_hint);

            submitter.submit(&with_artist, &axis.chain().then(folder(ALL_ALL)), None);
        }

        if boxes.enabled(keys::STRUCTURED_ALL_YEARS) {
            let axis = Axis::resolve(&boxes, keys::STRUCTURED_ALL_YEARS, layout)?;
            let by_decade = axis.chain().then(folder(decade.as_str()));
            submitter.submit(&with_artist, &by_decade.clone().then(folder(ALL)), None);

            let by_year = by_decade.then(folder(date));
            submitter.submit(&with_artist, &by_year.clone().then(folder(ALL)), artist_hint);

            let chain = by_year
                .then(artist_leaf)
                .then(ContainerDescriptor::new(album, upnp_class::MUSIC_ALBUM));
            submitter.submit(&track, &chain, album_hint);
        }

        Ok(submitter.finish())
    }
}
