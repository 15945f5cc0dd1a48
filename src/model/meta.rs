use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const M_TITLE: &str = "dc:title";
pub const M_ARTIST: &str = "upnp:artist";
pub const M_ALBUM: &str = "upnp:album";
pub const M_ALBUMARTIST: &str = "upnp:albumArtist";
pub const M_DATE: &str = "dc:date";
pub const M_UPNP_DATE: &str = "upnp:date";
pub const M_GENRE: &str = "upnp:genre";
pub const M_DESCRIPTION: &str = "dc:description";
pub const M_COMPOSER: &str = "upnp:composer";
pub const M_TRACKNUMBER: &str = "upnp:originalTrackNumber";
pub const M_PARTNUMBER: &str = "upnp:episodeSeason";
pub const M_DIRECTOR: &str = "upnp:director";
pub const M_ACTOR: &str = "upnp:actor";
pub const M_REGION: &str = "upnp:region";
pub const M_RATING: &str = "upnp:rating";
pub const M_PUBLISHER: &str = "dc:publisher";
pub const M_EPISODE: &str = "upnp:episodeNumber";
pub const M_SERIES_TITLE: &str = "upnp:seriesTitle";
pub const M_CONTENT_CLASS: &str = "upnp:contentClass";

/// UPnP object classes used for items and containers
pub mod upnp_class {
    pub const CONTAINER: &str = "object.container";
    pub const MUSIC_ALBUM: &str = "object.container.album.musicAlbum";
    pub const PHOTO_ALBUM: &str = "object.container.album.photoAlbum";
    pub const MUSIC_ARTIST: &str = "object.container.person.musicArtist";
    pub const MUSIC_COMPOSER: &str = "object.container.person.musicComposer";
    pub const MUSIC_GENRE: &str = "object.container.genre.musicGenre";
    pub const PLAYLIST_CONTAINER: &str = "object.container.playlistContainer";

    pub const ITEM: &str = "object.item";
    pub const AUDIO_ITEM: &str = "object.item.audioItem";
    pub const MUSIC_TRACK: &str = "object.item.audioItem.musicTrack";
    pub const VIDEO_ITEM: &str = "object.item.videoItem";
    pub const MOVIE: &str = "object.item.videoItem.movie";
    pub const IMAGE_ITEM: &str = "object.item.imageItem";
}

/// Multi-valued metadata map (`dc:title`, `upnp:genre`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData(BTreeMap<String, Vec<String>>);

impl MetaData {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// First non-empty value stored under `key`
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// All values stored under `key`
    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace all values of `key` with a single value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), vec![value.into()]);
    }

    /// Append a value to `key`
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Overlay `other` onto this map. Keys missing from `other` are kept.
    pub fn merge(&mut self, other: &MetaData) {
        for (key, values) in other.iter() {
            self.0.insert(key.clone(), values.clone());
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MetaData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = MetaData::new();
        for (key, value) in iter {
            meta.add(key, value);
        }
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_and_add_appends() {
        let mut meta = MetaData::new();
        meta.add(M_GENRE, "Rock");
        meta.add(M_GENRE, "Pop");
        assert_eq!(meta.get_all(M_GENRE), ["Rock", "Pop"]);
        assert_eq!(meta.get(M_GENRE), Some("Rock"));

        meta.set(M_GENRE, "Jazz");
        assert_eq!(meta.get_all(M_GENRE), ["Jazz"]);
    }

    #[test]
    fn test_merge_keeps_absent_keys() {
        let mut meta: MetaData = [(M_CONTENT_CLASS, "music"), (M_ARTIST, "Old")]
            .into_iter()
            .collect();
        let update: MetaData = [(M_ARTIST, "New")].into_iter().collect();

        meta.merge(&update);

        assert_eq!(meta.get(M_CONTENT_CLASS), Some("music"));
        assert_eq!(meta.get(M_ARTIST), Some("New"));
    }

    #[test]
    fn test_get_non_empty() {
        let mut meta = MetaData::new();
        meta.set(M_ALBUM, "");
        assert_eq!(meta.get(M_ALBUM), Some(""));
        assert_eq!(meta.get_non_empty(M_ALBUM), None);
        assert_eq!(meta.get_all(M_DATE).len(), 0);
    }
}
