//! Box layout: the user-editable table of named container slots

use crate::error::ConfigError;
use crate::model::{upnp_class, ContainerDescriptor, ObjectId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known box identifiers
pub mod keys {
    pub const AUDIO_ROOT: &str = "Audio/audioRoot";
    pub const AUDIO_ALL: &str = "Audio/allAudio";
    pub const AUDIO_ALL_ARTISTS: &str = "Audio/allArtists";
    pub const AUDIO_ALL_GENRES: &str = "Audio/allGenres";
    pub const AUDIO_ALL_ALBUMS: &str = "Audio/allAlbums";
    pub const AUDIO_ALL_YEARS: &str = "Audio/allYears";
    pub const AUDIO_ALL_COMPOSERS: &str = "Audio/allComposers";
    pub const AUDIO_ALL_SONGS: &str = "Audio/allSongs";
    pub const AUDIO_ALL_TRACKS: &str = "Audio/allTracks";
    pub const AUDIO_ARTIST_CHRONOLOGY: &str = "Audio/artistChronology";
    pub const AUDIO_ALL_DIRECTORIES: &str = "Audio/allDirectories";

    pub const STRUCTURED_ALL_ALBUMS: &str = "AudioStructured/allAlbums";
    pub const STRUCTURED_ALL_ARTISTS: &str = "AudioStructured/allArtists";
    pub const STRUCTURED_ALL_GENRES: &str = "AudioStructured/allGenres";
    pub const STRUCTURED_ALL_TRACKS: &str = "AudioStructured/allTracks";
    pub const STRUCTURED_ALL_YEARS: &str = "AudioStructured/allYears";

    pub const VIDEO_ROOT: &str = "Video/videoRoot";
    pub const VIDEO_ALL: &str = "Video/allVideo";
    pub const VIDEO_ALL_YEARS: &str = "Video/allYears";
    pub const VIDEO_ALL_DATES: &str = "Video/allDates";
    pub const VIDEO_ALL_DIRECTORIES: &str = "Video/allDirectories";
    pub const VIDEO_UNKNOWN: &str = "Video/unknown";

    pub const IMAGE_ROOT: &str = "Image/imageRoot";
    pub const IMAGE_ALL: &str = "Image/allImages";
    pub const IMAGE_ALL_YEARS: &str = "Image/allYears";
    pub const IMAGE_ALL_DATES: &str = "Image/allDates";
    pub const IMAGE_ALL_DIRECTORIES: &str = "Image/allDirectories";
    pub const IMAGE_UNKNOWN: &str = "Image/unknown";

    pub const IMAGE_DETAIL_ALL_MODELS: &str = "ImageDetail/allModels";
    pub const IMAGE_DETAIL_YEAR_MONTH: &str = "ImageDetail/yearMonth";
    pub const IMAGE_DETAIL_YEAR_DATE: &str = "ImageDetail/yearDate";

    pub const TOPIC_ROOT: &str = "Topic/topicRoot";
    pub const TOPIC: &str = "Topic/topic";
    pub const TOPIC_EXTRA: &str = "Topic/topicExtra";

    pub const TRAILER_ROOT: &str = "Trailer/trailerRoot";
    pub const TRAILER_APPLE: &str = "Trailer/trailerApple";
    pub const TRAILER_ALL: &str = "Trailer/allTrailers";
    pub const TRAILER_ALL_GENRES: &str = "Trailer/allGenres";
    pub const TRAILER_REL_DATE: &str = "Trailer/relDate";
    pub const TRAILER_POST_DATE: &str = "Trailer/postDate";
    pub const TRAILER_UNKNOWN: &str = "Trailer/unknown";

    pub const PLAYLIST_ROOT: &str = "Playlist/playlistRoot";
    pub const PLAYLIST_ALL: &str = "Playlist/allPlaylists";
    pub const PLAYLIST_ALL_DIRECTORIES: &str = "Playlist/allDirectories";
}

/// Boxes that always stay enabled
const ROOT_KEYS: &[&str] = &[
    keys::AUDIO_ROOT,
    keys::AUDIO_ALL,
    keys::IMAGE_ROOT,
    keys::IMAGE_ALL,
    keys::VIDEO_ROOT,
    keys::VIDEO_ALL,
];

/// One configured container slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxEntry {
    pub key: String,
    pub title: String,
    pub class: String,
    pub enabled: bool,
    pub searchable: bool,

    /// Stable container id, if the deployment pins one
    pub id: Option<ObjectId>,

    pub upnp_shortcut: Option<String>,
    pub sort_key: Option<String>,

    /// Layout-specific size parameter (alphabet box type for the structured layout)
    pub size: u32,
}

impl BoxEntry {
    pub fn new(key: &str, title: &str, class: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            class: class.to_string(),
            enabled: true,
            searchable: false,
            id: None,
            upnp_shortcut: None,
            sort_key: None,
            size: 1,
        }
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Container descriptor for this box, with empty metadata
    pub fn descriptor(&self) -> ContainerDescriptor {
        ContainerDescriptor {
            id: self.id,
            title: self.title.clone(),
            upnp_class: self.class.clone(),
            searchable: self.searchable,
            upnp_shortcut: self.upnp_shortcut.clone(),
            sort_key: self.sort_key.clone(),
            ..Default::default()
        }
    }
}

/// A `[[boxes]]` table as written in the configuration file.
///
/// Every field except `key` is optional and falls back to the built-in entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxConfig {
    pub key: String,
    pub title: Option<String>,
    pub class: Option<String>,
    pub enabled: Option<bool>,
    pub searchable: Option<bool>,
    pub id: Option<u32>,
    pub upnp_shortcut: Option<String>,
    pub sort_key: Option<String>,
    pub size: Option<u32>,
}

impl BoxConfig {
    fn into_entry(self, default: Option<&BoxEntry>) -> BoxEntry {
        let mut entry = default
            .cloned()
            .unwrap_or_else(|| BoxEntry::new(&self.key, &self.key, upnp_class::CONTAINER));

        if let Some(title) = self.title {
            entry.title = title;
        }
        if let Some(class) = self.class {
            entry.class = class;
        }
        if let Some(enabled) = self.enabled {
            entry.enabled = enabled;
        }
        if let Some(searchable) = self.searchable {
            entry.searchable = searchable;
        }
        if let Some(id) = self.id {
            entry.id = Some(ObjectId(id));
        }
        if self.upnp_shortcut.is_some() {
            entry.upnp_shortcut = self.upnp_shortcut;
        }
        if self.sort_key.is_some() {
            entry.sort_key = self.sort_key;
        }
        if let Some(size) = self.size {
            entry.size = size;
        }
        entry
    }
}

/// All configured boxes, keyed by box identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxLayout {
    entries: BTreeMap<String, BoxEntry>,
}

impl BoxLayout {
    /// The built-in layout
    pub fn defaults() -> Self {
        let mut layout = Self {
            entries: BTreeMap::new(),
        };
        for entry in default_entries() {
            layout.entries.insert(entry.key.clone(), entry);
        }
        layout
    }

    /// Build the layout from configured boxes, filling gaps from the built-in table
    pub fn from_config(configured: Vec<BoxConfig>) -> Self {
        let defaults = Self::defaults();
        let mut layout = Self {
            entries: BTreeMap::new(),
        };

        for config in configured {
            let default = defaults.entries.get(&config.key);
            let entry = config.into_entry(default);
            log::debug!(
                "Configured box key={}, title={}, class={}, enabled={}, size={}",
                entry.key,
                entry.title,
                entry.class,
                entry.enabled,
                entry.size
            );
            layout.insert(entry);
        }

        for (key, entry) in defaults.entries {
            if !layout.entries.contains_key(&key) {
                log::info!(
                    "Automatically added default box key={}, title={}, class={}, enabled={}",
                    entry.key,
                    entry.title,
                    entry.class,
                    entry.enabled
                );
                layout.entries.insert(key, entry);
            }
        }

        layout
    }

    /// Add or replace a box, enforcing the root and searchability rules
    pub fn insert(&mut self, mut entry: BoxEntry) {
        if !entry.enabled && ROOT_KEYS.contains(&entry.key.as_str()) {
            log::warn!("Box '{}' cannot be disabled", entry.key);
            entry.enabled = true;
        }
        if !entry.enabled {
            entry.searchable = false;
        }
        self.entries.insert(entry.key.clone(), entry);
    }

    /// Look up a box, failing if the layout does not define it
    pub fn get(&self, key: &str) -> Result<&BoxEntry, ConfigError> {
        self.entries
            .get(key)
            .ok_or_else(|| ConfigError::MissingBox(key.to_string()))
    }

    /// Whether a box exists and is enabled
    pub fn is_enabled(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|e| e.enabled)
    }

    pub fn remove(&mut self, key: &str) -> Option<BoxEntry> {
        self.entries.remove(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &BoxEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BoxLayout {
    fn default() -> Self {
        Self::defaults()
    }
}

fn default_entries() -> Vec<BoxEntry> {
    use keys::*;
    use upnp_class::*;

    vec![
        BoxEntry::new(AUDIO_ROOT, "Audio", CONTAINER),
        BoxEntry::new(AUDIO_ALL, "All Audio", CONTAINER),
        BoxEntry::new(AUDIO_ALL_ARTISTS, "Artists", CONTAINER),
        BoxEntry::new(AUDIO_ALL_GENRES, "Genres", CONTAINER),
        BoxEntry::new(AUDIO_ALL_ALBUMS, "Albums", CONTAINER),
        BoxEntry::new(AUDIO_ALL_YEARS, "Year", CONTAINER),
        BoxEntry::new(AUDIO_ALL_COMPOSERS, "Composers", CONTAINER),
        BoxEntry::new(AUDIO_ALL_SONGS, "All Songs", CONTAINER),
        BoxEntry::new(AUDIO_ALL_TRACKS, "All - full name", CONTAINER),
        BoxEntry::new(AUDIO_ARTIST_CHRONOLOGY, "Album Chronology", CONTAINER),
        BoxEntry::new(AUDIO_ALL_DIRECTORIES, "Directories", CONTAINER),
        BoxEntry::new(STRUCTURED_ALL_ALBUMS, "-Album-", CONTAINER).with_size(6),
        BoxEntry::new(STRUCTURED_ALL_ARTISTS, "-Artist-", CONTAINER).with_size(9),
        BoxEntry::new(STRUCTURED_ALL_GENRES, "-Genre-", CONTAINER).with_size(6),
        BoxEntry::new(STRUCTURED_ALL_TRACKS, "-Track-", CONTAINER).with_size(6),
        BoxEntry::new(STRUCTURED_ALL_YEARS, "-Year-", CONTAINER),
        BoxEntry::new(VIDEO_ROOT, "Video", CONTAINER),
        BoxEntry::new(VIDEO_ALL, "All Video", CONTAINER),
        BoxEntry::new(VIDEO_ALL_YEARS, "Year", CONTAINER),
        BoxEntry::new(VIDEO_ALL_DATES, "Date", CONTAINER),
        BoxEntry::new(VIDEO_ALL_DIRECTORIES, "Directories", CONTAINER),
        BoxEntry::new(VIDEO_UNKNOWN, "Unknown", CONTAINER),
        BoxEntry::new(IMAGE_ROOT, "Photos", CONTAINER),
        BoxEntry::new(IMAGE_ALL, "All Photos", CONTAINER),
        BoxEntry::new(IMAGE_ALL_YEARS, "Year", CONTAINER),
        BoxEntry::new(IMAGE_ALL_DATES, "Date", CONTAINER),
        BoxEntry::new(IMAGE_ALL_DIRECTORIES, "Directories", CONTAINER),
        BoxEntry::new(IMAGE_UNKNOWN, "Unknown", CONTAINER),
        BoxEntry::new(IMAGE_DETAIL_ALL_MODELS, "Model", PHOTO_ALBUM),
        BoxEntry::new(IMAGE_DETAIL_YEAR_MONTH, "Year+Month", PHOTO_ALBUM),
        BoxEntry::new(IMAGE_DETAIL_YEAR_DATE, "Year+Date", PHOTO_ALBUM),
        BoxEntry::new(TOPIC_ROOT, "Topics", CONTAINER),
        BoxEntry::new(TOPIC, "Topic", PHOTO_ALBUM),
        BoxEntry::new(TOPIC_EXTRA, "Selection", PHOTO_ALBUM),
        BoxEntry::new(TRAILER_ROOT, "Online Services", CONTAINER),
        BoxEntry::new(TRAILER_APPLE, "Apple Trailers", CONTAINER),
        BoxEntry::new(TRAILER_ALL, "All Trailers", CONTAINER),
        BoxEntry::new(TRAILER_ALL_GENRES, "Genres", CONTAINER),
        BoxEntry::new(TRAILER_REL_DATE, "Release Date", CONTAINER),
        BoxEntry::new(TRAILER_POST_DATE, "Post Date", CONTAINER),
        BoxEntry::new(TRAILER_UNKNOWN, "Unknown", CONTAINER),
        BoxEntry::new(PLAYLIST_ROOT, "Playlists", CONTAINER),
        BoxEntry::new(PLAYLIST_ALL, "All Playlists", CONTAINER),
        BoxEntry::new(PLAYLIST_ALL_DIRECTORIES, "Directories", CONTAINER),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_all_keys() {
        let layout = BoxLayout::defaults();
        assert_eq!(layout.get(keys::AUDIO_ROOT).unwrap().title, "Audio");
        assert_eq!(layout.get(keys::IMAGE_ALL).unwrap().title, "All Photos");
        assert_eq!(layout.get(keys::STRUCTURED_ALL_ARTISTS).unwrap().size, 9);
        assert!(layout.is_enabled(keys::PLAYLIST_ALL_DIRECTORIES));
    }

    #[test]
    fn test_missing_box_is_error() {
        let mut layout = BoxLayout::defaults();
        layout.remove(keys::AUDIO_ALL_GENRES);
        assert!(matches!(
            layout.get(keys::AUDIO_ALL_GENRES),
            Err(ConfigError::MissingBox(key)) if key == keys::AUDIO_ALL_GENRES
        ));
        assert!(!layout.is_enabled(keys::AUDIO_ALL_GENRES));
    }

    #[test]
    fn test_root_boxes_cannot_be_disabled() {
        let layout = BoxLayout::from_config(vec![BoxConfig {
            key: keys::AUDIO_ROOT.to_string(),
            enabled: Some(false),
            ..Default::default()
        }]);
        assert!(layout.is_enabled(keys::AUDIO_ROOT));
    }

    #[test]
    fn test_disabled_box_is_not_searchable() {
        let layout = BoxLayout::from_config(vec![BoxConfig {
            key: keys::AUDIO_ALL_ARTISTS.to_string(),
            enabled: Some(false),
            searchable: Some(true),
            ..Default::default()
        }]);
        let entry = layout.get(keys::AUDIO_ALL_ARTISTS).unwrap();
        assert!(!entry.enabled);
        assert!(!entry.searchable);
    }

    #[test]
    fn test_configured_box_overrides_title_only() {
        let layout = BoxLayout::from_config(vec![BoxConfig {
            key: keys::IMAGE_DETAIL_YEAR_MONTH.to_string(),
            title: Some("By Month".to_string()),
            ..Default::default()
        }]);
        let entry = layout.get(keys::IMAGE_DETAIL_YEAR_MONTH).unwrap();
        assert_eq!(entry.title, "By Month");
        assert_eq!(entry.class, upnp_class::PHOTO_ALBUM);
        assert_eq!(layout.len(), BoxLayout::defaults().len());
    }

    #[test]
    fn test_custom_box_gets_container_defaults() {
        let layout = BoxLayout::from_config(vec![BoxConfig {
            key: "Custom/box".to_string(),
            ..Default::default()
        }]);
        let entry = layout.get("Custom/box").unwrap();
        assert_eq!(entry.title, "Custom/box");
        assert_eq!(entry.class, upnp_class::CONTAINER);
        assert!(entry.enabled);
    }
}
