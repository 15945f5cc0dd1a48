//! Playlist entry parsers
//!
//! m3u, pls and asx files are decoded into ordered [`PlaylistEntry`] lists.
//! Turning entries into items and chains is done by the playlist layout.

mod asx;
mod m3u;
mod pls;

pub use asx::parse_asx;
pub use m3u::parse_m3u;
pub use pls::parse_pls;

use crate::error::PlaylistError;
use std::collections::BTreeMap;

/// Playlist file format, detected from the mimetype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistType {
    M3u,
    Pls,
    Asx,
}

impl PlaylistType {
    pub fn from_mimetype(mimetype: &str) -> Option<Self> {
        match mimetype {
            "audio/x-mpegurl" | "audio/mpegurl" | "application/vnd.apple.mpegurl" => Some(Self::M3u),
            "audio/x-scpls" => Some(Self::Pls),
            "video/x-ms-asf" | "video/x-ms-asx" => Some(Self::Asx),
            _ => None,
        }
    }

    /// Decode the entries of a playlist file
    pub fn parse(self, content: &str) -> Result<Vec<PlaylistEntry>, PlaylistError> {
        match self {
            Self::M3u => Ok(parse_m3u(content)),
            Self::Pls => Ok(parse_pls(content)),
            Self::Asx => parse_asx(content),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::M3u => "m3u",
            Self::Pls => "pls",
            Self::Asx => "asx",
        }
    }
}

/// One accumulated playlist entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub location: String,
    pub title: Option<String>,
    pub mimetype: Option<String>,

    /// Explicit position from the file (pls index); `None` means next in line
    pub order: Option<u32>,

    pub description: Option<String>,
    pub protocol: Option<String>,
    pub size: Option<u64>,

    /// Any other key/value the format carried (durations, asx params)
    pub extra: BTreeMap<String, String>,
}

impl PlaylistEntry {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Where a playlist entry points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryLocation {
    /// Absolute path of a local file
    Local(String),
    /// URL with a non-file scheme
    Remote(String),
}

fn has_scheme(location: &str) -> bool {
    location
        .split_once("://")
        .is_some_and(|(scheme, _)| !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)))
}

/// Classify an entry location and resolve relative paths against `playlist_dir`.
///
/// `file://` URLs are decoded and treated as local paths.
pub fn resolve_location(location: &str, playlist_dir: &str) -> EntryLocation {
    if let Some(path) = location.strip_prefix("file://") {
        let decoded = urlencoding::decode(path)
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| path.to_string());
        return EntryLocation::Local(decoded);
    }
    if has_scheme(location) {
        return EntryLocation::Remote(location.to_string());
    }
    if location.starts_with('/') {
        EntryLocation::Local(location.to_string())
    } else {
        EntryLocation::Local(format!("{playlist_dir}{location}"))
    }
}

/// Directory part of a playlist location, including the trailing slash
pub fn playlist_dir(location: &str) -> &str {
    match location.rfind('/') {
        Some(idx) => &location[..=idx],
        None => "",
    }
}
