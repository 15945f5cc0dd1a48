//! Directory import driver
//!
//! Walks a directory, turns every recognised file into a [`MediaObject`]
//! and feeds it through the layout into a store. Playlists go last so their
//! entries can be found in the store, and `.nfo` sidecars are merged into the
//! object they describe.

use crate::layout::{ImportContext, Layout};
use crate::metadata::is_nfo;
use crate::model::meta::{
    M_ALBUM, M_ALBUMARTIST, M_ARTIST, M_COMPOSER, M_DATE, M_GENRE, M_TITLE, M_TRACKNUMBER,
};
use crate::model::MediaObject;
use crate::playlist::PlaylistType;
use crate::store::{MemoryStore, Store};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Mimetype for a file extension, `None` for files the layout has no use for
pub fn mimetype_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mimetype = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "ogg" | "oga" => "application/ogg",
        "opus" => "audio/opus",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "wav" => "audio/x-wav",
        "wma" => "audio/x-ms-wma",
        "mkv" => "video/x-matroska",
        "mp4" | "m4v" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "wmv" => "video/x-ms-wmv",
        "mpg" | "mpeg" => "video/mpeg",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "raw" | "rw2" => "image/x-panasonic-raw",
        "m3u" => "audio/x-mpegurl",
        "m3u8" => "application/vnd.apple.mpegurl",
        "pls" => "audio/x-scpls",
        "asx" => "video/x-ms-asf",
        _ => return None,
    };
    Some(mimetype)
}

/// Builds the media object for one file
pub trait MetadataReader: Sync {
    fn read(&self, path: &Path, mimetype: &str) -> Result<MediaObject>;
}

/// Reader that only looks at the file name
#[derive(Debug, Default, Clone, Copy)]
pub struct FileNameReader;

impl FileNameReader {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataReader for FileNameReader {
    fn read(&self, path: &Path, mimetype: &str) -> Result<MediaObject> {
        Ok(MediaObject::new(path.to_string_lossy(), mimetype))
    }
}

/// Reader that also extracts audio tags with lofty
#[derive(Debug, Default, Clone, Copy)]
pub struct TagReader;

impl TagReader {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataReader for TagReader {
    fn read(&self, path: &Path, mimetype: &str) -> Result<MediaObject> {
        let mut obj = FileNameReader.read(path, mimetype)?;
        if !mimetype.starts_with("audio/") && mimetype != "application/ogg" {
            return Ok(obj);
        }

        use lofty::prelude::*;
        use lofty::probe::Probe;

        let tagged_file = Probe::open(path)
            .with_context(|| format!("Failed to open audio file: {}", path.display()))?
            .read()
            .with_context(|| format!("Failed to read tags from: {}", path.display()))?;

        let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
            return Ok(obj);
        };

        let mut set = |key: &str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                obj.meta.set(key, value);
            }
        };
        set(M_TITLE, tag.title().map(|v| v.to_string()));
        set(M_ARTIST, tag.artist().map(|v| v.to_string()));
        set(M_ALBUM, tag.album().map(|v| v.to_string()));
        set(M_GENRE, tag.genre().map(|v| v.to_string()));
        set(M_ALBUMARTIST, tag.get_string(&ItemKey::AlbumArtist).map(str::to_string));
        set(M_COMPOSER, tag.get_string(&ItemKey::Composer).map(str::to_string));
        set(M_TRACKNUMBER, tag.track().map(|n| n.to_string()));
        set(
            M_DATE,
            tag.get_string(&ItemKey::RecordingDate)
                .map(str::to_string)
                .or_else(|| tag.year().map(|y| y.to_string())),
        );

        Ok(obj)
    }
}

/// A recognised file and the sidecar that describes it
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub object: MediaObject,
    pub sidecar: Option<PathBuf>,
}

impl ScannedFile {
    fn is_playlist(&self) -> bool {
        PlaylistType::from_mimetype(&self.object.mimetype).is_some()
    }
}

/// Counters of one import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub files: usize,
    pub placements: usize,
    pub metafiles: usize,
}

/// Walks a directory and imports what it finds
pub struct Scanner<R: MetadataReader> {
    root: PathBuf,
    reader: R,
}

impl<R: MetadataReader> Scanner<R> {
    pub fn new(root: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            root: root.into(),
            reader,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find every recognised file below the root.
    ///
    /// The walk is sequential, reading metadata runs in parallel. Files whose
    /// tags cannot be read are kept with file-name metadata. The result is
    /// sorted by path with playlists at the end.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.is_dir() {
            anyhow::bail!("Not a directory: {}", self.root.display());
        }

        let mut candidates = Vec::new();
        let mut sidecars: HashMap<PathBuf, PathBuf> = HashMap::new();

        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Error accessing entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            if is_nfo(&path.to_string_lossy()) {
                sidecars.insert(path.with_extension(""), path);
            } else if let Some(mimetype) = mimetype_for(&path) {
                candidates.push((path, mimetype));
            }
        }

        log::debug!("{} candidate files below {}", candidates.len(), self.root.display());

        let mut files: Vec<ScannedFile> = candidates
            .par_iter()
            .map(|(path, mimetype)| {
                let object = self.reader.read(path, mimetype).unwrap_or_else(|e| {
                    log::warn!("{:#}", e);
                    MediaObject::new(path.to_string_lossy(), *mimetype)
                });
                ScannedFile {
                    object,
                    sidecar: sidecars.get(&path.with_extension("")).cloned(),
                }
            })
            .collect();

        files.sort_by(|a, b| {
            (a.is_playlist(), &a.object.location).cmp(&(b.is_playlist(), &b.object.location))
        });
        Ok(files)
    }

    /// Register each file with the store and run it through the layout
    pub fn import(&self, files: Vec<ScannedFile>, layout: &Layout, store: &mut MemoryStore) -> Result<ImportSummary> {
        let ctx = ImportContext::new(self.root.to_string_lossy());
        let mut summary = ImportSummary::default();

        for file in files {
            let location = file.object.location.clone();
            let object = store.add_file(file.object);

            if let Some(sidecar) = &file.sidecar {
                let meta = MediaObject::new(sidecar.to_string_lossy(), "text/xml");
                let updated = layout
                    .import_metadata(&meta, &object, &ctx, store)
                    .with_context(|| format!("Failed to import metadata for {}", location))?;
                summary.metafiles += updated.len();
            }
            let object = store.get_cds_object(&location).unwrap_or(object);

            let ids = layout
                .import(&object, &ctx, store)
                .with_context(|| format!("Failed to import {}", location))?;
            log::debug!("{} placed {} times", location, ids.len());
            summary.files += 1;
            summary.placements += ids.len();
        }

        Ok(summary)
    }
}
