//! Sidecar metadata
//!
//! `.nfo` files next to a video (or describing a show) carry the metadata the
//! media file itself lacks. They are parsed here and merged into the stored
//! object by [`crate::layout::Layout::import_metadata`].

mod nfo;

pub use nfo::{parse_nfo, NfoDocument, NfoKind};

use crate::error::MetadataError;
use std::path::Path;

/// Read and parse an NFO file
pub fn read_nfo(path: &Path) -> Result<NfoDocument, MetadataError> {
    let content = std::fs::read_to_string(path)?;
    parse_nfo(&content)
}

/// Whether a location names an NFO sidecar
pub fn is_nfo(location: &str) -> bool {
    Path::new(location)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("nfo"))
}
