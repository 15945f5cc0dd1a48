//! Error types for the virtual layout engine.
//!
//! - [`ConfigError`] - broken box layout or option tables (fatal for an import)
//! - [`PlaylistError`] - playlist decoding problems
//! - [`MetadataError`] - sidecar metadata problems
//! - [`ImportError`] - what every `import_*` entry point returns
//!
//! Store no-ops are not errors: [`crate::store::Store::add_cds_object`]
//! reports them as `None`.

use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors in the layout configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A chain template references a box that the box layout does not define.
    #[error("Box '{0}' is not defined in the box layout")]
    MissingBox(String),

    /// A configured regular expression does not compile.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("Failed to parse layout configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("Failed to read layout configuration: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Playlist Errors
// =============================================================================

/// Errors while reading a playlist.
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// Mimetype is neither m3u, pls nor asx.
    #[error("Unknown playlist mimetype: '{mimetype}' of playlist '{location}'")]
    UnrecognizedFormat { mimetype: String, location: String },

    /// A line or node that matches no known pattern. Logged, never fatal.
    #[error("Skipping malformed entry at line {line}: {content}")]
    MalformedEntry { line: usize, content: String },

    /// Playlist file could not be read.
    #[error("Failed to read playlist: {0}")]
    Io(#[from] std::io::Error),

    /// ASX document is not well-formed.
    #[error("Invalid ASX document: {0}")]
    Xml(String),
}

// =============================================================================
// Metadata Errors
// =============================================================================

/// Errors while reading sidecar metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to read metafile: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid NFO document: {0}")]
    Xml(String),
}

// =============================================================================
// Import Errors
// =============================================================================

/// Top-level error of the per-type import entry points.
///
/// Playlist and metadata failures are logged by the importers and never end
/// up here; only a broken box layout stops an import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = ImportError> = std::result::Result<T, E>;
