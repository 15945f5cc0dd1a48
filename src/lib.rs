//! Media Layout - virtual folder layouts for a media server
//!
//! Every imported object (audio, video, image, playlist) is placed into
//! several independent virtual folder trees: by artist, album, genre, year,
//! directory, topic and so on. The trees are described by a configurable box
//! layout and materialized against a hierarchical [`store::Store`].

pub mod config;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod model;
pub mod playlist;
pub mod scan;
pub mod store;
pub mod util;

pub use config::LayoutConfig;
pub use error::{ConfigError, ImportError, MetadataError, PlaylistError};
pub use layout::{ImportContext, Layout};
pub use store::{MemoryStore, Store};
