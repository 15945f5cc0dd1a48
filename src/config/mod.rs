//! Layout configuration
//!
//! The box layout, script options and name maps are read from a TOML file
//! once, validated, and then shared read-only by every import.
//!
//! ```toml
//! [options]
//! raw_image_filter = "image/.*raw"
//! parent_count = 1
//!
//! [[boxes]]
//! key = "Audio/allGenres"
//! title = "Genre"
//!
//! [[genre_map]]
//! from = "^(hard|heavy) rock$"
//! to = "Rock"
//! ```

mod boxes;
mod options;

pub use boxes::{keys, BoxConfig, BoxEntry, BoxLayout};
pub use options::{
    AudioLayout, MapEntry, MapKind, NameMap, ScriptOptions, VisualLayout,
    DEFAULT_RAW_IMAGE_FILTER,
};

use crate::error::ConfigError;
use options::compile_pattern;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Configuration file schema
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LayoutFile {
    boxes: Vec<BoxConfig>,
    options: ScriptOptions,
    genre_map: Vec<MapEntry>,
    model_map: Vec<MapEntry>,
    headline_map: Vec<MapEntry>,
}

/// Validated layout configuration
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub boxes: BoxLayout,
    pub options: ScriptOptions,
    pub genre_map: NameMap,
    pub model_map: NameMap,
    pub headline_map: NameMap,
    raw_image_filter: Regex,
    topic_from_path: Option<Regex>,
}

impl LayoutConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: LayoutFile = toml::from_str(content)?;
        Self::from_file(file)
    }

    /// Read and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading layout configuration from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn from_file(file: LayoutFile) -> Result<Self, ConfigError> {
        let boxes = BoxLayout::from_config(file.boxes);
        let mut config = Self::with_boxes(boxes)?;
        config = config.with_options(file.options)?;
        config.genre_map = NameMap::compile(&file.genre_map)?;
        config.model_map = NameMap::compile(&file.model_map)?;
        config.headline_map = NameMap::compile(&file.headline_map)?;
        Ok(config)
    }

    /// Built-in box layout with default options
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::with_boxes(BoxLayout::defaults())
    }

    /// Default options around a given box table
    pub fn with_boxes(boxes: BoxLayout) -> Result<Self, ConfigError> {
        let options = ScriptOptions::default();
        Ok(Self {
            raw_image_filter: compile_pattern(&options.raw_image_filter)?,
            topic_from_path: None,
            boxes,
            options,
            genre_map: NameMap::default(),
            model_map: NameMap::default(),
            headline_map: NameMap::default(),
        })
    }

    /// Replace the script options, recompiling their patterns
    pub fn with_options(mut self, options: ScriptOptions) -> Result<Self, ConfigError> {
        self.raw_image_filter = compile_pattern(&options.raw_image_filter)?;
        self.topic_from_path = options
            .topic_from_path
            .as_deref()
            .map(compile_pattern)
            .transpose()?;
        self.options = options;
        Ok(self)
    }

    /// Add or replace a single box
    pub fn with_box(mut self, entry: BoxEntry) -> Self {
        self.boxes.insert(entry);
        self
    }

    pub fn with_genre_map(mut self, entries: &[MapEntry]) -> Result<Self, ConfigError> {
        self.genre_map = NameMap::compile(entries)?;
        Ok(self)
    }

    pub fn with_model_map(mut self, entries: &[MapEntry]) -> Result<Self, ConfigError> {
        self.model_map = NameMap::compile(entries)?;
        Ok(self)
    }

    pub fn with_headline_map(mut self, entries: &[MapEntry]) -> Result<Self, ConfigError> {
        self.headline_map = NameMap::compile(entries)?;
        Ok(self)
    }

    /// Whether a mimetype is excluded by the raw image filter
    pub fn is_raw_image(&self, mimetype: &str) -> bool {
        self.raw_image_filter.is_match(mimetype)
    }

    /// First directory segment matching the `topic_from_path` option
    pub fn topic_from_path<'a>(&self, dir: &'a [String]) -> Option<&'a str> {
        let pattern = self.topic_from_path.as_ref()?;
        dir.iter()
            .map(String::as_str)
            .find(|segment| pattern.is_match(segment))
    }
}
