//! Script options and regex name maps

use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

pub const DEFAULT_RAW_IMAGE_FILTER: &str = "image/.*raw";

/// Which audio layout the dispatcher uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioLayout {
    #[default]
    Default,
    Structured,
}

/// Which layout the dispatcher uses for images and videos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualLayout {
    #[default]
    Default,
    /// Model, topic and timestamp axes
    Detail,
}

/// Flags and parameters read by the layout builders
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptOptions {
    /// Mimetypes matching this pattern are left out of the detailed image layout
    pub raw_image_filter: String,

    /// Leading directory segments dropped from directory chains
    pub skip_folders: usize,

    /// Directory segment pattern that names the topic of an item
    pub topic_from_path: Option<String>,

    /// How many of the deepest directory containers inherit the item's resources
    pub parent_count: usize,

    pub audio_layout: AudioLayout,

    pub visual_layout: VisualLayout,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            raw_image_filter: DEFAULT_RAW_IMAGE_FILTER.to_string(),
            skip_folders: 0,
            topic_from_path: None,
            parent_count: 1,
            audio_layout: AudioLayout::Default,
            visual_layout: VisualLayout::Default,
        }
    }
}

/// What a map rule produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapKind {
    /// Rewrites the matched text
    #[default]
    Replace,
    /// Names a topic folder
    Topic,
}

/// A `{ from, to, type }` entry of a name map
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapEntry {
    pub from: String,
    pub to: String,
    #[serde(default, rename = "type")]
    pub kind: MapKind,
}

impl MapEntry {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            kind: MapKind::Replace,
        }
    }

    pub fn topic(from: &str, to: &str) -> Self {
        Self {
            kind: MapKind::Topic,
            ..Self::new(from, to)
        }
    }
}

#[derive(Debug, Clone)]
struct NameRule {
    pattern: Regex,
    to: String,
    kind: MapKind,
}

/// Ordered, case-insensitive regex rewrite table (genre, model and headline maps)
#[derive(Debug, Clone, Default)]
pub struct NameMap {
    rules: Vec<NameRule>,
}

impl NameMap {
    pub fn compile(entries: &[MapEntry]) -> Result<Self, ConfigError> {
        let rules = entries
            .iter()
            .map(|entry| {
                Ok(NameRule {
                    pattern: compile_pattern(&entry.from)?,
                    to: entry.to.clone(),
                    kind: entry.kind,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { rules })
    }

    /// Rewrite the matched part of `value` with the first matching rule of `kind`
    pub fn replace(&self, value: &str, kind: MapKind) -> Option<String> {
        self.rules
            .iter()
            .filter(|rule| rule.kind == kind)
            .find(|rule| rule.pattern.is_match(value))
            .map(|rule| rule.pattern.replace(value, rule.to.as_str()).into_owned())
    }

    /// Replace the whole value with the target of the first matching rule
    pub fn substitute(&self, value: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(value))
            .map(|rule| rule.to.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ScriptOptions::default();
        assert_eq!(options.raw_image_filter, "image/.*raw");
        assert_eq!(options.parent_count, 1);
        assert_eq!(options.skip_folders, 0);
        assert_eq!(options.audio_layout, AudioLayout::Default);
    }

    #[test]
    fn test_replace_rewrites_match_only() {
        let map = NameMap::compile(&[MapEntry::new("Headline", "hl")]).unwrap();
        assert_eq!(map.replace("Headline 2025", MapKind::Replace).unwrap(), "hl 2025");
        assert!(map.replace("Other", MapKind::Replace).is_none());
        assert!(map.replace("Headline 2025", MapKind::Topic).is_none());
    }

    #[test]
    fn test_topic_rules_are_separate() {
        let map = NameMap::compile(&[
            MapEntry::topic("^supertop", "thisTopic"),
            MapEntry::new("^nosupertop", "Rocks"),
        ])
        .unwrap();
        assert_eq!(map.replace("supertop", MapKind::Topic).unwrap(), "thisTopic");
        assert_eq!(map.replace("nosupertop", MapKind::Replace).unwrap(), "Rocks");
        assert!(map.replace("nosupertop", MapKind::Topic).is_none());
    }

    #[test]
    fn test_substitute_is_case_insensitive() {
        let map = NameMap::compile(&[MapEntry::new("^(rock|pop)$", "Rock & Pop")]).unwrap();
        assert_eq!(map.substitute("ROCK"), Some("Rock & Pop"));
        assert_eq!(map.substitute("Jazz"), None);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = NameMap::compile(&[MapEntry::new("(unclosed", "x")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { pattern, .. } if pattern == "(unclosed"));
    }
}
