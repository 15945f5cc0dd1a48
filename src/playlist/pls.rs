use super::PlaylistEntry;
use crate::error::PlaylistError;
use regex::Regex;
use std::sync::LazyLock;

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\[playlist\]$").expect("valid pls header pattern"));

static SETTING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(NumberOfEntries|Version)\s*=\s*(\d+)$").expect("valid pls setting pattern")
});

static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(File|Title|MimeType|Length)\s*(\d+)\s*=\s*(\S.*)$").expect("valid pls field pattern")
});

/// Entry being accumulated, with its pls index
struct Pending {
    index: u32,
    entry: PlaylistEntry,
}

impl Pending {
    fn new(index: u32) -> Self {
        Self {
            index,
            entry: PlaylistEntry {
                order: Some(index),
                ..Default::default()
            },
        }
    }

    /// The entry, unless no `File<N>` line was seen for it
    fn finish(self) -> Option<PlaylistEntry> {
        (!self.entry.location.is_empty()).then_some(self.entry)
    }
}

/// Parse a pls playlist.
///
/// Fields are grouped by their trailing index; an entry is emitted when the
/// index changes and once more at the end of the input. The index becomes the
/// entry's order.
pub fn parse_pls(content: &str) -> Vec<PlaylistEntry> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut entries = Vec::new();
    let mut pending: Option<Pending> = None;

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if HEADER.is_match(line) || SETTING.is_match(line) {
            continue;
        }

        let Some(caps) = FIELD.captures(line) else {
            let err = PlaylistError::MalformedEntry {
                line: number + 1,
                content: line.to_string(),
            };
            log::debug!("{}", err);
            continue;
        };
        let Ok(index) = caps[2].parse::<u32>() else {
            continue;
        };

        let mut current = match pending.take() {
            Some(current) if current.index == index => current,
            Some(previous) => {
                entries.extend(previous.finish());
                Pending::new(index)
            }
            None => Pending::new(index),
        };

        let value = caps[3].to_string();
        match caps[1].to_ascii_lowercase().as_str() {
            "file" => current.entry.location = value,
            "title" => current.entry.title = Some(value),
            "mimetype" => current.entry.mimetype = Some(value),
            _ => {
                current.entry.extra.insert("length".to_string(), value);
            }
        }
        pending = Some(current);
    }

    if let Some(last) = pending {
        entries.extend(last.finish());
    }

    entries
}
