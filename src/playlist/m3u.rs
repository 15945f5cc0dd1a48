use super::PlaylistEntry;
use crate::error::PlaylistError;
use regex::Regex;
use std::sync::LazyLock;

static EXTINF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#EXTINF:(-?\d+),\s?(\S.*)$").expect("valid #EXTINF pattern"));

fn looks_like_mimetype(value: &str) -> bool {
    let mut parts = value.split('/');
    let valid = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c));
    matches!((parts.next(), parts.next(), parts.next()), (Some(kind), Some(sub), None) if valid(kind) && valid(sub))
}

/// Split `Title,type/subtype` into title and mimetype
fn split_title(info: &str) -> (String, Option<String>) {
    match info.rsplit_once(',') {
        Some((title, mimetype)) if looks_like_mimetype(mimetype.trim()) => {
            (title.trim_end().to_string(), Some(mimetype.trim().to_string()))
        }
        _ => (info.to_string(), None),
    }
}

/// Parse an (extended) m3u playlist.
///
/// `#EXTINF` lines set the title (and optionally the mimetype) of the next
/// location line. Other comments and blank lines are skipped.
pub fn parse_m3u(content: &str) -> Vec<PlaylistEntry> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut entries = Vec::new();
    let mut pending: Option<(String, Option<String>, String)> = None;

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            let info = EXTINF.captures(line);
            match info {
                Some(caps) => {
                    let (title, mimetype) = split_title(&caps[2]);
                    pending = Some((title, mimetype, caps[1].to_string()));
                }
                None if line.get(..7).is_some_and(|tag| tag.eq_ignore_ascii_case("#EXTINF")) => {
                    let err = PlaylistError::MalformedEntry {
                        line: index + 1,
                        content: line.to_string(),
                    };
                    log::debug!("{}", err);
                }
                None => {}
            }
            continue;
        }

        let mut entry = PlaylistEntry::new(line);
        if let Some((title, mimetype, duration)) = pending.take() {
            entry.title = Some(title);
            entry.mimetype = mimetype;
            entry.extra.insert("duration".to_string(), duration);
        }
        entries.push(entry);
    }

    entries
}
