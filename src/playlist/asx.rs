use super::{has_scheme, PlaylistEntry};
use crate::error::PlaylistError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Where the parser is in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Root,
    InAsx,
    InEntry,
}

/// Element whose text is being collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    None,
    Title,
    Abstract,
}

struct AsxParser {
    state: State,
    field: TextField,
    base: Option<String>,
    entry: PlaylistEntry,
    entries: Vec<PlaylistEntry>,
}

fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes().flatten().find_map(|attr| {
        attr.key.as_ref().eq_ignore_ascii_case(key).then(|| {
            attr.unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).to_string())
        })
    })
}

impl AsxParser {
    fn new() -> Self {
        Self {
            state: State::Root,
            field: TextField::None,
            base: None,
            entry: PlaylistEntry::default(),
            entries: Vec::new(),
        }
    }

    fn open(&mut self, e: &BytesStart) {
        let name = e.name().as_ref().to_ascii_lowercase();
        match (self.state, name.as_slice()) {
            (State::Root, b"asx") => self.state = State::InAsx,
            (State::InAsx, b"entry") => {
                self.state = State::InEntry;
                self.entry = PlaylistEntry::default();
            }
            (State::InAsx | State::InEntry, b"base") => {
                if let Some(href) = attribute(e, b"href") {
                    self.base = Some(href);
                }
            }
            (State::InEntry, b"ref") => {
                if self.entry.location.is_empty() {
                    if let Some(href) = attribute(e, b"href") {
                        self.entry.location = self.resolve(href.trim());
                    }
                }
            }
            (State::InEntry, b"title") => self.field = TextField::Title,
            (State::InEntry, b"abstract") => self.field = TextField::Abstract,
            (State::InEntry, b"param") => {
                if let (Some(key), Some(value)) = (attribute(e, b"name"), attribute(e, b"value")) {
                    match key.to_ascii_lowercase().as_str() {
                        "mimetype" => self.entry.mimetype = Some(value),
                        "protocol" => self.entry.protocol = Some(value),
                        "size" => self.entry.size = value.parse().ok(),
                        _ => {
                            self.entry.extra.insert(key, value);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        let name = name.to_ascii_lowercase();
        match (self.state, name.as_slice()) {
            (State::InEntry, b"entry") => {
                self.state = State::InAsx;
                let entry = std::mem::take(&mut self.entry);
                if entry.location.is_empty() {
                    log::debug!("Skipping ASX entry without a ref");
                } else {
                    self.entries.push(entry);
                }
            }
            (State::InAsx, b"asx") => self.state = State::Root,
            (_, b"title" | b"abstract") => self.field = TextField::None,
            _ => {}
        }
    }

    fn text(&mut self, text: String) {
        match self.field {
            TextField::Title => self.entry.title = Some(text),
            TextField::Abstract => self.entry.description = Some(text),
            TextField::None => {}
        }
    }

    fn resolve(&self, href: &str) -> String {
        match &self.base {
            Some(base) if !has_scheme(href) && !href.starts_with('/') => {
                if base.ends_with('/') {
                    format!("{base}{href}")
                } else {
                    format!("{base}/{href}")
                }
            }
            _ => href.to_string(),
        }
    }
}

/// Parse an ASX playlist.
///
/// Element names are matched case-insensitively. Each `<entry>` yields one
/// entry when it closes; its first `<ref href>` is the location, resolved
/// against `<base href>` when relative.
pub fn parse_asx(content: &str) -> Result<Vec<PlaylistEntry>, PlaylistError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);
    let mut parser = AsxParser::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => parser.open(&e),
            Ok(Event::Empty(e)) => {
                parser.open(&e);
                parser.close(e.name().as_ref());
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                parser.text(text);
            }
            Ok(Event::End(e)) => parser.close(e.name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PlaylistError::Xml(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(parser.entries)
}
