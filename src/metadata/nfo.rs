use crate::error::MetadataError;
use crate::model::meta::{
    M_ACTOR, M_DATE, M_DESCRIPTION, M_DIRECTOR, M_EPISODE, M_GENRE, M_PARTNUMBER, M_PUBLISHER, M_RATING,
    M_REGION, M_SERIES_TITLE, M_TITLE,
};
use crate::model::{upnp_class, MediaObject, MetaData};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Root element of an NFO document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NfoKind {
    Movie,
    TvShow,
    Episode,
}

impl NfoKind {
    fn from_root(name: &[u8]) -> Option<Self> {
        match name {
            b"movie" => Some(Self::Movie),
            b"tvshow" => Some(Self::TvShow),
            b"episodedetails" => Some(Self::Episode),
            _ => None,
        }
    }
}

/// Fields collected from one NFO file
#[derive(Debug, Clone, PartialEq)]
pub struct NfoDocument {
    pub kind: NfoKind,
    pub title: Option<String>,
    pub meta: MetaData,
}

impl NfoDocument {
    /// Copy the collected fields onto `obj`.
    ///
    /// Multi-valued keys (genres, actors) replace what `obj` had.
    pub fn apply(&self, obj: &mut MediaObject) {
        obj.meta.merge(&self.meta);
        if let Some(title) = &self.title {
            obj.title = title.clone();
        }
        if self.kind == NfoKind::Movie {
            obj.upnp_class = upnp_class::MOVIE.to_string();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Root,
    InDocument,
    InActor,
}

/// Metadata key for an element directly below the root
fn document_key(name: &[u8]) -> Option<&'static str> {
    match name {
        b"title" => Some(M_TITLE),
        b"plot" => Some(M_DESCRIPTION),
        b"mpaa" => Some(M_RATING),
        b"director" => Some(M_DIRECTOR),
        b"genre" => Some(M_GENRE),
        b"country" => Some(M_REGION),
        b"premiered" | b"aired" => Some(M_DATE),
        b"studio" => Some(M_PUBLISHER),
        b"season" => Some(M_PARTNUMBER),
        b"episode" => Some(M_EPISODE),
        b"showtitle" => Some(M_SERIES_TITLE),
        _ => None,
    }
}

fn is_multi(key: &str) -> bool {
    key == M_GENRE || key == M_ACTOR
}

/// Parse an NFO document (`<movie>`, `<tvshow>` or `<episodedetails>`).
///
/// Only direct children of the root and `<actor><name>` are read; everything
/// else is skipped.
pub fn parse_nfo(content: &str) -> Result<NfoDocument, MetadataError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut state = State::Root;
    let mut kind = None;
    let mut depth = 0usize;
    let mut field: Option<&'static str> = None;
    let mut meta = MetaData::new();
    let mut title = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name().as_ref().to_ascii_lowercase();
                depth += 1;
                match state {
                    State::Root => {
                        kind = NfoKind::from_root(&name);
                        if kind.is_none() {
                            return Err(MetadataError::Xml(format!(
                                "unexpected root element <{}>",
                                String::from_utf8_lossy(&name)
                            )));
                        }
                        state = State::InDocument;
                    }
                    State::InDocument if depth == 2 && name == b"actor" => state = State::InActor,
                    State::InDocument if depth == 2 => field = document_key(&name),
                    State::InActor if depth == 3 && name == b"name" => field = Some(M_ACTOR),
                    _ => field = None,
                }
            }
            Ok(Event::Text(e)) => {
                let Some(key) = field else {
                    continue;
                };
                let text = e.unescape().unwrap_or_default().trim().to_string();
                if text.is_empty() {
                    continue;
                }
                if key == M_TITLE {
                    title = Some(text.clone());
                }
                if is_multi(key) {
                    meta.add(key, text);
                } else {
                    meta.set(key, text);
                }
            }
            Ok(Event::End(_)) => {
                field = None;
                depth = depth.saturating_sub(1);
                if state == State::InActor && depth == 1 {
                    state = State::InDocument;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MetadataError::Xml(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    let kind = kind.ok_or_else(|| MetadataError::Xml("document has no root element".to_string()))?;
    Ok(NfoDocument { kind, title, meta })
}
