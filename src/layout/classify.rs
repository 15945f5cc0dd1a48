//! Classification extractors: turn metadata into the facets chains are built from

use super::ImportContext;
use crate::config::{LayoutConfig, MapKind};
use crate::model::meta::{M_DATE, M_DESCRIPTION, M_GENRE};
use crate::model::MediaObject;
use crate::util::root_path;
use chrono::{NaiveDate, NaiveDateTime};

/// Auxiliary data keys read by the extractors
pub mod aux {
    pub const EXIF_MODEL: &str = "EXIF_TAG_MODEL";
    pub const EXIF_DATE_TIME_ORIGINAL: &str = "EXIF_TAG_DATE_TIME_ORIGINAL";
    pub const XMP_HEADLINE: &str = "Xmp.photoshop.Headline";
    pub const NFO_MODEL: &str = "NFO:model";
    pub const NFO_TOPIC: &str = "NFO:topic";
    pub const NFO_SUBTOPIC: &str = "NFO:subtopic";
    pub const NFO_CREATE_DATE: &str = "NFO:createdate";
    pub const TRAILER_POST_DATE: &str = "T0";
}

/// Year, month and day facets of a date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFacets {
    pub year: String,
    /// `None` when the date has no month part or is unknown
    pub month: Option<String>,
    pub date: String,
}

/// Everything the visual layouts classify an object by
#[derive(Debug, Clone, PartialEq)]
pub struct Details {
    pub dates: DateFacets,
    /// Directory segments below the import root
    pub dir: Vec<String>,
    /// Capture or creation time, when the source recorded one
    pub taken: Option<NaiveDateTime>,
    pub model: Option<String>,
    pub topic: Option<String>,
    pub headline: Option<String>,
}

impl Details {
    /// `YYYY-MM-DD-hh-mm-ss-` prefix used by the detail titles
    pub fn time_prefix(&self) -> Option<String> {
        self.taken
            .map(|t| t.format("%Y-%m-%d-%H-%M-%S-").to_string())
    }

    /// `YYYY-MM` folder of the topic axis
    pub fn year_month(&self) -> Option<String> {
        self.taken.map(|t| t.format("%Y-%m").to_string())
    }
}

/// Split a date like `2025-1-5T10:00` into zero-padded facets.
///
/// The day part ends at `T` or a space; `-` and `:` both separate its fields.
/// A missing date, or one that does not start with a four digit year, yields
/// the `unknown` placeholder so the object still lands in every date axis.
pub fn date_facets(raw: Option<&str>, unknown: &str) -> DateFacets {
    let unknown_facets = || DateFacets {
        year: unknown.to_string(),
        month: None,
        date: unknown.to_string(),
    };

    let day = raw.and_then(|d| d.trim().split(['T', ' ']).next()).unwrap_or_default();
    let mut parts = day.split(['-', ':']).map(str::trim);
    let year = match parts.next() {
        Some(year) if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) => year,
        _ => return unknown_facets(),
    };

    let rest: Vec<String> = parts
        .take(2)
        .map_while(|p| p.parse::<u32>().ok())
        .map(|n| format!("{n:02}"))
        .collect();

    let mut date = year.to_string();
    for part in &rest {
        date.push('-');
        date.push_str(part);
    }

    DateFacets {
        year: year.to_string(),
        month: rest.first().cloned(),
        date,
    }
}

/// Directory segments between the import root and the object, minus skipped folders
pub fn directory_segments(obj: &MediaObject, ctx: &ImportContext, config: &LayoutConfig) -> Vec<String> {
    root_path(&ctx.root_path, &obj.location)
        .into_iter()
        .skip(config.options.skip_folders)
        .collect()
}

/// Genre list, split on commas and passed through the genre map
pub fn genres(obj: &MediaObject, config: &LayoutConfig) -> Vec<String> {
    obj.meta
        .get_all(M_GENRE)
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(|g| config.genre_map.substitute(g).unwrap_or(g).to_string())
        .collect()
}

fn parse_taken(value: Option<&str>, format: &str) -> Option<NaiveDateTime> {
    value.and_then(|v| NaiveDateTime::parse_from_str(v.trim(), format).ok())
}

fn date_only(value: Option<&str>) -> Option<NaiveDateTime> {
    let day = value?.split('T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn mapped_model(raw: Option<&str>, config: &LayoutConfig) -> Option<String> {
    raw.map(|m| config.model_map.substitute(m).unwrap_or(m).to_string())
}

/// Facets of an image: EXIF capture time and camera model, headline topics
pub fn image_details(obj: &MediaObject, ctx: &ImportContext, config: &LayoutConfig, unknown: &str) -> Details {
    let dir = directory_segments(obj, ctx, config);
    let date = obj.meta.get_non_empty(M_DATE);
    let taken = parse_taken(obj.aux_value(aux::EXIF_DATE_TIME_ORIGINAL), "%Y:%m:%d %H:%M:%S")
        .or_else(|| date_only(date));

    let headline_source = obj
        .aux_value(aux::XMP_HEADLINE)
        .or_else(|| obj.meta.get_non_empty(M_DESCRIPTION));
    let topic = config
        .topic_from_path(&dir)
        .map(str::to_string)
        .or_else(|| headline_source.and_then(|h| config.headline_map.replace(h, MapKind::Topic)));
    let headline = headline_source.and_then(|h| config.headline_map.replace(h, MapKind::Replace));

    Details {
        dates: date_facets(date, unknown),
        model: mapped_model(obj.aux_value(aux::EXIF_MODEL), config),
        dir,
        taken,
        topic,
        headline,
    }
}

/// Facets of a video: NFO creation time, model and topic fields
pub fn video_details(obj: &MediaObject, ctx: &ImportContext, config: &LayoutConfig, unknown: &str) -> Details {
    let dir = directory_segments(obj, ctx, config);
    let date = obj.meta.get_non_empty(M_DATE);
    let taken = parse_taken(obj.aux_value(aux::NFO_CREATE_DATE), "%Y%m%d%H%M%S")
        .or_else(|| date_only(date));

    let topic = config.topic_from_path(&dir).map(str::to_string).or_else(|| {
        obj.aux_value(aux::NFO_TOPIC).map(|t| {
            config
                .headline_map
                .replace(t, MapKind::Topic)
                .unwrap_or_else(|| t.to_string())
        })
    });
    let headline = obj.aux_value(aux::NFO_SUBTOPIC).map(|s| {
        config
            .headline_map
            .replace(s, MapKind::Replace)
            .unwrap_or_else(|| s.to_string())
    });

    Details {
        dates: date_facets(date, unknown),
        model: mapped_model(obj.aux_value(aux::NFO_MODEL), config),
        dir,
        taken,
        topic,
        headline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MapEntry, ScriptOptions};

    #[test]
    fn test_date_facets_are_padded() {
        let facets = date_facets(Some("2025-1-5T10:00:00"), "Unknown");
        assert_eq!(facets.year, "2025");
        assert_eq!(facets.month.as_deref(), Some("01"));
        assert_eq!(facets.date, "2025-01-05");
    }

    #[test]
    fn test_missing_date_uses_placeholder() {
        let facets = date_facets(None, "Unknown");
        assert_eq!(facets.year, "Unknown");
        assert_eq!(facets.month, None);
        assert_eq!(facets.date, "Unknown");

        let year_only = date_facets(Some("1999"), "Unknown");
        assert_eq!(year_only.year, "1999");
        assert_eq!(year_only.month, None);
    }

    #[test]
    fn test_odd_dates() {
        let time_only = date_facets(Some("T10:00:00"), "Unknown");
        assert_eq!(time_only.year, "Unknown");
        assert_eq!(time_only.date, "Unknown");

        let exif = date_facets(Some("2018:05:01 12:00:00"), "Unknown");
        assert_eq!(exif.year, "2018");
        assert_eq!(exif.month.as_deref(), Some("05"));
        assert_eq!(exif.date, "2018-05-01");

        let with_time = date_facets(Some("2018-05-01 12:00:00"), "Unknown");
        assert_eq!(with_time.date, "2018-05-01");

        let garbage = date_facets(Some("sometime in 98"), "Unknown");
        assert_eq!(garbage.year, "Unknown");
        assert_eq!(garbage.month, None);

        let short_year = date_facets(Some("98-05-01"), "Unknown");
        assert_eq!(short_year.year, "Unknown");

        let bad_month = date_facets(Some("2018-xx-01"), "Unknown");
        assert_eq!(bad_month.year, "2018");
        assert_eq!(bad_month.month, None);
        assert_eq!(bad_month.date, "2018");
    }

    #[test]
    fn test_genres_are_split_and_mapped() {
        let config = LayoutConfig::builtin()
            .unwrap()
            .with_genre_map(&[MapEntry::new("^rock.*", "Rock")])
            .unwrap();
        let obj = MediaObject::new("/a.mp3", "audio/mpeg")
            .with_meta(M_GENRE, "Rock 'n' Roll, Blues")
            .with_meta(M_GENRE, "Jazz");

        assert_eq!(genres(&obj, &config), vec!["Rock", "Blues", "Jazz"]);
    }

    #[test]
    fn test_skip_folders() {
        let config = LayoutConfig::builtin()
            .unwrap()
            .with_options(ScriptOptions {
                skip_folders: 1,
                ..Default::default()
            })
            .unwrap();
        let ctx = ImportContext::new("/library/");
        let obj = MediaObject::new("/library/2024/Trip/pic.jpg", "image/jpeg");

        assert_eq!(directory_segments(&obj, &ctx, &config), vec!["Trip"]);
    }

    #[test]
    fn test_image_details_from_exif() {
        let config = LayoutConfig::builtin()
            .unwrap()
            .with_model_map(&[MapEntry::new("Shelf", "Grb")])
            .unwrap()
            .with_headline_map(&[MapEntry::new("Headline", "hl")])
            .unwrap();
        let ctx = ImportContext::new("/home/shelf");
        let obj = MediaObject::new("/home/shelf/home/shelf/image.jpg", "image/jpeg")
            .with_meta(M_DATE, "2025-01-01")
            .with_meta(M_DESCRIPTION, "Headline 2025")
            .with_aux(aux::EXIF_MODEL, "Shelf")
            .with_aux(aux::EXIF_DATE_TIME_ORIGINAL, "2025:01:01 19:42:00");

        let details = image_details(&obj, &ctx, &config, "Unknown");

        assert_eq!(details.dir, vec!["home", "shelf"]);
        assert_eq!(details.model.as_deref(), Some("Grb"));
        assert_eq!(details.time_prefix().as_deref(), Some("2025-01-01-19-42-00-"));
        assert_eq!(details.year_month().as_deref(), Some("2025-01"));
        assert_eq!(details.headline.as_deref(), Some("hl 2025"));
        assert_eq!(details.topic, None);
    }

    #[test]
    fn test_video_details_from_nfo() {
        let config = LayoutConfig::builtin()
            .unwrap()
            .with_headline_map(&[
                MapEntry::topic("^supertop", "thisTopic"),
                MapEntry::new("^nosupertop", "Rocks"),
            ])
            .unwrap();
        let ctx = ImportContext::new("/home/shelf");
        let obj = MediaObject::new("/home/shelf/home/shelf/video.mp4", "video/mp4")
            .with_aux(aux::NFO_TOPIC, "supertop")
            .with_aux(aux::NFO_SUBTOPIC, "nosupertop")
            .with_aux(aux::NFO_CREATE_DATE, "20250101094200");

        let details = video_details(&obj, &ctx, &config, "Unknown");

        assert_eq!(details.topic.as_deref(), Some("thisTopic"));
        assert_eq!(details.headline.as_deref(), Some("Rocks"));
        assert_eq!(details.time_prefix().as_deref(), Some("2025-01-01-09-42-00-"));
        assert_eq!(details.dates.year, "Unknown");
    }
}
