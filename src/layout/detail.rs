use super::chains::{append_directories, prepare_chains, ResolvedBoxes};
use super::classify::{image_details, video_details, Details};
use super::{titled, ImportContext, Layout, Submitter};
use crate::config::keys;
use crate::error::{ConfigError, Result};
use crate::model::{upnp_class, Chain, ContainerDescriptor, MediaObject, ObjectId};
use crate::store::Store;

const IMAGE_DETAIL_BOXES: &[&str] = &[
    keys::IMAGE_ROOT,
    keys::IMAGE_ALL,
    keys::IMAGE_ALL_DIRECTORIES,
    keys::IMAGE_UNKNOWN,
    keys::IMAGE_DETAIL_ALL_MODELS,
    keys::IMAGE_DETAIL_YEAR_MONTH,
    keys::IMAGE_DETAIL_YEAR_DATE,
    keys::TOPIC_ROOT,
    keys::TOPIC,
    keys::TOPIC_EXTRA,
];

const VIDEO_DETAIL_BOXES: &[&str] = &[
    keys::VIDEO_ROOT,
    keys::VIDEO_ALL,
    keys::VIDEO_ALL_DIRECTORIES,
    keys::VIDEO_UNKNOWN,
    keys::TOPIC_ROOT,
    keys::TOPIC,
    keys::TOPIC_EXTRA,
];

/// `<time>-<model>-<title>` and `<time>-<title>` item titles
fn detail_titles(obj: &MediaObject, details: &Details) -> (String, String) {
    let prefix = details.time_prefix().unwrap_or_default();
    let short = format!("{}{}", prefix, obj.title);
    let full = match &details.model {
        Some(model) => format!("{}{}-{}", prefix, model, obj.title),
        None => short.clone(),
    };
    (full, short)
}

fn facet(title: &str) -> ContainerDescriptor {
    ContainerDescriptor::new(title, upnp_class::CONTAINER)
}

/// `<media root>/Topics/<topic>/<headline>/<YYYY-MM>`
fn topic_chain(
    boxes: &ResolvedBoxes,
    root: &str,
    topic: &str,
    headline: &str,
    period: &str,
) -> Result<Chain, ConfigError> {
    Ok(boxes
        .chain(&[root, keys::TOPIC_ROOT])?
        .then(boxes.get(keys::TOPIC)?.titled(topic))
        .then(boxes.get(keys::TOPIC_EXTRA)?.titled(headline))
        .then(facet(period)))
}

impl Layout<'_> {
    /// Detailed photo layout: timestamps, camera models and topics.
    ///
    /// Images matching the raw image filter are skipped.
    pub fn import_image_detail(
        &self,
        obj: &MediaObject,
        ctx: &ImportContext,
        store: &mut dyn Store,
    ) -> Result<Vec<ObjectId>> {
        if self.config.is_raw_image(&obj.mimetype) {
            log::debug!("Skipping raw image {} ({})", obj.location, obj.mimetype);
            return Ok(Vec::new());
        }

        let boxes = prepare_chains(IMAGE_DETAIL_BOXES, &self.config.boxes, &[keys::IMAGE_ROOT, keys::IMAGE_ALL])?;
        let unknown = boxes.title(keys::IMAGE_UNKNOWN)?.to_string();
        let details = image_details(obj, ctx, self.config, &unknown);
        let (full, short) = detail_titles(obj, &details);
        let full = titled(obj, full);
        let mut submitter = Submitter::new(store);

        submitter.submit(&full, &boxes.chain(&[keys::IMAGE_ROOT, keys::IMAGE_ALL])?, None);

        if boxes.enabled(keys::IMAGE_ALL_DIRECTORIES) && !details.dir.is_empty() {
            let mut chain = boxes.chain(&[keys::IMAGE_ROOT, keys::IMAGE_ALL_DIRECTORIES])?;
            let template = ContainerDescriptor::new("", upnp_class::PHOTO_ALBUM);
            append_directories(&mut chain, &details.dir, &template, obj, ctx, self.config.options.parent_count);
            submitter.submit(&full, &chain, None);
        }

        let dates = &details.dates;
        if boxes.enabled(keys::IMAGE_DETAIL_YEAR_MONTH) {
            let mut chain = boxes
                .chain(&[keys::IMAGE_ROOT, keys::IMAGE_DETAIL_YEAR_MONTH])?
                .then(facet(&dates.year));
            if let Some(month) = &dates.month {
                chain.push(facet(month));
            }
            submitter.submit(&full, &chain, None);
        }

        if let Some(headline) = &details.headline {
            if boxes.all_enabled(&[keys::TOPIC_ROOT, keys::TOPIC]) {
                let topic = match &details.topic {
                    Some(topic) => topic.as_str(),
                    None => boxes.title(keys::TOPIC)?,
                };
                let period = details.year_month().unwrap_or_else(|| unknown.clone());
                let chain = topic_chain(&boxes, keys::IMAGE_ROOT, topic, headline, &period)?;
                submitter.submit(&full, &chain, None);
            }
        }

        if boxes.enabled(keys::IMAGE_DETAIL_YEAR_DATE) {
            let chain = boxes
                .chain(&[keys::IMAGE_ROOT, keys::IMAGE_DETAIL_YEAR_DATE])?
                .then(facet(&dates.year))
                .then(facet(&dates.date));
            submitter.submit(&full, &chain, None);
        }

        if let Some(model) = &details.model {
            if boxes.enabled(keys::IMAGE_DETAIL_ALL_MODELS) {
                let chain = boxes
                    .chain(&[keys::IMAGE_ROOT, keys::IMAGE_DETAIL_ALL_MODELS])?
                    .then(ContainerDescriptor::new(model.as_str(), upnp_class::PHOTO_ALBUM));
                submitter.submit(&titled(obj, short), &chain, None);
            }
        }

        Ok(submitter.finish())
    }

    /// Detailed video layout: NFO timestamps and topics.
    pub fn import_video_detail(
        &self,
        obj: &MediaObject,
        ctx: &ImportContext,
        store: &mut dyn Store,
    ) -> Result<Vec<ObjectId>> {
        let boxes = prepare_chains(VIDEO_DETAIL_BOXES, &self.config.boxes, &[keys::VIDEO_ROOT, keys::VIDEO_ALL])?;
        let unknown = boxes.title(keys::VIDEO_UNKNOWN)?.to_string();
        let details = video_details(obj, ctx, self.config, &unknown);
        let (full, _) = detail_titles(obj, &details);
        let full = titled(obj, full);
        let mut submitter = Submitter::new(store);

        submitter.submit(&full, &boxes.chain(&[keys::VIDEO_ROOT, keys::VIDEO_ALL])?, None);

        if boxes.enabled(keys::VIDEO_ALL_DIRECTORIES) && !details.dir.is_empty() {
            let mut chain = boxes.chain(&[keys::VIDEO_ROOT, keys::VIDEO_ALL_DIRECTORIES])?;
            let template = ContainerDescriptor::new("", upnp_class::CONTAINER);
            append_directories(&mut chain, &details.dir, &template, obj, ctx, self.config.options.parent_count);
            submitter.submit(&full, &chain, None);
        }

        let has_topic = details.topic.is_some() || details.headline.is_some();
        if has_topic && boxes.all_enabled(&[keys::TOPIC_ROOT, keys::TOPIC]) {
            let topic = match &details.topic {
                Some(topic) => topic.as_str(),
                None => boxes.title(keys::TOPIC)?,
            };
            let headline = match &details.headline {
                Some(headline) => headline.as_str(),
                None => boxes.title(keys::TOPIC_EXTRA)?,
            };
            let period = details.year_month().unwrap_or_else(|| unknown.clone());
            let chain = topic_chain(&boxes, keys::VIDEO_ROOT, topic, headline, &period)?;
            submitter.submit(&full, &chain, None);
        }

        Ok(submitter.finish())
    }
}
