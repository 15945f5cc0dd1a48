use super::chains::{append_directories, prepare_chains};
use super::classify::{image_details, video_details, Details};
use super::{ImportContext, Layout, Submitter};
use crate::config::keys;
use crate::error::Result;
use crate::model::meta::M_UPNP_DATE;
use crate::model::{upnp_class, ContainerDescriptor, MediaObject, ObjectId};
use crate::store::Store;

/// Box keys of one visual media type
pub(super) struct VisualBoxes {
    pub root: &'static str,
    pub all: &'static str,
    pub years: &'static str,
    pub dates: &'static str,
    pub directories: &'static str,
    pub unknown: &'static str,
}

impl VisualBoxes {
    pub const IMAGE: Self = Self {
        root: keys::IMAGE_ROOT,
        all: keys::IMAGE_ALL,
        years: keys::IMAGE_ALL_YEARS,
        dates: keys::IMAGE_ALL_DATES,
        directories: keys::IMAGE_ALL_DIRECTORIES,
        unknown: keys::IMAGE_UNKNOWN,
    };

    pub const VIDEO: Self = Self {
        root: keys::VIDEO_ROOT,
        all: keys::VIDEO_ALL,
        years: keys::VIDEO_ALL_YEARS,
        dates: keys::VIDEO_ALL_DATES,
        directories: keys::VIDEO_ALL_DIRECTORIES,
        unknown: keys::VIDEO_UNKNOWN,
    };

    pub fn keys(&self) -> [&'static str; 6] {
        [self.root, self.all, self.years, self.dates, self.directories, self.unknown]
    }
}

impl Layout<'_> {
    /// Photos by year and month, by date and by directory.
    pub fn import_image(&self, obj: &MediaObject, ctx: &ImportContext, store: &mut dyn Store) -> Result<Vec<ObjectId>> {
        let unknown = self.config.boxes.get(keys::IMAGE_UNKNOWN)?.title.clone();
        let details = image_details(obj, ctx, self.config, &unknown);
        self.import_visual(obj, ctx, store, &VisualBoxes::IMAGE, &details)
    }

    /// Videos by year and month, by date and by directory.
    pub fn import_video(&self, obj: &MediaObject, ctx: &ImportContext, store: &mut dyn Store) -> Result<Vec<ObjectId>> {
        let unknown = self.config.boxes.get(keys::VIDEO_UNKNOWN)?.title.clone();
        let details = video_details(obj, ctx, self.config, &unknown);
        self.import_visual(obj, ctx, store, &VisualBoxes::VIDEO, &details)
    }

    fn import_visual(
        &self,
        obj: &MediaObject,
        ctx: &ImportContext,
        store: &mut dyn Store,
        set: &VisualBoxes,
        details: &Details,
    ) -> Result<Vec<ObjectId>> {
        let boxes = prepare_chains(&set.keys(), &self.config.boxes, &[set.root, set.all])?;
        let item = obj.snapshot();
        let mut submitter = Submitter::new(store);

        submitter.submit(&item, &boxes.chain(&[set.root, set.all])?, Some(upnp_class::CONTAINER));

        let dates = &details.dates;
        if boxes.enabled(set.years) {
            let mut chain = boxes.chain(&[set.root, set.years])?.then(
                ContainerDescriptor::new(dates.year.as_str(), upnp_class::CONTAINER)
                    .with_searchable(true)
                    .with_meta(M_UPNP_DATE, dates.year.as_str()),
            );
            if let Some(month) = &dates.month {
                chain.push(ContainerDescriptor::new(month.as_str(), upnp_class::CONTAINER));
            }
            submitter.submit(&item, &chain, Some(upnp_class::CONTAINER));
        }

        if boxes.enabled(set.dates) {
            let chain = boxes
                .chain(&[set.root, set.dates])?
                .then(ContainerDescriptor::new(dates.date.as_str(), upnp_class::CONTAINER).with_searchable(true));
            submitter.submit(&item, &chain, Some(upnp_class::CONTAINER));
        }

        if boxes.enabled(set.directories) && !details.dir.is_empty() {
            let mut chain = boxes.chain(&[set.root, set.directories])?;
            let template = ContainerDescriptor::new("", upnp_class::CONTAINER);
            append_directories(&mut chain, &details.dir, &template, obj, ctx, self.config.options.parent_count);
            submitter.submit(&item, &chain, None);
        }

        Ok(submitter.finish())
    }
}
