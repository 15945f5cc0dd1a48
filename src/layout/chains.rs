//! Box resolution and chain assembly

use super::ImportContext;
use crate::config::BoxLayout;
use crate::error::ConfigError;
use crate::model::{Chain, ContainerDescriptor, MediaObject, ObjectId, Resource};
use std::collections::BTreeMap;

/// Container descriptors for the boxes a builder works with
#[derive(Debug, Clone, Default)]
pub struct ResolvedBoxes {
    entries: BTreeMap<String, (ContainerDescriptor, bool)>,
}

impl ResolvedBoxes {
    /// Descriptor of a resolved box
    pub fn get(&self, key: &str) -> Result<&ContainerDescriptor, ConfigError> {
        self.entries
            .get(key)
            .map(|(descriptor, _)| descriptor)
            .ok_or_else(|| ConfigError::MissingBox(key.to_string()))
    }

    /// Whether the box was enabled in the configuration
    pub fn enabled(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|(_, enabled)| *enabled)
    }

    /// Whether every box of a template is enabled
    pub fn all_enabled(&self, template: &[&str]) -> bool {
        template.iter().all(|key| self.enabled(key))
    }

    pub fn title(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key).map(|d| d.title.as_str())
    }

    /// Chain made of the descriptors of `template`, in order
    pub fn chain(&self, template: &[&str]) -> Result<Chain, ConfigError> {
        template.iter().map(|key| self.get(key).cloned()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve box identifiers into container descriptors.
///
/// Every identifier in `box_keys` and `chain_setup` gets a descriptor, including
/// disabled boxes: deciding whether to submit a chain that uses them is up to the
/// caller. An identifier the layout does not define is a configuration error.
pub fn prepare_chains(
    box_keys: &[&str],
    boxes: &BoxLayout,
    chain_setup: &[&str],
) -> Result<ResolvedBoxes, ConfigError> {
    let mut resolved = ResolvedBoxes::default();

    for key in box_keys.iter().chain(chain_setup) {
        if resolved.entries.contains_key(*key) {
            continue;
        }
        let entry = boxes.get(key)?;
        resolved
            .entries
            .insert(key.to_string(), (entry.descriptor(), entry.enabled));
    }

    Ok(resolved)
}

/// Resource block containers borrow for `obj`, and the id of its owner.
///
/// The physical parent container wins when it carries resources of its own.
pub fn inherited_resources<'a>(
    obj: &'a MediaObject,
    ctx: &'a ImportContext,
) -> (&'a [Resource], Option<ObjectId>) {
    match &ctx.container {
        Some(parent) if !parent.res.is_empty() => (&parent.res, Some(parent.id)),
        _ => (&obj.res, obj.id),
    }
}

/// Copy of `template` carrying the inherited resources of `obj`
pub fn with_resources(template: ContainerDescriptor, obj: &MediaObject, ctx: &ImportContext) -> ContainerDescriptor {
    let (res, ref_id) = inherited_resources(obj, ctx);
    ContainerDescriptor {
        res: res.to_vec(),
        aux: obj.aux.clone(),
        ref_id,
        ..template
    }
}

/// Append one container per directory segment to `chain`.
///
/// A segment at depth `k` inherits resources when `k >= dir.len() - parent_count - 1`.
/// The resources come from the physical parent container when it has any, from the
/// object otherwise; the leaf's `ref_id` points at whichever one supplied them.
pub fn append_directories(
    chain: &mut Chain,
    dir: &[String],
    template: &ContainerDescriptor,
    obj: &MediaObject,
    ctx: &ImportContext,
    parent_count: usize,
) {
    let threshold = dir.len() as i64 - parent_count as i64 - 1;
    let (res, ref_id) = inherited_resources(obj, ctx);

    for (depth, segment) in dir.iter().enumerate() {
        let mut container = template.titled(segment.as_str());
        if depth as i64 >= threshold {
            container.res = res.to_vec();
            container.aux = obj.aux.clone();
        }
        chain.push(container);
    }

    if let Some(leaf) = chain.last_mut() {
        leaf.ref_id = ref_id;
    }
}
