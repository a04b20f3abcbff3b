//! Frame application: evaluate the tree at a scroll position and write styles.
//!
//! Non-transform properties are written one by one. Transform properties of a
//! selector are merged, in declaration order, into one composite string
//! (`"rotate(10deg) scale(0.5) "`) written once per element.

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::host::StyleWriter;
use crate::resolve::PropertyBinding;
use crate::tree::AnimationTree;

/// Write counts for one applied frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    pub style_writes: usize,
    pub transform_writes: usize,
}

/// Composite transform for `properties` at `scroll_pos`, or `None` when no
/// property is a transform function. Entries are space-separated with a
/// trailing space.
pub fn composite_transform(
    properties: &[(String, PropertyBinding)],
    scroll_pos: f64,
) -> Option<String> {
    let mut out = String::new();
    for (name, binding) in properties.iter().filter(|(_, b)| b.is_transform) {
        out.push_str(name);
        out.push('(');
        out.push_str(&binding.format_at(scroll_pos));
        out.push_str(") ");
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Apply every node of `tree` at `scroll_pos`. The first host error aborts the
/// frame and is returned as-is.
pub fn apply<W>(
    tree: &AnimationTree<W::Element>,
    scroll_pos: f64,
    writer: &W,
) -> Result<FrameStats, HostError>
where
    W: StyleWriter + ?Sized,
{
    let mut stats = FrameStats::default();
    for node in tree {
        if node.is_inert() {
            continue;
        }
        let styles: Vec<(&str, String)> = node
            .properties
            .iter()
            .filter(|(_, b)| !b.is_transform)
            .map(|(name, b)| (name.as_str(), b.format_at(scroll_pos)))
            .collect();
        let transform = composite_transform(&node.properties, scroll_pos);

        for element in &node.targets {
            for (property, value) in &styles {
                writer.set_style_property(element, property, value)?;
                stats.style_writes += 1;
            }
            if let Some(composite) = &transform {
                writer.set_transform(element, composite)?;
                stats.transform_writes += 1;
            }
        }
    }
    Ok(stats)
}
