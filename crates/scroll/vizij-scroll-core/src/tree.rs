//! Animation tree: the resolved form of [`crate::Animations`].
//!
//! Built once per binding. Selector matches are fixed at build time; there is
//! no re-query on scroll and no incremental update.

use log::debug;

use crate::config::BindingOptions;
use crate::error::{ConfigError, HostError};
use crate::host::{ElementQuery, StyleReader};
use crate::resolve::{resolve, PropertyBinding, ResolveCtx};

/// Reserved selector naming the binding's root element.
pub const ROOT_SELECTOR: &str = "this";

/// One selector's matched elements and resolved properties.
#[derive(Clone, Debug)]
pub struct SelectorTarget<E> {
    pub selector: String,
    pub targets: Vec<E>,
    /// Declaration order; transform composition follows it.
    pub properties: Vec<(String, PropertyBinding)>,
}

impl<E> SelectorTarget<E> {
    /// Nothing to write: no matched elements or no properties.
    pub fn is_inert(&self) -> bool {
        self.targets.is_empty() || self.properties.is_empty()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyBinding> {
        self.properties
            .iter()
            .find_map(|(n, b)| if n == name { Some(b) } else { None })
    }

    pub fn has_transforms(&self) -> bool {
        self.properties.iter().any(|(_, b)| b.is_transform)
    }
}

#[derive(Clone, Debug)]
pub struct AnimationTree<E> {
    nodes: Vec<SelectorTarget<E>>,
}

impl<E> Default for AnimationTree<E> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<E: Clone> AnimationTree<E> {
    /// Resolve every selector and property in `options`. The first error aborts
    /// the build.
    pub fn build<Q>(host: &Q, root: &E, options: &BindingOptions) -> Result<Self, ConfigError>
    where
        Q: StyleReader<Element = E> + ElementQuery<Element = E> + ?Sized,
    {
        options.validate()?;
        let mut nodes = Vec::with_capacity(options.animations.len());
        for (selector, tweens) in &options.animations {
            let targets = if selector == ROOT_SELECTOR {
                vec![root.clone()]
            } else {
                host.find_descendants(root, selector)
                    .map_err(|e| selector_error(selector, e))?
            };
            if targets.is_empty() {
                debug!("selector '{selector}' matched no elements; node is inert");
            }

            let ctx = ResolveCtx {
                selector,
                global_over: options.over,
                transforms: &options.transforms,
                fallback: options.fallback,
            };
            let mut properties = Vec::with_capacity(tweens.len());
            for (property, tween) in tweens {
                let binding = resolve(property, tween, host, targets.first(), &ctx)?;
                properties.push((property.clone(), binding));
            }
            nodes.push(SelectorTarget {
                selector: selector.clone(),
                targets,
                properties,
            });
        }
        debug!(
            "animation tree built: {} selectors, {} properties",
            nodes.len(),
            nodes.iter().map(|n| n.properties.len()).sum::<usize>()
        );
        Ok(Self { nodes })
    }
}

impl<E> AnimationTree<E> {
    pub fn nodes(&self) -> &[SelectorTarget<E>] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SelectorTarget<E>> {
        self.nodes.iter()
    }

    pub fn get(&self, selector: &str) -> Option<&SelectorTarget<E>> {
        self.nodes.iter().find(|n| n.selector == selector)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<'a, E> IntoIterator for &'a AnimationTree<E> {
    type Item = &'a SelectorTarget<E>;
    type IntoIter = std::slice::Iter<'a, SelectorTarget<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

fn selector_error(selector: &str, err: HostError) -> ConfigError {
    let reason = match err {
        HostError::Query { reason, .. } => reason,
        other => other.to_string(),
    };
    ConfigError::Selector {
        selector: selector.to_string(),
        reason,
    }
}
