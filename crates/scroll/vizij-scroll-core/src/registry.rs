//! Caller-owned single-binding slot.
//!
//! Replaces module-level singleton state: the composing application owns one
//! `ScrollRegistry` and at most one binding is active in it at a time.

use std::rc::Rc;

use log::debug;

use crate::binding::Binding;
use crate::config::BindingOptions;
use crate::error::ConfigError;
use crate::host::Host;

pub struct ScrollRegistry<H: Host> {
    active: Option<Binding<H>>,
}

impl<H: Host> Default for ScrollRegistry<H> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<H: Host> ScrollRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the binding, or return the active one unchanged (the new
    /// `root`/`options` are ignored in that case).
    pub fn init(
        &mut self,
        host: Rc<H>,
        root: Option<H::Element>,
        options: BindingOptions,
    ) -> Result<&Binding<H>, ConfigError> {
        let binding = match self.active.take() {
            Some(existing) => {
                debug!("scroll binding already active; ignoring new options");
                existing
            }
            None => Binding::create(host, root, options)?,
        };
        let binding: &Binding<H> = self.active.insert(binding);
        Ok(binding)
    }

    pub fn active(&self) -> Option<&Binding<H>> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Destroy and clear the active binding. No-op when empty.
    pub fn destroy(&mut self) {
        if let Some(binding) = self.active.take() {
            binding.destroy();
        }
    }
}
