//! Binding: one root element, its animation tree and the scroll throttle.
//!
//! Lifecycle: [`Binding::create`] builds the tree and subscribes to scroll
//! events; [`Binding::destroy`] (or drop) unsubscribes and cancels pending
//! timers. Host callbacks only hold weak references plus a liveness check, so
//! a frame or timer that fires after teardown is a no-op.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, trace};

use crate::apply::{apply, FrameStats};
use crate::config::BindingOptions;
use crate::error::{ConfigError, HostError};
use crate::host::Host;
use crate::throttle::{Decision, ScrollThrottle, ThrottleConfig, ThrottleState, Trigger};
use crate::tree::AnimationTree;

pub struct Binding<H: Host> {
    inner: Rc<Inner<H>>,
}

struct Inner<H: Host> {
    host: Rc<H>,
    root: H::Element,
    over: f64,
    tree: AnimationTree<H::Element>,
    delays: ThrottleConfig,
    throttle: RefCell<ScrollThrottle<H::TimerHandle>>,
    alive: Cell<bool>,
}

impl<H: Host> Binding<H> {
    /// Build the tree for `root` (or the host's default root) and start
    /// listening to scroll events. Configuration errors abort construction.
    pub fn create(
        host: Rc<H>,
        root: Option<H::Element>,
        options: BindingOptions,
    ) -> Result<Self, ConfigError> {
        let root = match root {
            Some(root) => root,
            None => host.default_root().ok_or(ConfigError::MissingRoot)?,
        };
        let tree = AnimationTree::build(&*host, &root, &options)?;

        let inner = Rc::new(Inner {
            host: Rc::clone(&host),
            root,
            over: options.over,
            tree,
            delays: options.throttle,
            throttle: RefCell::new(ScrollThrottle::new()),
            alive: Cell::new(true),
        });

        let weak = Rc::downgrade(&inner);
        host.on_scroll(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                Inner::handle(&inner, Trigger::Scroll);
            }
        }));
        debug!("scroll binding created (over = {})", options.over);
        Ok(Self { inner })
    }

    pub fn root(&self) -> &H::Element {
        &self.inner.root
    }

    /// Binding-wide scroll distance.
    pub fn over(&self) -> f64 {
        self.inner.over
    }

    pub fn tree(&self) -> &AnimationTree<H::Element> {
        &self.inner.tree
    }

    pub fn host(&self) -> &Rc<H> {
        &self.inner.host
    }

    pub fn state(&self) -> ThrottleState {
        self.inner.throttle.borrow().state()
    }

    /// (accepted, dropped) trigger counts.
    pub fn trigger_counts(&self) -> (u64, u64) {
        let th = self.inner.throttle.borrow();
        (th.accepted(), th.dropped())
    }

    pub fn is_alive(&self) -> bool {
        self.inner.alive.get()
    }

    /// Apply the tree at the current scroll position right away, bypassing the
    /// throttle and the frame scheduler.
    pub fn apply_now(&self) -> Result<FrameStats, HostError> {
        if !self.is_alive() {
            return Err(HostError::Detached);
        }
        let pos = self.inner.host.scroll_top();
        apply(&self.inner.tree, pos, &*self.inner.host)
    }

    /// Unsubscribe from scroll events and cancel pending timers. Idempotent.
    pub fn destroy(&self) {
        self.inner.teardown();
    }
}

impl<H: Host> Drop for Binding<H> {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

impl<H: Host> std::fmt::Debug for Binding<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("root", &self.inner.root)
            .field("over", &self.inner.over)
            .field("selectors", &self.inner.tree.len())
            .field("state", &self.state())
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl<H: Host> Inner<H> {
    fn handle(this: &Rc<Self>, trigger: Trigger) {
        if !this.alive.get() {
            return;
        }
        let decision = this.throttle.borrow_mut().trigger(trigger);
        let Decision::Accepted {
            cancel_trailing,
            arm_trailing,
        } = decision
        else {
            trace!("{trigger:?} dropped while throttled");
            return;
        };

        let pos = this.host.scroll_top();
        trace!("{trigger:?} accepted at scroll position {pos}");
        Self::schedule_apply(this, pos);

        let weak = Rc::downgrade(this);
        let release = this.host.set_timer(
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.throttle.borrow_mut().release();
                }
            }),
            this.delays.window_ms,
        );
        this.throttle.borrow_mut().set_release_timer(release);

        if arm_trailing {
            if let Some(handle) = cancel_trailing {
                this.host.cancel_timer(handle);
            }
            let weak = Rc::downgrade(this);
            let trailing = this.host.set_timer(
                Box::new(move || Self::fire_trailing(&weak)),
                this.delays.trailing_ms,
            );
            this.throttle.borrow_mut().set_trailing_timer(trailing);
        }
    }

    fn fire_trailing(weak: &Weak<Self>) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        inner.throttle.borrow_mut().trailing_fired();
        Self::handle(&inner, Trigger::Trailing);
    }

    /// One frame callback per accepted trigger.
    fn schedule_apply(this: &Rc<Self>, pos: f64) {
        let weak = Rc::downgrade(this);
        this.host.schedule_frame(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return Ok(());
            };
            if !inner.alive.get() {
                return Ok(());
            }
            let stats = apply(&inner.tree, pos, &*inner.host)?;
            trace!(
                "frame applied at {pos}: {} style writes, {} transform writes",
                stats.style_writes,
                stats.transform_writes
            );
            Ok(())
        }));
    }

    fn teardown(&self) {
        if !self.alive.replace(false) {
            return;
        }
        self.host.off_scroll();
        let pending = self.throttle.borrow_mut().reset();
        for handle in pending.into_iter().flatten() {
            self.host.cancel_timer(handle);
        }
        debug!("scroll binding destroyed");
    }
}
