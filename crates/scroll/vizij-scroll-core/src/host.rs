//! Host capability traits.
//!
//! The core never touches a DOM directly. Adapters (wasm/browser, test fakes)
//! implement these traits and hand an `Rc<H>` to [`crate::Binding::create`].
//! All methods take `&self`; hosts are single-threaded and use interior
//! mutability where they need state.

use std::fmt::Debug;
use std::rc::Rc;

use crate::error::HostError;

/// Work deferred to the next paint opportunity. The host decides what to do
/// with a returned error (log it, surface it, ignore it).
pub type FrameCallback = Box<dyn FnOnce() -> Result<(), HostError>>;

/// One-shot timer body.
pub type TimerCallback = Box<dyn FnOnce()>;

/// Scroll listener. Invoked once per scroll event.
pub type ScrollCallback = Rc<dyn Fn()>;

/// Element handle type shared by the DOM-facing capabilities.
pub trait Dom {
    type Element: Clone + Debug + 'static;
}

/// Computed-style reads, used to infer missing tween endpoints.
pub trait StyleReader: Dom {
    /// Current computed value of `property` on `element`, if the host can supply one.
    fn computed_style_value(&self, element: &Self::Element, property: &str) -> Option<String>;
}

/// Element lookup.
pub trait ElementQuery: Dom {
    /// Element used when a binding is created without an explicit root.
    fn default_root(&self) -> Option<Self::Element>;

    /// Descendants of `root` matching `selector`, in document order.
    fn find_descendants(
        &self,
        root: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>, HostError>;
}

/// Inline style writes.
pub trait StyleWriter: Dom {
    fn set_style_property(
        &self,
        element: &Self::Element,
        property: &str,
        value: &str,
    ) -> Result<(), HostError>;

    /// Write a composite transform. Hosts that need vendor-prefixed
    /// equivalents write them here as part of the same call.
    fn set_transform(&self, element: &Self::Element, composite: &str) -> Result<(), HostError>;
}

/// Frame scheduling and one-shot timers.
pub trait Scheduler {
    type TimerHandle: Copy + Debug + 'static;

    fn schedule_frame(&self, callback: FrameCallback);
    fn set_timer(&self, callback: TimerCallback, delay_ms: u32) -> Self::TimerHandle;
    fn cancel_timer(&self, handle: Self::TimerHandle);
}

/// Scroll position and scroll event subscription.
pub trait ScrollSource {
    fn scroll_top(&self) -> f64;
    fn on_scroll(&self, callback: ScrollCallback);
    fn off_scroll(&self);
}

/// Everything a [`crate::Binding`] needs from its environment.
pub trait Host: StyleReader + ElementQuery + StyleWriter + Scheduler + ScrollSource + 'static {}

impl<T> Host for T where
    T: StyleReader + ElementQuery + StyleWriter + Scheduler + ScrollSource + 'static
{
}
