//! Vizij Scroll Core (host-agnostic)
//!
//! Binds CSS property values and transform functions to a scroll position.
//! A declarative `selector -> property -> tween` map is resolved once into an
//! [`AnimationTree`] of closed-form scroll-to-value functions; scroll events are
//! throttled to the display-frame cadence and every accepted event applies the
//! tree through the host's style writer, merging transform functions into one
//! composite transform per element.
//!
//! The DOM, timers, frame scheduling and scroll subscription are host
//! capabilities (see [`host`]); adapters (wasm/browser, test fakes) implement them.

pub mod apply;
pub mod binding;
pub mod config;
pub mod error;
pub mod host;
pub mod interp;
pub mod registry;
pub mod resolve;
pub mod throttle;
pub mod transform;
pub mod tree;

// Re-exports for consumers (adapters)
pub use apply::{apply, composite_transform, FrameStats};
pub use binding::Binding;
pub use config::{Animations, BindingOptions, FallbackPolicy, PropertyTweens, DEFAULT_OVER};
pub use error::{ConfigError, HostError};
pub use host::{
    Dom, ElementQuery, FrameCallback, Host, Scheduler, ScrollCallback, ScrollSource,
    StyleReader, StyleWriter, TimerCallback,
};
pub use interp::value_at;
pub use registry::ScrollRegistry;
pub use resolve::{resolve, PropertyBinding, ResolveCtx, Tween};
pub use throttle::{Decision, ScrollThrottle, ThrottleConfig, ThrottleState, Trigger};
pub use transform::TransformRegistry;
pub use tree::{AnimationTree, SelectorTarget, ROOT_SELECTOR};
