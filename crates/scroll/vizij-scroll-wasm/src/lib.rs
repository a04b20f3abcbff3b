//! wasm-bindgen interface for vizij-scroll.
//!
//! `ScrollAnimation` is a caller-owned binding; `initSingleton` /
//! `destroySingleton` wrap a thread-local [`ScrollRegistry`] for pages that
//! want exactly one global binding. `initSingleton` hands out a
//! `ScrollAnimation` that refers to the registry's binding rather than owning
//! it, so dropping that handle on the JS side leaves the binding running.

mod host;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use vizij_scroll_core::{Binding, BindingOptions, HostError, ScrollRegistry};

pub use host::BrowserHost;

thread_local! {
    static REGISTRY: RefCell<ScrollRegistry<BrowserHost>> = RefCell::new(ScrollRegistry::new());
    /// Bumped whenever the singleton binding is replaced; handles from an older
    /// epoch no longer reach the registry.
    static SINGLETON_EPOCH: Cell<u64> = Cell::new(0);
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn parse_root(root: JsValue) -> Result<Option<Element>, JsError> {
    if jsvalue_is_undefined_or_null(&root) {
        return Ok(None);
    }
    root.dyn_into::<Element>()
        .map(Some)
        .map_err(|_| JsError::new("root must be an Element, null or undefined"))
}

fn parse_options(options: JsValue) -> Result<BindingOptions, JsError> {
    let json: serde_json::Value = if jsvalue_is_undefined_or_null(&options) {
        serde_json::Value::Null
    } else {
        swb::from_value(options).map_err(|e| JsError::new(&format!("options error: {e}")))?
    };
    BindingOptions::from_json(&json).map_err(|e| JsError::new(&format!("config error: {e}")))
}

enum Core {
    Owned(Binding<BrowserHost>),
    Singleton { epoch: u64 },
}

#[wasm_bindgen]
pub struct ScrollAnimation {
    core: Core,
    over: f64,
}

impl ScrollAnimation {
    /// Run `f` on the live binding behind this handle, if any.
    fn with_binding<R>(&self, f: impl FnOnce(Option<&Binding<BrowserHost>>) -> R) -> R {
        match &self.core {
            Core::Owned(binding) => f(Some(binding)),
            Core::Singleton { epoch } => {
                if SINGLETON_EPOCH.with(Cell::get) != *epoch {
                    return f(None);
                }
                REGISTRY.with(|registry| f(registry.borrow().active()))
            }
        }
    }
}

#[wasm_bindgen]
impl ScrollAnimation {
    /// Bind `options.animations` to the window scroll position.
    /// Example:
    ///   new ScrollAnimation(null, { over: 200, animations: { ".logo": { scale: { to: 0.5 } } } })
    #[wasm_bindgen(constructor)]
    pub fn new(root: JsValue, options: JsValue) -> Result<ScrollAnimation, JsError> {
        console_error_panic_hook::set_once();
        let root = parse_root(root)?;
        let options = parse_options(options)?;
        let host = Rc::new(BrowserHost::new()?);
        let core = Binding::create(host, root, options)
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;
        Ok(ScrollAnimation {
            over: core.over(),
            core: Core::Owned(core),
        })
    }

    /// Apply the current scroll position immediately (e.g. after first paint).
    #[wasm_bindgen]
    pub fn refresh(&self) -> Result<(), JsError> {
        self.with_binding(|binding| {
            binding
                .ok_or(HostError::Detached)
                .and_then(Binding::apply_now)
                .map(|_| ())
        })
        .map_err(|e| JsError::new(&format!("refresh error: {e}")))
    }

    /// Remove the scroll listener and cancel pending timers. On a singleton
    /// handle this also clears the global slot.
    #[wasm_bindgen]
    pub fn destroy(&self) {
        match &self.core {
            Core::Owned(binding) => binding.destroy(),
            Core::Singleton { epoch } => {
                if SINGLETON_EPOCH.with(Cell::get) == *epoch {
                    destroy_singleton();
                }
            }
        }
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.with_binding(|binding| binding.is_some_and(Binding::is_alive))
    }

    /// Binding-wide scroll distance.
    #[wasm_bindgen(getter)]
    pub fn over(&self) -> f64 {
        self.over
    }
}

/// Create the global binding unless one is already active, and return a
/// handle to it. While a binding is active the new arguments are ignored.
#[wasm_bindgen(js_name = initSingleton)]
pub fn init_singleton(root: JsValue, options: JsValue) -> Result<ScrollAnimation, JsError> {
    console_error_panic_hook::set_once();
    REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        if let Some(active) = registry.active() {
            return Ok(ScrollAnimation {
                over: active.over(),
                core: Core::Singleton {
                    epoch: SINGLETON_EPOCH.with(Cell::get),
                },
            });
        }
        let root = parse_root(root)?;
        let options = parse_options(options)?;
        let host = Rc::new(BrowserHost::new()?);
        let binding = registry
            .init(host, root, options)
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;
        let epoch = SINGLETON_EPOCH.with(|epoch| {
            epoch.set(epoch.get() + 1);
            epoch.get()
        });
        Ok(ScrollAnimation {
            over: binding.over(),
            core: Core::Singleton { epoch },
        })
    })
}

/// Tear down the global binding. No-op when none is active.
#[wasm_bindgen(js_name = destroySingleton)]
pub fn destroy_singleton() {
    REGISTRY.with(|registry| registry.borrow_mut().destroy());
}

#[wasm_bindgen(js_name = isSingletonActive)]
pub fn is_singleton_active() -> bool {
    REGISTRY.with(|registry| registry.borrow().is_active())
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
