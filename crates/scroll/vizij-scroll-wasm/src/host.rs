//! Browser implementation of the scroll host capabilities.

use std::cell::RefCell;

use js_sys::Function;
use vizij_scroll_core::{
    Dom, ElementQuery, FrameCallback, HostError, Scheduler, ScrollCallback, ScrollSource,
    StyleReader, StyleWriter, TimerCallback,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element, HtmlElement, Window};

/// Style properties the composite transform is written to.
const TRANSFORM_PROPERTIES: [&str; 2] = ["-webkit-transform", "transform"];

pub struct BrowserHost {
    window: Window,
    document: Document,
    listener: RefCell<Option<Closure<dyn Fn()>>>,
}

impl BrowserHost {
    pub fn new() -> Result<Self, JsError> {
        let window = web_sys::window().ok_or_else(|| JsError::new("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("window has no document"))?;
        Ok(Self {
            window,
            document,
            listener: RefCell::new(None),
        })
    }
}

/// `paddingTop` -> `padding-top`; names already in kebab case pass through.
pub(crate) fn kebab_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn inline_style(
    element: &Element,
    property: &str,
) -> Result<web_sys::CssStyleDeclaration, HostError> {
    element
        .dyn_ref::<HtmlElement>()
        .map(HtmlElement::style)
        .ok_or_else(|| HostError::Write {
            property: property.to_string(),
            reason: "element has no inline style".to_string(),
        })
}

impl Dom for BrowserHost {
    type Element = Element;
}

impl StyleReader for BrowserHost {
    fn computed_style_value(&self, element: &Element, property: &str) -> Option<String> {
        let style = self.window.get_computed_style(element).ok()??;
        style
            .get_property_value(&kebab_case(property))
            .ok()
            .filter(|v| !v.is_empty())
    }
}

impl ElementQuery for BrowserHost {
    fn default_root(&self) -> Option<Element> {
        self.document
            .body()
            .map(Element::from)
            .or_else(|| self.document.document_element())
    }

    fn find_descendants(&self, root: &Element, selector: &str) -> Result<Vec<Element>, HostError> {
        let list = root
            .query_selector_all(selector)
            .map_err(|e| HostError::Query {
                selector: selector.to_string(),
                reason: describe(&e),
            })?;
        Ok((0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }
}

impl StyleWriter for BrowserHost {
    fn set_style_property(
        &self,
        element: &Element,
        property: &str,
        value: &str,
    ) -> Result<(), HostError> {
        let name = kebab_case(property);
        inline_style(element, &name)?
            .set_property(&name, value)
            .map_err(|e| HostError::Write {
                property: name,
                reason: describe(&e),
            })
    }

    fn set_transform(&self, element: &Element, composite: &str) -> Result<(), HostError> {
        let style = inline_style(element, "transform")?;
        for name in TRANSFORM_PROPERTIES {
            style
                .set_property(name, composite)
                .map_err(|e| HostError::Write {
                    property: name.to_string(),
                    reason: describe(&e),
                })?;
        }
        Ok(())
    }
}

impl Scheduler for BrowserHost {
    type TimerHandle = i32;

    fn schedule_frame(&self, callback: FrameCallback) {
        let frame = Closure::once_into_js(move || {
            if let Err(err) = callback() {
                console::error_1(&format!("vizij-scroll frame failed: {err}").into());
            }
        });
        if let Err(err) = self.window.request_animation_frame(frame.unchecked_ref()) {
            log::warn!("requestAnimationFrame failed: {}", describe(&err));
        }
    }

    fn set_timer(&self, callback: TimerCallback, delay_ms: u32) -> i32 {
        let timer = Closure::once_into_js(move || callback());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(timer.unchecked_ref(), delay)
            .unwrap_or_else(|err| {
                log::warn!("setTimeout failed: {}", describe(&err));
                0
            })
    }

    fn cancel_timer(&self, handle: i32) {
        self.window.clear_timeout_with_handle(handle);
    }
}

impl ScrollSource for BrowserHost {
    fn scroll_top(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn on_scroll(&self, callback: ScrollCallback) {
        self.off_scroll();
        let listener = Closure::<dyn Fn()>::new(move || callback());
        let function: &Function = listener.as_ref().unchecked_ref();
        if let Err(err) = self.window.add_event_listener_with_callback("scroll", function) {
            log::warn!("failed to add scroll listener: {}", describe(&err));
            return;
        }
        *self.listener.borrow_mut() = Some(listener);
    }

    fn off_scroll(&self) {
        if let Some(listener) = self.listener.borrow_mut().take() {
            let function: &Function = listener.as_ref().unchecked_ref();
            if let Err(err) = self
                .window
                .remove_event_listener_with_callback("scroll", function)
            {
                log::warn!("failed to remove scroll listener: {}", describe(&err));
            }
        }
    }
}
