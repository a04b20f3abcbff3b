//! Deterministic in-memory host.
//!
//! Elements live in a flat arena; selectors support compound `tag.class#id`
//! forms. Timers run on a virtual clock advanced explicitly with
//! [`FakeHost::advance`]; frame callbacks queue until [`FakeHost::run_frames`].

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use indexmap::IndexMap;
use vizij_scroll_core::{
    Dom, ElementQuery, FrameCallback, HostError, Scheduler, ScrollCallback, ScrollSource,
    StyleReader, StyleWriter, TimerCallback,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FakeElement(pub usize);

/// One recorded style write.
#[derive(Clone, Debug, PartialEq)]
pub enum Write {
    Style {
        element: FakeElement,
        property: String,
        value: String,
    },
    Transform {
        element: FakeElement,
        value: String,
    },
}

impl Write {
    pub fn element(&self) -> FakeElement {
        match self {
            Write::Style { element, .. } | Write::Transform { element, .. } => *element,
        }
    }

    pub fn is_transform(&self) -> bool {
        matches!(self, Write::Transform { .. })
    }
}

struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    children: Vec<usize>,
    computed: HashMap<String, String>,
    inline: IndexMap<String, String>,
}

struct Timer {
    handle: u64,
    due: u64,
    callback: TimerCallback,
}

#[derive(Default)]
struct State {
    nodes: Vec<Node>,
    now_ms: u64,
    next_timer: u64,
    timers: Vec<Timer>,
    frames: VecDeque<FrameCallback>,
    frame_errors: Vec<HostError>,
    scroll_top: f64,
    listener: Option<ScrollCallback>,
    writes: Vec<Write>,
    fail_writes: bool,
    style_reads: usize,
    has_default_root: bool,
}

pub struct FakeHost {
    state: RefCell<State>,
}

impl FakeHost {
    /// Host with a single `body` root element.
    pub fn new() -> Rc<Self> {
        let host = Self {
            state: RefCell::new(State {
                has_default_root: true,
                next_timer: 1,
                ..State::default()
            }),
        };
        host.push_node("body", &[]);
        Rc::new(host)
    }

    fn push_node(&self, tag: &str, classes: &[&str]) -> FakeElement {
        let mut st = self.state.borrow_mut();
        st.nodes.push(Node {
            tag: tag.to_string(),
            id: None,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            children: Vec::new(),
            computed: HashMap::new(),
            inline: IndexMap::new(),
        });
        FakeElement(st.nodes.len() - 1)
    }

    pub fn root(&self) -> FakeElement {
        FakeElement(0)
    }

    pub fn append(&self, parent: FakeElement, tag: &str, classes: &[&str]) -> FakeElement {
        let el = self.push_node(tag, classes);
        self.state.borrow_mut().nodes[parent.0].children.push(el.0);
        el
    }

    pub fn set_id(&self, element: FakeElement, id: &str) {
        self.state.borrow_mut().nodes[element.0].id = Some(id.to_string());
    }

    pub fn set_computed(&self, element: FakeElement, property: &str, value: &str) {
        self.state.borrow_mut().nodes[element.0]
            .computed
            .insert(property.to_string(), value.to_string());
    }

    /// Make `default_root()` return `None`.
    pub fn clear_default_root(&self) {
        self.state.borrow_mut().has_default_root = false;
    }

    pub fn now(&self) -> u64 {
        self.state.borrow().now_ms
    }

    /// Move the scroll position without emitting an event.
    pub fn set_scroll_top(&self, pos: f64) {
        self.state.borrow_mut().scroll_top = pos;
    }

    /// Move the scroll position and emit one scroll event.
    pub fn scroll_to(&self, pos: f64) {
        let listener = {
            let mut st = self.state.borrow_mut();
            st.scroll_top = pos;
            st.listener.clone()
        };
        if let Some(listener) = listener {
            listener();
        }
    }

    /// Advance the virtual clock by `ms`, firing due timers in order.
    pub fn advance(&self, ms: u64) {
        let target = self.now() + ms;
        loop {
            let next = {
                let mut st = self.state.borrow_mut();
                let idx = st
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.handle))
                    .map(|(i, _)| i);
                idx.map(|i| {
                    let timer = st.timers.remove(i);
                    st.now_ms = timer.due;
                    timer.callback
                })
            };
            match next {
                Some(callback) => callback(),
                None => break,
            }
        }
        self.state.borrow_mut().now_ms = target;
    }

    /// Run queued frame callbacks (including ones queued while running).
    /// Returns how many ran; errors are kept in [`FakeHost::frame_errors`].
    pub fn run_frames(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.state.borrow_mut().frames.pop_front();
            let Some(frame) = next else {
                break;
            };
            ran += 1;
            if let Err(err) = frame() {
                self.state.borrow_mut().frame_errors.push(err);
            }
        }
        ran
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    pub fn has_scroll_listener(&self) -> bool {
        self.state.borrow().listener.is_some()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.state.borrow().writes.clone()
    }

    pub fn take_writes(&self) -> Vec<Write> {
        std::mem::take(&mut self.state.borrow_mut().writes)
    }

    /// Current inline style value (last write wins).
    pub fn style(&self, element: FakeElement, property: &str) -> Option<String> {
        self.state.borrow().nodes[element.0]
            .inline
            .get(property)
            .cloned()
    }

    pub fn transform(&self, element: FakeElement) -> Option<String> {
        self.style(element, "transform")
    }

    /// Make every subsequent style write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }

    pub fn frame_errors(&self) -> Vec<HostError> {
        self.state.borrow().frame_errors.clone()
    }

    pub fn style_reads(&self) -> usize {
        self.state.borrow().style_reads
    }

    fn write(&self, element: FakeElement, property: &str, value: &str) -> Result<(), HostError> {
        let mut st = self.state.borrow_mut();
        if st.fail_writes {
            return Err(HostError::Write {
                property: property.to_string(),
                reason: "writes disabled".to_string(),
            });
        }
        st.nodes[element.0]
            .inline
            .insert(property.to_string(), value.to_string());
        Ok(())
    }
}

impl Dom for FakeHost {
    type Element = FakeElement;
}

impl StyleReader for FakeHost {
    fn computed_style_value(&self, element: &FakeElement, property: &str) -> Option<String> {
        let mut st = self.state.borrow_mut();
        st.style_reads += 1;
        st.nodes[element.0].computed.get(property).cloned()
    }
}

impl ElementQuery for FakeHost {
    fn default_root(&self) -> Option<FakeElement> {
        self.state
            .borrow()
            .has_default_root
            .then_some(FakeElement(0))
    }

    fn find_descendants(
        &self,
        root: &FakeElement,
        selector: &str,
    ) -> Result<Vec<FakeElement>, HostError> {
        let compound = Compound::parse(selector).map_err(|reason| HostError::Query {
            selector: selector.to_string(),
            reason,
        })?;
        let st = self.state.borrow();
        let mut out = Vec::new();
        // Pre-order walk keeps document order.
        let mut stack: Vec<usize> = st.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            let node = &st.nodes[idx];
            if compound.matches(node) {
                out.push(FakeElement(idx));
            }
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(out)
    }
}

impl StyleWriter for FakeHost {
    fn set_style_property(
        &self,
        element: &FakeElement,
        property: &str,
        value: &str,
    ) -> Result<(), HostError> {
        self.write(*element, property, value)?;
        self.state.borrow_mut().writes.push(Write::Style {
            element: *element,
            property: property.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn set_transform(&self, element: &FakeElement, composite: &str) -> Result<(), HostError> {
        self.write(*element, "transform", composite)?;
        self.state.borrow_mut().writes.push(Write::Transform {
            element: *element,
            value: composite.to_string(),
        });
        Ok(())
    }
}

impl Scheduler for FakeHost {
    type TimerHandle = u64;

    fn schedule_frame(&self, callback: FrameCallback) {
        self.state.borrow_mut().frames.push_back(callback);
    }

    fn set_timer(&self, callback: TimerCallback, delay_ms: u32) -> u64 {
        let mut st = self.state.borrow_mut();
        let handle = st.next_timer;
        st.next_timer += 1;
        let due = st.now_ms + u64::from(delay_ms);
        st.timers.push(Timer {
            handle,
            due,
            callback,
        });
        handle
    }

    fn cancel_timer(&self, handle: u64) {
        self.state.borrow_mut().timers.retain(|t| t.handle != handle);
    }
}

impl ScrollSource for FakeHost {
    fn scroll_top(&self) -> f64 {
        self.state.borrow().scroll_top
    }

    fn on_scroll(&self, callback: ScrollCallback) {
        self.state.borrow_mut().listener = Some(callback);
    }

    fn off_scroll(&self) {
        self.state.borrow_mut().listener = None;
    }
}

/// `tag`, `.class`, `#id` and combinations thereof (`div.logo#main`).
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(selector: &str) -> Result<Self, String> {
        let s = selector.trim();
        if s.is_empty() {
            return Err("empty selector".to_string());
        }
        let mut compound = Compound {
            tag: None,
            id: None,
            classes: Vec::new(),
        };
        let mut rest = s;
        let tag_len = ident_len(rest);
        if tag_len > 0 {
            compound.tag = Some(rest[..tag_len].to_ascii_lowercase());
            rest = &rest[tag_len..];
        } else if let Some(after) = rest.strip_prefix('*') {
            rest = after;
        }
        while let Some(sigil) = rest.chars().next() {
            let tail = &rest[sigil.len_utf8()..];
            let name_len = ident_len(tail);
            if name_len == 0 || !matches!(sigil, '.' | '#') {
                return Err(format!("unsupported selector syntax at '{rest}'"));
            }
            let name = tail[..name_len].to_string();
            if sigil == '.' {
                compound.classes.push(name);
            } else {
                compound.id = Some(name);
            }
            rest = &tail[name_len..];
        }
        Ok(compound)
    }

    fn matches(&self, node: &Node) -> bool {
        self.tag.as_deref().map_or(true, |t| node.tag == t)
            && self
                .id
                .as_deref()
                .map_or(true, |id| node.id.as_deref() == Some(id))
            && self.classes.iter().all(|c| node.classes.contains(c))
    }
}

fn ident_len(s: &str) -> usize {
    s.char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        .map_or(s.len(), |(i, _)| i)
}
