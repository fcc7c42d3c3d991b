//! Events, handler tables, and the tri-state dispatch protocol.

use std::collections::HashMap;

use crate::coords::Vec2;
use crate::element::ElementKey;
use crate::text::FontMetrics;

// ── Input vocabulary ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Named (non-text) keys the toolkit reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
    Enter,
    Escape,
}

// ── UiEvent ───────────────────────────────────────────────────────────────

/// Events routed through the widget tree.
///
/// The first group is raw input injected by the host; the second group is
/// semantic events emitted by controls and re-dispatched from the root so
/// any element (or the host) can observe them.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Mouse button pressed at `pos` (absolute logical pixels).
    MouseDown { pos: Vec2, button: MouseButton },
    /// Mouse button released at `pos`.
    MouseUp { pos: Vec2, button: MouseButton },
    /// Mouse moved to `pos`; `delta` is movement since the previous event.
    MouseMove { pos: Vec2, delta: Vec2 },
    /// Named key pressed.
    KeyPress { key: Key },
    /// Committed text input (one or more characters).
    TextInput { text: String },

    /// A button was pressed and released over itself.
    ButtonClick { id: String, source: ElementKey },
    /// A checkbox or radio button changed state.
    ///
    /// `group` is the key of the control's parent container; radio buttons
    /// use it to scope mutual exclusion to their siblings.
    CheckChanged {
        id: String,
        source: ElementKey,
        group: Option<ElementKey>,
        checked: bool,
        radio: bool,
    },
    /// A title bar is dragging its window by `delta`.
    MoveWindow { source: ElementKey, delta: Vec2 },
    /// A title bar close button asked for its window to be torn down.
    CloseWindow { source: ElementKey },
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::MouseDown { .. } => EventKind::MouseDown,
            UiEvent::MouseUp { .. } => EventKind::MouseUp,
            UiEvent::MouseMove { .. } => EventKind::MouseMove,
            UiEvent::KeyPress { .. } => EventKind::KeyPress,
            UiEvent::TextInput { .. } => EventKind::TextInput,
            UiEvent::ButtonClick { .. } => EventKind::ButtonClick,
            UiEvent::CheckChanged { .. } => EventKind::CheckChanged,
            UiEvent::MoveWindow { .. } => EventKind::MoveWindow,
            UiEvent::CloseWindow { .. } => EventKind::CloseWindow,
        }
    }

    /// The id carried by semantic events, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            UiEvent::ButtonClick { id, .. } | UiEvent::CheckChanged { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Discriminant used to index handler tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseDown,
    MouseUp,
    MouseMove,
    KeyPress,
    TextInput,
    ButtonClick,
    CheckChanged,
    MoveWindow,
    CloseWindow,
}

// ── Dispatch results ──────────────────────────────────────────────────────

/// What a single registered handler reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The handler's filter did not match; try the next handler.
    NoMatch,
    /// The handler matched but declined; stop this element's chain and let
    /// the event keep bubbling.
    Skip,
    /// The handler consumed the event.
    Handled,
}

/// What routing through an element (handlers plus built-in behavior) yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Stop: no ancestor sees the event.
    Consumed,
    /// Keep bubbling toward the root.
    Propagate,
}

impl Dispatch {
    #[inline]
    pub fn is_consumed(self) -> bool {
        self == Dispatch::Consumed
    }
}

// ── EventCtx ──────────────────────────────────────────────────────────────

/// Per-dispatch context handed to handlers and behaviors.
pub struct EventCtx<'a> {
    pub fonts: &'a dyn FontMetrics,
    emitted: Vec<UiEvent>,
}

impl<'a> EventCtx<'a> {
    pub fn new(fonts: &'a dyn FontMetrics) -> Self {
        Self { fonts, emitted: Vec::new() }
    }

    /// Queues a semantic event for re-dispatch from the root after the
    /// current event finishes routing.
    pub fn emit(&mut self, event: UiEvent) {
        self.emitted.push(event);
    }

    /// Drains the queued semantic events.
    pub fn take_emitted(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.emitted)
    }
}

// ── HandlerTable ──────────────────────────────────────────────────────────

type Filter = Box<dyn Fn(&UiEvent) -> bool>;
type Callback = Box<dyn FnMut(&UiEvent, &mut EventCtx) -> Outcome>;

struct HandlerEntry {
    filter: Option<Filter>,
    callback: Callback,
}

/// Per-element table of registered event handlers.
///
/// Handlers for a kind run in registration order. The first whose filter
/// matches decides: `Handled` consumes the event, `Skip` ends the chain
/// without consuming, and `NoMatch` falls through to the next entry.
#[derive(Default)]
pub struct HandlerTable {
    entries: HashMap<EventKind, Vec<HandlerEntry>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for `kind` with no filter.
    pub fn add(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&UiEvent, &mut EventCtx) -> Outcome + 'static,
    ) {
        self.add_filtered_inner(kind, None, Box::new(callback));
    }

    /// Registers a handler that only runs when `filter` accepts the event.
    pub fn add_filtered(
        &mut self,
        kind: EventKind,
        filter: impl Fn(&UiEvent) -> bool + 'static,
        callback: impl FnMut(&UiEvent, &mut EventCtx) -> Outcome + 'static,
    ) {
        self.add_filtered_inner(kind, Some(Box::new(filter)), Box::new(callback));
    }

    fn add_filtered_inner(&mut self, kind: EventKind, filter: Option<Filter>, callback: Callback) {
        self.entries
            .entry(kind)
            .or_default()
            .push(HandlerEntry { filter, callback });
    }

    /// Runs the handler chain for `event`.
    pub fn process(&mut self, event: &UiEvent, ctx: &mut EventCtx) -> Dispatch {
        let Some(chain) = self.entries.get_mut(&event.kind()) else {
            return Dispatch::Propagate;
        };
        for entry in chain.iter_mut() {
            if let Some(filter) = &entry.filter {
                if !filter(event) {
                    continue;
                }
            }
            match (entry.callback)(event, ctx) {
                Outcome::NoMatch => continue,
                Outcome::Skip => return Dispatch::Propagate,
                Outcome::Handled => return Dispatch::Consumed,
            }
        }
        Dispatch::Propagate
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|v| v.is_empty())
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count: usize = self.entries.values().map(|v| v.len()).sum();
        f.debug_struct("HandlerTable").field("handlers", &count).finish()
    }
}

// ── filters ───────────────────────────────────────────────────────────────

pub mod filters {
    use super::UiEvent;

    /// Matches semantic events whose `id` equals `id`.
    pub fn object_id(id: impl Into<String>) -> impl Fn(&UiEvent) -> bool {
        let id = id.into();
        move |event| event.id() == Some(id.as_str())
    }
}
