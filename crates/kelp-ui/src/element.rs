//! The element tree: identity, lifecycle, and event routing.
//!
//! Every node is an [`Element`]: shared state in [`ElementBase`] plus a
//! widget-specific [`Behavior`]. Parents own their children outright;
//! upward references are [`ElementKey`]s, never pointers, so the tree can
//! never form a reference cycle.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::coords::{Rect, Vec2};
use crate::draw::Painter;
use crate::error::Error;
use crate::event::{Dispatch, EventCtx, HandlerTable, UiEvent};
use crate::modifiers;
use crate::style::Style;
use crate::text::{FontMetrics, Images};

// ── ElementKey ────────────────────────────────────────────────────────────

/// Process-unique identity of an element, stable for its lifetime.
///
/// Used for upward references (parent, event source) in place of pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementKey(u64);

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

impl ElementKey {
    pub fn next() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

// ── Lifecycle contexts ────────────────────────────────────────────────────

/// Resources available while elements establish their intrinsic size.
pub struct CreateCtx<'a> {
    pub fonts: &'a dyn FontMetrics,
    pub images: &'a dyn Images,
}

/// Resources available while a parent positions its children.
pub struct ArrangeCtx<'a> {
    /// Size of the parent's rect. Zero while the parent's own bounds are
    /// not yet established, which disables bounds checking.
    pub parent_size: Vec2,
    pub fonts: &'a dyn FontMetrics,
}

/// Per-tick state for the update pass.
#[derive(Debug, Clone, Copy)]
pub struct UpdateCtx {
    /// Absolute mouse position this frame.
    pub mouse: Vec2,
    /// Monotonic frame counter, used for timers like cursor blink.
    pub frame: u64,
}

// ── ElementBase ───────────────────────────────────────────────────────────

/// State shared by every element regardless of widget type.
pub struct ElementBase {
    pub key: ElementKey,
    /// Key of the owning container; `None` for top-level windows.
    pub parent: Option<ElementKey>,
    /// Optional markup id, unique by convention only.
    pub id: String,
    pub style: Rc<Style>,
    /// Raw attribute bag carried from the markup.
    pub attributes: HashMap<String, String>,
    /// Position relative to the parent's top-left; size in logical pixels.
    pub rect: Rect,
    /// Absolute top-left, recomputed every update pass.
    pub abs_origin: Vec2,
    pub hidden: bool,
    pub handlers: HandlerTable,
}

impl ElementBase {
    pub fn new(style: Rc<Style>, attributes: HashMap<String, String>) -> Self {
        let id = attributes.get("id").cloned().unwrap_or_default();
        Self {
            key: ElementKey::next(),
            parent: None,
            id,
            style,
            attributes,
            rect: Rect::default(),
            abs_origin: Vec2::zero(),
            hidden: false,
            handlers: HandlerTable::new(),
        }
    }

    /// Reads a `f32` attribute, e.g. explicit `width`/`height`.
    pub fn attr_f32(&self, name: &str) -> Option<f32> {
        self.attributes.get(name).and_then(|v| v.parse().ok())
    }

    /// The rect this element occupies in absolute coordinates, valid after
    /// the most recent update pass.
    #[inline]
    pub fn abs_rect(&self) -> Rect {
        Rect::from_origin_size(self.abs_origin, self.rect.size)
    }

    /// Moves the element to `pos` relative to its parent.
    ///
    /// Positions outside the parent's bounds are an error, except while the
    /// parent's bounds are still zero-sized (first-pass layout in
    /// progress), when the check is skipped.
    pub fn set_pos(&mut self, pos: Vec2, parent_size: Vec2) -> Result<(), Error> {
        let bounds_established = parent_size != Vec2::zero();
        if bounds_established {
            let target = Rect::from_origin_size(pos, self.rect.size);
            let parent = Rect::from_origin_size(Vec2::zero(), parent_size);
            if !parent.encloses(target) {
                return Err(Error::OutOfBounds { id: self.id.clone() });
            }
        }
        self.rect.origin = pos;
        Ok(())
    }

    /// Default arrange: place at `area.topleft`, then apply any
    /// layout-modifier attributes. Returns the occupied rect, which may be
    /// smaller than `area`.
    pub fn arrange(&mut self, area: Rect, ctx: &ArrangeCtx) -> Result<Rect, Error> {
        self.set_pos(area.origin, ctx.parent_size)?;
        modifiers::apply(self, area);
        Ok(self.rect)
    }
}

impl std::fmt::Debug for ElementBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementBase")
            .field("key", &self.key)
            .field("id", &self.id)
            .field("rect", &self.rect)
            .field("hidden", &self.hidden)
            .finish()
    }
}

// ── Behavior ──────────────────────────────────────────────────────────────

/// Widget-specific part of an element.
///
/// Every method receives the element's [`ElementBase`] explicitly, so a
/// behavior and its base can be borrowed independently.
pub trait Behavior {
    /// Establishes the intrinsic rect (and any internal state) from style
    /// and attributes. Called exactly once, children-first.
    fn create(&mut self, base: &mut ElementBase, ctx: &CreateCtx) -> Result<(), Error>;

    /// Positions the element within the space the parent allotted and
    /// returns the rect actually occupied.
    fn arrange(&mut self, base: &mut ElementBase, area: Rect, ctx: &ArrangeCtx) -> Result<Rect, Error> {
        base.arrange(area, ctx)
    }

    /// Per-tick state refresh. Absolute position is already up to date.
    fn update(&mut self, base: &mut ElementBase, ctx: &UpdateCtx) {
        let _ = (base, ctx);
    }

    fn render(&self, base: &ElementBase, painter: &mut Painter) {
        let _ = (base, painter);
    }

    /// Built-in reaction to an event, run after the element's children had
    /// their chance and before the user-registered handler table.
    fn on_event(&mut self, base: &mut ElementBase, event: &UiEvent, ctx: &mut EventCtx) -> Dispatch {
        let _ = (base, event, ctx);
        Dispatch::Propagate
    }

    fn children(&self) -> &[Element] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Element] {
        &mut []
    }
}

// ── Element ───────────────────────────────────────────────────────────────

/// A node in the UI tree.
pub struct Element {
    pub base: ElementBase,
    pub behavior: Box<dyn Behavior>,
}

impl Element {
    pub fn new(base: ElementBase, behavior: Box<dyn Behavior>) -> Self {
        Self { base, behavior }
    }

    #[inline]
    pub fn key(&self) -> ElementKey {
        self.base.key
    }

    pub fn create(&mut self, ctx: &CreateCtx) -> Result<(), Error> {
        self.behavior.create(&mut self.base, ctx)
    }

    pub fn arrange(&mut self, area: Rect, ctx: &ArrangeCtx) -> Result<Rect, Error> {
        self.behavior.arrange(&mut self.base, area, ctx)
    }

    /// Update pass: recompute absolute position from the parent's absolute
    /// top-left, refresh behavior state, then recurse into children.
    pub fn update(&mut self, parent_abs: Vec2, ctx: &UpdateCtx) {
        self.base.abs_origin = parent_abs + self.base.rect.origin;
        self.behavior.update(&mut self.base, ctx);

        let abs = self.base.abs_origin;
        for child in self.behavior.children_mut() {
            child.update(abs, ctx);
        }
    }

    /// Render pass: own decoration first, children on top.
    pub fn render(&self, painter: &mut Painter) {
        if self.base.hidden {
            return;
        }
        self.behavior.render(&self.base, painter);
        for child in self.behavior.children() {
            child.render(painter);
        }
    }

    /// Routes an event through this subtree: children first (front-most,
    /// i.e. last in z-order, gets the first look), then the behavior, then
    /// the registered handler table. The first consumer stops the chain;
    /// an unconsumed event bubbles to the caller.
    pub fn dispatch(&mut self, event: &UiEvent, ctx: &mut EventCtx) -> Dispatch {
        if self.base.hidden {
            return Dispatch::Propagate;
        }
        for child in self.behavior.children_mut().iter_mut().rev() {
            if child.dispatch(event, ctx).is_consumed() {
                return Dispatch::Consumed;
            }
        }
        if self.behavior.on_event(&mut self.base, event, ctx).is_consumed() {
            return Dispatch::Consumed;
        }
        self.base.handlers.process(event, ctx)
    }

    /// Whether `key` identifies this element or any descendant.
    pub fn contains_key(&self, key: ElementKey) -> bool {
        if self.base.key == key {
            return true;
        }
        self.behavior.children().iter().any(|c| c.contains_key(key))
    }

    /// Collects every key in this subtree, children before parents, for
    /// teardown notification order.
    pub fn collect_keys(&self, out: &mut Vec<ElementKey>) {
        for child in self.behavior.children() {
            child.collect_keys(out);
        }
        out.push(self.base.key);
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element").field("base", &self.base).finish()
    }
}
