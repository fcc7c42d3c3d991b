//! Composite widgets: templated fragments with content splicing.
//!
//! A composite tag (Frame, TitleBar, or a user-registered one) does not
//! build its markup children directly. Instead it loads a template
//! document and builds *that*; wherever the template contains a
//! `<Content>` placeholder, the next unconsumed caller-supplied node is
//! spliced in. Placeholders may constrain the node's tag with `type` and
//! may be marked `optional="true"`, in which case a missing or mismatched
//! node yields no widget instead of an error.

use std::collections::HashMap;
use std::path::PathBuf;

use kelp_xml::Node;

use crate::container::{Axis, Container};
use crate::coords::Vec2;
use crate::draw::Painter;
use crate::element::{Behavior, CreateCtx, Element, ElementBase, UpdateCtx};
use crate::error::Error;
use crate::event::{Dispatch, EventCtx, MouseButton, UiEvent};

// ── Built-in templates ────────────────────────────────────────────────────

/// Template for [`TitleBar`]: the window buttons, packed horizontally with
/// the close button pushed to the right edge. The caption is painted by
/// the behavior itself, not a child widget.
pub const TITLEBAR_XML: &str = r#"<kelp>
    <Button id="minimize">-</Button>
    <Button id="maximize">+</Button>
    <Button id="close" align="right">x</Button>
</kelp>"#;

/// Template for a Frame: a title bar above a panel holding the caller's
/// content. The untyped optional placeholders accept whatever widgets the
/// invocation supplies, in order.
pub const FRAME_XML: &str = r#"<kelp>
    <TitleBar expand="width"/>
    <Panel expand="width">
        <Content optional="true"/>
        <Content optional="true"/>
        <Content optional="true"/>
    </Panel>
</kelp>"#;

// ── Templates ─────────────────────────────────────────────────────────────

/// Template resolution: registered documents first, then the configured
/// search paths. Resolved files are cached.
pub struct Templates {
    search_paths: Vec<PathBuf>,
    docs: HashMap<String, Node>,
}

impl Templates {
    /// A registry pre-loaded with the built-in frame and title bar
    /// templates.
    pub fn new() -> Result<Self, Error> {
        let mut t = Self { search_paths: Vec::new(), docs: HashMap::new() };
        t.register("frame.xml", FRAME_XML)?;
        t.register("titlebar.xml", TITLEBAR_XML)?;
        Ok(t)
    }

    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(path.into());
    }

    /// Parses `src` and registers its root under `name`, replacing any
    /// previous registration.
    pub fn register(&mut self, name: &str, src: &str) -> Result<(), Error> {
        let doc = kelp_xml::parse_str(src).map_err(|source| Error::Parse {
            file: name.to_string(),
            source,
        })?;
        if doc.root.name != "kelp" {
            return Err(Error::UnknownRoot {
                file: name.to_string(),
                found: doc.root.name,
            });
        }
        self.docs.insert(name.to_string(), doc.root);
        Ok(())
    }

    /// Resolves a template by name, loading it from the search paths on
    /// first use.
    pub fn resolve(&mut self, name: &str) -> Result<Node, Error> {
        if let Some(node) = self.docs.get(name) {
            return Ok(node.clone());
        }
        for dir in &self.search_paths {
            let path = dir.join(name);
            if let Ok(src) = std::fs::read_to_string(&path) {
                self.register(name, &src)?;
                return Ok(self.docs[name].clone());
            }
        }
        Err(Error::MissingTemplate { name: name.to_string() })
    }
}

// ── TitleBar ──────────────────────────────────────────────────────────────

/// The draggable bar at the top of a Frame.
///
/// Wraps a horizontal container of window buttons from [`TITLEBAR_XML`].
/// Dragging emits [`UiEvent::MoveWindow`]; a click on the template's
/// `close` button emits [`UiEvent::CloseWindow`]. Both are intercepted by
/// the scene, which knows which window this bar belongs to. Minimize and
/// maximize clicks are left to bubble out to the host.
pub struct TitleBar {
    bar: Container,
    caption: String,
    dragging: bool,
}

impl TitleBar {
    pub fn new(caption: impl Into<String>, buttons: Vec<Element>) -> Self {
        Self {
            bar: Container::new(Axis::Horizontal, true, buttons),
            caption: caption.into(),
            dragging: false,
        }
    }

    fn owns(&self, key: crate::element::ElementKey) -> bool {
        self.bar.children().iter().any(|c| c.contains_key(key))
    }
}

impl Behavior for TitleBar {
    fn create(&mut self, base: &mut ElementBase, ctx: &CreateCtx) -> Result<(), Error> {
        self.bar.create(base, ctx)?;

        // Leave room for the caption to the left of the buttons.
        let style = base.style.clone();
        let caption_w = ctx
            .fonts
            .measure(&self.caption, &style.font_family, style.font_height)
            .x;
        base.rect.size.x += caption_w + style.margin;
        Ok(())
    }

    fn update(&mut self, base: &mut ElementBase, ctx: &UpdateCtx) {
        self.bar.update(base, ctx);
    }

    fn on_event(&mut self, base: &mut ElementBase, event: &UiEvent, ctx: &mut EventCtx) -> Dispatch {
        match event {
            UiEvent::MouseDown { pos, button: MouseButton::Left } => {
                if !base.hidden && base.abs_rect().contains(*pos) {
                    self.dragging = true;
                    return Dispatch::Consumed;
                }
                Dispatch::Propagate
            }
            UiEvent::MouseUp { button: MouseButton::Left, .. } => {
                self.dragging = false;
                Dispatch::Propagate
            }
            UiEvent::MouseMove { delta, .. } if self.dragging => {
                ctx.emit(UiEvent::MoveWindow { source: base.key, delta: *delta });
                Dispatch::Consumed
            }
            UiEvent::ButtonClick { id, source } if self.owns(*source) => match id.as_str() {
                "close" => {
                    ctx.emit(UiEvent::CloseWindow { source: base.key });
                    Dispatch::Consumed
                }
                // Minimize and maximize are host policy; let them bubble.
                _ => Dispatch::Propagate,
            },
            _ => Dispatch::Propagate,
        }
    }

    fn render(&self, base: &ElementBase, painter: &mut Painter) {
        self.bar.render(base, painter);

        let style = &base.style;
        let rect = base.abs_rect();
        let text_size = painter.measure(&self.caption, &style.font_family, style.font_height);
        painter.text(
            Vec2::new(
                rect.left() + style.padding,
                rect.top() + (rect.height() - text_size.y) / 2.0,
            ),
            &self.caption,
            &style.font_family,
            style.font_height,
            style.font_color,
        );
    }

    fn children(&self) -> &[Element] {
        self.bar.children()
    }

    fn children_mut(&mut self) -> &mut [Element] {
        self.bar.children_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Button;
    use crate::text::{BoxMetrics, NoImages};
    use std::collections::HashMap;

    fn titlebar() -> Element {
        let close = {
            let base = ElementBase::new(
                crate::style::lookup("default").unwrap(),
                HashMap::from([("id".to_string(), "close".to_string())]),
            );
            Element::new(base, Box::new(Button::new("x")))
        };
        let base = ElementBase::new(crate::style::lookup("titlebar").unwrap(), HashMap::new());
        let mut el = Element::new(base, Box::new(TitleBar::new("Demo", vec![close])));
        let fonts = BoxMetrics::new();
        let images = NoImages;
        el.create(&CreateCtx { fonts: &fonts, images: &images }).unwrap();
        el.update(Vec2::zero(), &UpdateCtx { mouse: Vec2::zero(), frame: 0 });
        el
    }

    #[test]
    fn drag_emits_move_window() {
        let mut el = titlebar();
        let fonts = BoxMetrics::new();
        let mut ctx = EventCtx::new(&fonts);

        // Press on the bar itself, past the button.
        let pos = Vec2::new(el.base.rect.width() - 2.0, 2.0);
        el.dispatch(&UiEvent::MouseDown { pos, button: MouseButton::Left }, &mut ctx);
        el.dispatch(
            &UiEvent::MouseMove { pos: pos + Vec2::new(4.0, 6.0), delta: Vec2::new(4.0, 6.0) },
            &mut ctx,
        );

        let emitted = ctx.take_emitted();
        assert!(matches!(
            &emitted[..],
            [UiEvent::MoveWindow { delta, .. }] if *delta == Vec2::new(4.0, 6.0)
        ));
    }

    #[test]
    fn release_stops_the_drag() {
        let mut el = titlebar();
        let fonts = BoxMetrics::new();
        let mut ctx = EventCtx::new(&fonts);

        let pos = Vec2::new(el.base.rect.width() - 2.0, 2.0);
        el.dispatch(&UiEvent::MouseDown { pos, button: MouseButton::Left }, &mut ctx);
        el.dispatch(
            &UiEvent::MouseUp { pos: Vec2::new(900.0, 900.0), button: MouseButton::Left },
            &mut ctx,
        );
        ctx.take_emitted().clear();

        el.dispatch(
            &UiEvent::MouseMove { pos, delta: Vec2::new(1.0, 1.0) },
            &mut ctx,
        );
        assert!(ctx.take_emitted().is_empty());
    }

    #[test]
    fn close_click_from_own_button_emits_close_window() {
        let mut el = titlebar();
        let bar_key = el.key();
        let button_key = el.behavior.children()[0].key();
        let fonts = BoxMetrics::new();
        let mut ctx = EventCtx::new(&fonts);

        let event = UiEvent::ButtonClick { id: "close".to_string(), source: button_key };
        assert_eq!(el.dispatch(&event, &mut ctx), Dispatch::Consumed);
        assert!(matches!(
            &ctx.take_emitted()[..],
            [UiEvent::CloseWindow { source }] if *source == bar_key
        ));
    }

    #[test]
    fn foreign_close_click_is_ignored() {
        let mut el = titlebar();
        let fonts = BoxMetrics::new();
        let mut ctx = EventCtx::new(&fonts);

        let event = UiEvent::ButtonClick {
            id: "close".to_string(),
            source: crate::element::ElementKey::next(),
        };
        assert_eq!(el.dispatch(&event, &mut ctx), Dispatch::Propagate);
        assert!(ctx.take_emitted().is_empty());
    }

    #[test]
    fn builtin_templates_resolve() {
        let mut templates = Templates::new().unwrap();
        let bar = templates.resolve("titlebar.xml").unwrap();
        assert_eq!(bar.elements().count(), 3);
        assert!(templates.resolve("missing.xml").is_err());
    }
}
