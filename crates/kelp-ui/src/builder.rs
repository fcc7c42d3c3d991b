//! Building widget trees from parsed documents.
//!
//! Tag names resolve against an ordered registry of factories: controls
//! first, then containers, then composites, mirroring the search order of
//! the markup dialect. Unknown tags are a parse error naming the file and
//! tag.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use kelp_xml::Node;

use crate::composite::{Templates, TitleBar};
use crate::container::{Axis, Container};
use crate::controls::{Button, Checkbox, Icon, Label, Radiobutton, TextBox};
use crate::coords::{Rect, Vec2};
use crate::element::{ArrangeCtx, CreateCtx, Element, ElementBase};
use crate::error::Error;
use crate::style::Style;
use crate::text::{FontMetrics, Images};

/// Position given to top-level windows that carry no explicit `x`/`y`.
const WINDOW_ORIGIN: Vec2 = Vec2::new(10.0, 10.0);

/// Builds one widget from its markup node. `Ok(None)` means the node
/// deliberately produced no widget (an unsatisfied optional placeholder).
pub type WidgetFactory = fn(&mut TreeBuilder, &Node) -> Result<Option<Element>, Error>;

// ── WidgetRegistry ────────────────────────────────────────────────────────

/// Ordered tag-name → factory table. Lookup scans in insertion order, so
/// earlier registrations shadow later ones.
pub struct WidgetRegistry {
    entries: Vec<(String, WidgetFactory)>,
}

impl WidgetRegistry {
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// The built-in widget set: controls, then containers, then
    /// composites.
    pub fn with_builtins() -> Self {
        let mut r = Self::empty();
        // definitions
        r.register("Style", build_style);
        // controls
        r.register("Button", build_button);
        r.register("Checkbox", build_checkbox);
        r.register("Radiobutton", build_radiobutton);
        r.register("Label", build_label);
        r.register("TextBox", build_textbox);
        r.register("Icon", build_icon);
        // containers
        r.register("Container", build_container);
        r.register("HrContainer", build_hr_container);
        r.register("Sizer", build_sizer);
        r.register("HrSizer", build_hr_sizer);
        r.register("Panel", build_panel);
        // composites
        r.register("Frame", build_frame);
        r.register("TitleBar", build_titlebar);
        r.register("Content", build_content);
        r
    }

    pub fn register(&mut self, tag: &str, factory: WidgetFactory) {
        self.entries.push((tag.to_string(), factory));
    }

    fn lookup(&self, tag: &str) -> Option<WidgetFactory> {
        self.entries
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, f)| *f)
    }
}

// ── TreeBuilder ───────────────────────────────────────────────────────────

/// One document-load worth of build state.
///
/// `content_stack` holds, for each composite currently being expanded, the
/// caller-supplied nodes its `<Content>` placeholders consume; the top of
/// the stack is the nearest enclosing composite. `attr_stack` carries the
/// composite invocations' attribute bags so template widgets (the title
/// bar caption, for one) can read them.
pub struct TreeBuilder<'a> {
    registry: &'a WidgetRegistry,
    templates: &'a mut Templates,
    pub fonts: &'a dyn FontMetrics,
    pub images: &'a dyn Images,
    content_stack: Vec<VecDeque<Node>>,
    attr_stack: Vec<HashMap<String, String>>,
    style_stack: Vec<Rc<Style>>,
    file: String,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(
        registry: &'a WidgetRegistry,
        templates: &'a mut Templates,
        fonts: &'a dyn FontMetrics,
        images: &'a dyn Images,
    ) -> Self {
        Self {
            registry,
            templates,
            fonts,
            images,
            content_stack: Vec::new(),
            attr_stack: Vec::new(),
            style_stack: Vec::new(),
            file: String::new(),
        }
    }

    /// Parses `src` and builds its top-level widgets, created and arranged
    /// and ready to hand to a scene. `file` is used in error messages.
    pub fn load_document(&mut self, file: &str, src: &str) -> Result<Vec<Element>, Error> {
        self.file = file.to_string();
        let doc = kelp_xml::parse_str(src).map_err(|source| Error::Parse {
            file: file.to_string(),
            source,
        })?;
        if doc.root.name != "kelp" {
            return Err(Error::UnknownRoot {
                file: file.to_string(),
                found: doc.root.name,
            });
        }

        let ctx = CreateCtx { fonts: self.fonts, images: self.images };
        let mut windows = Vec::new();
        for node in doc.root.elements() {
            let Some(mut el) = self.build_node(node)? else {
                continue;
            };
            el.create(&ctx)?;

            let origin = Vec2::new(
                el.base.attr_f32("x").unwrap_or(WINDOW_ORIGIN.x),
                el.base.attr_f32("y").unwrap_or(WINDOW_ORIGIN.y),
            );
            // Top-level windows have no parent; bounds are unchecked.
            let area = Rect::from_origin_size(origin, el.base.rect.size);
            el.arrange(area, &ArrangeCtx { parent_size: Vec2::zero(), fonts: self.fonts })?;
            windows.push(el);
        }
        log::info!("loaded {} window(s) from {file}", windows.len());
        Ok(windows)
    }

    /// Reads and loads a document from disk.
    pub fn load_file(&mut self, path: &str) -> Result<Vec<Element>, Error> {
        let src = std::fs::read_to_string(path).map_err(|source| Error::Io {
            file: path.to_string(),
            source,
        })?;
        self.load_document(path, &src)
    }

    /// Builds a single node by registry lookup.
    pub fn build_node(&mut self, node: &Node) -> Result<Option<Element>, Error> {
        match self.registry.lookup(&node.name) {
            Some(factory) => factory(self, node),
            None => Err(Error::UnknownTag {
                file: self.file.clone(),
                tag: node.name.clone(),
            }),
        }
    }

    /// Builds every element child of `node`, dropping unsatisfied optional
    /// placeholders.
    pub fn build_children(&mut self, node: &Node) -> Result<Vec<Element>, Error> {
        let mut out = Vec::new();
        for child in node.elements() {
            if let Some(el) = self.build_node(child)? {
                out.push(el);
            }
        }
        Ok(out)
    }

    /// Shared base construction: attribute bag plus style resolution.
    ///
    /// The `style` attribute wins, then the widget's own style name (for
    /// the widgets that have one), then the enclosing element's style, so
    /// an unstyled subtree inherits its container's look.
    pub fn make_base(
        &self,
        node: &Node,
        default_style: Option<&str>,
    ) -> Result<ElementBase, Error> {
        let attributes: HashMap<String, String> = node
            .attrs
            .iter()
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect();
        let named = attributes.get("style").map(String::as_str).or(default_style);
        let style = match named {
            Some(name) => crate::style::lookup(name).ok_or_else(|| Error::UnknownStyle {
                name: name.to_string(),
            })?,
            None => match self.style_stack.last() {
                Some(style) => style.clone(),
                None => crate::style::lookup("default").ok_or_else(|| Error::UnknownStyle {
                    name: "default".to_string(),
                })?,
            },
        };
        Ok(ElementBase::new(style, attributes))
    }

    /// Reads an attribute from the nearest enclosing composite invocation.
    fn composite_attr(&self, name: &str) -> Option<&str> {
        self.attr_stack
            .last()
            .and_then(|attrs| attrs.get(name))
            .map(String::as_str)
    }

    /// Expands a composite: builds the template's children while the
    /// caller-supplied nodes are available to `<Content>` placeholders.
    fn expand_template(
        &mut self,
        template: &str,
        invocation: &Node,
    ) -> Result<Vec<Element>, Error> {
        let root = self.templates.resolve(template)?;
        self.content_stack
            .push(invocation.elements().cloned().collect());
        self.attr_stack.push(
            invocation
                .attrs
                .iter()
                .map(|a| (a.name.clone(), a.value.clone()))
                .collect(),
        );

        let result = self.build_children(&root);

        self.attr_stack.pop();
        if let Some(leftover) = self.content_stack.pop() {
            if !leftover.is_empty() && result.is_ok() {
                log::debug!(
                    "{}: {} supplied node(s) not consumed by template `{template}`",
                    self.file,
                    leftover.len()
                );
            }
        }
        result
    }
}

// ── style factory ─────────────────────────────────────────────────────────

/// `<Style name=".." base=".." key="value"../>` registers a named style
/// and produces no widget. `base` starts from a registered style instead
/// of the schema defaults; every other attribute is a schema key parsed
/// from its markup text.
fn build_style(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    let Some(name) = node.attr("name") else {
        return Err(Error::UnnamedStyle);
    };
    let mut style = match node.attr("base") {
        Some(base) => (*crate::style::lookup(base).ok_or_else(|| Error::UnknownStyle {
            name: base.to_string(),
        })?)
        .clone(),
        None => Style::default(),
    };
    for attr in &node.attrs {
        if attr.name == "name" || attr.name == "base" {
            continue;
        }
        style.set_text(&attr.name, &attr.value)?;
    }
    crate::style::register(name, style);
    log::debug!("{}: registered style `{name}`", b.file);
    Ok(None)
}

// ── control factories ─────────────────────────────────────────────────────

fn build_button(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    let base = b.make_base(node, None)?;
    Ok(Some(Element::new(base, Box::new(Button::new(node.text())))))
}

fn build_checkbox(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    let base = b.make_base(node, Some("checkbox"))?;
    let checked = node.attr("checked") == Some("true");
    let description = node.attr("description").map(str::to_string).unwrap_or_else(|| node.text());
    Ok(Some(Element::new(base, Box::new(Checkbox::new(description, checked)))))
}

fn build_radiobutton(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    let base = b.make_base(node, Some("checkbox"))?;
    let checked = node.attr("checked") == Some("true");
    let description = node.attr("description").map(str::to_string).unwrap_or_else(|| node.text());
    Ok(Some(Element::new(base, Box::new(Radiobutton::new(description, checked)))))
}

fn build_label(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    let base = b.make_base(node, None)?;
    Ok(Some(Element::new(base, Box::new(Label::new(node.text())))))
}

fn build_textbox(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    let base = b.make_base(node, None)?;
    Ok(Some(Element::new(base, Box::new(TextBox::new(node.text())))))
}

fn build_icon(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    let base = b.make_base(node, None)?;
    let name = node.attr("image").unwrap_or_default().to_string();
    Ok(Some(Element::new(base, Box::new(Icon::new(name)))))
}

// ── container factories ───────────────────────────────────────────────────

fn build_stack(
    b: &mut TreeBuilder,
    node: &Node,
    axis: Axis,
    decorated: bool,
    default_style: Option<&str>,
) -> Result<Option<Element>, Error> {
    let base = b.make_base(node, default_style)?;
    b.style_stack.push(base.style.clone());
    let children = b.build_children(node);
    b.style_stack.pop();
    Ok(Some(Element::new(
        base,
        Box::new(Container::new(axis, decorated, children?)),
    )))
}

fn build_container(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    build_stack(b, node, Axis::Vertical, true, None)
}

fn build_hr_container(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    build_stack(b, node, Axis::Horizontal, true, None)
}

fn build_sizer(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    build_stack(b, node, Axis::Vertical, false, Some("sizer"))
}

fn build_hr_sizer(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    build_stack(b, node, Axis::Horizontal, false, Some("sizer"))
}

fn build_panel(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    build_stack(b, node, Axis::Vertical, true, Some("panel"))
}

// ── composite factories ───────────────────────────────────────────────────

fn build_frame(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    let base = b.make_base(node, Some("sizer"))?;
    b.style_stack.push(base.style.clone());
    let children = b.expand_template("frame.xml", node);
    b.style_stack.pop();
    Ok(Some(Element::new(
        base,
        Box::new(Container::new(Axis::Vertical, false, children?)),
    )))
}

fn build_titlebar(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    let base = b.make_base(node, Some("titlebar"))?;
    let caption = node
        .attr("caption")
        .or_else(|| b.composite_attr("caption"))
        .unwrap_or("")
        .to_string();
    b.style_stack.push(base.style.clone());
    let buttons = b.expand_template("titlebar.xml", node);
    b.style_stack.pop();
    Ok(Some(Element::new(base, Box::new(TitleBar::new(caption, buttons?)))))
}

fn build_content(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
    let optional = node.attr("optional") == Some("true");
    let wanted = node.attr("type");

    let Some(queue) = b.content_stack.last_mut() else {
        return Err(Error::ContentOutsideComposite);
    };

    // Optional placeholders step aside on a missing or mismatched node,
    // leaving it for a later slot; required ones fail the build.
    match queue.front() {
        Some(next) if wanted.is_none_or(|t| t == next.name) => {}
        Some(next) if !optional => {
            return Err(Error::ContentMismatch {
                expected: wanted.unwrap_or("*").to_string(),
                found: next.name.clone(),
            });
        }
        None if !optional => {
            return Err(Error::MissingContent {
                expected: wanted.unwrap_or("*").to_string(),
            });
        }
        _ => return Ok(None),
    }
    let Some(mut supplied) = queue.pop_front() else {
        return Ok(None);
    };

    // Placeholder attributes merge in underneath the supplied node's own.
    for attr in &node.attrs {
        if attr.name == "type" || attr.name == "optional" {
            continue;
        }
        if supplied.attr(&attr.name).is_none() {
            supplied.attrs.push(attr.clone());
        }
    }

    b.build_node(&supplied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{BoxMetrics, NoImages};

    fn load(src: &str) -> Result<Vec<Element>, Error> {
        let registry = WidgetRegistry::with_builtins();
        let mut templates = Templates::new().unwrap();
        let fonts = BoxMetrics::new();
        let images = NoImages;
        let mut b = TreeBuilder::new(&registry, &mut templates, &fonts, &images);
        b.load_document("test.xml", src)
    }

    #[test]
    fn loads_a_simple_window() {
        let windows = load(
            r#"<kelp>
                <Container id="win">
                    <Button id="ok">OK</Button>
                    <Button id="cancel">Cancel</Button>
                </Container>
            </kelp>"#,
        )
        .unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].base.id, "win");
        assert_eq!(windows[0].behavior.children().len(), 2);
        // Containers are sized from their children by the time loading
        // returns.
        assert!(windows[0].base.rect.width() > 0.0);
        assert_eq!(windows[0].base.rect.origin, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn wrong_root_names_the_file() {
        let err = load("<window></window>").unwrap_err();
        match err {
            Error::UnknownRoot { file, found } => {
                assert_eq!(file, "test.xml");
                assert_eq!(found, "window");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_names_the_tag() {
        let err = load("<kelp><Blimp/></kelp>").unwrap_err();
        assert!(matches!(err, Error::UnknownTag { tag, .. } if tag == "Blimp"));
    }

    #[test]
    fn unknown_style_fails_construction() {
        let err = load(r#"<kelp><Button style="neon">hi</Button></kelp>"#).unwrap_err();
        assert!(matches!(err, Error::UnknownStyle { name } if name == "neon"));
    }

    #[test]
    fn style_tag_registers_a_usable_style() {
        let windows = load(
            r##"<kelp>
                <Style name="accent" base="default" background_color="#336699" border_rounding="top"/>
                <Container style="accent">
                    <Button>hi</Button>
                </Container>
            </kelp>"##,
        )
        .unwrap();
        // The Style node produced no window of its own.
        assert_eq!(windows.len(), 1);
        let style = &windows[0].base.style;
        assert_eq!(style.background_color, crate::paint::Color::from_rgb8(0x33, 0x66, 0x99));
        assert_eq!(style.border_rounding, crate::paint::CornerMask::TOP);
        // Unset keys carry over from the base style.
        assert_eq!(style.margin, 5.0);
    }

    #[test]
    fn style_tag_without_name_is_fatal() {
        let err = load(r#"<kelp><Style margin="9"/></kelp>"#).unwrap_err();
        assert!(matches!(err, Error::UnnamedStyle));
    }

    #[test]
    fn style_tag_rejects_bad_values() {
        let err = load(r#"<kelp><Style name="bad" margin="wide"/></kelp>"#).unwrap_err();
        assert!(matches!(err, Error::StyleType { expected: "number", .. }));
    }

    #[test]
    fn unstyled_widgets_inherit_the_containing_style() {
        let windows = load(
            r#"<kelp>
                <Panel>
                    <Button id="plain">A</Button>
                    <Button id="styled" style="default">B</Button>
                </Panel>
            </kelp>"#,
        )
        .unwrap();
        let panel = &windows[0];
        let kids = panel.behavior.children();
        assert!(Rc::ptr_eq(&kids[0].base.style, &panel.base.style));
        // An explicit style attribute beats inheritance.
        assert!(!Rc::ptr_eq(&kids[1].base.style, &panel.base.style));
    }

    #[test]
    fn content_splices_supplied_node_with_merged_attrs() {
        let template = (
            "dialog.xml",
            r#"<kelp>
                <Container>
                    <Content type="Button" align="center"/>
                </Container>
            </kelp>"#,
        );
        let registry = WidgetRegistry::with_builtins();
        let mut templates = Templates::new().unwrap();
        templates.register(template.0, template.1).unwrap();
        let fonts = BoxMetrics::new();
        let images = NoImages;
        let mut b = TreeBuilder::new(&registry, &mut templates, &fonts, &images);

        let doc = kelp_xml::parse_str(
            r#"<invoke><Button id="go" align="right">Go</Button></invoke>"#,
        )
        .unwrap();
        let children = b.expand_template("dialog.xml", &doc.root).unwrap();

        assert_eq!(children.len(), 1);
        let container = &children[0];
        let button = &container.behavior.children()[0];
        assert_eq!(button.base.id, "go");
        // The supplied node's own align wins over the placeholder's.
        assert_eq!(button.base.attributes.get("align").map(String::as_str), Some("right"));
    }

    #[test]
    fn placeholder_attr_fills_gaps() {
        let registry = WidgetRegistry::with_builtins();
        let mut templates = Templates::new().unwrap();
        templates
            .register(
                "slot.xml",
                r#"<kelp><Content type="Button" align="center"/></kelp>"#,
            )
            .unwrap();
        let fonts = BoxMetrics::new();
        let images = NoImages;
        let mut b = TreeBuilder::new(&registry, &mut templates, &fonts, &images);

        let doc = kelp_xml::parse_str(r#"<invoke><Button id="go">Go</Button></invoke>"#).unwrap();
        let children = b.expand_template("slot.xml", &doc.root).unwrap();
        assert_eq!(
            children[0].base.attributes.get("align").map(String::as_str),
            Some("center")
        );
    }

    #[test]
    fn required_content_mismatch_is_fatal() {
        let registry = WidgetRegistry::with_builtins();
        let mut templates = Templates::new().unwrap();
        templates
            .register("slot.xml", r#"<kelp><Content type="Button"/></kelp>"#)
            .unwrap();
        let fonts = BoxMetrics::new();
        let images = NoImages;
        let mut b = TreeBuilder::new(&registry, &mut templates, &fonts, &images);

        let doc = kelp_xml::parse_str(r#"<invoke><Label>nope</Label></invoke>"#).unwrap();
        let err = b.expand_template("slot.xml", &doc.root).unwrap_err();
        assert!(matches!(
            err,
            Error::ContentMismatch { expected, found } if expected == "Button" && found == "Label"
        ));
    }

    #[test]
    fn required_content_missing_is_fatal() {
        let registry = WidgetRegistry::with_builtins();
        let mut templates = Templates::new().unwrap();
        templates
            .register("slot.xml", r#"<kelp><Content type="Button"/></kelp>"#)
            .unwrap();
        let fonts = BoxMetrics::new();
        let images = NoImages;
        let mut b = TreeBuilder::new(&registry, &mut templates, &fonts, &images);

        let doc = kelp_xml::parse_str("<invoke></invoke>").unwrap();
        let err = b.expand_template("slot.xml", &doc.root).unwrap_err();
        assert!(matches!(err, Error::MissingContent { expected } if expected == "Button"));
    }

    #[test]
    fn optional_mismatch_yields_no_widget_and_keeps_the_node() {
        let registry = WidgetRegistry::with_builtins();
        let mut templates = Templates::new().unwrap();
        templates
            .register(
                "slots.xml",
                r#"<kelp>
                    <Content type="Button" optional="true"/>
                    <Content type="Label" optional="true"/>
                </kelp>"#,
            )
            .unwrap();
        let fonts = BoxMetrics::new();
        let images = NoImages;
        let mut b = TreeBuilder::new(&registry, &mut templates, &fonts, &images);

        let doc = kelp_xml::parse_str(r#"<invoke><Label>text</Label></invoke>"#).unwrap();
        let children = b.expand_template("slots.xml", &doc.root).unwrap();
        // The Button slot matched nothing; the Label slot consumed the
        // node the Button slot declined.
        assert_eq!(children.len(), 1);
    }

    #[test]
    fn content_outside_composite_is_fatal() {
        let err = load("<kelp><Content type=\"Button\"/></kelp>").unwrap_err();
        assert!(matches!(err, Error::ContentOutsideComposite));
    }

    #[test]
    fn frame_builds_titlebar_and_panel() {
        let windows = load(
            r#"<kelp>
                <Frame id="main" caption="Demo">
                    <Button id="go">Go</Button>
                </Frame>
            </kelp>"#,
        )
        .unwrap();
        assert_eq!(windows.len(), 1);
        let frame = &windows[0];
        // Template: TitleBar then Panel.
        let kids = frame.behavior.children();
        assert_eq!(kids.len(), 2);
        // The supplied button landed inside the panel.
        assert_eq!(kids[1].behavior.children().len(), 1);
        assert_eq!(kids[1].behavior.children()[0].base.id, "go");
    }

    #[test]
    fn malformed_xml_is_a_parse_error_with_the_file() {
        let err = load("<kelp><Button></kelp>").unwrap_err();
        assert!(matches!(err, Error::Parse { file, .. } if file == "test.xml"));
    }

    #[test]
    fn explicit_window_position_attrs() {
        let windows = load(r#"<kelp><Container x="50" y="60"/></kelp>"#).unwrap();
        assert_eq!(windows[0].base.rect.origin, Vec2::new(50.0, 60.0));
    }
}
