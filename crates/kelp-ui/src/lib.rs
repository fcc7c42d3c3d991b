//! Kelp UI — a retained widget tree built from XML documents.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use kelp_ui::prelude::*;
//!
//! let registry = WidgetRegistry::with_builtins();
//! let mut templates = Templates::new()?;
//! let mut builder = TreeBuilder::new(&registry, &mut templates, &fonts, &images);
//!
//! let mut scene = Scene::new();
//! scene.add_windows(builder.load_document(
//!     "main.xml",
//!     r#"<kelp>
//!         <Frame caption="Hello">
//!             <Button id="save">Save</Button>
//!         </Frame>
//!     </kelp>"#,
//! )?);
//!
//! // In your frame callback:
//! scene.dispatch(UiEvent::MouseMove { pos, delta }, &fonts);
//! scene.update(pos);
//! scene.render(&mut draw_list, &fonts);
//! // Replay draw_list with your renderer, drain scene.take_host_events().
//! ```
//!
//! # Extending with custom widgets
//!
//! Implement [`Behavior`](element::Behavior) for any type, then register a
//! factory for its tag:
//!
//! ```rust,ignore
//! use kelp_ui::prelude::*;
//!
//! fn build_gauge(b: &mut TreeBuilder, node: &Node) -> Result<Option<Element>, Error> {
//!     let base = b.make_base(node, None)?;
//!     Ok(Some(Element::new(base, Box::new(Gauge::new()))))
//! }
//!
//! let mut registry = WidgetRegistry::with_builtins();
//! registry.register("Gauge", build_gauge);
//! ```

pub mod builder;
pub mod composite;
pub mod container;
pub mod controls;
pub mod coords;
pub mod draw;
pub mod element;
pub mod error;
pub mod event;
pub mod logging;
pub mod modifiers;
pub mod paint;
pub mod scene;
pub mod style;
pub mod text;

// Top-level re-exports for the common entry points.
pub use builder::{TreeBuilder, WidgetRegistry};
pub use error::Error;
pub use scene::Scene;

/// Everything a host or a custom widget needs in one import.
pub mod prelude {
    pub use crate::builder::{TreeBuilder, WidgetFactory, WidgetRegistry};
    pub use crate::composite::Templates;
    pub use crate::container::{Axis, Container};
    pub use crate::controls::{Button, Checkbox, Icon, Label, Radiobutton, TextBox};
    pub use crate::coords::{Rect, Vec2};
    pub use crate::draw::{DrawCmd, DrawList, Painter};
    pub use crate::element::{
        ArrangeCtx, Behavior, CreateCtx, Element, ElementBase, ElementKey, UpdateCtx,
    };
    pub use crate::error::Error;
    pub use crate::event::{
        Dispatch, EventCtx, EventKind, Key, MouseButton, Outcome, UiEvent, filters,
    };
    pub use crate::paint::{Border, Color, CornerMask};
    pub use crate::scene::Scene;
    pub use crate::style::{Style, StyleValue};
    pub use crate::text::{BoxMetrics, FontMetrics, Images, NoImages};

    pub use kelp_xml::{Document, Node, ParseError};
}
