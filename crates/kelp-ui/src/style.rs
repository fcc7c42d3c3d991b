//! Named visual styles and the process-wide style registry.
//!
//! A [`Style`] is a closed, schema-validated set of layout and paint
//! properties. Styles are registered by name (last write wins) and
//! resolved once when an element is constructed; elements then share the
//! registered value through an `Rc`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Error;
use crate::paint::{Color, CornerMask};

// ── StyleValue ────────────────────────────────────────────────────────────

/// A dynamically-typed style property value, used by [`Style::set`] and
/// [`Style::get`] when styles are built from markup or host configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Number(f32),
    Color(Color),
    Text(String),
    Corners(CornerMask),
}

// ── Style ─────────────────────────────────────────────────────────────────

/// A named set of visual properties. Every key has a default, so a style
/// only needs to spell out what it changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Space reserved between a child and its siblings / container edge.
    pub margin: f32,
    /// Space between a container's border and its content area.
    pub padding: f32,
    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f32,
    pub border_radius: f32,
    pub border_rounding: CornerMask,
    pub font_family: String,
    pub font_height: f32,
    pub font_color: Color,
    /// Background variant while the cursor is over an interactive control.
    pub hover_color: Color,
    /// Background variant while an interactive control is held down.
    pub clicked_color: Color,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            margin: 5.0,
            padding: 3.0,
            background_color: Color::from_rgb8(0xe8, 0xe8, 0xe8),
            border_color: Color::from_rgb8(0x50, 0x50, 0x50),
            border_width: 1.0,
            border_radius: 6.0,
            border_rounding: CornerMask::ALL,
            font_family: "sans".to_string(),
            font_height: 14.0,
            font_color: Color::black(),
            hover_color: Color::from_rgb8(0xf4, 0xf4, 0xf4),
            clicked_color: Color::from_rgb8(0xc8, 0xc8, 0xc8),
        }
    }
}

impl Style {
    /// Sets a property by schema key. Unknown keys and wrong-typed values
    /// are construction errors, never silently dropped.
    pub fn set(&mut self, key: &str, value: StyleValue) -> Result<(), Error> {
        use StyleValue as V;
        match (key, value) {
            ("margin", V::Number(n)) => self.margin = n,
            ("padding", V::Number(n)) => self.padding = n,
            ("background_color", V::Color(c)) => self.background_color = c,
            ("border_color", V::Color(c)) => self.border_color = c,
            ("border_width", V::Number(n)) => self.border_width = n,
            ("border_radius", V::Number(n)) => self.border_radius = n,
            ("border_rounding", V::Corners(m)) => self.border_rounding = m,
            ("font_family", V::Text(t)) => self.font_family = t,
            ("font_height", V::Number(n)) => self.font_height = n,
            ("font_color", V::Color(c)) => self.font_color = c,
            ("hover_color", V::Color(c)) => self.hover_color = c,
            ("clicked_color", V::Color(c)) => self.clicked_color = c,
            (key, _) => {
                return Err(match Self::expected_type(key) {
                    Some(expected) => Error::StyleType { key: key.to_string(), expected },
                    None => Error::StyleKey { key: key.to_string() },
                });
            }
        }
        Ok(())
    }

    /// Sets a property from its raw markup text, parsed per the key's
    /// schema type: numbers as decimals, colors as `#rrggbb[aa]`
    /// ([`Color::from_hex`]), corner masks via [`CornerMask::parse`].
    pub fn set_text(&mut self, key: &str, raw: &str) -> Result<(), Error> {
        let wrong_type = |expected| Error::StyleType { key: key.to_string(), expected };
        let value = match Self::expected_type(key) {
            Some("number") => {
                StyleValue::Number(raw.parse().map_err(|_| wrong_type("number"))?)
            }
            Some("color") => {
                StyleValue::Color(Color::from_hex(raw).ok_or_else(|| wrong_type("color"))?)
            }
            Some("corner mask") => StyleValue::Corners(
                CornerMask::parse(raw).ok_or_else(|| wrong_type("corner mask"))?,
            ),
            Some(_) => StyleValue::Text(raw.to_string()),
            None => return Err(Error::StyleKey { key: key.to_string() }),
        };
        self.set(key, value)
    }

    /// Reads a property by schema key.
    pub fn get(&self, key: &str) -> Result<StyleValue, Error> {
        use StyleValue as V;
        Ok(match key {
            "margin" => V::Number(self.margin),
            "padding" => V::Number(self.padding),
            "background_color" => V::Color(self.background_color),
            "border_color" => V::Color(self.border_color),
            "border_width" => V::Number(self.border_width),
            "border_radius" => V::Number(self.border_radius),
            "border_rounding" => V::Corners(self.border_rounding),
            "font_family" => V::Text(self.font_family.clone()),
            "font_height" => V::Number(self.font_height),
            "font_color" => V::Color(self.font_color),
            "hover_color" => V::Color(self.hover_color),
            "clicked_color" => V::Color(self.clicked_color),
            key => return Err(Error::StyleKey { key: key.to_string() }),
        })
    }

    fn expected_type(key: &str) -> Option<&'static str> {
        Some(match key {
            "margin" | "padding" | "border_width" | "border_radius" | "font_height" => "number",
            "background_color" | "border_color" | "font_color" | "hover_color"
            | "clicked_color" => "color",
            "font_family" => "text",
            "border_rounding" => "corner mask",
            _ => return None,
        })
    }
}

// ── Registry ──────────────────────────────────────────────────────────────

// The toolkit is single-threaded by construction, so the registry is
// thread-confined rather than synchronized.
thread_local! {
    static REGISTRY: RefCell<HashMap<String, Rc<Style>>> = RefCell::new(HashMap::new());
}

/// Registers `style` under `name`. Re-registering a name replaces the old
/// value for future lookups; elements already holding the old `Rc` keep it.
pub fn register(name: &str, style: Style) {
    REGISTRY.with(|r| {
        if r.borrow_mut().insert(name.to_string(), Rc::new(style)).is_some() {
            log::debug!("style `{name}` re-registered");
        }
    });
}

/// Resolves a registered style by name.
pub fn lookup(name: &str) -> Option<Rc<Style>> {
    ensure_defaults();
    REGISTRY.with(|r| r.borrow().get(name).cloned())
}

/// Registers the built-in styles if they are not present yet. Called from
/// every lookup so hosts never need an explicit init step.
pub fn ensure_defaults() {
    REGISTRY.with(|r| {
        let mut map = r.borrow_mut();
        if map.contains_key("default") {
            return;
        }

        map.insert("default".to_string(), Rc::new(Style::default()));

        let panel = Style {
            background_color: Color::from_rgb8(0xd4, 0xd4, 0xdc),
            ..Style::default()
        };
        map.insert("panel".to_string(), Rc::new(panel));

        // Sizers take no space of their own and draw nothing.
        let sizer = Style {
            padding: 0.0,
            border_width: 0.0,
            background_color: Color::transparent(),
            ..Style::default()
        };
        map.insert("sizer".to_string(), Rc::new(sizer));

        // Title bars sit flush on the panel below, so only the top
        // corners round.
        let titlebar = Style {
            background_color: Color::from_rgb8(0x6a, 0x7a, 0x9a),
            font_color: Color::white(),
            border_rounding: CornerMask::TOP,
            ..Style::default()
        };
        map.insert("titlebar".to_string(), Rc::new(titlebar));

        let checkbox = Style {
            background_color: Color::white(),
            border_radius: 3.0,
            ..Style::default()
        };
        map.insert("checkbox".to_string(), Rc::new(checkbox));
    });
}
