//! Layout-modifier attributes.
//!
//! Markup attributes like `align="center"` or `expand="true"` adjust an
//! element's rect after its parent has allotted space. Each recognized
//! attribute name maps to a function in a fixed registry; attribute names
//! absent from the registry are simply not layout modifiers and are left
//! for the widget itself to interpret.

use crate::coords::Rect;
use crate::element::ElementBase;

/// A modifier mutates the element's rect within the allotted `area`.
/// `raw` is the attribute's unparsed markup value.
pub type ModifierFn = fn(&mut ElementBase, Rect, &str);

/// Recognized modifiers, in application order. Size runs before
/// placement: `expand` must settle the rect before `align`/`valign`
/// position it, regardless of how the markup orders the attributes.
const MODIFIERS: [(&str, ModifierFn); 3] = [
    ("expand", expand),
    ("align", align),
    ("valign", valign),
];

/// Looks up the modifier for an attribute name, if one exists.
pub fn lookup(name: &str) -> Option<ModifierFn> {
    MODIFIERS.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

/// Applies every modifier attribute present on `base`, in table order.
pub fn apply(base: &mut ElementBase, area: Rect) {
    for (name, f) in MODIFIERS {
        if let Some(raw) = base.attributes.get(name).cloned() {
            f(base, area, &raw);
        }
    }
}

/// Horizontal placement within the allotted area: `left` (default),
/// `center`, or `right`. Unrecognized values leave the rect alone.
fn align(base: &mut ElementBase, area: Rect, raw: &str) {
    let w = base.rect.width();
    match raw {
        "center" => base.rect.origin.x = area.left() + (area.width() - w) / 2.0,
        "right" => base.rect.origin.x = area.right() - w,
        _ => {}
    }
}

/// Vertical placement within the allotted area: `top` (default),
/// `middle`/`center`, or `bottom`.
fn valign(base: &mut ElementBase, area: Rect, raw: &str) {
    let h = base.rect.height();
    match raw {
        "middle" | "center" => base.rect.origin.y = area.top() + (area.height() - h) / 2.0,
        "bottom" => base.rect.origin.y = area.bottom() - h,
        _ => {}
    }
}

/// Grows the rect to fill the allotted area: `true` (both axes), `width`,
/// or `height`.
fn expand(base: &mut ElementBase, area: Rect, raw: &str) {
    match raw {
        "true" => base.rect.size = area.size,
        "width" => base.rect.size.x = area.width(),
        "height" => base.rect.size.y = area.height(),
        _ => {}
    }
}
