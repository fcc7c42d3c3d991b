//! Containers: vertical / horizontal stacking with two-phase layout.
//!
//! Phase one runs bottom-up during `create`: every child reports its
//! intrinsic extent into the container's minimum-size accumulators
//! ([`Container::adjust`]). Phase two runs top-down once the container has
//! its final size: [`arrange_children`](Container::arrange_children) walks
//! the children in order, allotting each one the space that remains after
//! reserving room for every not-yet-placed sibling. The split exists
//! because a container's size depends on its children while each child's
//! position depends on the container's size.

use crate::coords::{Rect, Vec2};
use crate::draw::Painter;
use crate::element::{ArrangeCtx, Behavior, CreateCtx, Element, ElementBase};
use crate::error::Error;
use crate::paint::Border;
use crate::style::Style;
use crate::text::FontMetrics;

/// Stacking direction of a container's primary axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// A container element: an ordered run of children stacked along one axis.
///
/// Insertion order is both layout order and z-order. The decorated variant
/// paints a filled rounded rectangle and a border behind its children;
/// sizers are the same layout with no decoration and a zero-padding style.
pub struct Container {
    axis: Axis,
    decorated: bool,
    children: Vec<Element>,
    min_width: f32,
    min_height: f32,
}

impl Container {
    pub fn new(axis: Axis, decorated: bool, children: Vec<Element>) -> Self {
        Self {
            axis,
            decorated,
            children,
            min_width: 0.0,
            min_height: 0.0,
        }
    }

    pub fn vertical(children: Vec<Element>) -> Self {
        Self::new(Axis::Vertical, true, children)
    }

    pub fn horizontal(children: Vec<Element>) -> Self {
        Self::new(Axis::Horizontal, true, children)
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    #[inline]
    pub fn min_size(&self) -> Vec2 {
        Vec2::new(self.min_width, self.min_height)
    }

    /// Folds one child's intrinsic extent into the minimum-size
    /// accumulators: the perpendicular axis takes the max, the primary
    /// axis accumulates the sum plus one margin per child.
    pub fn adjust(&mut self, style: &Style, child_size: Vec2) {
        match self.axis {
            Axis::Vertical => {
                if child_size.x + style.padding > self.min_width {
                    self.min_width = child_size.x + style.padding;
                }
                self.min_height += child_size.y + style.margin;
            }
            Axis::Horizontal => {
                if child_size.y + style.padding > self.min_height {
                    self.min_height = child_size.y + style.padding;
                }
                self.min_width += child_size.x + style.margin;
            }
        }
    }

    /// Positions every child inside the (now final) container rect.
    ///
    /// Each child is allotted the space left after subtracting what earlier
    /// children consumed and reserving the summed intrinsic extents of the
    /// later siblings plus their margins. The look-ahead is what lets an
    /// earlier child be squeezed instead of starving the ones after it.
    /// The cursor then advances past the extent the child *actually*
    /// occupied, plus one margin.
    fn arrange_children(
        &mut self,
        base: &ElementBase,
        fonts: &dyn FontMetrics,
    ) -> Result<(), Error> {
        let style = base.style.clone();
        let padding = style.padding;
        let margin = style.margin;
        let size = base.rect.size;
        let ctx = ArrangeCtx { parent_size: size, fonts };

        let mut cursor = Vec2::new(padding, padding);
        let count = self.children.len();
        for i in 0..count {
            let later = &self.children[i + 1..];
            let later_margins = later.len() as f32 * margin;
            let area = match self.axis {
                Axis::Vertical => {
                    let reserved: f32 = later.iter().map(|c| c.base.rect.height()).sum();
                    Rect::new(
                        cursor.x,
                        cursor.y,
                        size.x - cursor.x - padding,
                        size.y - cursor.y - reserved - later_margins - padding,
                    )
                }
                Axis::Horizontal => {
                    let reserved: f32 = later.iter().map(|c| c.base.rect.width()).sum();
                    Rect::new(
                        cursor.x,
                        cursor.y,
                        size.x - cursor.x - reserved - later_margins - padding,
                        size.y - cursor.y - padding,
                    )
                }
            };

            // A child may come back larger than its allotment, or an
            // earlier sibling's overflow may have pushed the cursor past
            // the container's own bounds (wrapping text is the usual
            // culprit). Overflow is allowed rather than fatal; the cursor
            // advances past the real extent so siblings do not overlap.
            let occupied = match self.children[i].arrange(area, &ctx) {
                Ok(rect) => rect,
                Err(Error::OutOfBounds { .. }) => {
                    log::warn!(
                        "child `{}` overflows container `{}`",
                        self.children[i].base.id,
                        base.id
                    );
                    let child = &mut self.children[i].base;
                    child.rect.origin = area.origin;
                    child.rect
                }
                Err(e) => return Err(e),
            };
            if occupied.bottom() > size.y - padding + 0.5
                || occupied.right() > size.x - padding + 0.5
            {
                log::warn!(
                    "child `{}` overflows container `{}`",
                    self.children[i].base.id,
                    base.id
                );
            }

            match self.axis {
                Axis::Vertical => cursor.y = occupied.bottom() + margin,
                Axis::Horizontal => cursor.x = occupied.right() + margin,
            }
        }
        Ok(())
    }
}

impl Behavior for Container {
    /// Bottom-up sizing: create children, fold their extents into the
    /// accumulators, finalize this rect (explicit `width`/`height`
    /// attributes are honored but never below the accumulated minimum),
    /// then run the top-down arrange over the children.
    fn create(&mut self, base: &mut ElementBase, ctx: &CreateCtx) -> Result<(), Error> {
        for child in &mut self.children {
            child.base.parent = Some(base.key);
            child.create(ctx)?;
        }

        let style = base.style.clone();
        match self.axis {
            Axis::Vertical => {
                self.min_width = 0.0;
                self.min_height = style.padding - style.margin;
            }
            Axis::Horizontal => {
                self.min_width = style.padding - style.margin;
                self.min_height = 0.0;
            }
        }
        for i in 0..self.children.len() {
            let child_size = self.children[i].base.rect.size;
            self.adjust(&style, child_size);
        }
        self.min_width += style.padding;
        self.min_height += style.padding;

        if let Some(w) = base.attr_f32("width") {
            base.rect.size.x = w;
        }
        if let Some(h) = base.attr_f32("height") {
            base.rect.size.y = h;
        }
        base.rect.size.x = base.rect.size.x.max(self.min_width);
        base.rect.size.y = base.rect.size.y.max(self.min_height);

        self.arrange_children(base, ctx.fonts)
    }

    fn render(&self, base: &ElementBase, painter: &mut Painter) {
        if !self.decorated {
            return;
        }
        let style = &base.style;
        let rect = base.abs_rect();
        painter.fill_rounded_rect(
            rect,
            style.border_radius,
            style.border_rounding,
            style.background_color,
        );
        if style.border_width > 0.0 {
            painter.stroke_rounded_rect(
                rect,
                style.border_radius,
                style.border_rounding,
                Border { color: style.border_color, width: style.border_width },
            );
        }
    }

    fn children(&self) -> &[Element] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Element] {
        &mut self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::text::{BoxMetrics, NoImages};
    use std::collections::HashMap;

    /// Leaf with a fixed intrinsic size.
    struct Fixed(Vec2);
    impl Behavior for Fixed {
        fn create(&mut self, base: &mut ElementBase, _: &CreateCtx) -> Result<(), Error> {
            base.rect.size = self.0;
            Ok(())
        }
    }

    /// Leaf that occupies more height than it was allotted.
    struct Tall(Vec2);
    impl Behavior for Tall {
        fn create(&mut self, base: &mut ElementBase, _: &CreateCtx) -> Result<(), Error> {
            base.rect.size = self.0;
            Ok(())
        }
        fn arrange(
            &mut self,
            base: &mut ElementBase,
            area: Rect,
            ctx: &ArrangeCtx,
        ) -> Result<Rect, Error> {
            base.arrange(area, ctx)?;
            base.rect.size.y = area.height() + 30.0;
            Ok(base.rect)
        }
    }

    fn fixed(w: f32, h: f32) -> Element {
        let base = ElementBase::new(crate::style::lookup("default").unwrap(), HashMap::new());
        Element::new(base, Box::new(Fixed(Vec2::new(w, h))))
    }

    fn container_of(axis: Axis, children: Vec<Element>) -> Element {
        let base = ElementBase::new(crate::style::lookup("default").unwrap(), HashMap::new());
        Element::new(base, Box::new(Container::new(axis, true, children)))
    }

    fn create(el: &mut Element) {
        let fonts = BoxMetrics::new();
        let images = NoImages;
        el.create(&CreateCtx { fonts: &fonts, images: &images }).unwrap();
    }

    // The default style has margin 5 and padding 3; the layout numbers
    // below all assume that.

    #[test]
    fn vertical_two_child_layout() {
        let mut c = container_of(Axis::Vertical, vec![fixed(20.0, 10.0), fixed(30.0, 15.0)]);
        create(&mut c);

        assert_eq!(c.base.rect.size, Vec2::new(36.0, 36.0));
        let kids = c.behavior.children();
        assert_eq!(kids[0].base.rect.origin, Vec2::new(3.0, 3.0));
        assert_eq!(kids[1].base.rect.origin, Vec2::new(3.0, 18.0));
    }

    #[test]
    fn horizontal_transposes_the_formulas() {
        let mut c = container_of(Axis::Horizontal, vec![fixed(10.0, 20.0), fixed(15.0, 30.0)]);
        create(&mut c);

        assert_eq!(c.base.rect.size, Vec2::new(36.0, 36.0));
        let kids = c.behavior.children();
        assert_eq!(kids[0].base.rect.origin, Vec2::new(3.0, 3.0));
        assert_eq!(kids[1].base.rect.origin, Vec2::new(18.0, 3.0));
    }

    #[test]
    fn final_size_covers_accumulated_minimum() {
        for axis in [Axis::Vertical, Axis::Horizontal] {
            let mut c = container_of(
                axis,
                vec![fixed(8.0, 40.0), fixed(25.0, 12.0), fixed(14.0, 3.0)],
            );
            create(&mut c);
            // Re-derive the minimum from the accumulator formulas and compare.
            let style = crate::style::lookup("default").unwrap();
            let sizes = [Vec2::new(8.0, 40.0), Vec2::new(25.0, 12.0), Vec2::new(14.0, 3.0)];
            let mut probe = Container::new(axis, true, Vec::new());
            match axis {
                Axis::Vertical => {
                    probe.min_width = 0.0;
                    probe.min_height = style.padding - style.margin;
                }
                Axis::Horizontal => {
                    probe.min_width = style.padding - style.margin;
                    probe.min_height = 0.0;
                }
            }
            for s in sizes {
                probe.adjust(&style, s);
            }
            let min = probe.min_size() + Vec2::new(style.padding, style.padding);
            assert!(c.base.rect.size.x >= min.x);
            assert!(c.base.rect.size.y >= min.y);
        }
    }

    #[test]
    fn explicit_size_attr_is_clamped_up_to_minimum() {
        let mut base = ElementBase::new(
            crate::style::lookup("default").unwrap(),
            HashMap::from([
                ("width".to_string(), "10".to_string()),
                ("height".to_string(), "200".to_string()),
            ]),
        );
        base.rect = Rect::default();
        let mut c = Element::new(
            base,
            Box::new(Container::new(Axis::Vertical, true, vec![fixed(20.0, 10.0)])),
        );
        create(&mut c);

        // width 10 is below the minimum of 26 and gets raised; height 200
        // exceeds the minimum and sticks.
        assert_eq!(c.base.rect.size.x, 26.0);
        assert_eq!(c.base.rect.size.y, 200.0);
    }

    #[test]
    fn children_plus_margins_fit_in_container() {
        let mut c = container_of(
            Axis::Vertical,
            vec![fixed(20.0, 10.0), fixed(30.0, 15.0), fixed(5.0, 5.0)],
        );
        create(&mut c);

        let bounds = Rect::from_origin_size(Vec2::zero(), c.base.rect.size);
        for child in c.behavior.children() {
            assert!(bounds.encloses(child.base.rect));
        }
    }

    #[test]
    fn nested_containers_accumulate_bottom_up() {
        let inner = container_of(Axis::Horizontal, vec![fixed(10.0, 10.0), fixed(10.0, 10.0)]);
        let mut outer = container_of(Axis::Vertical, vec![inner, fixed(5.0, 5.0)]);
        create(&mut outer);

        // inner: width 10+5+10+3+3 = 31, height 10+3+3 = 16
        let kids = outer.behavior.children();
        assert_eq!(kids[0].base.rect.size, Vec2::new(31.0, 16.0));
        // outer min width = 31 + 2·3 = 37
        assert_eq!(outer.base.rect.size.x, 37.0);
    }

    #[test]
    fn overflowing_child_does_not_abort_layout() {
        let tall = {
            let base =
                ElementBase::new(crate::style::lookup("default").unwrap(), HashMap::new());
            Element::new(base, Box::new(Tall(Vec2::new(10.0, 10.0))))
        };
        let mut c = container_of(Axis::Vertical, vec![tall, fixed(10.0, 10.0)]);
        create(&mut c);

        // The second child is still placed, past the first child's real
        // (overflowing) extent.
        let kids = c.behavior.children();
        assert!(kids[1].base.rect.origin.y > kids[0].base.rect.bottom());
    }

    #[test]
    fn empty_container_is_padding_only() {
        let mut c = container_of(Axis::Vertical, Vec::new());
        create(&mut c);
        // min height = (padding - margin) + padding = 1, min width = padding.
        assert_eq!(c.base.rect.size, Vec2::new(3.0, 1.0));
    }
}
