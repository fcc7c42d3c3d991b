use crate::coords::{Rect, Vec2};
use crate::draw::Painter;
use crate::element::{Behavior, CreateCtx, ElementBase, UpdateCtx};
use crate::error::Error;
use crate::event::{Dispatch, EventCtx, MouseButton, UiEvent};
use crate::paint::{Border, CornerMask};

/// Side length of the check square.
pub(crate) const BOX_SIZE: f32 = 12.0;
/// Horizontal offset of the description text from the control's left edge.
pub(crate) const LABEL_OFFSET: f32 = 16.0;

/// A toggle with a square check mark and a text description.
///
/// Toggles on mouse release over itself and emits
/// [`UiEvent::CheckChanged`] with `radio: false`.
pub struct Checkbox {
    checked: bool,
    description: String,
    mouseover: bool,
}

impl Checkbox {
    pub fn new(description: impl Into<String>, checked: bool) -> Self {
        Self {
            checked,
            description: description.into(),
            mouseover: false,
        }
    }

    #[inline]
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// The check square's rect, relative to the control.
    fn box_rect(&self, base: &ElementBase) -> Rect {
        Rect::new(
            base.style.padding,
            (base.rect.height() - BOX_SIZE) / 2.0,
            BOX_SIZE,
            BOX_SIZE,
        )
    }
}

impl Behavior for Checkbox {
    fn create(&mut self, base: &mut ElementBase, ctx: &CreateCtx) -> Result<(), Error> {
        let style = &base.style;
        let text_size =
            ctx.fonts.measure(&self.description, &style.font_family, style.font_height);
        base.rect.size = Vec2::new(
            LABEL_OFFSET + text_size.x + 2.0 * style.padding,
            text_size.y.max(BOX_SIZE) + 2.0 * style.padding,
        );
        Ok(())
    }

    fn update(&mut self, base: &mut ElementBase, ctx: &UpdateCtx) {
        self.mouseover = base.abs_rect().contains(ctx.mouse);
    }

    fn on_event(&mut self, base: &mut ElementBase, event: &UiEvent, ctx: &mut EventCtx) -> Dispatch {
        if let UiEvent::MouseUp { pos, button: MouseButton::Left } = event {
            if !base.hidden && base.abs_rect().contains(*pos) {
                self.checked = !self.checked;
                ctx.emit(UiEvent::CheckChanged {
                    id: base.id.clone(),
                    source: base.key,
                    group: base.parent,
                    checked: self.checked,
                    radio: false,
                });
                return Dispatch::Consumed;
            }
        }
        Dispatch::Propagate
    }

    fn render(&self, base: &ElementBase, painter: &mut Painter) {
        let style = &base.style;
        let rect = base.abs_rect();

        if self.mouseover {
            painter.fill_rounded_rect(rect, style.border_radius, style.border_rounding, style.hover_color);
        }

        let bx = self.box_rect(base).translated(base.abs_origin);
        painter.fill_rounded_rect(bx, style.border_radius, CornerMask::ALL, style.background_color);
        painter.stroke_rounded_rect(
            bx,
            style.border_radius,
            CornerMask::ALL,
            Border { color: style.border_color, width: style.border_width.max(1.0) },
        );
        if self.checked {
            let inset = 3.0;
            painter.fill_rounded_rect(
                Rect::new(
                    bx.left() + inset,
                    bx.top() + inset,
                    bx.width() - 2.0 * inset,
                    bx.height() - 2.0 * inset,
                ),
                0.0,
                CornerMask::NONE,
                style.border_color,
            );
        }

        let text_size = painter.measure(&self.description, &style.font_family, style.font_height);
        painter.text(
            Vec2::new(
                rect.left() + LABEL_OFFSET + style.padding,
                rect.top() + (rect.height() - text_size.y) / 2.0,
            ),
            &self.description,
            &style.font_family,
            style.font_height,
            style.font_color,
        );
    }
}
