use crate::coords::Vec2;
use crate::draw::Painter;
use crate::element::{Behavior, CreateCtx, ElementBase, UpdateCtx};
use crate::error::Error;
use crate::event::{Dispatch, EventCtx, MouseButton, UiEvent};
use crate::paint::Border;

/// A push button with a text caption.
///
/// A press is only honored when the release happens over the same button
/// that recorded the press; releasing elsewhere cancels it. A successful
/// press-release emits [`UiEvent::ButtonClick`], which is re-dispatched
/// from the root so any ancestor (or the host) can react to it.
pub struct Button {
    text: String,
    mouseover: bool,
    down: bool,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mouseover: false,
            down: false,
        }
    }

    #[inline]
    pub fn is_down(&self) -> bool {
        self.down
    }
}

impl Behavior for Button {
    fn create(&mut self, base: &mut ElementBase, ctx: &CreateCtx) -> Result<(), Error> {
        let style = &base.style;
        let text_size = ctx.fonts.measure(&self.text, &style.font_family, style.font_height);
        base.rect.size = Vec2::new(
            text_size.x + style.margin,
            text_size.y + style.margin,
        );
        Ok(())
    }

    fn update(&mut self, base: &mut ElementBase, ctx: &UpdateCtx) {
        self.mouseover = base.abs_rect().contains(ctx.mouse);
        // Dragging off the button releases it without clicking.
        self.down = self.down && self.mouseover;
    }

    fn on_event(&mut self, base: &mut ElementBase, event: &UiEvent, ctx: &mut EventCtx) -> Dispatch {
        match event {
            UiEvent::MouseDown { pos, button: MouseButton::Left } => {
                if !base.hidden && base.abs_rect().contains(*pos) {
                    self.down = true;
                    return Dispatch::Consumed;
                }
                Dispatch::Propagate
            }
            UiEvent::MouseUp { pos, button: MouseButton::Left } => {
                let clicked = self.down && !base.hidden && base.abs_rect().contains(*pos);
                self.down = false;
                if clicked {
                    ctx.emit(UiEvent::ButtonClick {
                        id: base.id.clone(),
                        source: base.key,
                    });
                    return Dispatch::Consumed;
                }
                Dispatch::Propagate
            }
            _ => Dispatch::Propagate,
        }
    }

    fn render(&self, base: &ElementBase, painter: &mut Painter) {
        let style = &base.style;
        let rect = base.abs_rect();

        let bg = if self.down {
            style.clicked_color
        } else if self.mouseover {
            style.hover_color
        } else {
            style.background_color
        };
        painter.fill_rounded_rect(rect, style.border_radius, style.border_rounding, bg);
        if style.border_width > 0.0 {
            painter.stroke_rounded_rect(
                rect,
                style.border_radius,
                style.border_rounding,
                Border { color: style.border_color, width: style.border_width },
            );
        }

        let text_size = painter.measure(&self.text, &style.font_family, style.font_height);
        let mut pos = Vec2::new(
            rect.left() + (rect.width() - text_size.x) / 2.0,
            rect.top() + (rect.height() - text_size.y) / 2.0,
        );
        if self.down {
            pos.y += 1.0;
        }
        painter.text(pos, &self.text, &style.font_family, style.font_height, style.font_color);
    }
}
