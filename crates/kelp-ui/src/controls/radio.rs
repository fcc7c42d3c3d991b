use crate::coords::Vec2;
use crate::draw::Painter;
use crate::element::{Behavior, CreateCtx, ElementBase, UpdateCtx};
use crate::error::Error;
use crate::event::{Dispatch, EventCtx, MouseButton, UiEvent};
use crate::paint::Border;

use super::checkbox::{BOX_SIZE, LABEL_OFFSET};

const RADIUS: f32 = BOX_SIZE / 2.0;

/// A radio button. All radio buttons sharing a parent form one group with
/// at most one checked member.
///
/// Checking one emits [`UiEvent::CheckChanged`] with `radio: true` and the
/// parent's key as the group; every sibling radio observes that event
/// during root re-dispatch and unchecks itself. The observation handler
/// deliberately propagates so the whole group sees a single event.
pub struct Radiobutton {
    checked: bool,
    description: String,
    mouseover: bool,
}

impl Radiobutton {
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
}

impl Behavior for Radiobutton {
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
        match event {
            UiEvent::MouseUp { pos, button: MouseButton::Left } => {
                if !base.hidden && base.abs_rect().contains(*pos) && !self.checked {
                    self.checked = true;
                    ctx.emit(UiEvent::CheckChanged {
                        id: base.id.clone(),
                        source: base.key,
                        group: base.parent,
                        checked: true,
                        radio: true,
                    });
                    return Dispatch::Consumed;
                }
                Dispatch::Propagate
            }
            UiEvent::CheckChanged { source, group, radio: true, checked: true, .. } => {
                if *source != base.key && group.is_some() && *group == base.parent {
                    self.checked = false;
                }
                // Never consumed: every member of the group must see it.
                Dispatch::Propagate
            }
            _ => Dispatch::Propagate,
        }
    }

    fn render(&self, base: &ElementBase, painter: &mut Painter) {
        let style = &base.style;
        let rect = base.abs_rect();

        if self.mouseover {
            painter.fill_rounded_rect(rect, style.border_radius, style.border_rounding, style.hover_color);
        }

        let center = Vec2::new(
            rect.left() + style.padding + RADIUS,
            rect.top() + rect.height() / 2.0,
        );
        painter.circle(
            center,
            RADIUS,
            style.background_color,
            Some(Border { color: style.border_color, width: style.border_width.max(1.0) }),
        );
        if self.checked {
            painter.circle(center, RADIUS - 3.0, style.border_color, None);
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
