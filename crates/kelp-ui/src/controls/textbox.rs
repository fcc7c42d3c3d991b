use crate::coords::{Rect, Vec2};
use crate::draw::Painter;
use crate::element::{Behavior, CreateCtx, ElementBase, UpdateCtx};
use crate::error::Error;
use crate::event::{Dispatch, EventCtx, Key, MouseButton, UiEvent};
use crate::paint::Border;
use crate::text::FontMetrics;

/// Frames per blink phase of the caret.
const BLINK_FRAMES: u64 = 30;

/// A single-line editable text field. Unfocused until clicked; only a
/// focused box consumes key and text input.
///
/// The cursor is a byte offset into the text, always on a char boundary.
/// Clicking places the cursor at the nearest character boundary to the
/// click, found by binary search over the prefix sums of the glyph
/// advances.
pub struct TextBox {
    text: String,
    /// Byte offset of the caret, always on a char boundary.
    cursor: usize,
    focus: bool,
    blink_visible: bool,
}

impl TextBox {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor, focus: false, blink_visible: true }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Places the cursor at the boundary nearest to the absolute click
    /// position `pos`.
    fn cursor_from_pixel(&mut self, base: &ElementBase, pos: Vec2, fonts: &dyn FontMetrics) {
        let style = &base.style;
        let rel_x = pos.x - base.abs_origin.x - style.padding;

        let advances = fonts.advances(&self.text, &style.font_family, style.font_height);
        // prefix[i] = x of the boundary after the first i characters.
        let mut prefix = Vec::with_capacity(advances.len() + 1);
        let mut acc = 0.0;
        prefix.push(0.0);
        for a in &advances {
            acc += a;
            prefix.push(acc);
        }

        // First boundary at or past the click, then pick the nearer of it
        // and the one before.
        let idx = prefix.partition_point(|&x| x < rel_x);
        let char_idx = if idx == 0 {
            0
        } else if idx > advances.len() {
            advances.len()
        } else if rel_x - prefix[idx - 1] < prefix[idx] - rel_x {
            idx - 1
        } else {
            idx
        };

        self.cursor = self
            .text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len());
    }

    fn insert(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = prev_char(&self.text, self.cursor);
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.text.len() {
            let next = next_char(&self.text, self.cursor);
            self.text.replace_range(self.cursor..next, "");
        }
    }
}

impl Behavior for TextBox {
    fn create(&mut self, base: &mut ElementBase, _ctx: &CreateCtx) -> Result<(), Error> {
        let style = &base.style;
        let w = base.attr_f32("width").unwrap_or(120.0);
        base.rect.size = Vec2::new(w, style.font_height + 2.0 * style.padding);
        Ok(())
    }

    fn update(&mut self, base: &mut ElementBase, ctx: &UpdateCtx) {
        let _ = base;
        self.blink_visible = (ctx.frame / BLINK_FRAMES) % 2 == 0;
    }

    fn on_event(&mut self, base: &mut ElementBase, event: &UiEvent, ctx: &mut EventCtx) -> Dispatch {
        match event {
            UiEvent::MouseDown { pos, button: MouseButton::Left } => {
                if !base.hidden && base.abs_rect().contains(*pos) {
                    self.focus = true;
                    self.cursor_from_pixel(base, *pos, ctx.fonts);
                    return Dispatch::Consumed;
                }
                self.focus = false;
                Dispatch::Propagate
            }
            UiEvent::KeyPress { key } if self.focus => {
                match key {
                    Key::Left => self.cursor = prev_char(&self.text, self.cursor),
                    Key::Right => self.cursor = next_char(&self.text, self.cursor),
                    Key::Home => self.cursor = 0,
                    Key::End => self.cursor = self.text.len(),
                    Key::Backspace => self.backspace(),
                    Key::Delete => self.delete(),
                    Key::Escape => {
                        self.focus = false;
                        return Dispatch::Consumed;
                    }
                    Key::Enter => return Dispatch::Consumed,
                }
                Dispatch::Consumed
            }
            UiEvent::TextInput { text } if self.focus => {
                self.insert(text);
                Dispatch::Consumed
            }
            _ => Dispatch::Propagate,
        }
    }

    fn render(&self, base: &ElementBase, painter: &mut Painter) {
        let style = &base.style;
        let rect = base.abs_rect();

        painter.fill_rounded_rect(
            rect,
            style.border_radius,
            style.border_rounding,
            style.background_color,
        );
        painter.stroke_rounded_rect(
            rect,
            style.border_radius,
            style.border_rounding,
            Border { color: style.border_color, width: style.border_width.max(1.0) },
        );

        let text_pos = Vec2::new(rect.left() + style.padding, rect.top() + style.padding);
        painter.text(text_pos, &self.text, &style.font_family, style.font_height, style.font_color);

        if self.focus && self.blink_visible {
            let before = &self.text[..self.cursor];
            let x = painter.measure(before, &style.font_family, style.font_height).x;
            painter.fill_rounded_rect(
                Rect::new(text_pos.x + x, text_pos.y, 1.0, style.font_height),
                0.0,
                crate::paint::CornerMask::NONE,
                style.font_color,
            );
        }
    }
}

// ── cursor helpers ────────────────────────────────────────────────────────

/// Step one codepoint boundary back from `from`.
fn prev_char(s: &str, from: usize) -> usize {
    if from == 0 {
        return 0;
    }
    let mut i = from - 1;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Step one codepoint boundary forward from `from`.
fn next_char(s: &str, from: usize) -> usize {
    if from >= s.len() {
        return s.len();
    }
    let mut i = from + 1;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::text::{BoxMetrics, NoImages};
    use std::collections::HashMap;

    fn textbox(text: &str) -> Element {
        let base = ElementBase::new(crate::style::lookup("default").unwrap(), HashMap::new());
        let mut el = Element::new(base, Box::new(TextBox::new(text)));
        let fonts = BoxMetrics::new();
        let images = NoImages;
        el.create(&CreateCtx { fonts: &fonts, images: &images }).unwrap();
        el.update(Vec2::zero(), &UpdateCtx { mouse: Vec2::zero(), frame: 0 });
        el
    }

    fn send(el: &mut Element, event: UiEvent) -> Dispatch {
        let fonts = BoxMetrics::new();
        let mut ctx = EventCtx::new(&fonts);
        el.dispatch(&event, &mut ctx)
    }

    #[test]
    fn text_input_inserts_at_cursor_when_focused() {
        let fonts = BoxMetrics::new();
        let mut ctx = EventCtx::new(&fonts);
        let mut base = ElementBase::new(crate::style::lookup("default").unwrap(), HashMap::new());
        let mut t = TextBox::new("ac");
        t.focus = true;
        t.cursor = 1;
        let r = t.on_event(&mut base, &UiEvent::TextInput { text: "b".into() }, &mut ctx);
        assert_eq!(r, Dispatch::Consumed);
        assert_eq!(t.text(), "abc");
        assert_eq!(t.cursor(), 2);
    }

    #[test]
    fn backspace_and_delete_edit_char_boundaries() {
        let mut t = TextBox::new("héllo");
        t.cursor = t.text.len();
        t.backspace();
        assert_eq!(t.text(), "héll");
        t.cursor = 0;
        t.delete();
        assert_eq!(t.text(), "éll");
        // The next delete removes the two-byte é cleanly.
        t.delete();
        assert_eq!(t.text(), "ll");
    }

    #[test]
    fn cursor_movement_clamps_at_ends() {
        let mut t = TextBox::new("ab");
        t.cursor = 0;
        t.cursor = prev_char(&t.text, t.cursor);
        assert_eq!(t.cursor, 0);
        t.cursor = t.text.len();
        t.cursor = next_char(&t.text, t.cursor);
        assert_eq!(t.cursor, 2);
    }

    #[test]
    fn insert_mid_string() {
        let mut t = TextBox::new("ad");
        t.cursor = 1;
        t.insert("bc");
        assert_eq!(t.text(), "abcd");
        assert_eq!(t.cursor(), 3);
    }

    #[test]
    fn click_places_cursor_at_nearest_boundary() {
        let fonts = BoxMetrics::new();
        let base = ElementBase::new(crate::style::lookup("default").unwrap(), HashMap::new());
        let mut t = TextBox::new("abcd");
        // BoxMetrics at font height 14 → each advance is 7; padding is 3.
        // Boundaries sit at x = 3, 10, 17, 24, 31 (absolute).
        let mut b = base;
        b.rect.size = Vec2::new(120.0, 20.0);
        b.abs_origin = Vec2::zero();

        t.cursor_from_pixel(&b, Vec2::new(3.0, 5.0), &fonts);
        assert_eq!(t.cursor(), 0);
        t.cursor_from_pixel(&b, Vec2::new(12.0, 5.0), &fonts);
        assert_eq!(t.cursor(), 1);
        t.cursor_from_pixel(&b, Vec2::new(15.0, 5.0), &fonts);
        assert_eq!(t.cursor(), 2);
        t.cursor_from_pixel(&b, Vec2::new(500.0, 5.0), &fonts);
        assert_eq!(t.cursor(), 4);
    }

    #[test]
    fn box_is_unfocused_until_clicked() {
        let mut el = textbox("ab");
        // Fresh from the document: no focus, input passes through.
        assert_eq!(
            send(&mut el, UiEvent::TextInput { text: "x".into() }),
            Dispatch::Propagate
        );
        assert_eq!(send(&mut el, UiEvent::KeyPress { key: Key::Backspace }), Dispatch::Propagate);

        send(&mut el, UiEvent::MouseDown { pos: Vec2::new(5.0, 5.0), button: MouseButton::Left });
        assert_eq!(
            send(&mut el, UiEvent::TextInput { text: "x".into() }),
            Dispatch::Consumed
        );
    }

    #[test]
    fn click_elsewhere_drops_focus() {
        let mut el = textbox("ab");
        send(&mut el, UiEvent::MouseDown { pos: Vec2::new(5.0, 5.0), button: MouseButton::Left });
        send(&mut el, UiEvent::MouseDown { pos: Vec2::new(900.0, 900.0), button: MouseButton::Left });
        assert_eq!(send(&mut el, UiEvent::KeyPress { key: Key::Backspace }), Dispatch::Propagate);
    }
}
