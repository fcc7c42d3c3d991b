use crate::coords::{Rect, Vec2};
use crate::draw::Painter;
use crate::element::{ArrangeCtx, Behavior, CreateCtx, ElementBase};
use crate::error::Error;
use crate::text::FontMetrics;

/// Vertical gap between wrapped lines, in logical pixels.
const LINE_GAP: f32 = 2.0;

/// A block of static, word-wrapped text.
///
/// Unlike other controls the final content depends on the arranged width,
/// so wrapping happens in `arrange` rather than `create`. The rect grows
/// vertically if the wrapped text needs more lines than the allotted
/// height holds.
pub struct Label {
    text: String,
    lines: Vec<String>,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), lines: Vec::new() }
    }

    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Behavior for Label {
    fn create(&mut self, base: &mut ElementBase, _ctx: &CreateCtx) -> Result<(), Error> {
        let w = base.attr_f32("width").unwrap_or(100.0);
        let h = base.attr_f32("height").unwrap_or(100.0);
        base.rect.size = Vec2::new(w, h);
        Ok(())
    }

    fn arrange(
        &mut self,
        base: &mut ElementBase,
        area: Rect,
        ctx: &ArrangeCtx,
    ) -> Result<Rect, Error> {
        base.arrange(area, ctx)?;

        let style = base.style.clone();
        let max_width = base.rect.width() - 2.0 * style.padding;
        self.lines = wrap_multiline(
            &self.text,
            ctx.fonts,
            &style.font_family,
            style.font_height,
            max_width,
        );

        let needed = 2.0 * style.padding
            + self.lines.len() as f32 * (style.font_height + LINE_GAP);
        if needed > base.rect.height() {
            base.rect.size.y = needed;
        }
        Ok(base.rect)
    }

    fn render(&self, base: &ElementBase, painter: &mut Painter) {
        let style = &base.style;
        let origin = base.abs_origin;
        for (n, line) in self.lines.iter().enumerate() {
            painter.text(
                Vec2::new(
                    origin.x + style.padding,
                    origin.y + style.padding + n as f32 * (style.font_height + LINE_GAP),
                ),
                line,
                &style.font_family,
                style.font_height,
                style.font_color,
            );
        }
    }
}

/// Greedy word wrap: break at whitespace where possible, mid-word when a
/// single word is wider than the line.
fn wrap_line(
    line: &str,
    fonts: &dyn FontMetrics,
    family: &str,
    height: f32,
    max_width: f32,
) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    let mut flush = |current: &mut String, out: &mut Vec<String>| {
        if !current.is_empty() {
            out.push(std::mem::take(current));
        }
    };

    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if fonts.measure(&candidate, family, height).x <= max_width {
            current = candidate;
            continue;
        }
        flush(&mut current, &mut out);

        if fonts.measure(word, family, height).x <= max_width {
            current = word.to_string();
            continue;
        }
        // Word longer than the whole line: hard-break it.
        let mut piece = String::new();
        for ch in word.chars() {
            piece.push(ch);
            if fonts.measure(&piece, family, height).x > max_width && piece.chars().count() > 1 {
                let overflow = piece.pop();
                out.push(std::mem::take(&mut piece));
                if let Some(c) = overflow {
                    piece.push(c);
                }
            }
        }
        current = piece;
    }
    flush(&mut current, &mut out);

    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn wrap_multiline(
    text: &str,
    fonts: &dyn FontMetrics,
    family: &str,
    height: f32,
    max_width: f32,
) -> Vec<String> {
    text.lines()
        .flat_map(|line| wrap_line(line, fonts, family, height, max_width))
        .collect()
}
