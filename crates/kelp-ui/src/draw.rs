use crate::coords::{Rect, Vec2};
use crate::paint::{Border, Color, CornerMask};
use crate::text::FontMetrics;

// ── DrawCmd ───────────────────────────────────────────────────────────────

/// Renderer-agnostic draw command stream.
///
/// Widgets render into a [`DrawList`] of these; the embedding renderer
/// replays the list with whatever backend it has. All coordinates are
/// absolute logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    RoundedRect {
        rect: Rect,
        radius: f32,
        corners: CornerMask,
        fill: Color,
        border: Option<Border>,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Color,
        border: Option<Border>,
    },
    Text {
        pos: Vec2,
        text: String,
        family: String,
        height: f32,
        color: Color,
    },
    Image {
        rect: Rect,
        name: String,
    },
}

// ── DrawList ──────────────────────────────────────────────────────────────

/// Ordered list of draw commands for one frame. Later commands paint over
/// earlier ones.
#[derive(Debug, Default)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    #[inline]
    pub fn cmds(&self) -> &[DrawCmd] {
        &self.cmds
    }

    #[inline]
    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }
}

// ── Painter ───────────────────────────────────────────────────────────────

/// Drawing surface passed to widget `render` implementations.
///
/// Wraps a [`DrawList`] with shape helpers and exposes the frame's font
/// metrics so widgets can position text as they paint.
pub struct Painter<'a> {
    list: &'a mut DrawList,
    pub fonts: &'a dyn FontMetrics,
}

impl<'a> Painter<'a> {
    pub fn new(list: &'a mut DrawList, fonts: &'a dyn FontMetrics) -> Self {
        Self { list, fonts }
    }

    /// Filled rounded rectangle with no outline.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, corners: CornerMask, fill: Color) {
        self.list.push(DrawCmd::RoundedRect { rect, radius, corners, fill, border: None });
    }

    /// Rounded rectangle outline with no fill.
    pub fn stroke_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f32,
        corners: CornerMask,
        border: Border,
    ) {
        self.list.push(DrawCmd::RoundedRect {
            rect,
            radius,
            corners,
            fill: Color::transparent(),
            border: Some(border),
        });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, fill: Color, border: Option<Border>) {
        self.list.push(DrawCmd::Circle { center, radius, fill, border });
    }

    /// Single line of text with `pos` as its top-left corner.
    pub fn text(&mut self, pos: Vec2, text: &str, family: &str, height: f32, color: Color) {
        self.list.push(DrawCmd::Text {
            pos,
            text: text.to_string(),
            family: family.to_string(),
            height,
            color,
        });
    }

    pub fn image(&mut self, rect: Rect, name: &str) {
        self.list.push(DrawCmd::Image { rect, name: name.to_string() });
    }

    /// Measures `text` with the frame's font metrics.
    #[inline]
    pub fn measure(&self, text: &str, family: &str, height: f32) -> Vec2 {
        self.fonts.measure(text, family, height)
    }
}
