use crate::coords::Vec2;

// ── FontMetrics ───────────────────────────────────────────────────────────

/// Text measurement collaborator.
///
/// The toolkit never rasterizes glyphs itself; layout only needs extents
/// and per-character advances, which the embedding renderer supplies
/// through this trait.
pub trait FontMetrics {
    /// Extent of `text` rendered in `family` at `height` logical pixels.
    fn measure(&self, text: &str, family: &str, height: f32) -> Vec2;

    /// Horizontal advance of each `char` of `text`, in order.
    ///
    /// The sum of the advances equals `measure(..).x`.
    fn advances(&self, text: &str, family: &str, height: f32) -> Vec<f32>;
}

/// Deterministic box-model metrics: every character advances by a fixed
/// fraction of the font height. Used by the tests and by headless hosts.
#[derive(Debug, Copy, Clone)]
pub struct BoxMetrics {
    /// Advance as a fraction of font height.
    pub aspect: f32,
}

impl BoxMetrics {
    pub const fn new() -> Self {
        Self { aspect: 0.5 }
    }
}

impl Default for BoxMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FontMetrics for BoxMetrics {
    fn measure(&self, text: &str, _family: &str, height: f32) -> Vec2 {
        let count = text.chars().count() as f32;
        Vec2::new(count * height * self.aspect, height)
    }

    fn advances(&self, text: &str, _family: &str, height: f32) -> Vec<f32> {
        text.chars().map(|_| height * self.aspect).collect()
    }
}

// ── Images ────────────────────────────────────────────────────────────────

/// Image lookup collaborator for [`Icon`](crate::controls::Icon) widgets.
pub trait Images {
    /// Pixel size of the named image, or `None` if it is unknown.
    fn size(&self, name: &str) -> Option<Vec2>;
}

/// An image source with no images. Every lookup fails.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoImages;

impl Images for NoImages {
    fn size(&self, _name: &str) -> Option<Vec2> {
        None
    }
}
