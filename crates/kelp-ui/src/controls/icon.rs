use crate::coords::Vec2;
use crate::draw::Painter;
use crate::element::{Behavior, CreateCtx, ElementBase};
use crate::error::Error;

/// A static image, sized from the image collaborator at creation.
///
/// An unknown image name logs a warning and yields a zero-sized element
/// rather than failing the document load.
pub struct Icon {
    name: String,
    size: Vec2,
}

impl Icon {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), size: Vec2::zero() }
    }
}

impl Behavior for Icon {
    fn create(&mut self, base: &mut ElementBase, ctx: &CreateCtx) -> Result<(), Error> {
        match ctx.images.size(&self.name) {
            Some(size) => self.size = size,
            None => log::warn!("unknown image `{}`", self.name),
        }
        base.rect.size = self.size;
        Ok(())
    }

    fn render(&self, base: &ElementBase, painter: &mut Painter) {
        if self.size == Vec2::zero() {
            return;
        }
        painter.image(base.abs_rect(), &self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::text::{BoxMetrics, Images, NoImages};
    use std::collections::HashMap;

    struct OneImage;
    impl Images for OneImage {
        fn size(&self, name: &str) -> Option<Vec2> {
            (name == "close.png").then_some(Vec2::new(16.0, 16.0))
        }
    }

    fn icon(name: &str, images: &dyn Images) -> Element {
        let base = ElementBase::new(crate::style::lookup("default").unwrap(), HashMap::new());
        let mut el = Element::new(base, Box::new(Icon::new(name)));
        let fonts = BoxMetrics::new();
        el.create(&CreateCtx { fonts: &fonts, images }).unwrap();
        el
    }

    #[test]
    fn sized_from_image_collaborator() {
        let el = icon("close.png", &OneImage);
        assert_eq!(el.base.rect.size, Vec2::new(16.0, 16.0));
    }

    #[test]
    fn missing_image_yields_zero_size() {
        let el = icon("nope.png", &NoImages);
        assert_eq!(el.base.rect.size, Vec2::zero());
    }
}
