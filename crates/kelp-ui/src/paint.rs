// ── Color ─────────────────────────────────────────────────────────────────

/// Straight-alpha RGBA color, components in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    #[inline]
    pub const fn black() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }
    }

    #[inline]
    pub const fn white() -> Self {
        Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 }
    }

    /// Creates an opaque color from sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => {
                let (r, g, b) = (byte(0)?, byte(2)?, byte(4)?);
                Some(Self::from_rgb8(r, g, b))
            }
            8 => {
                let (r, g, b, a) = (byte(0)?, byte(2)?, byte(4)?, byte(6)?);
                Some(Self::new(
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                    a as f32 / 255.0,
                ))
            }
            _ => None,
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

// ── CornerMask ────────────────────────────────────────────────────────────

/// Which corners of a rounded rectangle actually get rounded.
///
/// A title bar, for example, rounds only its top corners so it sits flush
/// against the panel below it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CornerMask {
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_left: bool,
    pub bottom_right: bool,
}

impl CornerMask {
    pub const ALL: Self = Self {
        top_left: true,
        top_right: true,
        bottom_left: true,
        bottom_right: true,
    };

    pub const NONE: Self = Self {
        top_left: false,
        top_right: false,
        bottom_left: false,
        bottom_right: false,
    };

    pub const TOP: Self = Self {
        top_left: true,
        top_right: true,
        bottom_left: false,
        bottom_right: false,
    };

    pub const BOTTOM: Self = Self {
        top_left: false,
        top_right: false,
        bottom_left: true,
        bottom_right: true,
    };

    /// Parses the `border_rounding` style syntax: a dash-separated list of
    /// `tl`, `tr`, `bl`, `br`, or the shorthands `all`, `none`, `top`,
    /// `bottom`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => return Some(Self::ALL),
            "none" => return Some(Self::NONE),
            "top" => return Some(Self::TOP),
            "bottom" => return Some(Self::BOTTOM),
            _ => {}
        }
        let mut mask = Self::NONE;
        for part in s.split('-') {
            match part {
                "tl" => mask.top_left = true,
                "tr" => mask.top_right = true,
                "bl" => mask.bottom_left = true,
                "br" => mask.bottom_right = true,
                _ => return None,
            }
        }
        Some(mask)
    }
}

impl Default for CornerMask {
    fn default() -> Self {
        Self::ALL
    }
}

// ── Border ────────────────────────────────────────────────────────────────

/// Stroke settings for an outlined shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Border {
    pub color: Color,
    pub width: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_six_digits() {
        let c = Color::from_hex("#336699").unwrap();
        assert!((c.r - 0x33 as f32 / 255.0).abs() < 1e-6);
        assert!((c.b - 0x99 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn hex_eight_digits_and_no_hash() {
        let c = Color::from_hex("ff000080").unwrap();
        assert_eq!(c.r, 1.0);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn hex_rejects_garbage() {
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn corner_mask_shorthands() {
        assert_eq!(CornerMask::parse("top"), Some(CornerMask::TOP));
        assert_eq!(CornerMask::parse("none"), Some(CornerMask::NONE));
    }

    #[test]
    fn corner_mask_list() {
        let m = CornerMask::parse("tl-br").unwrap();
        assert!(m.top_left && m.bottom_right);
        assert!(!m.top_right && !m.bottom_left);
    }

    #[test]
    fn corner_mask_rejects_unknown() {
        assert!(CornerMask::parse("tl-xx").is_none());
    }
}
