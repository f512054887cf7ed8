//! Box constraints passed down the tree during layout

use glide_core::Size;

/// Min/max extents a child must fit. Unbounded maxima are `f64::INFINITY`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxConstraints {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl Default for BoxConstraints {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl BoxConstraints {
    pub const UNBOUNDED: BoxConstraints = BoxConstraints {
        min_width: 0.0,
        max_width: f64::INFINITY,
        min_height: 0.0,
        max_height: f64::INFINITY,
    };

    /// Exactly `size`
    pub fn tight(size: Size) -> Self {
        Self {
            min_width: size.width,
            max_width: size.width,
            min_height: size.height,
            max_height: size.height,
        }
    }

    /// Anything up to `size`
    pub fn loose(size: Size) -> Self {
        Self {
            min_width: 0.0,
            max_width: size.width,
            min_height: 0.0,
            max_height: size.height,
        }
    }

    pub fn has_bounded_width(&self) -> bool {
        self.max_width.is_finite()
    }

    pub fn has_bounded_height(&self) -> bool {
        self.max_height.is_finite()
    }

    pub fn with_max_width(self, max_width: f64) -> Self {
        Self {
            max_width,
            min_width: self.min_width.min(max_width),
            ..self
        }
    }

    pub fn with_max_height(self, max_height: f64) -> Self {
        Self {
            max_height,
            min_height: self.min_height.min(max_height),
            ..self
        }
    }

    pub fn constrain_width(&self, width: f64) -> f64 {
        width.max(self.min_width).min(self.max_width)
    }

    pub fn constrain_height(&self, height: f64) -> f64 {
        height.max(self.min_height).min(self.max_height)
    }

    pub fn constrain(&self, size: Size) -> Size {
        Size::new(
            self.constrain_width(size.width),
            self.constrain_height(size.height),
        )
    }
}
