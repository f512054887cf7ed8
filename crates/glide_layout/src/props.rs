//! Viewport and scroll view configuration
//!
//! Plain data with documented defaults. Callbacks are registered on the
//! widgets themselves, so everything here is `Clone` and (with the `serde`
//! feature) serializable.

use glide_core::Axis;
use glide_paint::Color;

/// Whether a scroll view clips its content to its own bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overflow {
    #[default]
    Hidden,
    Visible,
}

/// When scrollbars are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollbarVisibility {
    /// Both tracks are always shown; a thumb appears only on axes whose
    /// content overflows
    Always,
    /// Never shown
    Hidden,
    /// Shown per axis while content overflows the viewport
    #[default]
    Auto,
}

/// Transform and scale limits of a [`Viewport`](crate::Viewport)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportProps {
    pub scale: f64,
    pub tx: f64,
    pub ty: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Explicit size, used when layout leaves the axis unbounded
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Default for ViewportProps {
    fn default() -> Self {
        Self {
            scale: 1.0,
            tx: 0.0,
            ty: 0.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
            min_scale: 0.1,
            max_scale: 10.0,
            width: None,
            height: None,
        }
    }
}

impl ViewportProps {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }
}

/// Scrollbar appearance
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollbarStyle {
    /// Thumb thickness at rest
    pub width: f64,
    /// Thumb thickness while hovered or dragged; also the track thickness
    pub hover_width: f64,
    /// Lower bound on thumb length
    pub min_thumb_length: f64,
    pub color: Color,
    pub hover_color: Color,
    pub active_color: Color,
    pub track_color: Color,
    pub corner_radius: f64,
}

impl Default for ScrollbarStyle {
    fn default() -> Self {
        Self {
            width: 6.0,
            hover_width: 10.0,
            min_thumb_length: 20.0,
            color: Color::new(0.5, 0.5, 0.5, 0.5),
            hover_color: Color::new(0.6, 0.6, 0.6, 0.8),
            active_color: Color::new(0.7, 0.7, 0.7, 0.9),
            track_color: Color::new(0.5, 0.5, 0.5, 0.1),
            corner_radius: 3.0,
        }
    }
}

impl ScrollbarStyle {
    /// Thickness reserved for the track
    pub fn track_thickness(&self) -> f64 {
        self.width.max(self.hover_width)
    }
}

/// Scroll view configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollViewProps {
    pub viewport: ViewportProps,
    pub overflow: Overflow,
    /// Rubber-band past the edges (default: true)
    pub enable_bounce: bool,
    /// Per-axis override of `enable_bounce`
    pub enable_bounce_horizontal: Option<bool>,
    pub enable_bounce_vertical: Option<bool>,
    /// Let the wheel push past an edge the offset is resting on
    pub enable_wheel_bounce: bool,
    /// Upper bound on overscroll, further limited to half the viewport
    pub max_bounce_distance: f64,
    /// Fraction of the remaining distance covered per rebound frame
    pub bounce_damping: f64,
    /// Quiet period after the last scroll delta before a rebound check
    pub bounce_debounce_ms: f64,
    pub scrollbar_visibility: ScrollbarVisibility,
    pub scrollbar: ScrollbarStyle,
}

impl Default for ScrollViewProps {
    fn default() -> Self {
        Self {
            viewport: ViewportProps::default(),
            overflow: Overflow::Hidden,
            enable_bounce: true,
            enable_bounce_horizontal: None,
            enable_bounce_vertical: None,
            enable_wheel_bounce: false,
            max_bounce_distance: 400.0,
            bounce_damping: 0.2,
            bounce_debounce_ms: 50.0,
            scrollbar_visibility: ScrollbarVisibility::Auto,
            scrollbar: ScrollbarStyle::default(),
        }
    }
}

impl ScrollViewProps {
    /// Hard edges on both axes
    pub fn no_bounce() -> Self {
        Self {
            enable_bounce: false,
            ..Default::default()
        }
    }

    /// Bounce resolved for one axis
    pub fn bounce_enabled(&self, axis: Axis) -> bool {
        let explicit = match axis {
            Axis::Horizontal => self.enable_bounce_horizontal,
            Axis::Vertical => self.enable_bounce_vertical,
        };
        explicit.unwrap_or(self.enable_bounce)
    }

    /// Wheel may start an overscroll on this axis
    pub fn wheel_bounce_enabled(&self, axis: Axis) -> bool {
        self.enable_wheel_bounce && self.bounce_enabled(axis)
    }

    /// The axis the content must fit, if bounce is off on exactly one axis
    pub fn constrained_axis(&self) -> Option<Axis> {
        let h = self.bounce_enabled(Axis::Horizontal);
        let v = self.bounce_enabled(Axis::Vertical);
        match (h, v) {
            (false, true) => Some(Axis::Horizontal),
            (true, false) => Some(Axis::Vertical),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_override_falls_back_to_global() {
        let props = ScrollViewProps {
            enable_bounce: false,
            enable_bounce_vertical: Some(true),
            ..Default::default()
        };
        assert!(!props.bounce_enabled(Axis::Horizontal));
        assert!(props.bounce_enabled(Axis::Vertical));
        assert_eq!(props.constrained_axis(), Some(Axis::Horizontal));
    }

    #[test]
    fn test_no_constrained_axis_when_uniform() {
        assert_eq!(ScrollViewProps::default().constrained_axis(), None);
        assert_eq!(ScrollViewProps::no_bounce().constrained_axis(), None);
    }

    #[test]
    fn test_wheel_bounce_requires_axis_bounce() {
        let props = ScrollViewProps {
            enable_wheel_bounce: true,
            enable_bounce_horizontal: Some(false),
            ..Default::default()
        };
        assert!(!props.wheel_bounce_enabled(Axis::Horizontal));
        assert!(props.wheel_bounce_enabled(Axis::Vertical));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_props_serde_round_trip() {
        let props = ScrollViewProps {
            scrollbar_visibility: ScrollbarVisibility::Always,
            ..ScrollViewProps::no_bounce()
        };
        let json = serde_json::to_string(&props).unwrap();
        let back: ScrollViewProps = serde_json::from_str(&json).unwrap();
        assert_eq!(back, props);
    }
}
