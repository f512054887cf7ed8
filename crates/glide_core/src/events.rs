//! Input event model
//!
//! Events reach widgets with `x`/`y` already resolved to the receiving
//! widget's local coordinates. Handlers consume an event by calling
//! [`InputEvent::stop_propagation`]; [`InputEvent::prevent_default`]
//! suppresses the platform's default action (native page scroll, history
//! swipe, ...).

/// Event type identifier fed to [`StateTransitions`](crate::fsm::StateTransitions)
pub type EventType = u32;

/// Scroll / layout axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    pub fn other(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Pick the component of `(x, y)` along this axis
    pub fn pick(self, x: f64, y: f64) -> f64 {
        match self {
            Axis::Horizontal => x,
            Axis::Vertical => y,
        }
    }
}

/// Kind of device that produced a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

impl PointerType {
    /// Touch and pen drag content directly; a mouse pans only via the wheel
    pub fn drags_content(self) -> bool {
        matches!(self, PointerType::Touch | PointerType::Pen)
    }
}

/// Event-specific payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Wheel { delta_x: f64, delta_y: f64 },
}

/// A UI input event
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    pub kind: InputKind,
    /// Position in the receiving widget's local space
    pub x: f64,
    pub y: f64,
    /// Position in root (screen) space, unchanged while the event bubbles
    pub screen_x: f64,
    pub screen_y: f64,
    pub pointer_type: PointerType,
    pub propagation_stopped: bool,
    pub default_prevented: bool,
}

impl InputEvent {
    fn new(kind: InputKind, x: f64, y: f64, pointer_type: PointerType) -> Self {
        Self {
            kind,
            x,
            y,
            screen_x: x,
            screen_y: y,
            pointer_type,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    pub fn pointer_down(x: f64, y: f64, pointer_type: PointerType) -> Self {
        Self::new(InputKind::PointerDown, x, y, pointer_type)
    }

    pub fn pointer_move(x: f64, y: f64, pointer_type: PointerType) -> Self {
        Self::new(InputKind::PointerMove, x, y, pointer_type)
    }

    pub fn pointer_up(x: f64, y: f64, pointer_type: PointerType) -> Self {
        Self::new(InputKind::PointerUp, x, y, pointer_type)
    }

    pub fn wheel(x: f64, y: f64, delta_x: f64, delta_y: f64) -> Self {
        Self::new(
            InputKind::Wheel { delta_x, delta_y },
            x,
            y,
            PointerType::Mouse,
        )
    }

    /// Re-target the event at a widget whose local origin differs
    pub fn set_local(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_touch_and_pen_drag_content() {
        assert!(!PointerType::Mouse.drags_content());
        assert!(PointerType::Touch.drags_content());
        assert!(PointerType::Pen.drags_content());
    }

    #[test]
    fn test_set_local_keeps_screen_position() {
        let mut event = InputEvent::wheel(120.0, 80.0, 0.0, 10.0);
        event.set_local(20.0, 30.0);
        assert_eq!((event.x, event.y), (20.0, 30.0));
        assert_eq!((event.screen_x, event.screen_y), (120.0, 80.0));
    }

    #[test]
    fn test_propagation_flags() {
        let mut event = InputEvent::pointer_down(0.0, 0.0, PointerType::Touch);
        assert!(!event.propagation_stopped && !event.default_prevented);
        event.stop_propagation();
        event.prevent_default();
        assert!(event.propagation_stopped && event.default_prevented);
    }

    #[test]
    fn test_axis_pick() {
        assert_eq!(Axis::Horizontal.pick(1.0, 2.0), 1.0);
        assert_eq!(Axis::Vertical.pick(1.0, 2.0), 2.0);
        assert_eq!(Axis::Vertical.other(), Axis::Horizontal);
    }
}
