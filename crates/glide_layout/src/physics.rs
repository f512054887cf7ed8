//! Rubber-band scroll physics
//!
//! Pure per-axis math used by [`ScrollView`](crate::ScrollView): which
//! deltas a region may consume, how much resistance an overscroll meets,
//! and the bounce state machine that drives the rebound animation.

use glide_core::fsm::StateTransitions;

/// Deltas are halved before resistance is applied past an edge
pub const BASE_RESISTANCE: f64 = 0.5;

/// Overscroll never exceeds this fraction of the viewport
pub const MAX_BOUNCE_VIEWPORT_FRACTION: f64 = 0.5;

/// Movement below this is not a visible scroll
pub const SCROLL_EPSILON: f64 = 0.1;

/// Rebound snaps to its target once every axis is this close
pub const SETTLE_EPSILON: f64 = 0.5;

/// Largest valid offset along an axis
pub fn max_scroll(content: f64, viewport: f64) -> f64 {
    (content - viewport).max(0.0)
}

/// Overscroll allowance along an axis
pub fn max_bounce(max_bounce_distance: f64, viewport: f64) -> f64 {
    max_bounce_distance
        .min(viewport * MAX_BOUNCE_VIEWPORT_FRACTION)
        .max(0.0)
}

/// Distance `current` lies outside `[0, max]`
pub fn overscroll(current: f64, max: f64) -> f64 {
    if current < 0.0 {
        -current
    } else if current > max {
        current - max
    } else {
        0.0
    }
}

pub fn is_out_of_bounds(current: f64, max: f64) -> bool {
    current < 0.0 || current > max
}

/// `(1 - min(1, overscroll / max_bounce))^2`: 1 at the edge, 0 at the limit
pub fn resistance_factor(overscroll: f64, max_bounce: f64) -> f64 {
    if max_bounce <= 0.0 {
        return 0.0;
    }
    let remaining = 1.0 - (overscroll / max_bounce).min(1.0);
    remaining * remaining
}

/// Whether a region at `current` (valid range `[0, max]`) takes `delta`.
///
/// Past an edge only deltas heading back into range are taken. Inside the
/// range a delta is taken unless the offset already rests on the edge it
/// points at, in which case `bounce_at_edge` decides.
pub fn can_consume_delta(current: f64, max: f64, delta: f64, bounce_at_edge: bool) -> bool {
    if delta == 0.0 || !delta.is_finite() {
        return false;
    }
    if current < 0.0 {
        return delta > 0.0;
    }
    if current > max {
        return delta < 0.0;
    }
    if delta < 0.0 {
        current > 0.0 || bounce_at_edge
    } else {
        current < max || bounce_at_edge
    }
}

/// Drag variant of [`can_consume_delta`].
///
/// A bouncy axis already past an edge keeps taking the drag in either
/// direction so the finger can stretch it further; [`next_offset`] applies
/// the resistance and the allowance clamp.
pub fn can_drag_delta(current: f64, max: f64, delta: f64, bounce: bool) -> bool {
    if bounce && is_out_of_bounds(current, max) && delta != 0.0 && delta.is_finite() {
        return true;
    }
    can_consume_delta(current, max, delta, bounce)
}

/// Next offset after applying `delta`.
///
/// `bounce` is the axis' overscroll allowance, or `None` for hard edges.
pub fn next_offset(current: f64, delta: f64, max: f64, bounce: Option<f64>) -> f64 {
    let tentative = current + delta;
    if (0.0..=max).contains(&tentative) {
        return tentative;
    }
    match bounce {
        None => tentative.clamp(0.0, max),
        Some(limit) => {
            let factor = resistance_factor(overscroll(current, max), limit);
            let next = current + delta * BASE_RESISTANCE * factor;
            next.clamp(-limit, max + limit)
        }
    }
}

/// Bounce-back state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BounceState {
    #[default]
    Idle,
    /// Rebound animation in flight
    Bouncing,
    /// Rebound cut short by new input; its completion is not reported
    Interrupted,
}

/// Bounce event ids
pub mod bounce_events {
    use glide_core::EventType;

    /// A rebound check found the offset out of range
    pub const OUT_OF_BOUNDS: EventType = 10_001;
    /// Offset reached its clamped target, or there was nothing to do
    pub const SETTLED: EventType = 10_002;
    /// Pointer down or a new scroll delta
    pub const INTERRUPT: EventType = 10_003;
}

impl StateTransitions for BounceState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use bounce_events::*;

        match (self, event) {
            (BounceState::Idle, OUT_OF_BOUNDS) => Some(BounceState::Bouncing),
            (BounceState::Interrupted, OUT_OF_BOUNDS) => Some(BounceState::Bouncing),
            (BounceState::Bouncing, SETTLED) => Some(BounceState::Idle),
            (BounceState::Interrupted, SETTLED) => Some(BounceState::Idle),
            (BounceState::Bouncing, INTERRUPT) => Some(BounceState::Interrupted),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_bounce_limited_by_viewport() {
        assert_eq!(max_bounce(400.0, 300.0), 150.0);
        assert_eq!(max_bounce(100.0, 300.0), 100.0);
        assert_eq!(max_bounce(400.0, 0.0), 0.0);
    }

    #[test]
    fn test_resistance_factor_shape() {
        assert_eq!(resistance_factor(0.0, 100.0), 1.0);
        assert_eq!(resistance_factor(50.0, 100.0), 0.25);
        assert_eq!(resistance_factor(100.0, 100.0), 0.0);
        assert_eq!(resistance_factor(250.0, 100.0), 0.0);
        assert_eq!(resistance_factor(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_can_consume_inside_range() {
        assert!(can_consume_delta(50.0, 100.0, 10.0, false));
        assert!(can_consume_delta(50.0, 100.0, -10.0, false));
        assert!(!can_consume_delta(50.0, 100.0, 0.0, true));
    }

    #[test]
    fn test_can_consume_at_edges() {
        assert!(!can_consume_delta(0.0, 100.0, -10.0, false));
        assert!(can_consume_delta(0.0, 100.0, -10.0, true));
        assert!(can_consume_delta(0.0, 100.0, 10.0, false));
        assert!(!can_consume_delta(100.0, 100.0, 10.0, false));
        assert!(can_consume_delta(100.0, 100.0, 10.0, true));
    }

    #[test]
    fn test_can_consume_past_edges_only_back_into_range() {
        assert!(can_consume_delta(-20.0, 100.0, 5.0, false));
        assert!(!can_consume_delta(-20.0, 100.0, -5.0, true));
        assert!(can_consume_delta(130.0, 100.0, -5.0, false));
        assert!(!can_consume_delta(130.0, 100.0, 5.0, true));
    }

    #[test]
    fn test_nothing_to_scroll() {
        assert!(!can_consume_delta(0.0, 0.0, 10.0, false));
        assert!(!can_consume_delta(0.0, 0.0, -10.0, false));
    }

    #[test]
    fn test_drag_keeps_stretching_past_edge() {
        assert!(can_drag_delta(-20.0, 100.0, -5.0, true));
        assert!(can_drag_delta(130.0, 100.0, 5.0, true));
        assert!(can_drag_delta(-20.0, 100.0, 5.0, true));
        assert!(!can_drag_delta(-20.0, 100.0, 0.0, true));
        // Hard axes and in-range offsets follow the wheel rule
        assert!(!can_drag_delta(-20.0, 100.0, -5.0, false));
        assert!(!can_drag_delta(0.0, 100.0, -5.0, false));
        assert!(can_drag_delta(0.0, 100.0, -5.0, true));
        assert!(can_drag_delta(50.0, 100.0, 5.0, false));
    }

    #[test]
    fn test_next_offset_hard_edges_clamp() {
        assert_eq!(next_offset(90.0, 30.0, 100.0, None), 100.0);
        assert_eq!(next_offset(10.0, -30.0, 100.0, None), 0.0);
        assert_eq!(next_offset(10.0, 30.0, 100.0, None), 40.0);
    }

    #[test]
    fn test_next_offset_resisted_past_edge() {
        // At the edge the factor is 1, so the delta is halved
        assert_eq!(next_offset(0.0, -40.0, 100.0, Some(150.0)), -20.0);
        let second = next_offset(-20.0, -40.0, 100.0, Some(150.0));
        assert!(second < -20.0);
        assert!(-20.0 - second < 20.0);
    }

    #[test]
    fn test_next_offset_bounded_by_allowance() {
        let mut offset = 0.0;
        for _ in 0..500 {
            offset = next_offset(offset, -1000.0, 100.0, Some(50.0));
            assert!(offset >= -50.0);
        }
    }

    #[test]
    fn test_bounce_transitions() {
        use bounce_events::*;

        let mut state = BounceState::Idle;
        assert!(!state.transition(SETTLED));
        assert!(!state.transition(INTERRUPT));
        assert!(state.transition(OUT_OF_BOUNDS));
        assert_eq!(state, BounceState::Bouncing);
        assert!(state.transition(INTERRUPT));
        assert_eq!(state, BounceState::Interrupted);
        assert!(state.transition(OUT_OF_BOUNDS));
        assert!(state.transition(SETTLED));
        assert_eq!(state, BounceState::Idle);

        let mut interrupted = BounceState::Interrupted;
        assert!(interrupted.transition(SETTLED));
        assert_eq!(interrupted, BounceState::Idle);
    }
}
