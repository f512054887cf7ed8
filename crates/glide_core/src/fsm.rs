//! Event-driven state transitions
//!
//! Small interaction state machines (bounce, scrollbar drag) are plain
//! `Copy` enums that map `(state, event)` pairs to a next state. Events are
//! [`EventType`](crate::events::EventType) ids defined next to the state
//! enum that consumes them.

use std::hash::Hash;

/// Trait for enum-based state machines
///
/// ```rust
/// use glide_core::fsm::StateTransitions;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Light { Off, On }
///
/// impl StateTransitions for Light {
///     fn on_event(&self, event: u32) -> Option<Self> {
///         match (self, event) {
///             (Light::Off, 1) => Some(Light::On),
///             (Light::On, 1) => Some(Light::Off),
///             _ => None,
///         }
///     }
/// }
///
/// let mut light = Light::Off;
/// assert!(light.transition(1));
/// assert_eq!(light, Light::On);
/// ```
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + std::fmt::Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;

    /// Apply `event` in place. Returns true if the state changed.
    fn transition(&mut self, event: u32) -> bool {
        match self.on_event(event) {
            Some(next) if next != *self => {
                tracing::trace!("state transition {:?} -> {:?} (event {})", self, next, event);
                *self = next;
                true
            }
            _ => false,
        }
    }
}
