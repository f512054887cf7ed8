//! Scheduled work owned by scroll views

use glide_animation::FrameScheduler;
use glide_core::Axis;

use crate::tree::WidgetId;

/// What a scheduled task does when it comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// One step of the rebound animation
    BounceFrame,
    /// Debounce expiry after the last scroll delta
    ReboundCheck,
    /// Scrollbar presentation has not converged yet
    ScrollBarRepaint(Axis),
}

/// A task addressed to a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduledTask {
    pub widget: WidgetId,
    pub kind: TaskKind,
}

impl ScheduledTask {
    pub fn new(widget: WidgetId, kind: TaskKind) -> Self {
        Self { widget, kind }
    }
}

/// The scheduler shared by every widget in a tree
pub type Scheduler = FrameScheduler<ScheduledTask>;
