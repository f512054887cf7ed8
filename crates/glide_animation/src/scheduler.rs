//! Frame scheduler
//!
//! Holds every pending animation-frame request and timer for a widget tree.
//! Nothing runs by itself: the host advances the virtual clock with
//! [`FrameScheduler::advance`], drains due timers with
//! [`FrameScheduler::take_due_timers`], then drains the frame's requests with
//! [`FrameScheduler::begin_frame`]. A request made while a frame is being
//! processed is deferred to the following frame, so a self-rescheduling
//! animation advances exactly one step per frame.
//!
//! Components keep the returned [`TaskId`] as their handle and cancel it when
//! they are interrupted or disposed.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a scheduled frame request or timer
    pub struct TaskId;
}

/// Frame interval at 60fps
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Trigger {
    /// Run on the first frame after `requested_in` ends
    NextFrame { requested_in: u64 },
    /// Run once the clock reaches `due_ms`
    At { due_ms: f64 },
}

#[derive(Debug)]
struct Task<T> {
    payload: T,
    trigger: Trigger,
}

/// Due tasks returned from a drain call
pub type DueTasks<T> = SmallVec<[(TaskId, T); 4]>;

/// Scheduler for frame callbacks and timers on a virtual clock
#[derive(Debug)]
pub struct FrameScheduler<T> {
    tasks: SlotMap<TaskId, Task<T>>,
    now_ms: f64,
    frame: u64,
    frame_interval_ms: f64,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
            now_ms: 0.0,
            frame: 0,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }

    /// Create a scheduler whose frames are `interval_ms` apart
    pub fn with_frame_interval(interval_ms: f64) -> Self {
        Self {
            frame_interval_ms: interval_ms.max(0.0),
            ..Self::new()
        }
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Number of frames started so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn frame_interval(&self) -> f64 {
        self.frame_interval_ms
    }

    /// Request that `payload` be delivered on the next frame
    pub fn request_frame(&mut self, payload: T) -> TaskId {
        self.tasks.insert(Task {
            payload,
            trigger: Trigger::NextFrame {
                requested_in: self.frame,
            },
        })
    }

    /// Deliver `payload` once `delay_ms` of virtual time has elapsed
    pub fn set_timeout(&mut self, delay_ms: f64, payload: T) -> TaskId {
        let delay = if delay_ms.is_finite() {
            delay_ms.max(0.0)
        } else {
            0.0
        };
        self.tasks.insert(Task {
            payload,
            trigger: Trigger::At {
                due_ms: self.now_ms + delay,
            },
        })
    }

    /// Cancel a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(id).is_some()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn has_pending_frames(&self) -> bool {
        self.tasks
            .values()
            .any(|t| matches!(t.trigger, Trigger::NextFrame { .. }))
    }

    /// Earliest timer deadline, if any timer is pending
    pub fn next_deadline(&self) -> Option<f64> {
        self.tasks
            .values()
            .filter_map(|t| match t.trigger {
                Trigger::At { due_ms } => Some(due_ms),
                Trigger::NextFrame { .. } => None,
            })
            .reduce(f64::min)
    }

    /// Move the virtual clock forward
    pub fn advance(&mut self, ms: f64) {
        if ms.is_finite() && ms > 0.0 {
            self.now_ms += ms;
        }
    }

    /// Remove and return every timer whose deadline has passed, earliest first
    pub fn take_due_timers(&mut self) -> DueTasks<T> {
        let now = self.now_ms;
        let mut due: SmallVec<[(TaskId, f64); 4]> = self
            .tasks
            .iter()
            .filter_map(|(id, t)| match t.trigger {
                Trigger::At { due_ms } if due_ms <= now => Some((id, due_ms)),
                _ => None,
            })
            .collect();
        due.sort_by(|a, b| a.1.total_cmp(&b.1));
        self.drain(due.into_iter().map(|(id, _)| id))
    }

    /// Start a new frame and return the requests made before it
    pub fn begin_frame(&mut self) -> DueTasks<T> {
        self.frame += 1;
        let frame = self.frame;
        let due: SmallVec<[TaskId; 4]> = self
            .tasks
            .iter()
            .filter_map(|(id, t)| match t.trigger {
                Trigger::NextFrame { requested_in } if requested_in < frame => Some(id),
                _ => None,
            })
            .collect();
        let tasks = self.drain(due.into_iter());
        if !tasks.is_empty() {
            tracing::trace!("frame {}: {} task(s) due", frame, tasks.len());
        }
        tasks
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    fn drain(&mut self, ids: impl Iterator<Item = TaskId>) -> DueTasks<T> {
        ids.filter_map(|id| self.tasks.remove(id).map(|t| (id, t.payload)))
            .collect()
    }
}
