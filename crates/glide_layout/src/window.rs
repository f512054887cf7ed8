//! Window-level pointer listeners
//!
//! A scrollbar drag keeps tracking the pointer after it leaves the bar, so
//! the bar registers with the window for the duration of the drag. The
//! registry only records who is listening; the tree routes window pointer
//! moves and ups to the owners.

use glide_core::Axis;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::tree::WidgetId;

new_key_type! {
    /// Handle of an attached window listener
    pub struct ListenerId;
}

/// A registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowListener {
    pub owner: WidgetId,
    pub axis: Axis,
}

/// Registry of window-level pointer listeners
#[derive(Debug, Default)]
pub struct WindowListeners {
    entries: SlotMap<ListenerId, WindowListener>,
    attached_total: usize,
    detached_total: usize,
}

impl WindowListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, listener: WindowListener) -> ListenerId {
        self.attached_total += 1;
        tracing::debug!(?listener, "window listener attached");
        self.entries.insert(listener)
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn detach(&mut self, id: ListenerId) -> bool {
        match self.entries.remove(id) {
            Some(listener) => {
                self.detached_total += 1;
                tracing::debug!(?listener, "window listener detached");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct owners, in attach order
    pub fn owners(&self) -> SmallVec<[WidgetId; 2]> {
        let mut owners: SmallVec<[WidgetId; 2]> = SmallVec::new();
        for (_, listener) in &self.entries {
            if !owners.contains(&listener.owner) {
                owners.push(listener.owner);
            }
        }
        owners
    }

    /// Lifetime count of successful attaches
    pub fn attached_total(&self) -> usize {
        self.attached_total
    }

    /// Lifetime count of successful detaches
    pub fn detached_total(&self) -> usize {
        self.detached_total
    }
}
