//! Glide Layout
//!
//! The viewport / scrollable-region engine of the Glide toolkit.
//!
//! - [`Viewport`]: pan, zoom and scroll state with clamped zoom, change
//!   listeners, and the view transform applied to descendants
//! - [`ScrollView`]: a viewport that tracks content size, rubber-bands past
//!   its edges, animates the rebound, and arbitrates nested scrolling
//! - [`ScrollBar`]: thumb geometry, hover/drag interaction, and paint-time
//!   easing of color and thickness
//! - [`WidgetTree`]: a minimal retained tree hosting the above, with layout,
//!   paint, input dispatch along the ancestor chain, and a frame scheduler
//!
//! # Example
//!
//! ```rust
//! use glide_core::Size;
//! use glide_layout::prelude::*;
//!
//! let mut tree = WidgetTree::new();
//! let root = tree.insert_root(WidgetKind::ScrollView(Box::new(
//!     ScrollView::new().no_bounce(),
//! )));
//! tree.insert_child(root, WidgetKind::Block(Block::sized(300.0, 1200.0))).unwrap();
//! tree.layout(Size::new(300.0, 400.0));
//!
//! // Wheel down by 100px over the scroll view
//! let event = tree.dispatch_wheel(150.0, 200.0, 0.0, 100.0);
//! assert!(event.default_prevented);
//! assert_eq!(tree.scroll_view(root).unwrap().scroll_y(), 100.0);
//! ```

pub mod constraints;
pub mod error;
pub mod physics;
pub mod props;
pub mod scroll_ref;
pub mod scroll_view;
pub mod scrollbar;
pub mod task;
pub mod tree;
pub mod viewport;
pub mod window;

pub use constraints::BoxConstraints;
pub use error::{Result, TreeError};
pub use physics::BounceState;
pub use props::{Overflow, ScrollViewProps, ScrollbarStyle, ScrollbarVisibility, ViewportProps};
pub use scroll_ref::ScrollRef;
pub use scroll_view::{ScrollContext, ScrollView};
pub use scrollbar::{ScrollBar, ScrollBarEvent, ScrollBarHit};
pub use task::{ScheduledTask, Scheduler, TaskKind};
pub use tree::{Block, WidgetId, WidgetKind, WidgetTree};
pub use viewport::{ListenerKey, Viewport};
pub use window::{ListenerId, WindowListener, WindowListeners};

/// Commonly used types
pub mod prelude {
    pub use crate::{
        Block, BoxConstraints, Overflow, ScrollRef, ScrollView, ScrollViewProps,
        ScrollbarVisibility, Viewport, ViewportProps, WidgetId, WidgetKind, WidgetTree,
    };
}
