//! Layout error types

use glide_core::TransformError;
use thiserror::Error;

use crate::tree::WidgetId;

/// Errors from tree-level operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    /// The id does not name a live widget
    #[error("Unknown widget: {0:?}")]
    UnknownWidget(WidgetId),

    /// The widget exists but is not a scroll view
    #[error("Widget {0:?} is not a scroll view")]
    NotAScrollView(WidgetId),

    /// The widget exists but has no view transform
    #[error("Widget {0:?} is not a viewport")]
    NotAViewport(WidgetId),

    /// A coordinate mapping needed an inverse that does not exist
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Result type for tree operations
pub type Result<T> = std::result::Result<T, TreeError>;
