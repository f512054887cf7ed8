//! Imperative scroll handle
//!
//! A [`ScrollRef`] names a scroll view without borrowing the tree, so it can
//! be stored by application code and used later to scroll programmatically.

use glide_core::Point;

use crate::error::Result;
use crate::physics::BounceState;
use crate::tree::{WidgetId, WidgetTree};

/// Handle to a scroll view in a [`WidgetTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollRef {
    id: WidgetId,
}

impl ScrollRef {
    pub fn new(id: WidgetId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Scroll to `(x, y)`. Returns whether the offset changed.
    pub fn scroll_to(&self, tree: &mut WidgetTree, x: f64, y: f64) -> Result<bool> {
        tree.scroll_to(self.id, x, y)
    }

    pub fn scroll_by(&self, tree: &mut WidgetTree, dx: f64, dy: f64) -> Result<bool> {
        tree.scroll_by(self.id, dx, dy)
    }

    /// Scroll so the end of the content is in view
    pub fn scroll_to_end(&self, tree: &mut WidgetTree) -> Result<bool> {
        let view = tree.scroll_view(self.id)?;
        let x = view.scroll_x();
        let y = view.max_scroll(glide_core::Axis::Vertical);
        tree.scroll_to(self.id, x, y)
    }

    pub fn scroll_offset(&self, tree: &WidgetTree) -> Result<Point> {
        Ok(tree.scroll_view(self.id)?.scroll_offset())
    }

    pub fn bounce_state(&self, tree: &WidgetTree) -> Result<BounceState> {
        Ok(tree.scroll_view(self.id)?.bounce_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;
    use crate::scroll_view::ScrollView;
    use crate::tree::Block;
    use glide_core::Size;

    #[test]
    fn test_scroll_ref_round_trip() {
        let mut tree = WidgetTree::new();
        let root = tree.insert_root(ScrollView::new().no_bounce());
        tree.insert_child(root, Block::sized(100.0, 500.0)).unwrap();
        tree.layout(Size::new(100.0, 200.0));

        let handle = tree.scroll_ref(root).unwrap();
        assert!(handle.scroll_to(&mut tree, 0.0, 120.0).unwrap());
        assert_eq!(handle.scroll_offset(&tree).unwrap(), Point::new(0.0, 120.0));
        assert!(handle.scroll_to_end(&mut tree).unwrap());
        assert_eq!(handle.scroll_offset(&tree).unwrap().y, 300.0);
        assert!(!handle.scroll_by(&mut tree, 0.0, 50.0).unwrap());
    }

    #[test]
    fn test_scroll_ref_to_removed_view() {
        let mut tree = WidgetTree::new();
        let root = tree.insert_root(Block::new());
        let view = tree.insert_child(root, ScrollView::new()).unwrap();
        let handle = ScrollRef::new(view);
        tree.remove(view).unwrap();
        assert_eq!(
            handle.scroll_to(&mut tree, 0.0, 10.0),
            Err(TreeError::UnknownWidget(view))
        );
        assert_eq!(tree.scroll_ref(root), Err(TreeError::NotAScrollView(root)));
    }
}
