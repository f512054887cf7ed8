#![allow(dead_code)]

use glide_core::Size;
use glide_layout::{Block, ScrollView, WidgetId, WidgetTree};
use tracing_subscriber::EnvFilter;

/// Route library logs to the test writer; `RUST_LOG=glide_layout=debug`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Window-sized outer list with a 200px-tall inner list between a header
/// and a footer:
///
/// ```text
/// outer (300x300, content 300x800)
///   column
///     header  300x100
///     inner   300x200 (content 300x600)
///     footer  300x500
/// ```
pub struct Nested {
    pub tree: WidgetTree,
    pub outer: WidgetId,
    pub inner: WidgetId,
}

pub fn nested(outer: ScrollView, inner: ScrollView) -> Nested {
    let mut tree = WidgetTree::new();
    let outer_id = tree.insert_root(outer);
    let column = tree.insert_child(outer_id, Block::new()).unwrap();
    tree.insert_child(column, Block::sized(300.0, 100.0)).unwrap();
    let inner_id = tree
        .insert_child(column, inner.fixed_size(300.0, 200.0))
        .unwrap();
    tree.insert_child(inner_id, Block::sized(300.0, 600.0)).unwrap();
    tree.insert_child(column, Block::sized(300.0, 500.0)).unwrap();
    tree.layout(Size::new(300.0, 300.0));
    Nested {
        tree,
        outer: outer_id,
        inner: inner_id,
    }
}

/// A single list of `content_height` in a `viewport_height` window
pub fn list(view: ScrollView, width: f64, viewport_height: f64, content_height: f64) -> (WidgetTree, WidgetId) {
    let mut tree = WidgetTree::new();
    let root = tree.insert_root(view);
    tree.insert_child(root, Block::sized(width, content_height)).unwrap();
    tree.layout(Size::new(width, viewport_height));
    (tree, root)
}

pub fn scroll_y(tree: &WidgetTree, id: WidgetId) -> f64 {
    tree.scroll_view(id).unwrap().scroll_y()
}
