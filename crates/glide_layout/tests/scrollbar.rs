//! Scrollbar geometry and thumb dragging through the widget tree

mod common;

use common::{init_tracing, list, scroll_y};
use glide_core::{Axis, PointerType, Rect};
use glide_layout::{ScrollView, ScrollbarStyle};
use glide_paint::RecordingRenderer;

fn short_list() -> (glide_layout::WidgetTree, glide_layout::WidgetId) {
    list(ScrollView::new().no_bounce(), 100.0, 100.0, 400.0)
}

#[test]
fn test_auto_shows_only_overflowing_axis() {
    let (tree, root) = short_list();
    let view = tree.scroll_view(root).unwrap();
    assert!(view.show_scrollbar(Axis::Vertical));
    assert!(!view.show_scrollbar(Axis::Horizontal));
    assert_eq!(view.scrollbar(Axis::Vertical).rect(), Rect::new(90.0, 0.0, 10.0, 100.0));
}

#[test]
fn test_thumb_follows_scroll() {
    let (mut tree, root) = short_list();
    let thumb = |tree: &glide_layout::WidgetTree| {
        tree.scroll_view(root)
            .unwrap()
            .scrollbar(Axis::Vertical)
            .thumb_rect()
            .unwrap()
    };
    assert_eq!(thumb(&tree), Rect::new(90.0, 0.0, 10.0, 25.0));

    tree.scroll_to(root, 0.0, 150.0).unwrap();
    assert_eq!(thumb(&tree), Rect::new(90.0, 37.5, 10.0, 25.0));

    tree.scroll_to(root, 0.0, 300.0).unwrap();
    assert_eq!(thumb(&tree), Rect::new(90.0, 75.0, 10.0, 25.0));
}

#[test]
fn test_min_thumb_length() {
    let (tree, root) = list(ScrollView::new().no_bounce(), 100.0, 100.0, 10_000.0);
    let thumb = tree
        .scroll_view(root)
        .unwrap()
        .scrollbar(Axis::Vertical)
        .thumb_rect()
        .unwrap();
    assert_eq!(thumb.height(), ScrollbarStyle::default().min_thumb_length);
}

#[test]
fn test_no_thumb_without_overflow() {
    let (tree, root) = list(ScrollView::new().scrollbar_always(), 100.0, 100.0, 80.0);
    let view = tree.scroll_view(root).unwrap();
    assert!(view.show_scrollbar(Axis::Vertical));
    assert!(view.show_scrollbar(Axis::Horizontal));
    assert!(view.scrollbar(Axis::Vertical).thumb_rect().is_none());
}

#[test]
fn test_thumb_drag_tracks_pointer_outside_view() {
    init_tracing();
    let (mut tree, root) = short_list();

    let event = tree.dispatch_pointer_down(95.0, 5.0, PointerType::Mouse);
    assert!(event.propagation_stopped);
    assert!(event.default_prevented);
    assert_eq!(tree.window_listeners().len(), 1);
    assert!(tree.scroll_view(root).unwrap().is_interacting());

    tree.dispatch_pointer_move(95.0, 30.0, PointerType::Mouse);
    assert_eq!(scroll_y(&tree, root), 100.0);

    // Far outside the view, still routed through the window listener
    tree.dispatch_pointer_move(500.0, 80.0, PointerType::Mouse);
    assert_eq!(scroll_y(&tree, root), 300.0);
    tree.dispatch_pointer_move(500.0, 900.0, PointerType::Mouse);
    assert_eq!(scroll_y(&tree, root), 300.0);

    tree.dispatch_pointer_up(500.0, 900.0, PointerType::Mouse);
    assert!(tree.window_listeners().is_empty());
    assert_eq!(tree.window_listeners().attached_total(), 1);
    assert_eq!(tree.window_listeners().detached_total(), 1);
    let view = tree.scroll_view(root).unwrap();
    assert!(!view.is_interacting());
    assert!(!view.scrollbar(Axis::Vertical).is_dragging());
}

#[test]
fn test_track_click_pages() {
    let (mut tree, root) = short_list();
    let event = tree.dispatch_pointer_down(95.0, 90.0, PointerType::Mouse);
    assert!(event.propagation_stopped);
    assert_eq!(scroll_y(&tree, root), 300.0);
    assert!(tree.window_listeners().is_empty());

    tree.dispatch_pointer_down(95.0, 0.0, PointerType::Mouse);
    assert_eq!(scroll_y(&tree, root), 0.0);
}

#[test]
fn test_hover_eases_thickness() {
    let (mut tree, root) = short_list();
    let style = ScrollbarStyle::default();
    let mut renderer = RecordingRenderer::new();

    tree.paint(&mut renderer);
    assert_eq!(
        tree.scroll_view(root).unwrap().scrollbar(Axis::Vertical).current_thickness(),
        style.width
    );

    tree.dispatch_pointer_move(95.0, 50.0, PointerType::Mouse);
    assert!(tree.scroll_view(root).unwrap().scrollbar(Axis::Vertical).is_hovering());

    tree.paint(&mut renderer);
    let first = tree.scroll_view(root).unwrap().scrollbar(Axis::Vertical).current_thickness();
    assert!(first > style.width && first < style.hover_width);
    assert!(tree.scroll_view(root).unwrap().scrollbar(Axis::Vertical).has_pending_repaint());

    for _ in 0..200 {
        if tree.scheduler().is_idle() {
            break;
        }
        tree.tick(16.0);
        tree.paint(&mut renderer);
    }
    let bar = tree.scroll_view(root).unwrap().scrollbar(Axis::Vertical);
    assert_eq!(bar.current_thickness(), style.hover_width);
    assert_eq!(bar.current_color(), style.hover_color);

    tree.dispatch_pointer_move(20.0, 20.0, PointerType::Mouse);
    assert!(!tree.scroll_view(root).unwrap().scrollbar(Axis::Vertical).is_hovering());
}

#[test]
fn test_dispose_detaches_and_is_idempotent() {
    let (mut tree, root) = short_list();
    tree.dispatch_pointer_down(95.0, 5.0, PointerType::Mouse);
    tree.dispatch_wheel(50.0, 50.0, 0.0, 40.0);
    assert_eq!(tree.window_listeners().len(), 1);

    tree.dispose();
    assert!(tree.window_listeners().is_empty());
    assert!(tree.scheduler().is_idle());
    assert!(tree.scroll_view(root).unwrap().is_disposed());

    tree.dispose();
    assert_eq!(tree.window_listeners().detached_total(), 1);
    assert!(tree.scheduler().is_idle());
}
