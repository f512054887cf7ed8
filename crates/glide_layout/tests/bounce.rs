//! Overscroll resistance and rebound, driven through the widget tree

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{init_tracing, list, scroll_y};
use glide_core::PointerType;
use glide_layout::{BounceState, ScrollView};

struct Counters {
    starts: Rc<Cell<u32>>,
    completes: Rc<Cell<u32>>,
}

fn counted(view: ScrollView) -> (ScrollView, Counters) {
    let starts = Rc::new(Cell::new(0));
    let completes = Rc::new(Cell::new(0));
    let view = {
        let starts = starts.clone();
        let completes = completes.clone();
        view.on_bounce_start(move || starts.set(starts.get() + 1))
            .on_bounce_complete(move || completes.set(completes.get() + 1))
    };
    (view, Counters { starts, completes })
}

#[test]
fn test_drag_past_top_is_resisted() {
    init_tracing();
    let (mut tree, root) = list(ScrollView::new(), 300.0, 300.0, 1000.0);

    tree.dispatch_pointer_down(150.0, 100.0, PointerType::Touch);
    tree.dispatch_pointer_move(150.0, 200.0, PointerType::Touch);
    // Full strength at the edge, halved
    assert_eq!(scroll_y(&tree, root), -50.0);

    tree.dispatch_pointer_move(150.0, 400.0, PointerType::Touch);
    let y = scroll_y(&tree, root);
    let expected = -50.0 - 200.0 * 0.5 * (1.0 - 50.0 / 150.0_f64).powi(2);
    assert!((y - expected).abs() < 1e-9, "{y} != {expected}");
    tree.dispatch_pointer_up(150.0, 400.0, PointerType::Touch);
}

#[test]
fn test_resistance_grows_with_overscroll() {
    let (mut tree, root) = list(ScrollView::new(), 300.0, 300.0, 1000.0);
    tree.dispatch_pointer_down(150.0, 0.0, PointerType::Touch);

    let mut previous = scroll_y(&tree, root);
    let mut previous_step = f64::INFINITY;
    for i in 1..=20 {
        tree.dispatch_pointer_move(150.0, i as f64 * 40.0, PointerType::Touch);
        let y = scroll_y(&tree, root);
        let step = previous - y;
        assert!(step > 0.0, "step {i} did not stretch: {y}");
        assert!(step < previous_step, "step {i} grew: {step} >= {previous_step}");
        previous_step = step;
        previous = y;
    }
    assert!(previous > -150.0);
    tree.dispatch_pointer_up(150.0, 800.0, PointerType::Touch);
}

#[test]
fn test_wheel_overscroll_stays_bounded() {
    let (mut tree, root) = list(ScrollView::new().wheel_bounce(true), 300.0, 300.0, 1000.0);
    let limit = tree.scroll_view(root).unwrap().max_bounce(glide_core::Axis::Vertical);
    assert_eq!(limit, 150.0);

    for _ in 0..50 {
        tree.dispatch_wheel(150.0, 150.0, 0.0, -500.0);
        let y = scroll_y(&tree, root);
        assert!(y >= -limit && y <= 0.0, "{y} escaped the allowance");
    }
    tree.run_until_idle(1000);
    assert_eq!(scroll_y(&tree, root), 0.0);
}

#[test]
fn test_rebound_reports_once() {
    init_tracing();
    let (view, counters) = counted(ScrollView::new());
    let (mut tree, root) = list(view, 300.0, 300.0, 1000.0);

    tree.dispatch_pointer_down(150.0, 100.0, PointerType::Touch);
    tree.dispatch_pointer_move(150.0, 300.0, PointerType::Touch);
    assert!(scroll_y(&tree, root) < 0.0);
    assert_eq!(counters.starts.get(), 0);

    tree.dispatch_pointer_up(150.0, 300.0, PointerType::Touch);
    assert_eq!(counters.starts.get(), 1);
    assert_eq!(tree.scroll_view(root).unwrap().bounce_state(), BounceState::Bouncing);

    let frames = tree.run_until_idle(1000);
    assert!(frames > 1 && frames < 1000);
    let view = tree.scroll_view(root).unwrap();
    assert_eq!(view.scroll_y(), 0.0);
    assert_eq!(view.bounce_state(), BounceState::Idle);
    assert_eq!(counters.starts.get(), 1);
    assert_eq!(counters.completes.get(), 1);
}

#[test]
fn test_rebound_from_bottom_lands_on_max() {
    let (mut tree, root) = list(ScrollView::new().wheel_bounce(true), 300.0, 300.0, 1000.0);
    tree.scroll_to(root, 0.0, 700.0).unwrap();
    tree.dispatch_wheel(150.0, 150.0, 0.0, 120.0);
    assert!(scroll_y(&tree, root) > 700.0);

    tree.run_until_idle(1000);
    assert_eq!(scroll_y(&tree, root), 700.0);
}

#[test]
fn test_touch_interrupts_rebound() {
    let (view, counters) = counted(ScrollView::new());
    let (mut tree, root) = list(view, 300.0, 300.0, 1000.0);

    tree.dispatch_pointer_down(150.0, 100.0, PointerType::Touch);
    tree.dispatch_pointer_move(150.0, 300.0, PointerType::Touch);
    tree.dispatch_pointer_up(150.0, 300.0, PointerType::Touch);
    tree.tick(16.0);
    tree.tick(16.0);
    let mid_flight = scroll_y(&tree, root);
    assert!(mid_flight < 0.0);

    // Catch the content mid-rebound
    tree.dispatch_pointer_down(150.0, 150.0, PointerType::Touch);
    assert_eq!(tree.scroll_view(root).unwrap().bounce_state(), BounceState::Interrupted);
    tree.run_until_idle(100);
    assert_eq!(scroll_y(&tree, root), mid_flight);
    assert_eq!(counters.completes.get(), 0);

    tree.dispatch_pointer_up(150.0, 150.0, PointerType::Touch);
    tree.run_until_idle(1000);
    assert_eq!(scroll_y(&tree, root), 0.0);
    assert_eq!(counters.completes.get(), 1);
}

#[test]
fn test_no_bounce_clamps_hard() {
    let (mut tree, root) = list(ScrollView::new().no_bounce(), 300.0, 300.0, 1000.0);
    let deltas = [-90.0, 250.0, 600.0, -30.0, 10_000.0, -4_000.0, 1.0, f64::NAN];
    for dy in deltas {
        tree.dispatch_wheel(150.0, 150.0, 0.0, dy);
        let y = scroll_y(&tree, root);
        assert!((0.0..=700.0).contains(&y), "{y} outside range after {dy}");
    }
    tree.run_until_idle(100);
    assert!(tree.scheduler().is_idle());
}

#[test]
fn test_shrinking_content_reclamps() {
    let (mut tree, root) = list(ScrollView::new().no_bounce(), 300.0, 300.0, 1000.0);
    tree.scroll_to(root, 0.0, 700.0).unwrap();

    let item = tree.children(root)[0];
    tree.remove(item).unwrap();
    tree.insert_child(root, glide_layout::Block::sized(300.0, 500.0)).unwrap();
    tree.layout(glide_core::Size::new(300.0, 300.0));
    assert_eq!(scroll_y(&tree, root), 200.0);
}

#[test]
fn test_disposed_tree_schedules_nothing() {
    let (mut tree, root) = list(ScrollView::new(), 300.0, 300.0, 1000.0);
    tree.dispatch_wheel(150.0, 150.0, 0.0, 60.0);
    tree.dispose();
    assert!(tree.scheduler().is_idle());

    let event = tree.dispatch_wheel(150.0, 150.0, 0.0, 40.0);
    assert!(!event.default_prevented);
    tree.dispatch_pointer_down(150.0, 150.0, PointerType::Touch);
    tree.dispatch_pointer_move(150.0, 300.0, PointerType::Touch);
    tree.dispatch_pointer_up(150.0, 300.0, PointerType::Touch);
    tree.scroll_to(root, 0.0, -80.0).unwrap();

    assert_eq!(scroll_y(&tree, root), 60.0);
    assert!(tree.scheduler().is_idle());
    assert_eq!(tree.run_until_idle(100), 0);
}
