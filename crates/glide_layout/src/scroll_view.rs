//! Scroll view widget with rubber-band physics
//!
//! A [`ScrollView`] is a [`Viewport`] that knows its content size. It
//! consumes wheel and drag deltas, lets the offset overscroll an edge with
//! increasing resistance when bounce is enabled, and animates back into
//! range once input goes quiet:
//!
//! ```text
//! delta -> process_scroll -> commit (sync bars, notify, dirty)
//!                         -> debounce timer -> rebound check
//!                                              -> Idle -> Bouncing -> frame... -> Idle
//! ```
//!
//! Nested scroll views arbitrate by consumption: a view that can take a
//! delta stops propagation and suppresses the platform default; a view
//! resting on the edge the delta points at lets it bubble to its ancestor.
//!
//! Timers and frames go through the tree's [`Scheduler`]; the handles are
//! stored here so new input and [`ScrollView::dispose`] can cancel them.

use std::ops::{Deref, DerefMut};

use glide_animation::{Approach, TaskId};
use glide_core::fsm::StateTransitions;
use glide_core::{Axis, InputEvent, InputKind, Point, Rect, Size};
use glide_paint::Renderer;

use crate::constraints::BoxConstraints;
use crate::physics::{self, bounce_events, BounceState, SCROLL_EPSILON, SETTLE_EPSILON};
use crate::props::{Overflow, ScrollViewProps, ScrollbarStyle, ScrollbarVisibility};
use crate::scrollbar::{ScrollBar, ScrollBarEvent};
use crate::task::{ScheduledTask, Scheduler, TaskKind};
use crate::tree::WidgetId;
use crate::viewport::Viewport;
use crate::window::WindowListeners;

type Callback = Box<dyn FnMut()>;

/// Shared services a scroll view needs while handling input or tasks
pub struct ScrollContext<'a> {
    pub scheduler: &'a mut Scheduler,
    pub window: &'a mut WindowListeners,
}

impl<'a> ScrollContext<'a> {
    pub fn new(scheduler: &'a mut Scheduler, window: &'a mut WindowListeners) -> Self {
        Self { scheduler, window }
    }
}

/// A scrollable viewport
pub struct ScrollView {
    id: WidgetId,
    viewport: Viewport,
    props: ScrollViewProps,
    content_size: Size,
    show_scrollbar_x: bool,
    show_scrollbar_y: bool,
    bounce_state: BounceState,
    is_interacting: bool,
    pointer_down: bool,
    last_x: f64,
    last_y: f64,
    scrollbar_x: ScrollBar,
    scrollbar_y: ScrollBar,
    bounce_frame: Option<TaskId>,
    debounce_timer: Option<TaskId>,
    on_bounce_start: Option<Callback>,
    on_bounce_complete: Option<Callback>,
    disposed: bool,
}

impl std::fmt::Debug for ScrollView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollView")
            .field("id", &self.id)
            .field("viewport", &self.viewport)
            .field("content_size", &self.content_size)
            .field("bounce_state", &self.bounce_state)
            .field("is_interacting", &self.is_interacting)
            .field("pointer_down", &self.pointer_down)
            .finish_non_exhaustive()
    }
}

impl Default for ScrollView {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for ScrollView {
    type Target = Viewport;

    fn deref(&self) -> &Self::Target {
        &self.viewport
    }
}

impl DerefMut for ScrollView {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.viewport
    }
}

impl ScrollView {
    pub fn new() -> Self {
        Self::with_props(ScrollViewProps::default())
    }

    pub fn with_props(props: ScrollViewProps) -> Self {
        Self {
            id: WidgetId::default(),
            viewport: Viewport::new(props.viewport),
            props,
            content_size: Size::ZERO,
            show_scrollbar_x: false,
            show_scrollbar_y: false,
            bounce_state: BounceState::Idle,
            is_interacting: false,
            pointer_down: false,
            last_x: 0.0,
            last_y: 0.0,
            scrollbar_x: ScrollBar::new(Axis::Horizontal, props.scrollbar),
            scrollbar_y: ScrollBar::new(Axis::Vertical, props.scrollbar),
            bounce_frame: None,
            debounce_timer: None,
            on_bounce_start: None,
            on_bounce_complete: None,
            disposed: false,
        }
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Explicit size, used when layout leaves an axis unbounded
    pub fn fixed_size(mut self, width: f64, height: f64) -> Self {
        self.props.viewport.width = Some(width);
        self.props.viewport.height = Some(height);
        self.viewport.set_size(Size::new(width, height));
        self
    }

    pub fn bounce(mut self, enabled: bool) -> Self {
        self.props.enable_bounce = enabled;
        self
    }

    pub fn no_bounce(self) -> Self {
        self.bounce(false)
    }

    pub fn bounce_horizontal(mut self, enabled: bool) -> Self {
        self.props.enable_bounce_horizontal = Some(enabled);
        self
    }

    pub fn bounce_vertical(mut self, enabled: bool) -> Self {
        self.props.enable_bounce_vertical = Some(enabled);
        self
    }

    pub fn wheel_bounce(mut self, enabled: bool) -> Self {
        self.props.enable_wheel_bounce = enabled;
        self
    }

    pub fn max_bounce_distance(mut self, distance: f64) -> Self {
        self.props.max_bounce_distance = distance;
        self
    }

    pub fn bounce_damping(mut self, damping: f64) -> Self {
        self.props.bounce_damping = damping;
        self
    }

    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.props.overflow = overflow;
        self
    }

    pub fn scrollbar_visibility(mut self, visibility: ScrollbarVisibility) -> Self {
        self.props.scrollbar_visibility = visibility;
        self
    }

    pub fn scrollbar_always(self) -> Self {
        self.scrollbar_visibility(ScrollbarVisibility::Always)
    }

    pub fn scrollbar_hidden(self) -> Self {
        self.scrollbar_visibility(ScrollbarVisibility::Hidden)
    }

    /// Resting thumb thickness; the hover thickness never drops below it
    pub fn scrollbar_width(mut self, width: f64) -> Self {
        let mut style = self.props.scrollbar;
        style.width = width;
        style.hover_width = style.hover_width.max(width);
        self.set_scrollbar_style(style);
        self
    }

    pub fn scrollbar_style(mut self, style: ScrollbarStyle) -> Self {
        self.set_scrollbar_style(style);
        self
    }

    pub fn on_bounce_start<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.on_bounce_start = Some(Box::new(f));
        self
    }

    pub fn on_bounce_complete<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.on_bounce_complete = Some(Box::new(f));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: WidgetId) {
        self.id = id;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn props(&self) -> &ScrollViewProps {
        &self.props
    }

    /// Replace the configuration. Takes effect on the next layout.
    pub fn set_props(&mut self, props: ScrollViewProps) {
        self.props = props;
        self.scrollbar_x.set_style(props.scrollbar);
        self.scrollbar_y.set_style(props.scrollbar);
        self.viewport.set_scale_limits(props.viewport.min_scale, props.viewport.max_scale);
        self.viewport.mark_dirty();
    }

    pub fn set_scrollbar_style(&mut self, style: ScrollbarStyle) {
        self.props.scrollbar = style;
        self.scrollbar_x.set_style(style);
        self.scrollbar_y.set_style(style);
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn bounce_state(&self) -> BounceState {
        self.bounce_state
    }

    pub fn is_interacting(&self) -> bool {
        self.is_interacting
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn show_scrollbar(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.show_scrollbar_x,
            Axis::Vertical => self.show_scrollbar_y,
        }
    }

    pub fn scrollbar(&self, axis: Axis) -> &ScrollBar {
        match axis {
            Axis::Horizontal => &self.scrollbar_x,
            Axis::Vertical => &self.scrollbar_y,
        }
    }

    fn scrollbar_mut(&mut self, axis: Axis) -> &mut ScrollBar {
        match axis {
            Axis::Horizontal => &mut self.scrollbar_x,
            Axis::Vertical => &mut self.scrollbar_y,
        }
    }

    /// A rebound timer or animation frame is outstanding
    pub fn has_pending_work(&self) -> bool {
        self.bounce_frame.is_some() || self.debounce_timer.is_some()
    }

    pub fn set_on_bounce_start<F: FnMut() + 'static>(&mut self, f: F) {
        self.on_bounce_start = Some(Box::new(f));
    }

    pub fn set_on_bounce_complete<F: FnMut() + 'static>(&mut self, f: F) {
        self.on_bounce_complete = Some(Box::new(f));
    }

    // =========================================================================
    // Bounds
    // =========================================================================

    fn offset(&self, axis: Axis) -> f64 {
        axis.pick(self.viewport.scroll_x(), self.viewport.scroll_y())
    }

    pub fn max_scroll(&self, axis: Axis) -> f64 {
        physics::max_scroll(
            axis.pick(self.content_size.width, self.content_size.height),
            axis.pick(self.viewport.width(), self.viewport.height()),
        )
    }

    /// Overscroll allowance along `axis`
    pub fn max_bounce(&self, axis: Axis) -> f64 {
        physics::max_bounce(
            self.props.max_bounce_distance,
            axis.pick(self.viewport.width(), self.viewport.height()),
        )
    }

    fn bounce_allowance(&self, axis: Axis) -> Option<f64> {
        self.props
            .bounce_enabled(axis)
            .then(|| self.max_bounce(axis))
    }

    /// Clamp an offset to what `axis` permits at rest or mid-bounce
    fn clamp_offset(&self, axis: Axis, value: f64) -> f64 {
        let max = self.max_scroll(axis);
        match self.bounce_allowance(axis) {
            Some(limit) => value.clamp(-limit, max + limit),
            None => value.clamp(0.0, max),
        }
    }

    pub fn is_out_of_bounds(&self) -> bool {
        Axis::BOTH
            .iter()
            .any(|&axis| physics::is_out_of_bounds(self.offset(axis), self.max_scroll(axis)))
    }

    /// Out of range with no gesture holding the offset there
    pub fn should_bounce_back(&self) -> bool {
        !self.is_interacting && !self.pointer_down && self.is_out_of_bounds()
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Write the offset, mirror it into the scrollbars, notify, mark dirty
    fn commit_scroll(&mut self, x: f64, y: f64) -> bool {
        let changed = self.viewport.scroll_to(x, y);
        self.sync_scrollbars();
        changed
    }

    fn sync_scrollbars(&mut self) {
        let (x, y) = (self.viewport.scroll_x(), self.viewport.scroll_y());
        let (w, h) = (self.viewport.width(), self.viewport.height());
        self.scrollbar_x.sync(w, self.content_size.width, x);
        self.scrollbar_y.sync(h, self.content_size.height, y);
    }

    /// Programmatic scroll. Hard axes clamp into range; bouncy axes clamp to
    /// their overscroll allowance and rebound after the debounce period.
    pub fn scroll_to(&mut self, ctx: &mut ScrollContext<'_>, x: f64, y: f64) -> bool {
        if self.disposed {
            return false;
        }
        self.cancel_debounce(ctx);
        self.interrupt_bounce(ctx);
        let x = if x.is_finite() { x } else { self.viewport.scroll_x() };
        let y = if y.is_finite() { y } else { self.viewport.scroll_y() };
        let x = self.clamp_offset(Axis::Horizontal, x);
        let y = self.clamp_offset(Axis::Vertical, y);
        let changed = self.commit_scroll(x, y);
        if self.is_out_of_bounds() || self.bounce_state != BounceState::Idle {
            self.arm_debounce(ctx);
        }
        changed
    }

    pub fn scroll_by(&mut self, ctx: &mut ScrollContext<'_>, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        let (x, y) = (self.viewport.scroll_x(), self.viewport.scroll_y());
        self.scroll_to(ctx, x + dx, y + dy)
    }

    /// Apply a scroll delta with edge resistance. Returns true if the offset
    /// visibly moved.
    pub fn process_scroll(&mut self, ctx: &mut ScrollContext<'_>, dx: f64, dy: f64) -> bool {
        if self.disposed {
            return false;
        }
        self.cancel_debounce(ctx);
        self.interrupt_bounce(ctx);

        let dx = if dx.is_finite() { dx } else { 0.0 };
        let dy = if dy.is_finite() { dy } else { 0.0 };
        let (x, y) = (self.viewport.scroll_x(), self.viewport.scroll_y());
        let next_x = physics::next_offset(
            x,
            dx,
            self.max_scroll(Axis::Horizontal),
            self.bounce_allowance(Axis::Horizontal),
        );
        let next_y = physics::next_offset(
            y,
            dy,
            self.max_scroll(Axis::Vertical),
            self.bounce_allowance(Axis::Vertical),
        );

        let moved = (next_x - x).abs() > SCROLL_EPSILON || (next_y - y).abs() > SCROLL_EPSILON;
        if moved {
            tracing::trace!(dx, dy, x = next_x, y = next_y, "process_scroll");
            self.commit_scroll(next_x, next_y);
        }
        if moved || self.is_out_of_bounds() || self.bounce_state != BounceState::Idle {
            self.arm_debounce(ctx);
        }
        moved
    }

    // =========================================================================
    // Rebound
    // =========================================================================

    fn cancel_debounce(&mut self, ctx: &mut ScrollContext<'_>) {
        if let Some(timer) = self.debounce_timer.take() {
            ctx.scheduler.cancel(timer);
        }
    }

    fn arm_debounce(&mut self, ctx: &mut ScrollContext<'_>) {
        self.cancel_debounce(ctx);
        if self.disposed {
            return;
        }
        let delay = self.props.bounce_debounce_ms.max(0.0);
        self.debounce_timer = Some(
            ctx.scheduler
                .set_timeout(delay, ScheduledTask::new(self.id, TaskKind::ReboundCheck)),
        );
    }

    /// Cancel an in-flight rebound; its completion will not be reported
    fn interrupt_bounce(&mut self, ctx: &mut ScrollContext<'_>) {
        if let Some(frame) = self.bounce_frame.take() {
            ctx.scheduler.cancel(frame);
        }
        if self.bounce_state.transition(bounce_events::INTERRUPT) {
            tracing::debug!(widget = ?self.id, "bounce interrupted");
        }
    }

    /// Start a rebound if the offset is out of range and nothing holds it
    pub fn check_rebound(&mut self, ctx: &mut ScrollContext<'_>) {
        if self.disposed {
            return;
        }
        if self.bounce_state == BounceState::Bouncing && self.bounce_frame.is_some() {
            return;
        }
        if self.should_bounce_back() {
            if self.bounce_state.transition(bounce_events::OUT_OF_BOUNDS) {
                tracing::debug!(
                    widget = ?self.id,
                    x = self.viewport.scroll_x(),
                    y = self.viewport.scroll_y(),
                    "bounce start"
                );
                if let Some(callback) = self.on_bounce_start.as_mut() {
                    callback();
                }
            }
            self.perform_bounce_back(ctx);
        } else if !self.is_interacting && !self.pointer_down {
            self.bounce_state.transition(bounce_events::SETTLED);
        }
    }

    /// One rebound step toward the clamped offset
    fn perform_bounce_back(&mut self, ctx: &mut ScrollContext<'_>) {
        if self.disposed || self.bounce_state != BounceState::Bouncing {
            return;
        }
        let damping = match self.props.bounce_damping {
            d if d.is_finite() && d > 0.0 => d.min(1.0),
            _ => ScrollViewProps::default().bounce_damping,
        };
        let approach = Approach::new(damping, SETTLE_EPSILON);

        let x = self.viewport.scroll_x();
        let y = self.viewport.scroll_y();
        let target_x = x.clamp(0.0, self.max_scroll(Axis::Horizontal));
        let target_y = y.clamp(0.0, self.max_scroll(Axis::Vertical));

        if approach.is_settled(x, target_x) && approach.is_settled(y, target_y) {
            self.commit_scroll(target_x, target_y);
            self.bounce_state.transition(bounce_events::SETTLED);
            tracing::debug!(widget = ?self.id, "bounce complete");
            if let Some(callback) = self.on_bounce_complete.as_mut() {
                callback();
            }
            return;
        }

        let (next_x, _) = approach.step(x, target_x);
        let (next_y, _) = approach.step(y, target_y);
        self.commit_scroll(next_x, next_y);
        self.bounce_frame = Some(
            ctx.scheduler
                .request_frame(ScheduledTask::new(self.id, TaskKind::BounceFrame)),
        );
    }

    /// Run a scheduled task addressed to this view
    pub fn run_task(&mut self, ctx: &mut ScrollContext<'_>, kind: TaskKind) {
        match kind {
            TaskKind::ReboundCheck => {
                self.debounce_timer = None;
                self.check_rebound(ctx);
            }
            TaskKind::BounceFrame => {
                self.bounce_frame = None;
                self.perform_bounce_back(ctx);
            }
            TaskKind::ScrollBarRepaint(axis) => {
                self.scrollbar_mut(axis).on_repaint_frame();
                self.viewport.mark_dirty();
            }
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Wheel input. Returns true if consumed.
    pub fn handle_wheel(&mut self, ctx: &mut ScrollContext<'_>, event: &mut InputEvent) -> bool {
        if self.disposed {
            return false;
        }
        let InputKind::Wheel { delta_x, delta_y } = event.kind else {
            return false;
        };
        let dominant = if delta_x.abs() > delta_y.abs() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };

        let consume_x = physics::can_consume_delta(
            self.viewport.scroll_x(),
            self.max_scroll(Axis::Horizontal),
            delta_x,
            self.props.wheel_bounce_enabled(Axis::Horizontal),
        );
        let consume_y = physics::can_consume_delta(
            self.viewport.scroll_y(),
            self.max_scroll(Axis::Vertical),
            delta_y,
            self.props.wheel_bounce_enabled(Axis::Vertical),
        );
        if !consume_x && !consume_y {
            return false;
        }

        tracing::trace!(widget = ?self.id, ?dominant, consume_x, consume_y, "wheel consumed");
        self.process_scroll(
            ctx,
            if consume_x { delta_x } else { 0.0 },
            if consume_y { delta_y } else { 0.0 },
        );
        // Also covers horizontal-dominant wheels, which the platform would
        // otherwise turn into history navigation
        event.prevent_default();
        event.stop_propagation();
        true
    }

    /// Pointer down. Scrollbars are tested before content drag. Returns true
    /// if a scrollbar consumed it.
    pub fn handle_pointer_down(
        &mut self,
        ctx: &mut ScrollContext<'_>,
        event: &mut InputEvent,
    ) -> bool {
        if self.disposed {
            return false;
        }
        let local = Point::new(event.x, event.y);
        let screen = Point::new(event.screen_x, event.screen_y);
        let id = self.id;

        for axis in Axis::BOTH {
            let hit = self.scrollbar_mut(axis).pointer_down(local, screen, ctx.window, id);
            if let Some(bar_event) = hit {
                self.apply_scrollbar_event(ctx, axis, bar_event);
                event.stop_propagation();
                event.prevent_default();
                return true;
            }
        }

        if event.pointer_type.drags_content() {
            self.pointer_down = true;
            self.is_interacting = true;
            self.last_x = screen.x;
            self.last_y = screen.y;
            self.cancel_debounce(ctx);
            self.interrupt_bounce(ctx);
        }
        false
    }

    /// Pointer move: scrollbar hover, then content drag. Returns true if the
    /// drag delta was consumed here.
    pub fn handle_pointer_move(
        &mut self,
        ctx: &mut ScrollContext<'_>,
        event: &mut InputEvent,
    ) -> bool {
        if self.disposed {
            return false;
        }
        let local = Point::new(event.x, event.y);
        let hover_x = self.scrollbar_x.pointer_hover(local);
        let hover_y = self.scrollbar_y.pointer_hover(local);
        if hover_x || hover_y {
            self.viewport.mark_dirty();
        }

        if !self.pointer_down {
            return false;
        }
        let dx = self.last_x - event.screen_x;
        let dy = self.last_y - event.screen_y;
        self.last_x = event.screen_x;
        self.last_y = event.screen_y;

        let consume_x = physics::can_drag_delta(
            self.viewport.scroll_x(),
            self.max_scroll(Axis::Horizontal),
            dx,
            self.props.bounce_enabled(Axis::Horizontal),
        );
        let consume_y = physics::can_drag_delta(
            self.viewport.scroll_y(),
            self.max_scroll(Axis::Vertical),
            dy,
            self.props.bounce_enabled(Axis::Vertical),
        );
        if !consume_x && !consume_y {
            return false;
        }

        self.process_scroll(
            ctx,
            if consume_x { dx } else { 0.0 },
            if consume_y { dy } else { 0.0 },
        );
        event.prevent_default();
        event.stop_propagation();
        true
    }

    /// Keep the drag anchor current while a descendant consumes the drag
    pub fn track_pointer(&mut self, screen: Point) {
        if self.pointer_down {
            self.last_x = screen.x;
            self.last_y = screen.y;
        }
    }

    /// Pointer up ends a content drag and checks for a rebound
    pub fn handle_pointer_up(&mut self, ctx: &mut ScrollContext<'_>) -> bool {
        if !self.pointer_down {
            return false;
        }
        self.pointer_down = false;
        self.is_interacting =
            self.scrollbar_x.is_dragging() || self.scrollbar_y.is_dragging();
        self.check_rebound(ctx);
        false
    }

    pub fn handle_pointer_leave(&mut self) {
        let left_x = self.scrollbar_x.pointer_leave();
        let left_y = self.scrollbar_y.pointer_leave();
        if left_x || left_y {
            self.viewport.mark_dirty();
        }
    }

    /// Window-level pointer move, delivered while a thumb is dragged
    pub fn handle_window_pointer_move(&mut self, ctx: &mut ScrollContext<'_>, screen: Point) -> bool {
        let mut handled = false;
        for axis in Axis::BOTH {
            if let Some(bar_event) = self.scrollbar_mut(axis).window_pointer_move(screen) {
                self.apply_scrollbar_event(ctx, axis, bar_event);
                handled = true;
            }
        }
        handled
    }

    /// Window-level pointer up, ends thumb drags
    pub fn handle_window_pointer_up(&mut self, ctx: &mut ScrollContext<'_>) -> bool {
        let mut handled = false;
        for axis in Axis::BOTH {
            if let Some(bar_event) = self.scrollbar_mut(axis).window_pointer_up(ctx.window) {
                self.apply_scrollbar_event(ctx, axis, bar_event);
                handled = true;
            }
        }
        handled
    }

    fn apply_scrollbar_event(&mut self, ctx: &mut ScrollContext<'_>, axis: Axis, event: ScrollBarEvent) {
        match event {
            ScrollBarEvent::DragStart => {
                self.is_interacting = true;
                self.cancel_debounce(ctx);
                self.interrupt_bounce(ctx);
                self.viewport.mark_dirty();
            }
            ScrollBarEvent::Scroll(position) => {
                let position = position.clamp(0.0, self.max_scroll(axis));
                let (x, y) = match axis {
                    Axis::Horizontal => (position, self.viewport.scroll_y()),
                    Axis::Vertical => (self.viewport.scroll_x(), position),
                };
                self.commit_scroll(x, y);
            }
            ScrollBarEvent::DragEnd => {
                self.is_interacting = self.pointer_down
                    || self.scrollbar_x.is_dragging()
                    || self.scrollbar_y.is_dragging();
                self.viewport.mark_dirty();
                self.check_rebound(ctx);
            }
        }
    }

    // =========================================================================
    // Layout & paint
    // =========================================================================

    /// Size along `axis` when it does not depend on content
    fn fixed_extent(&self, axis: Axis, constraints: &BoxConstraints) -> Option<f64> {
        let (max, explicit) = match axis {
            Axis::Horizontal => (constraints.max_width, self.props.viewport.width),
            Axis::Vertical => (constraints.max_height, self.props.viewport.height),
        };
        if max.is_finite() {
            return Some(max);
        }
        explicit.filter(|v| v.is_finite()).map(|v| match axis {
            Axis::Horizontal => constraints.constrain_width(v),
            Axis::Vertical => constraints.constrain_height(v),
        })
    }

    /// Own size: available finite space, else explicit props, else content
    pub fn resolve_size(&self, constraints: &BoxConstraints, content: Size) -> Size {
        let width = self
            .fixed_extent(Axis::Horizontal, constraints)
            .unwrap_or_else(|| constraints.constrain_width(content.width));
        let height = self
            .fixed_extent(Axis::Vertical, constraints)
            .unwrap_or_else(|| constraints.constrain_height(content.height));
        Size::new(width, height)
    }

    /// Constraints for content. Unbounded, except that an axis with bounce
    /// disabled while the other axis bounces is held to the viewport.
    pub fn child_constraints(&self, constraints: &BoxConstraints) -> BoxConstraints {
        let child = BoxConstraints::UNBOUNDED;
        match self.props.constrained_axis() {
            Some(Axis::Horizontal) => match self.fixed_extent(Axis::Horizontal, constraints) {
                Some(width) => child.with_max_width(width),
                None => child,
            },
            Some(Axis::Vertical) => match self.fixed_extent(Axis::Vertical, constraints) {
                Some(height) => child.with_max_height(height),
                None => child,
            },
            None => child,
        }
    }

    /// Resolve size against `constraints`, record `content_size`, re-clamp
    /// the offset and refresh the scrollbars
    pub fn perform_layout(
        &mut self,
        ctx: &mut ScrollContext<'_>,
        constraints: &BoxConstraints,
        content_size: Size,
    ) -> Size {
        let content_size = Size::new(
            sanitize_extent(content_size.width),
            sanitize_extent(content_size.height),
        );
        let size = self.resolve_size(constraints, content_size);
        if content_size != self.content_size {
            self.viewport.mark_dirty();
        }
        self.content_size = content_size;
        self.viewport.set_size(size);
        self.update_scrollbars();

        let x = self.clamp_offset(Axis::Horizontal, self.viewport.scroll_x());
        let y = self.clamp_offset(Axis::Vertical, self.viewport.scroll_y());
        self.commit_scroll(x, y);

        if self.should_bounce_back() && !self.has_pending_work() {
            self.arm_debounce(ctx);
        }
        size
    }

    fn update_scrollbars(&mut self) {
        let Size { width, height } = self.viewport.size();
        let (show_x, show_y) = match self.props.scrollbar_visibility {
            ScrollbarVisibility::Hidden => (false, false),
            ScrollbarVisibility::Always => (true, true),
            ScrollbarVisibility::Auto => (
                self.content_size.width > width,
                self.content_size.height > height,
            ),
        };
        self.show_scrollbar_x = show_x;
        self.show_scrollbar_y = show_y;

        let thickness = self.props.scrollbar.track_thickness();
        let corner_x = if show_y { thickness } else { 0.0 };
        let corner_y = if show_x { thickness } else { 0.0 };
        self.scrollbar_x.set_rect(Rect::new(
            0.0,
            (height - thickness).max(0.0),
            (width - corner_x).max(0.0),
            thickness.min(height),
        ));
        self.scrollbar_y.set_rect(Rect::new(
            (width - thickness).max(0.0),
            0.0,
            thickness.min(width),
            (height - corner_y).max(0.0),
        ));
        self.scrollbar_x.set_visible(show_x);
        self.scrollbar_y.set_visible(show_y);
        self.sync_scrollbars();
    }

    /// Paint both scrollbars in the view's local (unscrolled) space
    pub fn paint_scrollbars(&mut self, renderer: &mut dyn Renderer, scheduler: &mut Scheduler) {
        if self.disposed {
            return;
        }
        let id = self.id;
        self.scrollbar_x.paint(renderer, scheduler, id);
        self.scrollbar_y.paint(renderer, scheduler, id);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Cancel timers and frames and detach window listeners. Idempotent.
    pub fn dispose(&mut self, ctx: &mut ScrollContext<'_>) {
        self.cancel_debounce(ctx);
        if let Some(frame) = self.bounce_frame.take() {
            ctx.scheduler.cancel(frame);
        }
        self.scrollbar_x.dispose(ctx.window, ctx.scheduler);
        self.scrollbar_y.dispose(ctx.window, ctx.scheduler);
        self.pointer_down = false;
        self.is_interacting = false;
        if !self.disposed {
            self.disposed = true;
            tracing::debug!(widget = ?self.id, "scroll view disposed");
        }
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
