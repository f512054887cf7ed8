//! Scrollbar widget
//!
//! A [`ScrollBar`] mirrors one axis of its scroll view: it sizes and places
//! the thumb from `(viewport, content, position)`, turns thumb drags into
//! scroll positions, and eases its color and thickness toward the
//! hover/drag target each time it is painted.
//!
//! The bar never writes the scroll offset itself. Pointer handlers return a
//! [`ScrollBarEvent`] and the owning scroll view applies it.

use glide_animation::{lerp, TaskId};
use glide_core::{Axis, Point, Rect};
use glide_paint::{Color, Renderer};

use crate::props::ScrollbarStyle;
use crate::task::{ScheduledTask, Scheduler, TaskKind};
use crate::tree::WidgetId;
use crate::window::{ListenerId, WindowListener, WindowListeners};

/// Presentation easing factor per paint
pub const PRESENTATION_FACTOR: f64 = 0.2;

const THICKNESS_EPSILON: f64 = 0.05;
const COLOR_EPSILON: f32 = 0.004;

/// What a pointer position hits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBarHit {
    None,
    Track,
    Thumb,
}

/// Requests from the bar to its scroll view
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollBarEvent {
    /// A thumb drag began
    DragStart,
    /// Move the axis to this scroll position
    Scroll(f64),
    /// The thumb drag ended
    DragEnd,
}

/// One axis' scrollbar
#[derive(Debug)]
pub struct ScrollBar {
    orientation: Axis,
    style: ScrollbarStyle,
    viewport_size: f64,
    content_size: f64,
    scroll_position: f64,
    /// Track rect in the scroll view's local (unscrolled) space
    rect: Rect,
    visible: bool,
    is_hovering: bool,
    is_dragging: bool,
    drag_start_pointer: f64,
    drag_start_scroll: f64,
    current_color: Color,
    current_thickness: f64,
    window_listener: Option<ListenerId>,
    repaint_task: Option<TaskId>,
}

impl ScrollBar {
    pub fn new(orientation: Axis, style: ScrollbarStyle) -> Self {
        Self {
            orientation,
            style,
            viewport_size: 0.0,
            content_size: 0.0,
            scroll_position: 0.0,
            rect: Rect::ZERO,
            visible: false,
            is_hovering: false,
            is_dragging: false,
            drag_start_pointer: 0.0,
            drag_start_scroll: 0.0,
            current_color: style.color,
            current_thickness: style.width,
            window_listener: None,
            repaint_task: None,
        }
    }

    pub fn orientation(&self) -> Axis {
        self.orientation
    }

    pub fn style(&self) -> &ScrollbarStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: ScrollbarStyle) {
        self.style = style;
    }

    pub fn viewport_size(&self) -> f64 {
        self.viewport_size
    }

    pub fn content_size(&self) -> f64 {
        self.content_size
    }

    pub fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.is_hovering = false;
        }
    }

    pub fn is_hovering(&self) -> bool {
        self.is_hovering
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn current_color(&self) -> Color {
        self.current_color
    }

    pub fn current_thickness(&self) -> f64 {
        self.current_thickness
    }

    pub fn has_window_listener(&self) -> bool {
        self.window_listener.is_some()
    }

    /// Mirror the owning axis
    pub fn sync(&mut self, viewport_size: f64, content_size: f64, scroll_position: f64) {
        self.viewport_size = viewport_size;
        self.content_size = content_size;
        self.scroll_position = scroll_position;
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    fn track_length(&self) -> f64 {
        match self.orientation {
            Axis::Horizontal => self.rect.width(),
            Axis::Vertical => self.rect.height(),
        }
    }

    fn track_thickness(&self) -> f64 {
        match self.orientation {
            Axis::Horizontal => self.rect.height(),
            Axis::Vertical => self.rect.width(),
        }
    }

    /// Thumb rect in track-local coordinates, `None` when nothing scrolls
    pub fn thumb_geometry(&self) -> Option<Rect> {
        let track = self.track_length();
        if self.content_size <= self.viewport_size || self.content_size <= 0.0 || track <= 0.0 {
            return None;
        }
        let ratio = self.viewport_size / self.content_size;
        let length = (track * ratio).max(self.style.min_thumb_length).min(track);
        let max_scroll = self.content_size - self.viewport_size;
        let scroll_ratio = (self.scroll_position / max_scroll).clamp(0.0, 1.0);
        let offset = scroll_ratio * (track - length);
        let thickness = self.track_thickness();

        Some(match self.orientation {
            Axis::Vertical => Rect::new(0.0, offset, thickness, length),
            Axis::Horizontal => Rect::new(offset, 0.0, length, thickness),
        })
    }

    /// Thumb rect in the scroll view's local space
    pub fn thumb_rect(&self) -> Option<Rect> {
        self.thumb_geometry()
            .map(|thumb| thumb.offset(self.rect.x(), self.rect.y()))
    }

    pub fn hit_test(&self, local: Point) -> ScrollBarHit {
        if !self.visible || !self.rect.contains(local) {
            return ScrollBarHit::None;
        }
        match self.thumb_rect() {
            Some(thumb) if thumb.contains(local) => ScrollBarHit::Thumb,
            _ => ScrollBarHit::Track,
        }
    }

    /// Scroll distance covered by moving the pointer `delta` along the track
    pub fn scroll_for_pointer_delta(&self, delta: f64) -> f64 {
        let Some(thumb) = self.thumb_geometry() else {
            return 0.0;
        };
        let thumb_length = self.orientation.pick(thumb.width(), thumb.height());
        let scrollable_track = self.track_length() - thumb_length;
        if scrollable_track <= 0.0 {
            return 0.0;
        }
        delta * (self.content_size - self.viewport_size) / scrollable_track
    }

    /// Scroll position that centres the thumb under `local`
    fn page_to(&self, local: Point) -> Option<f64> {
        let thumb = self.thumb_geometry()?;
        let thumb_length = self.orientation.pick(thumb.width(), thumb.height());
        let scrollable_track = self.track_length() - thumb_length;
        if scrollable_track <= 0.0 {
            return None;
        }
        let along = self.orientation.pick(local.x - self.rect.x(), local.y - self.rect.y());
        let ratio = ((along - thumb_length / 2.0) / scrollable_track).clamp(0.0, 1.0);
        Some(ratio * (self.content_size - self.viewport_size))
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Pointer down at `local` (scroll view space) / `screen` (root space)
    pub fn pointer_down(
        &mut self,
        local: Point,
        screen: Point,
        window: &mut WindowListeners,
        owner: WidgetId,
    ) -> Option<ScrollBarEvent> {
        match self.hit_test(local) {
            ScrollBarHit::None => None,
            ScrollBarHit::Thumb => {
                self.is_dragging = true;
                self.drag_start_pointer = self.orientation.pick(screen.x, screen.y);
                self.drag_start_scroll = self.scroll_position;
                self.attach_window_listener(window, owner);
                tracing::debug!(axis = ?self.orientation, start = self.drag_start_scroll, "scrollbar drag start");
                Some(ScrollBarEvent::DragStart)
            }
            ScrollBarHit::Track => self.page_to(local).map(ScrollBarEvent::Scroll),
        }
    }

    /// Window-level pointer move while dragging
    pub fn window_pointer_move(&mut self, screen: Point) -> Option<ScrollBarEvent> {
        if !self.is_dragging {
            return None;
        }
        let delta = self.orientation.pick(screen.x, screen.y) - self.drag_start_pointer;
        let position = self.drag_start_scroll + self.scroll_for_pointer_delta(delta);
        Some(ScrollBarEvent::Scroll(position))
    }

    /// Window-level pointer up; ends a drag
    pub fn window_pointer_up(&mut self, window: &mut WindowListeners) -> Option<ScrollBarEvent> {
        if !self.is_dragging {
            return None;
        }
        self.is_dragging = false;
        self.detach_window_listener(window);
        tracing::debug!(axis = ?self.orientation, "scrollbar drag end");
        Some(ScrollBarEvent::DragEnd)
    }

    /// Update hover from a pointer move. Returns true if hover changed.
    pub fn pointer_hover(&mut self, local: Point) -> bool {
        if self.is_dragging {
            return false;
        }
        let hovering = self.hit_test(local) != ScrollBarHit::None;
        let changed = hovering != self.is_hovering;
        self.is_hovering = hovering;
        changed
    }

    pub fn pointer_leave(&mut self) -> bool {
        if self.is_dragging || !self.is_hovering {
            return false;
        }
        self.is_hovering = false;
        true
    }

    /// Attach the drag listener unless one is attached already
    pub fn attach_window_listener(&mut self, window: &mut WindowListeners, owner: WidgetId) {
        if self.window_listener.is_none() {
            self.window_listener = Some(window.attach(WindowListener {
                owner,
                axis: self.orientation,
            }));
        }
    }

    pub fn detach_window_listener(&mut self, window: &mut WindowListeners) {
        if let Some(id) = self.window_listener.take() {
            window.detach(id);
        }
    }

    /// Drop listeners and pending repaints. Safe to call repeatedly.
    pub fn dispose(&mut self, window: &mut WindowListeners, scheduler: &mut Scheduler) {
        self.detach_window_listener(window);
        if let Some(task) = self.repaint_task.take() {
            scheduler.cancel(task);
        }
        self.is_dragging = false;
        self.is_hovering = false;
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    pub fn target_color(&self) -> Color {
        if self.is_dragging {
            self.style.active_color
        } else if self.is_hovering {
            self.style.hover_color
        } else {
            self.style.color
        }
    }

    pub fn target_thickness(&self) -> f64 {
        if self.is_dragging || self.is_hovering {
            self.style.hover_width
        } else {
            self.style.width
        }
    }

    /// Snap presentation to its targets
    pub fn reset_presentation(&mut self) {
        self.current_color = self.target_color();
        self.current_thickness = self.target_thickness();
    }

    /// Step the presentation easing. Returns true once converged.
    fn step_presentation(&mut self) -> bool {
        let color = self.target_color();
        let thickness = self.target_thickness();
        self.current_color = self.current_color.lerp(color, PRESENTATION_FACTOR as f32);
        self.current_thickness = lerp(self.current_thickness, thickness, PRESENTATION_FACTOR);

        let settled = self.current_color.distance(&color) < COLOR_EPSILON
            && (self.current_thickness - thickness).abs() < THICKNESS_EPSILON;
        if settled {
            self.current_color = color;
            self.current_thickness = thickness;
        }
        settled
    }

    /// Paint track and thumb. Requests another frame while easing.
    pub fn paint(&mut self, renderer: &mut dyn Renderer, scheduler: &mut Scheduler, owner: WidgetId) {
        if !self.visible {
            return;
        }
        if !self.step_presentation() && self.repaint_task.is_none() {
            self.repaint_task = Some(scheduler.request_frame(ScheduledTask::new(
                owner,
                TaskKind::ScrollBarRepaint(self.orientation),
            )));
        }

        renderer.draw_rect(self.rect, self.style.track_color, self.style.corner_radius);
        if let Some(thumb) = self.thumb_rect() {
            // Thumb hugs the outer edge of the track
            let thickness = self.current_thickness.min(self.track_thickness());
            let thumb = match self.orientation {
                Axis::Vertical => Rect::new(thumb.max_x() - thickness, thumb.y(), thickness, thumb.height()),
                Axis::Horizontal => Rect::new(thumb.x(), thumb.max_y() - thickness, thumb.width(), thickness),
            };
            renderer.draw_rect(thumb, self.current_color, self.style.corner_radius);
        }
    }

    /// The repaint frame fired
    pub fn on_repaint_frame(&mut self) {
        self.repaint_task = None;
    }

    pub fn has_pending_repaint(&self) -> bool {
        self.repaint_task.is_some()
    }
}
