//! Pan / zoom / scroll state
//!
//! A [`Viewport`] owns the transform applied to its descendants:
//!
//! ```text
//! view = translate(tx, ty) * scale(s) * translate(-scroll_x, -scroll_y)
//! ```
//!
//! It maps content space (where children live) to the viewport's local
//! space. Every mutation clamps `scale` into `[min_scale, max_scale]`,
//! ignores non-finite input, and only notifies listeners and marks the
//! viewport dirty when a value actually changed.

use glide_core::affine::{invert, transform_point, AffineMatrix, TransformBuilder};
use glide_core::{Point, Size};
use slotmap::{new_key_type, SlotMap};

use crate::props::ViewportProps;

/// Zoom step used by [`Viewport::zoom_in`] and [`Viewport::zoom_out`]
pub const ZOOM_STEP: f64 = 1.2;

new_key_type! {
    /// Handle returned when registering a viewport listener
    pub struct ListenerKey;
}

/// `(scale, tx, ty)` after a transform change
pub type ViewChangeFn = Box<dyn FnMut(f64, f64, f64)>;
/// `(scroll_x, scroll_y)` after a scroll change
pub type ScrollFn = Box<dyn FnMut(f64, f64)>;
/// `(scale, cx, cy)` after a zoom around a screen point
pub type ZoomAtFn = Box<dyn FnMut(f64, f64, f64)>;

enum Listener {
    ViewChange(ViewChangeFn),
    Scroll(ScrollFn),
    ZoomAt(ZoomAtFn),
}

/// Viewport state and its change listeners
pub struct Viewport {
    scale: f64,
    tx: f64,
    ty: f64,
    scroll_x: f64,
    scroll_y: f64,
    min_scale: f64,
    max_scale: f64,
    width: f64,
    height: f64,
    dirty: bool,
    listeners: SlotMap<ListenerKey, Listener>,
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("scale", &self.scale)
            .field("translate", &(self.tx, self.ty))
            .field("scroll", &(self.scroll_x, self.scroll_y))
            .field("scale_limits", &(self.min_scale, self.max_scale))
            .field("size", &(self.width, self.height))
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportProps::default())
    }
}

impl Viewport {
    pub fn new(props: ViewportProps) -> Self {
        let (min_scale, max_scale) = sanitize_limits(props.min_scale, props.max_scale);
        let scale = finite_or(props.scale, 1.0).clamp(min_scale, max_scale);
        Self {
            scale,
            tx: finite_or(props.tx, 0.0),
            ty: finite_or(props.ty, 0.0),
            scroll_x: finite_or(props.scroll_x, 0.0),
            scroll_y: finite_or(props.scroll_y, 0.0),
            min_scale,
            max_scale,
            width: props.width.map_or(0.0, |w| finite_or(w, 0.0).max(0.0)),
            height: props.height.map_or(0.0, |h| finite_or(h, 0.0).max(0.0)),
            dirty: false,
            listeners: SlotMap::with_key(),
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// `(tx, ty)`
    pub fn translate(&self) -> (f64, f64) {
        (self.tx, self.ty)
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn scroll_offset(&self) -> Point {
        Point::new(self.scroll_x, self.scroll_y)
    }

    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Set by layout. Does not notify.
    pub fn set_size(&mut self, size: Size) {
        let width = finite_or(size.width, self.width).max(0.0);
        let height = finite_or(size.height, self.height).max(0.0);
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.dirty = true;
        }
    }

    /// Replace the scale limits and re-clamp the current scale
    pub fn set_scale_limits(&mut self, min_scale: f64, max_scale: f64) {
        let (min_scale, max_scale) = sanitize_limits(min_scale, max_scale);
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        let (tx, ty) = (self.tx, self.ty);
        self.set_transform(self.scale, tx, ty);
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Set scale and translation. Returns true if anything changed.
    pub fn set_transform(&mut self, scale: f64, tx: f64, ty: f64) -> bool {
        let scale = finite_or(scale, self.scale).clamp(self.min_scale, self.max_scale);
        let tx = finite_or(tx, self.tx);
        let ty = finite_or(ty, self.ty);
        if scale == self.scale && tx == self.tx && ty == self.ty {
            return false;
        }
        self.scale = scale;
        self.tx = tx;
        self.ty = ty;
        self.dirty = true;
        for (_, listener) in self.listeners.iter_mut() {
            if let Listener::ViewChange(f) = listener {
                f(scale, tx, ty);
            }
        }
        true
    }

    /// Set the scroll offset. Returns true if it changed.
    pub fn scroll_to(&mut self, x: f64, y: f64) -> bool {
        let x = finite_or(x, self.scroll_x);
        let y = finite_or(y, self.scroll_y);
        if x == self.scroll_x && y == self.scroll_y {
            return false;
        }
        self.scroll_x = x;
        self.scroll_y = y;
        self.dirty = true;
        for (_, listener) in self.listeners.iter_mut() {
            if let Listener::Scroll(f) = listener {
                f(x, y);
            }
        }
        true
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        self.scroll_to(self.scroll_x + dx, self.scroll_y + dy)
    }

    /// Zoom to `scale` keeping the content point under local `(cx, cy)` fixed
    pub fn zoom_at(&mut self, scale: f64, cx: f64, cy: f64) -> bool {
        if !scale.is_finite() || !cx.is_finite() || !cy.is_finite() {
            return false;
        }
        let content_x = (cx - self.tx) / self.scale + self.scroll_x;
        let content_y = (cy - self.ty) / self.scale + self.scroll_y;
        let new_scale = scale.clamp(self.min_scale, self.max_scale);
        let tx = cx - (content_x - self.scroll_x) * new_scale;
        let ty = cy - (content_y - self.scroll_y) * new_scale;

        let changed = self.set_transform(new_scale, tx, ty);
        if changed {
            tracing::trace!(scale = new_scale, cx, cy, "zoom_at");
            for (_, listener) in self.listeners.iter_mut() {
                if let Listener::ZoomAt(f) = listener {
                    f(new_scale, cx, cy);
                }
            }
        }
        changed
    }

    pub fn zoom_in(&mut self) -> bool {
        let center = self.center();
        self.zoom_at(self.scale * ZOOM_STEP, center.x, center.y)
    }

    pub fn zoom_out(&mut self) -> bool {
        let center = self.center();
        self.zoom_at(self.scale / ZOOM_STEP, center.x, center.y)
    }

    pub fn reset_zoom(&mut self) -> bool {
        let center = self.center();
        self.zoom_at(1.0, center.x, center.y)
    }

    fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    // =========================================================================
    // Mapping
    // =========================================================================

    /// Content space to the viewport's local space
    pub fn view_matrix(&self) -> AffineMatrix {
        TransformBuilder::new()
            .translate(self.tx, self.ty)
            .scale(self.scale, self.scale)
            .translate(-self.scroll_x, -self.scroll_y)
            .build()
    }

    pub fn content_to_local(&self, point: Point) -> Point {
        transform_point(&self.view_matrix(), point)
    }

    /// Local point to content space. Falls back to the untransformed point
    /// when the view matrix cannot be inverted.
    pub fn local_to_content(&self, point: Point) -> Point {
        match invert(&self.view_matrix()) {
            Ok(inverse) => transform_point(&inverse, point),
            Err(err) => {
                tracing::warn!(%err, "viewport mapping fell back to the untransformed point");
                point
            }
        }
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    pub fn on_view_change<F>(&mut self, f: F) -> ListenerKey
    where
        F: FnMut(f64, f64, f64) + 'static,
    {
        self.listeners.insert(Listener::ViewChange(Box::new(f)))
    }

    pub fn on_scroll<F>(&mut self, f: F) -> ListenerKey
    where
        F: FnMut(f64, f64) + 'static,
    {
        self.listeners.insert(Listener::Scroll(Box::new(f)))
    }

    pub fn on_zoom_at<F>(&mut self, f: F) -> ListenerKey
    where
        F: FnMut(f64, f64, f64) + 'static,
    {
        self.listeners.insert(Listener::ZoomAt(Box::new(f)))
    }

    /// Remove a listener of any kind. Returns false if it was already gone.
    pub fn remove_listener(&mut self, key: ListenerKey) -> bool {
        self.listeners.remove(key).is_some()
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    // =========================================================================
    // Dirty tracking
    // =========================================================================

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and clear the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Positive, ordered scale limits
fn sanitize_limits(min_scale: f64, max_scale: f64) -> (f64, f64) {
    let defaults = ViewportProps::default();
    let mut min_scale = finite_or(min_scale, defaults.min_scale);
    let mut max_scale = finite_or(max_scale, defaults.max_scale);
    if min_scale > max_scale {
        std::mem::swap(&mut min_scale, &mut max_scale);
    }
    if min_scale <= 0.0 {
        min_scale = f64::MIN_POSITIVE;
    }
    (min_scale, max_scale.max(min_scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sized(width: f64, height: f64) -> Viewport {
        Viewport::new(ViewportProps::sized(width, height))
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_set_transform_clamps_scale() {
        let mut vp = sized(100.0, 100.0);
        vp.set_transform(50.0, 0.0, 0.0);
        assert_eq!(vp.scale(), 10.0);
        vp.set_transform(0.0001, 0.0, 0.0);
        assert_eq!(vp.scale(), 0.1);
    }

    #[test]
    fn test_set_transform_ignores_non_finite() {
        let mut vp = sized(100.0, 100.0);
        vp.set_transform(2.0, 5.0, 6.0);
        assert!(!vp.set_transform(f64::NAN, f64::INFINITY, 6.0));
        assert_eq!(vp.scale(), 2.0);
        assert_eq!(vp.translate(), (5.0, 6.0));
    }

    #[test]
    fn test_unchanged_transform_does_not_notify() {
        let mut vp = sized(100.0, 100.0);
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        vp.on_view_change(move |_, _, _| *counter.borrow_mut() += 1);

        assert!(vp.set_transform(1.5, 0.0, 0.0));
        vp.take_dirty();
        assert!(!vp.set_transform(1.5, 0.0, 0.0));
        assert_eq!(*calls.borrow(), 1);
        assert!(!vp.is_dirty());
    }

    #[test]
    fn test_scroll_notifies_listeners() {
        let mut vp = sized(100.0, 100.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let key = vp.on_scroll(move |x, y| sink.borrow_mut().push((x, y)));

        vp.scroll_to(10.0, 20.0);
        vp.scroll_by(5.0, f64::NAN);
        vp.scroll_by(5.0, 0.0);
        assert!(vp.remove_listener(key));
        vp.scroll_by(1.0, 1.0);

        assert_eq!(*seen.borrow(), vec![(10.0, 20.0), (15.0, 20.0)]);
        assert_eq!(vp.scroll_offset(), Point::new(16.0, 21.0));
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut vp = sized(400.0, 300.0);
        vp.scroll_to(30.0, 40.0);
        vp.set_transform(1.5, 12.0, -8.0);
        let anchor = Point::new(120.0, 90.0);
        let before = vp.local_to_content(anchor);

        assert!(vp.zoom_at(3.0, anchor.x, anchor.y));
        let after = vp.local_to_content(anchor);
        assert_close(before.x, after.x);
        assert_close(before.y, after.y);
        assert_eq!(vp.scale(), 3.0);
    }

    #[test]
    fn test_zoom_helpers_step_around_center() {
        let mut vp = sized(200.0, 200.0);
        let zooms = Rc::new(RefCell::new(Vec::new()));
        let sink = zooms.clone();
        vp.on_zoom_at(move |s, cx, cy| sink.borrow_mut().push((s, cx, cy)));

        vp.zoom_in();
        assert_close(vp.scale(), 1.2);
        vp.zoom_out();
        assert_close(vp.scale(), 1.0);
        vp.zoom_in();
        vp.reset_zoom();
        assert_eq!(vp.scale(), 1.0);
        let center = vp.local_to_content(Point::new(100.0, 100.0));
        assert_close(center.x, 100.0);
        assert_close(center.y, 100.0);
        assert_eq!(zooms.borrow().len(), 4);
        assert!(zooms.borrow().iter().all(|&(_, cx, cy)| cx == 100.0 && cy == 100.0));
    }

    #[test]
    fn test_zoom_at_respects_limits() {
        let mut vp = sized(100.0, 100.0);
        vp.set_scale_limits(0.5, 2.0);
        vp.zoom_at(100.0, 0.0, 0.0);
        assert_eq!(vp.scale(), 2.0);
        assert!(!vp.zoom_at(100.0, 0.0, 0.0));
    }

    #[test]
    fn test_view_matrix_order() {
        let mut vp = sized(100.0, 100.0);
        vp.scroll_to(10.0, 0.0);
        vp.set_transform(2.0, 5.0, 0.0);
        // content x=10 sits at the viewport's translate origin
        assert_eq!(vp.content_to_local(Point::new(10.0, 0.0)), Point::new(5.0, 0.0));
        assert_eq!(vp.content_to_local(Point::new(20.0, 0.0)), Point::new(25.0, 0.0));
    }

    #[test]
    fn test_reversed_limits_are_ordered() {
        let vp = Viewport::new(ViewportProps {
            min_scale: 4.0,
            max_scale: 0.5,
            ..Default::default()
        });
        assert_eq!((vp.min_scale(), vp.max_scale()), (0.5, 4.0));
        assert_eq!(vp.scale(), 1.0);
    }
}
