//! Minimal retained widget tree
//!
//! Hosts blocks, viewports and scroll views so the scroll engine runs end
//! to end. Nodes own their children; parents are plain keys. Input is
//! hit-tested to the deepest node and then offered to every scroll view on
//! the ancestor chain, innermost first, until one stops propagation.
//!
//! The tree also owns the shared [`Scheduler`] and [`WindowListeners`].
//! [`WidgetTree::tick`] advances the clock and routes due tasks back to the
//! scroll views that scheduled them.

use glide_core::affine::{invert, multiply, transform_point, AffineMatrix};
use glide_core::{InputEvent, Point, PointerType, Size};
use glide_paint::{Color, Renderer};
use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::constraints::BoxConstraints;
use crate::error::{Result, TreeError};
use crate::props::Overflow;
use crate::scroll_ref::ScrollRef;
use crate::scroll_view::{ScrollContext, ScrollView};
use crate::task::{ScheduledTask, Scheduler};
use crate::viewport::Viewport;
use crate::window::WindowListeners;

new_key_type! {
    /// Handle of a node in a [`WidgetTree`]
    pub struct WidgetId;
}

type Chain = SmallVec<[WidgetId; 8]>;

/// A plain box that stacks its children vertically
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<Color>,
    pub label: Option<String>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// What a node is
#[derive(Debug)]
pub enum WidgetKind {
    Block(Block),
    Viewport(Viewport),
    ScrollView(Box<ScrollView>),
}

impl WidgetKind {
    /// Content-to-local transform applied to children
    pub fn view_matrix(&self) -> Option<AffineMatrix> {
        match self {
            WidgetKind::Block(_) => None,
            WidgetKind::Viewport(viewport) => Some(viewport.view_matrix()),
            WidgetKind::ScrollView(view) => Some(view.view_matrix()),
        }
    }

    fn viewport_mut(&mut self) -> Option<&mut Viewport> {
        match self {
            WidgetKind::Block(_) => None,
            WidgetKind::Viewport(viewport) => Some(viewport),
            WidgetKind::ScrollView(view) => Some(view.viewport_mut()),
        }
    }
}

impl From<Block> for WidgetKind {
    fn from(block: Block) -> Self {
        WidgetKind::Block(block)
    }
}

impl From<Viewport> for WidgetKind {
    fn from(viewport: Viewport) -> Self {
        WidgetKind::Viewport(viewport)
    }
}

impl From<ScrollView> for WidgetKind {
    fn from(view: ScrollView) -> Self {
        WidgetKind::ScrollView(Box::new(view))
    }
}

#[derive(Debug)]
struct Node {
    kind: WidgetKind,
    parent: Option<WidgetId>,
    children: SmallVec<[WidgetId; 4]>,
    /// Offset in the parent's content space
    position: Point,
    size: Size,
    z_index: i32,
}

/// Layout inputs copied out of a node so children can be laid out
enum LayoutRole {
    Block {
        width: Option<f64>,
        height: Option<f64>,
    },
    Viewport {
        width: f64,
        height: f64,
    },
    ScrollView {
        child_constraints: BoxConstraints,
    },
}

/// Paint inputs copied out of a node
enum PaintRole {
    Block {
        color: Option<Color>,
        label: Option<String>,
    },
    Viewport {
        view: AffineMatrix,
        clip: bool,
    },
}

/// The widget tree
#[derive(Debug, Default)]
pub struct WidgetTree {
    nodes: SlotMap<WidgetId, Node>,
    root: Option<WidgetId>,
    scheduler: Scheduler,
    window: WindowListeners,
    /// Scroll views holding a content-drag pointer, innermost first
    drag_chain: Chain,
    /// Scroll views under the pointer at the last move
    hovered: Chain,
    dirty: FxHashSet<WidgetId>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheduler(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            ..Default::default()
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Insert a root, replacing (and disposing) any previous one
    pub fn insert_root(&mut self, kind: impl Into<WidgetKind>) -> WidgetId {
        if let Some(old) = self.root.take() {
            // `old` is live, removal cannot fail
            let _ = self.remove(old);
        }
        let id = self.insert_node(kind.into(), None);
        self.root = Some(id);
        id
    }

    pub fn insert_child(&mut self, parent: WidgetId, kind: impl Into<WidgetKind>) -> Result<WidgetId> {
        if !self.nodes.contains_key(parent) {
            return Err(TreeError::UnknownWidget(parent));
        }
        let id = self.insert_node(kind.into(), Some(parent));
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(id);
        }
        self.dirty.insert(parent);
        Ok(id)
    }

    fn insert_node(&mut self, kind: WidgetKind, parent: Option<WidgetId>) -> WidgetId {
        let id = self.nodes.insert(Node {
            kind,
            parent,
            children: SmallVec::new(),
            position: Point::ZERO,
            size: Size::ZERO,
            z_index: 0,
        });
        if let Some(WidgetKind::ScrollView(view)) = self.nodes.get_mut(id).map(|n| &mut n.kind) {
            view.set_id(id);
        }
        self.dirty.insert(id);
        id
    }

    /// Remove a node and its subtree, disposing scroll views
    pub fn remove(&mut self, id: WidgetId) -> Result<()> {
        let parent = self
            .nodes
            .get(id)
            .ok_or(TreeError::UnknownWidget(id))?
            .parent;

        let mut stack: Chain = SmallVec::new();
        stack.push(id);
        while let Some(current) = stack.pop() {
            let Some(mut node) = self.nodes.remove(current) else {
                continue;
            };
            stack.extend(node.children.iter().copied());
            if let WidgetKind::ScrollView(view) = &mut node.kind {
                view.dispose(&mut ScrollContext::new(&mut self.scheduler, &mut self.window));
            }
            self.drag_chain.retain(|w| *w != current);
            self.hovered.retain(|w| *w != current);
            self.dirty.remove(&current);
        }

        match parent {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(parent) {
                    node.children.retain(|c| *c != id);
                }
                self.dirty.insert(parent);
            }
            None => {
                if self.root == Some(id) {
                    self.root = None;
                }
            }
        }
        Ok(())
    }

    pub fn root(&self) -> Option<WidgetId> {
        self.root
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn kind(&self, id: WidgetId) -> Option<&WidgetKind> {
        self.nodes.get(id).map(|n| &n.kind)
    }

    pub fn set_z_index(&mut self, id: WidgetId, z_index: i32) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(TreeError::UnknownWidget(id))?;
        node.z_index = z_index;
        self.dirty.insert(id);
        Ok(())
    }

    /// Position in the parent's content space, as assigned by layout
    pub fn position(&self, id: WidgetId) -> Result<Point> {
        self.nodes
            .get(id)
            .map(|n| n.position)
            .ok_or(TreeError::UnknownWidget(id))
    }

    pub fn size(&self, id: WidgetId) -> Result<Size> {
        self.nodes
            .get(id)
            .map(|n| n.size)
            .ok_or(TreeError::UnknownWidget(id))
    }

    /// `id` and its ancestors, innermost first
    pub fn ancestors(&self, id: WidgetId) -> Result<Chain> {
        if !self.nodes.contains_key(id) {
            return Err(TreeError::UnknownWidget(id));
        }
        let mut chain = Chain::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            chain.push(node_id);
            current = self.nodes.get(node_id).and_then(|n| n.parent);
        }
        Ok(chain)
    }

    /// Scroll views among `id` and its ancestors, innermost first
    fn scroll_chain(&self, id: WidgetId) -> Chain {
        self.ancestors(id)
            .unwrap_or_default()
            .into_iter()
            .filter(|w| matches!(self.kind(*w), Some(WidgetKind::ScrollView(_))))
            .collect()
    }

    // =========================================================================
    // Widget access
    // =========================================================================

    pub fn scroll_view(&self, id: WidgetId) -> Result<&ScrollView> {
        match self.nodes.get(id).map(|n| &n.kind) {
            Some(WidgetKind::ScrollView(view)) => Ok(&**view),
            Some(_) => Err(TreeError::NotAScrollView(id)),
            None => Err(TreeError::UnknownWidget(id)),
        }
    }

    /// Direct access, e.g. to register listeners. Scrolling that needs the
    /// scheduler goes through [`with_scroll_view`](Self::with_scroll_view).
    pub fn scroll_view_mut(&mut self, id: WidgetId) -> Result<&mut ScrollView> {
        match self.nodes.get_mut(id).map(|n| &mut n.kind) {
            Some(WidgetKind::ScrollView(view)) => Ok(&mut **view),
            Some(_) => Err(TreeError::NotAScrollView(id)),
            None => Err(TreeError::UnknownWidget(id)),
        }
    }

    /// Run `f` with a scroll view and the tree's scheduler and listeners
    pub fn with_scroll_view<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut ScrollView, &mut ScrollContext<'_>) -> R,
    ) -> Result<R> {
        let node = self.nodes.get_mut(id).ok_or(TreeError::UnknownWidget(id))?;
        let WidgetKind::ScrollView(view) = &mut node.kind else {
            return Err(TreeError::NotAScrollView(id));
        };
        let mut ctx = ScrollContext::new(&mut self.scheduler, &mut self.window);
        Ok(f(&mut **view, &mut ctx))
    }

    /// The viewport of a viewport or scroll view node
    pub fn viewport(&self, id: WidgetId) -> Result<&Viewport> {
        match self.nodes.get(id).map(|n| &n.kind) {
            Some(WidgetKind::Viewport(viewport)) => Ok(viewport),
            Some(WidgetKind::ScrollView(view)) => Ok(view.viewport()),
            Some(WidgetKind::Block(_)) => Err(TreeError::NotAViewport(id)),
            None => Err(TreeError::UnknownWidget(id)),
        }
    }

    pub fn viewport_mut(&mut self, id: WidgetId) -> Result<&mut Viewport> {
        match self.nodes.get_mut(id).map(|n| &mut n.kind) {
            Some(kind) => kind.viewport_mut().ok_or(TreeError::NotAViewport(id)),
            None => Err(TreeError::UnknownWidget(id)),
        }
    }

    pub fn scroll_ref(&self, id: WidgetId) -> Result<ScrollRef> {
        self.scroll_view(id).map(|_| ScrollRef::new(id))
    }

    /// Programmatic scroll of a scroll view
    pub fn scroll_to(&mut self, id: WidgetId, x: f64, y: f64) -> Result<bool> {
        self.with_scroll_view(id, |view, ctx| view.scroll_to(ctx, x, y))
    }

    pub fn scroll_by(&mut self, id: WidgetId, dx: f64, dy: f64) -> Result<bool> {
        self.with_scroll_view(id, |view, ctx| view.scroll_by(ctx, dx, dy))
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn window_listeners(&self) -> &WindowListeners {
        &self.window
    }

    // =========================================================================
    // Coordinates
    // =========================================================================

    /// Matrix mapping `id`'s local space to the root (screen) space
    pub fn local_matrix(&self, id: WidgetId) -> Result<AffineMatrix> {
        let chain = self.ancestors(id)?;
        let mut matrix = AffineMatrix::IDENTITY;
        for &node_id in chain.iter().rev() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            matrix = multiply(
                &matrix,
                &AffineMatrix::translation(node.position.x, node.position.y),
            );
            if node_id != id {
                if let Some(view) = node.kind.view_matrix() {
                    matrix = multiply(&matrix, &view);
                }
            }
        }
        Ok(matrix)
    }

    /// Screen point in `id`'s local space
    pub fn local_point(&self, id: WidgetId, screen: Point) -> Result<Point> {
        let inverse = invert(&self.local_matrix(id)?)?;
        Ok(transform_point(&inverse, screen))
    }

    /// Screen point in the content space of `id` (its local space for
    /// blocks). Falls back to the untransformed point when a transform on
    /// the way cannot be inverted.
    pub fn world_xy(&self, id: WidgetId, screen: Point) -> Result<Point> {
        let mut matrix = self.local_matrix(id)?;
        if let Some(view) = self.nodes.get(id).and_then(|n| n.kind.view_matrix()) {
            matrix = multiply(&matrix, &view);
        }
        match invert(&matrix) {
            Ok(inverse) => Ok(transform_point(&inverse, screen)),
            Err(err) => {
                tracing::warn!(widget = ?id, %err, "world_xy fell back to the untransformed point");
                Ok(screen)
            }
        }
    }

    /// Deepest node under a screen point
    pub fn hit_test(&self, screen: Point) -> Option<WidgetId> {
        self.hit_node(self.root?, screen)
    }

    fn hit_node(&self, id: WidgetId, point: Point) -> Option<WidgetId> {
        let node = self.nodes.get(id)?;
        let local = point.offset(-node.position.x, -node.position.y);
        if !node.size.to_rect().contains(local) {
            return None;
        }
        let content = match node.kind.view_matrix().map(|m| invert(&m)) {
            Some(Ok(inverse)) => transform_point(&inverse, local),
            _ => local,
        };
        for &child in self.children_by_z(id).iter().rev() {
            if let Some(hit) = self.hit_node(child, content) {
                return Some(hit);
            }
        }
        Some(id)
    }

    /// Children back to front; equal z keeps insertion order
    fn children_by_z(&self, id: WidgetId) -> SmallVec<[WidgetId; 4]> {
        let mut children = self
            .nodes
            .get(id)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        children.sort_by_key(|c| self.nodes.get(*c).map_or(0, |n| n.z_index));
        children
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Lay out the whole tree into a window of `size`
    pub fn layout(&mut self, size: Size) {
        if let Some(root) = self.root {
            self.layout_node(root, &BoxConstraints::tight(size));
            if let Some(node) = self.nodes.get_mut(root) {
                node.position = Point::ZERO;
            }
        }
    }

    fn layout_node(&mut self, id: WidgetId, constraints: &BoxConstraints) -> Size {
        let Some(node) = self.nodes.get(id) else {
            return Size::ZERO;
        };
        let children = node.children.clone();
        let role = match &node.kind {
            WidgetKind::Block(block) => LayoutRole::Block {
                width: block.width,
                height: block.height,
            },
            WidgetKind::Viewport(viewport) => LayoutRole::Viewport {
                width: viewport.width(),
                height: viewport.height(),
            },
            WidgetKind::ScrollView(view) => LayoutRole::ScrollView {
                child_constraints: view.child_constraints(constraints),
            },
        };

        let size = match role {
            LayoutRole::Block { width, height } => {
                let known_width = width
                    .map(|w| constraints.constrain_width(w))
                    .or_else(|| constraints.has_bounded_width().then_some(constraints.max_width));
                let child_constraints = BoxConstraints {
                    max_width: known_width.unwrap_or(f64::INFINITY),
                    ..BoxConstraints::UNBOUNDED
                };
                let content = self.stack_children(&children, &child_constraints);
                Size::new(
                    known_width.unwrap_or_else(|| constraints.constrain_width(content.width)),
                    constraints.constrain_height(height.unwrap_or(content.height)),
                )
            }
            LayoutRole::Viewport { width, height } => {
                let content = self.stack_children(&children, &BoxConstraints::UNBOUNDED);
                let fill = |max: f64, explicit: f64, content: f64| {
                    if max.is_finite() {
                        max
                    } else if explicit > 0.0 {
                        explicit
                    } else {
                        content
                    }
                };
                let size = Size::new(
                    fill(constraints.max_width, width, content.width),
                    fill(constraints.max_height, height, content.height),
                );
                if let Ok(viewport) = self.viewport_mut(id) {
                    viewport.set_size(size);
                }
                size
            }
            LayoutRole::ScrollView { child_constraints } => {
                let content = self.stack_children(&children, &child_constraints);
                self.with_scroll_view(id, |view, ctx| view.perform_layout(ctx, constraints, content))
                    .unwrap_or_default()
            }
        };

        if let Some(node) = self.nodes.get_mut(id) {
            node.size = size;
        }
        size
    }

    /// Lay children out top to bottom; returns the stacked extent
    fn stack_children(&mut self, children: &[WidgetId], constraints: &BoxConstraints) -> Size {
        let mut width: f64 = 0.0;
        let mut y = 0.0;
        for &child in children {
            let size = self.layout_node(child, constraints);
            if let Some(node) = self.nodes.get_mut(child) {
                node.position = Point::new(0.0, y);
            }
            width = width.max(size.width);
            y += size.height;
        }
        Size::new(width, y)
    }

    // =========================================================================
    // Paint
    // =========================================================================

    pub fn paint(&mut self, renderer: &mut dyn Renderer) {
        if let Some(root) = self.root {
            self.paint_node(root, renderer);
        }
    }

    fn paint_node(&mut self, id: WidgetId, renderer: &mut dyn Renderer) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let position = node.position;
        let bounds = node.size.to_rect();
        let role = match &node.kind {
            WidgetKind::Block(block) => PaintRole::Block {
                color: block.color,
                label: block.label.clone(),
            },
            WidgetKind::Viewport(viewport) => PaintRole::Viewport {
                view: viewport.view_matrix(),
                clip: true,
            },
            WidgetKind::ScrollView(view) => PaintRole::Viewport {
                view: view.view_matrix(),
                clip: view.props().overflow == Overflow::Hidden,
            },
        };
        let children = self.children_by_z(id);

        renderer.save();
        renderer.translate(position.x, position.y);
        match role {
            PaintRole::Block { color, label } => {
                if let Some(color) = color {
                    renderer.draw_rect(bounds, color, 0.0);
                }
                if let Some(label) = label {
                    renderer.draw_text(&label, Point::new(4.0, 14.0), 12.0, Color::BLACK);
                }
                for child in children {
                    self.paint_node(child, renderer);
                }
            }
            PaintRole::Viewport { view, clip } => {
                if clip {
                    renderer.clip_rect(bounds);
                }
                renderer.save();
                renderer.transform(&view);
                for child in children {
                    self.paint_node(child, renderer);
                }
                renderer.restore();
                // Scrollbars sit above the content, outside the view transform
                if let Some(Node {
                    kind: WidgetKind::ScrollView(view),
                    ..
                }) = self.nodes.get_mut(id)
                {
                    view.paint_scrollbars(renderer, &mut self.scheduler);
                }
            }
        }
        renderer.restore();
    }

    // =========================================================================
    // Input
    // =========================================================================

    fn retarget(&self, event: &mut InputEvent, id: WidgetId) {
        let screen = Point::new(event.screen_x, event.screen_y);
        match self.local_point(id, screen) {
            Ok(local) => event.set_local(local.x, local.y),
            Err(err) => {
                tracing::warn!(widget = ?id, %err, "event kept screen coordinates");
                event.set_local(screen.x, screen.y);
            }
        }
    }

    /// Wheel at screen `(x, y)`. The returned event reports whether a scroll
    /// view consumed it and suppressed the default.
    pub fn dispatch_wheel(&mut self, x: f64, y: f64, delta_x: f64, delta_y: f64) -> InputEvent {
        let mut event = InputEvent::wheel(x, y, delta_x, delta_y);
        let Some(target) = self.hit_test(Point::new(x, y)) else {
            return event;
        };
        for id in self.scroll_chain(target) {
            self.retarget(&mut event, id);
            let _ = self.with_scroll_view(id, |view, ctx| view.handle_wheel(ctx, &mut event));
            if event.propagation_stopped {
                tracing::trace!(widget = ?id, "wheel consumed");
                break;
            }
        }
        event
    }

    pub fn dispatch_pointer_down(&mut self, x: f64, y: f64, pointer_type: PointerType) -> InputEvent {
        let mut event = InputEvent::pointer_down(x, y, pointer_type);
        self.drag_chain.clear();
        let Some(target) = self.hit_test(Point::new(x, y)) else {
            return event;
        };
        for id in self.scroll_chain(target) {
            self.retarget(&mut event, id);
            let holds_pointer = self
                .with_scroll_view(id, |view, ctx| {
                    view.handle_pointer_down(ctx, &mut event);
                    view.is_pointer_down()
                })
                .unwrap_or(false);
            if holds_pointer {
                self.drag_chain.push(id);
            }
            if event.propagation_stopped {
                break;
            }
        }
        event
    }

    pub fn dispatch_pointer_move(&mut self, x: f64, y: f64, pointer_type: PointerType) -> InputEvent {
        let mut event = InputEvent::pointer_move(x, y, pointer_type);
        let screen = Point::new(x, y);

        // Thumb drags own the pointer
        let owners = self.window.owners();
        if !owners.is_empty() {
            let mut handled = false;
            for owner in owners {
                handled |= self
                    .with_scroll_view(owner, |view, ctx| view.handle_window_pointer_move(ctx, screen))
                    .unwrap_or(false);
            }
            if handled {
                event.stop_propagation();
                event.prevent_default();
                return event;
            }
        }

        let chain = if self.drag_chain.is_empty() {
            let chain = self
                .hit_test(screen)
                .map(|target| self.scroll_chain(target))
                .unwrap_or_default();
            let left: Chain = self
                .hovered
                .iter()
                .copied()
                .filter(|w| !chain.contains(w))
                .collect();
            for id in left {
                let _ = self.with_scroll_view(id, |view, _| view.handle_pointer_leave());
            }
            self.hovered = chain.clone();
            chain
        } else {
            self.drag_chain.clone()
        };

        let mut consumed = false;
        for id in chain {
            if consumed {
                let _ = self.with_scroll_view(id, |view, _| view.track_pointer(screen));
                continue;
            }
            self.retarget(&mut event, id);
            consumed = self
                .with_scroll_view(id, |view, ctx| view.handle_pointer_move(ctx, &mut event))
                .unwrap_or(false);
        }
        event
    }

    pub fn dispatch_pointer_up(&mut self, x: f64, y: f64, pointer_type: PointerType) -> InputEvent {
        let mut event = InputEvent::pointer_up(x, y, pointer_type);

        for owner in self.window.owners() {
            let ended = self
                .with_scroll_view(owner, |view, ctx| view.handle_window_pointer_up(ctx))
                .unwrap_or(false);
            if ended {
                event.stop_propagation();
            }
        }

        let chain = std::mem::take(&mut self.drag_chain);
        for id in chain {
            self.retarget(&mut event, id);
            let _ = self.with_scroll_view(id, |view, ctx| view.handle_pointer_up(ctx));
        }
        event
    }

    // =========================================================================
    // Frames
    // =========================================================================

    /// Advance the clock by `dt_ms` and run one frame: frame requests made
    /// before this call, then timers that came due. Work scheduled while
    /// running lands in a later frame. Returns the number of tasks run.
    pub fn tick(&mut self, dt_ms: f64) -> usize {
        self.scheduler.advance(dt_ms);
        let frames = self.scheduler.begin_frame();
        let timers = self.scheduler.take_due_timers();
        let count = frames.len() + timers.len();
        for (_, task) in timers.into_iter().chain(frames) {
            self.run_task(task);
        }
        count
    }

    /// Tick at the frame interval until nothing is pending, at most
    /// `max_frames` times. Returns the number of frames run.
    pub fn run_until_idle(&mut self, max_frames: usize) -> usize {
        let interval = self.scheduler.frame_interval();
        let mut frames = 0;
        while frames < max_frames && !self.scheduler.is_idle() {
            self.tick(interval);
            frames += 1;
        }
        frames
    }

    fn run_task(&mut self, task: ScheduledTask) {
        if let Err(err) = self.with_scroll_view(task.widget, |view, ctx| view.run_task(ctx, task.kind)) {
            tracing::trace!(?task, %err, "dropped task for a removed widget");
        }
    }

    /// Widgets needing repaint since the last call
    pub fn take_dirty(&mut self) -> Vec<WidgetId> {
        let mut dirty = std::mem::take(&mut self.dirty);
        for (id, node) in self.nodes.iter_mut() {
            if let Some(viewport) = node.kind.viewport_mut() {
                if viewport.take_dirty() {
                    dirty.insert(id);
                }
            }
        }
        dirty.into_iter().collect()
    }

    /// Dispose every scroll view and drop pending work
    pub fn dispose(&mut self) {
        let mut ctx = ScrollContext::new(&mut self.scheduler, &mut self.window);
        for (_, node) in self.nodes.iter_mut() {
            if let WidgetKind::ScrollView(view) = &mut node.kind {
                view.dispose(&mut ctx);
            }
        }
        self.drag_chain.clear();
        self.hovered.clear();
        self.scheduler.clear();
    }
}
