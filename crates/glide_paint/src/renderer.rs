//! Renderer abstraction
//!
//! Widgets paint through [`Renderer`], a canvas-style API with a transform
//! stack. Backends execute the calls; [`RecordingRenderer`] stores them
//! instead, together with the world matrix and clip rect in effect at each
//! draw, which is what layout and paint tests assert against.

use glide_core::affine::{multiply, AffineMatrix};
use glide_core::{Point, Rect};
use smallvec::SmallVec;

use crate::color::Color;

/// The drawing contract consumed by widgets
pub trait Renderer {
    /// Push the current transform and clip
    fn save(&mut self);
    /// Pop back to the last saved transform and clip
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    /// Rotate by `angle` radians
    fn rotate(&mut self, angle: f64);
    /// Concatenate an arbitrary matrix onto the current transform
    fn transform(&mut self, matrix: &AffineMatrix);
    /// Intersect the clip with `rect` (in current local coordinates)
    fn clip_rect(&mut self, rect: Rect);
    fn draw_rect(&mut self, rect: Rect, color: Color, corner_radius: f64);
    fn draw_text(&mut self, text: &str, position: Point, size: f64, color: Color);
    /// The world matrix currently in effect
    fn world_matrix(&self) -> AffineMatrix;
}

/// A paint command for the renderer
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    FillRect {
        rect: Rect,
        color: Color,
        corner_radius: f64,
    },
    DrawText {
        text: String,
        position: Point,
        size: f64,
        color: Color,
    },
    PushClip {
        rect: Rect,
    },
}

/// A command plus the state it was issued under
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCommand {
    pub command: PaintCommand,
    pub world: AffineMatrix,
    /// Clip in world space; `None` when unclipped
    pub clip: Option<Rect>,
}

impl RecordedCommand {
    /// Rect of a `FillRect` mapped to world space (axis-aligned transforms only)
    pub fn world_rect(&self) -> Option<Rect> {
        match &self.command {
            PaintCommand::FillRect { rect, .. } => Some(map_rect(&self.world, rect)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct State {
    world: AffineMatrix,
    clip: Option<Rect>,
}

/// Headless renderer that records commands
#[derive(Debug)]
pub struct RecordingRenderer {
    state: State,
    stack: SmallVec<[State; 8]>,
    commands: Vec<RecordedCommand>,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            state: State {
                world: AffineMatrix::IDENTITY,
                clip: None,
            },
            stack: SmallVec::new(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Fill commands with the given color, in paint order
    pub fn fills_with_color(&self, color: Color) -> impl Iterator<Item = &RecordedCommand> {
        self.commands.iter().filter(move |c| {
            matches!(c.command, PaintCommand::FillRect { color: fill, .. } if fill == color)
        })
    }

    /// Depth of the save stack; zero once every save has been restored
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    fn record(&mut self, command: PaintCommand) {
        self.commands.push(RecordedCommand {
            command,
            world: self.state.world,
            clip: self.state.clip,
        });
    }
}

impl Renderer for RecordingRenderer {
    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => tracing::warn!("RecordingRenderer::restore without matching save"),
        }
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.transform(&AffineMatrix::translation(x, y));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform(&AffineMatrix::scale(sx, sy));
    }

    fn rotate(&mut self, angle: f64) {
        self.transform(&AffineMatrix::rotation(angle));
    }

    fn transform(&mut self, matrix: &AffineMatrix) {
        self.state.world = multiply(&self.state.world, matrix);
    }

    fn clip_rect(&mut self, rect: Rect) {
        let world_rect = map_rect(&self.state.world, &rect);
        self.state.clip = Some(match self.state.clip {
            Some(existing) => intersect(&existing, &world_rect),
            None => world_rect,
        });
        self.record(PaintCommand::PushClip { rect });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color, corner_radius: f64) {
        self.record(PaintCommand::FillRect {
            rect,
            color,
            corner_radius,
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, size: f64, color: Color) {
        self.record(PaintCommand::DrawText {
            text: text.to_string(),
            position,
            size,
            color,
        });
    }

    fn world_matrix(&self) -> AffineMatrix {
        self.state.world
    }
}

/// Bounding box of `rect` after applying `m`
fn map_rect(m: &AffineMatrix, rect: &Rect) -> Rect {
    let corners = [
        m.transform_point(rect.origin),
        m.transform_point(Point::new(rect.max_x(), rect.y())),
        m.transform_point(Point::new(rect.x(), rect.max_y())),
        m.transform_point(Point::new(rect.max_x(), rect.max_y())),
    ];
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in corners {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

fn intersect(a: &Rect, b: &Rect) -> Rect {
    let x0 = a.x().max(b.x());
    let y0 = a.y().max(b.y());
    let x1 = a.max_x().min(b.max_x());
    let y1 = a.max_y().min(b.max_y());
    Rect::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_tracks_world_matrix() {
        let mut r = RecordingRenderer::new();
        r.save();
        r.translate(10.0, 20.0);
        r.scale(2.0, 2.0);
        r.draw_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::BLACK, 0.0);
        r.restore();
        r.draw_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::WHITE, 0.0);

        let cmds = r.commands();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].world_rect(), Some(Rect::new(10.0, 20.0, 10.0, 10.0)));
        assert_eq!(cmds[1].world, AffineMatrix::IDENTITY);
        assert_eq!(r.save_depth(), 0);
    }

    #[test]
    fn test_clip_intersects_in_world_space() {
        let mut r = RecordingRenderer::new();
        r.save();
        r.clip_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        r.translate(50.0, 50.0);
        r.clip_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        r.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK, 0.0);
        let last = r.commands().last().cloned();
        r.restore();

        assert_eq!(last.and_then(|c| c.clip), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));
        r.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK, 0.0);
        assert_eq!(r.commands().last().and_then(|c| c.clip), None);
    }

    #[test]
    fn test_fills_with_color_filters() {
        let mut r = RecordingRenderer::new();
        let red = Color::rgb(1.0, 0.0, 0.0);
        r.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0), red, 0.0);
        r.draw_text("hi", Point::ZERO, 12.0, red);
        r.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK, 0.0);
        assert_eq!(r.fills_with_color(red).count(), 1);
    }
}
