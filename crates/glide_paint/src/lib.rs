//! Glide Paint API
//!
//! The drawing surface the viewport engine paints through.
//!
//! # Features
//!
//! - RGBA colors with interpolation for animated presentation state
//! - [`Renderer`]: the save/restore/transform/clip/draw contract a backend
//!   implements
//! - [`RecordingRenderer`]: a headless backend that records every command with
//!   its world matrix and clip, for tests and debugging

pub mod color;
pub mod renderer;

pub use color::Color;
pub use renderer::{PaintCommand, RecordedCommand, RecordingRenderer, Renderer};
