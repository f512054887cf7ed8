//! Glide Core
//!
//! Foundational primitives for the Glide viewport engine:
//!
//! - **Geometry**: points, sizes and rectangles in logical pixels
//! - **Affine Transforms**: immutable 2x3 matrices, composition and inversion
//! - **Input Events**: pointer and wheel events with propagation control
//! - **State Transitions**: event-driven enum state machines
//!
//! # Example
//!
//! ```rust
//! use glide_core::affine::{compose, invert, transform_point, TransformStep};
//! use glide_core::Point;
//!
//! let m = compose(&[TransformStep::Translate(10.0, 20.0), TransformStep::Scale(2.0, 2.0)]);
//! let p = transform_point(&m, Point::new(1.0, 1.0));
//! assert_eq!(p, Point::new(12.0, 22.0));
//!
//! let back = transform_point(&invert(&m).unwrap(), p);
//! assert!((back.x - 1.0).abs() < 1e-9);
//! ```

pub mod affine;
pub mod error;
pub mod events;
pub mod fsm;
pub mod geometry;

pub use affine::{AffineMatrix, TransformBuilder, TransformStep};
pub use error::{Result, TransformError};
pub use events::{Axis, EventType, InputEvent, InputKind, PointerType};
pub use fsm::StateTransitions;
pub use geometry::{Point, Rect, Size};
