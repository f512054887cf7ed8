//! Glide Animation System
//!
//! Cooperative, single-threaded animation plumbing.
//!
//! # Features
//!
//! - **Frame Scheduler**: next-frame requests and timers keyed by [`TaskId`],
//!   driven by a virtual millisecond clock so hosts and tests step frames
//!   deterministically
//! - **Interpolation**: linear interpolation and exponential approach used by
//!   rebound animations and paint-time easing

pub mod interpolate;
pub mod scheduler;

pub use interpolate::{approach, lerp, Approach};
pub use scheduler::{FrameScheduler, TaskId, DEFAULT_FRAME_INTERVAL_MS};
