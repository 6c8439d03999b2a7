//! sombrero-ui provides the runtime primitives the sombrero animation cores
//! are built on.
//!
//! Nothing here draws. The crate turns pointer input into drag gestures,
//! runs per-frame tasks, interpolates values with springs and hands shared
//! state between a controller and the frame tasks it schedules.
//!
//! # Frame loop
//!
//! A host drives everything from its rendering loop:
//!
//! ```
//! use std::time::Duration;
//! use sombrero_ui::{
//!     frame_clock::{FrameClock, TickFlow},
//!     spring::{AnimatedValue, SpringConfig},
//!     state::State,
//! };
//!
//! let clock = FrameClock::new();
//! let offset = State::new(AnimatedValue::new(0.0, SpringConfig::default()));
//! offset.with_mut(|v| v.set_target(120.0));
//!
//! let animated = offset.clone();
//! clock.schedule(move |frame| {
//!     if animated.with_mut(|v| v.step(frame.now)) {
//!         TickFlow::Continue
//!     } else {
//!         TickFlow::Done
//!     }
//! });
//!
//! for frame in 0..240u64 {
//!     clock.advance(Duration::from_micros(frame * 16_667));
//! }
//! assert_eq!(offset.with(|v| v.value()), 120.0);
//! ```
//!
//! # Gestures
//!
//! [`gesture::DragRecognizer`] filters taps and reports drag phases; the
//! controllers in `sombrero-components` consume [`gesture::DragGesture`]s.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod callback;
pub mod frame_clock;
pub mod geometry;
pub mod gesture;
pub mod logging;
pub mod numeric;
pub mod spring;
pub mod state;

pub use crate::{
    callback::CallbackWith,
    frame_clock::{FrameClock, FrameInfo, TaskHandle, TickFlow},
    geometry::Point2D,
    gesture::{DragConfig, DragGesture, DragRecognizer},
    spring::{AnimatedValue, SpringConfig},
    state::State,
};
