//! Interactive animation cores built on `sombrero-ui`.
//!
//! # Components
//!
//! - [`reorder_list`]: a drag-to-reorder list whose rows ripple like a
//!   sombrero hat after each drop.
//! - [`rope`] and [`socket`]: a rope between two handles that sags by its
//!   slack, with handles that snap onto sockets when released nearby.
//!
//! Nothing here draws. A host feeds in [`DragGesture`](sombrero_ui::DragGesture)s,
//! advances a shared [`FrameClock`](sombrero_ui::FrameClock) once per frame
//! and reads back numbers: row offsets and scales, handle positions and an
//! SVG path for the rope.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use sombrero_components::reorder_list::{ReorderListArgs, ReorderListController};
//! use sombrero_ui::FrameClock;
//!
//! let clock = FrameClock::new();
//! let list = ReorderListController::new(
//!     4,
//!     ReorderListArgs::default().on_reorder(|order| println!("{order:?}")),
//!     &clock,
//! )
//! .unwrap();
//!
//! clock.advance(Duration::ZERO);
//! assert_eq!(list.frames().len(), 4);
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod reorder_list;
pub mod rope;
pub mod socket;
