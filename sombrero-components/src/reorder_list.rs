//! Drag-to-reorder list with a ripple ("sombrero") after each drop.
//!
//! ## Usage
//!
//! Create a [`ReorderListController`] against the host's [`FrameClock`], feed
//! it the drag gestures recognized on each row, and read [`ItemFrame`]s back
//! every frame to position and scale the rows.
//!
//! ```
//! use std::time::Duration;
//! use sombrero_components::reorder_list::{ReorderListArgs, ReorderListController};
//! use sombrero_ui::{FrameClock, DragGesture, Point2D};
//!
//! let clock = FrameClock::new();
//! let list = ReorderListController::new(4, ReorderListArgs::default(), &clock).unwrap();
//!
//! // Drag the first row down by two rows and let go.
//! let h = list.args().item_height;
//! list.handle_drag(0, &DragGesture::moving(Point2D::new(0.0, 2.0 * h), Point2D::ZERO).starting());
//! list.handle_drag(0, &DragGesture::released(Point2D::new(0.0, 2.0 * h), Point2D::ZERO));
//! assert_eq!(list.order().as_slice(), &[1, 2, 0, 3]);
//!
//! for frame in 0..120u64 {
//!     clock.advance(Duration::from_millis(frame * 16));
//! }
//! assert!(list.frames().iter().all(|f| (f.y - f.slot as f32 * h).abs() < 1.0));
//! ```
//!
//! ## Behaviour
//!
//! - While a row is dragged it follows the pointer exactly, grows slightly
//!   and sits on top; the other rows ease into the slots the drop would
//!   produce.
//! - On release the new order is committed and the dropped row eases into its
//!   slot. Once it is within a few units of the slot, a ripple spreads out from
//!   it: each row's scale follows a decaying `sin φ / φ` wave whose phase grows
//!   with time and with slot distance, delayed by distance so the wave travels.
//! - Presses that never exceed the tap threshold do not reorder anything.

mod order;
mod ripple;
mod targets;

use std::time::Duration;

use derive_setters::Setters;
use sombrero_ui::{
    AnimatedValue, CallbackWith, DragGesture, FrameClock, SpringConfig, State, TaskHandle,
    TickFlow, numeric::clamp,
};
use thiserror::Error;
use tracing::{debug, trace};

pub use order::OrderedIndexList;
pub use ripple::{
    RippleArgs, RippleState, RippleTarget, ripple_intensity, ripple_phase, ripple_scale,
    ripple_targets,
};
pub use targets::{AnimationTarget, DragState, ImmediateFields, SettleWatcher, animation_targets};

/// Material-like defaults for list rows.
pub struct ReorderListDefaults;

impl ReorderListDefaults {
    /// Row height: 24 line + 2 × 12 padding + 2 × 2 border.
    pub const ITEM_HEIGHT: f32 = 24.0 + 12.0 * 2.0 + 2.0 * 2.0;
    /// Scale applied to the row under the pointer.
    pub const DRAG_SCALE: f32 = 1.04;
    /// Distance from its slot at which a released row counts as settled.
    pub const SETTLE_THRESHOLD: f32 = 5.0;
}

/// Errors raised when constructing a [`ReorderListController`].
#[derive(Debug, Error, PartialEq)]
pub enum ReorderListError {
    /// The list has no rows.
    #[error("a reorderable list needs at least one item")]
    Empty,
    /// The row height cannot place rows.
    #[error("item height must be finite and positive, got {0}")]
    InvalidItemHeight(f32),
}

/// Configuration for [`ReorderListController`].
#[derive(Debug, Clone, PartialEq, Setters)]
pub struct ReorderListArgs {
    /// Height of one row; slot `n` sits at `n * item_height`.
    pub item_height: f32,
    /// Scale of the row being dragged.
    pub drag_scale: f32,
    /// Distance under which a released row counts as settled.
    pub settle_threshold: f32,
    /// Ripple tuning.
    pub ripple: RippleArgs,
    /// Spring used for row position and scale.
    pub spring: SpringConfig,
    /// Called with the new order after a drop changed it.
    #[setters(skip)]
    pub on_reorder: Option<CallbackWith<Vec<usize>>>,
    /// Called with the dropped row once it settled into its slot.
    #[setters(skip)]
    pub on_settle: Option<CallbackWith<usize>>,
    /// Called with the origin row when a ripple finished.
    #[setters(skip)]
    pub on_ripple_finished: Option<CallbackWith<usize>>,
}

impl ReorderListArgs {
    /// Sets the reorder handler.
    pub fn on_reorder<F>(mut self, on_reorder: F) -> Self
    where
        F: Fn(Vec<usize>) + Send + Sync + 'static,
    {
        self.on_reorder = Some(CallbackWith::new(on_reorder));
        self
    }

    /// Sets the settle handler.
    pub fn on_settle<F>(mut self, on_settle: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.on_settle = Some(CallbackWith::new(on_settle));
        self
    }

    /// Sets the ripple-finished handler.
    pub fn on_ripple_finished<F>(mut self, on_ripple_finished: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.on_ripple_finished = Some(CallbackWith::new(on_ripple_finished));
        self
    }
}

impl Default for ReorderListArgs {
    fn default() -> Self {
        Self {
            item_height: ReorderListDefaults::ITEM_HEIGHT,
            drag_scale: ReorderListDefaults::DRAG_SCALE,
            settle_threshold: ReorderListDefaults::SETTLE_THRESHOLD,
            ripple: RippleArgs::default(),
            spring: SpringConfig::default(),
            on_reorder: None,
            on_settle: None,
            on_ripple_finished: None,
        }
    }
}

/// Where a row is on screen this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ItemFrame {
    /// Identity of the row.
    pub original_index: usize,
    /// Slot in the committed order.
    pub slot: usize,
    /// Animated vertical offset.
    pub y: f32,
    /// Vertical offset the row is heading to.
    pub y_target: f32,
    /// Animated scale.
    pub scale: f32,
    /// Scale the row is heading to.
    pub scale_target: f32,
    /// Stacking order.
    pub z_index: i32,
}

struct ItemSprings {
    y: AnimatedValue,
    scale: AnimatedValue,
    z_index: i32,
}

impl ItemSprings {
    fn apply(&mut self, target: &AnimationTarget) {
        if target.immediate.y {
            self.y.jump_to(target.y);
        } else {
            self.y.set_target(target.y);
        }
        if target.immediate.scale {
            self.scale.jump_to(target.scale);
        } else {
            self.scale.set_target(target.scale);
        }
        self.z_index = target.z_index;
    }
}

#[derive(Clone, Copy)]
struct ActiveRipple {
    origin: usize,
    generation: u64,
    handle: TaskHandle,
}

struct ListInner {
    order: OrderedIndexList,
    items: Vec<ItemSprings>,
    drag: Option<DragState>,
    settle: Vec<Option<SettleWatcher>>,
    ripple: Option<ActiveRipple>,
    ripple_generation: u64,
}

/// Owns the order of a list and animates its rows.
///
/// The controller is the only writer of the order. It schedules one
/// persistent frame task that steps the row springs and watches for a
/// settled drop, plus one short-lived task per ripple. Both are cancelled
/// when the controller is dropped.
pub struct ReorderListController {
    args: ReorderListArgs,
    inner: State<ListInner>,
    clock: FrameClock,
    frame_task: TaskHandle,
}

impl ReorderListController {
    /// Creates a controller for `len` rows in identity order.
    pub fn new(
        len: usize,
        args: ReorderListArgs,
        clock: &FrameClock,
    ) -> Result<Self, ReorderListError> {
        if len == 0 {
            return Err(ReorderListError::Empty);
        }
        if !args.item_height.is_finite() || args.item_height <= 0.0 {
            return Err(ReorderListError::InvalidItemHeight(args.item_height));
        }

        let items = (0..len)
            .map(|slot| ItemSprings {
                y: AnimatedValue::new(slot as f32 * args.item_height, args.spring),
                scale: AnimatedValue::new(1.0, args.spring),
                z_index: 0,
            })
            .collect();
        let inner = State::new(ListInner {
            order: OrderedIndexList::new(len),
            items,
            drag: None,
            settle: vec![None; len],
            ripple: None,
            ripple_generation: 0,
        });

        let frame_task = {
            let inner = inner.clone();
            let clock_for_task = clock.clone();
            let args = args.clone();
            clock.schedule(move |frame| {
                let settled = step_items(&inner, frame.now);
                for original in settled {
                    debug!(original, "dropped item settled");
                    if let Some(on_settle) = &args.on_settle {
                        on_settle.call(original);
                    }
                    start_ripple(&inner, &clock_for_task, &args, original);
                }
                TickFlow::Continue
            })
        };

        debug!(len, item_height = args.item_height, "reorder list created");
        Ok(Self {
            args,
            inner,
            clock: clock.clone(),
            frame_task,
        })
    }

    /// The configuration in use.
    pub fn args(&self) -> &ReorderListArgs {
        &self.args
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.inner.with(|s| s.order.len())
    }

    /// Always `false`; construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The committed order.
    pub fn order(&self) -> OrderedIndexList {
        self.inner.with(|s| s.order.clone())
    }

    /// The in-progress drag, if any.
    pub fn drag_state(&self) -> Option<DragState> {
        self.inner.with(|s| s.drag)
    }

    /// Whether a ripple is currently running.
    pub fn is_rippling(&self) -> bool {
        self.inner.with(|s| s.ripple.is_some())
    }

    /// Origin row of the running ripple.
    pub fn ripple_origin(&self) -> Option<usize> {
        self.inner.with(|s| s.ripple.map(|r| r.origin))
    }

    /// Per-row render state, indexed by original index.
    pub fn frames(&self) -> Vec<ItemFrame> {
        self.inner.with(|s| {
            s.items
                .iter()
                .enumerate()
                .map(|(original_index, item)| ItemFrame {
                    original_index,
                    slot: s.order.position(original_index).unwrap_or(original_index),
                    y: item.y.value(),
                    y_target: item.y.target(),
                    scale: item.scale.value(),
                    scale_target: item.scale.target(),
                    z_index: item.z_index,
                })
                .collect()
        })
    }

    /// Feeds one drag gesture step for the row with identity `original`.
    ///
    /// Taps and unknown rows are ignored. The candidate slot is clamped into
    /// the list, so no movement can break the order.
    pub fn handle_drag(&self, original: usize, gesture: &DragGesture) {
        if gesture.tap {
            trace!(original, "tap ignored");
            return;
        }

        let args = &self.args;
        let outcome = self.inner.with_mut(|s| {
            let Some(current_slot) = s.order.position(original) else {
                debug!(original, "drag on unknown item ignored");
                return None;
            };

            let mut superseded = None;
            if gesture.first {
                s.settle[original] = None;
                if s.ripple.is_some_and(|r| r.origin == original) {
                    superseded = s.ripple.take();
                    for item in &mut s.items {
                        item.scale.clear_pending();
                    }
                }
            }

            let delta = if gesture.movement.y.is_finite() {
                gesture.movement.y
            } else {
                0.0
            };
            let last_slot = (s.order.len() - 1) as f32;
            let raw_slot = (current_slot as f32 * args.item_height + delta) / args.item_height;
            let target_slot = clamp(0.0, last_slot, raw_slot.round()) as usize;
            let new_order = s.order.moved(current_slot, target_slot);

            let drag = DragState {
                active: gesture.active,
                original_index: original,
                current_slot,
                vertical_delta: delta,
                last: gesture.last,
            };
            let targets = animation_targets(&new_order, Some(&drag), args);
            for (index, target) in targets.iter().enumerate() {
                s.items[index].apply(target);
                if let Some(watcher) = target.settle {
                    s.settle[index] = Some(watcher);
                }
            }

            let mut committed = None;
            if gesture.last {
                s.drag = None;
                if new_order != s.order {
                    committed = Some(new_order.as_slice().to_vec());
                }
                s.order = new_order;
            } else {
                s.drag = Some(drag);
            }
            Some((superseded, committed))
        });

        let Some((superseded, committed)) = outcome else {
            return;
        };
        if let Some(ripple) = superseded {
            self.clock.cancel(ripple.handle);
            trace!(original, "ripple superseded by new drag");
        }
        if let Some(order) = committed {
            debug!(original, ?order, "order committed");
            if let Some(on_reorder) = &args.on_reorder {
                on_reorder.call(order);
            }
        }
    }
}

impl Drop for ReorderListController {
    fn drop(&mut self) {
        self.clock.cancel(self.frame_task);
        if let Some(ripple) = self.inner.with_mut(|s| s.ripple.take()) {
            self.clock.cancel(ripple.handle);
        }
    }
}

/// Steps every spring and returns the rows whose settle watcher fired.
fn step_items(inner: &State<ListInner>, now: Duration) -> Vec<usize> {
    inner.with_mut(|s| {
        for item in &mut s.items {
            item.y.step(now);
            item.scale.step(now);
        }

        let mut settled = Vec::new();
        for (original, slot) in s.settle.iter_mut().enumerate() {
            let Some(watcher) = slot else {
                continue;
            };
            if watcher.observe(s.items[original].y.value()) {
                settled.push(original);
                *slot = None;
            }
        }
        settled
    })
}

fn start_ripple(
    inner: &State<ListInner>,
    clock: &FrameClock,
    args: &ReorderListArgs,
    origin: usize,
) {
    let (generation, previous) = inner.with_mut(|s| {
        s.ripple_generation += 1;
        (s.ripple_generation, s.ripple.take())
    });
    if let Some(previous) = previous {
        clock.cancel(previous.handle);
        trace!(origin = previous.origin, "ripple superseded");
    }

    let task_inner = inner.clone();
    let task_args = args.clone();
    let mut state = RippleState::new(origin);
    let handle = clock.schedule(move |frame| {
        let elapsed_ms = state.advance(frame.now);
        if state.is_finished(&task_args.ripple) {
            task_inner.with_mut(|s| {
                for item in &mut s.items {
                    item.scale.clear_pending();
                    item.scale.set_target(1.0);
                }
                if s.ripple.is_some_and(|r| r.generation == generation) {
                    s.ripple = None;
                }
            });
            debug!(origin, elapsed_ms, "ripple finished");
            if let Some(on_finished) = &task_args.on_ripple_finished {
                on_finished.call(origin);
            }
            return TickFlow::Done;
        }

        task_inner.with_mut(|s| {
            let dragged = s.drag.map(|d| d.original_index);
            for target in ripple_targets(&s.order, origin, elapsed_ms, &task_args.ripple) {
                if dragged == Some(target.original_index) {
                    continue;
                }
                let scale = &mut s.items[target.original_index].scale;
                if target.delay.is_zero() {
                    scale.set_target(target.scale);
                } else {
                    scale.set_target_at(target.scale, frame.now + target.delay);
                }
            }
        });
        TickFlow::Continue
    });

    inner.with_mut(|s| {
        s.ripple = Some(ActiveRipple {
            origin,
            generation,
            handle,
        });
    });
    debug!(origin, "ripple started");
}
