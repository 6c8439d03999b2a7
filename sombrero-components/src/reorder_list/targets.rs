use super::{OrderedIndexList, ReorderListArgs};

/// Snapshot of the drag gesture as the target function sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DragState {
    /// The pointer is down on the item.
    pub active: bool,
    /// Identity of the dragged item.
    pub original_index: usize,
    /// Slot the item occupied when this gesture step was computed.
    pub current_slot: usize,
    /// Vertical pointer movement since the press.
    pub vertical_delta: f32,
    /// This is the release step.
    pub last: bool,
}

/// Which fields of a target skip the spring and apply at once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImmediateFields {
    /// Vertical position.
    pub y: bool,
    /// Scale.
    pub scale: bool,
    /// Stacking order.
    pub z_index: bool,
}

impl ImmediateFields {
    /// Everything is smoothed.
    pub const NONE: Self = Self {
        y: false,
        scale: false,
        z_index: false,
    };
}

/// Fires once when an animated position comes within `threshold` of the
/// position it is heading to.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SettleWatcher {
    original_index: usize,
    target_y: f32,
    threshold: f32,
    fired: bool,
}

impl SettleWatcher {
    /// Watches `original_index` settling on `target_y`.
    pub fn new(original_index: usize, target_y: f32, threshold: f32) -> Self {
        Self {
            original_index,
            target_y,
            threshold,
            fired: false,
        }
    }

    /// Item being watched.
    pub fn original_index(&self) -> usize {
        self.original_index
    }

    /// Position the item is settling on.
    pub fn target_y(&self) -> f32 {
        self.target_y
    }

    /// Whether the watcher already fired.
    pub fn fired(&self) -> bool {
        self.fired
    }

    /// Feeds the current animated position. Returns `true` exactly once: on
    /// the first observation that lands inside the threshold.
    pub fn observe(&mut self, y: f32) -> bool {
        if self.fired || (self.target_y - y).abs() >= self.threshold {
            return false;
        }
        self.fired = true;
        true
    }
}

/// What one item should animate towards this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnimationTarget {
    /// Vertical offset from the top of the list.
    pub y: f32,
    /// Scale factor.
    pub scale: f32,
    /// Stacking order; the dragged item sits in front.
    pub z_index: i32,
    /// Fields that bypass smoothing.
    pub immediate: ImmediateFields,
    /// Present only for the item that was just released.
    pub settle: Option<SettleWatcher>,
}

/// Computes the target for every item, indexed by original index.
///
/// - the actively dragged item follows the pointer exactly and is emphasized
/// - every other item eases towards `slot * item_height`
/// - the item being released eases the same way and carries a
///   [`SettleWatcher`]
pub fn animation_targets(
    order: &OrderedIndexList,
    drag: Option<&DragState>,
    args: &ReorderListArgs,
) -> Vec<AnimationTarget> {
    let mut targets = vec![resting_target(0, args); order.len()];
    for (slot, &original) in order.as_slice().iter().enumerate() {
        targets[original] = item_target(original, slot, drag, args);
    }
    targets
}

fn resting_target(slot: usize, args: &ReorderListArgs) -> AnimationTarget {
    AnimationTarget {
        y: slot as f32 * args.item_height,
        scale: 1.0,
        z_index: 0,
        immediate: ImmediateFields::NONE,
        settle: None,
    }
}

fn item_target(
    original: usize,
    slot: usize,
    drag: Option<&DragState>,
    args: &ReorderListArgs,
) -> AnimationTarget {
    let Some(drag) = drag.filter(|d| d.original_index == original) else {
        return resting_target(slot, args);
    };

    if drag.active {
        return AnimationTarget {
            y: drag.current_slot as f32 * args.item_height + drag.vertical_delta,
            scale: args.drag_scale,
            z_index: 1,
            immediate: ImmediateFields {
                y: true,
                scale: false,
                z_index: true,
            },
            settle: None,
        };
    }

    let mut target = resting_target(slot, args);
    if drag.last {
        target.settle = Some(SettleWatcher::new(
            original,
            target.y,
            args.settle_threshold,
        ));
    }
    target
}
