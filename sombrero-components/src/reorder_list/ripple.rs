use std::{f32::consts::PI, time::Duration};

use derive_setters::Setters;
use sombrero_ui::numeric::remap;

use super::OrderedIndexList;

/// Tuning for the post-drop ripple.
#[derive(Debug, Clone, Copy, PartialEq, Setters)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RippleArgs {
    /// Largest scale deviation from 1; also the intensity domain bound.
    pub max_deviation: f32,
    /// Angular speed of the wave in radians per second.
    pub frequency: f32,
    /// How long the ripple runs before every scale is forced back to 1.
    pub duration: Duration,
    /// Start delay added per slot of distance from the dropped item.
    pub delay_per_slot: Duration,
}

impl Default for RippleArgs {
    fn default() -> Self {
        Self {
            max_deviation: 0.217,
            frequency: 30.0,
            duration: Duration::from_millis(500),
            delay_per_slot: Duration::from_millis(10),
        }
    }
}

/// Phase of the wave for an item `far_index` slots from the origin.
pub fn ripple_phase(far_index: usize, elapsed_ms: f32, frequency: f32) -> f32 {
    PI + far_index as f32 * PI + elapsed_ms / 1000.0 * frequency
}

/// `sin(φ) / φ`: oscillates and decays both with time and with distance.
pub fn ripple_intensity(far_index: usize, elapsed_ms: f32, frequency: f32) -> f32 {
    let phase = ripple_phase(far_index, elapsed_ms, frequency);
    phase.sin() / phase
}

/// Maps an intensity in `[-d, d]` onto a scale in `[1 - d, 1 + d]`.
pub fn ripple_scale(intensity: f32, max_deviation: f32) -> f32 {
    remap(
        (-max_deviation, max_deviation),
        (1.0 - max_deviation, 1.0 + max_deviation),
        intensity,
    )
}

/// Scale target for one item during a ripple tick.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RippleTarget {
    /// Identity of the item.
    pub original_index: usize,
    /// Slot distance from the ripple origin.
    pub far_index: usize,
    /// Scale to animate towards.
    pub scale: f32,
    /// Delay before the scale target takes effect.
    pub delay: Duration,
}

/// Computes every item's ripple target from the live order. Returns an empty
/// list if `origin` is not part of `order`.
pub fn ripple_targets(
    order: &OrderedIndexList,
    origin: usize,
    elapsed_ms: f32,
    args: &RippleArgs,
) -> Vec<RippleTarget> {
    let Some(origin_slot) = order.position(origin) else {
        return Vec::new();
    };

    order
        .as_slice()
        .iter()
        .enumerate()
        .map(|(slot, &original_index)| {
            let far_index = slot.abs_diff(origin_slot);
            let intensity = ripple_intensity(far_index, elapsed_ms, args.frequency);
            RippleTarget {
                original_index,
                far_index,
                scale: ripple_scale(intensity, args.max_deviation),
                delay: args.delay_per_slot * far_index as u32,
            }
        })
        .collect()
}

/// Timeline of one running ripple.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RippleState {
    origin: usize,
    start: Option<Duration>,
    elapsed_ms: f32,
}

impl RippleState {
    /// A ripple anchored at `origin` that has not ticked yet.
    pub fn new(origin: usize) -> Self {
        Self {
            origin,
            start: None,
            elapsed_ms: 0.0,
        }
    }

    /// Item the ripple spreads from.
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Whole milliseconds elapsed at the last tick.
    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    /// Records a tick at frame time `now`. The first tick fixes the start
    /// time, so scheduling latency before it does not eat into the wave.
    pub fn advance(&mut self, now: Duration) -> f32 {
        let start = *self.start.get_or_insert(now);
        let elapsed = now.saturating_sub(start);
        self.elapsed_ms = (elapsed.as_secs_f64() * 1000.0).round() as f32;
        self.elapsed_ms
    }

    /// Whether the ripple has run its course.
    pub fn is_finished(&self, args: &RippleArgs) -> bool {
        self.start.is_some() && self.elapsed_ms >= args.duration.as_secs_f32() * 1000.0
    }
}
