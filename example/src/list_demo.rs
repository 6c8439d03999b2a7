use anyhow::Context;
use sombrero_components::reorder_list::{ReorderListArgs, ReorderListController};
use sombrero_ui::{DragRecognizer, Point2D};
use tracing::{debug, info, warn};

use crate::Simulation;

const ITEMS: [&str; 8] = [
    "🥝 Groceries",
    "🍿 Netflix Watchlist",
    "👉 Follow-ups",
    "⏲️ Reminders",
    "🌟 Design Inspirations",
    "🧢 < 10 mins tasks",
    "📨 Work stuff",
    "🦦 Past time",
];

/// Drags the first row down three slots, lets the ripple play out, then taps
/// a row. Returns the final order.
pub(crate) fn run(sim: &mut Simulation, frames: u64) -> anyhow::Result<Vec<usize>> {
    let args = ReorderListArgs::default()
        .on_reorder(|order| info!(?order, "order committed"))
        .on_settle(|original| debug!(item = ITEMS[original], "dropped row settled"))
        .on_ripple_finished(|origin| info!(item = ITEMS[origin], "ripple finished"));
    let list = ReorderListController::new(ITEMS.len(), args, sim.clock())?;
    let h = list.args().item_height;
    sim.tick(|| list.frames())?;

    // Grab the middle of the first row and pull it down, releasing a bit
    // short of the third slot below.
    let mut pointer = DragRecognizer::default();
    let press_at = Point2D::new(120.0, h / 2.0);
    let travel = 2.8 * h;
    pointer.press(press_at, Point2D::ZERO);
    for step in 1..=12u8 {
        let at = press_at.offset(0.0, travel * f32::from(step) / 12.0);
        if let Some(gesture) = pointer.move_to(at) {
            list.handle_drag(0, &gesture);
        }
        sim.tick(|| list.frames())?;
    }
    if let Some(gesture) = pointer.release(press_at.offset(0.0, travel)) {
        list.handle_drag(0, &gesture);
    }
    info!(at_ms = sim.now().as_millis(), "row released");
    sim.run(frames, || list.frames())?;

    // A tap must leave the order alone.
    let before = list.order();
    let tapped = before.get(2).context("list has a third slot")?;
    let tap_at = Point2D::new(120.0, 2.5 * h);
    pointer.press(tap_at, Point2D::new(0.0, 2.0 * h));
    pointer.move_to(tap_at.offset(1.0, 1.0));
    if let Some(gesture) = pointer.release(tap_at.offset(1.0, 1.0)) {
        list.handle_drag(tapped, &gesture);
    }
    sim.run(2, || list.frames())?;
    anyhow::ensure!(list.order() == before, "a tap reordered the list");

    for frame in list.frames() {
        debug!(
            item = ITEMS[frame.original_index],
            slot = frame.slot,
            y = frame.y,
            scale = frame.scale,
            "row at rest"
        );
    }
    if list.is_rippling() {
        warn!(frames, "ripple still running; raise --frames to see it finish");
    }
    Ok(list.order().as_slice().to_vec())
}
