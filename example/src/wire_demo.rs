use anyhow::Context;
use sombrero_components::{
    rope::RopeArgs,
    socket::{Side, SnapOutcome, SocketAnchor, SocketArgs, WireController},
};
use sombrero_ui::{DragRecognizer, Point2D};
use tracing::info;

use crate::Simulation;

const LEFT_SOCKETS: [&str; 3] = ["all audio", "this app", "calls"];
const RIGHT_SOCKETS: [&str; 4] = [
    "iPhone speaker",
    "george's AirPods",
    "kitchen",
    "other devices",
];

/// Two columns of sockets, 300 units apart with a 60 unit row pitch.
fn sockets(labels: &[&str], x: f32) -> Vec<SocketAnchor> {
    labels
        .iter()
        .enumerate()
        .map(|(row, label)| {
            SocketAnchor::measured(*label, Point2D::new(x, 100.0 + 60.0 * row as f32))
        })
        .collect()
}

fn drag_handle(
    sim: &mut Simulation,
    wire: &WireController,
    side: Side,
    to: Point2D,
) -> anyhow::Result<Option<SnapOutcome>> {
    let from = wire.endpoint(side);
    let half = RopeArgs::default().handle_size / 2.0;
    let press_at = from.offset(half, half);
    let mut pointer = DragRecognizer::default();
    pointer.press(press_at, from);
    for step in 1..=10u8 {
        let at = press_at + (to - from) * (f32::from(step) / 10.0);
        if let Some(gesture) = pointer.move_to(at) {
            wire.drag(side, &gesture);
        }
        sim.tick(|| wire.frame())?;
    }
    let gesture = pointer
        .release(press_at + (to - from))
        .context("pointer was pressed")?;
    Ok(wire.drag(side, &gesture))
}

/// Lays the wire out between the top-left and bottom-right sockets, plugs
/// the left end into "this app", then drops the right end in empty space.
/// Returns the final handle positions.
pub(crate) fn run(sim: &mut Simulation, frames: u64) -> anyhow::Result<[Point2D; 2]> {
    let left = sockets(&LEFT_SOCKETS, 100.0);
    let right = sockets(&RIGHT_SOCKETS, 400.0);
    let args = SocketArgs::default().on_connect(|(side, index)| {
        let label = match side {
            Side::Left => LEFT_SOCKETS[index],
            Side::Right => RIGHT_SOCKETS[index],
        };
        info!(?side, socket = label, "connected");
    });
    let wire = WireController::new(left, right, args, RopeArgs::default(), sim.clock());
    let laid_out = wire.layout(0, RIGHT_SOCKETS.len() - 1)?;
    anyhow::ensure!(laid_out, "sockets were not measured");
    info!(slack = ?wire.slack_length(), "wire laid out");
    sim.run(frames / 3, || wire.frame())?;

    let outcome = drag_handle(sim, &wire, Side::Left, Point2D::new(103.0, 164.0))?;
    info!(?outcome, "left handle released");
    anyhow::ensure!(
        matches!(outcome, Some(SnapOutcome::Snapped { anchor_index: 1, .. })),
        "left handle did not plug into the second socket"
    );
    sim.run(frames, || wire.frame())?;

    let before = wire.endpoint(Side::Right);
    let outcome = drag_handle(sim, &wire, Side::Right, Point2D::new(250.0, 200.0))?;
    info!(?outcome, "right handle released");
    anyhow::ensure!(
        wire.endpoint(Side::Right) == before,
        "right handle did not return to its socket"
    );
    sim.run(frames, || wire.frame())?;

    info!(path = %wire.frame().path, resting = wire.is_resting(), "rope");
    Ok(wire.endpoints())
}
