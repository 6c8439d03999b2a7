//! Drag-to-snap sockets joined by a [`Rope`].
//!
//! Two handles sit on the ends of a rope. Each handle can be dragged, but
//! never further from the other handle than the rope's slack. When it is let
//! go close to one of its side's sockets it snaps onto that socket;
//! otherwise it jumps back to where the drag started.
//!
//! ```
//! use sombrero_components::socket::{Side, SocketAnchor, SocketArgs, WireController};
//! use sombrero_components::rope::RopeArgs;
//! use sombrero_ui::{DragGesture, FrameClock, Point2D};
//!
//! let clock = FrameClock::new();
//! let wire = WireController::new(
//!     vec![
//!         SocketAnchor::measured("all audio", Point2D::new(100.0, 100.0)),
//!         SocketAnchor::measured("calls", Point2D::new(100.0, 160.0)),
//!     ],
//!     vec![SocketAnchor::measured("kitchen", Point2D::new(300.0, 160.0))],
//!     SocketArgs::default(),
//!     RopeArgs::default(),
//!     &clock,
//! );
//! wire.layout(0, 0).unwrap();
//!
//! let from = wire.endpoint(Side::Left);
//! wire.drag(Side::Left, &DragGesture::moving(Point2D::new(4.0, 55.0), from).starting());
//! wire.drag(Side::Left, &DragGesture::released(Point2D::new(4.0, 55.0), from));
//! assert_eq!(wire.endpoint(Side::Left), Point2D::new(100.0, 160.0));
//! ```

use std::time::Duration;

use derive_setters::Setters;
use sombrero_ui::{CallbackWith, DragGesture, FrameClock, Point2D, State, TaskHandle, TickFlow};
use tracing::{debug, trace};

use crate::rope::{Rope, RopeArgs, RopeError, SlackGeometry};

/// Which end of the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// The first endpoint.
    Left,
    /// The second endpoint.
    Right,
}

impl Side {
    /// Index into endpoint arrays.
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// The opposite end.
    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A socket a handle can snap onto.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SocketAnchor {
    /// Display label.
    pub label: String,
    /// Top-left corner of the socket, once laid out.
    pub origin: Option<Point2D>,
}

impl SocketAnchor {
    /// A socket that has not been measured yet.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            origin: None,
        }
    }

    /// A socket with a known position.
    pub fn measured(label: impl Into<String>, origin: Point2D) -> Self {
        Self {
            label: label.into(),
            origin: Some(origin),
        }
    }
}

/// Configuration for socket snapping.
#[derive(Debug, Clone, PartialEq, Setters)]
pub struct SocketArgs {
    /// A release snaps onto a socket when it is strictly closer than this on
    /// both axes.
    pub snap_tolerance: f32,
    /// Called with the side and socket index after a snap.
    #[setters(skip)]
    pub on_connect: Option<CallbackWith<(Side, usize)>>,
}

impl SocketArgs {
    /// Sets the connect handler.
    pub fn on_connect<F>(mut self, on_connect: F) -> Self
    where
        F: Fn((Side, usize)) + Send + Sync + 'static,
    {
        self.on_connect = Some(CallbackWith::new(on_connect));
        self
    }
}

impl Default for SocketArgs {
    fn default() -> Self {
        Self {
            snap_tolerance: 15.0,
            on_connect: None,
        }
    }
}

/// Finds the first measured anchor within `tolerance` of `point` on both
/// axes. Anchors are scanned in order; the first hit wins.
pub fn find_snap(
    anchors: &[SocketAnchor],
    point: Point2D,
    tolerance: f32,
) -> Option<(usize, Point2D)> {
    anchors.iter().enumerate().find_map(|(index, anchor)| {
        let origin = anchor.origin?;
        let hit =
            (point.x - origin.x).abs() < tolerance && (point.y - origin.y).abs() < tolerance;
        hit.then_some((index, origin))
    })
}

/// How a release ended.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SnapOutcome {
    /// The handle landed on the socket at `anchor_index`.
    Snapped {
        /// Index of the socket in its side's list.
        anchor_index: usize,
        /// Where the handle now sits.
        position: Point2D,
    },
    /// No socket was close enough; the handle went back.
    Reverted {
        /// Where the handle now sits.
        position: Point2D,
    },
}

impl SnapOutcome {
    /// Final handle position.
    pub fn position(&self) -> Point2D {
        match *self {
            SnapOutcome::Snapped { position, .. } | SnapOutcome::Reverted { position } => {
                position
            }
        }
    }
}

/// Drag state of one handle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SocketHandle {
    side: Side,
    position: Point2D,
    fallback: Point2D,
}

impl SocketHandle {
    /// A handle at the origin.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            position: Point2D::ZERO,
            fallback: Point2D::ZERO,
        }
    }

    /// Which end this handle is.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Current top-left position.
    pub fn position(&self) -> Point2D {
        self.position
    }

    /// Position restored by a release that does not snap.
    pub fn fallback(&self) -> Point2D {
        self.fallback
    }

    /// Places the handle without constraints.
    pub fn place(&mut self, position: Point2D) {
        self.position = position;
        self.fallback = position;
    }

    /// Remembers the current position as the fallback.
    pub fn begin(&mut self) {
        self.fallback = self.position;
    }

    /// Moves the handle towards `offset`, kept within `slack_length` of
    /// `partner`.
    pub fn drag_to(&mut self, offset: Point2D, partner: Point2D, slack_length: f32) -> Point2D {
        self.position = offset.clamp_within(slack_length, partner);
        self.position
    }

    /// Ends the drag at `offset`: snaps onto the first socket in range, or
    /// reverts to the fallback when none is.
    pub fn release(
        &mut self,
        offset: Point2D,
        anchors: &[SocketAnchor],
        tolerance: f32,
    ) -> SnapOutcome {
        match find_snap(anchors, offset, tolerance) {
            Some((anchor_index, position)) => {
                self.position = position;
                self.fallback = position;
                SnapOutcome::Snapped {
                    anchor_index,
                    position,
                }
            }
            None => {
                self.position = self.fallback;
                SnapOutcome::Reverted {
                    position: self.position,
                }
            }
        }
    }
}

/// Everything a host needs to draw the wire this frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WireFrame {
    /// Handle top-left positions, left first.
    pub endpoints: [Point2D; 2],
    /// Smoothed control point.
    pub control_point: Point2D,
    /// Target sag and control point.
    pub geometry: SlackGeometry,
    /// SVG path of the rope.
    pub path: String,
}

struct WireInner {
    handles: [SocketHandle; 2],
    anchors: [Vec<SocketAnchor>; 2],
    rope: Rope,
}

impl WireInner {
    fn endpoints(&self) -> [Point2D; 2] {
        self.handles.map(|h| h.position())
    }
}

/// Owns both handles, their sockets and the rope between them.
///
/// A persistent frame task steps the rope's control point spring; it is
/// cancelled when the controller is dropped.
pub struct WireController {
    args: SocketArgs,
    inner: State<WireInner>,
    clock: FrameClock,
    frame_task: TaskHandle,
}

impl WireController {
    /// Creates a wire with the given sockets. Nothing moves until
    /// [`WireController::layout`] measured the slack.
    pub fn new(
        left: Vec<SocketAnchor>,
        right: Vec<SocketAnchor>,
        args: SocketArgs,
        rope: RopeArgs,
        clock: &FrameClock,
    ) -> Self {
        let inner = State::new(WireInner {
            handles: [SocketHandle::new(Side::Left), SocketHandle::new(Side::Right)],
            anchors: [left, right],
            rope: Rope::new(rope),
        });
        let frame_task = {
            let inner = inner.clone();
            clock.schedule(move |frame| {
                inner.with_mut(|s| s.rope.step(frame.now));
                TickFlow::Continue
            })
        };
        Self {
            args,
            inner,
            clock: clock.clone(),
            frame_task,
        }
    }

    /// The configuration in use.
    pub fn args(&self) -> &SocketArgs {
        &self.args
    }

    /// Records the measured position of a socket.
    pub fn measure_anchor(&self, side: Side, index: usize, origin: Point2D) {
        self.inner.with_mut(|s| match s.anchors[side.index()].get_mut(index) {
            Some(anchor) => anchor.origin = Some(origin),
            None => debug!(?side, index, "measurement for unknown socket ignored"),
        });
    }

    /// Sockets of one side.
    pub fn anchors(&self, side: Side) -> Vec<SocketAnchor> {
        self.inner.with(|s| s.anchors[side.index()].clone())
    }

    /// Fixes the slack as the distance between the given rest sockets and
    /// puts each handle on its socket at once.
    ///
    /// Returns `Ok(false)` when either socket is not measured yet, or when
    /// the wire was already laid out.
    pub fn layout(&self, left_anchor: usize, right_anchor: usize) -> Result<bool, RopeError> {
        self.inner.with_mut(|s| {
            if s.rope.slack_length().is_some() {
                trace!("wire already laid out");
                return Ok(false);
            }
            let left = s.anchors[0].get(left_anchor).and_then(|a| a.origin);
            let right = s.anchors[1].get(right_anchor).and_then(|a| a.origin);
            let (Some(left), Some(right)) = (left, right) else {
                debug!(left_anchor, right_anchor, "rest sockets not measured yet");
                return Ok(false);
            };

            s.rope.set_slack_length(left.distance_to(right))?;
            s.handles[0].place(left);
            s.handles[1].place(right);
            s.rope.update([left, right], true);
            debug!(?left, ?right, "wire laid out");
            Ok(true)
        })
    }

    /// Slack measured by [`WireController::layout`].
    pub fn slack_length(&self) -> Option<f32> {
        self.inner.with(|s| s.rope.slack_length())
    }

    /// Top-left position of a handle.
    pub fn endpoint(&self, side: Side) -> Point2D {
        self.inner.with(|s| s.handles[side.index()].position())
    }

    /// Both handle positions, left first.
    pub fn endpoints(&self) -> [Point2D; 2] {
        self.inner.with(|s| s.endpoints())
    }

    /// Current smoothed control point of the rope.
    pub fn control_point(&self) -> Point2D {
        self.inner.with(|s| s.rope.control_point())
    }

    /// Whether the rope has settled.
    pub fn is_resting(&self) -> bool {
        self.inner.with(|s| s.rope.is_resting())
    }

    /// Snapshot for drawing.
    pub fn frame(&self) -> WireFrame {
        self.inner.with(|s| WireFrame {
            endpoints: s.endpoints(),
            control_point: s.rope.control_point(),
            geometry: s.rope.geometry(),
            path: s.rope.path_data(),
        })
    }

    /// Feeds one drag gesture step for the handle on `side`. Returns the
    /// outcome on release.
    ///
    /// Taps and gestures before [`WireController::layout`] are ignored.
    pub fn drag(&self, side: Side, gesture: &DragGesture) -> Option<SnapOutcome> {
        if gesture.tap {
            trace!(?side, "tap on handle ignored");
            return None;
        }
        let tolerance = self.args.snap_tolerance;
        let outcome = self.inner.with_mut(|s| {
            let Some(slack_length) = s.rope.slack_length() else {
                debug!(?side, "drag before layout ignored");
                return None;
            };
            let index = side.index();
            let partner = s.handles[side.other().index()].position();

            if gesture.first {
                s.handles[index].begin();
            }
            s.handles[index].drag_to(gesture.offset, partner, slack_length);

            let mut outcome = None;
            if gesture.last {
                let anchors = &s.anchors[index];
                outcome = Some(s.handles[index].release(gesture.offset, anchors, tolerance));
            }
            let endpoints = s.endpoints();
            s.rope.update(endpoints, false);
            outcome
        })?;

        match outcome {
            SnapOutcome::Snapped {
                anchor_index,
                position,
            } => {
                debug!(?side, anchor_index, ?position, "handle snapped");
                if let Some(on_connect) = &self.args.on_connect {
                    on_connect.call((side, anchor_index));
                }
            }
            SnapOutcome::Reverted { position } => {
                debug!(?side, ?position, "handle reverted");
            }
        }
        Some(outcome)
    }

    /// Steps the rope once outside the frame clock.
    pub fn step(&self, now: Duration) -> bool {
        self.inner.with_mut(|s| s.rope.step(now))
    }
}

impl Drop for WireController {
    fn drop(&mut self) {
        self.clock.cancel(self.frame_task);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use sombrero_ui::DragRecognizer;

    use super::*;

    fn anchor_at(x: f32, y: f32) -> SocketAnchor {
        SocketAnchor::measured("socket", Point2D::new(x, y))
    }

    #[test]
    fn snaps_exactly_within_tolerance() {
        let anchors = vec![anchor_at(100.0, 100.0)];
        let mut handle = SocketHandle::new(Side::Left);
        handle.place(Point2D::new(10.0, 10.0));
        handle.begin();

        let outcome = handle.release(Point2D::new(110.0, 90.0), &anchors, 15.0);
        assert_eq!(
            outcome,
            SnapOutcome::Snapped {
                anchor_index: 0,
                position: Point2D::new(100.0, 100.0)
            }
        );
        assert_eq!(handle.position(), Point2D::new(100.0, 100.0));
    }

    #[test]
    fn reverts_when_out_of_range() {
        let anchors = vec![anchor_at(100.0, 100.0)];
        let mut handle = SocketHandle::new(Side::Right);
        handle.place(Point2D::new(10.0, 10.0));
        handle.begin();
        handle.drag_to(Point2D::new(120.0, 100.0), Point2D::new(10.0, 10.0), 1_000.0);

        let outcome = handle.release(Point2D::new(120.0, 100.0), &anchors, 15.0);
        assert_eq!(
            outcome,
            SnapOutcome::Reverted {
                position: Point2D::new(10.0, 10.0)
            }
        );
        // Exactly on the tolerance is outside.
        assert!(find_snap(&anchors, Point2D::new(115.0, 100.0), 15.0).is_none());
    }

    #[test]
    fn scan_skips_unmeasured_and_takes_first_hit() {
        let anchors = vec![
            SocketAnchor::new("pending"),
            anchor_at(300.0, 300.0),
            anchor_at(104.0, 100.0),
            anchor_at(100.0, 100.0),
        ];
        // A far anchor early in the list does not stop the scan; the first
        // match wins over a closer later one.
        assert_eq!(
            find_snap(&anchors, Point2D::new(101.0, 100.0), 15.0),
            Some((2, Point2D::new(104.0, 100.0)))
        );
    }

    #[test]
    fn drag_is_limited_by_slack() {
        let mut handle = SocketHandle::new(Side::Left);
        let partner = Point2D::new(0.0, 0.0);
        let at = handle.drag_to(Point2D::new(0.0, 500.0), partner, 100.0);
        assert_eq!(at, Point2D::new(0.0, 100.0));
        let at = handle.drag_to(Point2D::new(30.0, 40.0), partner, 100.0);
        assert_eq!(at, Point2D::new(30.0, 40.0));
    }

    fn wire(clock: &FrameClock, args: SocketArgs) -> WireController {
        WireController::new(
            vec![
                anchor_at(100.0, 100.0),
                anchor_at(100.0, 160.0),
                anchor_at(100.0, 220.0),
            ],
            vec![
                anchor_at(400.0, 100.0),
                anchor_at(400.0, 160.0),
                anchor_at(400.0, 220.0),
                anchor_at(400.0, 280.0),
            ],
            args,
            RopeArgs::default(),
            clock,
        )
    }

    #[test]
    fn layout_measures_slack_once() {
        let clock = FrameClock::new();
        let wire = wire(&clock, SocketArgs::default());
        let early = DragGesture::moving(Point2D::new(5.0, 5.0), Point2D::ZERO).starting();
        assert!(wire.drag(Side::Left, &early).is_none());
        assert_eq!(wire.endpoint(Side::Left), Point2D::ZERO);

        assert_eq!(wire.layout(0, 3), Ok(true));
        // 300 across and 180 down.
        let slack = wire.slack_length().unwrap();
        assert!((slack - 349.857).abs() < 1e-2);
        assert_eq!(
            wire.endpoints(),
            [Point2D::new(100.0, 100.0), Point2D::new(400.0, 280.0)]
        );
        assert_eq!(wire.frame().geometry.sag, 0.0);

        assert_eq!(wire.layout(0, 0), Ok(false));
        assert_eq!(wire.slack_length(), Some(slack));
    }

    #[test]
    fn layout_waits_for_measurement() {
        let clock = FrameClock::new();
        let wire = WireController::new(
            vec![SocketAnchor::new("all audio")],
            vec![SocketAnchor::new("kitchen")],
            SocketArgs::default(),
            RopeArgs::default(),
            &clock,
        );
        assert_eq!(wire.layout(0, 0), Ok(false));
        wire.measure_anchor(Side::Left, 0, Point2D::new(0.0, 0.0));
        wire.measure_anchor(Side::Right, 0, Point2D::new(0.0, 0.0));
        assert_eq!(wire.layout(0, 0), Err(RopeError::InvalidSlackLength(0.0)));
        wire.measure_anchor(Side::Right, 0, Point2D::new(90.0, 0.0));
        assert_eq!(wire.layout(0, 0), Ok(true));
    }

    #[test]
    fn release_near_socket_connects() {
        let clock = FrameClock::new();
        let connected = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&connected);
        let args = SocketArgs::default().on_connect(move |event| sink.lock().push(event));
        let wire = wire(&clock, args);
        wire.layout(0, 3).unwrap();

        let from = wire.endpoint(Side::Left);
        let movement = Point2D::new(-6.0, 127.0);
        wire.drag(Side::Left, &DragGesture::moving(movement, from).starting());
        assert_eq!(wire.endpoint(Side::Left), Point2D::new(94.0, 227.0));
        // Closer handles leave more rope to sag.
        assert!(wire.frame().geometry.sag > 0.0);

        let outcome = wire.drag(Side::Left, &DragGesture::released(movement, from));
        assert_eq!(
            outcome,
            Some(SnapOutcome::Snapped {
                anchor_index: 2,
                position: Point2D::new(100.0, 220.0)
            })
        );
        assert_eq!(wire.endpoint(Side::Left), Point2D::new(100.0, 220.0));
        assert_eq!(connected.lock().as_slice(), &[(Side::Left, 2)]);
    }

    #[test]
    fn release_in_empty_space_reverts() {
        let clock = FrameClock::new();
        let wire = wire(&clock, SocketArgs::default());
        wire.layout(0, 3).unwrap();

        let from = wire.endpoint(Side::Right);
        let movement = Point2D::new(-150.0, -20.0);
        wire.drag(Side::Right, &DragGesture::moving(movement, from).starting());
        assert_eq!(wire.endpoint(Side::Right), Point2D::new(250.0, 260.0));

        let outcome = wire.drag(Side::Right, &DragGesture::released(movement, from));
        assert_eq!(
            outcome,
            Some(SnapOutcome::Reverted {
                position: Point2D::new(400.0, 280.0)
            })
        );
        assert_eq!(wire.endpoint(Side::Right), from);
    }

    #[test]
    fn flicked_handle_snaps_or_returns() {
        let clock = FrameClock::new();
        let wire = wire(&clock, SocketArgs::default());
        wire.layout(0, 3).unwrap();

        // A flick into empty space goes back to the socket it left.
        let start = wire.endpoint(Side::Left);
        let mut pointer = DragRecognizer::default();
        let press_at = start.offset(16.0, 16.0);
        pointer.press(press_at, start);
        let flick = pointer.release(press_at.offset(80.0, 30.0)).unwrap();
        assert!(flick.first && flick.last && !flick.tap);
        assert!(matches!(
            wire.drag(Side::Left, &flick),
            Some(SnapOutcome::Reverted { .. })
        ));
        assert_eq!(wire.endpoint(Side::Left), start);

        // A flick onto the next socket plugs in.
        pointer.press(press_at, start);
        let flick = pointer.release(press_at.offset(2.0, 62.0)).unwrap();
        assert_eq!(
            wire.drag(Side::Left, &flick),
            Some(SnapOutcome::Snapped {
                anchor_index: 1,
                position: Point2D::new(100.0, 160.0)
            })
        );
    }

    #[test]
    fn rope_settles_through_frame_clock() {
        let clock = FrameClock::new();
        let wire = wire(&clock, SocketArgs::default());
        wire.layout(0, 3).unwrap();
        clock.advance(Duration::ZERO);

        let from = wire.endpoint(Side::Left);
        let movement = Point2D::new(200.0, 150.0);
        wire.drag(Side::Left, &DragGesture::moving(movement, from).starting());
        assert!(!wire.is_resting());

        let mut t = 16;
        while t <= 8_000 {
            clock.advance(Duration::from_millis(t));
            t += 16;
        }
        assert!(wire.is_resting());
        assert_eq!(wire.control_point(), wire.frame().geometry.control_point);

        drop(wire);
        assert_eq!(clock.task_count(), 0);
    }
}
