//! Pointer drag recognition.
//!
//! [`DragRecognizer`] turns raw press / move / release input into
//! [`DragGesture`] snapshots carrying the phase flags and accumulated
//! movement the drag controllers consume.
//!
//! Small pointer jitter is filtered: nothing is reported until the pointer
//! has travelled further than [`DragConfig::tap_threshold`] from the press
//! point. A release before that reports a single gesture with `tap = true`,
//! which controllers treat as "not a drag".
//!
//! ```
//! use sombrero_ui::{geometry::Point2D, gesture::DragRecognizer};
//!
//! let mut drag = DragRecognizer::default();
//! assert!(drag.press(Point2D::new(10.0, 10.0), Point2D::ZERO).is_none());
//! let started = drag.move_to(Point2D::new(10.0, 30.0)).unwrap();
//! assert!(started.first && started.active);
//! assert_eq!(started.movement, Point2D::new(0.0, 20.0));
//!
//! let ended = drag.release(Point2D::new(10.0, 40.0)).unwrap();
//! assert!(ended.last && !ended.active && !ended.tap);
//! ```

use tracing::trace;

use crate::geometry::Point2D;

/// Configuration for drag recognition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// Movement (in logical units) the pointer must exceed before a press
    /// becomes a drag.
    pub tap_threshold: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self { tap_threshold: 3.0 }
    }
}

/// One step of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragGesture {
    /// First report of this gesture.
    pub first: bool,
    /// The pointer is still down.
    pub active: bool,
    /// Final report of this gesture.
    pub last: bool,
    /// Pointer displacement since the press.
    pub movement: Point2D,
    /// `from + movement`: where the dragged thing should be.
    pub offset: Point2D,
    /// The pointer was released without ever exceeding the tap threshold.
    pub tap: bool,
}

impl DragGesture {
    /// A synthetic in-progress gesture; handy for driving controllers directly.
    pub fn moving(movement: Point2D, from: Point2D) -> Self {
        Self {
            first: false,
            active: true,
            last: false,
            movement,
            offset: from + movement,
            tap: false,
        }
    }

    /// A synthetic release gesture.
    pub fn released(movement: Point2D, from: Point2D) -> Self {
        Self {
            active: false,
            last: true,
            ..Self::moving(movement, from)
        }
    }

    /// Marks the gesture as the first of its sequence.
    pub fn starting(mut self) -> Self {
        self.first = true;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    press_at: Point2D,
    from: Point2D,
    movement: Point2D,
    intentional: bool,
}

/// Stateful recognizer for a single pointer.
#[derive(Debug, Clone, Default)]
pub struct DragRecognizer {
    config: DragConfig,
    session: Option<DragSession>,
}

impl DragRecognizer {
    /// Creates a recognizer with the given config.
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Whether a press is currently being tracked.
    pub fn is_pressed(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the current press has turned into a drag.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some_and(|s| s.intentional)
    }

    /// Starts tracking a press at `pointer`. `from` is the dragged object's
    /// position at press time, used to compute [`DragGesture::offset`].
    ///
    /// With a zero threshold the drag starts immediately.
    pub fn press(&mut self, pointer: Point2D, from: Point2D) -> Option<DragGesture> {
        let intentional = self.config.tap_threshold <= 0.0;
        self.session = Some(DragSession {
            press_at: pointer,
            from,
            movement: Point2D::ZERO,
            intentional,
        });
        intentional.then(|| DragGesture::moving(Point2D::ZERO, from).starting())
    }

    /// Reports pointer movement. Returns `None` while no press is tracked or
    /// the movement is still under the tap threshold.
    pub fn move_to(&mut self, pointer: Point2D) -> Option<DragGesture> {
        let threshold = self.config.tap_threshold;
        let session = self.session.as_mut()?;
        session.movement = pointer - session.press_at;

        let first = if session.intentional {
            false
        } else if session.movement.distance_to(Point2D::ZERO) > threshold {
            session.intentional = true;
            trace!(movement = ?session.movement, "drag started");
            true
        } else {
            return None;
        };

        let gesture = DragGesture::moving(session.movement, session.from);
        Some(if first { gesture.starting() } else { gesture })
    }

    /// Ends the press at `pointer`.
    pub fn release(&mut self, pointer: Point2D) -> Option<DragGesture> {
        let mut session = self.session.take()?;
        session.movement = pointer - session.press_at;
        let was_intentional = session.intentional;
        if !was_intentional
            && session.movement.distance_to(Point2D::ZERO) > self.config.tap_threshold
        {
            // Released after a single jump past the threshold.
            session.intentional = true;
        }

        let mut gesture = DragGesture::released(session.movement, session.from);
        if !was_intentional {
            // Nothing was reported for this press yet: this is both ends.
            gesture.first = true;
        }
        if !session.intentional {
            gesture.tap = true;
            trace!("press released as tap");
        }
        Some(gesture)
    }

    /// Aborts the press where the pointer last was, as if released there.
    pub fn cancel(&mut self) -> Option<DragGesture> {
        let session = self.session?;
        self.release(session.press_at + session.movement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_movements_are_filtered() {
        let mut drag = DragRecognizer::default();
        drag.press(Point2D::new(0.0, 0.0), Point2D::ZERO);
        assert!(drag.move_to(Point2D::new(1.0, 2.0)).is_none());
        assert!(!drag.is_dragging());
        let released = drag.release(Point2D::new(2.0, 0.0)).unwrap();
        assert!(released.tap);
        assert!(released.last);
        assert!(!drag.is_pressed());
    }

    #[test]
    fn movement_beyond_threshold_starts_drag_once() {
        let mut drag = DragRecognizer::default();
        drag.press(Point2D::new(5.0, 5.0), Point2D::new(100.0, 100.0));
        let first = drag.move_to(Point2D::new(5.0, 15.0)).unwrap();
        assert!(first.first);
        assert_eq!(first.offset, Point2D::new(100.0, 110.0));

        let second = drag.move_to(Point2D::new(8.0, 25.0)).unwrap();
        assert!(!second.first);
        assert_eq!(second.movement, Point2D::new(3.0, 20.0));

        let released = drag.release(Point2D::new(8.0, 30.0)).unwrap();
        assert!(!released.first && released.last && !released.tap);
    }

    #[test]
    fn release_after_jump_is_not_a_tap() {
        let mut drag = DragRecognizer::default();
        drag.press(Point2D::ZERO, Point2D::ZERO);
        let released = drag.release(Point2D::new(0.0, 50.0)).unwrap();
        assert!(!released.tap);
        assert!(released.first && released.last);
        assert_eq!(released.movement, Point2D::new(0.0, 50.0));
    }

    #[test]
    fn zero_threshold_starts_on_press() {
        let mut drag = DragRecognizer::new(DragConfig { tap_threshold: 0.0 });
        let pressed = drag.press(Point2D::ZERO, Point2D::new(1.0, 1.0)).unwrap();
        assert!(pressed.first && pressed.active);
    }

    #[test]
    fn cancel_releases_at_last_position() {
        let mut drag = DragRecognizer::default();
        drag.press(Point2D::ZERO, Point2D::ZERO);
        drag.move_to(Point2D::new(0.0, 30.0));
        let cancelled = drag.cancel().unwrap();
        assert!(cancelled.last);
        assert_eq!(cancelled.movement, Point2D::new(0.0, 30.0));
        assert!(drag.cancel().is_none());
    }

    #[test]
    fn events_without_press_are_ignored() {
        let mut drag = DragRecognizer::default();
        assert!(drag.move_to(Point2D::new(10.0, 10.0)).is_none());
        assert!(drag.release(Point2D::new(10.0, 10.0)).is_none());
    }
}
