//! A rope hanging between two draggable handles.
//!
//! The rope is drawn as a quadratic Bézier from one handle center to the
//! other. Its control point sits at the midpoint of the handles, pushed down
//! by the *sag*: how much of the rope's slack is not taken up by the distance
//! between the handles.
//!
//! ```
//! use sombrero_components::rope::{slack_decline, slack_geometry};
//! use sombrero_ui::Point2D;
//!
//! let a = Point2D::new(0.0, 0.0);
//! let b = Point2D::new(60.0, 80.0);
//! assert_eq!(slack_decline(a, b, 150.0), 50.0);
//! assert_eq!(slack_decline(a, b, 90.0), 0.0);
//!
//! let geometry = slack_geometry(a, b, 150.0);
//! assert_eq!(geometry.control_point, Point2D::new(30.0, 90.0));
//! ```

use std::time::Duration;

use derive_setters::Setters;
use sombrero_ui::{AnimatedValue, Point2D, SpringConfig, numeric::clamp};
use thiserror::Error;
use tracing::{debug, trace};

/// How far the rope sags between `p1` and `p2` with `slack_length` of rope.
///
/// Always within `[0, slack_length]`: the full slack when the points meet,
/// nothing once they are at least `slack_length` apart.
pub fn slack_decline(p1: Point2D, p2: Point2D, slack_length: f32) -> f32 {
    clamp(0.0, slack_length, slack_length - p1.distance_to(p2))
}

/// Sag and Bézier control point of a rope between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SlackGeometry {
    /// Downward displacement of the midpoint.
    pub sag: f32,
    /// Control point of the quadratic curve.
    pub control_point: Point2D,
}

/// Computes the sag and control point for a rope between `p1` and `p2`.
pub fn slack_geometry(p1: Point2D, p2: Point2D, slack_length: f32) -> SlackGeometry {
    let sag = slack_decline(p1, p2, slack_length);
    SlackGeometry {
        sag,
        control_point: p1.midpoint(p2).offset(0.0, sag),
    }
}

/// Errors raised while configuring a [`Rope`].
#[derive(Debug, Error, PartialEq)]
pub enum RopeError {
    /// The measured slack cannot describe a rope.
    #[error("slack length must be finite and positive, got {0}")]
    InvalidSlackLength(f32),
}

/// Configuration for [`Rope`].
#[derive(Debug, Clone, Copy, PartialEq, Setters)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RopeArgs {
    /// Edge length of the square handles; the rope attaches to their centers.
    pub handle_size: f32,
    /// Spring smoothing the control point.
    pub spring: SpringConfig,
}

impl Default for RopeArgs {
    fn default() -> Self {
        Self {
            handle_size: 32.0,
            spring: SpringConfig::from_frequency(0.4, 0.4),
        }
    }
}

/// Rope state between two handles.
///
/// Endpoints are the handles' top-left corners as laid out by the host. The
/// slack is measured once; until then every update is ignored.
#[derive(Debug, Clone)]
pub struct Rope {
    args: RopeArgs,
    endpoints: [Point2D; 2],
    slack_length: Option<f32>,
    geometry: SlackGeometry,
    control_x: AnimatedValue,
    control_y: AnimatedValue,
}

impl Rope {
    /// Creates a rope with both handles at the origin and no slack measured.
    pub fn new(args: RopeArgs) -> Self {
        let half = args.handle_size / 2.0;
        Self {
            args,
            endpoints: [Point2D::ZERO; 2],
            slack_length: None,
            geometry: SlackGeometry {
                sag: 0.0,
                control_point: Point2D::new(half, half),
            },
            control_x: AnimatedValue::new(half, args.spring),
            control_y: AnimatedValue::new(half, args.spring),
        }
    }

    /// The configuration in use.
    pub fn args(&self) -> &RopeArgs {
        &self.args
    }

    /// The measured slack, if any.
    pub fn slack_length(&self) -> Option<f32> {
        self.slack_length
    }

    /// Records the slack length. Only the first valid measurement sticks;
    /// returns whether this call set it.
    pub fn set_slack_length(&mut self, slack_length: f32) -> Result<bool, RopeError> {
        if !slack_length.is_finite() || slack_length <= 0.0 {
            return Err(RopeError::InvalidSlackLength(slack_length));
        }
        if let Some(existing) = self.slack_length {
            trace!(existing, ignored = slack_length, "slack already measured");
            return Ok(false);
        }
        debug!(slack_length, "rope slack measured");
        self.slack_length = Some(slack_length);
        Ok(true)
    }

    /// Handle top-left positions.
    pub fn endpoints(&self) -> [Point2D; 2] {
        self.endpoints
    }

    /// Curve endpoints: the handle centers.
    pub fn anchors(&self) -> [Point2D; 2] {
        let half = self.args.handle_size / 2.0;
        self.endpoints.map(|p| p.offset(half, half))
    }

    /// Geometry the control point is heading to.
    pub fn geometry(&self) -> SlackGeometry {
        self.geometry
    }

    /// Current smoothed control point.
    pub fn control_point(&self) -> Point2D {
        Point2D::new(self.control_x.value(), self.control_y.value())
    }

    /// Moves the handles and retargets the control point. With `immediate`
    /// the control point jumps instead of easing.
    ///
    /// Returns `false` without changing anything while the slack is unknown.
    pub fn update(&mut self, endpoints: [Point2D; 2], immediate: bool) -> bool {
        let Some(slack_length) = self.slack_length else {
            debug!("rope update before slack measurement ignored");
            return false;
        };
        self.endpoints = endpoints;
        let [a, b] = self.anchors();
        self.geometry = slack_geometry(a, b, slack_length);

        let Point2D { x, y } = self.geometry.control_point;
        if immediate {
            self.control_x.jump_to(x);
            self.control_y.jump_to(y);
        } else {
            self.control_x.set_target(x);
            self.control_y.set_target(y);
        }
        trace!(sag = self.geometry.sag, x, y, immediate, "rope retargeted");
        true
    }

    /// Advances the control point spring. Returns whether it is still moving.
    pub fn step(&mut self, now: Duration) -> bool {
        let moving_x = self.control_x.step(now);
        let moving_y = self.control_y.step(now);
        moving_x || moving_y
    }

    /// Whether the control point rests on its target.
    pub fn is_resting(&self) -> bool {
        self.control_x.is_resting() && self.control_y.is_resting()
    }

    /// SVG path data for the current curve: `M x0 y0 Q cx cy x1 y1`.
    pub fn path_data(&self) -> String {
        let [a, b] = self.anchors();
        let c = self.control_point();
        format!("M {} {} Q {} {} {} {}", a.x, a.y, c.x, c.y, b.x, b.y)
    }

    /// Point on the current curve at parameter `t` (clamped to `[0, 1]`).
    pub fn point_at(&self, t: f32) -> Point2D {
        let t = clamp(0.0, 1.0, t);
        let [a, b] = self.anchors();
        let c = self.control_point();
        let u = 1.0 - t;
        a * (u * u) + c * (2.0 * u * t) + b * (t * t)
    }
}
