//! Spring interpolation for animated scalar values.
//!
//! [`AnimatedValue`] chases a target with a damped spring, integrated in 1 ms
//! sub-steps so the motion does not depend on the frame rate. Targets may be
//! applied immediately, smoothed, or queued to take effect at a later frame
//! time (the per-item start delay used by the ripple).
//!
//! ## Spring Parameters
//!
//! | field | default | meaning |
//! |-------|---------|---------|
//! | tension | 170 | spring stiffness |
//! | friction | 26 | damping force |
//! | mass | 1 | inertia |
//! | precision | 0.01 | distance under which the value rests |
//!
//! [`SpringConfig::from_frequency`] derives tension and friction from a
//! natural period (seconds) and a damping ratio:
//!
//! ```text
//! tension  = (2π / frequency)² · mass
//! friction = 4π · damping · mass / frequency
//! ```

use std::{collections::VecDeque, f32::consts::PI, time::Duration};

/// Physical parameters of a spring.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringConfig {
    /// Spring stiffness.
    pub tension: f32,
    /// Damping force coefficient.
    pub friction: f32,
    /// Inertia of the animated value.
    pub mass: f32,
    /// Distance to the target under which the value is considered at rest.
    pub precision: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            tension: 170.0,
            friction: 26.0,
            mass: 1.0,
            precision: 0.01,
        }
    }
}

impl SpringConfig {
    /// Builds a config from a natural period in seconds and a damping ratio.
    ///
    /// Non-positive frequencies fall back to the default config.
    pub fn from_frequency(frequency: f32, damping_ratio: f32) -> Self {
        if !(frequency > 0.0) {
            return Self::default();
        }
        let mass = 1.0;
        Self {
            tension: (2.0 * PI / frequency).powi(2) * mass,
            friction: 4.0 * PI * damping_ratio * mass / frequency,
            mass,
            ..Self::default()
        }
    }

    fn rest_velocity(&self) -> f32 {
        self.precision / 10.0
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTarget {
    apply_at: Duration,
    target: f32,
}

/// A scalar driven towards its target by a spring.
#[derive(Debug, Clone)]
pub struct AnimatedValue {
    value: f32,
    /// Units per millisecond.
    velocity: f32,
    target: f32,
    config: SpringConfig,
    pending: VecDeque<PendingTarget>,
    last_step: Option<Duration>,
}

impl AnimatedValue {
    /// Creates a value resting at `value`.
    pub fn new(value: f32, config: SpringConfig) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            config,
            pending: VecDeque::new(),
            last_step: None,
        }
    }

    /// Current interpolated value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current target.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Current velocity in units per second.
    pub fn velocity(&self) -> f32 {
        self.velocity * 1000.0
    }

    /// The spring parameters in use.
    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Sets a new target to be approached smoothly.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Queues `target` to replace the current target once a step reaches
    /// `apply_at`.
    pub fn set_target_at(&mut self, target: f32, apply_at: Duration) {
        self.pending.push_back(PendingTarget { apply_at, target });
    }

    /// Sets both value and target, discarding any motion.
    pub fn jump_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Drops every queued target.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Number of queued targets not yet applied.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the value sits on its target with no queued work.
    pub fn is_resting(&self) -> bool {
        self.pending.is_empty()
            && self.velocity.abs() <= self.config.rest_velocity()
            && (self.target - self.value).abs() <= self.config.precision
    }

    /// Advances the spring to frame time `now`. Returns whether the value is
    /// still animating afterwards.
    pub fn step(&mut self, now: Duration) -> bool {
        while let Some(pending) = self.pending.front().copied() {
            if pending.apply_at > now {
                break;
            }
            self.target = pending.target;
            self.pending.pop_front();
        }

        let elapsed = self
            .last_step
            .map(|last| now.saturating_sub(last))
            .unwrap_or_default();
        self.last_step = Some(now);

        let steps = elapsed.as_secs_f64() * 1000.0;
        let steps = steps.ceil() as u64;
        let SpringConfig {
            tension,
            friction,
            mass,
            precision,
        } = self.config;
        let rest_velocity = self.config.rest_velocity();
        let mass = if mass > 0.0 { mass } else { 1.0 };

        for _ in 0..steps {
            if self.velocity.abs() <= rest_velocity
                && (self.target - self.value).abs() <= precision
            {
                break;
            }
            let spring_force = -tension * 0.000_001 * (self.value - self.target);
            let damping_force = -friction * 0.001 * self.velocity;
            let acceleration = (spring_force + damping_force) / mass;
            self.velocity += acceleration;
            self.value += self.velocity;
        }

        if self.is_resting() {
            self.value = self.target;
            self.velocity = 0.0;
            false
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(value: &mut AnimatedValue, from_ms: u64, to_ms: u64) {
        let mut t = from_ms;
        while t <= to_ms {
            value.step(Duration::from_millis(t));
            t += 16;
        }
    }

    #[test]
    fn default_spring_settles_on_target() {
        let mut value = AnimatedValue::new(0.0, SpringConfig::default());
        value.set_target(100.0);
        run(&mut value, 0, 3_000);
        assert_eq!(value.value(), 100.0);
        assert!(value.is_resting());
    }

    #[test]
    fn spring_moves_towards_target_progressively() {
        let mut value = AnimatedValue::new(0.0, SpringConfig::default());
        value.set_target(50.0);
        value.step(Duration::ZERO);
        value.step(Duration::from_millis(16));
        let early = value.value();
        assert!(early > 0.0 && early < 50.0);
        assert!(value.velocity() > 0.0);
    }

    #[test]
    fn jump_to_is_immediate() {
        let mut value = AnimatedValue::new(3.0, SpringConfig::default());
        value.set_target(10.0);
        value.jump_to(42.0);
        assert_eq!(value.value(), 42.0);
        assert_eq!(value.target(), 42.0);
        assert!(!value.step(Duration::from_millis(16)));
    }

    #[test]
    fn queued_target_waits_for_its_time() {
        let mut value = AnimatedValue::new(1.0, SpringConfig::default());
        value.set_target_at(2.0, Duration::from_millis(30));
        value.step(Duration::from_millis(16));
        assert_eq!(value.target(), 1.0);
        assert_eq!(value.pending_len(), 1);
        value.step(Duration::from_millis(32));
        assert_eq!(value.target(), 2.0);
        assert_eq!(value.pending_len(), 0);
    }

    #[test]
    fn clear_pending_discards_queued_targets() {
        let mut value = AnimatedValue::new(1.0, SpringConfig::default());
        value.set_target_at(5.0, Duration::from_millis(10));
        value.clear_pending();
        value.step(Duration::from_millis(100));
        assert_eq!(value.target(), 1.0);
    }

    #[test]
    fn from_frequency_matches_period_conversion() {
        let config = SpringConfig::from_frequency(0.4, 0.4);
        let expected_tension = (2.0 * PI / 0.4).powi(2);
        let expected_friction = 4.0 * PI * 0.4 / 0.4;
        assert!((config.tension - expected_tension).abs() < 1e-3);
        assert!((config.friction - expected_friction).abs() < 1e-4);
        assert_eq!(SpringConfig::from_frequency(0.0, 1.0), SpringConfig::default());
    }

    #[test]
    fn underdamped_spring_overshoots() {
        let mut value = AnimatedValue::new(0.0, SpringConfig::from_frequency(0.4, 0.4));
        value.set_target(100.0);
        let mut peak = 0.0_f32;
        let mut t = 0;
        while t <= 2_000 {
            value.step(Duration::from_millis(t));
            peak = peak.max(value.value());
            t += 16;
        }
        assert!(peak > 100.0);
    }
}
