//! Headless demos for the sombrero cores.
//!
//! Each demo scripts pointer input against a simulated 60 Hz frame clock and
//! reports what the cores produce, either as log lines or as one JSON object
//! per frame on stdout.

mod list_demo;
mod wire_demo;

use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use sombrero_ui::{FrameClock, logging::init_tracing};
use tracing::info;

const FRAME: Duration = Duration::from_micros(16_667);

/// Which demo to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// Drag-to-reorder list with the ripple.
    List,
    /// Rope between two sockets.
    Wire,
    /// Both, one after the other.
    All,
}

#[derive(Debug, Parser)]
#[command(name = "example")]
#[command(version, about = "Scripted demos of the sombrero animation cores", long_about = None)]
pub struct Cli {
    /// Demo to run
    #[arg(long, value_enum, default_value_t = Demo::All)]
    demo: Demo,
    /// Frames to simulate after each scripted gesture
    #[arg(long, default_value_t = 90)]
    frames: u64,
    /// Print every frame as a JSON line
    #[arg(long)]
    json: bool,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log: String,
}

/// A frame clock advanced in fixed 60 Hz steps.
pub struct Simulation {
    clock: FrameClock,
    now: Duration,
    json: bool,
}

impl Simulation {
    fn new(json: bool) -> Self {
        Self {
            clock: FrameClock::new(),
            now: Duration::ZERO,
            json,
        }
    }

    fn clock(&self) -> &FrameClock {
        &self.clock
    }

    fn now(&self) -> Duration {
        self.now
    }

    /// Runs one frame, then hands the frame index to `observe`.
    fn tick<S: Serialize>(&mut self, observe: impl FnOnce() -> S) -> anyhow::Result<()> {
        self.clock.advance(self.now);
        if self.json {
            let snapshot = FrameDump {
                frame: self.clock.frame(),
                now_ms: self.now.as_secs_f64() * 1000.0,
                state: observe(),
            };
            println!("{}", serde_json::to_string(&snapshot)?);
        }
        self.now += FRAME;
        Ok(())
    }

    fn run<S: Serialize>(
        &mut self,
        frames: u64,
        mut observe: impl FnMut() -> S,
    ) -> anyhow::Result<()> {
        for _ in 0..frames {
            self.tick(&mut observe)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct FrameDump<S> {
    frame: u64,
    now_ms: f64,
    state: S,
}

/// Entry point of the demo binary.
pub fn desktop_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log);
    run(&cli)
}

/// Runs the demos selected by `cli`.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    if matches!(cli.demo, Demo::List | Demo::All) {
        let mut sim = Simulation::new(cli.json);
        let order = list_demo::run(&mut sim, cli.frames)?;
        info!(?order, "list demo finished");
    }
    if matches!(cli.demo, Demo::Wire | Demo::All) {
        let mut sim = Simulation::new(cli.json);
        let endpoints = wire_demo::run(&mut sim, cli.frames)?;
        info!(?endpoints, "wire demo finished");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_demos_complete() {
        let cli = Cli::parse_from(["example", "--demo", "all", "--frames", "120"]);
        assert_eq!(cli.demo, Demo::All);
        run(&cli).unwrap();
    }

    #[test]
    fn list_demo_moves_first_item_down_three_slots() {
        let mut sim = Simulation::new(false);
        let order = list_demo::run(&mut sim, 120).unwrap();
        assert_eq!(order, vec![1, 2, 3, 0, 4, 5, 6, 7]);
    }
}
