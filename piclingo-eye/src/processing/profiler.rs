//! Per-frame stage timings

use std::fmt;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preprocess,
    Network,
    Postprocess,
    Visualize,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Preprocess, Stage::Network, Stage::Postprocess, Stage::Visualize];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Preprocess => "Pre-Process",
            Stage::Network => "Network",
            Stage::Postprocess => "Post-Process",
            Stage::Visualize => "Visualize",
        };
        f.pad(name)
    }
}

/// Timings of the most recent frame
#[derive(Debug, Default)]
pub struct Profiler {
    timings: [Duration; 4],
    started: Option<(Stage, Instant)>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing `stage`; an unfinished stage is discarded.
    pub fn begin(&mut self, stage: Stage) {
        self.started = Some((stage, Instant::now()));
    }

    /// Stop timing `stage`. Ignored unless `stage` was the one begun.
    pub fn end(&mut self, stage: Stage) {
        if let Some((begun, at)) = self.started {
            if begun == stage {
                self.record(stage, at.elapsed());
                self.started = None;
            }
        }
    }

    pub fn record(&mut self, stage: Stage, elapsed: Duration) {
        self.timings[stage.index()] = elapsed;
    }

    pub fn timing(&self, stage: Stage) -> Duration {
        self.timings[stage.index()]
    }

    pub fn total(&self) -> Duration {
        self.timings.iter().sum()
    }

    /// Frames per second the network stage alone could sustain
    pub fn network_fps(&self) -> f32 {
        let secs = self.timing(Stage::Network).as_secs_f32();
        if secs > 0.0 {
            1.0 / secs
        } else {
            0.0
        }
    }

    pub fn report(&self, network: &str) -> Vec<String> {
        let mut lines = Vec::with_capacity(Stage::ALL.len() + 2);
        lines.push(format!("Timing Report {}", network));
        for stage in Stage::ALL {
            lines.push(format!("{:<13} {:>9.3} ms", stage, millis(self.timing(stage))));
        }
        lines.push(format!("{:<13} {:>9.3} ms", "Total", millis(self.total())));
        lines
    }

    pub fn log(&self, network: &str) {
        for line in self.report(network) {
            info!("{}", line);
        }
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
