use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Hooks a learner calls around each training stage (one stage per epoch).
pub trait StageTimer {
    fn start(&mut self, stage: usize);
    fn stop(&mut self, stage: usize);
    /// Durations of the completed stages, in completion order.
    fn collect(&self) -> Vec<Duration>;
}

/// Wall-clock timer.
#[derive(Debug, Default)]
pub struct EpochTimer {
    running: Option<(usize, Instant)>,
    laps: Vec<(usize, Duration)>,
}

impl EpochTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn laps(&self) -> &[(usize, Duration)] {
        &self.laps
    }

    pub fn total(&self) -> Duration {
        self.laps.iter().map(|(_, d)| *d).sum()
    }
}

impl StageTimer for EpochTimer {
    fn start(&mut self, stage: usize) {
        if let Some((open, _)) = self.running {
            warn!(open, stage, "stage started before the previous one stopped");
        }
        self.running = Some((stage, Instant::now()));
    }

    fn stop(&mut self, stage: usize) {
        match self.running.take() {
            Some((open, started)) if open == stage => {
                let elapsed = started.elapsed();
                debug!(stage, elapsed_ms = elapsed.as_millis() as u64, "stage finished");
                self.laps.push((stage, elapsed));
            }
            Some((open, started)) => {
                warn!(open, stage, "stop does not match the running stage, ignored");
                self.running = Some((open, started));
            }
            None => warn!(stage, "stop without start, ignored"),
        }
    }

    fn collect(&self) -> Vec<Duration> {
        self.laps.iter().map(|(_, d)| *d).collect()
    }
}

/// Records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTimer;

impl StageTimer for NoopTimer {
    fn start(&mut self, _stage: usize) {}

    fn stop(&mut self, _stage: usize) {}

    fn collect(&self) -> Vec<Duration> {
        Vec::new()
    }
}
