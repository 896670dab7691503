// Fixed-timestep splitter: a long frame becomes several short physics steps.

/// Largest step fed to the simulation (60 Hz).
pub const INTERVAL: f64 = 1.0 / 60.0;

// Repeated subtraction drifts by a few ulps; anything this close to a full
// interval counts as one. Far below the microsecond quantization of the decay table.
const SLACK: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    interval: f64,
}

impl FixedStep {
    pub fn new(interval: f64) -> Self {
        Self { interval }
    }

    /// Full `interval` steps while more than one interval remains, then one final
    /// step with whatever is left. A zero remainder after full steps is skipped;
    /// a zero-length frame still yields a single zero step.
    pub fn split(&self, elapsed: f64) -> SubSteps {
        SubSteps {
            remaining: elapsed.max(0.0),
            interval: self.interval,
            full_steps: 0,
            done: false,
        }
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(INTERVAL)
    }
}

pub struct SubSteps {
    remaining: f64,
    interval: f64,
    full_steps: usize,
    done: bool,
}

impl Iterator for SubSteps {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.done {
            return None;
        }
        if self.remaining > self.interval - SLACK {
            self.remaining -= self.interval;
            self.full_steps += 1;
            return Some(self.interval);
        }
        self.done = true;
        if self.full_steps > 0 && self.remaining <= SLACK {
            return None;
        }
        Some(self.remaining.max(0.0))
    }
}
