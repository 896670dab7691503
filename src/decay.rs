// Precomputed exponential-drag factors, so moving a million sparks never calls exp().
//
// For drag k and a step dt the exact solution of dv/dt = -k*v is
//   v' = v * e^(-k*dt)
//   x' = x + v * (1 - e^(-k*dt)) / k
// Both multipliers depend only on (class, dt), so we tabulate them per microsecond.

use crate::spark::SparkType;

/// One 60 Hz frame (16 666 us) plus a millisecond of slack.
pub const TIME_STEPS: usize = 16_666 + 1_000;

pub struct DecayTable {
    // [class][dt_us], TIME_STEPS + 1 entries per class
    velocity: Vec<Vec<f64>>,
    position: Vec<Vec<f64>>,
}

impl DecayTable {
    /// Build both tables once at startup.
    pub fn new() -> Self {
        let mut velocity = Vec::with_capacity(SparkType::ALL.len());
        let mut position = Vec::with_capacity(SparkType::ALL.len());

        for kind in SparkType::ALL {
            let k = kind.drag();
            let mut vf = Vec::with_capacity(TIME_STEPS + 1);
            let mut pf = Vec::with_capacity(TIME_STEPS + 1);
            for us in 0..=TIME_STEPS {
                let dt = us as f64 * 1e-6;
                let f = (-k * dt).exp();
                vf.push(f);
                pf.push((1.0 - f) / k);
            }
            velocity.push(vf);
            position.push(pf);
        }

        Self { velocity, position }
    }

    /// Quantize seconds to whole microseconds inside the table.
    #[inline]
    pub fn quantize(dt: f64) -> usize {
        ((dt * 1e6) as i64).clamp(0, TIME_STEPS as i64) as usize
    }

    /// (velocity factor, position factor) for a step of `dt` seconds.
    #[inline]
    pub fn lookup(&self, kind: SparkType, dt: f64) -> (f64, f64) {
        let us = Self::quantize(dt);
        let row = kind.index();
        (self.velocity[row][us], self.position[row][us])
    }

    pub fn velocity_factor(&self, kind: SparkType, us: usize) -> f64 {
        self.velocity[kind.index()][us.min(TIME_STEPS)]
    }

    pub fn position_factor(&self, kind: SparkType, us: usize) -> f64 {
        self.position[kind.index()][us.min(TIME_STEPS)]
    }
}

impl Default for DecayTable {
    fn default() -> Self {
        Self::new()
    }
}
