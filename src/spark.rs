// Spark record and the three spark classes.

/// Particle class. Heavier classes lose speed more slowly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SparkType {
    #[default]
    Standard,
    /// Slow, long-lived emitter that sheds a Sparkle every tenth of a second.
    Flare,
    /// Very light fleck shed by a Flare; never splits.
    Sparkle,
}

impl SparkType {
    pub const ALL: [SparkType; 3] = [SparkType::Standard, SparkType::Flare, SparkType::Sparkle];

    /// Row in the decay table.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Drag constant k (1/s). Velocity shrinks as e^(-k*t).
    pub fn drag(self) -> f64 {
        match self {
            SparkType::Standard => 9.741,
            SparkType::Flare => 1.207,
            SparkType::Sparkle => 83.178,
        }
    }
}

/// One light particle. Lives in the pool; "dead" just means past the active count.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spark {
    pub kind: SparkType,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Seconds until burst (Standard), next emission (Flare) or burnout.
    pub time: f64,
    /// Generations of children still owed.
    pub split_count: u32,
    pub color: u32,
    pub flare_color: u32,
}

impl Spark {
    /// Screen pixel the spark falls in (truncated toward zero).
    #[inline]
    pub fn pixel(&self) -> (i64, i64) {
        (self.x as i64, self.y as i64)
    }
}
