//! Live tunables.
//!
//! Each numeric knob carries its own inclusive range; `set` clamps into it, so a
//! config file or key binding can never push the simulation outside sane values.
//! The simulation reads the current values every tick.

use std::fmt::Debug;

use log::debug;

use crate::colorset::ColorSet;

/// A named value clamped to `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Param<T> {
    name: &'static str,
    value: T,
    min: T,
    max: T,
}

impl<T: Copy + PartialOrd + Debug> Param<T> {
    pub fn new(name: &'static str, value: T, min: T, max: T) -> Self {
        let mut p = Self { name, value: min, min, max };
        p.set(value);
        p
    }

    #[inline]
    pub fn get(&self) -> T {
        self.value
    }

    /// Store `value`, clamped into range. Returns the stored value.
    pub fn set(&mut self, value: T) -> T {
        self.value = if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        };
        if self.value != value {
            debug!("{} = {:?} clamped to {:?}", self.name, value, self.value);
        }
        self.value
    }

    pub fn range(&self) -> (T, T) {
        (self.min, self.max)
    }
}

pub const DEFAULT_VECTOR_FADE_STEP: f64 = 1.0 / 480.0;

#[derive(Debug, Clone)]
pub struct Params {
    /// Seconds between main launches.
    pub main_launch_seconds: Param<f64>,
    /// Base seconds until a spark bursts or burns out.
    pub burst_seconds: Param<f64>,
    /// Extra random seconds added on top of `burst_seconds`.
    pub burst_variance: Param<f64>,
    /// Added to vy every second (pixels/s^2, screen y grows downward).
    pub gravity: Param<f64>,
    /// Children per burst.
    pub new_spark_count: Param<u32>,
    /// Burst generations of a main spark.
    pub stages: Param<u32>,
    /// Seconds per intensity unit on the fine fade path.
    pub vector_fade_step: Param<f64>,
    pub draw_flare: bool,
    pub draw_frame_chart: bool,
    color_sets: Vec<ColorSet>,
    active_set: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            main_launch_seconds: Param::new("main_launch_seconds", 0.25, 0.001, 3.0),
            burst_seconds: Param::new("burst_seconds", 0.35, 0.001, 2.0),
            burst_variance: Param::new("burst_variance", 0.45, 0.001, 2.0),
            gravity: Param::new("gravity", 69.80665, 1.0, 300.0),
            new_spark_count: Param::new("new_spark_count", 15, 1, 100),
            stages: Param::new("stages", 3, 1, 5),
            vector_fade_step: Param::new("vector_fade_step", DEFAULT_VECTOR_FADE_STEP, 0.000333, 0.01),
            draw_flare: true,
            draw_frame_chart: true,
            color_sets: ColorSet::builtin(),
            active_set: 0,
        }
    }
}

impl Params {
    pub fn color_set(&self) -> &ColorSet {
        &self.color_sets[self.active_set]
    }

    /// Switch to the next palette (wraps around). Returns its name.
    pub fn cycle_color_set(&mut self) -> &str {
        self.active_set = (self.active_set + 1) % self.color_sets.len();
        &self.color_sets[self.active_set].name
    }

    /// Pick a palette by name (case-insensitive). False if no palette matches.
    pub fn select_color_set(&mut self, name: &str) -> bool {
        match self
            .color_sets
            .iter()
            .position(|set| set.name.eq_ignore_ascii_case(name))
        {
            Some(idx) => {
                self.active_set = idx;
                true
            }
            None => false,
        }
    }
}
