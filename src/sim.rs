//! Fireworks simulation.
//!
//! A [`Simulation`] owns the spark pool, the launch countdown and the RNG. All
//! mutation of the pool (spawn, split, swap-remove) happens here on one thread;
//! the compositor only ever reads the pool.
//!
//! One tick ([`Simulation::step`]) runs, in order:
//! 1. the launch countdown, possibly admitting a new main spark,
//! 2. drag integration plus the per-class timeout transition of every spark
//!    that was live when the tick began,
//! 3. the removal sweep.

use std::f64::consts::TAU;
use std::sync::Arc;

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::FixedStep;
use crate::color::{darken, encode};
use crate::decay::DecayTable;
use crate::params::Params;
use crate::pool::SparkPool;
use crate::spark::{Spark, SparkType};

/// Seconds between two Sparkles shed by the same Flare.
const FLARE_EMIT_SECONDS: f64 = 1.0 / 10.0;
/// Fuse of a freshly launched Flare.
const FLARE_FUSE_SECONDS: f64 = 1.0 / 30.0;
/// Child speed scale (pixels/s per unit of the random magnitude).
const BURST_SPEED: f64 = 120.0;

pub struct Simulation {
    pool: SparkPool,
    decay: Arc<DecayTable>,
    clock: FixedStep,
    rng: StdRng,
    width: usize,
    height: usize,
    /// Seconds until the next main launch; refilled from `main_launch_seconds`.
    start_countdown: f64,
    launches: u64,
}

impl Simulation {
    /// `seed` makes the show reproducible; `None` seeds from the OS.
    pub fn new(
        width: usize,
        height: usize,
        max_sparks: usize,
        decay: Arc<DecayTable>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            pool: SparkPool::with_capacity(max_sparks),
            decay,
            clock: FixedStep::default(),
            rng,
            width,
            height,
            start_countdown: 0.0,
            launches: 0,
        }
    }

    pub fn sparks(&self) -> &[Spark] {
        self.pool.as_slice()
    }

    pub fn spark_count(&self) -> usize {
        self.pool.len()
    }

    /// Main sparks launched so far.
    pub fn launch_count(&self) -> u64 {
        self.launches
    }

    /// Place a spark directly (admission-checked by the pool).
    pub fn spawn(&mut self, spark: Spark) -> bool {
        self.pool.push(spark)
    }

    pub fn spark_mut(&mut self, index: usize) -> Option<&mut Spark> {
        self.pool.get_mut(index)
    }

    pub fn set_launch_countdown(&mut self, seconds: f64) {
        self.start_countdown = seconds;
    }

    /// Run as many fixed sub-steps as `elapsed` needs. Returns how many ran.
    pub fn advance(&mut self, elapsed: f64, params: &Params) -> usize {
        let clock = self.clock;
        let mut steps = 0;
        for dt in clock.split(elapsed) {
            self.step(dt, params);
            steps += 1;
        }
        steps
    }

    /// One tick of `dt` seconds (callers keep dt within one interval).
    pub fn step(&mut self, dt: f64, params: &Params) {
        self.launch(dt, params);

        let gravity = params.gravity.get();
        let (vf, pf) = (
            SparkType::ALL.map(|kind| self.decay.lookup(kind, dt).0),
            SparkType::ALL.map(|kind| self.decay.lookup(kind, dt).1),
        );

        // Children spawned below land past `live` and wait for the next tick.
        let live = self.pool.len();
        for index in 0..live {
            let mut spark = self.pool.as_slice()[index];
            let row = spark.kind.index();

            spark.x += spark.vx * pf[row];
            spark.y += spark.vy * pf[row];
            spark.vx *= vf[row];
            spark.vy *= vf[row];
            spark.vy += gravity * dt;
            spark.time -= dt;

            if spark.time <= 0.0 {
                if spark.kind == SparkType::Flare {
                    spark.time = FLARE_EMIT_SECONDS;
                    self.emit_sparkle(&spark, params);
                } else if spark.split_count > 0 {
                    self.split(
                        spark.x,
                        spark.y,
                        spark.vx,
                        spark.vy,
                        spark.split_count - 1,
                        spark.color,
                        params,
                    );
                }
            }

            self.pool.as_mut_slice()[index] = spark;
        }

        self.remove_finished();
    }

    fn launch(&mut self, dt: f64, params: &Params) {
        self.start_countdown -= dt;
        if self.start_countdown >= 0.0 {
            return;
        }
        // Keep room for the whole first burst, or do not launch at all.
        let requested = params.new_spark_count.get() as usize;
        if self.pool.len() + requested >= self.pool.capacity() {
            trace!("launch refused: {} of {} sparks in use", self.pool.len(), self.pool.capacity());
            return;
        }
        // Overshoot carries into the next period; a long refused stretch restarts it.
        let period = params.main_launch_seconds.get();
        self.start_countdown += period;
        if self.start_countdown < 0.0 {
            self.start_countdown = period;
        }
        self.launches += 1;
        self.spawn_main(params);
    }

    /// Admit one main spark from the bottom edge; one in five is a Flare.
    pub fn spawn_main(&mut self, params: &Params) -> bool {
        let sx = (self.width / 320).max(1) as i64;
        let sy = (self.height / 200).max(1) as i64;
        let rng = &mut self.rng;

        let colors = &params.color_set().colors;
        let color = if colors.is_empty() {
            encode(0xFF, 0xFF, 0xFF)
        } else {
            colors[rng.random_range(0..colors.len())]
        };

        let mut spark = Spark {
            kind: SparkType::Standard,
            x: rng.random_range(0..self.width.max(1)) as f64,
            y: self.height as f64 - 1.0,
            vx: 60.0 * (rng.random_range(0..8 * sx) - 4 * sx) as f64,
            vy: 60.0 * (-20 * sy - rng.random_range(0..5 * sy)) as f64,
            time: params.burst_seconds.get() + rng.random::<f64>() * params.burst_variance.get(),
            split_count: params.stages.get(),
            color,
            flare_color: darken(color, 0.15),
        };

        if rng.random_ratio(1, 5) {
            spark.kind = SparkType::Flare;
            spark.time = FLARE_FUSE_SECONDS;
            spark.vx = 60.0 * (rng.random_range(0..10 * sx) - 4 * sx) as f64;
            spark.vy = 60.0 * (-3 * sy - rng.random_range(0..2 * sy)) as f64;
            spark.split_count = 0;
        }

        self.pool.push(spark)
    }

    /// Burst `new_spark_count` children evenly around a circle, carrying some of
    /// the parent's momentum. A nearly full pool shrinks the burst; the children
    /// that do spawn always take the first angles in order. Returns how many spawned.
    #[allow(clippy::too_many_arguments)]
    pub fn split(
        &mut self,
        x: f64,
        y: f64,
        avx: f64,
        avy: f64,
        generations: u32,
        color: u32,
        params: &Params,
    ) -> usize {
        let requested = params.new_spark_count.get() as usize;
        let count = self.pool.remaining().saturating_sub(requested).min(requested);
        if count < requested {
            trace!("burst shrunk to {count} of {requested}");
        }

        let step = TAU / requested as f64;
        let child_color = darken(color, 0.9);
        let child_flare = darken(color, 0.15);
        let mut angle = 0.0_f64;
        let mut spawned = 0;
        for _ in 0..count {
            let magnitude = f64::from(4 + self.rng.random_range(0..4u32));
            let time = params.burst_seconds.get() + self.rng.random::<f64>() * params.burst_variance.get();
            let child = Spark {
                kind: SparkType::Standard,
                x,
                y,
                vx: BURST_SPEED * (avx / 3.0 + angle.cos() * magnitude),
                vy: BURST_SPEED * (avy / 5.0 + angle.sin() * magnitude),
                time,
                split_count: generations,
                color: child_color,
                flare_color: child_flare,
            };
            if self.pool.push(child) {
                spawned += 1;
            }
            angle += step;
        }
        spawned
    }

    /// A Flare sheds one short-lived Sparkle where it currently is.
    fn emit_sparkle(&mut self, flare: &Spark, params: &Params) -> bool {
        if self.pool.remaining() == 0 {
            return false;
        }
        let rng = &mut self.rng;
        let sparkle = Spark {
            kind: SparkType::Sparkle,
            x: flare.x,
            y: flare.y,
            vx: 120.0 * (rng.random_range(0..5) - 2) as f64,
            vy: 120.0 * (rng.random_range(0..5) - 2) as f64,
            time: params.burst_seconds.get() + rng.random::<f64>() * params.burst_variance.get(),
            split_count: 0,
            color: darken(flare.color, 0.35),
            flare_color: darken(flare.color, 0.15),
        };
        self.pool.push(sparkle)
    }

    /// Drop sparks that left the sides or bottom, or burned out.
    /// Nothing is removed for flying above the top edge.
    fn remove_finished(&mut self) {
        let width = self.width as f64;
        let height = self.height as f64;
        let mut index = 0;
        while index < self.pool.len() {
            let s = self.pool.as_slice()[index];
            if s.x < 0.0 || s.x > width || s.time < 0.0 || s.y > height {
                // the swapped-in spark is checked on the next pass of this slot
                self.pool.swap_remove(index);
            } else {
                index += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(capacity: usize) -> Simulation {
        let mut sim = Simulation::new(800, 600, capacity, Arc::new(DecayTable::new()), Some(7));
        sim.set_launch_countdown(f64::MAX);
        sim
    }

    fn standard(x: f64, y: f64, time: f64) -> Spark {
        Spark {
            kind: SparkType::Standard,
            x,
            y,
            time,
            color: encode(200, 100, 50),
            ..Spark::default()
        }
    }

    #[test]
    fn full_pool_refuses_burst() {
        let params = Params::default();
        let mut sim = sim(15);
        assert_eq!(sim.split(10.0, 10.0, 0.0, 0.0, 1, 0x00FF_FFFF, &params), 0);
        assert_eq!(sim.spark_count(), 0);
    }

    #[test]
    fn tight_pool_shrinks_burst_to_first_angles() {
        let params = Params::default();
        let mut sim = sim(20);
        assert_eq!(sim.split(400.0, 300.0, 0.0, 0.0, 2, 0x00FF_FFFF, &params), 5);
        assert_eq!(sim.spark_count(), 5);

        for (k, child) in sim.sparks().iter().enumerate() {
            let expected = k as f64 * TAU / 15.0;
            let angle = child.vy.atan2(child.vx);
            assert!((angle - expected).abs() < 1e-9, "child {k}: {angle} vs {expected}");
            let speed = child.vx.hypot(child.vy) / BURST_SPEED;
            assert!((4.0..=7.0).contains(&speed.round()));
            assert_eq!(child.split_count, 2);
            assert_eq!(child.kind, SparkType::Standard);
        }
    }

    #[test]
    fn burst_children_inherit_colour_family() {
        let params = Params::default();
        let mut sim = sim(100);
        let base = encode(200, 100, 50);
        sim.split(1.0, 2.0, 30.0, -50.0, 0, base, &params);
        let child = sim.sparks()[0];
        assert_eq!(child.color, darken(base, 0.9));
        assert_eq!(child.flare_color, darken(base, 0.15));
        assert!(child.time >= 0.35 && child.time <= 0.35 + 0.45);
        // angle 0: vx carries cos, vy only the parent's share
        assert!((child.vy - BURST_SPEED * (-50.0 / 5.0)).abs() < 1e-9);
    }

    #[test]
    fn launch_needs_room_for_a_full_burst() {
        let params = Params::default();
        let mut tight = sim(20);
        for _ in 0..5 {
            tight.spawn(standard(100.0, 100.0, 10.0));
        }
        // 5 + 15 is not below 20
        tight.set_launch_countdown(0.0);
        tight.launch(0.01, &params);
        assert_eq!(tight.spark_count(), 5);
        assert!(tight.start_countdown < 0.0);

        let mut roomy = sim(21);
        roomy.set_launch_countdown(0.0);
        for _ in 0..5 {
            roomy.spawn(standard(100.0, 100.0, 10.0));
        }
        roomy.launch(0.01, &params);
        assert_eq!(roomy.spark_count(), 6);
        assert_eq!(roomy.launch_count(), 1);
        // the 0.01 s overshoot is carried into the next period
        let expected = params.main_launch_seconds.get() - 0.01;
        assert!((roomy.start_countdown - expected).abs() < 1e-12);
    }

    #[test]
    fn refused_stretch_does_not_queue_launches() {
        let params = Params::default();
        let mut sim = sim(100);
        sim.set_launch_countdown(-5.0);
        sim.launch(0.01, &params);
        assert_eq!(sim.launch_count(), 1);
        assert_eq!(sim.start_countdown, params.main_launch_seconds.get());
    }

    #[test]
    fn launch_cadence_ignores_frame_rate() {
        let mut params = Params::default();
        // one generation keeps the pool small
        params.stages.set(1);
        let count_launches = |fps: u32| {
            let mut sim = Simulation::new(800, 600, 50_000, Arc::new(DecayTable::new()), Some(5));
            for _ in 0..60 * fps {
                sim.advance(1.0 / f64::from(fps), &params);
            }
            sim.launch_count()
        };
        // 60 s at one launch per 0.25 s
        for fps in [30, 60, 240] {
            let launches = count_launches(fps);
            assert!((239..=241).contains(&launches), "{fps} Hz: {launches} launches");
        }
    }

    #[test]
    fn flare_in_full_pool_rearms_without_shedding() {
        let params = Params::default();
        let mut sim = sim(1);
        assert!(sim.spawn(Spark {
            kind: SparkType::Flare,
            time: 0.001,
            ..standard(400.0, 300.0, 0.0)
        }));
        sim.step(1.0 / 60.0, &params);
        assert_eq!(sim.spark_count(), 1);
        let flare = sim.sparks()[0];
        assert_eq!(flare.kind, SparkType::Flare);
        assert_eq!(flare.time, FLARE_EMIT_SECONDS);
    }

    #[test]
    fn main_sparks_start_on_the_bottom_edge() {
        let params = Params::default();
        let mut sim = sim(10_000);
        for _ in 0..200 {
            assert!(sim.spawn_main(&params));
        }
        let mut flares = 0;
        for s in sim.sparks() {
            assert_eq!(s.y, 599.0);
            assert!(s.x >= 0.0 && s.x < 800.0);
            assert!(s.vy < 0.0);
            assert!(params.color_set().colors.contains(&s.color));
            match s.kind {
                SparkType::Flare => {
                    flares += 1;
                    assert_eq!(s.split_count, 0);
                    assert_eq!(s.time, FLARE_FUSE_SECONDS);
                }
                _ => assert_eq!(s.split_count, 3),
            }
        }
        // one in five, give or take
        assert!((15..=70).contains(&flares), "{flares} flares");
    }

    #[test]
    fn integration_follows_decay_table() {
        let params = Params::default();
        let mut sim = sim(10);
        sim.spawn(Spark {
            vx: 100.0,
            vy: -200.0,
            ..standard(400.0, 300.0, 5.0)
        });
        let dt = 0.01;
        sim.step(dt, &params);

        let (vf, pf) = sim.decay.lookup(SparkType::Standard, dt);
        let s = sim.sparks()[0];
        assert!((s.x - (400.0 + 100.0 * pf)).abs() < 1e-12);
        assert!((s.y - (300.0 - 200.0 * pf)).abs() < 1e-12);
        assert!((s.vx - 100.0 * vf).abs() < 1e-12);
        assert!((s.vy - (-200.0 * vf + params.gravity.get() * dt)).abs() < 1e-12);
        assert!((s.time - (5.0 - dt)).abs() < 1e-12);
    }

    #[test]
    fn removal_bounds_are_open_above() {
        let params = Params::default();
        let mut sim = sim(10);
        sim.spawn(standard(400.0, -500.0, 5.0)); // above the top: stays
        sim.spawn(standard(-1.0, 300.0, 5.0)); // left
        sim.spawn(standard(801.0, 300.0, 5.0)); // right
        sim.spawn(standard(400.0, 601.0, 5.0)); // below
        sim.spawn(standard(400.0, 300.0, 0.001)); // burns out
        sim.step(0.005, &params);

        assert_eq!(sim.spark_count(), 1);
        assert!(sim.sparks()[0].y < 0.0);
    }

    #[test]
    fn removal_rechecks_swapped_in_sparks() {
        let params = Params::default();
        let mut sim = sim(10);
        sim.spawn(standard(-5.0, 10.0, 1.0));
        sim.spawn(standard(400.0, 300.0, 1.0));
        sim.spawn(standard(-5.0, 10.0, 1.0));
        sim.step(0.0, &params);
        assert_eq!(sim.spark_count(), 1);
        assert_eq!(sim.sparks()[0].x, 400.0);
    }

    #[test]
    fn sparkle_never_splits() {
        let params = Params::default();
        let mut sim = sim(100);
        sim.spawn(Spark {
            kind: SparkType::Sparkle,
            ..standard(400.0, 300.0, 0.001)
        });
        sim.step(0.01, &params);
        assert_eq!(sim.spark_count(), 0);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let params = Params::default();
        let run = || {
            let mut sim = Simulation::new(640, 480, 50_000, Arc::new(DecayTable::new()), Some(42));
            sim.advance(2.0, &params);
            sim.sparks().to_vec()
        };
        assert_eq!(run(), run());
    }
}
