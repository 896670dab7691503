use std::sync::Arc;

use pretty_assertions::assert_eq;
use sparkfall::color::encode;
use sparkfall::decay::DecayTable;
use sparkfall::params::Params;
use sparkfall::sim::Simulation;
use sparkfall::spark::{Spark, SparkType};

fn quiet_sim(capacity: usize) -> Simulation {
    let mut sim = Simulation::new(800, 600, capacity, Arc::new(DecayTable::new()), Some(42));
    // no main launches unless a test asks for them
    sim.set_launch_countdown(1e9);
    sim
}

#[test]
fn standard_spark_bursts_into_next_generation() {
    let params = Params::default();
    let mut sim = quiet_sim(1000);
    assert!(sim.spawn(Spark {
        kind: SparkType::Standard,
        x: 400.0,
        y: 300.0,
        time: 0.11,
        split_count: 3,
        color: encode(255, 128, 64),
        ..Spark::default()
    }));

    sim.advance(0.2, &params);

    let sparks = sim.sparks();
    assert_eq!(sparks.len(), 15);
    assert!(sparks.iter().all(|s| s.kind == SparkType::Standard));
    assert!(sparks.iter().all(|s| s.split_count == 2));
    // children are dimmer than the parent
    assert!(sparks.iter().all(|s| s.color != encode(255, 128, 64)));
}

#[test]
fn flare_sheds_sparkles_until_it_leaves_the_scene() {
    let params = Params::default();
    let mut sim = quiet_sim(1000);
    assert!(sim.spawn(Spark {
        kind: SparkType::Flare,
        x: 400.0,
        y: 300.0,
        time: 0.05,
        color: encode(255, 255, 0),
        ..Spark::default()
    }));

    sim.advance(0.3, &params);

    let sparkles = sim.sparks().iter().filter(|s| s.kind == SparkType::Sparkle).count();
    assert!((2..=3).contains(&sparkles), "{sparkles} sparkles");
    assert!(sim.sparks().iter().filter(|s| s.kind == SparkType::Sparkle).all(|s| s.split_count == 0));

    let flare = sim
        .sparks()
        .iter()
        .position(|s| s.kind == SparkType::Flare)
        .expect("flare still alive");
    if let Some(spark) = sim.spark_mut(flare) {
        spark.x = -1.0;
    }
    sim.advance(1.0 / 60.0, &params);
    assert!(sim.sparks().iter().all(|s| s.kind != SparkType::Flare));
}

#[test]
fn pool_never_exceeds_capacity() {
    let mut params = Params::default();
    params.main_launch_seconds.set(0.001);
    let capacity = 200;
    let mut sim = Simulation::new(640, 400, capacity, Arc::new(DecayTable::new()), Some(3));

    let mut peak = 0;
    for _ in 0..600 {
        sim.advance(1.0 / 60.0, &params);
        assert!(sim.spark_count() <= capacity);
        peak = peak.max(sim.spark_count());
    }
    assert!(peak > 0);
}

#[test]
fn same_seed_same_show() {
    let params = Params::default();
    let run = || {
        let mut sim = Simulation::new(640, 400, 5000, Arc::new(DecayTable::new()), Some(99));
        for _ in 0..120 {
            sim.advance(1.0 / 60.0, &params);
        }
        sim.sparks().to_vec()
    };
    assert_eq!(run(), run());
}
