//! Integration tests for driftpool-core.
//!
//! These exercise the full pipeline: jitter harvester → pool → weighted
//! aggregator → salter, plus a statistical smoke check on generator output.
//! Tolerances follow uniform-byte expectations loosely; this is a regression
//! gate, not a certification.

use std::collections::HashSet;

use statrs::statistics::Statistics;

use driftpool_core::{Aggregator, ByteSource, JitterPool, OsRandom, POOL_SIZE, Salter};

const ROUNDS: usize = 1000;
const MAX_DUP_RATE: f64 = 0.05;
const MIN_STD_DEV: f64 = 50.0;

/// Duplicate rate over 16-bit reads and population standard deviation over
/// the individual bytes.
fn unpredictability(source: &dyn ByteSource) -> (f64, f64) {
    let mut seen = HashSet::new();
    let mut dups = 0usize;
    let mut values = Vec::with_capacity(ROUNDS * 2);

    for _ in 0..ROUNDS {
        let mut buf = [0u8; 2];
        source.read_into(&mut buf).expect("source read failed");
        let val = u16::from_le_bytes(buf);
        if !seen.insert(val) {
            dups += 1;
        }
        values.push(f64::from(buf[0]));
        values.push(f64::from(buf[1]));
    }

    (dups as f64 / ROUNDS as f64, values.iter().population_std_dev())
}

#[test]
fn os_random_dispersion_baseline() {
    let (dup_rate, std_dev) = unpredictability(&OsRandom);
    assert!(dup_rate <= MAX_DUP_RATE, "OS CSPRNG dup rate {dup_rate:.4}");
    assert!(std_dev >= MIN_STD_DEV, "OS CSPRNG std dev {std_dev:.2}");
}

#[test]
fn jitter_pool_dispersion() {
    let pool = JitterPool::start();
    let (dup_rate, std_dev) = unpredictability(&pool);
    assert!(
        dup_rate <= MAX_DUP_RATE,
        "jitter generator dup rate {dup_rate:.4} over {ROUNDS} rounds"
    );
    assert!(std_dev >= MIN_STD_DEV, "jitter generator std dev {std_dev:.2}");
    pool.stop();
}

#[test]
fn pool_warms_to_capacity_for_benchmarks() {
    let pool = JitterPool::start();
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(60);
    while pool.available() < POOL_SIZE {
        assert!(
            std::time::Instant::now() < deadline,
            "pool stuck at {} of {POOL_SIZE}",
            pool.available()
        );
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
}

#[test]
fn aggregated_stream_feeds_salter() {
    let pool = JitterPool::start();
    let aggr = Aggregator::builder()
        .add(OsRandom, 3)
        .add(pool, 1)
        .build()
        .expect("build aggregator");

    let mut buf = [0u8; 128];
    assert_eq!(aggr.fill(&mut buf).expect("fill"), 128);

    let salter = Salter::new(aggr);
    let mut seen = HashSet::new();
    for _ in 0..100 {
        let token = salter.token(0).expect("token");
        assert!(seen.insert(token), "salter produced a duplicate token");
    }
}

#[test]
fn secure_set_tokens_are_unique() {
    let salter = Salter::secure();
    let mut seen = HashSet::new();
    for _ in 0..ROUNDS {
        let token = salter.token(0).expect("token");
        assert!(seen.insert(token), "duplicate token from secure set");
    }
}
