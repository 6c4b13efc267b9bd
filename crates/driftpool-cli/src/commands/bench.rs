use std::collections::HashSet;

use statrs::statistics::Statistics;

use driftpool_core::JitterPool;

pub fn run(rounds: usize) {
    if rounds == 0 {
        eprintln!("Error: --rounds must be at least 1");
        std::process::exit(1);
    }

    println!("Sampling {rounds} 16-bit reads from the jitter generator...");
    let pool = JitterPool::start();

    let mut seen = HashSet::new();
    let mut dups = 0usize;
    let mut values = Vec::with_capacity(rounds * 2);

    for _ in 0..rounds {
        let bytes = pool.read(2);
        let val = u16::from_le_bytes([bytes[0], bytes[1]]);
        if !seen.insert(val) {
            dups += 1;
        }
        values.push(f64::from(bytes[0]));
        values.push(f64::from(bytes[1]));
    }
    pool.stop();

    let dup_rate = dups as f64 / rounds as f64;
    let std_dev = values.iter().population_std_dev();

    // Uniform bytes sit near 73.9; real jitter output should not be far off.
    println!("duplicates: {dups}/{rounds} ({:.2}%)", dup_rate * 100.0);
    println!("byte std dev: {std_dev:.2} (uniform ≈ 73.9)");

    let ok = dup_rate <= 0.05 && std_dev >= 50.0;
    println!("verdict: {}", if ok { "PASS" } else { "FAIL" });
    if !ok {
        std::process::exit(1);
    }
}
