pub mod bench;
pub mod pool;
pub mod stream;
pub mod token;

use driftpool_core::{Aggregator, JitterPool, OsRandom};

/// Build the OS-plus-jitter blend with the given weights. Exits on invalid
/// weights rather than panicking deep in the fill path.
pub fn make_blend(os_weight: u32, jitter_weight: u32) -> Aggregator {
    match Aggregator::builder()
        .add(OsRandom, os_weight)
        .add(JitterPool::start(), jitter_weight)
        .build()
    {
        Ok(aggr) => aggr,
        Err(e) => {
            eprintln!("Error: invalid source blend: {e}");
            std::process::exit(1);
        }
    }
}
