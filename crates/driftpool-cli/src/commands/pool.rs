use std::time::Duration;

use driftpool_core::JitterPool;

pub fn run(watch: bool, json: bool) {
    let pool = JitterPool::start();

    if watch {
        // Sample until the pool saturates, then once more to show mixing.
        while pool.available() < pool.capacity() {
            print_status(&pool, json);
            std::thread::sleep(Duration::from_millis(100));
        }
    } else {
        // Give the harvester a moment so the numbers are not all zero.
        std::thread::sleep(Duration::from_millis(50));
    }

    print_status(&pool, json);
    pool.stop();
}

fn print_status(pool: &JitterPool, json: bool) {
    let status = pool.status();
    if json {
        match serde_json::to_string(&status) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error serializing status: {e}");
                std::process::exit(1);
            }
        }
    } else {
        let fingerprint = pool.fingerprint();
        let fp_hex: String = fingerprint[..8].iter().map(|b| format!("{b:02x}")).collect();
        println!(
            "pool: {}/{} bytes | collected {} | fingerprint {fp_hex}…",
            status.available, status.capacity, status.total_collected
        );
    }
}
