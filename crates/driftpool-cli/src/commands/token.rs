use driftpool_core::Salter;

pub fn run(count: usize, extra: usize) {
    let salter = Salter::secure();

    for _ in 0..count {
        match salter.token(extra) {
            Ok(token) => println!("{token}"),
            Err(e) => {
                eprintln!("Error generating token: {e}");
                std::process::exit(1);
            }
        }
    }
}
