//! CLI for driftpool — tokens and byte streams from weighted randomness
//! sources.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "driftpool")]
#[command(about = "driftpool — weighted randomness from the OS CSPRNG and scheduler jitter")]
#[command(version = driftpool_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate tokens from the secure source blend
    Token {
        /// Number of tokens to print
        #[arg(long, default_value = "1")]
        count: usize,

        /// Extra characters beyond the 32-character default
        #[arg(long, default_value = "0")]
        extra: usize,
    },

    /// Stream aggregated random bytes to stdout (pipe-friendly)
    Stream {
        /// Total bytes (0 = infinite)
        #[arg(long, default_value = "0")]
        bytes: usize,

        /// Output format
        #[arg(long, default_value = "raw", value_parser = ["raw", "hex"])]
        format: String,

        /// Weight of the OS CSPRNG in the blend
        #[arg(long, default_value = "3")]
        os_weight: u32,

        /// Weight of the jitter generator in the blend
        #[arg(long, default_value = "1")]
        jitter_weight: u32,
    },

    /// Show jitter pool occupancy; optionally wait for a full pool
    Pool {
        /// Keep sampling until the pool reaches capacity
        #[arg(long)]
        watch: bool,

        /// Emit machine-readable status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dispersion smoke test of the jitter generator
    Bench {
        /// Number of 16-bit reads
        #[arg(long, default_value = "1000")]
        rounds: usize,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Token { count, extra } => commands::token::run(count, extra),
        Commands::Stream {
            bytes,
            format,
            os_weight,
            jitter_weight,
        } => commands::stream::run(bytes, &format, os_weight, jitter_weight),
        Commands::Pool { watch, json } => commands::pool::run(watch, json),
        Commands::Bench { rounds } => commands::bench::run(rounds),
    }
}
