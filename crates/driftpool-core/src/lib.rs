//! # driftpool-core
//!
//! Unpredictable byte streams for security-sensitive use (tokens, salts),
//! built from OS scheduler noise and whatever other randomness you trust.
//!
//! ## Quick start
//!
//! ```no_run
//! use driftpool_core::{Aggregator, Salter};
//!
//! // OS CSPRNG blended with a background jitter harvester.
//! let aggr = Aggregator::secure_set();
//! let mut buf = [0u8; 64];
//! aggr.fill(&mut buf).expect("fill");
//!
//! // Or go straight to tokens.
//! let salter = Salter::secure();
//! let token = salter.token(0).expect("token");
//! assert_eq!(token.len(), 32);
//! ```
//!
//! ## Architecture
//!
//! Jitter harvester → bounded pool → weighted aggregator → consumers
//!
//! - [`JitterPool`] runs a background thread that turns sleep/wake timing
//!   deltas into pool bytes, with XOR overflow mixing once the pool is full.
//! - [`Aggregator`] partitions each fill across its sources proportionally
//!   to configured weights, deterministically, in insertion order.
//! - [`Salter`] renders bytes from any source into text tokens.
//!
//! Everything that produces bytes implements [`ByteSource`], so the pieces
//! compose freely and tests can substitute deterministic fakes.

pub mod aggregator;
pub mod error;
pub mod generator;
pub mod salter;
pub mod source;

pub use aggregator::{Aggregator, AggregatorBuilder};
pub use error::{Error, FillError};
pub use generator::{BASE_SLEEP, JitterPool, POOL_SIZE, PoolStatus};
pub use salter::{DEFAULT_TOKEN_LEN, Salter};
pub use source::{ByteSource, OsRandom};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
