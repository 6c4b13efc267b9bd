//! Weighted aggregation of byte sources into one stream.
//!
//! An [`Aggregator`] holds an ordered list of `(source, weight)` pairs, built
//! once through [`AggregatorBuilder`] and immutable afterward. Each `fill`
//! partitions the output buffer proportionally to weight, in insertion order,
//! and reads every segment from its source sequentially.

use std::fmt;

use log::warn;

use crate::error::{Error, FillError};
use crate::generator::JitterPool;
use crate::source::{ByteSource, OsRandom};

struct WeightedSource {
    source: Box<dyn ByteSource>,
    weight: u32,
}

/// Accumulates `(source, weight)` pairs in call order.
///
/// Weights are validated at [`AggregatorBuilder::build`]: the set must be
/// non-empty and every weight positive.
#[derive(Default)]
pub struct AggregatorBuilder {
    sources: Vec<WeightedSource>,
}

impl AggregatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source with its relative weight. Chainable; order is
    /// significant and determines which sub-range of the output each source
    /// fills.
    pub fn add(mut self, source: impl ByteSource + 'static, weight: u32) -> Self {
        self.sources.push(WeightedSource {
            source: Box::new(source),
            weight,
        });
        self
    }

    /// Finalize into an immutable [`Aggregator`].
    pub fn build(self) -> Result<Aggregator, Error> {
        if self.sources.is_empty() {
            return Err(Error::NoSources);
        }
        if self.sources.iter().any(|s| s.weight == 0) {
            return Err(Error::ZeroWeight);
        }
        let total_weight = self.sources.iter().map(|s| u64::from(s.weight)).sum();
        Ok(Aggregator {
            sources: self.sources,
            total_weight,
        })
    }
}

/// Immutable, ordered set of weighted byte sources.
///
/// `fill` itself holds no lock; the source list never changes after
/// construction, so concurrent fills are as safe as the configured sources
/// make them.
pub struct Aggregator {
    sources: Vec<WeightedSource>,
    total_weight: u64,
}

impl Aggregator {
    pub fn builder() -> AggregatorBuilder {
        AggregatorBuilder::new()
    }

    /// The recommended blend for security-sensitive callers: the OS CSPRNG
    /// carrying most of the stream, seasoned with a freshly started jitter
    /// generator. The generator's harvester stops when the aggregator is
    /// dropped.
    pub fn secure_set() -> Self {
        Self::builder()
            .add(OsRandom, 3)
            .add(JitterPool::start(), 1)
            .build()
            .expect("secure set has sources with positive weights")
    }

    /// Number of configured sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Sum of all source weights.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Fill `buf` from all sources, each serving `floor(len * weight / total)`
    /// bytes of the next contiguous sub-range, in insertion order.
    ///
    /// On success returns `buf.len()`. When the weights do not divide the
    /// length evenly the trailing `len - Σ count_i` bytes are left untouched;
    /// this floor-rounding shortfall is deliberate policy, never compensated
    /// by earlier sources. Callers wanting an exact fill should use a length
    /// that is a multiple of [`Aggregator::total_weight`].
    ///
    /// A source that comes up short or fails outright aborts the fill; the
    /// returned [`FillError`] carries the cumulative count already placed.
    /// Bytes beyond that offset are untouched.
    pub fn fill(&self, buf: &mut [u8]) -> Result<usize, FillError> {
        let len = buf.len();
        let mut pos = 0usize;

        for (index, ws) in self.sources.iter().enumerate() {
            let count = self.share(len, ws.weight);
            let segment = &mut buf[pos..pos + count];
            match ws.source.read_into(segment) {
                Ok(n) if n == count => pos += count,
                Ok(n) => {
                    warn!("aggregator source {index} short: expected {count}, got {n}");
                    return Err(FillError {
                        filled: pos + n,
                        index,
                        cause: Error::ShortRead {
                            expected: count,
                            got: n,
                        },
                    });
                }
                Err(cause) => {
                    warn!("aggregator source {index} failed after {pos} bytes: {cause}");
                    return Err(FillError {
                        filled: pos,
                        index,
                        cause,
                    });
                }
            }
        }

        Ok(len)
    }

    /// Bytes a fully successful `fill` of a `len`-byte buffer actually
    /// writes: `Σ floor(len * weight_i / total)`.
    pub fn partitioned_len(&self, len: usize) -> usize {
        self.sources
            .iter()
            .map(|ws| self.share(len, ws.weight))
            .sum()
    }

    fn share(&self, len: usize, weight: u32) -> usize {
        ((len as u64 * u64::from(weight)) / self.total_weight) as usize
    }
}

impl fmt::Debug for Aggregator {
    /// Boxed sources carry no useful `Debug` of their own; report the shape.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator")
            .field("sources", &self.sources.len())
            .field("total_weight", &self.total_weight)
            .finish()
    }
}

impl ByteSource for Aggregator {
    /// Source view of the aggregator, so aggregators nest.
    ///
    /// Unlike [`Aggregator::fill`], the count returned here is the number of
    /// bytes actually written: the floor-rounding tail and any per-source
    /// shortfall surface as a trait-level short read. Hard source failures
    /// propagate as errors.
    fn read_into(&self, buf: &mut [u8]) -> Result<usize, Error> {
        match self.fill(buf) {
            Ok(_) => Ok(self.partitioned_len(buf.len())),
            Err(FillError {
                filled,
                cause: Error::ShortRead { .. },
                ..
            }) => Ok(filled),
            Err(FillError { cause, .. }) => Err(cause),
        }
    }
}
