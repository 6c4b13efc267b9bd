//! Abstract byte-source trait and the OS CSPRNG wrapper.
//!
//! Everything that produces random bytes — the jitter generator, the OS
//! CSPRNG, a weighted aggregator — implements [`ByteSource`], so consumers
//! never care where the bytes come from.

use crate::error::Error;

/// A producer of random bytes.
///
/// `read_into` fills as much of `buf` as the source can deliver in one call
/// and returns the count written. A return value smaller than `buf.len()` is
/// a *short read*: the source is exhausted or rationing, but not broken.
/// Hard failures (e.g. the OS CSPRNG disappearing) are `Err`.
pub trait ByteSource: Send + Sync {
    /// Attempt to fill `buf`. Returns the number of bytes written.
    fn read_into(&self, buf: &mut [u8]) -> Result<usize, Error>;
}

impl<T: ByteSource + ?Sized> ByteSource for std::sync::Arc<T> {
    fn read_into(&self, buf: &mut [u8]) -> Result<usize, Error> {
        (**self).read_into(buf)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for Box<T> {
    fn read_into(&self, buf: &mut [u8]) -> Result<usize, Error> {
        (**self).read_into(buf)
    }
}

/// The operating system CSPRNG, via the `getrandom` crate.
///
/// Never short: either the whole buffer is filled or the call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl ByteSource for OsRandom {
    fn read_into(&self, buf: &mut [u8]) -> Result<usize, Error> {
        getrandom::fill(buf)?;
        Ok(buf.len())
    }
}
