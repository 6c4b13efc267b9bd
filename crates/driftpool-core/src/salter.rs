//! Token/salt formatter over any byte source.
//!
//! A [`Salter`] consumes raw bytes from a [`ByteSource`] and renders them as
//! text tokens. Source reads go through a small internal reservoir refilled
//! in fixed-size blocks, so sources that legitimately read short (e.g. a
//! weighted aggregator with a floor-rounding tail) still serve tokens of any
//! length.

use std::sync::Mutex;

use crate::aggregator::Aggregator;
use crate::error::Error;
use crate::source::ByteSource;

/// Token characters. 64 entries, so a byte maps with a mask and no modulo
/// bias.
const TOKEN_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Characters in a token when no extra length is requested.
pub const DEFAULT_TOKEN_LEN: usize = 32;

/// Bytes requested from the source per reservoir refill.
const REFILL_BLOCK: usize = 64;

/// Renders random bytes into application-facing credential strings.
pub struct Salter {
    source: Box<dyn ByteSource>,
    reservoir: Mutex<Vec<u8>>,
}

impl Salter {
    pub fn new(source: impl ByteSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            reservoir: Mutex::new(Vec::new()),
        }
    }

    /// Salter over [`Aggregator::secure_set`]. Starts a jitter generator
    /// that stops when the salter is dropped.
    pub fn secure() -> Self {
        Self::new(Aggregator::secure_set())
    }

    /// Produce a token of `DEFAULT_TOKEN_LEN + extra` characters.
    pub fn token(&self, extra: usize) -> Result<String, Error> {
        let raw = self.take(DEFAULT_TOKEN_LEN + extra)?;
        Ok(raw
            .iter()
            .map(|&b| TOKEN_ALPHABET[(b & 0x3f) as usize] as char)
            .collect())
    }

    /// Raw bytes for callers applying their own encoding.
    pub fn bytes(&self, n: usize) -> Result<Vec<u8>, Error> {
        self.take(n)
    }

    /// Drain `n` bytes from the reservoir, refilling from the source in
    /// [`REFILL_BLOCK`]-sized requests. A refill that yields zero bytes means
    /// the source is exhausted; the shortfall is reported against the
    /// original request.
    fn take(&self, n: usize) -> Result<Vec<u8>, Error> {
        let mut reservoir = self.reservoir.lock().unwrap();
        while reservoir.len() < n {
            let mut block = [0u8; REFILL_BLOCK];
            let got = self.source.read_into(&mut block)?;
            if got == 0 {
                return Err(Error::ShortRead {
                    expected: n,
                    got: reservoir.len(),
                });
            }
            reservoir.extend_from_slice(&block[..got]);
        }
        let rest = reservoir.split_off(n);
        Ok(std::mem::replace(&mut *reservoir, rest))
    }
}
