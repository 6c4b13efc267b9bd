use std::io::Write;

use driftpool_core::{Aggregator, ByteSource, Error};

const CHUNK: usize = 4096;

pub fn run(n_bytes: usize, format: &str, os_weight: u32, jitter_weight: u32) {
    let blend = super::make_blend(os_weight, jitter_weight);
    let mut total = 0usize;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    loop {
        if n_bytes > 0 && total >= n_bytes {
            break;
        }
        let want = if n_bytes == 0 {
            CHUNK
        } else {
            CHUNK.min(n_bytes - total)
        };

        let data = match read_chunk(&blend, want) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error reading from blend: {e}");
                std::process::exit(1);
            }
        };
        if data.is_empty() {
            break;
        }

        let write_result = match format {
            "hex" => {
                let hex: String = data.iter().map(|b| format!("{b:02x}")).collect();
                out.write_all(hex.as_bytes())
            }
            _ => out.write_all(&data),
        };

        if write_result.is_err() {
            break; // Broken pipe
        }
        let _ = out.flush();

        total += data.len();
    }
}

/// Read exactly `want` bytes from the blend.
///
/// A request smaller than the blend's total weight floors every per-source
/// share to zero, so the tail is drained by rounding each request up to a
/// weight-aligned length and discarding the surplus. Returns fewer bytes
/// only if the blend stops producing.
fn read_chunk(blend: &Aggregator, want: usize) -> Result<Vec<u8>, Error> {
    let weight = blend.total_weight() as usize;
    let mut out = Vec::with_capacity(want);

    while out.len() < want {
        let need = want - out.len();
        let aligned = need.div_ceil(weight) * weight;
        let mut buf = vec![0u8; aligned];
        let written = blend.read_into(&mut buf)?;
        if written == 0 {
            break;
        }
        out.extend_from_slice(&buf[..written.min(need)]);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstSource(u8);

    impl ByteSource for ConstSource {
        fn read_into(&self, buf: &mut [u8]) -> Result<usize, Error> {
            buf.fill(self.0);
            Ok(buf.len())
        }
    }

    #[test]
    fn read_chunk_serves_requests_below_total_weight() {
        let blend = Aggregator::builder()
            .add(ConstSource(1), 1)
            .add(ConstSource(2), 9)
            .build()
            .unwrap();

        // 3 < total weight 10: a straight fill would deliver nothing.
        assert_eq!(read_chunk(&blend, 3).unwrap().len(), 3);
    }

    #[test]
    fn read_chunk_serves_unaligned_tails() {
        let blend = Aggregator::builder()
            .add(ConstSource(1), 3)
            .add(ConstSource(2), 1)
            .build()
            .unwrap();

        for want in [1usize, 5, 7, 63, 4095] {
            assert_eq!(read_chunk(&blend, want).unwrap().len(), want, "want {want}");
        }
    }

    #[test]
    fn read_chunk_stops_on_dead_blend() {
        struct DeadSource;
        impl ByteSource for DeadSource {
            fn read_into(&self, _buf: &mut [u8]) -> Result<usize, Error> {
                Ok(0)
            }
        }

        let blend = Aggregator::builder().add(DeadSource, 1).build().unwrap();
        assert!(read_chunk(&blend, 16).unwrap().is_empty());
    }
}
