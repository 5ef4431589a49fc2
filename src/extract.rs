use std::io::{ErrorKind, Read};

use crate::error::{ManifestError, Result};

const CHUNK: usize = 8 * 1024;

/// Read exactly `length` bytes starting at `offset` from a sequential stream.
///
/// Bytes before `offset` are read and discarded, since archive entry streams
/// cannot seek. Running out of input before `offset + length` is a
/// [`ManifestError::LicenseTextRead`], never a silent truncation.
pub fn extract_range<R: Read>(reader: &mut R, offset: u64, length: usize) -> Result<Vec<u8>> {
    let mut scratch = [0u8; CHUNK];

    let mut remaining = offset;
    while remaining > 0 {
        let want = remaining.min(CHUNK as u64) as usize;
        let n = read_some(reader, &mut scratch[..want])?;
        remaining -= n as u64;
    }

    // `length` is untrusted; the buffer grows only as bytes arrive.
    let mut out = Vec::with_capacity(length.min(CHUNK));
    while out.len() < length {
        let want = (length - out.len()).min(CHUNK);
        let n = read_some(reader, &mut scratch[..want])?;
        out.extend_from_slice(&scratch[..n]);
    }
    Ok(out)
}

/// One `read` call, retried on interruption; zero bytes means the stream ended
/// early.
fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(0) => {
                return Err(ManifestError::LicenseTextRead(std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "license text ended before the requested range",
                )))
            }
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ManifestError::LicenseTextRead(e)),
        }
    }
}
