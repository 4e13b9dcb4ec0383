//! # Blob Compression
//!
//! Archives may publish checkpoint files gzipped. Downloads are stored
//! decompressed in staging, so detection and inflation happen here.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::domain::HistorySyncError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Whether a blob carries the gzip magic.
pub fn is_gzipped(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0..2] == GZIP_MAGIC
}

/// Gzip a blob (archive publication, test fixtures).
pub fn gzip_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    // Writes into a Vec cannot fail.
    let _ = encoder.write_all(bytes);
    encoder.finish().unwrap_or_default()
}

/// Inflate a blob when it is gzipped, pass it through otherwise. A blob
/// that claims to be gzipped but does not inflate is an integrity failure
/// (truncated download) and surfaces as a retryable I/O error.
pub fn maybe_gunzip(bytes: Vec<u8>) -> Result<Vec<u8>, HistorySyncError> {
    if !is_gzipped(&bytes) {
        return Ok(bytes);
    }
    let mut decoder = GzDecoder::new(bytes.as_slice());
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
