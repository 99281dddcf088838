//! Response transport compression module
//!
//! Gzip is a transport concern: it is applied after serialization and does
//! not change the payload's logical content.

use flate2::write::GzEncoder;
use flate2::Compression;
use hyper::header::ACCEPT_ENCODING;
use hyper::HeaderMap;
use std::io::Write;

/// Check whether the request advertises gzip support
///
/// Scans `Accept-Encoding` tokens so that quality parameters
/// (`gzip;q=0.8`) still match.
pub fn accepts_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .split(',')
                .filter_map(|token| token.split(';').next())
                .any(|token| token.trim() == "gzip")
        })
}

/// Gzip-compress a serialized response body
pub fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
