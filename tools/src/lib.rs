//! Shared plumbing for the command line tools: getting raw tag bytes out of
//! a file or stdin, undoing the gzip envelope most files on disk carry.

use std::io::{self, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use log::debug;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Whether `data` starts with the gzip magic number.
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Decompress `data` if it is gzipped, otherwise hand it back as is.
pub fn maybe_gunzip(data: Vec<u8>) -> io::Result<Vec<u8>> {
    if !is_gzip(&data) {
        return Ok(data);
    }

    let mut out = vec![];
    GzDecoder::new(data.as_slice()).read_to_end(&mut out)?;
    debug!("gunzipped {} bytes into {}", data.len(), out.len());
    Ok(out)
}

/// Read all of `path`, or stdin when there is no path, and strip any gzip
/// envelope.
pub fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
    let data = match path {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut buf = vec![];
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    maybe_gunzip(data)
}
