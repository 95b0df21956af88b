//! Hex digests

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ::md5::Md5;
use ::sha1::Sha1;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256, Sha512};

use crate::error::Result;

fn hex_digest<D: Digest>(data: &[u8]) -> String {
    hex::encode(D::digest(data))
}

pub fn md5(data: impl AsRef<[u8]>) -> String {
    hex_digest::<Md5>(data.as_ref())
}

pub fn sha1(data: impl AsRef<[u8]>) -> String {
    hex_digest::<Sha1>(data.as_ref())
}

pub fn sha256(data: impl AsRef<[u8]>) -> String {
    hex_digest::<Sha256>(data.as_ref())
}

/// SHA-256 digest in standard base64
pub fn sha256_base64(data: impl AsRef<[u8]>) -> String {
    STANDARD.encode(Sha256::digest(data.as_ref()))
}

pub fn sha512(data: impl AsRef<[u8]>) -> String {
    hex_digest::<Sha512>(data.as_ref())
}

/// MD5 of everything `reader` yields, read in 4 KiB chunks
pub fn md5_reader<R: Read>(mut reader: R) -> Result<String> {
    let mut hasher = Md5::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// MD5 of a file's content.
///
/// When the file cannot be opened or read, the MD5 of the path string is
/// returned instead.
pub fn md5_file(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    File::open(path)
        .map_err(Into::into)
        .and_then(md5_reader)
        .unwrap_or_else(|_| md5(path.to_string_lossy().as_bytes()))
}
