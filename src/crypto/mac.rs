//! HMAC signatures

use ::sha1::Sha1;
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE},
    Engine as _,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{KitError, Result};

fn sign<M: Mac + hmac::digest::KeyInit>(text: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(key).map_err(KitError::crypto)?;
    mac.update(text);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Raw HMAC-SHA1 bytes
pub fn hmac_sha1(text: impl AsRef<[u8]>, key: &[u8]) -> Result<Vec<u8>> {
    sign::<Hmac<Sha1>>(text.as_ref(), key)
}

pub fn hmac_sha1_hex(text: impl AsRef<[u8]>, key: &[u8]) -> Result<String> {
    hmac_sha1(text, key).map(hex::encode)
}

/// HMAC-SHA1 in URL-safe base64 (padded)
pub fn hmac_sha1_base64_url(text: impl AsRef<[u8]>, key: &[u8]) -> Result<String> {
    hmac_sha1(text, key).map(|sig| URL_SAFE.encode(sig))
}

pub fn hmac_sha1_base64(text: impl AsRef<[u8]>, key: &[u8]) -> Result<String> {
    hmac_sha1(text, key).map(|sig| STANDARD.encode(sig))
}

/// Raw HMAC-SHA256 bytes
pub fn hmac_sha256(text: impl AsRef<[u8]>, key: &[u8]) -> Result<Vec<u8>> {
    sign::<Hmac<Sha256>>(text.as_ref(), key)
}

pub fn hmac_sha256_hex(text: impl AsRef<[u8]>, key: &[u8]) -> Result<String> {
    hmac_sha256(text, key).map(hex::encode)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOX: &str = "The quick brown fox jumps over the lazy dog";

    #[test]
    fn test_hmac_sha1() {
        assert_eq!(
            hmac_sha1_hex(FOX, b"key").unwrap(),
            "de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9"
        );
        assert_eq!(hmac_sha1(FOX, b"key").unwrap().len(), 20);
    }

    #[test]
    fn test_hmac_sha1_base64_variants_share_digest() {
        let standard = hmac_sha1_base64(FOX, b"key").unwrap();
        let url = hmac_sha1_base64_url(FOX, b"key").unwrap();
        assert_eq!(standard.replace('+', "-").replace('/', "_"), url);
        assert_eq!(STANDARD.decode(&standard).unwrap(), hmac_sha1(FOX, b"key").unwrap());
    }

    #[test]
    fn test_hmac_sha256() {
        assert_eq!(
            hmac_sha256_hex(FOX, b"key").unwrap(),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn test_empty_key_is_accepted() {
        assert_eq!(hmac_sha256("data", b"").unwrap().len(), 32);
    }
}
