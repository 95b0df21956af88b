//! RSA key generation, encryption and PSS signatures
//!
//! Keys travel as DER: PKCS#8 for private keys, SubjectPublicKeyInfo for
//! public keys.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{Oaep, Pkcs1v15Encrypt, Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha512};

use crate::error::{KitError, Result};

/// PSS salt length used for signing and verification
const PSS_SALT_LEN: usize = 16;

fn private_key(der: &[u8]) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_der(der).map_err(KitError::crypto)
}

fn public_key(der: &[u8]) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_der(der).map_err(KitError::crypto)
}

fn oaep(label: &str) -> Oaep {
    Oaep::new_with_label::<Sha512, _>(label)
}

/// Generate a key pair, returned as (PKCS#8 private DER, SPKI public DER)
pub fn rsa_generate(bits: usize) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut rng = rand::thread_rng();
    let private = RsaPrivateKey::new(&mut rng, bits).map_err(KitError::crypto)?;
    let private_der = private.to_pkcs8_der().map_err(KitError::crypto)?;
    let public_der = private
        .to_public_key()
        .to_public_key_der()
        .map_err(KitError::crypto)?;
    Ok((private_der.as_bytes().to_vec(), public_der.as_bytes().to_vec()))
}

/// OAEP (SHA-512) encryption; `label` must match on decryption
pub fn rsa_oaep_encrypt(target: &[u8], public_der: &[u8], label: &str) -> Result<Vec<u8>> {
    let key = public_key(public_der)?;
    key.encrypt(&mut rand::thread_rng(), oaep(label), target)
        .map_err(KitError::crypto)
}

pub fn rsa_oaep_decrypt(target: &[u8], private_der: &[u8], label: &str) -> Result<Vec<u8>> {
    let key = private_key(private_der)?;
    key.decrypt(oaep(label), target).map_err(KitError::crypto)
}

/// PKCS#1 v1.5 encryption
pub fn rsa_encrypt(target: &[u8], public_der: &[u8]) -> Result<Vec<u8>> {
    let key = public_key(public_der)?;
    key.encrypt(&mut rand::thread_rng(), Pkcs1v15Encrypt, target)
        .map_err(KitError::crypto)
}

pub fn rsa_decrypt(target: &[u8], private_der: &[u8]) -> Result<Vec<u8>> {
    let key = private_key(private_der)?;
    key.decrypt(Pkcs1v15Encrypt, target).map_err(KitError::crypto)
}

pub fn rsa_oaep_encrypt_base64(target: &[u8], public_der: &[u8], label: &str) -> Result<String> {
    rsa_oaep_encrypt(target, public_der, label).map(|ct| STANDARD.encode(ct))
}

pub fn rsa_oaep_decrypt_base64(target: &str, private_der: &[u8], label: &str) -> Result<Vec<u8>> {
    rsa_oaep_decrypt(&STANDARD.decode(target)?, private_der, label)
}

pub fn rsa_encrypt_base64(target: &[u8], public_der: &[u8]) -> Result<String> {
    rsa_encrypt(target, public_der).map(|ct| STANDARD.encode(ct))
}

pub fn rsa_decrypt_base64(target: &str, private_der: &[u8]) -> Result<Vec<u8>> {
    rsa_decrypt(&STANDARD.decode(target)?, private_der)
}

/// PSS signature over the SHA-512 digest of `target`
pub fn rsa_sign(target: &[u8], private_der: &[u8]) -> Result<Vec<u8>> {
    let key = private_key(private_der)?;
    let hashed = Sha512::digest(target);
    key.sign_with_rng(
        &mut rand::thread_rng(),
        Pss::new_with_salt::<Sha512>(PSS_SALT_LEN),
        &hashed,
    )
    .map_err(KitError::crypto)
}

/// Check a signature made by [`rsa_sign`]
pub fn rsa_verify(target: &[u8], public_der: &[u8], signature: &[u8]) -> Result<()> {
    let key = public_key(public_der)?;
    let hashed = Sha512::digest(target);
    key.verify(
        Pss::new_with_salt::<Sha512>(PSS_SALT_LEN),
        &hashed,
        signature,
    )
    .map_err(KitError::crypto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    // Key generation is slow in debug builds; share one pair
    static KEYS: Lazy<(Vec<u8>, Vec<u8>)> = Lazy::new(|| rsa_generate(2048).unwrap());

    #[test]
    fn test_oaep_with_label() {
        let (private, public) = &*KEYS;
        let ct = rsa_oaep_encrypt(b"secret", public, "orders").unwrap();
        assert_eq!(rsa_oaep_decrypt(&ct, private, "orders").unwrap(), b"secret");
        assert!(rsa_oaep_decrypt(&ct, private, "other").is_err());
    }

    #[test]
    fn test_pkcs1v15_base64() {
        let (private, public) = &*KEYS;
        let ct = rsa_encrypt_base64(b"hello", public).unwrap();
        assert_eq!(rsa_decrypt_base64(&ct, private).unwrap(), b"hello");

        let ct = rsa_oaep_encrypt_base64(b"hello", public, "").unwrap();
        assert_eq!(rsa_oaep_decrypt_base64(&ct, private, "").unwrap(), b"hello");
    }

    #[test]
    fn test_sign_and_verify() {
        let (private, public) = &*KEYS;
        let sig = rsa_sign(b"message", private).unwrap();
        assert_eq!(sig.len(), 256);
        assert!(rsa_verify(b"message", public, &sig).is_ok());
        assert!(rsa_verify(b"tampered", public, &sig).is_err());
    }

    #[test]
    fn test_garbage_key_is_crypto_error() {
        let err = rsa_encrypt(b"x", b"not a key").unwrap_err();
        assert_eq!(err.code(), "KIT-030");
    }
}
