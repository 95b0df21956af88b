//! AES-CBC with PKCS#7 padding
//!
//! The key length picks the variant: 16, 24 or 32 bytes for AES-128/192/256.
//! The IV is always 16 bytes.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;

use crate::error::{KitError, Result};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes192CbcEnc = cbc::Encryptor<aes::Aes192>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes192CbcDec = cbc::Decryptor<aes::Aes192>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const IV_LEN: usize = 16;

fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut buf);
    buf
}

/// Random AES key of 128, 192 or 256 bits
pub fn aes_generate(bits: usize) -> Result<Vec<u8>> {
    match bits {
        128 | 192 | 256 => Ok(random_bytes(bits / 8)),
        _ => Err(KitError::crypto(format!(
            "key size must be 128, 192 or 256 bits, got {bits}"
        ))),
    }
}

/// Random 16-byte IV
pub fn aes_iv_generate() -> Vec<u8> {
    random_bytes(IV_LEN)
}

fn encrypt_with<C>(plain: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>>
where
    C: KeyIvInit + BlockEncryptMut,
{
    let cipher = C::new_from_slices(key, iv).map_err(|_| invalid_key_or_iv(key, iv))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plain))
}

fn decrypt_with<C>(cipher_text: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>>
where
    C: KeyIvInit + BlockDecryptMut,
{
    let cipher = C::new_from_slices(key, iv).map_err(|_| invalid_key_or_iv(key, iv))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(cipher_text)
        .map_err(|_| KitError::crypto("bad padding: wrong key or corrupted ciphertext"))
}

fn invalid_key_or_iv(key: &[u8], iv: &[u8]) -> KitError {
    KitError::crypto(format!(
        "invalid key/iv length: key {} bytes (want 16, 24 or 32), iv {} bytes (want {IV_LEN})",
        key.len(),
        iv.len()
    ))
}

/// Encrypt raw bytes
pub fn aes_encrypt(plain: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    match key.len() {
        16 => encrypt_with::<Aes128CbcEnc>(plain, key, iv),
        24 => encrypt_with::<Aes192CbcEnc>(plain, key, iv),
        32 => encrypt_with::<Aes256CbcEnc>(plain, key, iv),
        _ => Err(invalid_key_or_iv(key, iv)),
    }
}

/// Decrypt raw bytes
pub fn aes_decrypt(cipher_text: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    match key.len() {
        16 => decrypt_with::<Aes128CbcDec>(cipher_text, key, iv),
        24 => decrypt_with::<Aes192CbcDec>(cipher_text, key, iv),
        32 => decrypt_with::<Aes256CbcDec>(cipher_text, key, iv),
        _ => Err(invalid_key_or_iv(key, iv)),
    }
}

/// Encrypt with a string key and IV, returning base64 ciphertext
pub fn aes_encrypt_base64(plain: &[u8], key: &str, iv: &str) -> Result<String> {
    aes_encrypt(plain, key.as_bytes(), iv.as_bytes()).map(|ct| STANDARD.encode(ct))
}

/// Decrypt base64 ciphertext with a string key and IV
pub fn aes_decrypt_base64(cipher_text: &str, key: &str, iv: &str) -> Result<Vec<u8>> {
    let raw = STANDARD.decode(cipher_text)?;
    aes_decrypt(&raw, key.as_bytes(), iv.as_bytes())
}

/// Encrypt with a base64-encoded key and IV
pub fn aes_encrypt_b64_key(plain: &[u8], b64_key: &str, b64_iv: &str) -> Result<Vec<u8>> {
    let key = STANDARD.decode(b64_key)?;
    let iv = STANDARD.decode(b64_iv)?;
    aes_encrypt(plain, &key, &iv)
}

/// Decrypt with a base64-encoded key and IV
pub fn aes_decrypt_b64_key(cipher_text: &[u8], b64_key: &str, b64_iv: &str) -> Result<Vec<u8>> {
    let key = STANDARD.decode(b64_key)?;
    let iv = STANDARD.decode(b64_iv)?;
    aes_decrypt(cipher_text, &key, &iv)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789abcdef";
    const IV: &str = "fedcba9876543210";

    #[test]
    fn test_generate_sizes() {
        assert_eq!(aes_generate(128).unwrap().len(), 16);
        assert_eq!(aes_generate(192).unwrap().len(), 24);
        assert_eq!(aes_generate(256).unwrap().len(), 32);
        assert!(matches!(aes_generate(64), Err(KitError::Crypto { .. })));
        assert_eq!(aes_iv_generate().len(), 16);
    }

    #[test]
    fn test_string_key_roundtrip() {
        let ct = aes_encrypt_base64(b"hello kitbag", KEY, IV).unwrap();
        assert_eq!(STANDARD.decode(&ct).unwrap().len(), 16);
        assert_eq!(aes_decrypt_base64(&ct, KEY, IV).unwrap(), b"hello kitbag");
    }

    #[test]
    fn test_full_block_gets_extra_padding_block() {
        let ct = aes_encrypt(&[1u8; 16], KEY.as_bytes(), IV.as_bytes()).unwrap();
        assert_eq!(ct.len(), 32);
    }

    #[test]
    fn test_every_key_size() {
        for bits in [128, 192, 256] {
            let key = aes_generate(bits).unwrap();
            let iv = aes_iv_generate();
            let b64_key = STANDARD.encode(&key);
            let b64_iv = STANDARD.encode(&iv);
            let ct = aes_encrypt_b64_key(b"payload", &b64_key, &b64_iv).unwrap();
            assert_eq!(aes_decrypt(&ct, &key, &iv).unwrap(), b"payload");
            assert_eq!(aes_decrypt_b64_key(&ct, &b64_key, &b64_iv).unwrap(), b"payload");
        }
    }

    #[test]
    fn test_bad_inputs() {
        let err = aes_encrypt(b"x", b"short", IV.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("key 5 bytes"), "{err}");
        assert!(aes_encrypt(b"x", KEY.as_bytes(), b"iv").is_err());
        assert!(matches!(
            aes_decrypt_base64("%%%", KEY, IV),
            Err(KitError::Base64(_))
        ));
        let ct = aes_encrypt(b"secret", KEY.as_bytes(), IV.as_bytes()).unwrap();
        assert!(aes_decrypt(&ct[..ct.len() - 1], KEY.as_bytes(), IV.as_bytes()).is_err());
    }
}
