//! Crypto helpers
//!
//! Thin wrappers over the RustCrypto crates that take and return plain
//! bytes, hex or base64 strings. Every failure is a [`KitError::Crypto`]
//! (or [`KitError::Base64`] for undecodable input).
//!
//! [`KitError::Crypto`]: crate::KitError::Crypto
//! [`KitError::Base64`]: crate::KitError::Base64

mod block;
mod hash;
mod keypair;
mod mac;

pub use block::{
    aes_decrypt, aes_decrypt_b64_key, aes_decrypt_base64, aes_encrypt, aes_encrypt_b64_key,
    aes_encrypt_base64, aes_generate, aes_iv_generate,
};
pub use hash::{md5, md5_file, md5_reader, sha1, sha256, sha256_base64, sha512};
pub use keypair::{
    rsa_decrypt, rsa_decrypt_base64, rsa_encrypt, rsa_encrypt_base64, rsa_generate,
    rsa_oaep_decrypt, rsa_oaep_decrypt_base64, rsa_oaep_encrypt, rsa_oaep_encrypt_base64,
    rsa_sign, rsa_verify,
};
pub use mac::{
    hmac_sha1, hmac_sha1_base64, hmac_sha1_base64_url, hmac_sha1_hex, hmac_sha256,
    hmac_sha256_hex,
};
