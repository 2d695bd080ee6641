//! Encryption utilities for storing bot tokens at rest.
//!
//! AES-256-GCM with a random per-record nonce. The key is derived from the
//! configured passphrase via HMAC-SHA256 with a domain-separation context.
//!
//! Ciphertext format: nonce (12 bytes) || AES-GCM ciphertext+tag, base64 in
//! the stored JSON.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur during encryption operations
#[derive(Error, Debug)]
pub enum EncryptionError {
    #[error("Invalid ciphertext: too short")]
    CiphertextTooShort,

    #[error("Invalid ciphertext: not valid base64")]
    InvalidEncoding,

    #[error("Decryption failed: wrong key or corrupted data")]
    DecryptionFailed,
}

/// Derive a 32-byte key from a passphrase using HMAC-SHA256 with an
/// application-specific context string for domain separation.
fn derive_key(passphrase: &str) -> [u8; 32] {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(passphrase.as_bytes())
        .expect("HMAC-SHA256 accepts any key length");
    mac.update(b"update-depot/bot-token-encryption/aes-256-gcm/v1");
    mac.finalize().into_bytes().into()
}

/// AES-256-GCM token encryption.
pub struct TokenEncryption {
    key: [u8; 32],
}

impl TokenEncryption {
    /// Create from a passphrase.
    pub fn from_passphrase(passphrase: &str) -> Self {
        Self {
            key: derive_key(passphrase),
        }
    }

    /// Encrypt plaintext, returning nonce (12 bytes) || ciphertext+tag.
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .expect("AES-256-GCM key length is always 32 bytes");

        // Random 96-bit nonce per record
        let nonce_bytes: [u8; 12] = rand::random();
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .expect("AES-256-GCM encryption should not fail with valid key and nonce");

        let mut result = Vec::with_capacity(12 + ciphertext.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&ciphertext);
        result
    }

    /// Decrypt nonce-prefixed ciphertext.
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        // Minimum size: nonce (12) + tag (16)
        if data.len() < 28 {
            return Err(EncryptionError::CiphertextTooShort);
        }

        let nonce = Nonce::from_slice(&data[0..12]);
        let ciphertext = &data[12..];

        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .expect("AES-256-GCM key length is always 32 bytes");
        cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| EncryptionError::DecryptionFailed)
    }
}

/// Encrypt a bot token for JSON storage (base64 of nonce || ciphertext).
pub fn encrypt_token(token: &str, passphrase: &str) -> String {
    let encryptor = TokenEncryption::from_passphrase(passphrase);
    let ciphertext = encryptor.encrypt(token.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(ciphertext)
}

/// Decrypt a stored bot token.
pub fn decrypt_token(encoded: &str, passphrase: &str) -> Result<String, EncryptionError> {
    let data = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| EncryptionError::InvalidEncoding)?;
    let encryptor = TokenEncryption::from_passphrase(passphrase);
    let plaintext = encryptor.decrypt(&data)?;
    String::from_utf8(plaintext).map_err(|_| EncryptionError::DecryptionFailed)
}
