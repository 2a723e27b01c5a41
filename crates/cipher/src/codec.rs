//! AES-256-GCM codec for prompt text.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use ideaforge_core::{AppError, AppResult, PromptKey};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

use crate::key::{decode_key, KEY_LEN};
use crate::payload::{EncryptedPayload, NONCE_LEN, TAG_LEN};

/// Symmetric AEAD codec bound to one 32-byte key.
///
/// Construction is the only place the key length is checked. Keys are never
/// truncated or padded.
#[derive(Clone)]
pub struct PromptCipher {
    cipher: Aes256Gcm,
}

impl PromptCipher {
    /// Build a codec from raw key bytes.
    ///
    /// # Errors
    /// [`AppError::InvalidKey`] unless `key.len() == 32`.
    pub fn new(key: &[u8]) -> AppResult<Self> {
        if key.len() != KEY_LEN {
            return Err(AppError::InvalidKey { len: key.len() });
        }

        let cipher =
            Aes256Gcm::new_from_slice(key).map_err(|_| AppError::InvalidKey { len: key.len() })?;

        Ok(Self { cipher })
    }

    /// Build a codec from the configured base64 key.
    pub fn from_prompt_key(key: &PromptKey) -> AppResult<Self> {
        let bytes = decode_key(key)?;
        Self::new(&bytes)
    }

    /// Encrypt UTF-8 text under a fresh random nonce.
    pub fn encrypt(&self, plaintext: &str) -> AppResult<EncryptedPayload> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let mut sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| AppError::Validation("Plaintext too large to encrypt".to_string()))?;

        // aes-gcm appends the tag to the ciphertext
        let tag = sealed.split_off(sealed.len() - TAG_LEN);

        tracing::debug!(bytes = sealed.len(), "Encrypted prompt");

        Ok(EncryptedPayload::from_parts(&nonce, &sealed, &tag))
    }

    /// Verify and decrypt a payload.
    ///
    /// # Errors
    /// - [`AppError::Validation`] if the payload shape is malformed
    /// - [`AppError::Authentication`] if the nonce, ciphertext or tag was
    ///   altered, or the payload was sealed under another key
    pub fn decrypt(&self, payload: &EncryptedPayload) -> AppResult<String> {
        let decoded = payload.decode()?;

        let mut sealed = decoded.ciphertext;
        sealed.extend_from_slice(&decoded.tag);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&decoded.nonce), sealed.as_slice())
            .map_err(|_| AppError::Authentication)?;

        String::from_utf8(plaintext)
            .map_err(|_| AppError::Validation("Decrypted prompt is not valid UTF-8".to_string()))
    }
}

impl fmt::Debug for PromptCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::generate_key_base64;

    fn cipher_with(byte: u8) -> PromptCipher {
        PromptCipher::new(&[byte; KEY_LEN]).unwrap()
    }

    fn flip_hex_bit(hex_text: &Option<String>, byte_index: usize, bit: u8) -> Option<String> {
        let mut bytes = hex::decode(hex_text.as_deref().unwrap()).unwrap();
        bytes[byte_index] ^= 1 << bit;
        Some(hex::encode(bytes))
    }

    fn hex_len(field: &Option<String>) -> usize {
        field.as_deref().unwrap().len()
    }

    #[test]
    fn test_round_trip() {
        let cipher = cipher_with(7);
        let plaintexts = [
            "hello",
            "",
            "Idée: cerf-volant solaire ☀️",
            "line one\nline two\r\n",
        ];
        for plaintext in plaintexts {
            let payload = cipher.encrypt(plaintext).unwrap();
            assert_eq!(cipher.decrypt(&payload).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_payload_lengths() {
        let payload = cipher_with(1).encrypt("hello").unwrap();
        assert_eq!(hex_len(&payload.iv), NONCE_LEN * 2);
        assert_eq!(hex_len(&payload.auth_tag), TAG_LEN * 2);
        assert_eq!(hex_len(&payload.ciphertext), "hello".len() * 2);
    }

    #[test]
    fn test_encryption_is_non_deterministic() {
        let cipher = cipher_with(3);
        let first = cipher.encrypt("same text").unwrap();
        let second = cipher.encrypt("same text").unwrap();
        assert_ne!(first.iv, second.iv);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let payload = cipher_with(1).encrypt("hello").unwrap();
        let result = cipher_with(2).decrypt(&payload);
        assert!(matches!(result, Err(AppError::Authentication)));
    }

    #[test]
    fn test_every_ciphertext_bit_flip_detected() {
        let cipher = cipher_with(9);
        let payload = cipher.encrypt("solar kite").unwrap();
        let len = hex_len(&payload.ciphertext) / 2;

        for byte_index in 0..len {
            for bit in 0..8 {
                let mut tampered = payload.clone();
                tampered.ciphertext = flip_hex_bit(&payload.ciphertext, byte_index, bit);
                assert!(matches!(
                    cipher.decrypt(&tampered),
                    Err(AppError::Authentication)
                ));
            }
        }
    }

    #[test]
    fn test_every_tag_bit_flip_detected() {
        let cipher = cipher_with(9);
        let payload = cipher.encrypt("solar kite").unwrap();

        for byte_index in 0..TAG_LEN {
            for bit in 0..8 {
                let mut tampered = payload.clone();
                tampered.auth_tag = flip_hex_bit(&payload.auth_tag, byte_index, bit);
                assert!(matches!(
                    cipher.decrypt(&tampered),
                    Err(AppError::Authentication)
                ));
            }
        }
    }

    #[test]
    fn test_corrupted_nonce_detected() {
        let cipher = cipher_with(4);
        let mut payload = cipher.encrypt("hello").unwrap();
        payload.iv = flip_hex_bit(&payload.iv, 0, 0);
        assert!(matches!(
            cipher.decrypt(&payload),
            Err(AppError::Authentication)
        ));
    }

    #[test]
    fn test_key_length_enforced() {
        for len in [0, 1, 16, 24, 31, 33, 64] {
            let result = PromptCipher::new(&vec![0u8; len]);
            match result {
                Err(AppError::InvalidKey { len: reported }) => assert_eq!(reported, len),
                other => panic!("expected InvalidKey for {} bytes, got {:?}", len, other),
            }
        }
    }

    #[test]
    fn test_from_prompt_key() {
        let key = PromptKey::new(generate_key_base64());
        let cipher = PromptCipher::from_prompt_key(&key).unwrap();
        let payload = cipher.encrypt("hello").unwrap();
        assert_eq!(cipher.decrypt(&payload).unwrap(), "hello");
    }

    #[test]
    fn test_from_prompt_key_short_key() {
        // 16 bytes of zeros, base64
        let key = PromptKey::new("AAAAAAAAAAAAAAAAAAAAAA==");
        assert!(matches!(
            PromptCipher::from_prompt_key(&key),
            Err(AppError::InvalidKey { len: 16 })
        ));
    }
}
