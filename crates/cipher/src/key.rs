//! Key material handling.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ideaforge_core::{AppError, AppResult, PromptKey};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// Decode a configured base64 key into raw bytes.
///
/// The length is not checked here; [`crate::PromptCipher::new`] owns that
/// invariant so a short key is reported as [`AppError::InvalidKey`].
pub fn decode_key(key: &PromptKey) -> AppResult<Zeroizing<Vec<u8>>> {
    STANDARD
        .decode(key.expose().trim())
        .map(Zeroizing::new)
        .map_err(|e| AppError::Config(format!("Prompt key is not valid base64: {}", e)))
}

/// Generate a fresh random key, base64-encoded for configuration.
pub fn generate_key_base64() -> String {
    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
    OsRng.fill_bytes(bytes.as_mut());
    STANDARD.encode(bytes.as_ref())
}
