//! Authenticated prompt encryption for Ideaforge.
//!
//! Derived prompts are sealed with AES-256-GCM before they are handed to a
//! client, so the client can store and return them without reading them.
//!
//! # Transport format
//!
//! ```text
//! { "iv": <hex, 12 bytes>, "ciphertext": <hex>, "authTag": <hex, 16 bytes> }
//! ```
//!
//! Any modification of the ciphertext, tag or nonce makes decryption fail
//! with [`ideaforge_core::AppError::Authentication`].

pub mod codec;
pub mod key;
pub mod payload;

pub use codec::PromptCipher;
pub use key::{decode_key, generate_key_base64, KEY_LEN};
pub use payload::{EncryptedPayload, NONCE_LEN, TAG_LEN};
