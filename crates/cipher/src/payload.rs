//! Encrypted payload transport type.

use ideaforge_core::{AppError, AppResult};
use serde::{Deserialize, Deserializer, Serialize};

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// An encrypted prompt as handed to clients.
///
/// All three fields are lowercase hexadecimal. A field that is absent, null or
/// not a string deserializes as `None`, so shape problems surface from
/// [`EncryptedPayload::validate`] rather than from the JSON layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    #[serde(default, deserialize_with = "text_field")]
    pub iv: Option<String>,

    #[serde(default, deserialize_with = "text_field")]
    pub ciphertext: Option<String>,

    #[serde(rename = "authTag", default, deserialize_with = "text_field")]
    pub auth_tag: Option<String>,
}

/// Binary form of a payload whose shape has been validated.
#[derive(Debug)]
pub(crate) struct DecodedPayload {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

impl EncryptedPayload {
    pub(crate) fn from_parts(nonce: &[u8], ciphertext: &[u8], tag: &[u8]) -> Self {
        Self {
            iv: Some(hex::encode(nonce)),
            ciphertext: Some(hex::encode(ciphertext)),
            auth_tag: Some(hex::encode(tag)),
        }
    }

    /// Validate the payload shape and decode it from hex.
    ///
    /// Fails with [`AppError::Validation`] when any field is missing, when the
    /// nonce or tag has the wrong length, or when any field is not
    /// hexadecimal. Nothing is decrypted here.
    pub(crate) fn decode(&self) -> AppResult<DecodedPayload> {
        let nonce = decode_fixed::<NONCE_LEN>("iv", required("iv", &self.iv)?)?;
        let tag = decode_fixed::<TAG_LEN>("authTag", required("authTag", &self.auth_tag)?)?;

        // Empty plaintext seals to empty ciphertext, so only the encoding is checked
        let ciphertext = hex::decode(required("ciphertext", &self.ciphertext)?).map_err(|e| {
            AppError::Validation(format!("Payload field 'ciphertext' is not hex: {}", e))
        })?;

        Ok(DecodedPayload {
            nonce,
            ciphertext,
            tag,
        })
    }

    /// Check the payload shape without keeping the decoded bytes.
    pub fn validate(&self) -> AppResult<()> {
        self.decode().map(|_| ())
    }
}

/// Field value as it appears on the wire: a string, or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireField {
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<WireField>::deserialize(deserializer)? {
        Some(WireField::Text(text)) => Some(text),
        Some(WireField::Other(_)) | None => None,
    })
}

fn required<'a>(field: &str, value: &'a Option<String>) -> AppResult<&'a str> {
    value.as_deref().ok_or_else(|| {
        AppError::Validation(format!(
            "Payload field '{}' is missing or not a string",
            field
        ))
    })
}

fn decode_fixed<const N: usize>(field: &str, value: &str) -> AppResult<[u8; N]> {
    let bytes = hex::decode(value)
        .map_err(|e| AppError::Validation(format!("Payload field '{}' is not hex: {}", field, e)))?;

    bytes.try_into().map_err(|bytes: Vec<u8>| {
        AppError::Validation(format!(
            "Payload field '{}' must be {} bytes, got {}",
            field,
            N,
            bytes.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well_formed() -> EncryptedPayload {
        EncryptedPayload {
            iv: Some("00".repeat(NONCE_LEN)),
            ciphertext: Some("abcdef".to_string()),
            auth_tag: Some("11".repeat(TAG_LEN)),
        }
    }

    fn parse(json: &str) -> EncryptedPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_json_uses_auth_tag_camel_case() {
        let json = serde_json::to_value(well_formed()).unwrap();
        assert!(json.get("authTag").is_some());
        assert!(json.get("auth_tag").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let json = serde_json::to_string(&well_formed()).unwrap();
        assert_eq!(parse(&json), well_formed());
    }

    #[test]
    fn test_missing_tag_deserializes_then_fails_validation() {
        let payload = parse(r#"{"iv": "000000000000000000000000", "ciphertext": "ab"}"#);
        assert!(payload.auth_tag.is_none());
        assert!(matches!(payload.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_missing_ciphertext_rejected() {
        let payload = parse(&format!(
            r#"{{"iv": "{}", "authTag": "{}"}}"#,
            "00".repeat(NONCE_LEN),
            "11".repeat(TAG_LEN)
        ));
        assert!(payload.ciphertext.is_none());

        let err = payload.validate().unwrap_err();
        assert!(err.to_string().contains("'ciphertext' is missing"));
    }

    #[test]
    fn test_non_string_fields_deserialize_as_missing() {
        for json in [
            r#"{"iv": null, "ciphertext": "ab", "authTag": "00"}"#,
            r#"{"iv": 123, "ciphertext": "ab", "authTag": "00"}"#,
            r#"{"iv": ["00"], "ciphertext": {"x": 1}, "authTag": true}"#,
        ] {
            let payload = parse(json);
            assert!(payload.iv.is_none(), "{}", json);
            assert!(matches!(payload.validate(), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_well_formed_payload_validates() {
        assert!(well_formed().validate().is_ok());
    }

    #[test]
    fn test_wrong_nonce_length_rejected() {
        let mut payload = well_formed();
        payload.iv = Some("00".repeat(16));
        let err = payload.validate().unwrap_err();
        assert!(err.to_string().contains("'iv' must be 12 bytes"));
    }

    #[test]
    fn test_empty_nonce_rejected() {
        let mut payload = well_formed();
        payload.iv = Some(String::new());
        assert!(matches!(payload.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_hex_tag_rejected() {
        let mut payload = well_formed();
        payload.auth_tag = Some("zz".repeat(TAG_LEN));
        assert!(matches!(payload.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_empty_ciphertext_is_well_formed() {
        let mut payload = well_formed();
        payload.ciphertext = Some(String::new());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_odd_length_ciphertext_rejected() {
        let mut payload = well_formed();
        payload.ciphertext = Some("abc".to_string());
        assert!(matches!(payload.validate(), Err(AppError::Validation(_))));
    }
}
