//! Generation parameters.

use ideaforge_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Sampling parameters recognised by the completion executor.
///
/// Both values must lie in `[0, 1]` when set. Unset values leave the
/// backend's defaults in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(rename = "topP", skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl GenerationConfig {
    pub fn new(temperature: Option<f32>, top_p: Option<f32>) -> Self {
        Self { temperature, top_p }
    }

    /// Temperature pinned at zero, used for meta-prompt refinement.
    pub fn deterministic() -> Self {
        Self {
            temperature: Some(0.0),
            top_p: None,
        }
    }

    /// Check both parameters are within `[0, 1]`.
    pub fn validate(&self) -> AppResult<()> {
        check_unit_range("temperature", self.temperature)?;
        check_unit_range("topP", self.top_p)
    }
}

fn check_unit_range(name: &str, value: Option<f32>) -> AppResult<()> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(AppError::Validation(format!(
            "{} must be within [0, 1], got {}",
            name, v
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GenerationConfig::default().validate().is_ok());
        assert!(GenerationConfig::deterministic().validate().is_ok());
    }

    #[test]
    fn test_bounds_inclusive() {
        assert!(GenerationConfig::new(Some(0.0), Some(1.0)).validate().is_ok());
        assert!(GenerationConfig::new(Some(1.0), Some(0.0)).validate().is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(GenerationConfig::new(Some(1.5), None).validate().is_err());
        assert!(GenerationConfig::new(None, Some(-0.1)).validate().is_err());
        assert!(GenerationConfig::new(Some(f32::NAN), None).validate().is_err());
    }

    #[test]
    fn test_serializes_top_p_camel_case() {
        let json = serde_json::to_value(GenerationConfig::new(None, Some(0.9))).unwrap();
        assert!(json.get("topP").is_some());
        assert!(json.get("temperature").is_none());
    }
}
