//! Soft results of the secure execution path.

use serde::Serialize;
use std::fmt;

/// Why an encrypted prompt was not executed.
///
/// Each reason is a routine client-side condition, not a service fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclineReason {
    /// No prompt key configured
    MissingKey,
    /// Prompt key present but unusable (not base64, not 32 bytes)
    InvalidKey,
    /// Payload fields missing, not hex, or of the wrong length
    MalformedPayload,
    /// Tag verification failed: tampered, or sealed under another key
    AuthenticationFailed,
    /// Decrypted prompt is empty or whitespace
    EmptyPrompt,
}

impl DeclineReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclineReason::MissingKey => "missing_key",
            DeclineReason::InvalidKey => "invalid_key",
            DeclineReason::MalformedPayload => "malformed_payload",
            DeclineReason::AuthenticationFailed => "authentication_failed",
            DeclineReason::EmptyPrompt => "empty_prompt",
        }
    }
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running an encrypted prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The prompt ran; holds the completion text
    Completed(String),
    /// The prompt was not run
    Declined(DeclineReason),
}

impl ExecutionOutcome {
    /// Completion text, or the empty-string sentinel when declined.
    pub fn text(&self) -> &str {
        match self {
            ExecutionOutcome::Completed(text) => text,
            ExecutionOutcome::Declined(_) => "",
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ExecutionOutcome::Completed(text) => text,
            ExecutionOutcome::Declined(_) => String::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ExecutionOutcome::Completed(_))
    }

    pub fn decline_reason(&self) -> Option<DeclineReason> {
        match self {
            ExecutionOutcome::Completed(_) => None,
            ExecutionOutcome::Declined(reason) => Some(*reason),
        }
    }
}
