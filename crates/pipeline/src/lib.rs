//! Prompt orchestration for Ideaforge.
//!
//! Three orchestrators sit on top of the template, cipher and completion
//! crates:
//!
//! - [`SecurePromptDelivery`] refines a private template through its meta
//!   prompt and returns the result encrypted, for a client to hold.
//! - [`SecurePromptExecution`] takes such a payload back, decrypts it,
//!   injects runtime variables and runs it.
//! - [`CompositeResolver`] resolves a fixed set of interdependent templates
//!   into one prompt and runs it.
//!
//! [`TemplateFlow`] covers the single-template flows.
//!
//! Delivery, composite resolution and single-template flows propagate every
//! error. Execution declines softly (see [`ExecutionOutcome`]) on stale,
//! foreign or tampered payloads, while configuration and backend failures on
//! that path still propagate.

pub mod composite;
pub mod delivery;
pub mod execution;
pub mod flow;
pub mod naming;
pub mod outcome;

pub use composite::{CompositeChain, CompositeResolver};
pub use delivery::SecurePromptDelivery;
pub use execution::SecurePromptExecution;
pub use flow::TemplateFlow;
pub use outcome::{DeclineReason, ExecutionOutcome};
