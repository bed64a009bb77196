//! Plumbing for schema-validated calls to a hosted language model.
//!
//! - [`client`]: the `LanguageModel` seam and its TensorZero implementation
//! - [`parser`]: tolerant JSON extraction and repair for raw model text
//! - [`response`]: the output contract every flow response implements
//! - [`flow`]: `PromptFlow`, which ties input contract, template, and output
//!   contract together into one callable

pub mod client;
pub mod flow;
pub mod parser;
pub mod response;

pub use client::{LanguageModel, LlmError, TensorZeroModel};
pub use flow::{FlowDefinition, FlowError, FlowInput, ModelOutputError, PromptFlow};
pub use response::LlmResponse;
