//! Prompt template management.
//!
//! Templates live in `templates/prompts/` and use Jinja2 syntax. They are
//! compiled in as defaults and can be overridden from a directory at startup
//! (`PROMPT_TEMPLATE_DIR`).

pub mod engine;

pub use engine::{PromptEngine, TemplateError};

/// Shared system prompt wrapping every intake flow
pub const SYSTEM_TEMPLATE: &str = "intake/system.jinja";
