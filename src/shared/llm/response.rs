use schemars::gen::SchemaGenerator;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Output contract for a model-backed flow.
///
/// `JsonSchema` describes the shape to the model (embedded in the system
/// prompt); `Validate` re-checks ranges and required text after parsing,
/// since the model is free to ignore the schema.
pub trait LlmResponse: DeserializeOwned + JsonSchema + Validate + Send {
    /// Generate JSON schema string for use in LLM prompts
    fn json_schema_string() -> String {
        let mut gen = SchemaGenerator::default();
        let schema = gen.root_schema_for::<Self>();
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
    }
}
