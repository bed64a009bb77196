use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use thiserror::Error;

lazy_static! {
    /// Regex for trailing commas before } or ]
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();

    /// Regex for JavaScript string concatenation ("str1" + "str2")
    static ref JS_STRING_CONCAT_RE: Regex = Regex::new(r#""\s*\+\s*""#).unwrap();
}

/// Repairs slower than this are discarded
const JSON_REPAIR_BUDGET: Duration = Duration::from_secs(5);

/// How much raw text to keep in error messages and debug logs
const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LlmParseError {
    #[error("No JSON object found in model output")]
    NoJson,

    #[error("Model output is not valid JSON for the expected shape: {0}")]
    Malformed(String),
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// Extract a JSON object string from model text.
///
/// Tries in order:
/// 1. fenced block tagged `json`
/// 2. any fenced block
/// 3. the trimmed text itself when it starts with `{`
/// 4. the span from the first `{` to the last `}`
pub fn extract_json_string(text: &str) -> Result<String, LlmParseError> {
    if let Some(after) = text.split("```json").nth(1) {
        let block = after.split("```").next().unwrap_or(after);
        return Ok(block.trim().to_string());
    }

    if let Some(start) = text.find("```") {
        let block_start = start + 3;
        // Skip an optional language tag on the opening fence line
        if let Some(newline_offset) = text[block_start..].find('\n') {
            let json_start = block_start + newline_offset + 1;
            if let Some(end_offset) = text[json_start..].find("```") {
                return Ok(text[json_start..json_start + end_offset].trim().to_string());
            }
        }
    }

    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(text[start..=end].to_string()),
        _ => Err(LlmParseError::NoJson),
    }
}

/// Fix trailing commas in JSON (common LLM mistake)
///
/// Example: `{"name": "John",}` -> `{"name": "John"}`
pub fn fix_trailing_commas(json_str: &str) -> String {
    TRAILING_COMMA_RE.replace_all(json_str, "$1").to_string()
}

/// Merge JavaScript-style string concatenation: `"a" + "b"` -> `"ab"`
pub fn fix_js_string_concatenation(json_str: &str) -> String {
    JS_STRING_CONCAT_RE.replace_all(json_str, "").to_string()
}

/// Run `llm_json` repair, guarding against panics and slow repairs
fn repair_json(json_str: &str) -> Option<String> {
    let started = Instant::now();
    let options = llm_json::RepairOptions::default();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        llm_json::repair_json(json_str, &options)
    }));

    if started.elapsed() > JSON_REPAIR_BUDGET {
        tracing::warn!("JSON repair exceeded its time budget, discarding result");
        return None;
    }

    match result {
        Ok(Ok(repaired)) => Some(repaired),
        Ok(Err(e)) => {
            tracing::debug!("JSON repair failed: {:?}", e);
            None
        }
        Err(_) => {
            tracing::warn!("JSON repair panicked");
            None
        }
    }
}

/// Parse raw model text into `T`.
///
/// Pipeline: extract → direct parse → quick fixes (string concatenation,
/// trailing commas) → `llm_json` repair. Returns the first successful parse.
/// Range and enum checks are not done here; see `PromptFlow`.
pub fn parse_llm_json<T>(text: &str) -> Result<T, LlmParseError>
where
    T: DeserializeOwned,
{
    let json_str = extract_json_string(text)?;
    tracing::debug!("Extracted JSON: {}", preview(&json_str));

    let first_error = match serde_json::from_str::<T>(&json_str) {
        Ok(parsed) => return Ok(parsed),
        Err(e) => e.to_string(),
    };

    let fixed = fix_trailing_commas(&fix_js_string_concatenation(&json_str));
    if let Ok(parsed) = serde_json::from_str::<T>(&fixed) {
        tracing::debug!("JSON parsed after quick fixes");
        return Ok(parsed);
    }

    if let Some(repaired) = repair_json(&json_str) {
        if let Ok(parsed) = serde_json::from_str::<T>(&repaired) {
            tracing::debug!("JSON parsed after llm_json repair");
            return Ok(parsed);
        }
    }

    Err(LlmParseError::Malformed(format!(
        "{} (output: {})",
        first_error,
        preview(&json_str)
    )))
}
