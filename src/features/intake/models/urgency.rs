use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Urgency tiers, most to least urgent. `Unknown` covers anything the model
/// could not place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, ToSchema)]
pub enum UrgencyLevel {
    Emergency,
    High,
    Medium,
    Low,
    Unknown,
}

impl UrgencyLevel {
    pub const ALL: [UrgencyLevel; 5] = [
        UrgencyLevel::Emergency,
        UrgencyLevel::High,
        UrgencyLevel::Medium,
        UrgencyLevel::Low,
        UrgencyLevel::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Emergency => "Emergency",
            UrgencyLevel::High => "High",
            UrgencyLevel::Medium => "Medium",
            UrgencyLevel::Low => "Low",
            UrgencyLevel::Unknown => "Unknown",
        }
    }

    /// Match a model-supplied label against the five tiers.
    /// Surrounding whitespace and letter case are ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency assessment attached to a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UrgencyAssessment {
    pub urgency: UrgencyLevel,

    pub reasoning: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(UrgencyLevel::from_label("High"), Some(UrgencyLevel::High));
        assert_eq!(UrgencyLevel::from_label(" emergency "), Some(UrgencyLevel::Emergency));
        assert_eq!(UrgencyLevel::from_label("Critical"), None);
        assert_eq!(UrgencyLevel::from_label(""), None);
    }

    #[test]
    fn test_serializes_as_variant_name() {
        let json = serde_json::to_string(&UrgencyLevel::Emergency).unwrap();
        assert_eq!(json, "\"Emergency\"");
    }
}
