//! Shared domain types for the assessment contract.
//!
//! This is the vocabulary both sides of the wire agree on: the input the form
//! collects, the response shape the model is constrained to emit, and the
//! local validation that backs up the provider-side schema enforcement.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{CompassError, Result};

/// Bounded urgency scale, totally ordered by severity.
///
/// The wire literals are the four uppercase words; anything else fails
/// deserialization and surfaces as a schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "LOW",
            UrgencyLevel::Moderate => "MODERATE",
            UrgencyLevel::High => "HIGH",
            UrgencyLevel::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate condition suggested by the model. All four fields are
/// mandatory; `probability` is a free-form label ("High", "Moderate"), not a
/// number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PotentialCondition {
    pub name: String,
    pub probability: String,
    pub description: String,
    pub reasoning: String,
}

/// The structured assessment the model must return.
///
/// Field order within the three sequences is meaningful and preserved all the
/// way to the screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAssessmentResponse {
    pub summary: String,
    pub urgency: UrgencyLevel,
    pub potential_conditions: Vec<PotentialCondition>,
    pub recommended_actions: Vec<String>,
    pub lifestyle_tips: Vec<String>,
    pub disclaimer: String,
}

impl HealthAssessmentResponse {
    /// Local invariants the wire schema cannot express.
    ///
    /// The disclaimer is a compliance requirement: an empty string passes
    /// serde but must never be rendered.
    pub fn validate(&self) -> Result<()> {
        if self.disclaimer.trim().is_empty() {
            return Err(CompassError::Schema {
                message: "disclaimer must be non-empty".into(),
            });
        }
        Ok(())
    }

    /// Parse and validate raw model output.
    ///
    /// Provider-side schema enforcement is advisory only, so this path must
    /// reject anything that is not the exact shape. Markdown code fences
    /// around the JSON are tolerated since models emit them in practice.
    pub fn from_model_text(text: &str) -> Result<Self> {
        let cleaned = strip_code_fences(text);
        let parsed: Self = serde_json::from_str(cleaned).map_err(|e| CompassError::Schema {
            message: format!("response does not match assessment schema: {}", e),
        })?;
        parsed.validate()?;
        Ok(parsed)
    }
}

/// Strip a surrounding ```json ... ``` fence if present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// The fixed set of gender labels the form offers.
pub const GENDER_LABELS: [&str; 4] = ["Male", "Female", "Non-binary", "Prefer not to say"];

/// Self-reported input, held in transient UI state and consumed once per
/// submission. Values pass through verbatim; required-field checks live in
/// the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserHealthData {
    pub age: String,
    pub gender: String,
    pub symptoms: String,
    pub duration: String,
    pub history: String,
}

/// Output schema sent with the generation request so the service emits
/// schema-conformant JSON. Mirrors [`HealthAssessmentResponse`] exactly,
/// including the enumerated urgency literals and the required-field lists.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A compassionate summary of the user's situation."
            },
            "urgency": {
                "type": "STRING",
                "enum": ["LOW", "MODERATE", "HIGH", "CRITICAL"],
                "description": "The estimated urgency level of the condition."
            },
            "potentialConditions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "Name of the medical condition." },
                        "probability": { "type": "STRING", "description": "Likelihood (e.g., High, Moderate, Low)." },
                        "description": { "type": "STRING", "description": "Brief description of the condition." },
                        "reasoning": { "type": "STRING", "description": "Why this condition matches the symptoms." }
                    },
                    "required": ["name", "probability", "description", "reasoning"]
                }
            },
            "recommendedActions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Immediate actions the user should take (e.g., go to ER, drink water)."
            },
            "lifestyleTips": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Long-term advice or comfort measures."
            },
            "disclaimer": {
                "type": "STRING",
                "description": "A mandatory medical disclaimer string."
            }
        },
        "required": ["summary", "urgency", "potentialConditions", "recommendedActions", "lifestyleTips", "disclaimer"]
    })
}
