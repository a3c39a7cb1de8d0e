//! Assessment providers: the pluggable seam between the UI and the
//! generative service.
//!
//! `GeminiProvider` is the real thing — one `generateContent` call per
//! invocation, constrained by the response schema and re-validated locally.
//! `FixtureProvider` is deterministic and offline, for tests and demos.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{CompassError, Result};
use crate::prompts;
use crate::schemas::{
    HealthAssessmentResponse, PotentialCondition, UrgencyLevel, UserHealthData, response_schema,
};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[async_trait]
pub trait AssessmentProvider: Send + Sync {
    /// Run one assessment. Exactly one outbound call; no retry, no caching.
    async fn analyze(&self, data: &UserHealthData) -> Result<HealthAssessmentResponse>;
}

/// Gemini REST implementation
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GeminiProvider {
    pub fn new(
        api_key: String,
        model: String,
        temperature: f32,
        timeout_ms: u64,
    ) -> Result<Self> {
        if crate::config::is_placeholder(&api_key) {
            return Err(CompassError::Config {
                message: "GEMINI_API_KEY is not set".into(),
            });
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| CompassError::Internal {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key,
            model,
            temperature,
        })
    }

    /// Pull the generated text out of the `candidates` envelope.
    fn extract_text(value: &serde_json::Value) -> Option<String> {
        let parts = value
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .as_array()?;
        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("");
        Some(text)
    }
}

#[async_trait]
impl AssessmentProvider for GeminiProvider {
    async fn analyze(&self, data: &UserHealthData) -> Result<HealthAssessmentResponse> {
        let prompt = prompts::assessment_prompt(data);
        debug!(model = %self.model, prompt_chars = prompt.len(), "requesting assessment");

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
                "temperature": self.temperature,
            }
        });

        let url = format!("{}/{}:generateContent", GEMINI_BASE_URL, self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompassError::Service {
                message: format!("Failed to reach assessment service: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(CompassError::Service {
                message: format!("assessment service returned {}: {}", status, body_text),
            });
        }

        let envelope: serde_json::Value =
            response.json().await.map_err(|e| CompassError::Service {
                message: format!("Failed to read service response: {}", e),
            })?;

        let text = Self::extract_text(&envelope).ok_or_else(|| CompassError::Service {
            message: "no candidate text in service response".into(),
        })?;
        if text.trim().is_empty() {
            return Err(CompassError::Service {
                message: "empty candidate text in service response".into(),
            });
        }

        let assessment = HealthAssessmentResponse::from_model_text(&text)?;
        info!(urgency = %assessment.urgency, conditions = assessment.potential_conditions.len(),
              "assessment received");
        Ok(assessment)
    }
}

/// Deterministic, local provider for tests and offline demos (no network).
///
/// It honors the safety rule the prompt demands of the real service: obvious
/// emergency keywords in the narrative force CRITICAL.
pub struct FixtureProvider;

const EMERGENCY_MARKERS: [&str; 6] = [
    "chest pain",
    "stroke",
    "can't breathe",
    "cannot breathe",
    "unconscious",
    "severe bleeding",
];

impl FixtureProvider {
    fn urgency_for(symptoms: &str) -> UrgencyLevel {
        let lowered = symptoms.to_lowercase();
        if EMERGENCY_MARKERS.iter().any(|m| lowered.contains(m)) {
            UrgencyLevel::Critical
        } else {
            UrgencyLevel::Moderate
        }
    }
}

#[async_trait]
impl AssessmentProvider for FixtureProvider {
    async fn analyze(&self, data: &UserHealthData) -> Result<HealthAssessmentResponse> {
        let urgency = Self::urgency_for(&data.symptoms);
        let response = HealthAssessmentResponse {
            summary: format!(
                "Preliminary review of symptoms reported by a {}-year-old, present for {}.",
                data.age, data.duration
            ),
            urgency,
            potential_conditions: vec![PotentialCondition {
                name: "Fixture condition".into(),
                probability: "Moderate".into(),
                description: "Canned response produced without a network call.".into(),
                reasoning: "The fixture provider matches keywords only.".into(),
            }],
            recommended_actions: if urgency == UrgencyLevel::Critical {
                vec!["Call emergency services immediately.".into()]
            } else {
                vec!["Monitor your symptoms and rest.".into()]
            },
            lifestyle_tips: vec!["Stay hydrated.".into()],
            disclaimer: "This fixture output is for testing and is not medical advice.".into(),
        };
        response.validate()?;
        Ok(response)
    }
}

/// Factory: build the provider named by configuration.
///
/// A missing credential is a configuration error for the assessment feature,
/// not for rendering the form — the caller decides whether that is fatal.
pub fn create_provider(config: &Config) -> Result<Arc<dyn AssessmentProvider>> {
    match config.assessment.provider.as_str() {
        "gemini" => {
            let key = config.runtime.gemini_api_key.clone().ok_or_else(|| {
                CompassError::Config {
                    message: "GEMINI_API_KEY is not set; set it or use HC_PROVIDER=fixture".into(),
                }
            })?;
            info!(model = %config.assessment.model, "using Gemini assessment provider");
            Ok(Arc::new(GeminiProvider::new(
                key,
                config.assessment.model.clone(),
                config.assessment.temperature,
                config.assessment.request_timeout_ms,
            )?))
        }
        "fixture" => {
            info!("using deterministic fixture provider (no network)");
            Ok(Arc::new(FixtureProvider))
        }
        other => Err(CompassError::Config {
            message: format!("unknown assessment provider '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(symptoms: &str) -> UserHealthData {
        UserHealthData {
            age: "34".into(),
            gender: "Female".into(),
            symptoms: symptoms.into(),
            duration: "30 minutes".into(),
            history: String::new(),
        }
    }

    #[tokio::test]
    async fn fixture_flags_emergencies_as_critical() {
        let resp = FixtureProvider
            .analyze(&data("sharp chest pain radiating to left arm"))
            .await
            .unwrap();
        assert_eq!(resp.urgency, UrgencyLevel::Critical);
    }

    #[tokio::test]
    async fn fixture_is_moderate_for_mundane_symptoms() {
        let resp = FixtureProvider
            .analyze(&data("mild runny nose"))
            .await
            .unwrap();
        assert_eq!(resp.urgency, UrgencyLevel::Moderate);
        assert!(!resp.disclaimer.is_empty());
    }

    #[test]
    fn gemini_provider_requires_a_real_key() {
        let res = GeminiProvider::new(
            "your-api-key-here".into(),
            "gemini-2.5-flash".into(),
            0.2,
            30_000,
        );
        assert!(matches!(res, Err(CompassError::Config { .. })));
    }

    #[test]
    fn factory_fails_without_credential() {
        let config = Config::default();
        assert!(config.runtime.gemini_api_key.is_none());
        let res = create_provider(&config);
        assert!(matches!(res, Err(CompassError::Config { .. })));
    }

    #[test]
    fn factory_rejects_unknown_provider() {
        let mut config = Config::default();
        config.assessment.provider = "oracle".into();
        assert!(matches!(
            create_provider(&config),
            Err(CompassError::Config { .. })
        ));
    }

    #[test]
    fn candidate_text_is_joined_across_parts() {
        let envelope = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] }
            }]
        });
        assert_eq!(
            GeminiProvider::extract_text(&envelope).unwrap(),
            "{\"a\":1}"
        );
    }
}
