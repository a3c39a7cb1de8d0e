//! Wire-contract tests: the defensive parse of model output must accept
//! exactly the schema shape and nothing less.

use health_compass::error::CompassError;
use health_compass::schemas::{HealthAssessmentResponse, UrgencyLevel};

fn well_formed() -> String {
    r#"{
        "summary": "Your symptoms are consistent with a tension headache.",
        "urgency": "MODERATE",
        "potentialConditions": [
            {
                "name": "Tension headache",
                "probability": "High",
                "description": "Muscle-related head pain.",
                "reasoning": "Bilateral pressure without aura."
            },
            {
                "name": "Migraine",
                "probability": "Moderate",
                "description": "Neurological headache disorder.",
                "reasoning": "Duration fits, photophobia absent."
            },
            {
                "name": "Dehydration",
                "probability": "Low",
                "description": "Insufficient fluid intake.",
                "reasoning": "Reported low water intake."
            }
        ],
        "recommendedActions": ["Rest in a quiet room", "Drink water", "Consider OTC analgesics"],
        "lifestyleTips": ["Keep a headache diary", "Regular sleep schedule"],
        "disclaimer": "This is not a medical diagnosis."
    }"#
    .to_string()
}

#[test]
fn well_formed_response_preserves_count_and_order() {
    let response = HealthAssessmentResponse::from_model_text(&well_formed()).unwrap();

    assert_eq!(response.urgency, UrgencyLevel::Moderate);

    // Exact count and order as supplied — no reordering, no filtering.
    let names: Vec<&str> = response
        .potential_conditions
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, ["Tension headache", "Migraine", "Dehydration"]);

    assert_eq!(
        response.recommended_actions,
        [
            "Rest in a quiet room",
            "Drink water",
            "Consider OTC analgesics"
        ]
    );
    assert_eq!(
        response.lifestyle_tips,
        ["Keep a headache diary", "Regular sleep schedule"]
    );
}

#[test]
fn empty_lists_are_valid() {
    let text = r#"{
        "summary": "s",
        "urgency": "LOW",
        "potentialConditions": [],
        "recommendedActions": [],
        "lifestyleTips": [],
        "disclaimer": "d"
    }"#;
    let response = HealthAssessmentResponse::from_model_text(text).unwrap();
    assert!(response.potential_conditions.is_empty());
}

#[test]
fn missing_disclaimer_is_a_schema_violation() {
    let text = r#"{
        "summary": "s",
        "urgency": "LOW",
        "potentialConditions": [],
        "recommendedActions": [],
        "lifestyleTips": []
    }"#;
    let res = HealthAssessmentResponse::from_model_text(text);
    assert!(matches!(res, Err(CompassError::Schema { .. })));
}

#[test]
fn empty_disclaimer_is_a_schema_violation() {
    let text = r#"{
        "summary": "s",
        "urgency": "LOW",
        "potentialConditions": [],
        "recommendedActions": [],
        "lifestyleTips": [],
        "disclaimer": ""
    }"#;
    let res = HealthAssessmentResponse::from_model_text(text);
    assert!(matches!(res, Err(CompassError::Schema { .. })));
}

#[test]
fn condition_missing_a_field_is_a_schema_violation() {
    // "reasoning" absent from the nested object.
    let text = r#"{
        "summary": "s",
        "urgency": "HIGH",
        "potentialConditions": [
            { "name": "X", "probability": "High", "description": "d" }
        ],
        "recommendedActions": [],
        "lifestyleTips": [],
        "disclaimer": "d"
    }"#;
    let res = HealthAssessmentResponse::from_model_text(text);
    assert!(matches!(res, Err(CompassError::Schema { .. })));
}

#[test]
fn unknown_urgency_is_a_schema_violation() {
    let text = r#"{
        "summary": "s",
        "urgency": "SEVERE",
        "potentialConditions": [],
        "recommendedActions": [],
        "lifestyleTips": [],
        "disclaimer": "d"
    }"#;
    let res = HealthAssessmentResponse::from_model_text(text);
    assert!(matches!(res, Err(CompassError::Schema { .. })));
}

#[test]
fn non_json_payload_is_a_schema_violation() {
    let res = HealthAssessmentResponse::from_model_text("I'm sorry, I can't help with that.");
    assert!(matches!(res, Err(CompassError::Schema { .. })));
}

#[test]
fn fenced_payload_is_tolerated() {
    let fenced = format!("```json\n{}\n```", well_formed());
    let response = HealthAssessmentResponse::from_model_text(&fenced).unwrap();
    assert_eq!(response.potential_conditions.len(), 3);
}
