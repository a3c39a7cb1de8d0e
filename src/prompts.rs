//! Prompt construction for the assessment call.
//!
//! One template, assembled per submission: the structured profile, the free
//! text symptom narrative, the assistant persona, and the safety instruction
//! that forces CRITICAL urgency on emergency patterns. The output-format
//! constraint itself rides in the request's response schema, not here.

use crate::schemas::UserHealthData;

/// Non-negotiable safety clause embedded in every prompt. Emergency patterns
/// must override whatever probability the model would otherwise assign.
pub const SAFETY_INSTRUCTION: &str = "ALWAYS prioritize safety. If symptoms suggest an \
emergency (heart attack, stroke, severe trauma), mark urgency as CRITICAL.";

/// Build the natural-language prompt for one assessment.
///
/// Field values are embedded verbatim; an empty history is rendered as
/// "None provided" so the model doesn't guess at a blank.
pub fn assessment_prompt(data: &UserHealthData) -> String {
    let history = if data.history.trim().is_empty() {
        "None provided"
    } else {
        data.history.as_str()
    };

    format!(
        "Analyze the following health information and provide a preliminary assessment.\n\
         \n\
         User Profile:\n\
         - Age: {age}\n\
         - Gender: {gender}\n\
         - Duration of Symptoms: {duration}\n\
         - Medical History: {history}\n\
         \n\
         Symptoms:\n\
         {symptoms}\n\
         \n\
         You are a helpful, empathetic medical AI assistant.\n\
         Analyze the symptoms carefully.\n\
         Identify potential conditions, assess urgency, and provide actionable advice.\n\
         {safety}\n\
         \n\
         Output strictly in JSON format matching the schema.",
        age = data.age,
        gender = data.gender,
        duration = data.duration,
        history = history,
        symptoms = data.symptoms,
        safety = SAFETY_INSTRUCTION,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UserHealthData {
        UserHealthData {
            age: "34".into(),
            gender: "Female".into(),
            symptoms: "sharp chest pain radiating to left arm".into(),
            duration: "30 minutes".into(),
            history: String::new(),
        }
    }

    #[test]
    fn prompt_embeds_profile_and_symptoms() {
        let p = assessment_prompt(&sample());
        assert!(p.contains("Age: 34"));
        assert!(p.contains("Gender: Female"));
        assert!(p.contains("Duration of Symptoms: 30 minutes"));
        assert!(p.contains("sharp chest pain radiating to left arm"));
    }

    #[test]
    fn prompt_always_carries_the_safety_instruction() {
        let p = assessment_prompt(&sample());
        assert!(p.contains(SAFETY_INSTRUCTION));
        assert!(p.contains("CRITICAL"));
    }

    #[test]
    fn empty_history_becomes_none_provided() {
        let p = assessment_prompt(&sample());
        assert!(p.contains("Medical History: None provided"));

        let mut with_history = sample();
        with_history.history = "asthma".into();
        let p = assessment_prompt(&with_history);
        assert!(p.contains("Medical History: asthma"));
        assert!(!p.contains("None provided"));
    }
}
