//! Input form state: five fields, focus handling, and the required-field gate
//! that keeps incomplete submissions from ever reaching the provider.

use crossterm::event::{KeyCode, KeyEvent};

use crate::schemas::{GENDER_LABELS, UserHealthData};

/// The focusable form fields, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Gender,
    Symptoms,
    Duration,
    History,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Age,
        Field::Gender,
        Field::Symptoms,
        Field::Duration,
        Field::History,
    ];

    pub fn next(self) -> Field {
        match self {
            Field::Age => Field::Gender,
            Field::Gender => Field::Symptoms,
            Field::Symptoms => Field::Duration,
            Field::Duration => Field::History,
            Field::History => Field::Age,
        }
    }

    pub fn prev(self) -> Field {
        match self {
            Field::Age => Field::History,
            Field::Gender => Field::Age,
            Field::Symptoms => Field::Gender,
            Field::Duration => Field::Symptoms,
            Field::History => Field::Duration,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Gender => "Gender",
            Field::Symptoms => "Symptoms",
            Field::Duration => "Duration",
            Field::History => "Medical History (Optional)",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Age => "e.g. 30",
            Field::Gender => "←/→ to change",
            Field::Symptoms => {
                "Describe your symptoms in detail. E.g., 'Sharp pain in lower back, started yesterday...'"
            }
            Field::Duration => "e.g. 2 days, 1 week, just started",
            Field::History => "Any existing conditions, allergies, or medications?",
        }
    }

    /// History is the only optional field.
    pub fn required(self) -> bool {
        !matches!(self, Field::History | Field::Gender)
    }
}

/// Transient form state. Values pass through to [`UserHealthData`] verbatim;
/// the only input shaping is that age accepts digits only.
#[derive(Debug, Clone)]
pub struct SymptomForm {
    pub age: String,
    pub symptoms: String,
    pub duration: String,
    pub history: String,
    gender_idx: usize,
    pub focus: Field,
}

impl Default for SymptomForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SymptomForm {
    pub fn new() -> Self {
        Self {
            age: String::new(),
            symptoms: String::new(),
            duration: String::new(),
            history: String::new(),
            // "Prefer not to say", the form's initial selection
            gender_idx: GENDER_LABELS.len() - 1,
            focus: Field::Age,
        }
    }

    pub fn gender(&self) -> &'static str {
        GENDER_LABELS[self.gender_idx]
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Age => &self.age,
            Field::Gender => self.gender(),
            Field::Symptoms => &self.symptoms,
            Field::Duration => &self.duration,
            Field::History => &self.history,
        }
    }

    /// Apply one key press. The caller gates this on the shell not being busy,
    /// so an in-flight submission freezes the form.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Left if self.focus == Field::Gender => {
                self.gender_idx = (self.gender_idx + GENDER_LABELS.len() - 1) % GENDER_LABELS.len();
            }
            KeyCode::Right if self.focus == Field::Gender => {
                self.gender_idx = (self.gender_idx + 1) % GENDER_LABELS.len();
            }
            KeyCode::Backspace => {
                if let Some(buf) = self.active_buffer_mut() {
                    buf.pop();
                }
            }
            KeyCode::Char(c) => {
                if self.focus == Field::Age && !c.is_ascii_digit() {
                    return;
                }
                if let Some(buf) = self.active_buffer_mut() {
                    buf.push(c);
                }
            }
            _ => {}
        }
    }

    fn active_buffer_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Age => Some(&mut self.age),
            Field::Symptoms => Some(&mut self.symptoms),
            Field::Duration => Some(&mut self.duration),
            Field::History => Some(&mut self.history),
            Field::Gender => None,
        }
    }

    /// Required-field gate: age, symptoms and duration must be non-empty.
    pub fn is_complete(&self) -> bool {
        !self.age.trim().is_empty()
            && !self.symptoms.trim().is_empty()
            && !self.duration.trim().is_empty()
    }

    /// The fields still blocking submission, for the UI to point at.
    pub fn missing_fields(&self) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.age.trim().is_empty() {
            missing.push(Field::Age);
        }
        if self.symptoms.trim().is_empty() {
            missing.push(Field::Symptoms);
        }
        if self.duration.trim().is_empty() {
            missing.push(Field::Duration);
        }
        missing
    }

    /// Snapshot the current values verbatim for one submission.
    pub fn data(&self) -> UserHealthData {
        UserHealthData {
            age: self.age.clone(),
            gender: self.gender().to_string(),
            symptoms: self.symptoms.clone(),
            duration: self.duration.clone(),
            history: self.history.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut SymptomForm, s: &str) {
        for c in s.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn submission_requires_age_symptoms_and_duration() {
        let mut form = SymptomForm::new();
        assert!(!form.is_complete());

        type_str(&mut form, "34");
        form.focus = Field::Symptoms;
        type_str(&mut form, "headache");
        assert!(!form.is_complete(), "duration still missing");

        form.focus = Field::Duration;
        type_str(&mut form, "2 days");
        assert!(form.is_complete(), "history may stay empty");
        assert_eq!(form.missing_fields(), Vec::<Field>::new());
    }

    #[test]
    fn age_accepts_digits_only() {
        let mut form = SymptomForm::new();
        type_str(&mut form, "3a4!");
        assert_eq!(form.age, "34");
    }

    #[test]
    fn gender_cycles_through_fixed_labels() {
        let mut form = SymptomForm::new();
        assert_eq!(form.gender(), "Prefer not to say");
        form.focus = Field::Gender;
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.gender(), "Male");
        form.handle_key(key(KeyCode::Left));
        assert_eq!(form.gender(), "Prefer not to say");
    }

    #[test]
    fn data_snapshot_is_verbatim() {
        let mut form = SymptomForm::new();
        type_str(&mut form, "34");
        form.focus = Field::Symptoms;
        type_str(&mut form, "  headache  ");
        form.focus = Field::Duration;
        type_str(&mut form, "2 days");
        let data = form.data();
        assert_eq!(data.symptoms, "  headache  ", "no normalization");
        assert_eq!(data.gender, "Prefer not to say");
        assert_eq!(data.history, "");
    }

    #[test]
    fn tab_cycles_focus() {
        let mut form = SymptomForm::new();
        assert_eq!(form.focus, Field::Age);
        for _ in 0..Field::ALL.len() {
            form.handle_key(key(KeyCode::Tab));
        }
        assert_eq!(form.focus, Field::Age);
    }
}
