//! Form state snapshot

use super::field::{FieldErrors, Values};

/// Everything a rendering layer needs to draw one form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub values: Values,
    pub errors: FieldErrors,
    /// True while a submission is validating or waiting on the API
    pub is_loading: bool,
    /// Caller-managed; submissions never set it
    pub is_completed: bool,
}

impl FormState {
    pub fn new(values: Values, errors: FieldErrors) -> Self {
        Self {
            values,
            errors,
            is_loading: false,
            is_completed: false,
        }
    }

    /// Set one field's value and clear its error
    pub fn change(&mut self, key: &str, value: serde_json::Value) {
        self.values.insert(key.to_string(), value);
        self.errors.clear_field(key);
    }

    /// Get a field value as text (empty for missing or non-string values)
    pub fn text(&self, key: &str) -> &str {
        self.values
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn create_test_state() -> FormState {
        let values = json!({ "name": "", "email": "a@b.io" })
            .as_object()
            .cloned()
            .unwrap();
        let errors: FieldErrors = [("name", "required"), ("email", "taken")]
            .into_iter()
            .collect();
        FormState::new(values, errors)
    }

    #[test]
    fn test_new_starts_idle() {
        let state = create_test_state();
        assert!(!state.is_loading);
        assert!(!state.is_completed);
    }

    #[test]
    fn test_change_sets_value_and_clears_error() {
        let mut state = create_test_state();
        state.change("name", json!("Alice"));

        assert_eq!(state.text("name"), "Alice");
        assert_eq!(state.errors.get("name"), Some(""));
        assert_eq!(state.errors.get("email"), Some("taken"));
        assert_eq!(state.text("email"), "a@b.io");
    }

    #[test]
    fn test_change_adds_unknown_field() {
        let mut state = FormState::default();
        state.change("age", json!(30));
        assert_eq!(state.values.get("age"), Some(&json!(30)));
        assert_eq!(state.text("age"), "");
    }
}
