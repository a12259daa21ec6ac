//! Submission failures

use crate::api::ApiError;
use crate::state::FieldErrors;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// A failure that carries field errors for the form to display
#[derive(Debug, Clone, PartialEq)]
pub struct FormException<E> {
    pub errors: E,
}

impl<E> FormException<E> {
    pub fn new(errors: E) -> Self {
        Self { errors }
    }

    pub fn into_errors(self) -> E {
        self.errors
    }
}

impl<E> fmt::Display for FormException<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FORM_EXCEPTION")
    }
}

impl<E: fmt::Debug> std::error::Error for FormException<E> {}

/// Outcome of a failed `process_form` call
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Field errors found by local validation
    #[error(transparent)]
    Validation(#[from] FormException<FieldErrors>),

    /// The server's `validations` payload, exactly as it was sent
    #[error(transparent)]
    ServerValidation(FormException<Value>),

    /// The server rejected the request with a message
    #[error("{0}")]
    Remote(String),

    /// Failure of a shape this crate does not recognize
    #[error(transparent)]
    Unknown(ApiError),

    /// Form values could not be mapped to or from the typed object
    #[error("failed to map form values: {0}")]
    Mapping(#[from] serde_json::Error),
}

impl SubmissionError {
    /// Field errors carried by a local validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmissionError::Validation(e) => Some(&e.errors),
            _ => None,
        }
    }

    /// Raw `validations` payload of a server-side validation failure
    pub fn server_validations(&self) -> Option<&Value> {
        match self {
            SubmissionError::ServerValidation(e) => Some(&e.errors),
            _ => None,
        }
    }

    /// True for local and server field errors alike
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SubmissionError::Validation(_) | SubmissionError::ServerValidation(_)
        )
    }

    /// One message per field, for either kind of validation failure.
    ///
    /// Server payloads are read leniently: a string is kept, a list yields its
    /// first string, anything else its JSON text. A payload that is not an
    /// object yields an empty map.
    pub fn to_field_errors(&self) -> Option<FieldErrors> {
        match self {
            SubmissionError::Validation(e) => Some(e.errors.clone()),
            SubmissionError::ServerValidation(e) => Some(
                e.errors
                    .as_object()
                    .map(|fields| {
                        fields
                            .iter()
                            .map(|(field, v)| (field.as_str(), message_of(v)))
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
            _ => None,
        }
    }

    /// Classify a failed API call.
    ///
    /// Server field errors win over a message; anything else passes through.
    pub fn from_api(err: ApiError) -> Self {
        if let Some(validations) = err.validations() {
            return SubmissionError::ServerValidation(FormException::new(validations.clone()));
        }

        if let Some(message) = err.message() {
            return SubmissionError::Remote(message.to_string());
        }

        SubmissionError::Unknown(err)
    }
}

fn message_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .find_map(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
