//! Form controller
//!
//! Owns one form's state and runs submissions against a remote call.
//! State lives in a `watch` channel so a rendering layer can subscribe to
//! every change.

use crate::api::{ApiError, ApiResponse};
use crate::exceptions::{FormException, SubmissionError};
use crate::state::{FieldErrors, FormState, Values};
use crate::validation::validate_dto;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::marker::PhantomData;
use tokio::sync::watch;

/// Initial state of a form
#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    pub initial_values: Values,
    pub initial_errors: FieldErrors,
}

impl FormOptions {
    /// Build options from a typed struct of initial values
    pub fn from_struct<V: Serialize>(
        values: &V,
        initial_errors: FieldErrors,
    ) -> Result<Self, serde_json::Error> {
        let initial_values = match serde_json::to_value(values)? {
            Value::Object(map) => map,
            other => {
                return Err(serde::ser::Error::custom(format!(
                    "initial values must serialize to an object, got {other}"
                )))
            }
        };
        Ok(Self {
            initial_values,
            initial_errors,
        })
    }
}

type PreCall = Box<dyn FnOnce(Values) -> Values + Send>;

/// One submission: the typed object `T` to validate against, the remote call
/// and an optional transform applied to the values first
pub struct Submission<T, C> {
    api_call: C,
    pre_call: Option<PreCall>,
    _dto: PhantomData<fn() -> T>,
}

impl<T, C> Submission<T, C> {
    pub fn new(api_call: C) -> Self {
        Self {
            api_call,
            pre_call: None,
            _dto: PhantomData,
        }
    }

    /// Transform the values before they are mapped and validated
    pub fn pre_call(mut self, f: impl FnOnce(Values) -> Values + Send + 'static) -> Self {
        self.pre_call = Some(Box::new(f));
        self
    }
}

/// Resets `is_loading` when a submission ends, however it ends
struct LoadingGuard<'a> {
    state: &'a watch::Sender<FormState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.is_loading = false);
    }
}

/// State and operations for one form
pub struct FormController {
    state: watch::Sender<FormState>,
    initial_errors: FieldErrors,
}

impl FormController {
    pub fn new(options: FormOptions) -> Self {
        let (state, _) = watch::channel(FormState::new(
            options.initial_values,
            options.initial_errors.clone(),
        ));
        Self {
            state,
            initial_errors: options.initial_errors,
        }
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FormState {
        self.state.borrow().clone()
    }

    pub fn values(&self) -> Values {
        self.state.borrow().values.clone()
    }

    pub fn errors(&self) -> FieldErrors {
        self.state.borrow().errors.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn is_completed(&self) -> bool {
        self.state.borrow().is_completed
    }

    /// Set a field value and clear its error
    pub fn on_change(&self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        self.state.send_modify(|s| s.change(key, value));
    }

    pub fn set_error_by_id(&self, key: &str, message: impl Into<String>) {
        let message = message.into();
        self.state.send_modify(|s| s.errors.set(key, message));
    }

    pub fn set_values(&self, values: Values) {
        self.state.send_modify(|s| s.values = values);
    }

    pub fn set_errors(&self, errors: FieldErrors) {
        self.state.send_modify(|s| s.errors = errors);
    }

    pub fn set_is_loading(&self, is_loading: bool) {
        self.state.send_modify(|s| s.is_loading = is_loading);
    }

    pub fn set_is_completed(&self, is_completed: bool) {
        self.state.send_modify(|s| s.is_completed = is_completed);
    }

    /// Validate the current values as a `T` and, if they pass, send them
    /// through the submission's remote call.
    ///
    /// `is_loading` is true for the whole call. Local field errors are merged
    /// over the errors present before the call and also written to state; the
    /// remote call is skipped in that case. Callers do not need to `set_errors`
    /// for [`SubmissionError::Validation`]. Server validations are returned
    /// as sent and not written to state. `is_completed` is left alone.
    pub async fn process_form<T, R, C, Fut>(
        &self,
        submission: Submission<T, C>,
    ) -> Result<R, SubmissionError>
    where
        T: DeserializeOwned + Serialize + garde::Validate,
        T::Context: Default,
        C: FnOnce(Value) -> Fut,
        Fut: Future<Output = Result<ApiResponse<R>, ApiError>>,
    {
        let Submission {
            api_call, pre_call, ..
        } = submission;

        let mut prior_errors = FieldErrors::new();
        let mut values = Values::new();
        self.state.send_modify(|s| {
            prior_errors = std::mem::replace(&mut s.errors, self.initial_errors.clone());
            values = s.values.clone();
            s.is_loading = true;
        });
        let _loading = LoadingGuard { state: &self.state };
        tracing::debug!("Submitting form with {} fields", values.len());

        let values = match pre_call {
            Some(f) => f(values),
            None => values,
        };
        let dto: T = serde_json::from_value(Value::Object(values))?;

        if let Some(dto_errors) = validate_dto(&dto) {
            tracing::debug!("Form failed validation on {} fields", dto_errors.len());
            let merged = prior_errors.merged_with(&dto_errors);
            self.state.send_modify(|s| s.errors = merged.clone());
            return Err(FormException::new(merged).into());
        }

        let payload = serde_json::to_value(&dto)?;
        match api_call(payload).await {
            Ok(response) => {
                tracing::debug!("Form submitted, status {}", response.status);
                Ok(response.data)
            }
            Err(err) => {
                tracing::warn!("Form submission failed: {err}");
                Err(SubmissionError::from_api(err))
            }
        }
    }
}
