//! Formix - form state, validation and API submission
//!
//! A [`FormController`] holds a form's values, per-field errors and loading
//! flag. [`FormController::process_form`] validates the values as a typed
//! object deriving `garde::Validate`, sends them through a remote call and
//! reports the outcome as a [`SubmissionError`] the rendering layer can
//! match on.

pub mod api;
pub mod config;
pub mod controller;
pub mod exceptions;
pub mod state;
pub mod validation;

pub use api::{ApiClientTrait, ApiError, ApiResponse, HttpApiClient};
pub use config::ApiConfig;
pub use controller::{FormController, FormOptions, Submission};
pub use exceptions::{FormException, SubmissionError};
pub use state::{FieldErrors, FormState, Values};
pub use validation::{validate_dto, FieldViolation};
