//! Form domain layer
//!
//! Plain field values, per-field error messages and the state snapshot a
//! controller publishes to its subscribers.

mod field;
mod form_state;

pub use field::{FieldErrors, Values};
pub use form_state::FormState;
