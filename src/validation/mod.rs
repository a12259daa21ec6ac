//! Validation of typed form objects
//!
//! Typed objects derive [`garde::Validate`]. The report garde produces is
//! read as an ordered list of [`FieldViolation`]s and folded into one message
//! per field.

pub mod rules;

use crate::state::FieldErrors;
use garde::Report;

/// All failed constraint messages reported for one property, in the order
/// the validator produced them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub property: String,
    pub constraints: Option<Vec<String>>,
}

impl FieldViolation {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            constraints: None,
        }
    }

    pub fn with_constraint(mut self, message: impl Into<String>) -> Self {
        self.constraints
            .get_or_insert_with(Vec::new)
            .push(message.into());
        self
    }

    /// Message of the first failed constraint, or "" when none were reported
    pub fn first_message(&self) -> &str {
        self.constraints
            .as_deref()
            .and_then(|c| c.first())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Group a garde report by property, keeping first-seen order
pub fn violations_from_report(report: &Report) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = Vec::new();
    for (path, error) in report.iter() {
        let property = path.to_string();
        match violations.iter_mut().find(|v| v.property == property) {
            Some(existing) => {
                existing
                    .constraints
                    .get_or_insert_with(Vec::new)
                    .push(error.message().to_string());
            }
            None => violations.push(FieldViolation::new(property).with_constraint(error.message())),
        }
    }
    violations
}

/// Run garde on a typed object and list what failed
pub fn violations<T>(dto: &T) -> Vec<FieldViolation>
where
    T: garde::Validate + ?Sized,
    T::Context: Default,
{
    match dto.validate() {
        Ok(()) => Vec::new(),
        Err(report) => violations_from_report(&report),
    }
}

/// Fold violations into one message per field; the first one wins.
///
/// Returns `None` when there are no violations.
pub fn fold_violations(violations: &[FieldViolation]) -> Option<FieldErrors> {
    if violations.is_empty() {
        return None;
    }

    let mut errors = FieldErrors::new();
    for violation in violations {
        // An empty first message can still be filled by a later violation
        if errors.has_error(&violation.property) {
            continue;
        }
        errors.set(violation.property.as_str(), violation.first_message());
    }
    Some(errors)
}

/// Validate a typed object and keep the first message per field.
///
/// Returns `None` when nothing failed.
pub fn validate_dto<T>(dto: &T) -> Option<FieldErrors>
where
    T: garde::Validate + ?Sized,
    T::Context: Default,
{
    fold_violations(&violations(dto))
}
