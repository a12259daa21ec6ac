//! Custom garde rules
//!
//! ```ignore
//! #[derive(garde::Validate)]
//! struct SignupDto {
//!     #[garde(custom(not_blank))]
//!     name: String,
//! }
//! ```

/// Message used by [`not_blank`]
pub const REQUIRED: &str = "This field is required";

/// Reject empty and whitespace-only text
pub fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new(REQUIRED));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x", &()).is_ok());
        assert!(not_blank("", &()).is_err());
        assert!(not_blank(" \t", &()).is_err());
    }

    #[test]
    fn test_not_blank_message() {
        let err = not_blank("", &()).unwrap_err();
        assert_eq!(err.message(), REQUIRED);
    }
}
