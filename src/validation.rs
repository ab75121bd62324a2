use std::collections::BTreeMap;
use validator::{ValidationError, ValidationErrors};

use crate::models::{parse_wire_date, Amount};

/// Messages keyed by the name of the field they refer to
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Validates that a typed amount is a monetary value greater than 0
pub fn validate_amount(raw: &str) -> Result<(), ValidationError> {
    let amount: Amount = raw.parse().map_err(|e: crate::models::AmountParseError| {
        let mut error = ValidationError::new("invalid_amount");
        error.message = Some(e.to_string().into());
        error
    })?;
    validate_positive_amount(&amount)
}

/// Validates that an amount is positive (greater than 0)
pub fn validate_positive_amount(amount: &Amount) -> Result<(), ValidationError> {
    if !amount.is_positive() {
        let mut error = ValidationError::new("invalid_amount");
        error.message = Some("Amount must be greater than 0".into());
        return Err(error);
    }
    Ok(())
}

/// Validates a date typed as day/month/year
pub fn validate_wire_date(raw: &str) -> Result<(), ValidationError> {
    parse_wire_date(raw).map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("invalid_date");
        error.message = Some(format!("'{}' is not a date in dd/mm/yyyy format", raw).into());
        error
    })
}

/// Flattens validator output into per-field messages, falling back to the
/// error code when a rule carries no message.
pub fn field_messages(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Joins per-field messages into one list of `field: message` lines
pub fn flatten_messages(errors: &FieldErrors) -> Vec<String> {
    errors
        .iter()
        .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{}: {}", field, m)))
        .collect()
}
