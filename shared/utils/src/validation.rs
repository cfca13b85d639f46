use crate::error::{ErpError, ErpResult};
use regex::Regex;
use validator::{Validate, ValidationErrors};
use vivae_models::ExplosionRequest;

pub fn validate_model<T: Validate>(model: &T) -> ErpResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(ErpError::validation("model", error_messages))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match (&error.message, error.code.as_ref()) {
                (Some(message), _) => format!("{}: {}", field, message),
                (None, "length") => format!("Length validation failed for field '{}'", field),
                (None, "range") => format!("Value out of range for field '{}'", field),
                (None, "required") => format!("Field '{}' is required", field),
                (None, code) => format!("Validation failed for field '{}': {}", field, code),
            };
            messages.push(message);
        }
    }

    messages.sort();
    messages.join(", ")
}

/// Item numbers are alphanumeric segments joined by `-`, `_`, `.` or `/`.
pub fn validate_item_no(item_no: &str) -> ErpResult<()> {
    let item_regex = Regex::new(r"^[A-Za-z0-9]+(?:[-_./][A-Za-z0-9]+)*$")
        .map_err(|e| ErpError::internal(e.to_string()))?;

    if item_no.len() > 50 || !item_regex.is_match(item_no) {
        return Err(ErpError::validation(
            "item_no",
            format!("Invalid item number '{}'", item_no),
        ));
    }

    Ok(())
}

pub fn validate_quantity(quantity: f64) -> ErpResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(ErpError::validation(
            "quantity",
            "Quantity must be a positive number",
        ));
    }

    Ok(())
}

/// Caller-side precondition check; the engine assumes a validated request.
pub fn validate_explosion_request(request: &ExplosionRequest) -> ErpResult<()> {
    validate_quantity(request.quantity)?;
    validate_model(request)?;
    validate_item_no(&request.item_no)
}
