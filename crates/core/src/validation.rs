//! Input validation helpers shared by the handlers.
//!
//! DTOs derive [`validator::Validate`]; this module turns the derive's
//! error map into the field-level [`CoreError::InvalidFields`] that the API
//! reports back, with fields in a stable order.

use validator::{Validate, ValidationErrors};

use crate::error::{CoreError, FieldError};
use crate::types::DbId;

/// Flatten validator errors into sorted `FieldError`s.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| FieldError {
                field: field.clone(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid ({})", e.code)),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
    out
}

/// Run the derived validation and map failures to [`CoreError::InvalidFields`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::InvalidFields(field_errors(&errors)))
}

/// Reject a payload whose id disagrees with the id in the URL.
///
/// A payload without an id is accepted; the URL id is authoritative.
pub fn ensure_matching_id(path_id: DbId, payload_id: Option<DbId>) -> Result<(), CoreError> {
    match payload_id {
        Some(id) if id != path_id => Err(CoreError::InvalidRequest(format!(
            "Payload id {id} does not match URL id {path_id}"
        ))),
        _ => Ok(()),
    }
}

/// Trim an optional text input; blank collapses to `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
