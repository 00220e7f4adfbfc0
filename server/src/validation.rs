//! Field checks applied to request bodies before they reach the store.

use std::collections::BTreeMap;

use crate::schema::{DESCRIPTION_MAX_LEN, DESCRIPTION_MIN_LEN};

pub const DESCRIPTION_FIELD: &str = "Description";
pub const IS_COMPLETED_FIELD: &str = "IsCompleted";

pub const DESCRIPTION_NOT_UNIQUE: &str = "The Description field must be unique";

/// Messages per field, in the shape returned to clients.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

fn required(field: &str) -> String {
    format!("The {field} field is required.")
}

fn length(field: &str, min: usize, max: usize) -> String {
    format!(
        "The field {field} must be a string with a minimum length of {min} and a maximum length of {max}."
    )
}

/// A description and completion flag that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTodo {
    pub description: String,
    pub is_completed: bool,
}

/// Check the two writable fields together so every problem is reported in
/// one response.
pub fn validate_todo(
    description: Option<&str>,
    is_completed: Option<bool>,
) -> Result<ValidTodo, FieldErrors> {
    let mut errors = FieldErrors::new();

    match description {
        None => {
            errors.insert(DESCRIPTION_FIELD.into(), vec![required(DESCRIPTION_FIELD)]);
        }
        Some(text) if text.trim().is_empty() => {
            errors.insert(DESCRIPTION_FIELD.into(), vec![required(DESCRIPTION_FIELD)]);
        }
        Some(text) => {
            let chars = text.chars().count();
            if !(DESCRIPTION_MIN_LEN..=DESCRIPTION_MAX_LEN).contains(&chars) {
                errors.insert(
                    DESCRIPTION_FIELD.into(),
                    vec![length(DESCRIPTION_FIELD, DESCRIPTION_MIN_LEN, DESCRIPTION_MAX_LEN)],
                );
            }
        }
    }

    if is_completed.is_none() {
        errors.insert(IS_COMPLETED_FIELD.into(), vec![required(IS_COMPLETED_FIELD)]);
    }

    match (description, is_completed) {
        (Some(description), Some(is_completed)) if errors.is_empty() => Ok(ValidTodo {
            description: description.to_string(),
            is_completed,
        }),
        _ => Err(errors),
    }
}

/// The error map reported when the store refuses a duplicate description.
pub fn duplicate_description() -> FieldErrors {
    FieldErrors::from([(
        DESCRIPTION_FIELD.to_string(),
        vec![DESCRIPTION_NOT_UNIQUE.to_string()],
    )])
}
