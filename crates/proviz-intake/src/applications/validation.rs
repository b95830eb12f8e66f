use super::domain::{ApplicationCandidate, ApplicationField, NewApplication};

/// Every required field that was absent or empty, in form order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required fields: {}", join_fields(.missing))]
pub struct ValidationError {
    missing: Vec<ApplicationField>,
}

impl ValidationError {
    pub fn missing(&self) -> &[ApplicationField] {
        &self.missing
    }
}

fn join_fields(fields: &[ApplicationField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check that all four fields carry text. Values are kept verbatim; no trimming or
/// format checks are applied, so a whitespace-only value counts as present.
pub fn validate(candidate: ApplicationCandidate) -> Result<NewApplication, ValidationError> {
    let ApplicationCandidate {
        name,
        phone,
        email,
        statement,
    } = candidate;

    let mut missing = Vec::new();
    let name = require(name, ApplicationField::Name, &mut missing);
    let phone = require(phone, ApplicationField::Phone, &mut missing);
    let email = require(email, ApplicationField::Email, &mut missing);
    let statement = require(statement, ApplicationField::Statement, &mut missing);

    match (name, phone, email, statement) {
        (Some(name), Some(phone), Some(email), Some(statement)) => Ok(NewApplication {
            name,
            phone,
            email,
            statement,
        }),
        _ => Err(ValidationError { missing }),
    }
}

fn require(
    value: Option<String>,
    field: ApplicationField,
    missing: &mut Vec<ApplicationField>,
) -> Option<String> {
    match value {
        Some(value) if !value.is_empty() => Some(value),
        _ => {
            missing.push(field);
            None
        }
    }
}
