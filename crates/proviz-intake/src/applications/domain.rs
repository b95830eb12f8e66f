use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier assigned by the store when an application is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The required fields of an application, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationField {
    Name,
    Phone,
    Email,
    Statement,
}

impl ApplicationField {
    pub const ALL: [ApplicationField; 4] = [
        ApplicationField::Name,
        ApplicationField::Phone,
        ApplicationField::Email,
        ApplicationField::Statement,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ApplicationField::Name => "name",
            ApplicationField::Phone => "phone",
            ApplicationField::Email => "email",
            ApplicationField::Statement => "statement",
        }
    }

    /// Capitalized label used in human-facing text.
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationField::Name => "Name",
            ApplicationField::Phone => "Phone",
            ApplicationField::Email => "Email",
            ApplicationField::Statement => "Statement",
        }
    }
}

impl fmt::Display for ApplicationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intake payload exactly as posted by the form. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationCandidate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub statement: Option<String>,
}

impl ApplicationCandidate {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        statement: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            phone: Some(phone.into()),
            email: Some(email.into()),
            statement: Some(statement.into()),
        }
    }
}

/// A validated application that has not been stored yet.
///
/// Only produced by [`crate::applications::validate`], so every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub(crate) name: String,
    pub(crate) phone: String,
    pub(crate) email: String,
    pub(crate) statement: String,
}

impl NewApplication {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Attach the identifier chosen by a store.
    pub fn into_application(self, id: ApplicationId) -> Application {
        Application {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            statement: self.statement,
        }
    }
}

/// A persisted application. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: ApplicationId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub statement: String,
}

impl Application {
    pub fn field(&self, field: ApplicationField) -> &str {
        match field {
            ApplicationField::Name => &self.name,
            ApplicationField::Phone => &self.phone,
            ApplicationField::Email => &self.email,
            ApplicationField::Statement => &self.statement,
        }
    }
}
