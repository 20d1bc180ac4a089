use serde::{Deserialize, Serialize};
use std::fmt;

/// A light bulb record.
///
/// `id` is `None` until a repository assigns one on first save. Missing
/// string and number fields deserialize to their empty defaults so that
/// `validate` can report them against the right field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightBulb {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub bulb_type: String,
    #[serde(default)]
    pub wattage: i32,
}

impl LightBulb {
    pub fn new(name: impl Into<String>, bulb_type: impl Into<String>, wattage: i32) -> Self {
        Self {
            id: None,
            name: name.into(),
            bulb_type: bulb_type.into(),
            wattage,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Check the field constraints accepted at the service boundary.
    ///
    /// All violations are collected, not just the first one.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut violations = Vec::new();

        if self.name.trim().is_empty() {
            violations.push(FieldViolation::new("name", "Name is required"));
        }
        if self.bulb_type.trim().is_empty() {
            violations.push(FieldViolation::new("type", "Type is required"));
        }
        if self.wattage < 1 {
            violations.push(FieldViolation::new(
                "wattage",
                "Wattage must be at least 1",
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(violations))
        }
    }
}

impl fmt::Display for LightBulb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{} ({}, {}W) #{id}", self.name, self.bulb_type, self.wattage),
            None => write!(f, "{} ({}, {}W)", self.name, self.bulb_type, self.wattage),
        }
    }
}

/// A single failed constraint. `field` uses the wire name (`type`, not `bulb_type`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed: {}", summary(.0))]
pub struct ValidationErrors(pub Vec<FieldViolation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

fn summary(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join(", ")
}
