use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::ServiceError;

pub const NAME_REQUIRED: &str = "Name is required";

/// One student's stored data.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_grades")]
    pub grades: Vec<f64>,
}

/// Stored grades: `null` or non-array values read as empty, non-numeric
/// entries are dropped.
fn lenient_grades<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(Value::as_f64).collect(),
        _ => Vec::new(),
    })
}

/// Body of `POST /students`.
///
/// `grades` stays untyped here: a value that is not an array is ignored rather
/// than rejected, so it can only be interpreted after decoding.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CreateStudentInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub grades: Option<Value>,
}

/// Body of `PUT /students/:id`; absent fields leave the record unchanged.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct UpdateStudentInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub grades: Option<Value>,
}

impl CreateStudentInput {
    /// Returns the validated `(name, grades)` pair for a new record.
    pub fn validate(self) -> Result<(String, Vec<f64>), ServiceError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(ServiceError::validation(NAME_REQUIRED)),
        };
        let grades = parse_grades(self.grades.as_ref())?.unwrap_or_default();
        Ok((name, grades))
    }
}

impl UpdateStudentInput {
    /// Returns the replacements to apply; `None` means keep the current value.
    pub fn validate(self) -> Result<(Option<String>, Option<Vec<f64>>), ServiceError> {
        let grades = parse_grades(self.grades.as_ref())?;
        Ok((self.name, grades))
    }
}

/// `Some(list)` for an array of numbers, `None` when absent or not an array.
fn parse_grades(value: Option<&Value>) -> Result<Option<Vec<f64>>, ServiceError> {
    let Some(Value::Array(items)) = value else {
        return Ok(None);
    };
    items
        .iter()
        .map(|v| v.as_f64().ok_or_else(|| ServiceError::validation("grades must be numbers")))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
