//! The todo schema: field rules, validated values and partial updates.
//!
//! # Design
//! `Todo` can only be obtained through validation (`Todo::new`,
//! `Todo::validate`, or deserialization, which routes through the same
//! rules), so every value that reaches a store write is known to be valid.
//! `TodoPatch` follows the same rule for partial updates.
//!
//! Validation collects every failing field instead of stopping at the first
//! one, and unknown keys are dropped rather than rejected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FieldError, ValidationError};
use crate::id::ObjectId;

const TITLE: &str = "title";
const DESCRIPTION: &str = "description";
const DUE_DATE: &str = "dueDate";
const STATUS: &str = "status";

const EMPTY_TEXT: &str = "String must contain at least 1 character(s)";

/// A validated todo item without its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", rename_all = "camelCase")]
pub struct Todo {
    title: String,
    description: String,
    due_date: String,
    status: bool,
}

impl Todo {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: impl Into<String>,
        status: bool,
    ) -> Result<Self, ValidationError> {
        let todo = Self {
            title: title.into(),
            description: description.into(),
            due_date: due_date.into(),
            status,
        };
        let errors: Vec<FieldError> = [
            (TITLE, &todo.title),
            (DESCRIPTION, &todo.description),
            (DUE_DATE, &todo.due_date),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| FieldError::new(name, EMPTY_TEXT))
        .collect();

        if errors.is_empty() {
            Ok(todo)
        } else {
            Err(ValidationError::new(errors))
        }
    }

    /// Check an arbitrary JSON value against the schema.
    pub fn validate(input: &Value) -> Result<Self, ValidationError> {
        let fields = as_object(input)?;
        let mut errors = Vec::new();

        let title = check(fields, TITLE, true, text, &mut errors);
        let description = check(fields, DESCRIPTION, true, text, &mut errors);
        let due_date = check(fields, DUE_DATE, true, text, &mut errors);
        let status = check(fields, STATUS, true, flag, &mut errors);

        match (title, description, due_date, status) {
            (Some(title), Some(description), Some(due_date), Some(status)) => Ok(Self {
                title,
                description,
                due_date,
                status,
            }),
            _ => Err(ValidationError::new(errors)),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> &str {
        &self.due_date
    }

    /// `true` once the todo is complete.
    pub fn status(&self) -> bool {
        self.status
    }
}

impl TryFrom<Value> for Todo {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::validate(&value)
    }
}

/// A validated partial update. Only the fields that are `Some` get written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<bool>,
}

impl TodoPatch {
    /// Check an arbitrary JSON value against the schema with every field
    /// optional. An explicit `null` counts as present and is rejected.
    pub fn validate(input: &Value) -> Result<Self, ValidationError> {
        let fields = as_object(input)?;
        let mut errors = Vec::new();

        let patch = Self {
            title: check(fields, TITLE, false, text, &mut errors),
            description: check(fields, DESCRIPTION, false, text, &mut errors),
            due_date: check(fields, DUE_DATE, false, text, &mut errors),
            status: check(fields, STATUS, false, flag, &mut errors),
        };

        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(ValidationError::new(errors))
        }
    }

    /// Overwrite the fields present in this patch, leaving the rest alone.
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            todo.description.clone_from(description);
        }
        if let Some(due_date) = &self.due_date {
            todo.due_date.clone_from(due_date);
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
    }
}

/// A stored todo together with its collection-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoWithId {
    pub id: ObjectId,
    #[serde(flatten)]
    pub todo: Todo,
}

fn as_object(input: &Value) -> Result<&Map<String, Value>, ValidationError> {
    input.as_object().ok_or_else(|| {
        ValidationError::single("body", format!("Expected object, received {}", kind(input)))
    })
}

/// Run `rule` against `fields[name]`, recording a failure in `errors`.
fn check<T>(
    fields: &Map<String, Value>,
    name: &str,
    required: bool,
    rule: fn(&Value) -> Result<T, String>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let Some(value) = fields.get(name) else {
        if required {
            errors.push(FieldError::new(name, "Required"));
        }
        return None;
    };
    match rule(value) {
        Ok(v) => Some(v),
        Err(message) => {
            errors.push(FieldError::new(name, message));
            None
        }
    }
}

fn text(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) if s.is_empty() => Err(EMPTY_TEXT.to_string()),
        Value::String(s) => Ok(s.clone()),
        other => Err(format!("Expected string, received {}", kind(other))),
    }
}

fn flag(value: &Value) -> Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| format!("Expected boolean, received {}", kind(value)))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
