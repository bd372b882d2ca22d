//! Todo data model.
//!
//! Defines the `Todo` row shape and the validated `TodoInput` request body.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// A todo item as stored in the `todos` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Row identifier.
    pub id: i64,

    /// Task description.
    pub task: String,

    /// Completion flag. Rows created outside the API may leave it `NULL`.
    #[serde(default)]
    pub completed: Option<bool>,
}

impl Todo {
    /// Returns `true` if the todo is marked completed (`NULL` counts as open).
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

/// Request body for creating or renaming a todo.
///
/// # Example
///
/// ```
/// use shared::models::TodoInput;
///
/// let input = TodoInput::new("  buy milk ").validated().unwrap();
/// assert_eq!(input.task, "buy milk");
///
/// assert!(TodoInput::new("   ").validated().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    /// Task description.
    #[serde(default)]
    #[validate(length(min = 1, message = "Task is required"))]
    pub task: String,
}

/// Errors that can occur during todo input validation.
#[derive(Debug, Error)]
pub enum TodoValidationError {
    /// A field rule failed. Displays the rule's message, e.g. `Task is required`.
    #[error("{}", first_message(.0))]
    Invalid(#[from] validator::ValidationErrors),
}

fn first_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .find_map(|error| error.message.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| errors.to_string())
}

impl TodoInput {
    /// Creates a new input with the given task.
    #[must_use]
    pub fn new(task: impl Into<String>) -> Self {
        Self { task: task.into() }
    }

    /// Trims the task and validates it.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` if the trimmed task is empty.
    pub fn validated(self) -> Result<Self, TodoValidationError> {
        let input = Self {
            task: self.task.trim().to_string(),
        };
        input.validate()?;
        Ok(input)
    }
}
