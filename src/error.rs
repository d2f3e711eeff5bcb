use thiserror::Error;

/// Failures raised while collecting and evaluating controller state.
///
/// Only `Schema` aborts a run. `Unavailable` abandons the current controller
/// and `MissingField` abandons a single check.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("{command}: unexpected output format, {path} is missing")]
    Schema { command: String, path: String },

    #[error("{command}: no usable output ({reason})")]
    Unavailable { command: String, reason: String },

    #[error("{context}: field '{field}' is missing")]
    MissingField { context: String, field: String },
}

impl CheckError {
    pub fn unavailable(command: impl Into<String>, reason: impl ToString) -> Self {
        CheckError::Unavailable {
            command: command.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, CheckError::Schema { .. })
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
