//! Multi-step user flows driven by the caller.

pub mod reset;

use std::error::Error;
use std::fmt;

use crate::api::ApiError;
use crate::validation::ValidationError;

pub use reset::{ResetFlow, ResetStep};

/// Failure of one flow step. The flow stays on the step that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Blocked client-side; no request was sent.
    Validation(ValidationError),
    /// The backend call failed.
    Api(ApiError),
    /// The operation does not belong to the current step.
    WrongStep { step: u8 },
}

impl FlowError {
    /// Message suitable for inline display.
    pub fn message(&self) -> String {
        match self {
            FlowError::Validation(e) => e.message().to_string(),
            FlowError::Api(e) => e.message.clone(),
            FlowError::WrongStep { step } => format!("Not available at step {step}"),
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

// Display already shows the inner message, so the inner error's own source
// is forwarded instead of the inner error itself.
impl Error for FlowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FlowError::Validation(e) => e.source(),
            FlowError::Api(e) => e.source(),
            FlowError::WrongStep { .. } => None,
        }
    }
}

impl From<ValidationError> for FlowError {
    fn from(e: ValidationError) -> Self {
        FlowError::Validation(e)
    }
}

impl From<ApiError> for FlowError {
    fn from(e: ApiError) -> Self {
        FlowError::Api(e)
    }
}

pub type FlowResult<T> = std::result::Result<T, FlowError>;
