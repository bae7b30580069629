/// Errors returned by calculators, input parsing and engine configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },
    #[error("unsupported option for {field}: {detail}")]
    UnsupportedOption { field: String, detail: String },
    #[error("computation failed: {0}")]
    Computation(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CalcError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnsupportedOption {
            field: field.into(),
            detail: detail.into(),
        }
    }

    /// The input field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } | Self::UnsupportedOption { field, .. } => Some(field),
            Self::Computation(_) | Self::InvalidConfig(_) => None,
        }
    }
}

pub type CalcResult<T> = std::result::Result<T, CalcError>;

/// Errors raised by audit sinks. The engine logs these and carries on.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("failed to open audit log: {0}")]
    Open(#[source] std::io::Error),
    #[error("failed to write audit record: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialise audit record: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("audit sink lock poisoned")]
    Poisoned,
}
