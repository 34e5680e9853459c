use thiserror::Error;

/// Errors raised by the shared model and option loading.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown {kind} value: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownVariant { .. } => "unknown_variant",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Io(_) => "config_io",
            Self::Json(_) => "config_json",
        }
    }

    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }
}
