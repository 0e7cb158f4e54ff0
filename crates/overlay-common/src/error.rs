//! Error types for overlay compositing.

use thiserror::Error;

/// Result type alias using OverlayError.
pub type Result<T> = std::result::Result<T, OverlayError>;

/// Errors that can occur while acquiring sources or compositing an overlay.
///
/// Every error is local to the request that produced it. Nothing here
/// leaves state behind that could affect a later request.
#[derive(Debug, Error)]
pub enum OverlayError {
    // === Acquisition Errors ===
    /// A source buffer could not be read or decoded.
    #[error("failed to acquire {source_name}: {message}")]
    Acquisition {
        source_name: String,
        message: String,
    },

    // === Parameter Errors ===
    /// A caller-supplied parameter is outside its valid range.
    #[error("invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Buffer Errors ===
    /// A source buffer reports a zero width or height.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A buffer's data length or pixel layout does not match its description.
    #[error("invalid raster buffer: {0}")]
    InvalidBuffer(String),

    // === Request Lifecycle ===
    /// The request was superseded before it could complete.
    #[error("request cancelled")]
    Cancelled,

    // === Output / Infrastructure ===
    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl OverlayError {
    /// Create an Acquisition error.
    pub fn acquisition(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Acquisition {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Create an InvalidBuffer error.
    pub fn invalid_buffer(msg: impl Into<String>) -> Self {
        Self::InvalidBuffer(msg.into())
    }

    /// True when the request was dropped because a newer one replaced it.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Short machine-readable code, used in logs and reports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Acquisition { .. } => "AcquisitionFailure",
            Self::InvalidParameter { .. } => "InvalidParameter",
            Self::DimensionMismatch(_) => "DimensionMismatch",
            Self::InvalidBuffer(_) => "InvalidBuffer",
            Self::Cancelled => "Cancelled",
            Self::Encode(_) => "EncodeFailure",
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
            Self::Internal(_) => "InternalError",
        }
    }
}

impl From<std::io::Error> for OverlayError {
    fn from(err: std::io::Error) -> Self {
        OverlayError::Io(err.to_string())
    }
}
