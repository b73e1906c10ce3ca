/// Convenience result type used across stereodots.
pub type StereoResult<T> = Result<T, StereoError>;

/// Error taxonomy of the rendering, geometry and asset APIs.
#[derive(thiserror::Error, Debug)]
pub enum StereoError {
    /// Two grids that must agree in shape do not.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A dot position or index falls outside its grid.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// Unusable user input: empty grids, bad alpha, bad geometry, bad job paths.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Wrapped lower-level error from IO or image decoding.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StereoError {
    /// Build a [`StereoError::ShapeMismatch`] value.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Build a [`StereoError::OutOfRange`] value.
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    /// Build a [`StereoError::InvalidParameter`] value.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Prefix the message, keeping the error kind.
    pub fn prefixed(self, prefix: impl std::fmt::Display) -> Self {
        match self {
            Self::ShapeMismatch(m) => Self::ShapeMismatch(format!("{prefix}: {m}")),
            Self::OutOfRange(m) => Self::OutOfRange(format!("{prefix}: {m}")),
            Self::InvalidParameter(m) => Self::InvalidParameter(format!("{prefix}: {m}")),
            Self::Other(e) => Self::Other(e.context(prefix.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
