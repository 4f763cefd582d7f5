use thiserror::Error;

/// Error reported by a [`Surface`](crate::surface::Surface) implementation.
pub type SurfaceError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("surface error: {0}")]
    Surface(#[from] SurfaceError),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}
