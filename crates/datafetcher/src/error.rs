use models::{FieldError, ShapeError};
use thiserror::Error;

/// An HTTP request to the catalog API failed
#[derive(Debug, Error)]
#[error("failed to fetch {context}: {source}")]
pub struct TransportError {
    /// What was being fetched, e.g. "courses for CSCI in 20241"
    pub context: String,
    #[source]
    pub source: reqwest::Error,
}

/// The catalog payload broke the contract the pipeline relies on
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Malformed(#[from] FieldError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<CatalogError>,
    },
}

impl CatalogError {
    /// Prefixes the error with where in the payload it happened
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Extension for attaching context to any catalog result
pub trait ResultExt<T> {
    fn context(self, context: impl FnOnce() -> String) -> Result<T, CatalogError>;
}

impl<T, E: Into<CatalogError>> ResultExt<T> for Result<T, E> {
    fn context(self, context: impl FnOnce() -> String) -> Result<T, CatalogError> {
        self.map_err(|e| e.into().context(context()))
    }
}
