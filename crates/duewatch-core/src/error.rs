use thiserror::Error;

use crate::app::annotator::AnnotateError;
use crate::config::ConfigError;

/// Top-level error for building a countdown view.
#[derive(Debug, Error)]
pub enum DuewatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Annotate(#[from] AnnotateError),

    #[error("no countdown sink configured")]
    MissingSink,
}
