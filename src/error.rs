//! Failures reported by the widget lifecycle

use thiserror::Error;

use crate::constants::validation::MIN_DIMENSION;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("window size cannot be smaller than {min}x{min} (got {width}x{height})", min = MIN_DIMENSION)]
    InvalidSize { width: u32, height: u32 },

    #[error("no widget at index {index} (collection has {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("URL must not be empty")]
    EmptyUrl,

    #[error("could not save configuration: {0}")]
    PersistenceFailure(String),

    #[error("could not launch widget {slot}: {reason}")]
    LaunchFailure { slot: usize, reason: String },
}

pub type WidgetResult<T> = Result<T, WidgetError>;
