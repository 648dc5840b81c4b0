use thiserror::Error;

use super::models::BlogStatus;
use crate::common::AuthError;

/// Failures of the moderation workflow
#[derive(Error, Debug)]
pub enum BlogError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Blog not found")]
    NotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition { from: BlogStatus, to: BlogStatus },

    /// Store or other infrastructure failure
    #[error(transparent)]
    Dependency(#[from] anyhow::Error),
}

impl BlogError {
    pub fn validation(message: impl Into<String>) -> Self {
        BlogError::Validation(message.into())
    }
}

pub type BlogResult<T> = Result<T, BlogError>;
