//! Domain result alias

use crate::domain::errors::MascaraError;

/// Result type used at the configuration and domain boundary
pub type Result<T> = std::result::Result<T, MascaraError>;
