use thiserror::Error;

use crate::format::SettingsFormat;

/// Errors produced while decoding, encoding or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot decode {format} settings: {message}")]
    Decode {
        format: SettingsFormat,
        message: String,
    },

    #[error("cannot encode {format} settings: {message}")]
    Encode {
        format: SettingsFormat,
        message: String,
    },

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, SettingsError>;
