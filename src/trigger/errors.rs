//! Error types for trigger configuration and parsing

use std::num::ParseIntError;

use super::sample::ChannelId;

/// Error type for the trigger token grammar
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Unrecognized trigger type '{0}'")]
    UnrecognizedType(String),

    #[error("Missing argument for trigger type '{0}': expected <history_offset> <level>")]
    MissingArgument(&'static str),

    #[error("Invalid number '{token}'")]
    InvalidNumber {
        token: String,
        #[source]
        source: ParseIntError,
    },
}

/// Error type for trigger handler construction
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// The configured source channel has no registered handler. Fatal to the
    /// construction call; the registry is left untouched.
    #[error("No trigger handler registered for source channel {0}")]
    UnknownSourceChannel(ChannelId),
}
