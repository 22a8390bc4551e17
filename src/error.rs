//! Error types for style generation and stylesheet management.

use thiserror::Error;

/// Errors raised by the style engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// CSS text handed to the transform could not be parsed.
    #[error("malformed CSS for '{component_id}': {reason}")]
    MalformedCss {
        /// Component whose rules failed to compile.
        component_id: String,
        /// What the parser tripped over.
        reason: String,
    },

    /// The group id allocator ran past its limit.
    #[error("reached the limit of {limit} style groups")]
    GroupOverflow {
        /// Highest group id the allocator will hand out.
        limit: u32,
    },

    /// The server stylesheet was sealed and can no longer be read or written.
    #[error("the ServerStyleSheet has been sealed; create a new one per render")]
    Sealed,

    /// A transform plugin was registered without a name.
    #[error("transform plugins must have a non-empty name")]
    UnnamedPlugin,
}

pub type Result<T, E = StyleError> = std::result::Result<T, E>;
