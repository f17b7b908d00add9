//! Error Types for the Bridge Boundary
//!
//! This module provides error types for the state-hook and registry
//! operations sitting between the archive core and a dynamic-language
//! runtime.
//!
//! ## Error Categories
//!
//! - State errors: encode/decode failures surfaced from the archive core
//! - Unknown type: restore requested for a name never registered
//! - Duplicate type: two registrations under the same name
//! - Handle errors: the runtime-side wrapper failed to produce its handle

use carton_archive::ArchiveError;
use smol_str::SmolStr;
use thiserror::Error;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Bridge error types
#[derive(Error, Debug)]
pub enum BridgeError {
    /// An archive encode/decode failure, propagated unchanged.
    #[error(transparent)]
    State(#[from] ArchiveError),

    /// Restore was requested for a type name with no registered endpoint.
    #[error("no restore endpoint registered for type '{type_name}'")]
    UnknownType {
        /// The unregistered type name
        type_name: SmolStr,
    },

    /// A second endpoint was registered under an already-taken name.
    #[error("type '{type_name}' is already registered")]
    DuplicateType {
        /// The contested type name
        type_name: SmolStr,
    },

    /// The runtime-side wrapper failed to turn a restored value into a
    /// live handle.
    #[error("failed to produce runtime handle: {0}")]
    Handle(String),
}

impl BridgeError {
    /// Create an unknown-type error
    pub fn unknown_type(type_name: impl Into<SmolStr>) -> Self {
        BridgeError::UnknownType {
            type_name: type_name.into(),
        }
    }

    /// Create a duplicate-type error
    pub fn duplicate_type(type_name: impl Into<SmolStr>) -> Self {
        BridgeError::DuplicateType {
            type_name: type_name.into(),
        }
    }

    /// Create a handle error
    pub fn handle(message: impl Into<String>) -> Self {
        BridgeError::Handle(message.into())
    }

    /// Check if this error came out of the archive core
    pub fn is_state_error(&self) -> bool {
        matches!(self, BridgeError::State(_))
    }
}
