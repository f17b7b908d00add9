//! # Carton Bridge
//!
//! Runtime-agnostic boundary model between the archive core and a
//! dynamic-language persistence protocol.
//!
//! A dynamic runtime (Python's pickle, for instance) persists an object as
//! a "which type, what state" pairing and reconstructs it by handing that
//! pairing back. This crate models exactly that boundary and nothing
//! more:
//!
//! - [`StateHooks`]: produce-state / restore endpoints, available for
//!   every type with the field-visiting capability
//! - [`Reduction`]: the pure data-transfer record crossing the boundary
//! - [`Registry`]: lookup from type identifier to a type-erased restore
//!   endpoint, generic over the runtime's handle type
//!
//! The crate depends on no dynamic-language runtime; a binding layer
//! instantiates the registry with its own handle type and wires the hooks
//! into its runtime's protocol.
//!
//! ## Module Structure
//!
//! - [`reduction`]: state hooks and the reduction record
//! - [`registry`]: type registration and restore lookup
//! - [`error`]: error types for bridge operations

pub mod error;
pub mod reduction;
pub mod registry;

// Re-export main types for convenience
pub use error::{BridgeError, BridgeResult};
pub use reduction::{Reduction, StateHooks};
pub use registry::Registry;
