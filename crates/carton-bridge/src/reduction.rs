//! State Hooks and the Reduction Record
//!
//! The dynamic runtime's object-persistence protocol works with a
//! "type identifier + encoded state" pairing: it asks a live instance for
//! its state, and later hands the pairing back to reconstruct an
//! equivalent instance. This module models that boundary:
//!
//! - [`StateHooks`]: the per-type pair of produce-state / restore
//!   endpoints, available automatically for every type with the
//!   field-visiting capability.
//! - [`Reduction`]: the pure data-transfer record carried across the
//!   boundary. It knows nothing about the runtime's object model.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::BridgeResult;

// ============================================================================
// StateHooks Trait
// ============================================================================

/// Per-type serialize/deserialize endpoints consumable by a persistence
/// protocol.
///
/// Blanket-implemented for every type that exposes its fields to a generic
/// visitor, so a type opts in simply by deriving `Serialize` and
/// `Deserialize`. Both endpoints are stateless request/response calls; the
/// encoded state is the only artifact that outlives them.
pub trait StateHooks: Sized {
    /// Encode this instance's full state as portable text.
    fn produce_state(&self) -> BridgeResult<String>;

    /// Reconstruct an instance from state produced by [`produce_state`].
    ///
    /// Fails with a malformed-input error if the state's field shape does
    /// not match this type; never yields a partially populated instance.
    ///
    /// [`produce_state`]: StateHooks::produce_state
    fn restore_state(state: &str) -> BridgeResult<Self>;
}

impl<T> StateHooks for T
where
    T: Serialize + DeserializeOwned,
{
    fn produce_state(&self) -> BridgeResult<String> {
        Ok(carton_archive::serialize(self)?)
    }

    fn restore_state(state: &str) -> BridgeResult<Self> {
        Ok(carton_archive::deserialize(state)?)
    }
}

// ============================================================================
// Reduction Record
// ============================================================================

/// The pairing the persistence protocol carries across the boundary:
/// which type, and its encoded state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reduction {
    /// Registered identifier of the reduced type
    pub type_name: SmolStr,
    /// Encoded state produced by the type's state hooks
    pub state: String,
}

impl Reduction {
    /// Create a reduction from already-encoded state
    pub fn new(type_name: impl Into<SmolStr>, state: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            state: state.into(),
        }
    }

    /// Reduce a live instance under the given registered name
    pub fn of<T: StateHooks>(type_name: impl Into<SmolStr>, value: &T) -> BridgeResult<Self> {
        Ok(Self {
            type_name: type_name.into(),
            state: value.produce_state()?,
        })
    }

    /// Split into the (type identifier, encoded state) pairing
    pub fn into_parts(self) -> (SmolStr, String) {
        (self.type_name, self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i64,
        y: i64,
    }

    #[test]
    fn test_state_hooks_roundtrip() {
        let point = Point { x: 3, y: 5 };
        let state = point.produce_state().unwrap();
        let restored = Point::restore_state(&state).unwrap();
        assert_eq!(restored, point);
    }

    #[test]
    fn test_restore_rejects_mismatched_shape() {
        let err = Point::restore_state(r#"{"carton":{"x":3}}"#).unwrap_err();
        assert!(err.is_state_error());
    }

    #[test]
    fn test_reduction_of_instance() {
        let point = Point { x: -1, y: 9 };
        let reduction = Reduction::of("Point", &point).unwrap();
        assert_eq!(reduction.type_name, "Point");

        let (type_name, state) = reduction.into_parts();
        assert_eq!(type_name, "Point");
        assert_eq!(Point::restore_state(&state).unwrap(), point);
    }

    #[test]
    fn test_reduction_is_itself_portable() {
        // The record crosses further boundaries as plain data.
        let reduction = Reduction::new("Point", r#"{"carton":{"x":1,"y":2}}"#);
        let state = reduction.produce_state().unwrap();
        let restored = Reduction::restore_state(&state).unwrap();
        assert_eq!(restored, reduction);
    }
}
