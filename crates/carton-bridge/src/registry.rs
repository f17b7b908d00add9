//! Type Registry for Restore Endpoints
//!
//! The persistence protocol reconstructs objects from a
//! (type identifier, encoded state) pairing, so the runtime needs one
//! global lookup from identifier to a restore endpoint. This module
//! provides that lookup, type-erased over the runtime's handle type:
//! the bridge stays unaware of the runtime's object model, and the
//! binding layer instantiates `Registry<O>` with whatever owned handle
//! its runtime uses.
//!
//! Registration happens up front (at module initialization in a binding
//! layer); afterwards the registry is only read, so sharing it behind a
//! `&'static` is safe.

use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::{BridgeError, BridgeResult};
use crate::reduction::StateHooks;

/// A type-erased restore endpoint: encoded state in, runtime handle out.
type RestoreFn<O> = Box<dyn Fn(&str) -> BridgeResult<O> + Send + Sync>;

/// Insertion-ordered map from type identifier to restore endpoint.
pub struct Registry<O> {
    restorers: IndexMap<SmolStr, RestoreFn<O>>,
}

impl<O> Registry<O> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            restorers: IndexMap::new(),
        }
    }

    /// Register a restore endpoint for `T` under `type_name`.
    ///
    /// `into_handle` wraps a restored native value into the runtime's
    /// handle type. Registering the same name twice fails with
    /// [`BridgeError::DuplicateType`].
    pub fn register<T, F>(&mut self, type_name: impl Into<SmolStr>, into_handle: F) -> BridgeResult<()>
    where
        T: StateHooks + 'static,
        F: Fn(T) -> BridgeResult<O> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        if self.restorers.contains_key(&type_name) {
            return Err(BridgeError::duplicate_type(type_name));
        }
        self.restorers.insert(
            type_name,
            Box::new(move |state| into_handle(T::restore_state(state)?)),
        );
        Ok(())
    }

    /// Restore a runtime handle from a (type identifier, encoded state)
    /// pairing.
    pub fn restore(&self, type_name: &str, state: &str) -> BridgeResult<O> {
        let restore = self
            .restorers
            .get(type_name)
            .ok_or_else(|| BridgeError::unknown_type(type_name))?;
        restore(state)
    }

    /// Check whether a type name has a registered endpoint
    pub fn contains(&self, type_name: &str) -> bool {
        self.restorers.contains_key(type_name)
    }

    /// Registered type names, in registration order
    pub fn type_names(&self) -> impl Iterator<Item = &SmolStr> {
        self.restorers.keys()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.restorers.len()
    }

    /// Check whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.restorers.is_empty()
    }
}

impl<O> Default for Registry<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> fmt::Debug for Registry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.restorers.keys().collect::<Vec<_>>())
            .finish()
    }
}
