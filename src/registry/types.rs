//! Known concrete types for polymorphic fields

use std::collections::HashMap;

use log::debug;

use crate::error::{InspectorError, Result};
use crate::model::{TypeKey, Value};

/// Builds a default value of a concrete type
pub type Constructor = fn() -> Value;

/// Subtype table consulted by type pickers
#[derive(Debug, Default)]
pub struct TypeRegistry {
    subtypes: HashMap<TypeKey, Vec<TypeKey>>,
    constructors: HashMap<TypeKey, Constructor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `concrete` as an implementation of `base`
    pub fn register_subtype(&mut self, base: TypeKey, concrete: TypeKey, constructor: Constructor) -> &mut Self {
        let known = self.subtypes.entry(base).or_default();
        if !known.contains(&concrete) {
            known.push(concrete.clone());
        }
        debug!("Registered type {}", concrete);
        self.constructors.insert(concrete, constructor);
        self
    }

    /// Concrete types registered for `base`, in registration order
    pub fn subtypes_of(&self, base: &TypeKey) -> &[TypeKey] {
        self.subtypes.get(base).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Default value of a registered concrete type
    pub fn instantiate(&self, type_key: &TypeKey) -> Result<Value> {
        self.constructors
            .get(type_key)
            .map(|constructor| constructor())
            .ok_or_else(|| InspectorError::UnknownType(type_key.to_string()))
    }
}
