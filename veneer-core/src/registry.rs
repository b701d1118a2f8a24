//! The process-wide type registry.
//!
//! Resolves a [`TypeKey`] to its registered shape. The registry is built
//! once during startup/type-registration and treated as read-only afterwards;
//! the coercion engine only ever consumes resolved `&'static TypeShape`s.

use hashbrown::HashMap;

use crate::{RegistryError, Shaped, TypeKey, TypeShape};

/// Maps type keys to their registered shapes.
#[derive(Default)]
pub struct TypeRegistry {
    shapes: HashMap<TypeKey, &'static TypeShape>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T`'s shape.
    pub fn register<T: Shaped>(&mut self) -> Result<(), RegistryError> {
        self.register_shape(T::SHAPE)
    }

    /// Register a shape directly.
    pub fn register_shape(&mut self, shape: &'static TypeShape) -> Result<(), RegistryError> {
        if self.shapes.contains_key(&shape.id) {
            return Err(RegistryError::Duplicate { shape });
        }
        self.shapes.insert(shape.id, shape);
        Ok(())
    }

    /// Resolve a type key.
    pub fn by_key(&self, key: TypeKey) -> Option<&'static TypeShape> {
        self.shapes.get(&key).copied()
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: TypeKey) -> bool {
        self.shapes.contains_key(&key)
    }

    /// Number of registered shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Iterate over the registered shapes.
    pub fn shapes(&self) -> impl Iterator<Item = &'static TypeShape> + '_ {
        self.shapes.values().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_resolve() {
        let mut registry = TypeRegistry::new();
        registry.register::<f64>().unwrap();
        registry.register::<String>().unwrap();

        let shape = registry.by_key(TypeKey::of::<f64>()).unwrap();
        assert_eq!(shape.type_identifier, "f64");
        assert!(registry.by_key(TypeKey::of::<bool>()).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register::<f64>().unwrap();
        let err = registry.register::<f64>().unwrap_err();
        insta::assert_snapshot!(err, @"type f64 is already registered");
    }
}
