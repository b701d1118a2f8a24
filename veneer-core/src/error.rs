use crate::TypeShape;

/// Errors from extracting typed values out of erased cells.
#[derive(Debug)]
pub enum CellError {
    /// Tried to get the wrong concrete type out of a cell, e.g. the cell
    /// holds a `String` but `materialize` was called with `u64`.
    WrongShape {
        /// The shape that was requested.
        expected: &'static TypeShape,
        /// The shape the cell actually holds.
        actual: &'static TypeShape,
    },
}

impl core::fmt::Display for CellError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CellError::WrongShape { expected, actual } => {
                write!(f, "wrong shape: expected {}, but cell holds {}", expected, actual)
            }
        }
    }
}

impl core::error::Error for CellError {}

/// Errors from building a type registry.
#[derive(Debug)]
pub enum RegistryError {
    /// A shape with the same type key was already registered.
    Duplicate {
        /// The shape that was rejected.
        shape: &'static TypeShape,
    },
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegistryError::Duplicate { shape } => {
                write!(f, "type {} is already registered", shape)
            }
        }
    }
}

impl core::error::Error for RegistryError {}
