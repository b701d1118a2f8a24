#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![doc = include_str!("../README.md")]

pub use veneer_core::*;
pub use veneer_core::{constructor, property, value_vtable};

mod classify;
pub use classify::*;

mod engine;
pub use engine::*;

mod primitive;
pub use primitive::*;

mod construct;
pub use construct::construct_with;

mod populate;

mod coercer;
pub use coercer::*;
