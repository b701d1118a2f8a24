#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod ptr;
pub use ptr::*;

pub mod vtable;
pub use vtable::VTable;

mod shape;
pub use shape::*;

mod view;
pub use view::*;

mod shaped;
pub use shaped::*;

mod cell;
pub use cell::*;

mod script;
pub use script::*;

mod registry;
pub use registry::*;

mod error;
pub use error::*;

mod macros;
