//! The [`Shaped`] trait and shapes for the builtin vocabulary.

use std::time::{Duration, SystemTime};

use crate::{Builtin, TypeKind, TypeShape, value_vtable};

/// Types with a registered shape description.
///
/// # Safety
///
/// `SHAPE` must accurately describe `Self`: the layout must match, every
/// vtable operation must operate on `Self`, gadget properties must read and
/// write fields of `Self`, and every listed ancestor must describe a layout
/// prefix of `Self`.
pub unsafe trait Shaped: 'static {
    /// The shape descriptor for this type.
    const SHAPE: &'static TypeShape;
}

/// Shorthand for `T::SHAPE`.
#[inline]
pub fn shape_of<T: Shaped>() -> &'static TypeShape {
    T::SHAPE
}

/// The unit value of the [`Builtin::Null`] shape.
///
/// Stands in for a script `null` wherever a typed value is required, e.g. as
/// the payload of [`ValueCell::null`](crate::ValueCell::null).
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct ScriptNull;

macro_rules! builtin_shape {
    ($ty:ty, $identifier:literal, $builtin:ident) => {
        unsafe impl Shaped for $ty {
            const SHAPE: &'static TypeShape = &const {
                TypeShape::builder_for_sized::<$ty>($identifier)
                    .vtable(value_vtable!($ty))
                    .kind(TypeKind::Builtin(Builtin::$builtin))
                    .build()
            };
        }
    };
}

builtin_shape!((), "()", Void);
builtin_shape!(ScriptNull, "null", Null);
builtin_shape!(bool, "bool", Bool);
builtin_shape!(i8, "i8", I8);
builtin_shape!(i16, "i16", I16);
builtin_shape!(i32, "i32", I32);
builtin_shape!(i64, "i64", I64);
builtin_shape!(u8, "u8", U8);
builtin_shape!(u16, "u16", U16);
builtin_shape!(u32, "u32", U32);
builtin_shape!(u64, "u64", U64);
builtin_shape!(f32, "f32", F32);
builtin_shape!(f64, "f64", F64);
builtin_shape!(char, "char", Char);
builtin_shape!(String, "String", Str);
builtin_shape!(Vec<u8>, "Vec<u8>", Bytes);
builtin_shape!(Duration, "Duration", Time);

// SystemTime has no Default; its vtable loses the default slot.
unsafe impl Shaped for SystemTime {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<SystemTime>("SystemTime")
            .vtable(crate::VTable {
                default_in_place: None,
                drop_in_place: Some(crate::vtable::drop_in_place_of::<SystemTime>),
                clone_into: Some(crate::vtable::clone_into_of::<SystemTime>),
                eq: Some(crate::vtable::eq_of::<SystemTime>),
                debug: Some(crate::vtable::debug_of::<SystemTime>),
            })
            .kind(TypeKind::Builtin(Builtin::DateTime))
            .build()
    };
}

macro_rules! sequence_shape {
    ($ty:ty, $identifier:literal) => {
        unsafe impl Shaped for $ty {
            const SHAPE: &'static TypeShape = &const {
                TypeShape::builder_for_sized::<$ty>($identifier)
                    .vtable(value_vtable!($ty))
                    .kind(TypeKind::Sequence)
                    .build()
            };
        }
    };
}

sequence_shape!(Vec<i32>, "Vec<i32>");
sequence_shape!(Vec<f64>, "Vec<f64>");
sequence_shape!(Vec<String>, "Vec<String>");
