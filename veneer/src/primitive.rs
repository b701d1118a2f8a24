//! Direct conversions between primitive shapes and the generic script value.
//!
//! Everything here is deliberately narrow: a closed set of primitive shapes
//! converts directly, and anything else reports "not applicable" so callers
//! can fall back to richer coercion. No function in this module recurses or
//! allocates beyond the converted value itself.

use veneer_core::{Builtin, ObjectHandle, PtrMut, PtrUninit, ScriptValue, TypeKind, TypeShape, ValueView};

use crate::ScriptEngine;

/// Bridge a raw value directly into the generic script representation.
///
/// Handles only the primitive wire shapes: void, null, bool, `i32`, `f64`
/// and strings, plus null object references (which bridge to the script
/// null). Everything else returns `None`, signaling the caller to fall back
/// to an engine-assisted conversion.
pub fn coerce_to_script(value: ValueView<'_>) -> Option<ScriptValue<'static>> {
    match value.shape().kind {
        TypeKind::Pointer => {
            // Safety: pointer-kind values are ObjectHandles by contract
            let handle = unsafe { value.get::<ObjectHandle<'static>>() };
            handle.is_null().then_some(ScriptValue::Null)
        }
        TypeKind::Builtin(builtin) => {
            // Safety: each arm reads the exact type the builtin tag declares
            unsafe {
                match builtin {
                    Builtin::Void => Some(ScriptValue::Undefined),
                    Builtin::Null => Some(ScriptValue::Null),
                    Builtin::Bool => Some(ScriptValue::Bool(*value.get::<bool>())),
                    Builtin::I32 => Some(ScriptValue::Number((*value.get::<i32>()).into())),
                    Builtin::F64 => Some(ScriptValue::Number(*value.get::<f64>())),
                    Builtin::Str => Some(ScriptValue::String(value.get::<String>().clone())),
                    _ => None,
                }
            }
        }
        _ => None,
    }
}

/// A scalar read out of a builtin value, unified for conversion arithmetic.
enum Scalar {
    Bool(bool),
    Int(i128),
    Float(f64),
    Char(char),
}

impl Scalar {
    fn as_int(self) -> Option<i128> {
        match self {
            Scalar::Bool(b) => Some(b as i128),
            Scalar::Int(i) => Some(i),
            Scalar::Float(x) => Some(x as i128),
            Scalar::Char(_) => None,
        }
    }

    fn as_float(self) -> Option<f64> {
        match self {
            Scalar::Bool(b) => Some(b as u8 as f64),
            Scalar::Int(i) => Some(i as f64),
            Scalar::Float(x) => Some(x),
            Scalar::Char(_) => None,
        }
    }

    fn truthy(self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(b),
            Scalar::Int(i) => Some(i != 0),
            Scalar::Float(x) => Some(x != 0.0),
            Scalar::Char(_) => None,
        }
    }
}

fn read_scalar(value: ValueView<'_>) -> Option<Scalar> {
    let TypeKind::Builtin(builtin) = value.shape().kind else {
        return None;
    };
    // Safety: each arm reads the exact type the builtin tag declares
    unsafe {
        Some(match builtin {
            Builtin::Bool => Scalar::Bool(*value.get::<bool>()),
            Builtin::I8 => Scalar::Int((*value.get::<i8>()).into()),
            Builtin::I16 => Scalar::Int((*value.get::<i16>()).into()),
            Builtin::I32 => Scalar::Int((*value.get::<i32>()).into()),
            Builtin::I64 => Scalar::Int((*value.get::<i64>()).into()),
            Builtin::U8 => Scalar::Int((*value.get::<u8>()).into()),
            Builtin::U16 => Scalar::Int((*value.get::<u16>()).into()),
            Builtin::U32 => Scalar::Int((*value.get::<u32>()).into()),
            Builtin::U64 => Scalar::Int((*value.get::<u64>()).into()),
            Builtin::F32 => Scalar::Float((*value.get::<f32>()).into()),
            Builtin::F64 => Scalar::Float(*value.get::<f64>()),
            Builtin::Char => Scalar::Char(*value.get::<char>()),
            _ => return None,
        })
    }
}

/// The conservative builtin-to-builtin conversion table.
///
/// Covers identity copies, numeric and boolean casts, number/bool/char to
/// string formatting and string to number parsing. Writes the converted
/// value into `out` and returns the initialized pointer, or `None` without
/// touching `out`.
pub(crate) fn convert_builtin<'mem>(
    from: ValueView<'_>,
    to: &'static TypeShape,
    out: PtrUninit<'mem>,
) -> Option<PtrMut<'mem>> {
    // Identity: plain copy through the vtable.
    if from.shape().id == to.id {
        let clone_fn = to.vtable.clone_into?;
        return Some(unsafe { clone_fn(from.data(), out) });
    }

    let TypeKind::Builtin(target) = to.kind else {
        return None;
    };

    let int_source = || -> Option<i128> {
        if let Some(text) = from.as_ref::<String>() {
            return text.trim().parse().ok();
        }
        read_scalar(from)?.as_int()
    };
    let float_source = || -> Option<f64> {
        if let Some(text) = from.as_ref::<String>() {
            return text.trim().parse().ok();
        }
        read_scalar(from)?.as_float()
    };

    // Safety: every put writes the exact type the target tag declares
    unsafe {
        match target {
            Builtin::Bool => {
                let truthy = read_scalar(from)?.truthy()?;
                Some(out.put(truthy))
            }
            Builtin::I8 => Some(out.put(int_source()? as i8)),
            Builtin::I16 => Some(out.put(int_source()? as i16)),
            Builtin::I32 => Some(out.put(int_source()? as i32)),
            Builtin::I64 => Some(out.put(int_source()? as i64)),
            Builtin::U8 => Some(out.put(int_source()? as u8)),
            Builtin::U16 => Some(out.put(int_source()? as u16)),
            Builtin::U32 => Some(out.put(int_source()? as u32)),
            Builtin::U64 => Some(out.put(int_source()? as u64)),
            Builtin::F32 => Some(out.put(float_source()? as f32)),
            Builtin::F64 => Some(out.put(float_source()?)),
            Builtin::Str => {
                let text = match read_scalar(from)? {
                    Scalar::Bool(b) => b.to_string(),
                    Scalar::Int(i) => i.to_string(),
                    Scalar::Float(x) => x.to_string(),
                    Scalar::Char(c) => c.to_string(),
                };
                Some(out.put(text))
            }
            _ => None,
        }
    }
}

/// The generic value conversion fallback.
///
/// Tries the builtin conversion table first, then (for the generic script
/// value target only) the direct primitive bridge and finally the
/// engine-assisted bridge. We would like to route everything through the
/// script representation, but that would let a value type with a number or
/// string constructor be constructed from any value at all; the builtin
/// table is intentionally stricter than script semantics.
///
/// Without an engine, conversions that need one report `None` rather than
/// failing loudly.
pub fn coerce_value<'mem>(
    from: ValueView<'_>,
    to: &'static TypeShape,
    out: PtrUninit<'mem>,
    engine: Option<&dyn ScriptEngine>,
) -> Option<PtrMut<'mem>> {
    if let Some(written) = convert_builtin(from, to, out) {
        return Some(written);
    }

    if matches!(to.kind, TypeKind::Builtin(Builtin::Script)) {
        if let Some(value) = coerce_to_script(from) {
            // Safety: the script target is ScriptValue by definition
            return Some(unsafe { out.put(value) });
        }
        let engine = engine?;
        let value = engine.to_script(from)?;
        // Safety: as above
        return Some(unsafe { out.put(value) });
    }

    None
}

#[cfg(test)]
mod tests {
    use veneer_core::{ObjectHandle, Shaped, UninitCell, ValueView};

    use super::*;

    fn convert<T: Shaped>(from: ValueView<'_>) -> Option<T> {
        let mut staging = UninitCell::for_shape(T::SHAPE);
        convert_builtin(from, T::SHAPE, staging.ptr())?;
        // Safety: convert_builtin initialized the storage
        let cell = unsafe { staging.assume_init() };
        cell.materialize::<T>().ok()
    }

    #[test]
    fn primitives_bridge_directly() {
        assert_eq!(
            coerce_to_script(ValueView::new(&true)),
            Some(ScriptValue::Bool(true))
        );
        assert_eq!(
            coerce_to_script(ValueView::new(&7i32)),
            Some(ScriptValue::Number(7.0))
        );
        assert_eq!(
            coerce_to_script(ValueView::new(&21.5f64)),
            Some(ScriptValue::Number(21.5))
        );
        assert_eq!(
            coerce_to_script(ValueView::new(&String::from("hi"))),
            Some(ScriptValue::String("hi".into()))
        );
        assert_eq!(coerce_to_script(ValueView::new(&())), Some(ScriptValue::Undefined));
    }

    #[test]
    fn richer_types_are_not_applicable() {
        assert_eq!(coerce_to_script(ValueView::new(&5u64)), None);
        assert_eq!(coerce_to_script(ValueView::new(&vec![1i32])), None);
    }

    #[test]
    fn null_handles_bridge_to_null() {
        let null = ObjectHandle::null::<f64>();
        assert_eq!(
            coerce_to_script(ValueView::new(&null)),
            Some(ScriptValue::Null)
        );
    }

    #[test]
    fn numeric_conversions() {
        assert_eq!(convert::<i32>(ValueView::new(&21.9f64)), Some(21));
        assert_eq!(convert::<f64>(ValueView::new(&3i32)), Some(3.0));
        assert_eq!(convert::<bool>(ValueView::new(&1i32)), Some(true));
        assert_eq!(convert::<bool>(ValueView::new(&0.0f64)), Some(false));
        assert_eq!(convert::<u8>(ValueView::new(&true)), Some(1));
    }

    #[test]
    fn string_conversions() {
        assert_eq!(
            convert::<String>(ValueView::new(&21.5f64)),
            Some("21.5".to_owned())
        );
        assert_eq!(convert::<String>(ValueView::new(&false)), Some("false".to_owned()));
        assert_eq!(
            convert::<f64>(ValueView::new(&String::from(" 2.5 "))),
            Some(2.5)
        );
        assert_eq!(convert::<i64>(ValueView::new(&String::from("42"))), Some(42));
        // Fractional text does not parse as an integer.
        assert_eq!(convert::<i64>(ValueView::new(&String::from("4.2"))), None);
        // Strings are not truthy.
        assert_eq!(convert::<bool>(ValueView::new(&String::from("yes"))), None);
    }

    #[test]
    fn script_target_degrades_without_engine() {
        let mut staging = UninitCell::for_shape(ScriptValue::SHAPE);
        // A u64 has no direct primitive bridge, and there is no engine.
        assert!(coerce_value(ValueView::new(&5u64), ScriptValue::SHAPE, staging.ptr(), None).is_none());

        // Primitives still bridge without one.
        let mut staging = UninitCell::for_shape(ScriptValue::SHAPE);
        assert!(coerce_value(ValueView::new(&5i32), ScriptValue::SHAPE, staging.ptr(), None).is_some());
        // Safety: just written by coerce_value
        let cell = unsafe { staging.assume_init() };
        assert_eq!(
            cell.materialize::<ScriptValue>().unwrap(),
            ScriptValue::Number(5.0)
        );
    }
}
