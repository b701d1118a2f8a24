//! The dynamic script value: what the scripting side hands the engine.

use core::fmt;

use indexmap::IndexMap;

use crate::{Builtin, PtrConst, ScriptNull, Shaped, TypeKind, TypeShape, ValueCell, ValueView, value_vtable};

/// Ordered name → value mapping, the structural object representation.
///
/// Insertion order is preserved; field lookup during population is by exact
/// name match.
pub type ScriptObject<'mem> = IndexMap<String, ScriptValue<'mem>>;

/// A borrowed reference to a foreign object carrying its own shape.
///
/// Handles may be null: a null handle still knows the shape of what it would
/// point to, mirroring a typed null object reference.
#[derive(Clone, Copy)]
pub struct ObjectHandle<'mem> {
    shape: &'static TypeShape,
    data: Option<PtrConst<'mem>>,
}

impl<'mem> ObjectHandle<'mem> {
    /// A handle borrowing `object`.
    pub fn new<T: Shaped>(object: &'mem T) -> Self {
        Self {
            shape: T::SHAPE,
            data: Some(PtrConst::from_ref(object)),
        }
    }

    /// A null handle of type `T`.
    pub fn null<T: Shaped>() -> ObjectHandle<'static> {
        ObjectHandle {
            shape: T::SHAPE,
            data: None,
        }
    }

    /// The shape of the referenced object type.
    #[inline]
    pub fn shape(&self) -> &'static TypeShape {
        self.shape
    }

    /// Whether this handle references nothing.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.data.is_none()
    }

    /// A view of the referenced object, unless null.
    pub fn view(&self) -> Option<ValueView<'mem>> {
        let data = self.data?;
        // Safety: non-null handles are only constructed from live references
        // accurately described by their shape
        Some(unsafe { ValueView::from_raw(data, self.shape) })
    }
}

impl fmt::Debug for ObjectHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "ObjectHandle<{}>(null)", self.shape)
        } else {
            write!(f, "ObjectHandle<{}>", self.shape)
        }
    }
}

impl PartialEq for ObjectHandle<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.shape.id == other.shape.id
            && match (self.data, other.data) {
                (None, None) => true,
                (Some(a), Some(b)) => core::ptr::eq(a.as_byte_ptr(), b.as_byte_ptr()),
                _ => false,
            }
    }
}

/// A dynamically-typed source value.
///
/// This is the tagged union over everything the scripting runtime can hand
/// the coercion engine. Values are produced fresh per coercion call and are
/// read-only to the engine.
#[derive(Clone, Debug, Default)]
pub enum ScriptValue<'mem> {
    /// Absent / no value.
    #[default]
    Undefined,
    /// The script null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number. Script numbers are double-precision floats.
    Number(f64),
    /// A string.
    String(String),
    /// A structural object: ordered fields, each a script value.
    Object(ScriptObject<'mem>),
    /// A reference to a foreign object, possibly null.
    Handle(ObjectHandle<'mem>),
    /// An already-typed value.
    Cell(ValueCell),
}

static NULL_UNIT: ScriptNull = ScriptNull;

impl<'mem> ScriptValue<'mem> {
    /// The natural raw view of this value, if it has one.
    ///
    /// Primitives view their payload directly; cells view their contents;
    /// objects and handles have no raw single-value representation.
    pub fn as_view(&self) -> Option<ValueView<'_>> {
        match self {
            ScriptValue::Null => Some(ValueView::new(&NULL_UNIT)),
            ScriptValue::Bool(b) => Some(ValueView::new(b)),
            ScriptValue::Number(n) => Some(ValueView::new(n)),
            ScriptValue::String(s) => Some(ValueView::new(s)),
            ScriptValue::Cell(cell) => Some(cell.view()),
            ScriptValue::Undefined | ScriptValue::Object(_) | ScriptValue::Handle(_) => None,
        }
    }

    /// Whether this value is `Undefined`.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, ScriptValue::Undefined)
    }

    /// Whether this value is a null object reference.
    #[inline]
    pub fn is_null_handle(&self) -> bool {
        matches!(self, ScriptValue::Handle(h) if h.is_null())
    }
}

impl fmt::Display for ScriptValue<'_> {
    /// Script-flavored rendering, used verbatim in diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptValue::Undefined => f.write_str("undefined"),
            ScriptValue::Null => f.write_str("null"),
            ScriptValue::Bool(b) => write!(f, "{}", b),
            ScriptValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            ScriptValue::String(s) => f.write_str(s),
            ScriptValue::Object(_) => f.write_str("[object Object]"),
            ScriptValue::Handle(h) => {
                if h.is_null() {
                    f.write_str("null")
                } else {
                    write!(f, "[object {}]", h.shape())
                }
            }
            ScriptValue::Cell(cell) => write!(f, "{}", cell),
        }
    }
}

impl PartialEq for ScriptValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ScriptValue::Undefined, ScriptValue::Undefined) => true,
            (ScriptValue::Null, ScriptValue::Null) => true,
            (ScriptValue::Bool(a), ScriptValue::Bool(b)) => a == b,
            (ScriptValue::Number(a), ScriptValue::Number(b)) => a == b,
            (ScriptValue::String(a), ScriptValue::String(b)) => a == b,
            (ScriptValue::Object(a), ScriptValue::Object(b)) => a == b,
            (ScriptValue::Handle(a), ScriptValue::Handle(b)) => a == b,
            (ScriptValue::Cell(a), ScriptValue::Cell(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for ScriptValue<'_> {
    fn from(value: bool) -> Self {
        ScriptValue::Bool(value)
    }
}

impl From<f64> for ScriptValue<'_> {
    fn from(value: f64) -> Self {
        ScriptValue::Number(value)
    }
}

impl From<i32> for ScriptValue<'_> {
    fn from(value: i32) -> Self {
        ScriptValue::Number(value.into())
    }
}

impl From<&str> for ScriptValue<'_> {
    fn from(value: &str) -> Self {
        ScriptValue::String(value.to_owned())
    }
}

impl From<String> for ScriptValue<'_> {
    fn from(value: String) -> Self {
        ScriptValue::String(value)
    }
}

impl<'mem> From<ScriptObject<'mem>> for ScriptValue<'mem> {
    fn from(value: ScriptObject<'mem>) -> Self {
        ScriptValue::Object(value)
    }
}

impl<'mem> From<ObjectHandle<'mem>> for ScriptValue<'mem> {
    fn from(value: ObjectHandle<'mem>) -> Self {
        ScriptValue::Handle(value)
    }
}

impl From<ValueCell> for ScriptValue<'_> {
    fn from(value: ValueCell) -> Self {
        ScriptValue::Cell(value)
    }
}

// The fully-owned script value is itself a builtin: the generic
// dynamically-typed representation richer conversions bridge into.
unsafe impl Shaped for ScriptValue<'static> {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<ScriptValue<'static>>("ScriptValue")
            .vtable(value_vtable!(ScriptValue<'static>))
            .kind(TypeKind::Builtin(Builtin::Script))
            .build()
    };
}

// Handles are the pointer representation; see `TypeKind::Pointer`.
unsafe impl Shaped for ObjectHandle<'static> {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<ObjectHandle<'static>>("ObjectHandle")
            .vtable(crate::VTable {
                default_in_place: None,
                drop_in_place: Some(crate::vtable::drop_in_place_of::<ObjectHandle<'static>>),
                clone_into: Some(crate::vtable::clone_into_of::<ObjectHandle<'static>>),
                eq: Some(crate::vtable::eq_of::<ObjectHandle<'static>>),
                debug: Some(crate::vtable::debug_of::<ObjectHandle<'static>>),
            })
            .kind(TypeKind::Pointer)
            .build()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_script_flavored() {
        assert_eq!(ScriptValue::Undefined.to_string(), "undefined");
        assert_eq!(ScriptValue::from(true).to_string(), "true");
        assert_eq!(ScriptValue::from(5.0).to_string(), "5");
        assert_eq!(ScriptValue::from(21.5).to_string(), "21.5");
        assert_eq!(ScriptValue::from("warm").to_string(), "warm");
        assert_eq!(
            ScriptValue::Object(ScriptObject::new()).to_string(),
            "[object Object]"
        );
    }

    #[test]
    fn natural_views_carry_builtin_shapes() {
        let value = ScriptValue::from(21.5);
        let view = value.as_view().unwrap();
        assert_eq!(view.shape().id, crate::TypeKey::of::<f64>());
        assert_eq!(view.as_ref::<f64>(), Some(&21.5));

        assert!(ScriptValue::Undefined.as_view().is_none());
        assert!(ScriptValue::Object(ScriptObject::new()).as_view().is_none());
    }

    #[test]
    fn null_handles_compare_by_shape() {
        let a = ScriptValue::Handle(ObjectHandle::null::<f64>());
        let b = ScriptValue::Handle(ObjectHandle::null::<f64>());
        let c = ScriptValue::Handle(ObjectHandle::null::<bool>());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is_null_handle());
        assert_eq!(a.to_string(), "null");
    }

    #[test]
    fn cells_round_trip_through_script_values() {
        let value = ScriptValue::Cell(ValueCell::from_value(7i32));
        let view = value.as_view().unwrap();
        assert_eq!(view.as_ref::<i32>(), Some(&7));
    }
}
