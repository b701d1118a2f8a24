//! Type shape descriptors, the core data model.
//!
//! A [`TypeShape`] is the static runtime description of a destination type:
//! its identity, layout, erased operations and classification. Shapes are
//! registered once (usually as `&'static` promoted constants through the
//! [`Shaped`](crate::Shaped) trait) and are immutable afterwards; every
//! coercion call references them without copying.

use core::alloc::Layout;
use core::fmt;

use bitflags::bitflags;
use typeid::ConstTypeId;

use crate::{PtrConst, PtrMut, PtrUninit, VTable};

/// Unique identifier for a described type.
///
/// Usable for equality checks and as a hash map key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TypeKey(ConstTypeId);

impl TypeKey {
    /// The key of `T`.
    pub const fn of<T: 'static>() -> Self {
        Self(ConstTypeId::of::<T>())
    }
}

/// Schema for coercion of a type: everything needed to classify a target,
/// allocate storage for it and manipulate its values at runtime.
#[derive(Clone, Copy)]
pub struct TypeShape {
    /// Unique type identifier.
    pub id: TypeKey,

    /// Display name.
    pub type_identifier: &'static str,

    /// Size and alignment, enough to allocate (but not initialize).
    pub layout: Layout,

    /// Erased operations (default, drop, clone, eq, debug).
    pub vtable: VTable,

    /// Classification driving constructibility.
    pub kind: TypeKind,
}

impl PartialEq for TypeShape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeShape {}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_identifier)
    }
}

impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeShape")
            .field("type_identifier", &self.type_identifier)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl TypeShape {
    /// Create a new builder for a sized type.
    ///
    /// The `id` and `layout` are derived from the type parameter.
    #[inline]
    pub const fn builder_for_sized<T: 'static>(type_identifier: &'static str) -> ShapeBuilder {
        ShapeBuilder {
            shape: TypeShape {
                id: TypeKey::of::<T>(),
                type_identifier,
                layout: Layout::new::<T>(),
                vtable: VTable::empty(),
                kind: TypeKind::Builtin(Builtin::Void),
            },
        }
    }

    /// The gadget definition, if this shape describes a gadget.
    #[inline]
    pub const fn as_gadget(&self) -> Option<&GadgetDef> {
        match &self.kind {
            TypeKind::Gadget(def) => Some(def),
            _ => None,
        }
    }
}

/// Builder for [`TypeShape`] instances, usable in const contexts.
pub struct ShapeBuilder {
    shape: TypeShape,
}

impl ShapeBuilder {
    /// Set the vtable.
    #[inline]
    pub const fn vtable(mut self, vtable: VTable) -> Self {
        self.shape.vtable = vtable;
        self
    }

    /// Set the classification.
    #[inline]
    pub const fn kind(mut self, kind: TypeKind) -> Self {
        self.shape.kind = kind;
        self
    }

    /// Finalize the shape.
    #[inline]
    pub const fn build(self) -> TypeShape {
        self.shape
    }
}

/// Classification of a described type.
///
/// Only [`TypeKind::Gadget`] types are candidates for structural coercion;
/// everything else is filtered out up front.
#[derive(Clone, Copy)]
pub enum TypeKind {
    /// One of the closed set of builtin value shapes.
    Builtin(Builtin),
    /// An enumeration.
    Enumeration,
    /// A reference to an object with its own shape.
    ///
    /// Values of pointer kind are represented as
    /// [`ObjectHandle<'static>`](crate::ObjectHandle); a shape must not claim
    /// this kind for any other representation.
    Pointer,
    /// A list/sequence type.
    Sequence,
    /// A user value type with properties and/or constructors.
    Gadget(GadgetDef),
}

/// The closed vocabulary of builtin value shapes.
///
/// Builtins are never structurally constructed; they only participate as
/// constructor parameters, property types and conversion sources.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Builtin {
    /// The unit/void type.
    Void,
    /// The null unit value ([`ScriptNull`](crate::ScriptNull)).
    Null,
    /// `bool`.
    Bool,
    /// `i8`.
    I8,
    /// `i16`.
    I16,
    /// `i32`.
    I32,
    /// `i64`.
    I64,
    /// `u8`.
    U8,
    /// `u16`.
    U16,
    /// `u32`.
    U32,
    /// `u64`.
    U64,
    /// `f32`.
    F32,
    /// `f64`.
    F64,
    /// `char`.
    Char,
    /// Owned UTF-8 text.
    Str,
    /// Binary data.
    Bytes,
    /// A point in time.
    DateTime,
    /// A calendar date.
    Date,
    /// A time span or time of day.
    Time,
    /// A URL.
    Url,
    /// A regular expression.
    Regex,
    /// A locale identifier.
    Locale,
    /// The generic dynamically-typed script value.
    Script,
}

bitflags! {
    /// What a gadget type allows the coercion engine to do.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct GadgetFlags: u8 {
        /// The type may be built by matching one of its constructors.
        const CONSTRUCT = 1 << 0;
        /// The type may be filled property-by-property from a structural source.
        const POPULATE = 1 << 1;
    }
}

/// Description of a user value type: constructors, properties, ancestry and
/// capability flags.
#[derive(Clone, Copy)]
pub struct GadgetDef {
    /// Declared constructors. Declaration order is match order; ties go to
    /// the first declared.
    pub constructors: &'static [Constructor],

    /// Declared properties. Declaration order is write order.
    pub properties: &'static [Property],

    /// Precomputed is-a list of ancestor type keys.
    ///
    /// # Safety
    ///
    /// Every listed ancestor's shape must describe a prefix of this type's
    /// memory layout (`#[repr(C)]` with the ancestor as first field), since
    /// derived-type construction reads the ancestor value straight out of
    /// the derived storage.
    pub ancestors: &'static [TypeKey],

    /// Capability flags.
    pub flags: GadgetFlags,
}

impl GadgetDef {
    /// A definition with nothing declared and no capabilities.
    pub const fn empty() -> Self {
        Self {
            constructors: &[],
            properties: &[],
            ancestors: &[],
            flags: GadgetFlags::empty(),
        }
    }

    /// Whether this gadget declares `key` as an ancestor.
    #[inline]
    pub fn inherits(&self, key: TypeKey) -> bool {
        self.ancestors.contains(&key)
    }

    /// Find a declared property by name.
    #[inline]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Placement-construct a target value from a single parameter value.
///
/// The parameter is read by shared reference and cloned as needed; the
/// constructor never takes ownership of its argument.
pub type ConstructFn = for<'src, 'mem> unsafe fn(PtrConst<'src>, PtrUninit<'mem>) -> PtrMut<'mem>;

/// Clone a property value out of a gadget into uninitialized storage.
pub type PropertyReadFn = for<'src, 'mem> unsafe fn(PtrConst<'src>, PtrUninit<'mem>) -> PtrMut<'mem>;

/// Clone a value into a property of the gadget behind the first pointer.
pub type PropertyWriteFn = for<'obj, 'val> unsafe fn(PtrMut<'obj>, PtrConst<'val>);

/// A single-parameter in-place constructor of a gadget.
#[derive(Clone, Copy)]
pub struct Constructor {
    /// Shape of the parameter.
    ///
    /// The indirection allows cyclic type graphs.
    pub param: fn() -> &'static TypeShape,

    /// Invoke the constructor: read the parameter value behind the first
    /// pointer and placement-construct the target into the second.
    pub invoke: ConstructFn,
}

/// A named, readable, writable property of a gadget.
#[derive(Clone, Copy)]
pub struct Property {
    /// Property name, matched exactly against source field names.
    pub name: &'static str,

    /// Shape of the property value.
    pub shape: fn() -> &'static TypeShape,

    /// Clone the property value out.
    pub read: PropertyReadFn,

    /// Clone a value in.
    pub write: PropertyWriteFn,
}
