//! The constructibility pre-filter.

use veneer_core::{TypeKind, TypeShape};

/// Whether `shape` is a candidate for structural construction at all.
///
/// Builtins (including the generic script value), enumerations, pointers and
/// sequences are never built through constructor matching or property
/// population; only gadget types pass. This runs before any registry or
/// factory lookup, so the common case (a builtin target) costs a single
/// match.
pub fn is_constructible(shape: &TypeShape) -> bool {
    match shape.kind {
        TypeKind::Gadget(_) => true,
        TypeKind::Builtin(_) | TypeKind::Enumeration | TypeKind::Pointer | TypeKind::Sequence => {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use veneer_core::{
        GadgetDef, GadgetFlags, ObjectHandle, ScriptNull, ScriptValue, Shaped, TypeKind, TypeShape,
        property, value_vtable,
    };

    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Blip {
        level: f64,
    }

    unsafe impl Shaped for Blip {
        const SHAPE: &'static TypeShape = &const {
            TypeShape::builder_for_sized::<Blip>("Blip")
                .vtable(value_vtable!(Blip))
                .kind(TypeKind::Gadget(GadgetDef {
                    constructors: &[],
                    properties: &[property!(Blip, level: f64)],
                    ancestors: &[],
                    flags: GadgetFlags::POPULATE,
                }))
                .build()
        };
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    enum Mode {
        #[default]
        Idle,
        #[allow(dead_code)]
        Active,
    }

    unsafe impl Shaped for Mode {
        const SHAPE: &'static TypeShape = &const {
            TypeShape::builder_for_sized::<Mode>("Mode")
                .vtable(value_vtable!(Mode))
                .kind(TypeKind::Enumeration)
                .build()
        };
    }

    #[test]
    fn every_builtin_is_excluded() {
        assert!(!is_constructible(<()>::SHAPE));
        assert!(!is_constructible(ScriptNull::SHAPE));
        assert!(!is_constructible(bool::SHAPE));
        assert!(!is_constructible(i8::SHAPE));
        assert!(!is_constructible(i16::SHAPE));
        assert!(!is_constructible(i32::SHAPE));
        assert!(!is_constructible(i64::SHAPE));
        assert!(!is_constructible(u8::SHAPE));
        assert!(!is_constructible(u16::SHAPE));
        assert!(!is_constructible(u32::SHAPE));
        assert!(!is_constructible(u64::SHAPE));
        assert!(!is_constructible(f32::SHAPE));
        assert!(!is_constructible(f64::SHAPE));
        assert!(!is_constructible(char::SHAPE));
        assert!(!is_constructible(String::SHAPE));
        assert!(!is_constructible(Vec::<u8>::SHAPE));
        assert!(!is_constructible(SystemTime::SHAPE));
        assert!(!is_constructible(Duration::SHAPE));
        // The generic script value is builtin too.
        assert!(!is_constructible(ScriptValue::SHAPE));
    }

    #[test]
    fn pointers_enums_and_sequences_are_excluded() {
        assert!(!is_constructible(ObjectHandle::SHAPE));
        assert!(!is_constructible(Mode::SHAPE));
        assert!(!is_constructible(Vec::<i32>::SHAPE));
        assert!(!is_constructible(Vec::<String>::SHAPE));
    }

    #[test]
    fn gadgets_are_eligible() {
        assert!(is_constructible(Blip::SHAPE));
    }
}
