//! Shared value-type fixtures for the integration suites.
#![allow(dead_code)]

use veneer::{
    GadgetDef, GadgetFlags, ScriptEngine, ScriptObject, ScriptValue, Shaped, TypeKey, TypeKind,
    TypeShape, UninitCell, ValueView, coerce_to_script, constructor, property, value_vtable,
};

/// Plain populate-only value type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

unsafe impl Shaped for Point {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<Point>("Point")
            .vtable(value_vtable!(Point))
            .kind(TypeKind::Gadget(GadgetDef {
                constructors: &[],
                properties: &[property!(Point, x: f64), property!(Point, y: f64)],
                ancestors: &[],
                flags: GadgetFlags::POPULATE,
            }))
            .build()
    };
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

unsafe impl Shaped for Size {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<Size>("Size")
            .vtable(value_vtable!(Size))
            .kind(TypeKind::Gadget(GadgetDef {
                constructors: &[],
                properties: &[property!(Size, w: f64), property!(Size, h: f64)],
                ancestors: &[],
                flags: GadgetFlags::POPULATE,
            }))
            .build()
    };
}

/// Nests two gadget-typed properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

unsafe impl Shaped for Rect {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<Rect>("Rect")
            .vtable(value_vtable!(Rect))
            .kind(TypeKind::Gadget(GadgetDef {
                constructors: &[],
                properties: &[property!(Rect, origin: Point), property!(Rect, size: Size)],
                ancestors: &[],
                flags: GadgetFlags::POPULATE,
            }))
            .build()
    };
}

/// A point with a third axis, layout-compatible with [`Point`].
#[derive(Debug, Clone, Default, PartialEq)]
#[repr(C)]
pub struct Point3 {
    pub xy: Point,
    pub z: f64,
}

unsafe impl Shaped for Point3 {
    const SHAPE: &'static TypeShape = &const {
        const ANCESTORS: &[TypeKey] = &[TypeKey::of::<Point>()];
        TypeShape::builder_for_sized::<Point3>("Point3")
            .vtable(value_vtable!(Point3))
            .kind(TypeKind::Gadget(GadgetDef {
                constructors: &[],
                properties: &[property!(Point3, z: f64)],
                ancestors: ANCESTORS,
                flags: GadgetFlags::empty(),
            }))
            .build()
    };
}

/// Constructed from a [`Point`]; exercises derived-parameter matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Anchor {
    pub at: Point,
}

unsafe impl Shaped for Anchor {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<Anchor>("Anchor")
            .vtable(value_vtable!(Anchor))
            .kind(TypeKind::Gadget(GadgetDef {
                constructors: &[constructor!(Point => |p: &Point| Anchor { at: p.clone() })],
                properties: &[],
                ancestors: &[],
                flags: GadgetFlags::CONSTRUCT,
            }))
            .build()
    };
}

/// Construct-only type with two numeric constructors.
///
/// The `i32` constructor takes hundredths of a degree, so picking the wrong
/// overload is observable in the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Temperature {
    pub celsius: f64,
}

unsafe impl Shaped for Temperature {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<Temperature>("Temperature")
            .vtable(value_vtable!(Temperature))
            .kind(TypeKind::Gadget(GadgetDef {
                constructors: &[
                    constructor!(i32 => |hundredths: &i32| Temperature {
                        celsius: f64::from(*hundredths) / 100.0,
                    }),
                    constructor!(f64 => |celsius: &f64| Temperature { celsius: *celsius }),
                ],
                properties: &[],
                ancestors: &[],
                flags: GadgetFlags::CONSTRUCT,
            }))
            .build()
    };
}

/// Construct-only type with a string constructor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    pub label: String,
}

unsafe impl Shaped for Tag {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<Tag>("Tag")
            .vtable(value_vtable!(Tag))
            .kind(TypeKind::Gadget(GadgetDef {
                constructors: &[constructor!(String => |label: &String| Tag {
                    label: label.clone(),
                })],
                properties: &[],
                ancestors: &[],
                flags: GadgetFlags::CONSTRUCT,
            }))
            .build()
    };
}

/// Carries both capabilities: populates from structural sources, constructs
/// from everything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Angle {
    pub degrees: f64,
}

unsafe impl Shaped for Angle {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<Angle>("Angle")
            .vtable(value_vtable!(Angle))
            .kind(TypeKind::Gadget(GadgetDef {
                constructors: &[constructor!(f64 => |degrees: &f64| Angle { degrees: *degrees })],
                properties: &[property!(Angle, degrees: f64)],
                ancestors: &[],
                flags: GadgetFlags::CONSTRUCT.union(GadgetFlags::POPULATE),
            }))
            .build()
    };
}

/// Populate-only type with mixed property types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Label {
    pub id: i32,
    pub text: String,
}

unsafe impl Shaped for Label {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<Label>("Label")
            .vtable(value_vtable!(Label))
            .kind(TypeKind::Gadget(GadgetDef {
                constructors: &[],
                properties: &[property!(Label, id: i32), property!(Label, text: String)],
                ancestors: &[],
                flags: GadgetFlags::POPULATE,
            }))
            .build()
    };
}

/// Holds a generic script value, exercising the engine-assisted bridge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub count: i32,
    pub meta: ScriptValue<'static>,
}

unsafe impl Shaped for Payload {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<Payload>("Payload")
            .vtable(value_vtable!(Payload))
            .kind(TypeKind::Gadget(GadgetDef {
                constructors: &[],
                properties: &[
                    property!(Payload, count: i32),
                    property!(Payload, meta: ScriptValue<'static>),
                ],
                ancestors: &[],
                flags: GadgetFlags::POPULATE,
            }))
            .build()
    };
}

/// A gadget with nothing declared and no capabilities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Opaque {
    pub token: u64,
}

unsafe impl Shaped for Opaque {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<Opaque>("Opaque")
            .vtable(value_vtable!(Opaque))
            .kind(TypeKind::Gadget(GadgetDef::empty()))
            .build()
    };
}

/// Claims the construct capability but declares no constructors, so only a
/// registered factory can build it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Color {
    pub rgba: u32,
}

impl Color {
    pub fn named(name: &str) -> Option<Color> {
        match name {
            "red" => Some(Color { rgba: 0xff00_00ff }),
            "blue" => Some(Color { rgba: 0x0000_ffff }),
            _ => None,
        }
    }
}

unsafe impl Shaped for Color {
    const SHAPE: &'static TypeShape = &const {
        TypeShape::builder_for_sized::<Color>("Color")
            .vtable(value_vtable!(Color))
            .kind(TypeKind::Gadget(GadgetDef {
                constructors: &[],
                properties: &[],
                ancestors: &[],
                flags: GadgetFlags::CONSTRUCT,
            }))
            .build()
    };
}

/// A stand-in execution context: bridges primitives directly and renders
/// gadget values as structural objects.
pub struct ReflectiveEngine;

impl ScriptEngine for ReflectiveEngine {
    fn to_script(&self, value: ValueView<'_>) -> Option<ScriptValue<'static>> {
        if let Some(bridged) = coerce_to_script(value) {
            return Some(bridged);
        }
        let TypeKind::Gadget(def) = &value.shape().kind else {
            return None;
        };
        let mut fields = ScriptObject::new();
        for prop in def.properties {
            let mut staging = UninitCell::for_shape((prop.shape)());
            // Safety: the property read clones into the staging storage
            unsafe {
                (prop.read)(value.data(), staging.ptr());
            }
            // Safety: initialized by the read above
            let cell = unsafe { staging.assume_init() };
            let bridged = coerce_to_script(cell.view());
            fields.insert(
                prop.name.to_owned(),
                bridged.unwrap_or(ScriptValue::Cell(cell)),
            );
        }
        Some(ScriptValue::Object(fields))
    }
}

/// Builtin used by several tests: a structural object literal.
pub fn object<'mem, const N: usize>(fields: [(&str, ScriptValue<'mem>); N]) -> ScriptValue<'mem> {
    ScriptValue::Object(
        fields
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value))
            .collect(),
    )
}
