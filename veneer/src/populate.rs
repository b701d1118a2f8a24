//! Best-effort property population.

use log::warn;
use veneer_core::{
    GadgetDef, Property, PtrMut, ScriptValue, TypeKind, UninitCell, ValueView,
};

use crate::{Coercer, coerce_value};

/// Whether a source can drive property-by-property population: a structural
/// object, a live foreign handle, or an already-typed gadget value.
pub(crate) fn is_structural(source: &ScriptValue<'_>) -> bool {
    match source {
        ScriptValue::Object(_) => true,
        ScriptValue::Handle(handle) => !handle.is_null(),
        ScriptValue::Cell(cell) => matches!(cell.shape().kind, TypeKind::Gadget(_)),
        _ => false,
    }
}

/// Copy same-named fields from `source` into the gadget behind `target`.
///
/// Every declared property is attempted independently, in declaration order,
/// regardless of earlier failures. Fields the source does not mention are
/// skipped: the storage is assumed freshly constructed, so absent fields
/// keep their defaults. Fields that exist but cannot be coerced are logged
/// and skipped.
pub(crate) fn write_properties(
    coercer: &Coercer<'_>,
    gadget: &GadgetDef,
    target: PtrMut<'_>,
    source: &ScriptValue<'_>,
    depth: usize,
) {
    for prop in gadget.properties {
        let Some(field) = fetch_field(source, prop.name) else {
            continue;
        };
        write_property(coercer, prop, target, field.get(), depth);
    }
}

/// A field value pulled out of a source: borrowed straight from a structural
/// object, or cloned out of a foreign handle/gadget.
enum FieldValue<'src> {
    Borrowed(&'src ScriptValue<'src>),
    Owned(ScriptValue<'static>),
}

impl FieldValue<'_> {
    fn get(&self) -> &ScriptValue<'_> {
        match self {
            FieldValue::Borrowed(value) => value,
            FieldValue::Owned(value) => value,
        }
    }
}

fn fetch_field<'src>(source: &'src ScriptValue<'_>, name: &str) -> Option<FieldValue<'src>> {
    match source {
        ScriptValue::Object(fields) => match fields.get(name) {
            // An explicitly-undefined field counts as absent.
            None | Some(ScriptValue::Undefined) => None,
            Some(value) => Some(FieldValue::Borrowed(value)),
        },
        ScriptValue::Handle(handle) => {
            let view = handle.view()?;
            read_gadget_field(view, name).map(FieldValue::Owned)
        }
        ScriptValue::Cell(cell) => read_gadget_field(cell.view(), name).map(FieldValue::Owned),
        _ => None,
    }
}

/// Clone a same-named property out of a gadget-shaped source value.
fn read_gadget_field(view: ValueView<'_>, name: &str) -> Option<ScriptValue<'static>> {
    let TypeKind::Gadget(def) = &view.shape().kind else {
        return None;
    };
    let prop = def.property(name)?;
    let mut staging = UninitCell::for_shape((prop.shape)());
    // Safety: read clones the property value into the staging storage
    unsafe {
        (prop.read)(view.data(), staging.ptr());
    }
    // Safety: initialized by the property read above
    let cell = unsafe { staging.assume_init() };
    Some(ScriptValue::Cell(cell))
}

/// One property, full cascade: exact type, nested value-type coercion,
/// generic conversion, then a diagnostic.
fn write_property(
    coercer: &Coercer<'_>,
    prop: &Property,
    target: PtrMut<'_>,
    field: &ScriptValue<'_>,
    depth: usize,
) {
    let prop_shape = (prop.shape)();

    // Same type: write the raw value straight in.
    if let Some(view) = field.as_view() {
        if view.shape().id == prop_shape.id {
            // Safety: view shape equals the property shape
            unsafe { (prop.write)(target, view.data()) };
            return;
        }
    }

    // A nested value type: run the full coercion into the property type.
    if let Some(cell) = coercer.create_at_depth(field, prop_shape, depth + 1) {
        // Safety: the cell holds a property-shaped value
        unsafe { (prop.write)(target, cell.view().data()) };
        return;
    }

    // Generic conversion fallback.
    if let Some(view) = field.as_view() {
        let mut scratch = UninitCell::for_shape(prop_shape);
        if coerce_value(view, prop_shape, scratch.ptr(), coercer.engine()).is_some() {
            // Safety: coerce_value initialized the scratch storage
            let converted = unsafe { scratch.assume_init() };
            // Safety: the converted temporary is property-shaped
            unsafe { (prop.write)(target, converted.view().data()) };
            return;
        }
    }

    warn!(
        "Could not convert {} to {} for property {}",
        field, prop_shape, prop.name
    );
}
