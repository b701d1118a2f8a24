//! Constructor matching: the tiered search over a gadget's constructors.

use smallvec::SmallVec;
use veneer_core::{
    Builtin, Constructor, GadgetDef, PtrConst, PtrUninit, ScriptValue, TypeKind, TypeShape,
    UninitCell, ValueCell, ValueView,
};

use crate::{ScriptEngine, coerce_value, is_constructible};

/// A constructor under consideration, with its parameter shape resolved
/// once. Candidates live only for the duration of one match call.
struct Candidate {
    ctor: &'static Constructor,
    param: &'static TypeShape,
}

fn candidates(gadget: &GadgetDef) -> SmallVec<Candidate, 8> {
    gadget
        .constructors
        .iter()
        .map(|ctor| Candidate {
            ctor,
            param: (ctor.param)(),
        })
        .collect()
}

/// Find the best-matching constructor for `source` and invoke it in place on
/// storage obtained from `allocate`.
///
/// Three tiers, tried in order; the first tier with any match wins, and
/// within a tier the first declared constructor wins:
///
/// 1. exact parameter type,
/// 2. derived parameter type (the source's gadget declares the parameter
///    type as an ancestor),
/// 3. converted parameter type via [`coerce_value`].
///
/// Returns `false` when every candidate is exhausted; the caller owns the
/// resulting diagnostic.
pub(crate) fn from_matching_type<'a>(
    gadget: &GadgetDef,
    source: &ScriptValue<'_>,
    allocate: &mut impl FnMut() -> PtrUninit<'a>,
    engine: Option<&dyn ScriptEngine>,
) -> bool {
    let Some(view) = source.as_view() else {
        return false;
    };
    let candidates = candidates(gadget);

    // Exact parameter matches win outright.
    for c in &candidates {
        if c.param.id == view.shape().id {
            // Safety: the source view is exactly the parameter type
            unsafe { (c.ctor.invoke)(view.data(), allocate()) };
            return true;
        }
    }

    // Derived matches: the source type lists the parameter type as an
    // ancestor, so its storage starts with a parameter value.
    if let TypeKind::Gadget(source_def) = &view.shape().kind {
        for c in &candidates {
            if !matches!(c.param.kind, TypeKind::Gadget(_)) {
                continue;
            }
            if source_def.inherits(c.param.id) {
                // Safety: ancestry guarantees a parameter-typed prefix
                unsafe { (c.ctor.invoke)(view.data(), allocate()) };
                return true;
            }
        }
    }

    // Converted matches. Parameters are not constructed recursively here;
    // that could recurse forever.
    for c in &candidates {
        let mut scratch = UninitCell::for_shape(c.param);
        if coerce_value(view, c.param, scratch.ptr(), engine).is_some() {
            // Safety: coerce_value initialized the scratch storage
            let converted = unsafe { scratch.assume_init() };
            // Safety: the converted temporary is exactly the parameter type
            unsafe { (c.ctor.invoke)(converted.view().data(), allocate()) };
            return true;
        }
    }

    false
}

/// Construct from a bare string through a string-parameter constructor.
pub(crate) fn from_string_ctor<'a>(
    gadget: &GadgetDef,
    text: &str,
    allocate: &mut impl FnMut() -> PtrUninit<'a>,
) -> bool {
    for ctor in gadget.constructors {
        let param = (ctor.param)();
        if matches!(param.kind, TypeKind::Builtin(Builtin::Str)) {
            let owned = text.to_owned();
            // Safety: the parameter type is String
            unsafe { (ctor.invoke)(PtrConst::from_ref(&owned), allocate()) };
            return true;
        }
    }
    false
}

/// Invoke a specific, already-verified constructor of `shape` with `arg`.
///
/// For callers that resolved the overload themselves, e.g. ahead-of-time
/// compiled bindings. The argument's shape must equal the constructor's
/// declared parameter shape, or nothing is constructed.
pub fn construct_with(
    shape: &'static TypeShape,
    ctor_index: usize,
    arg: ValueView<'_>,
) -> Option<ValueCell> {
    if !is_constructible(shape) {
        return None;
    }
    let gadget = shape.as_gadget()?;
    let ctor = gadget.constructors.get(ctor_index)?;
    if (ctor.param)().id != arg.shape().id {
        return None;
    }
    let mut staging = UninitCell::for_shape(shape);
    // Safety: argument shape verified against the parameter shape above
    unsafe {
        (ctor.invoke)(arg.data(), staging.ptr());
    }
    // Safety: the constructor initialized the storage
    Some(unsafe { staging.assume_init() })
}
