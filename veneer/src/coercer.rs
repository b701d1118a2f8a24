//! The coercion orchestrator and its injected collaborators.

use hashbrown::HashMap;
use log::warn;
use veneer_core::{
    GadgetDef, GadgetFlags, PtrMut, PtrUninit, ScriptValue, Shaped, TypeKey, TypeShape, UninitCell,
    ValueCell,
};

use crate::construct::{from_matching_type, from_string_ctor};
use crate::populate::{is_structural, write_properties};
use crate::{ScriptEngine, is_constructible};

/// Upper bound on gadget-in-gadget coercion nesting.
///
/// Value types cannot be cyclic by value, so real nesting stays shallow; the
/// bound exists to stop pathological descriptor graphs from recursing
/// forever.
pub const MAX_COERCE_DEPTH: usize = 8;

/// A user-registered fallback builder for one target type.
pub type FactoryFn = Box<dyn Fn(&ScriptValue<'_>) -> Option<ValueCell> + Send + Sync>;

/// Per-type fallback factories.
///
/// Consulted only after structural matching has failed (or for types with no
/// structural capabilities at all). Populated during type registration and
/// read-only afterwards.
#[derive(Default)]
pub struct FactoryRegistry {
    factories: HashMap<TypeKey, FactoryFn>,
}

impl FactoryRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `T`, replacing any previous one.
    pub fn register<T: Shaped>(
        &mut self,
        factory: impl Fn(&ScriptValue<'_>) -> Option<ValueCell> + Send + Sync + 'static,
    ) {
        self.factories.insert(T::SHAPE.id, Box::new(factory));
    }

    /// The factory registered for `shape`, if any.
    pub fn lookup(&self, shape: &TypeShape) -> Option<&FactoryFn> {
        self.factories.get(&shape.id)
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no factories are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// The public entry point: decides between property population, constructor
/// matching and fallback factories, and owns the allocation strategy.
///
/// Collaborators are injected explicitly. A bare [`Coercer::new`] handles
/// everything that needs neither a script engine (only the generic-value
/// bridge does) nor fallback factories.
#[derive(Clone, Copy, Default)]
pub struct Coercer<'cx> {
    engine: Option<&'cx dyn ScriptEngine>,
    factories: Option<&'cx FactoryRegistry>,
}

impl<'cx> Coercer<'cx> {
    /// A coercer with no collaborators.
    pub fn new() -> Self {
        Self {
            engine: None,
            factories: None,
        }
    }

    /// Attach the execution context used for generic-value bridging.
    pub fn with_engine(mut self, engine: &'cx dyn ScriptEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Attach the fallback factory registry.
    pub fn with_factories(mut self, factories: &'cx FactoryRegistry) -> Self {
        self.factories = Some(factories);
        self
    }

    pub(crate) fn engine(&self) -> Option<&'cx dyn ScriptEngine> {
        self.engine
    }

    /// Coerce `source` into a freshly allocated value of `target`'s type.
    ///
    /// Storage is sized and aligned per the shape's layout and ownership of
    /// the populated cell passes to the caller. Returns `None` when the
    /// target is not constructible or no strategy applied; any details are
    /// in the warning diagnostics.
    pub fn create(&self, source: &ScriptValue<'_>, target: &'static TypeShape) -> Option<ValueCell> {
        self.create_at_depth(source, target, 0)
    }

    /// Coerce and materialize in one step.
    pub fn create_typed<T: Shaped>(&self, source: &ScriptValue<'_>) -> Option<T> {
        self.create(source, T::SHAPE)?.materialize::<T>().ok()
    }

    pub(crate) fn create_at_depth(
        &self,
        source: &ScriptValue<'_>,
        target: &'static TypeShape,
        depth: usize,
    ) -> Option<ValueCell> {
        if !is_constructible(target) {
            return None;
        }
        if depth > MAX_COERCE_DEPTH {
            warn!(
                "Giving up on value type {} nested deeper than {} levels",
                target, MAX_COERCE_DEPTH
            );
            return None;
        }
        let gadget = target.as_gadget()?;

        let mut staging = UninitCell::for_shape(target);
        let ptr = staging.ptr();
        let mut allocate = || ptr;
        let mut default_construct = || {
            let default_fn = target.vtable.default_in_place?;
            // Safety: staging storage is allocated for `target` and unoccupied
            Some(unsafe { default_fn(ptr) })
        };
        if self.decide(target, gadget, source, &mut allocate, &mut default_construct, depth) {
            // Safety: the chosen strategy fully initialized the storage
            Some(unsafe { staging.assume_init() })
        } else {
            None
        }
    }

    /// Coerce `source` into caller-owned storage already holding a live
    /// value of `target`'s type, typically freshly default-constructed.
    ///
    /// The populate path writes properties into the existing value, leaving
    /// fields the source does not mention untouched; the construct path
    /// drops the old value first and placement-constructs a replacement into
    /// the same storage. On `false` the storage still holds a valid value.
    pub fn populate(
        &self,
        source: &ScriptValue<'_>,
        target: &'static TypeShape,
        storage: PtrMut<'_>,
    ) -> bool {
        if !is_constructible(target) {
            return false;
        }
        let Some(gadget) = target.as_gadget() else {
            return false;
        };

        let mut allocate = || {
            // The storage holds a live value; clear it before reuse. Each
            // decision invokes its allocator at most once.
            if let Some(drop_fn) = target.vtable.drop_in_place {
                // Safety: the caller hands in a live value of `target`
                unsafe { drop_fn(storage) };
            }
            storage.as_uninit()
        };
        let mut default_construct = || Some(storage);
        self.decide(target, gadget, source, &mut allocate, &mut default_construct, 0)
    }

    /// Construct a value of `target`'s type from a bare string.
    ///
    /// Uses a string-parameter constructor when one is declared, else the
    /// fallback factory.
    pub fn from_string(&self, text: &str, target: &'static TypeShape) -> Option<ValueCell> {
        if !is_constructible(target) {
            return None;
        }
        let gadget = target.as_gadget()?;

        if gadget.flags.contains(GadgetFlags::CONSTRUCT) {
            let mut staging = UninitCell::for_shape(target);
            let ptr = staging.ptr();
            let mut allocate = || ptr;
            if from_string_ctor(gadget, text, &mut allocate) {
                // Safety: the constructor initialized the storage
                return Some(unsafe { staging.assume_init() });
            }
        }

        if let Some(factory) = self.factories.and_then(|f| f.lookup(target)) {
            let source = ScriptValue::String(text.to_owned());
            if let Some(cell) = factory(&source) {
                if cell.shape().id == target.id {
                    return Some(cell);
                }
            }
        }

        None
    }

    /// The decision table. Both allocation entry points funnel through here;
    /// only the closures differ.
    fn decide<'a>(
        &self,
        target: &'static TypeShape,
        gadget: &GadgetDef,
        source: &ScriptValue<'_>,
        allocate: &mut impl FnMut() -> PtrUninit<'a>,
        default_construct: &mut impl FnMut() -> Option<PtrMut<'a>>,
        depth: usize,
    ) -> bool {
        // Null object references coerce to the generic null, never to a
        // value type; skip the search and the property walk entirely.
        if source.is_null_handle() {
            return false;
        }

        // An already-typed value of the target type is copied wholesale.
        if let ScriptValue::Cell(cell) = source {
            if cell.shape().id == target.id {
                if let Some(clone_fn) = target.vtable.clone_into {
                    // Safety: source and target shapes are identical
                    unsafe { clone_fn(cell.view().data(), allocate()) };
                    return true;
                }
            }
        }

        if gadget.flags.contains(GadgetFlags::POPULATE) && is_structural(source) {
            if let Some(target_ptr) = default_construct() {
                write_properties(self, gadget, target_ptr, source, depth);
                return true;
            }
        }

        if gadget.flags.contains(GadgetFlags::CONSTRUCT) {
            if from_matching_type(gadget, source, allocate, self.engine) {
                return true;
            }
            warn!(
                "Could not find any constructor for value type {} to call with value {}",
                target, source
            );
        }

        // Last resort: a user-registered factory, also the only path for
        // types with neither capability.
        if let Some(factory) = self.factories.and_then(|f| f.lookup(target)) {
            if let Some(cell) = factory(source) {
                if cell.shape().id == target.id {
                    // Safety: factory result shape verified against the target
                    unsafe { cell.move_into(allocate()) };
                    return true;
                }
            }
        }

        false
    }
}
