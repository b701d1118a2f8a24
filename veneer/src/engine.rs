//! The execution-context collaborator.

use veneer_core::{ScriptValue, ValueView};

/// A live handle into the host scripting runtime.
///
/// Only the bridge from arbitrary native values into the generic script
/// representation needs one; every other conversion runs engine-free, and
/// the bridge degrades to "no conversion found" when no engine is supplied.
///
/// The engine must be driven from the thread that owns the runtime; the
/// coercer never moves it across threads.
pub trait ScriptEngine {
    /// Represent a native value as an owned script value.
    ///
    /// Returns `None` for values the runtime cannot represent.
    fn to_script(&self, value: ValueView<'_>) -> Option<ScriptValue<'static>>;
}
