//! Erased per-type operations.

use core::fmt;

use crate::{PtrConst, PtrMut, PtrUninit};

/// Default-construct a value in place.
pub type DefaultInPlaceFn = for<'mem> unsafe fn(PtrUninit<'mem>) -> PtrMut<'mem>;

/// Drop a value in place. The storage itself is not released.
pub type DropInPlaceFn = for<'mem> unsafe fn(PtrMut<'mem>);

/// Clone the source value into uninitialized storage.
pub type CloneIntoFn = for<'src, 'dst> unsafe fn(PtrConst<'src>, PtrUninit<'dst>) -> PtrMut<'dst>;

/// Compare two values of the same type for equality.
pub type EqFn = for<'a, 'b> unsafe fn(PtrConst<'a>, PtrConst<'b>) -> bool;

/// Format a value with its `Debug` implementation.
pub type DebugFn = for<'mem> unsafe fn(PtrConst<'mem>, &mut fmt::Formatter<'_>) -> fmt::Result;

/// Erased operations over values of one type.
///
/// Every slot is optional; absent slots simply disable the corresponding
/// behavior (a shape without `clone_into` cannot back a cloneable cell, a
/// shape without `default_in_place` cannot be populated property-by-property
/// into fresh storage, and so on).
#[derive(Clone, Copy)]
pub struct VTable {
    /// Default-construct into uninitialized storage.
    pub default_in_place: Option<DefaultInPlaceFn>,
    /// Drop in place.
    pub drop_in_place: Option<DropInPlaceFn>,
    /// Clone into uninitialized storage.
    pub clone_into: Option<CloneIntoFn>,
    /// Equality.
    pub eq: Option<EqFn>,
    /// Debug formatting.
    pub debug: Option<DebugFn>,
}

impl VTable {
    /// A vtable with every slot absent.
    pub const fn empty() -> Self {
        Self {
            default_in_place: None,
            drop_in_place: None,
            clone_into: None,
            eq: None,
            debug: None,
        }
    }
}

/// Typed trampoline for [`VTable::default_in_place`].
pub unsafe fn default_in_place_of<T: Default>(dst: PtrUninit<'_>) -> PtrMut<'_> {
    unsafe { dst.put(T::default()) }
}

/// Typed trampoline for [`VTable::drop_in_place`].
pub unsafe fn drop_in_place_of<T>(ptr: PtrMut<'_>) {
    unsafe { core::ptr::drop_in_place(ptr.as_byte_ptr() as *mut T) }
}

/// Typed trampoline for [`VTable::clone_into`].
pub unsafe fn clone_into_of<'dst, T: Clone>(src: PtrConst<'_>, dst: PtrUninit<'dst>) -> PtrMut<'dst> {
    unsafe { dst.put(src.get::<T>().clone()) }
}

/// Typed trampoline for [`VTable::eq`].
pub unsafe fn eq_of<T: PartialEq>(a: PtrConst<'_>, b: PtrConst<'_>) -> bool {
    unsafe { a.get::<T>() == b.get::<T>() }
}

/// Typed trampoline for [`VTable::debug`].
pub unsafe fn debug_of<T: fmt::Debug>(
    ptr: PtrConst<'_>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    write!(f, "{:?}", unsafe { ptr.get::<T>() })
}
