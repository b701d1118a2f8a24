//! Owned, heap-allocated, type-erased values.

use core::alloc::Layout;
use core::fmt;
use core::ptr::NonNull;

use crate::{CellError, PtrConst, PtrMut, PtrUninit, ScriptNull, Shaped, TypeShape, ValueView};

/// A guard managing one raw allocation.
///
/// Holds the pointer and the layout used for allocation, and deallocates on
/// drop. It never drops the pointee; whoever owns the guard is responsible
/// for that.
struct Guard {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl Guard {
    /// Allocate storage for `layout` via the global allocator.
    ///
    /// Zero-sized layouts get a dangling, properly aligned pointer and no
    /// actual allocation.
    fn alloc(layout: Layout) -> Self {
        if layout.size() == 0 {
            return Self {
                // align is always non-zero, so this is a valid dangling pointer
                ptr: unsafe {
                    NonNull::new_unchecked(core::ptr::without_provenance_mut(layout.align()))
                },
                layout,
            };
        }
        // Safety: layout has non-zero size
        let ptr = unsafe { alloc::alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(ptr) else {
            alloc::alloc::handle_alloc_error(layout);
        };
        Self { ptr, layout }
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            // Safety: `ptr` was allocated via the global allocator with `layout`
            unsafe { alloc::alloc::dealloc(self.ptr.as_ptr(), self.layout) };
        }
    }
}

/// Uninitialized storage for a value of a given shape.
///
/// Allocates on creation and releases the storage on drop, unless it is
/// sealed into a [`ValueCell`] with [`UninitCell::assume_init`]. This is the
/// scoped-acquisition primitive for conversion scratch space: every exit
/// path, including failed conversions, releases the allocation.
pub struct UninitCell {
    guard: Option<Guard>,
    shape: &'static TypeShape,
}

impl UninitCell {
    /// Allocate storage sized and aligned for `shape`.
    pub fn for_shape(shape: &'static TypeShape) -> Self {
        Self {
            guard: Some(Guard::alloc(shape.layout)),
            shape,
        }
    }

    /// The storage, ready for placement construction.
    #[inline]
    pub fn ptr(&mut self) -> PtrUninit<'_> {
        PtrUninit::new(self.guard.as_ref().unwrap().ptr)
    }

    /// Seal the storage into an owned cell.
    ///
    /// # Safety
    ///
    /// The storage must hold a fully initialized value of this cell's shape.
    pub unsafe fn assume_init(mut self) -> ValueCell {
        ValueCell {
            guard: self.guard.take(),
            shape: self.shape,
        }
    }
}

/// An owned, heap-allocated, type-erased value.
///
/// The cell drops its value through the shape's vtable and releases the
/// allocation afterwards. Cells are how freshly coerced values travel back
/// to the caller, and how already-typed source values travel in.
pub struct ValueCell {
    guard: Option<Guard>,
    shape: &'static TypeShape,
}

impl Drop for ValueCell {
    fn drop(&mut self) {
        if let Some(guard) = self.guard.take() {
            if let Some(drop_fn) = self.shape.vtable.drop_in_place {
                unsafe { drop_fn(PtrMut::new(guard.ptr)) };
            }
            drop(guard);
        }
    }
}

impl ValueCell {
    /// Move a typed value into a fresh cell.
    pub fn from_value<T: Shaped>(value: T) -> Self {
        let mut staging = UninitCell::for_shape(T::SHAPE);
        // Safety: freshly allocated storage, layout taken from T's shape
        unsafe {
            staging.ptr().put(value);
        }
        // Safety: just initialized above
        unsafe { staging.assume_init() }
    }

    /// The generic null value.
    pub fn null() -> Self {
        Self::from_value(ScriptNull)
    }

    /// The shape of the held value.
    #[inline]
    pub fn shape(&self) -> &'static TypeShape {
        self.shape
    }

    /// A borrowed view of the held value.
    pub fn view(&self) -> ValueView<'_> {
        // Safety: the cell holds an initialized value of `shape`
        unsafe {
            ValueView::from_raw(
                PtrConst::new(self.guard.as_ref().unwrap().ptr),
                self.shape,
            )
        }
    }

    /// Turn this cell into a concrete type.
    pub fn materialize<T: Shaped>(mut self) -> Result<T, CellError> {
        if self.shape.id != T::SHAPE.id {
            return Err(CellError::WrongShape {
                expected: T::SHAPE,
                actual: self.shape,
            });
        }
        let guard = self.guard.take().unwrap();
        // Safety: shape identity guarantees the pointee is a T; the guard
        // frees the memory afterwards without dropping in place
        let value = unsafe { core::ptr::read(guard.ptr.as_ptr() as *const T) };
        drop(guard);
        Ok(value)
    }

    /// Clone the held value into a new cell, if the shape supports cloning.
    pub fn try_clone(&self) -> Option<ValueCell> {
        let clone_fn = self.shape.vtable.clone_into?;
        let mut staging = UninitCell::for_shape(self.shape);
        // Safety: cloning into freshly allocated storage of the same shape
        unsafe {
            clone_fn(self.view().data(), staging.ptr());
        }
        // Safety: just initialized by clone_into
        Some(unsafe { staging.assume_init() })
    }

    /// Move the held value into `dst`, releasing this cell's allocation
    /// without dropping the value.
    ///
    /// # Safety
    ///
    /// `dst` must be valid for writes of this cell's shape, properly aligned,
    /// and must not currently hold a live value.
    pub unsafe fn move_into<'mem>(mut self, dst: PtrUninit<'mem>) -> PtrMut<'mem> {
        let guard = self.guard.take().unwrap();
        unsafe {
            core::ptr::copy_nonoverlapping(
                guard.ptr.as_ptr(),
                dst.as_byte_ptr(),
                self.shape.layout.size(),
            );
        }
        // free the allocation; the value now lives in dst
        drop(guard);
        unsafe { dst.assume_init() }
    }
}

impl Clone for ValueCell {
    /// Clones through the shape's `clone_into`.
    ///
    /// # Panics
    ///
    /// Panics if the shape's vtable has no `clone_into`. Register a clone
    /// operation for any shape whose values flow through script values.
    fn clone(&self) -> Self {
        self.try_clone()
            .unwrap_or_else(|| panic!("shape {} has no clone_into", self.shape))
    }
}

impl fmt::Debug for ValueCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(debug_fn) = self.shape.vtable.debug {
            return unsafe { debug_fn(self.view().data(), f) };
        }
        write!(f, "⟨{}⟩", self.shape)
    }
}

impl fmt::Display for ValueCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl PartialEq for ValueCell {
    fn eq(&self, other: &Self) -> bool {
        if self.shape.id != other.shape.id {
            return false;
        }
        if let Some(eq_fn) = self.shape.vtable.eq {
            return unsafe { eq_fn(self.view().data(), other.view().data()) };
        }
        false
    }
}
