//! Borrowed views of described values.

use crate::{PtrConst, Shaped, TypeShape};

/// A borrowed, read-only view of a value together with its shape.
#[derive(Clone, Copy, Debug)]
pub struct ValueView<'mem> {
    data: PtrConst<'mem>,
    shape: &'static TypeShape,
}

impl<'mem> ValueView<'mem> {
    /// View a typed value.
    #[inline]
    pub fn new<T: Shaped>(value: &'mem T) -> Self {
        Self {
            data: PtrConst::from_ref(value),
            shape: T::SHAPE,
        }
    }

    /// Assemble a view from raw parts.
    ///
    /// # Safety
    ///
    /// `data` must point to a live, initialized value accurately described
    /// by `shape`, valid for `'mem`.
    #[inline]
    pub const unsafe fn from_raw(data: PtrConst<'mem>, shape: &'static TypeShape) -> Self {
        Self { data, shape }
    }

    /// The shape of the viewed value.
    #[inline]
    pub const fn shape(&self) -> &'static TypeShape {
        self.shape
    }

    /// The raw data pointer.
    #[inline]
    pub const fn data(&self) -> PtrConst<'mem> {
        self.data
    }

    /// Borrow the value as `T`, checking the shape first.
    #[inline]
    pub fn as_ref<T: Shaped>(&self) -> Option<&'mem T> {
        if self.shape.id == T::SHAPE.id {
            // Safety: shape identity guarantees the pointee is a T
            Some(unsafe { self.data.get::<T>() })
        } else {
            None
        }
    }

    /// Borrow the value as `T` without checking.
    ///
    /// # Safety
    ///
    /// The viewed value must be a `T`.
    #[inline]
    pub const unsafe fn get<T>(&self) -> &'mem T {
        unsafe { self.data.get::<T>() }
    }
}
