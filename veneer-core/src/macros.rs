//! Declarative helpers for assembling shapes.

/// Build a [`VTable`](crate::VTable) with every slot filled from the type's
/// standard trait implementations.
///
/// Requires `Default + Clone + PartialEq + Debug`. Assemble the struct by
/// hand (with [`VTable::empty`](crate::VTable::empty) as a base) when a type
/// is missing one of those.
#[macro_export]
macro_rules! value_vtable {
    ($ty:ty) => {
        $crate::VTable {
            default_in_place: Some($crate::vtable::default_in_place_of::<$ty>),
            drop_in_place: Some($crate::vtable::drop_in_place_of::<$ty>),
            clone_into: Some($crate::vtable::clone_into_of::<$ty>),
            eq: Some($crate::vtable::eq_of::<$ty>),
            debug: Some($crate::vtable::debug_of::<$ty>),
        }
    };
}

/// Declare a [`Property`](crate::Property) backed by a plain field.
///
/// ```ignore
/// property!(Point, x: f64)
/// ```
///
/// expands to a property named `"x"` whose read clones `point.x` out and
/// whose write clones a value into it. The field type must be `Clone`.
#[macro_export]
macro_rules! property {
    ($owner:ty, $field:ident: $ty:ty) => {{
        fn shape() -> &'static $crate::TypeShape {
            <$ty as $crate::Shaped>::SHAPE
        }
        unsafe fn read<'src, 'mem>(
            obj: $crate::PtrConst<'src>,
            out: $crate::PtrUninit<'mem>,
        ) -> $crate::PtrMut<'mem> {
            let obj = unsafe { obj.get::<$owner>() };
            unsafe { out.put::<$ty>(obj.$field.clone()) }
        }
        unsafe fn write<'obj, 'val>(obj: $crate::PtrMut<'obj>, value: $crate::PtrConst<'val>) {
            let value = unsafe { value.get::<$ty>() }.clone();
            unsafe { obj.as_mut::<$owner>() }.$field = value;
        }
        $crate::Property {
            name: stringify!($field),
            shape,
            read,
            write,
        }
    }};
}

/// Declare a single-parameter [`Constructor`](crate::Constructor).
///
/// ```ignore
/// constructor!(f64 => Temperature::from_celsius)
/// ```
///
/// The build expression is called with a shared reference to the parameter
/// value and must return the constructed target by value. It must not
/// capture its environment.
#[macro_export]
macro_rules! constructor {
    ($param:ty => $build:expr) => {{
        fn shape() -> &'static $crate::TypeShape {
            <$param as $crate::Shaped>::SHAPE
        }
        unsafe fn invoke<'src, 'mem>(
            src: $crate::PtrConst<'src>,
            dst: $crate::PtrUninit<'mem>,
        ) -> $crate::PtrMut<'mem> {
            let arg = unsafe { src.get::<$param>() };
            unsafe { dst.put(($build)(arg)) }
        }
        $crate::Constructor {
            param: shape,
            invoke,
        }
    }};
}
