//! [`Reflect`] implementations for std types, and the macros user types
//! implement it with.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::complex::Complex;
use crate::reflect::{Array, IntMut, List, Map, Pointer, Reflect, UintMut, ValueMut, ValueRef};
use crate::types::Error;

/// Implements the type plumbing methods of [`Reflect`].
#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_any {
    () => {
        fn type_name(&self) -> &'static str {
            ::std::any::type_name::<Self>()
        }

        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }

        fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
            self
        }

        fn set(
            &mut self,
            value: ::std::boxed::Box<dyn $crate::Reflect>,
        ) -> ::std::result::Result<(), $crate::Error> {
            *self = value.take::<Self>()?;
            ::std::result::Result::Ok(())
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $name:literal) => {
        $name
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __embedded {
    (embed $members:ident, $value:expr) => {
        $members.push($value)
    };
    ($members:ident, $value:expr) => {};
}

/// Implements [`Reflect`] and [`Struct`](crate::Struct) for a struct with named fields.
///
/// Each field is listed by its identifier, which is also its path name unless
/// renamed with `as "Name"`. Fields marked `#[embed]` are embedded members:
/// their own fields are promoted into this struct's name space. The struct must
/// implement `Default`.
///
/// ## Example
///
/// ```rust
/// use valuepath::{get, reflect_struct, set};
///
/// #[derive(Default)]
/// struct Inner {
///     age: u8,
/// }
///
/// #[derive(Default)]
/// struct Outer {
///     name: String,
///     inner: Inner,
/// }
///
/// reflect_struct!(Inner { age as "Age" });
/// reflect_struct!(Outer { name as "Name", #[embed] inner as "Inner" });
///
/// let mut outer = Outer::default();
/// set("Age", "42", &mut outer).unwrap();
/// assert_eq!(outer.inner.age, 42);
/// assert_eq!(get("Inner.Age", &outer).unwrap().downcast_ref::<u8>(), Some(&42));
/// ```
#[macro_export]
macro_rules! reflect_struct {
    ($ty:ty { $( $(#[$flag:ident])? $field:ident $(as $name:literal)? ),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            $crate::__reflect_any!();

            fn fresh(&self) -> ::std::boxed::Box<dyn $crate::Reflect> {
                ::std::boxed::Box::new(<$ty as ::std::default::Default>::default())
            }

            fn reflect_ref(&self) -> $crate::ValueRef<'_> {
                $crate::ValueRef::Struct(self)
            }

            fn reflect_mut(&mut self) -> $crate::ValueMut<'_> {
                $crate::ValueMut::Struct(self)
            }
        }

        impl $crate::Struct for $ty {
            fn field_names(&self) -> &'static [&'static str] {
                &[$($crate::__field_name!($field $(, $name)?)),*]
            }

            fn field(&self, name: &str) -> ::std::option::Option<&dyn $crate::Reflect> {
                $(
                    if name == $crate::__field_name!($field $(, $name)?) {
                        return ::std::option::Option::Some(&self.$field);
                    }
                )*
                ::std::option::Option::None
            }

            fn field_mut(&mut self, name: &str) -> ::std::option::Option<&mut dyn $crate::Reflect> {
                $(
                    if name == $crate::__field_name!($field $(, $name)?) {
                        return ::std::option::Option::Some(&mut self.$field);
                    }
                )*
                ::std::option::Option::None
            }

            #[allow(unused_mut)]
            fn embedded(&self) -> ::std::vec::Vec<&dyn $crate::Reflect> {
                let mut members: ::std::vec::Vec<&dyn $crate::Reflect> = ::std::vec::Vec::new();
                $( $crate::__embedded!($($flag)? members, &self.$field); )*
                members
            }

            #[allow(unused_mut)]
            fn embedded_mut(&mut self) -> ::std::vec::Vec<&mut dyn $crate::Reflect> {
                let mut members: ::std::vec::Vec<&mut dyn $crate::Reflect> = ::std::vec::Vec::new();
                $( $crate::__embedded!($($flag)? members, &mut self.$field); )*
                members
            }
        }
    };
}

/// Implements [`Reflect`] and [`TextValue`](crate::TextValue) for types that
/// parse themselves with `FromStr` and print themselves with `Display`.
///
/// Conversion into such a type always goes through `FromStr`, whatever its
/// shape. The type must implement `Default`.
#[macro_export]
macro_rules! reflect_text {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::Reflect for $ty {
            $crate::__reflect_any!();

            fn fresh(&self) -> ::std::boxed::Box<dyn $crate::Reflect> {
                ::std::boxed::Box::new(<$ty as ::std::default::Default>::default())
            }

            fn reflect_ref(&self) -> $crate::ValueRef<'_> {
                $crate::ValueRef::Text(self)
            }

            fn reflect_mut(&mut self) -> $crate::ValueMut<'_> {
                $crate::ValueMut::Text(self)
            }
        }

        impl $crate::TextValue for $ty {
            fn from_text(&mut self, text: &str) -> ::std::result::Result<(), $crate::Error> {
                *self = text
                    .parse::<$ty>()
                    .map_err(|err| $crate::Error::parse::<$ty>(text, err))?;
                ::std::result::Result::Ok(())
            }

            fn to_text(&self) -> ::std::string::String {
                ::std::string::ToString::to_string(self)
            }
        }
    )*};
}

/// Implements [`Reflect`] for types that can live in a value graph but have no
/// text form. Converting into them fails with `Error::UnsupportedValue`.
#[macro_export]
macro_rules! reflect_opaque {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::Reflect for $ty {
            $crate::__reflect_any!();

            fn fresh(&self) -> ::std::boxed::Box<dyn $crate::Reflect> {
                ::std::boxed::Box::new(<$ty as ::std::default::Default>::default())
            }

            fn reflect_ref(&self) -> $crate::ValueRef<'_> {
                $crate::ValueRef::Opaque
            }

            fn reflect_mut(&mut self) -> $crate::ValueMut<'_> {
                $crate::ValueMut::Opaque
            }
        }
    )*};
}

macro_rules! impl_reflect_scalar {
    ($($ty:ty => $variant:ident $(($wrap:path))? as $read:ty),* $(,)?) => {$(
        impl Reflect for $ty {
            crate::__reflect_any!();

            fn fresh(&self) -> Box<dyn Reflect> {
                Box::<$ty>::default()
            }

            fn reflect_ref(&self) -> ValueRef<'_> {
                ValueRef::$variant(*self as $read)
            }

            fn reflect_mut(&mut self) -> ValueMut<'_> {
                ValueMut::$variant($($wrap)?(self))
            }
        }
    )*};
}

impl_reflect_scalar!(
    bool => Bool as bool,
    i8 => Int(IntMut::I8) as i128,
    i16 => Int(IntMut::I16) as i128,
    i32 => Int(IntMut::I32) as i128,
    i64 => Int(IntMut::I64) as i128,
    i128 => Int(IntMut::I128) as i128,
    isize => Int(IntMut::Isize) as i128,
    u8 => Uint(UintMut::U8) as u128,
    u16 => Uint(UintMut::U16) as u128,
    u32 => Uint(UintMut::U32) as u128,
    u64 => Uint(UintMut::U64) as u128,
    u128 => Uint(UintMut::U128) as u128,
    usize => Uint(UintMut::Usize) as u128,
    f32 => Float32 as f32,
    f64 => Float64 as f64,
);

macro_rules! impl_reflect_complex {
    ($($ty:ty => $variant:ident),*) => {$(
        impl Reflect for Complex<$ty> {
            crate::__reflect_any!();

            fn fresh(&self) -> Box<dyn Reflect> {
                Box::<Complex<$ty>>::default()
            }

            fn reflect_ref(&self) -> ValueRef<'_> {
                ValueRef::$variant(*self)
            }

            fn reflect_mut(&mut self) -> ValueMut<'_> {
                ValueMut::$variant(self)
            }
        }
    )*};
}

impl_reflect_complex!(f32 => Complex64, f64 => Complex128);

impl Reflect for String {
    crate::__reflect_any!();

    fn fresh(&self) -> Box<dyn Reflect> {
        Box::new(String::new())
    }

    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::String(self)
    }

    fn reflect_mut(&mut self) -> ValueMut<'_> {
        ValueMut::String(self)
    }
}

crate::reflect_text!(char);

impl<T: Reflect + Default, const N: usize> Reflect for [T; N] {
    crate::__reflect_any!();

    fn fresh(&self) -> Box<dyn Reflect> {
        Box::new(std::array::from_fn::<T, N, _>(|_| T::default()))
    }

    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Array(self)
    }

    fn reflect_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Array(self)
    }
}

impl<T: Reflect + Default, const N: usize> Array for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|value| value as &dyn Reflect)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|value| value as &mut dyn Reflect)
    }

    fn new_element(&self) -> Box<dyn Reflect> {
        Box::new(T::default())
    }
}

impl<T: Reflect + Default> Reflect for Vec<T> {
    crate::__reflect_any!();

    fn fresh(&self) -> Box<dyn Reflect> {
        Box::new(Vec::<T>::new())
    }

    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Slice(self)
    }

    fn reflect_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Slice(self)
    }
}

impl<T: Reflect + Default> Array for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|value| value as &dyn Reflect)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|value| value as &mut dyn Reflect)
    }

    fn new_element(&self) -> Box<dyn Reflect> {
        Box::new(T::default())
    }
}

impl<T: Reflect + Default> List for Vec<T> {
    fn replace(&mut self, items: Vec<Box<dyn Reflect>>) -> Result<(), Error> {
        *self = items
            .into_iter()
            .map(|item| item.take::<T>())
            .collect::<Result<Vec<T>, Error>>()?;
        Ok(())
    }
}

macro_rules! impl_reflect_map {
    ($($map:ident: $($bound:path),+);* $(;)?) => {$(
        impl<K, V> Reflect for $map<K, V>
        where
            K: Reflect + Default $(+ $bound)+,
            V: Reflect + Default,
        {
            crate::__reflect_any!();

            fn fresh(&self) -> Box<dyn Reflect> {
                Box::new($map::<K, V>::new())
            }

            fn reflect_ref(&self) -> ValueRef<'_> {
                ValueRef::Map(self)
            }

            fn reflect_mut(&mut self) -> ValueMut<'_> {
                ValueMut::Map(self)
            }
        }

        impl<K, V> Map for $map<K, V>
        where
            K: Reflect + Default $(+ $bound)+,
            V: Reflect + Default,
        {
            fn len(&self) -> usize {
                $map::len(self)
            }

            fn new_key(&self) -> Box<dyn Reflect> {
                Box::new(K::default())
            }

            fn new_value(&self) -> Box<dyn Reflect> {
                Box::new(V::default())
            }

            fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect> {
                $map::get(self, key.downcast_ref::<K>()?).map(|value| value as &dyn Reflect)
            }

            fn get_mut(&mut self, key: &dyn Reflect) -> Option<&mut dyn Reflect> {
                $map::get_mut(self, key.downcast_ref::<K>()?).map(|value| value as &mut dyn Reflect)
            }

            fn entries(&self) -> Vec<(&dyn Reflect, &dyn Reflect)> {
                self.iter()
                    .map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect))
                    .collect()
            }

            fn replace(
                &mut self,
                entries: Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>,
            ) -> Result<(), Error> {
                let mut map = $map::new();
                for (key, value) in entries {
                    map.insert(key.take::<K>()?, value.take::<V>()?);
                }
                *self = map;
                Ok(())
            }
        }
    )*};
}

impl_reflect_map!(
    HashMap: Eq, Hash;
    BTreeMap: Ord;
);

impl<T: Reflect + Default> Reflect for Option<T> {
    crate::__reflect_any!();

    fn fresh(&self) -> Box<dyn Reflect> {
        Box::new(None::<T>)
    }

    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Pointer(self)
    }

    fn reflect_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Pointer(self)
    }
}

impl<T: Reflect + Default> Pointer for Option<T> {
    fn pointee(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|value| value as &dyn Reflect)
    }

    fn pointee_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(|value| value as &mut dyn Reflect)
    }

    fn new_pointee(&self) -> Box<dyn Reflect> {
        Box::new(T::default())
    }

    fn point_to(&mut self, value: Box<dyn Reflect>) -> Result<(), Error> {
        *self = Some(value.take::<T>()?);
        Ok(())
    }
}

impl<T: Reflect + Default> Reflect for Box<T> {
    crate::__reflect_any!();

    fn fresh(&self) -> Box<dyn Reflect> {
        Box::new(Box::<T>::default())
    }

    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Pointer(self)
    }

    fn reflect_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Pointer(self)
    }
}

impl<T: Reflect + Default> Pointer for Box<T> {
    fn pointee(&self) -> Option<&dyn Reflect> {
        Some(&**self as &dyn Reflect)
    }

    fn pointee_mut(&mut self) -> Option<&mut dyn Reflect> {
        Some(&mut **self as &mut dyn Reflect)
    }

    fn new_pointee(&self) -> Box<dyn Reflect> {
        Box::new(T::default())
    }

    fn point_to(&mut self, value: Box<dyn Reflect>) -> Result<(), Error> {
        *self = Box::new(value.take::<T>()?);
        Ok(())
    }
}
