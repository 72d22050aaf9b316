//! The reflection layer: a dynamically typed view over strongly typed values.

use std::any::{type_name, Any};
use std::fmt;

use crate::complex::Complex;
use crate::convert::to_text;
use crate::types::{Error, Kind};

/// A value that can take part in a value graph.
///
/// Implementations exist for `bool`, all integers, `f32`, `f64`, [`Complex`],
/// `String`, `char`, fixed arrays, `Vec`, `HashMap`, `BTreeMap`, `Option` and
/// `Box`. Structs implement it with [`reflect_struct!`](crate::reflect_struct),
/// types with their own textual form with [`reflect_text!`](crate::reflect_text),
/// and anything else with [`reflect_opaque!`](crate::reflect_opaque).
pub trait Reflect: Any {
    /// Returns the name of the concrete type.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Returns a new zero value of the same type.
    fn fresh(&self) -> Box<dyn Reflect>;

    /// Replaces `self` with `value`, which must be of the same type.
    ///
    /// Fails with `Error::InvalidValue` on a type mismatch, leaving `self` untouched.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Error>;

    fn reflect_ref(&self) -> ValueRef<'_>;

    fn reflect_mut(&mut self) -> ValueMut<'_>;
}

impl dyn Reflect {
    /// Returns the shape of the value.
    pub fn kind(&self) -> Kind {
        self.reflect_ref().kind()
    }

    /// Returns `true` if the underlying value is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Unboxes the value as `T`.
    pub fn take<T: Any>(self: Box<Self>) -> Result<T, Error> {
        let found = self.type_name();
        self.into_any()
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| {
                Error::InvalidValue(format!("expected {}, found {found}", type_name::<T>()))
            })
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match to_text(self) {
            Ok(text) => f.debug_tuple(self.type_name()).field(&text).finish(),
            Err(_) => f.write_str(self.type_name()),
        }
    }
}

/// A shared view of a reflected value, one variant per supported shape.
pub enum ValueRef<'a> {
    Bool(bool),
    Int(i128),
    Uint(u128),
    Float32(f32),
    Float64(f64),
    Complex64(Complex<f32>),
    Complex128(Complex<f64>),
    String(&'a str),
    Array(&'a dyn Array),
    Slice(&'a dyn List),
    Map(&'a dyn Map),
    Struct(&'a dyn Struct),
    Pointer(&'a dyn Pointer),
    Text(&'a dyn TextValue),
    Opaque,
}

impl ValueRef<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            ValueRef::Bool(_) => Kind::Bool,
            ValueRef::Int(_) => Kind::Int,
            ValueRef::Uint(_) => Kind::Uint,
            ValueRef::Float32(_) => Kind::Float32,
            ValueRef::Float64(_) => Kind::Float64,
            ValueRef::Complex64(_) => Kind::Complex64,
            ValueRef::Complex128(_) => Kind::Complex128,
            ValueRef::String(_) => Kind::String,
            ValueRef::Array(_) => Kind::Array,
            ValueRef::Slice(_) => Kind::Slice,
            ValueRef::Map(_) => Kind::Map,
            ValueRef::Struct(_) => Kind::Struct,
            ValueRef::Pointer(_) => Kind::Pointer,
            ValueRef::Text(_) => Kind::Text,
            ValueRef::Opaque => Kind::Opaque,
        }
    }
}

/// A mutable view of a reflected value, one variant per supported shape.
pub enum ValueMut<'a> {
    Bool(&'a mut bool),
    Int(IntMut<'a>),
    Uint(UintMut<'a>),
    Float32(&'a mut f32),
    Float64(&'a mut f64),
    Complex64(&'a mut Complex<f32>),
    Complex128(&'a mut Complex<f64>),
    String(&'a mut String),
    Array(&'a mut dyn Array),
    Slice(&'a mut dyn List),
    Map(&'a mut dyn Map),
    Struct(&'a mut dyn Struct),
    Pointer(&'a mut dyn Pointer),
    Text(&'a mut dyn TextValue),
    Opaque,
}

pub enum IntMut<'a> {
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    I128(&'a mut i128),
    Isize(&'a mut isize),
}

pub enum UintMut<'a> {
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    U128(&'a mut u128),
    Usize(&'a mut usize),
}

/// A fixed length sequence, e.g. `[i32; 5]`.
pub trait Array: Reflect {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Returns a zero value of the element type.
    fn new_element(&self) -> Box<dyn Reflect>;
}

/// A resizable sequence, e.g. `Vec<String>`.
pub trait List: Array {
    /// Replaces the whole sequence with `items`, which must all be of the element type.
    fn replace(&mut self, items: Vec<Box<dyn Reflect>>) -> Result<(), Error>;
}

/// An associative map with unique keys, e.g. `HashMap<String, i32>`.
pub trait Map: Reflect {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a zero value of the key type.
    fn new_key(&self) -> Box<dyn Reflect>;

    /// Returns a zero value of the value type.
    fn new_value(&self) -> Box<dyn Reflect>;

    /// Looks up `key`, which is never found if it is not of the key type.
    fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, key: &dyn Reflect) -> Option<&mut dyn Reflect>;

    /// Returns all entries, in the map's iteration order.
    fn entries(&self) -> Vec<(&dyn Reflect, &dyn Reflect)>;

    /// Replaces the whole map with `entries`.
    fn replace(&mut self, entries: Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>) -> Result<(), Error>;
}

/// A struct with named fields.
///
/// Embedded members are fields whose own fields are promoted into the parent's
/// name space; see [`field_by_name`].
pub trait Struct: Reflect {
    /// Names of the struct's own fields, in declaration order.
    fn field_names(&self) -> &'static [&'static str];

    /// Returns an own field, embedded members included, by name.
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    fn embedded(&self) -> Vec<&dyn Reflect>;

    fn embedded_mut(&mut self) -> Vec<&mut dyn Reflect>;
}

/// A single level pointer or optional reference, e.g. `Option<T>` or `Box<T>`.
pub trait Pointer: Reflect {
    /// Returns the pointed to value, or `None` for a nil pointer.
    fn pointee(&self) -> Option<&dyn Reflect>;

    fn pointee_mut(&mut self) -> Option<&mut dyn Reflect>;

    /// Returns a zero value of the pointee type.
    fn new_pointee(&self) -> Box<dyn Reflect>;

    /// Points at `value`, which must be of the pointee type.
    fn point_to(&mut self, value: Box<dyn Reflect>) -> Result<(), Error>;
}

/// A value that parses itself from text.
///
/// Conversion delegates to this capability before looking at the shape.
pub trait TextValue: Reflect {
    fn from_text(&mut self, text: &str) -> Result<(), Error>;

    fn to_text(&self) -> String;
}

/// Looks up a field by name: the struct's own fields first, then the fields of
/// embedded members, depth first. The first match wins.
pub fn field_by_name<'a>(value: &'a dyn Struct, name: &str) -> Option<&'a dyn Reflect> {
    if let Some(field) = value.field(name) {
        return Some(field);
    }
    value
        .embedded()
        .into_iter()
        .filter_map(as_struct)
        .find_map(|member| field_by_name(member, name))
}

/// Mutable version of [`field_by_name`].
pub fn field_by_name_mut<'a>(value: &'a mut dyn Struct, name: &str) -> Option<&'a mut dyn Reflect> {
    if value.field(name).is_some() {
        return value.field_mut(name);
    }
    for member in value.embedded_mut() {
        if let Some(member) = as_struct_mut(member) {
            if let Some(field) = field_by_name_mut(member, name) {
                return Some(field);
            }
        }
    }
    None
}

/// Returns the struct behind `value`, following pointers.
pub(crate) fn as_struct(value: &dyn Reflect) -> Option<&dyn Struct> {
    match value.reflect_ref() {
        ValueRef::Struct(value) => Some(value),
        ValueRef::Pointer(pointer) => as_struct(pointer.pointee()?),
        _ => None,
    }
}

pub(crate) fn as_struct_mut(value: &mut dyn Reflect) -> Option<&mut dyn Struct> {
    match value.reflect_mut() {
        ValueMut::Struct(value) => Some(value),
        ValueMut::Pointer(pointer) => as_struct_mut(pointer.pointee_mut()?),
        _ => None,
    }
}
