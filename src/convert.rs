//! Text to typed value conversion.
//!
//! Compound values are supported on the first level only and their elements
//! must be simple values. The characters `,`, `=`, `{` and `}` are reserved
//! for compound literals:
//!
//! - Array and slice: values delimited by commas, e.g. `0,1,2,3,4`.
//! - Map: `key=value` pairs delimited by commas, e.g. `one=1,two=2`.
//! - Struct: `field=value` pairs in braces, e.g. `{Name=foo,Age=42}`.

use std::fmt;
use std::str::FromStr;

use crate::complex::Complex;
use crate::parse::{is_infinity_literal, key_value};
use crate::reflect::{
    field_by_name, field_by_name_mut, Array, IntMut, List, Map, Pointer, Reflect, Struct,
    UintMut, ValueMut, ValueRef,
};
use crate::types::{Error, Kind};

/// Converts `text` into `out` according to the runtime shape of `out`.
///
/// A [`TextValue`](crate::TextValue) parses itself and its result is returned
/// as is. Everything else is dispatched on its shape; see the module
/// documentation for the compound grammar.
///
/// ## Example
///
/// ```rust
/// use valuepath::from_text;
///
/// let mut numbers = [0u8; 5];
/// from_text("9,8,7,6,5", &mut numbers).unwrap();
/// assert_eq!(numbers, [9, 8, 7, 6, 5]);
///
/// let mut colors: Vec<String> = Vec::new();
/// from_text("red, green, blue", &mut colors).unwrap();
/// assert_eq!(colors, ["red", "green", "blue"]);
/// ```
pub fn from_text(text: &str, out: &mut dyn Reflect) -> Result<(), Error> {
    let type_name = out.type_name();
    match out.reflect_mut() {
        ValueMut::Text(value) => value.from_text(text),
        ValueMut::Bool(value) => bool_value(text, value),
        ValueMut::Int(value) => int_value(text, value),
        ValueMut::Uint(value) => uint_value(text, value),
        ValueMut::Float32(value) => float_value(text, value),
        ValueMut::Float64(value) => float_value(text, value),
        ValueMut::Complex64(value) => complex_value(text, value),
        ValueMut::Complex128(value) => complex_value(text, value),
        ValueMut::String(value) => string_value(text, value),
        ValueMut::Array(value) => array_value(text, value),
        ValueMut::Slice(value) => slice_value(text, value),
        ValueMut::Map(value) => map_value(text, value),
        ValueMut::Struct(value) => struct_value(text, value),
        ValueMut::Pointer(value) => pointer_value(text, value),
        ValueMut::Opaque => Err(Error::UnsupportedValue(format!(
            "{type_name} has no text conversion"
        ))),
    }
}

/// Parses `text` into a new value of type `T`.
pub fn parse_value<T: Reflect + Default>(text: &str) -> Result<T, Error> {
    let mut value = T::default();
    from_text(text, &mut value)?;
    Ok(value)
}

macro_rules! shape_converters {
    ($($(#[$doc:meta])* $name:ident: $variant:ident => $convert:expr;)*) => {$(
        $(#[$doc])*
        ///
        /// Fails with `Error::InvalidValue` if `out` is of another shape.
        pub fn $name(text: &str, out: &mut dyn Reflect) -> Result<(), Error> {
            let type_name = out.type_name();
            match out.reflect_mut() {
                ValueMut::$variant(value) => $convert(text, value),
                _ => Err(Error::InvalidValue(format!(
                    "{type_name} is not a {}",
                    Kind::$variant
                ))),
            }
        }
    )*};
}

shape_converters! {
    /// Converts `1`, `t`, `T`, `TRUE`, `true`, `True` or their false
    /// counterparts into a bool.
    from_text_bool: Bool => bool_value;
    /// Converts an optionally signed base 10 integer into a signed integer of any width.
    from_text_int: Int => int_value;
    /// Converts a base 10 integer into an unsigned integer of any width.
    from_text_uint: Uint => uint_value;
    /// Converts a decimal or scientific literal into an `f32`.
    from_text_f32: Float32 => float_value;
    /// Converts a decimal or scientific literal into an `f64`.
    from_text_f64: Float64 => float_value;
    /// Converts an `a+bi` literal into a `Complex<f32>`.
    from_text_complex64: Complex64 => complex_value;
    /// Converts an `a+bi` literal into a `Complex<f64>`.
    from_text_complex128: Complex128 => complex_value;
    /// Copies the text into a string.
    from_text_string: String => string_value;
    /// Converts `e0,e1,...` into a fixed array. Surplus elements are ignored,
    /// slots without an element keep their value.
    from_text_array: Array => array_value;
    /// Converts `e0,e1,...` into a new sequence replacing the old one.
    from_text_slice: Slice => slice_value;
    /// Converts `k1=v1,k2=v2,...` into a new map replacing the old one.
    from_text_map: Map => map_value;
    /// Converts `{f1=v1,f2=v2,...}` into the named fields of a struct.
    from_text_struct: Struct => struct_value;
    /// Converts text into a new pointee and points at it.
    from_text_pointer: Pointer => pointer_value;
}

/// Renders a value as the text [`from_text`] reads back.
///
/// Fails with `Error::UnsupportedValue` for opaque values.
pub fn to_text(value: &dyn Reflect) -> Result<String, Error> {
    let text = match value.reflect_ref() {
        ValueRef::Bool(value) => value.to_string(),
        ValueRef::Int(value) => value.to_string(),
        ValueRef::Uint(value) => value.to_string(),
        ValueRef::Float32(value) => value.to_string(),
        ValueRef::Float64(value) => value.to_string(),
        ValueRef::Complex64(value) => value.to_string(),
        ValueRef::Complex128(value) => value.to_string(),
        ValueRef::String(value) => value.to_string(),
        ValueRef::Text(value) => value.to_text(),
        ValueRef::Array(array) => join((0..array.len()).filter_map(|i| array.get(i)))?,
        ValueRef::Slice(list) => join((0..list.len()).filter_map(|i| list.get(i)))?,
        ValueRef::Map(map) => map
            .entries()
            .into_iter()
            .map(|(key, value)| Ok(format!("{}={}", to_text(key)?, to_text(value)?)))
            .collect::<Result<Vec<_>, Error>>()?
            .join(","),
        ValueRef::Struct(value) => {
            let fields = value
                .field_names()
                .iter()
                .filter_map(|name| value.field(name).map(|field| (name, field)))
                .map(|(name, field)| Ok(format!("{name}={}", to_text(field)?)))
                .collect::<Result<Vec<_>, Error>>()?;
            format!("{{{}}}", fields.join(","))
        }
        ValueRef::Pointer(pointer) => match pointer.pointee() {
            Some(pointee) => to_text(pointee)?,
            None => String::new(),
        },
        ValueRef::Opaque => {
            return Err(Error::UnsupportedValue(format!(
                "{} has no text form",
                value.type_name()
            )))
        }
    };
    Ok(text)
}

fn join<'a>(elements: impl Iterator<Item = &'a dyn Reflect>) -> Result<String, Error> {
    Ok(elements
        .map(to_text)
        .collect::<Result<Vec<_>, Error>>()?
        .join(","))
}

fn bool_value(text: &str, out: &mut bool) -> Result<(), Error> {
    *out = match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => true,
        "0" | "f" | "F" | "FALSE" | "false" | "False" => false,
        _ => return Err(Error::parse::<bool>(text, "invalid syntax")),
    };
    Ok(())
}

/// Parses at the width of `T`, so out of range literals fail instead of wrapping.
fn number<T>(text: &str, out: &mut T) -> Result<(), Error>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    *out = text.parse::<T>().map_err(|err| Error::parse::<T>(text, err))?;
    Ok(())
}

/// Like [`number`], but a finite literal that overflows to infinity is out of
/// range. Only an explicit `inf`/`infinity` literal parses as infinity.
fn float_value<T>(text: &str, out: &mut T) -> Result<(), Error>
where
    T: FromStr + Copy + Into<f64>,
    T::Err: fmt::Display,
{
    let value = text.parse::<T>().map_err(|err| Error::parse::<T>(text, err))?;
    if value.into().is_infinite() && !is_infinity_literal(text) {
        return Err(Error::parse::<T>(text, "value out of range"));
    }
    *out = value;
    Ok(())
}

fn int_value(text: &str, out: IntMut<'_>) -> Result<(), Error> {
    match out {
        IntMut::I8(out) => number(text, out),
        IntMut::I16(out) => number(text, out),
        IntMut::I32(out) => number(text, out),
        IntMut::I64(out) => number(text, out),
        IntMut::I128(out) => number(text, out),
        IntMut::Isize(out) => number(text, out),
    }
}

/// Unsigned literals carry no sign, not even a `+`.
fn unsigned<T>(text: &str, out: &mut T) -> Result<(), Error>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    if text.starts_with(['+', '-']) {
        return Err(Error::parse::<T>(text, "invalid syntax"));
    }
    number(text, out)
}

fn uint_value(text: &str, out: UintMut<'_>) -> Result<(), Error> {
    match out {
        UintMut::U8(out) => unsigned(text, out),
        UintMut::U16(out) => unsigned(text, out),
        UintMut::U32(out) => unsigned(text, out),
        UintMut::U64(out) => unsigned(text, out),
        UintMut::U128(out) => unsigned(text, out),
        UintMut::Usize(out) => unsigned(text, out),
    }
}

fn complex_value<T>(text: &str, out: &mut Complex<T>) -> Result<(), Error>
where
    T: FromStr + Default + Copy + Into<f64>,
    T::Err: fmt::Display,
{
    *out = text.parse::<Complex<T>>()?;
    Ok(())
}

fn string_value(text: &str, out: &mut String) -> Result<(), Error> {
    text.clone_into(out);
    Ok(())
}

fn array_value(text: &str, out: &mut dyn Array) -> Result<(), Error> {
    let parts = split_list(text);
    let count = out.len().min(parts.len());
    let staged = parts[..count]
        .iter()
        .map(|part| element(part, out.new_element()))
        .collect::<Result<Vec<_>, Error>>()?;
    for (index, value) in staged.into_iter().enumerate() {
        let len = out.len();
        out.get_mut(index)
            .ok_or(Error::OutOfRange { index, len })?
            .set(value)?;
    }
    Ok(())
}

fn slice_value(text: &str, out: &mut dyn List) -> Result<(), Error> {
    let items = split_list(text)
        .into_iter()
        .map(|part| element(part, out.new_element()))
        .collect::<Result<Vec<_>, Error>>()?;
    out.replace(items)
}

fn map_value(text: &str, out: &mut dyn Map) -> Result<(), Error> {
    let entries = split_list(text)
        .into_iter()
        .map(|segment| {
            let (key, value) = key_value(segment)?;
            Ok((element(key, out.new_key())?, element(value, out.new_value())?))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    out.replace(entries)
}

fn struct_value(text: &str, out: &mut dyn Struct) -> Result<(), Error> {
    let type_name = out.type_name();
    let body = text.strip_prefix('{').unwrap_or(text);
    let body = body.strip_suffix('}').unwrap_or(body);

    // Every field converts before any is assigned.
    let mut staged = Vec::new();
    for segment in split_list(body) {
        let (name, value) = key_value(segment)?;
        let field = field_by_name(out, name)
            .ok_or_else(|| Error::FieldNotFound(format!("{name:?} in {type_name}")))?;
        staged.push((name, element(value, field.fresh())?));
    }
    for (name, value) in staged {
        field_by_name_mut(out, name)
            .ok_or_else(|| Error::FieldNotFound(format!("{name:?} in {type_name}")))?
            .set(value)?;
    }
    Ok(())
}

fn pointer_value(text: &str, out: &mut dyn Pointer) -> Result<(), Error> {
    let mut value = out.new_pointee();
    from_text(text, &mut *value)?;
    out.point_to(value)
}

/// Converts one element of a compound literal into `value`, a zero value of
/// the element type.
fn element(text: &str, mut value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Error> {
    let kind = value.kind();
    if kind.is_compound() {
        return Err(Error::UnsupportedValue(format!(
            "{} elements ({kind}) cannot be nested in a compound literal",
            value.type_name()
        )));
    }
    from_text(text, &mut *value)?;
    Ok(value)
}

/// Splits a comma delimited list and trims each element. Blank text is a
/// single empty element.
fn split_list(text: &str) -> Vec<&str> {
    text.split(',').map(str::trim).collect()
}
