use serde::ser::{Error as _, SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::convert::to_text;
use crate::reflect::{Reflect, ValueRef};

/// A [`Serialize`] view over a reflected value.
///
/// Scalars and strings serialize as themselves, complex numbers and text
/// values as their text, arrays and slices as sequences, maps as maps keyed by
/// the key's text, structs as structs and nil pointers as none.
///
/// ## Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use valuepath::Serializable;
///
/// let mut limits = BTreeMap::new();
/// limits.insert(1u8, Some(2.5f64));
/// limits.insert(2u8, None);
///
/// let json = serde_json::to_string(&Serializable(&limits)).unwrap();
/// assert_eq!(json, r#"{"1":2.5,"2":null}"#);
/// ```
#[derive(Clone, Copy)]
pub struct Serializable<'a>(pub &'a dyn Reflect);

impl Serialize for Serializable<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0.reflect_ref() {
            ValueRef::Bool(value) => serializer.serialize_bool(value),
            ValueRef::Int(value) => match i64::try_from(value) {
                Ok(value) => serializer.serialize_i64(value),
                Err(_) => serializer.serialize_i128(value),
            },
            ValueRef::Uint(value) => match u64::try_from(value) {
                Ok(value) => serializer.serialize_u64(value),
                Err(_) => serializer.serialize_u128(value),
            },
            ValueRef::Float32(value) => serializer.serialize_f32(value),
            ValueRef::Float64(value) => serializer.serialize_f64(value),
            ValueRef::Complex64(value) => serializer.collect_str(&value),
            ValueRef::Complex128(value) => serializer.collect_str(&value),
            ValueRef::String(value) => serializer.serialize_str(value),
            ValueRef::Text(value) => serializer.serialize_str(&value.to_text()),
            ValueRef::Array(array) => {
                serializer.collect_seq((0..array.len()).filter_map(|i| array.get(i)).map(Serializable))
            }
            ValueRef::Slice(list) => {
                serializer.collect_seq((0..list.len()).filter_map(|i| list.get(i)).map(Serializable))
            }
            ValueRef::Map(map) => {
                let entries = map.entries();
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    let key = to_text(key).map_err(S::Error::custom)?;
                    out.serialize_entry(&key, &Serializable(value))?;
                }
                out.end()
            }
            ValueRef::Struct(value) => {
                let names = value.field_names();
                let mut out = serializer.serialize_struct(value.type_name(), names.len())?;
                for &name in names {
                    if let Some(field) = value.field(name) {
                        out.serialize_field(name, &Serializable(field))?;
                    }
                }
                out.end()
            }
            ValueRef::Pointer(pointer) => match pointer.pointee() {
                Some(pointee) => serializer.serialize_some(&Serializable(pointee)),
                None => serializer.serialize_none(),
            },
            ValueRef::Opaque => Err(S::Error::custom(format!(
                "{} cannot be serialized",
                self.0.type_name()
            ))),
        }
    }
}
