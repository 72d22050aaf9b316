//! Path based access into a value graph.

use std::any::Any;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::convert::from_text;
use crate::parse::parse_element;
use crate::path::Path;
use crate::reflect::{field_by_name, field_by_name_mut, Map, Reflect, ValueMut, ValueRef};
use crate::types::{Error, Separator, Token};

/// Resolves paths with a configurable element separator.
///
/// The free functions [`find`], [`find_mut`], [`get`] and [`set`] use the
/// default `.` separator.
///
/// ## Example
///
/// ```rust
/// use std::collections::HashMap;
/// use valuepath::{Accessor, Separator};
///
/// let mut scores: HashMap<String, Vec<u32>> = HashMap::new();
/// scores.insert("alice".to_string(), vec![1, 2, 3]);
///
/// let accessor = Accessor::new(Separator::Slash);
/// accessor.set("[alice][1]", "20", &mut scores).unwrap();
/// assert_eq!(scores["alice"], [1, 20, 3]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessor {
    pub separator: Separator,
}

impl Accessor {
    pub fn new(separator: Separator) -> Self {
        Self { separator }
    }

    /// Finds the value at `path` in `root`.
    ///
    /// ## Arguments
    ///
    /// * `path` - The path to the value, e.g. `Slice[1][Key].Field`. An empty
    ///   path refers to `root` itself.
    /// * `root` - The value the path is resolved against
    ///
    /// ## Returns
    ///
    /// The value at `path`. Pointers on the way are followed; the value itself
    /// is returned as is, even if it is a pointer.
    ///
    /// Fails with `Error::InvalidPath` for a malformed path, a missing field, a
    /// nil pointer on the way or a non-numeric index, with `Error::OutOfRange`
    /// for an index past the end and with `Error::KeyNotFound` for a missing
    /// map key.
    pub fn find<'v>(&self, path: &str, root: &'v dyn Reflect) -> Result<&'v dyn Reflect, Error> {
        let mut current = root;
        let mut tokens = Path::with_separator(path, self.separator);
        loop {
            let (element, token) = tokens.next_token();
            match token {
                Token::NoMore => return Ok(current),
                Token::Invalid => return Err(rejected(path, tokens.offset())),
                _ => {}
            }
            let (name, key) = parse_element(element, token)?;
            trace!(element, %token, "resolving path element");

            current = deref(current)?;
            if token != Token::Key {
                current = field(current, name)?;
            }
            if token != Token::Name {
                current = by_key(deref(current)?, &key)?;
            }
        }
    }

    /// Mutable version of [`Accessor::find`].
    pub fn find_mut<'v>(
        &self,
        path: &str,
        root: &'v mut dyn Reflect,
    ) -> Result<&'v mut dyn Reflect, Error> {
        let mut current = root;
        let mut tokens = Path::with_separator(path, self.separator);
        loop {
            let (element, token) = tokens.next_token();
            match token {
                Token::NoMore => return Ok(current),
                Token::Invalid => return Err(rejected(path, tokens.offset())),
                _ => {}
            }
            let (name, key) = parse_element(element, token)?;
            trace!(element, %token, "resolving path element");

            current = deref_mut(current)?;
            if token != Token::Key {
                current = field_mut(current, name)?;
            }
            if token != Token::Name {
                current = by_key_mut(deref_mut(current)?, &key)?;
            }
        }
    }

    /// Returns the value at `path` for downcasting to its concrete type.
    pub fn get<'v>(&self, path: &str, root: &'v dyn Reflect) -> Result<&'v dyn Any, Error> {
        Ok(self.find(path, root)?.as_any())
    }

    /// Converts `text` into the value at `path`.
    ///
    /// The target must be a simple value, a [`TextValue`](crate::TextValue) or
    /// a pointer to one; compound targets fail with `Error::UnsupportedValue`.
    /// The target is left untouched if the conversion fails.
    pub fn set(&self, path: &str, text: &str, root: &mut dyn Reflect) -> Result<(), Error> {
        let target = self.find_mut(path, root)?;
        if !is_leaf(target) {
            let kind = target.kind();
            debug!(path, %kind, "rejected write to a compound value");
            return Err(Error::UnsupportedValue(format!(
                "{path:?} is a {kind}, only simple values can be set"
            )));
        }
        debug!(path, text, type_name = target.type_name(), "setting value");
        from_text(text, target)
    }

    /// Like [`Accessor::find`], but panics with the error message on failure.
    pub fn must_find<'v>(&self, path: &str, root: &'v dyn Reflect) -> &'v dyn Reflect {
        match self.find(path, root) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`Accessor::get`], but panics with the error message on failure.
    pub fn must_get<'v>(&self, path: &str, root: &'v dyn Reflect) -> &'v dyn Any {
        match self.get(path, root) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`Accessor::set`], but panics with the error message on failure.
    pub fn must_set(&self, path: &str, text: &str, root: &mut dyn Reflect) {
        if let Err(err) = self.set(path, text, root) {
            panic!("{err}");
        }
    }
}

/// Finds the value at `path` in `root`. See [`Accessor::find`].
pub fn find<'v>(path: &str, root: &'v dyn Reflect) -> Result<&'v dyn Reflect, Error> {
    Accessor::default().find(path, root)
}

/// Finds the value at `path` in `root` for writing. See [`Accessor::find_mut`].
pub fn find_mut<'v>(path: &str, root: &'v mut dyn Reflect) -> Result<&'v mut dyn Reflect, Error> {
    Accessor::default().find_mut(path, root)
}

/// Returns the value at `path` in `root` as `&dyn Any`.
///
/// ## Example
///
/// ```rust
/// use valuepath::get;
///
/// let grid = vec![[1i32, 2], [3, 4]];
/// assert_eq!(get("[1][0]", &grid).unwrap().downcast_ref::<i32>(), Some(&3));
/// ```
pub fn get<'v>(path: &str, root: &'v dyn Reflect) -> Result<&'v dyn Any, Error> {
    Accessor::default().get(path, root)
}

/// Converts `text` into the value at `path` in `root`. See [`Accessor::set`].
pub fn set(path: &str, text: &str, root: &mut dyn Reflect) -> Result<(), Error> {
    Accessor::default().set(path, text, root)
}

/// Like [`find`], but panics with the error message on failure.
/// See [`Accessor::must_find`].
pub fn must_find<'v>(path: &str, root: &'v dyn Reflect) -> &'v dyn Reflect {
    Accessor::default().must_find(path, root)
}

/// Like [`get`], but panics with the error message on failure.
/// See [`Accessor::must_get`].
pub fn must_get<'v>(path: &str, root: &'v dyn Reflect) -> &'v dyn Any {
    Accessor::default().must_get(path, root)
}

/// Like [`set`], but panics with the error message on failure.
/// See [`Accessor::must_set`].
pub fn must_set(path: &str, text: &str, root: &mut dyn Reflect) {
    Accessor::default().must_set(path, text, root)
}

fn rejected(path: &str, offset: usize) -> Error {
    debug!(path, offset, "rejected malformed path");
    Error::InvalidPath(format!("malformed path {path:?} at offset {offset}"))
}

/// Follows pointers until a non-pointer value is reached.
fn deref(value: &dyn Reflect) -> Result<&dyn Reflect, Error> {
    match value.reflect_ref() {
        ValueRef::Pointer(pointer) => match pointer.pointee() {
            Some(pointee) => deref(pointee),
            None => Err(nil_pointer(value)),
        },
        _ => Ok(value),
    }
}

fn deref_mut(value: &mut dyn Reflect) -> Result<&mut dyn Reflect, Error> {
    if !matches!(value.reflect_ref(), ValueRef::Pointer(_)) {
        return Ok(value);
    }
    let err = nil_pointer(value);
    match value.reflect_mut() {
        ValueMut::Pointer(pointer) => match pointer.pointee_mut() {
            Some(pointee) => deref_mut(pointee),
            None => Err(err),
        },
        _ => Err(err),
    }
}

fn nil_pointer(value: &dyn Reflect) -> Error {
    Error::InvalidPath(format!("nil {} on the way", value.type_name()))
}

fn field<'a>(value: &'a dyn Reflect, name: &str) -> Result<&'a dyn Reflect, Error> {
    let type_name = value.type_name();
    match value.reflect_ref() {
        ValueRef::Struct(value) => field_by_name(value, name)
            .ok_or_else(|| Error::InvalidPath(format!("no field {name:?} in {type_name}"))),
        _ => Err(Error::InvalidPath(format!(
            "{type_name} has no fields, cannot look up {name:?}"
        ))),
    }
}

fn field_mut<'a>(value: &'a mut dyn Reflect, name: &str) -> Result<&'a mut dyn Reflect, Error> {
    let type_name = value.type_name();
    match value.reflect_mut() {
        ValueMut::Struct(value) => field_by_name_mut(value, name)
            .ok_or_else(|| Error::InvalidPath(format!("no field {name:?} in {type_name}"))),
        _ => Err(Error::InvalidPath(format!(
            "{type_name} has no fields, cannot look up {name:?}"
        ))),
    }
}

fn by_key<'a>(value: &'a dyn Reflect, key: &str) -> Result<&'a dyn Reflect, Error> {
    let type_name = value.type_name();
    match value.reflect_ref() {
        ValueRef::Array(array) => {
            let (index, len) = (index(key, array.len())?, array.len());
            array.get(index).ok_or(Error::OutOfRange { index, len })
        }
        ValueRef::Slice(list) => {
            let (index, len) = (index(key, list.len())?, list.len());
            list.get(index).ok_or(Error::OutOfRange { index, len })
        }
        ValueRef::Map(map) => {
            let lookup = map_key(key, map)?;
            map.get(&*lookup)
                .ok_or_else(|| Error::KeyNotFound(format!("{key:?} in {type_name}")))
        }
        _ => Err(not_keyed(key, type_name)),
    }
}

fn by_key_mut<'a>(value: &'a mut dyn Reflect, key: &str) -> Result<&'a mut dyn Reflect, Error> {
    let type_name = value.type_name();
    match value.reflect_mut() {
        ValueMut::Array(array) => {
            let (index, len) = (index(key, array.len())?, array.len());
            array.get_mut(index).ok_or(Error::OutOfRange { index, len })
        }
        ValueMut::Slice(list) => {
            let (index, len) = (index(key, list.len())?, list.len());
            list.get_mut(index).ok_or(Error::OutOfRange { index, len })
        }
        ValueMut::Map(map) => {
            let lookup = map_key(key, &*map)?;
            map.get_mut(&*lookup)
                .ok_or_else(|| Error::KeyNotFound(format!("{key:?} in {type_name}")))
        }
        _ => Err(not_keyed(key, type_name)),
    }
}

/// Parses an array or slice index and checks it against `len`.
fn index(key: &str, len: usize) -> Result<usize, Error> {
    let index = key
        .parse::<usize>()
        .map_err(|err| Error::InvalidPath(format!("index {key:?}: {err}")))?;
    if index >= len {
        return Err(Error::OutOfRange { index, len });
    }
    Ok(index)
}

/// Converts a path key into a value of the map's key type.
fn map_key(key: &str, map: &dyn Map) -> Result<Box<dyn Reflect>, Error> {
    let mut lookup = map.new_key();
    from_text(key, &mut *lookup)
        .map_err(|err| Error::InvalidPath(format!("map key {key:?}: {err}")))?;
    Ok(lookup)
}

fn not_keyed(key: &str, type_name: &str) -> Error {
    Error::InvalidPath(format!("{type_name} has no keys, cannot look up [{key}]"))
}

/// Returns `true` for values `set` may write: anything but compound values,
/// looking through pointers.
fn is_leaf(value: &dyn Reflect) -> bool {
    match value.reflect_ref() {
        ValueRef::Pointer(pointer) => match pointer.pointee() {
            Some(pointee) => is_leaf(pointee),
            None => is_leaf(&*pointer.new_pointee()),
        },
        value => !value.kind().is_compound(),
    }
}
