use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a single path element produced by the tokenizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Token {
    /// The path is malformed. Terminates the token sequence.
    Invalid,
    /// There are no elements left.
    NoMore,
    /// A struct field name, e.g. `Field`.
    Name,
    /// A bracketed key on its own: an array/slice index or a map key, e.g. `[Key]`.
    Key,
    /// A field name followed by a bracketed key, e.g. `Field[Key]`.
    KeyedName,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Token::Invalid => "invalid",
            Token::NoMore => "no-more",
            Token::Name => "name",
            Token::Key => "key",
            Token::KeyedName => "keyed-name",
        };
        f.write_str(name)
    }
}

/// The character separating path elements.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Separator {
    #[default]
    Dot,
    Slash,
    Custom(char),
}

impl Separator {
    pub fn as_char(&self) -> char {
        match self {
            Separator::Dot => '.',
            Separator::Slash => '/',
            Separator::Custom(c) => *c,
        }
    }
}

/// The shape of a reflected value, without the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    Array,
    Slice,
    Map,
    Struct,
    Pointer,
    Text,
    Opaque,
}

impl Kind {
    /// Returns `true` for arrays, slices, maps and structs.
    pub fn is_compound(&self) -> bool {
        matches!(self, Kind::Array | Kind::Slice | Kind::Map | Kind::Struct)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "bool",
            Kind::Int => "signed integer",
            Kind::Uint => "unsigned integer",
            Kind::Float32 => "32-bit float",
            Kind::Float64 => "64-bit float",
            Kind::Complex64 => "64-bit complex",
            Kind::Complex128 => "128-bit complex",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Slice => "slice",
            Kind::Map => "map",
            Kind::Struct => "struct",
            Kind::Pointer => "pointer",
            Kind::Text => "text value",
            Kind::Opaque => "opaque value",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),
    #[error("Index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Field not found: {0}")]
    FieldNotFound(String),
    #[error("Cannot parse {text:?} as {target}: {reason}")]
    Parse {
        text: String,
        target: &'static str,
        reason: String,
    },
    #[error("Key not found: {0}")]
    KeyNotFound(String),
}

impl Error {
    /// Builds a [`Error::Parse`] for a literal that does not match the grammar of `T`.
    pub fn parse<T: ?Sized>(text: &str, reason: impl fmt::Display) -> Self {
        Error::Parse {
            text: text.to_string(),
            target: std::any::type_name::<T>(),
            reason: reason.to_string(),
        }
    }
}
