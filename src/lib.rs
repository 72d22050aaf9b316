//! # valuepath
//!
//! A Rust library to convert text into typed values and to read and write values deep inside
//! nested structures through a simple path syntax.
//!
//! Sometimes you want to set a configuration value from a command line flag or an environment
//! variable without writing a deserializer for every type. This library converts plain text into
//! whatever value it is pointed at, and locates that value with paths like `Servers[2].Port`.
//!
//! ## Features
//!
//! - **Paths:** Field names (`Name`), keys (`[Key]`) and keyed names (`Name[Key]`), e.g.
//!   `Slice[1][Key].Field`. Keys index arrays and slices or look up map entries.
//! - **Scalars:** Bools, signed and unsigned integers of every width, `f32`, `f64`, complex
//!   numbers (`1+2i`) and strings.
//! - **Compound literals:** Arrays and slices (`1,2,3`), maps (`one=1,two=2`) and structs
//!   (`{Name=foo,Age=42}`) of simple values.
//! - **Pointers:** `Option<T>` and `Box<T>` are followed on the way and allocated on write.
//! - **Embedded structs:** Fields of members marked `#[embed]` are promoted into their parent.
//! - **Custom types:** Anything with `FromStr` and `Display` converts through
//!   [`reflect_text!`].
//! - **Custom Separators:** Path elements can be separated by `Separator::Dot` (`.`),
//!   `Separator::Slash` (`/`), or `Separator::Custom(char)` (any character but a bracket).
//!
//! ## Examples
//!
//! ### Basic usage:
//!
//! ```rust
//! use std::collections::HashMap;
//! use valuepath::{get, reflect_struct, set};
//!
//! #[derive(Default)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! #[derive(Default)]
//! struct Config {
//!     servers: Vec<Server>,
//!     limits: HashMap<String, f64>,
//! }
//!
//! reflect_struct!(Server { host as "Host", port as "Port" });
//! reflect_struct!(Config { servers as "Servers", limits as "Limits" });
//!
//! let mut config = Config::default();
//! config.servers.push(Server::default());
//!
//! set("Servers[0].Port", "8080", &mut config).unwrap();
//! // Compound values are not set through paths, but converted directly.
//! valuepath::from_text("cpu=0.5, memory=512", &mut config.limits).unwrap();
//!
//! assert_eq!(config.servers[0].port, 8080);
//! assert_eq!(get("Limits[cpu]", &config).unwrap().downcast_ref::<f64>(), Some(&0.5));
//! ```
//!
//! ### Specifying the separator
//!
//! ```rust
//! use valuepath::{reflect_struct, Accessor, Separator};
//!
//! #[derive(Default)]
//! struct Theme {
//!     color: String,
//! }
//!
//! #[derive(Default)]
//! struct Settings {
//!     theme: Option<Theme>,
//! }
//!
//! reflect_struct!(Theme { color });
//! reflect_struct!(Settings { theme });
//!
//! let mut settings = Settings { theme: Some(Theme::default()) };
//! let accessor = Accessor::new(Separator::Slash);
//! accessor.set("theme/color", "blue", &mut settings).unwrap();
//!
//! assert_eq!(settings.theme.unwrap().color, "blue");
//! ```
//!
//! ### Converting without a path
//!
//! ```rust
//! use valuepath::{parse_value, Complex};
//!
//! let z: Complex<f64> = parse_value("(1.5-2i)").unwrap();
//! assert_eq!(z, Complex::new(1.5, -2.0));
//!
//! let flags: [bool; 3] = parse_value("t, FALSE, 1").unwrap();
//! assert_eq!(flags, [true, false, true]);
//! ```

mod access;
mod complex;
mod convert;
mod impls;
mod parse;
mod path;
mod reflect;
mod serialize;
mod types;

pub use access::{find, find_mut, get, must_find, must_get, must_set, set, Accessor};
pub use complex::Complex;
pub use convert::{
    from_text, from_text_array, from_text_bool, from_text_complex128, from_text_complex64,
    from_text_f32, from_text_f64, from_text_int, from_text_map, from_text_pointer,
    from_text_slice, from_text_string, from_text_struct, from_text_uint, parse_value, to_text,
};
pub use parse::parse_element;
pub use path::{tokenize, Path};
pub use reflect::{
    field_by_name, field_by_name_mut, Array, IntMut, List, Map, Pointer, Reflect, Struct,
    TextValue, UintMut, ValueMut, ValueRef,
};
pub use serialize::Serializable;
pub use types::{Error, Kind, Separator, Token};
