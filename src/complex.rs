use std::fmt;
use std::str::FromStr;

use crate::parse::{complex_parts, is_infinity_literal};
use crate::types::Error;

/// A complex number with real part `re` and imaginary part `im`.
///
/// `Complex<f32>` is the 64-bit complex shape, `Complex<f64>` the 128-bit one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

impl<T> FromStr for Complex<T>
where
    T: FromStr + Default + Copy + Into<f64>,
    T::Err: fmt::Display,
{
    type Err = Error;

    /// Parses `N`, `Ni` or `N+Ni` / `N-Ni`, optionally wrapped in parentheses.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (re, im) = complex_parts(text)?;
        let part = |part: Option<&str>| match part {
            Some(part) => {
                let value = part.parse::<T>().map_err(|err| Error::parse::<Self>(text, err))?;
                if value.into().is_infinite() && !is_infinity_literal(part) {
                    return Err(Error::parse::<Self>(text, "value out of range"));
                }
                Ok(value)
            }
            None => Ok(T::default()),
        };
        Ok(Self {
            re: part(re)?,
            im: part(im)?,
        })
    }
}

macro_rules! impl_complex_display {
    ($($ty:ty),*) => {$(
        impl fmt::Display for Complex<$ty> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // NaN prints without a sign but the imaginary part needs one.
                let sign = if self.im.is_nan() || !self.im.is_sign_negative() {
                    "+"
                } else {
                    ""
                };
                write!(f, "({}{}{}i)", self.re, sign, self.im)
            }
        }
    )*};
}

impl_complex_display!(f32, f64);
