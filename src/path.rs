use crate::parse::path_element;
use crate::types::{Separator, Token};

/// Creates a tokenizer over `path` using the default `.` separator.
pub fn tokenize(path: &str) -> Path<'_> {
    Path::parse(path)
}

/// A path element iterator.
///
/// The path grammar is:
///
/// - `Name`: a struct field, e.g. `Age`.
/// - `[Key]`: an array or slice index, or a map key.
/// - `Name[Key]`: a field followed by an index or key, e.g. `Slice[1]`.
///
/// Elements are separated by the separator (`.` by default). Each call to
/// [`Path::next_token`] yields the next element together with its [`Token`]
/// kind. Once `Token::Invalid` or `Token::NoMore` has been returned the
/// tokenizer only ever yields `Token::NoMore`.
///
/// ## Example
///
/// ```rust
/// use valuepath::{Path, Token};
///
/// let tokens: Vec<_> = Path::parse("Slice[1][Key].Field").collect();
/// assert_eq!(
///     tokens,
///     vec![
///         ("Slice[1]", Token::KeyedName),
///         ("[Key]", Token::Key),
///         ("Field", Token::Name),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Path<'a> {
    path: &'a str,
    current: usize,
    separator: char,
    done: bool,
}

impl<'a> Path<'a> {
    /// Creates a tokenizer using the `.` separator.
    pub fn parse(path: &'a str) -> Self {
        Self::with_separator(path, Separator::Dot)
    }

    /// Creates a tokenizer using the specified separator.
    ///
    /// Brackets delimit keys and cannot separate elements, so a
    /// `Separator::Custom('[')` or `Separator::Custom(']')` falls back to `.`.
    pub fn with_separator(path: &'a str, separator: Separator) -> Self {
        let separator = match separator.as_char() {
            '[' | ']' => Separator::Dot.as_char(),
            c => c,
        };
        Self {
            path,
            current: 0,
            separator,
            done: false,
        }
    }

    /// Returns the full path text.
    pub fn as_str(&self) -> &'a str {
        self.path
    }

    /// Returns the byte offset of the cursor.
    pub fn offset(&self) -> usize {
        self.current
    }

    /// Returns the next element and its token kind.
    ///
    /// Returns an empty element with `Token::NoMore` when the path is exhausted
    /// and an empty element with `Token::Invalid` when the path is malformed.
    pub fn next_token(&mut self) -> (&'a str, Token) {
        if self.done {
            return ("", Token::NoMore);
        }
        let (element, token) = self.scan();
        if matches!(token, Token::Invalid | Token::NoMore) {
            self.done = true;
        }
        (element, token)
    }

    fn scan(&mut self) -> (&'a str, Token) {
        let input = &self.path[self.current..];
        if input.is_empty() {
            return ("", Token::NoMore);
        }
        match path_element(input, self.separator) {
            Ok((rest, (element, token))) if valid_element(element) => {
                self.current = self.path.len() - rest.len();
                (element, token)
            }
            _ => ("", Token::Invalid),
        }
    }
}

impl<'a> Iterator for Path<'a> {
    type Item = (&'a str, Token);

    /// Yields elements up to and including an `Invalid` token, and stops at `NoMore`.
    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            (_, Token::NoMore) => None,
            item => Some(item),
        }
    }
}

/// An element is valid if it is not empty and does not end in an empty key.
fn valid_element(element: &str) -> bool {
    !element.is_empty() && !element.ends_with("[]")
}
