use std::borrow::Cow;

use crate::types::{Error, Token};
use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, take_till},
    character::complete::{char, none_of, one_of},
    combinator::{all_consuming, eof, map, opt, peek, recognize, value},
    number::complete::recognize_float_or_exceptions,
    sequence::{delimited, pair, separated_pair, terminated},
    IResult, Parser,
};
use nom_language::error::VerboseError;

type Res<T, U> = IResult<T, U, VerboseError<T>>;

/// Splits a path element into its name and key according to the token it was
/// classified as.
///
/// ## Arguments
///
/// * `element` - The element text as returned by the tokenizer, e.g. `Field[Key]`
/// * `token` - The token kind of the element
///
/// ## Returns
///
/// * `Token::Name`: the whole element as name and an empty key.
/// * `Token::Key`: an empty name and the key between the brackets. A key that
///   starts with a double quote or a backtick is unquoted.
/// * `Token::KeyedName`: the name before the `[` and the raw key after it.
///
/// Returns `Error::InvalidArgument` for an empty element or for the `Invalid`
/// and `NoMore` tokens, `Error::Syntax` for a malformed quoted key and
/// `Error::InvalidPath` for a keyed name without exactly one `[`.
///
/// ## Example
///
/// ```rust
/// use valuepath::{parse_element, Token};
///
/// let (name, key) = parse_element("Name[Key]", Token::KeyedName).unwrap();
/// assert_eq!((name, key.as_ref()), ("Name", "Key"));
/// ```
pub fn parse_element(element: &str, token: Token) -> Result<(&str, Cow<'_, str>), Error> {
    if element.is_empty() {
        return Err(Error::InvalidArgument("empty path element".to_string()));
    }
    match token {
        Token::Invalid | Token::NoMore => Err(Error::InvalidArgument(format!(
            "{token} token has no name or key"
        ))),
        Token::Name => Ok((element, Cow::Borrowed(""))),
        Token::Key => {
            let key = element.strip_prefix('[').unwrap_or(element);
            let key = key.strip_suffix(']').unwrap_or(key);
            Ok(("", unquote(key)?))
        }
        Token::KeyedName => match element.split_once('[') {
            Some((name, key)) if !key.contains('[') => {
                Ok((name, Cow::Borrowed(key.strip_suffix(']').unwrap_or(key))))
            }
            _ => Err(Error::InvalidPath(format!(
                "{element:?} must contain exactly one '['"
            ))),
        },
    }
}

/// Splits the next path element off `input`.
///
/// A leading separator is skipped. Without one, an element starting with `[`
/// is a key; otherwise it is a name, followed by a key for a keyed name. A
/// name ends at a separator or at the end of the path. Keys never contain
/// brackets or the separator.
///
/// Returns the remaining input, which starts at the next separator for a name.
pub(crate) fn path_element<'a>(
    input: &'a str,
    separator: char,
) -> Res<&'a str, (&'a str, Token)> {
    let leading: Res<&str, Option<char>> = opt(char(separator)).parse(input);
    let (rest, leading) = leading?;
    if leading.is_none() {
        if let Ok((rest, key)) = bracketed_key(rest, separator) {
            return Ok((rest, (key, Token::Key)));
        }
    }
    alt((
        map(
            recognize(pair(
                |i: &'a str| element_name(i, separator),
                |i: &'a str| bracketed_key(i, separator),
            )),
            |element| (element, Token::KeyedName),
        ),
        map(
            terminated(
                |i: &'a str| element_name(i, separator),
                peek(alt((eof, recognize(char(separator))))),
            ),
            |element| (element, Token::Name),
        ),
    ))
    .parse(rest)
}

/// Returns `true` if a float literal spells out an infinity instead of
/// overflowing into one.
pub(crate) fn is_infinity_literal(literal: &str) -> bool {
    let unsigned = literal
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(literal);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Removes the quotes from a `"quoted"` or `` `raw` `` key. Unquoted keys are
/// returned as they are.
pub(crate) fn unquote(key: &str) -> Result<Cow<'_, str>, Error> {
    if !key.starts_with(|c: char| c == '"' || c == '`') {
        return Ok(Cow::Borrowed(key));
    }
    all_consuming(alt((quoted_string, raw_string)))
        .parse(key)
        .map(|(_, unquoted)| Cow::Owned(unquoted))
        .map_err(|err| Error::Syntax(format!("cannot unquote {key:?}: {err}")))
}

/// Splits a `key=value` segment of a map or struct literal, trimming both sides.
pub(crate) fn key_value(segment: &str) -> Result<(&str, &str), Error> {
    all_consuming(assignment)
        .parse(segment)
        .map(|(_, (key, value))| (key.trim(), value.trim()))
        .map_err(|err| Error::Syntax(format!("expected key=value, found {segment:?}: {err}")))
}

/// Splits a complex literal into its real and imaginary literals.
pub(crate) fn complex_parts(text: &str) -> Result<(Option<&str>, Option<&str>), Error> {
    all_consuming(complex_literal)
        .parse(text)
        .map(|(_, parts)| parts)
        .map_err(|err| Error::Parse {
            text: text.to_string(),
            target: "complex",
            reason: err.to_string(),
        })
}

fn quoted_string(input: &str) -> Res<&str, String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(
                none_of("\\\""),
                '\\',
                alt((
                    value('\\', char('\\')),
                    value('"', char('"')),
                    value('\n', char('n')),
                    value('\r', char('r')),
                    value('\t', char('t')),
                )),
            )),
            Option::unwrap_or_default,
        ),
        char('"'),
    )
    .parse(input)
}

fn raw_string(input: &str) -> Res<&str, String> {
    map(
        delimited(char('`'), take_till(|c: char| c == '`'), char('`')),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

fn element_name(input: &str, separator: char) -> Res<&str, &str> {
    take_till(|c: char| c == '[' || c == ']' || c == separator).parse(input)
}

fn bracketed_key(input: &str, separator: char) -> Res<&str, &str> {
    recognize(delimited(
        char('['),
        take_till(|c: char| c == '[' || c == ']' || c == separator),
        char(']'),
    ))
    .parse(input)
}

fn assignment(input: &str) -> Res<&str, (&str, &str)> {
    separated_pair(
        take_till(|c: char| c == '='),
        char('='),
        take_till(|c: char| c == '='),
    )
    .parse(input)
}

fn signed_float(input: &str) -> Res<&str, &str> {
    recognize(pair(opt(one_of("+-")), recognize_float_or_exceptions)).parse(input)
}

fn imaginary_part(input: &str) -> Res<&str, &str> {
    terminated(
        recognize(pair(one_of("+-"), recognize_float_or_exceptions)),
        char('i'),
    )
    .parse(input)
}

fn complex_body(input: &str) -> Res<&str, (Option<&str>, Option<&str>)> {
    alt((
        map(terminated(signed_float, char('i')), |im| (None, Some(im))),
        map(pair(signed_float, imaginary_part), |(re, im)| {
            (Some(re), Some(im))
        }),
        map(signed_float, |re| (Some(re), None)),
    ))
    .parse(input)
}

fn complex_literal(input: &str) -> Res<&str, (Option<&str>, Option<&str>)> {
    alt((delimited(char('('), complex_body, char(')')), complex_body)).parse(input)
}
