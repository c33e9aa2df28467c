//! Small building blocks for turning wire strings into canonical values.
//!
//! A codec is any `Fn(&str) -> Decoded<T>`. The helpers here build codecs out
//! of simpler ones so each field's rules read as a single expression.

use crate::error::FieldError;
use std::ops::RangeInclusive;

/// Result of decoding one wire value
pub type Decoded<T> = Result<T, FieldError>;

/// Accepts a string of ASCII digits whose length falls within `len`
pub fn digits(field: &'static str, len: RangeInclusive<usize>) -> impl Fn(&str) -> Decoded<String> {
    move |raw| {
        if len.contains(&raw.len()) && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(raw.to_owned())
        } else {
            Err(FieldError::new(field, "a string of digits", raw))
        }
    }
}

/// Accepts a string of ASCII uppercase letters whose length falls within `len`
pub fn upper_letters(
    field: &'static str,
    len: RangeInclusive<usize>,
) -> impl Fn(&str) -> Decoded<String> {
    move |raw| {
        if len.contains(&raw.len()) && raw.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(raw.to_owned())
        } else {
            Err(FieldError::new(field, "uppercase letters", raw))
        }
    }
}

/// Maps a fixed set of wire tokens onto values
pub fn one_of<T: Copy>(
    field: &'static str,
    expected: &'static str,
    table: &'static [(&'static str, T)],
) -> impl Fn(&str) -> Decoded<T> {
    move |raw| {
        table
            .iter()
            .find(|(token, _)| *token == raw)
            .map(|&(_, value)| value)
            .ok_or_else(|| FieldError::new(field, expected, raw))
    }
}

/// Feeds the output of `decode` through a further conversion
pub fn and_then<A, B>(
    decode: impl Fn(&str) -> Decoded<A>,
    next: impl Fn(A) -> Decoded<B>,
) -> impl Fn(&str) -> Decoded<B> {
    move |raw| decode(raw).and_then(&next)
}

/// Treats the literal `sentinel` as "no value" and decodes anything else
pub fn or_sentinel<T>(
    sentinel: &'static str,
    decode: impl Fn(&str) -> Decoded<T>,
) -> impl Fn(&str) -> Decoded<Option<T>> {
    move |raw| {
        if raw == sentinel {
            Ok(None)
        } else {
            decode(raw).map(Some)
        }
    }
}

/// Digit string parsed as a counter
pub fn count(field: &'static str) -> impl Fn(&str) -> Decoded<u32> {
    and_then(digits(field, 1..=9), move |d: String| {
        d.parse::<u32>()
            .map_err(|_| FieldError::new(field, "a count that fits in 32 bits", d))
    })
}
