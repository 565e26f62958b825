//! XML Attribute Parsing
//!
//! Walks the attribute section of a tag (`key="value" other='v2'`) without
//! allocating. Values are handed out raw; entity decoding is the caller's
//! choice.

use std::ops::{ControlFlow, Range};

use memchr::{memchr, memchr2};

use super::element::split_name;
use crate::error::{AttrError, Result};

/// An undecoded attribute borrowed from the tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAttr<'a> {
    /// Qualified key, surrounding whitespace trimmed
    pub key: &'a [u8],
    /// Value between the quotes, entities not yet decoded
    pub value: &'a [u8],
}

impl<'a> RawAttr<'a> {
    /// Namespace prefix of the key, if any
    pub fn prefix(&self) -> Option<&'a [u8]> {
        split_name(self.key).0
    }

    /// Key without its prefix
    pub fn local_name(&self) -> &'a [u8] {
        split_name(self.key).1
    }
}

/// Visit each attribute as `(key_range, value_range)` offsets into `attrs`.
///
/// Iteration stops early when `f` breaks. Once every attribute has been
/// visited, anything but whitespace left in `attrs` is an error.
pub fn for_each_attr_range<F>(attrs: &[u8], mut f: F) -> Result<()>
where
    F: FnMut(Range<usize>, Range<usize>) -> ControlFlow<()>,
{
    let mut offset = 0;
    while offset < attrs.len() {
        let Some(eq) = memchr(b'=', &attrs[offset..]) else {
            break;
        };
        let eq = offset + eq;

        // ` key = "value"`
        //       ^
        let key = trim_range(attrs, offset..eq);
        if key.is_empty() {
            return Err(AttrError::EmptyKey.into());
        }

        // ` key = "value"`
        //         ^
        let after = eq + 1;
        let Some(open) = memchr2(b'"', b'\'', &attrs[after..]) else {
            return Err(AttrError::MissingOpeningQuote.into());
        };
        let quote = attrs[after + open];
        let value_start = after + open + 1;

        // ` key = "value"`
        //               ^
        let Some(len) = memchr(quote, &attrs[value_start..]) else {
            return Err(AttrError::MissingClosingQuote.into());
        };
        let value_end = value_start + len;
        offset = value_end + 1;

        if f(key, value_start..value_end).is_break() {
            return Ok(());
        }
    }

    let rest = &attrs[offset.min(attrs.len())..];
    match rest.iter().position(|b| !b.is_ascii_whitespace()) {
        Some(idx) => {
            let rest = String::from_utf8_lossy(&rest[idx..]).into_owned();
            Err(AttrError::TrailingContent(rest).into())
        }
        None => Ok(()),
    }
}

/// Visit each attribute as borrowed `(key, raw value)` slices
pub fn for_each_attr<'a, F>(attrs: &'a [u8], mut f: F) -> Result<()>
where
    F: FnMut(&'a [u8], &'a [u8]) -> ControlFlow<()>,
{
    for_each_attr_range(attrs, |key, value| f(&attrs[key], &attrs[value]))
}

/// Offsets of the value of the first attribute named `key`
pub fn get_attr_range(attrs: &[u8], key: &[u8]) -> Result<Option<Range<usize>>> {
    let mut found = None;
    for_each_attr_range(attrs, |k, v| {
        if &attrs[k] == key {
            found = Some(v);
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })?;
    Ok(found)
}

/// Raw value of the first attribute named `key`
pub fn get_attr<'a>(attrs: &'a [u8], key: &[u8]) -> Result<Option<&'a [u8]>> {
    Ok(get_attr_range(attrs, key)?.map(|range| &attrs[range]))
}

/// Collect every attribute into a list
pub fn collect_attrs(attrs: &[u8]) -> Result<Vec<RawAttr<'_>>> {
    let mut out = Vec::new();
    for_each_attr(attrs, |key, value| {
        out.push(RawAttr { key, value });
        ControlFlow::Continue(())
    })?;
    Ok(out)
}

/// Shrink `range` to exclude leading and trailing whitespace
#[inline]
fn trim_range(input: &[u8], range: Range<usize>) -> Range<usize> {
    let slice = &input[range.clone()];
    let Some(first) = slice.iter().position(|b| !b.is_ascii_whitespace()) else {
        return range.start..range.start;
    };
    let last = slice
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .unwrap_or(first);
    range.start + first..range.start + last + 1
}
