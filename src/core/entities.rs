//! XML Entity Decoding
//!
//! Handles decoding of:
//! - Predefined entities: &lt; &gt; &amp; &quot; &apos;
//! - HTML 4 named entities: &nbsp; &pound; &hellip; ...
//! - Numeric character references: &#123; &#x7B;
//!
//! Uses Cow for zero-copy when no entities are present. Any failure aborts
//! the whole decode; no partial substitution is ever handed back as a
//! success.

use std::borrow::Cow;

use memchr::memchr;

use super::element::cdata;
use super::entity_table::lookup_entity;
use crate::error::{Error, Result};

/// Decode entity references in `input`.
///
/// Returns `Borrowed(input)` untouched when there is no `&` (no
/// allocation). Otherwise the decoded bytes are appended to `scratch` when
/// one is supplied and borrowed back from its tail, or collected into a
/// fresh buffer.
pub fn decode_entities<'a>(
    input: &'a [u8],
    scratch: Option<&'a mut Vec<u8>>,
) -> Result<Cow<'a, [u8]>> {
    // Fast path: check if there are any entities using SIMD
    let Some(amp) = memchr(b'&', input) else {
        return Ok(Cow::Borrowed(input));
    };
    match scratch {
        Some(out) => {
            let start = out.len();
            if let Err(err) = decode_from(out, input, amp) {
                out.truncate(start);
                return Err(err);
            }
            let out: &'a Vec<u8> = out;
            Ok(Cow::Borrowed(&out[start..]))
        }
        None => {
            let mut out = Vec::with_capacity(input.len());
            decode_from(&mut out, input, amp)?;
            Ok(Cow::Owned(out))
        }
    }
}

/// Decode `input` onto the end of `out`, copying verbatim when there is
/// nothing to decode.
///
/// On error `out` is restored to its length before the call.
pub fn decode_append(out: &mut Vec<u8>, input: &[u8]) -> Result<()> {
    let Some(amp) = memchr(b'&', input) else {
        out.extend_from_slice(input);
        return Ok(());
    };
    let start = out.len();
    decode_from(out, input, amp)
        .inspect_err(|_| out.truncate(start))
}

/// Decoded content of a character-data token.
///
/// CDATA sections come back verbatim, everything else goes through
/// [`decode_entities`].
pub fn char_data<'a>(token: &'a [u8], scratch: Option<&'a mut Vec<u8>>) -> Result<Cow<'a, [u8]>> {
    match cdata(token) {
        Some(content) => Ok(Cow::Borrowed(content)),
        None => decode_entities(token, scratch),
    }
}

/// Append the decoded content of a character-data token to `out`
pub fn char_data_append(out: &mut Vec<u8>, token: &[u8]) -> Result<()> {
    match cdata(token) {
        Some(content) => {
            out.extend_from_slice(content);
            Ok(())
        }
        None => decode_append(out, token),
    }
}

/// Decode everything from the first `&` at `amp` onwards
fn decode_from(out: &mut Vec<u8>, input: &[u8], mut amp: usize) -> Result<()> {
    // Decoded output never outgrows the input
    out.reserve(input.len());
    let mut pos = 0;
    loop {
        // Copy everything before the entity
        out.extend_from_slice(&input[pos..amp]);

        let body = &input[amp + 1..];
        let Some(semi) = memchr(b';', body) else {
            return Err(Error::UnterminatedEntity { position: amp });
        };
        decode_reference(out, &body[..semi])?;
        pos = amp + semi + 2;

        match memchr(b'&', &input[pos..]) {
            Some(next) => amp = pos + next,
            None => break,
        }
    }
    // No more entities, copy the rest
    out.extend_from_slice(&input[pos..]);
    Ok(())
}

/// Decode a single reference (without & and ;)
#[inline]
fn decode_reference(out: &mut Vec<u8>, reference: &[u8]) -> Result<()> {
    match reference {
        // Common entities before the table lookup
        b"lt" => out.push(b'<'),
        b"gt" => out.push(b'>'),
        b"amp" => out.push(b'&'),
        b"apos" => out.push(b'\''),
        b"quot" => out.push(b'"'),
        [b'#', b'x' | b'X', hex @ ..] => push_code_point(out, parse_numeric(hex, 16)?)?,
        [b'#', dec @ ..] => push_code_point(out, parse_numeric(dec, 10)?)?,
        name => match lookup_entity(name) {
            Some(text) => out.extend_from_slice(text.as_bytes()),
            None => return Err(unknown_entity(name)),
        },
    }
    Ok(())
}

fn unknown_entity(name: &[u8]) -> Error {
    Error::UnknownEntity(String::from_utf8_lossy(name).into_owned())
}

fn parse_numeric(digits: &[u8], radix: u32) -> Result<u32> {
    let text = String::from_utf8_lossy(digits);
    match u32::from_str_radix(&text, radix) {
        Ok(value) => Ok(value),
        Err(source) => Err(Error::InvalidNumericEntity {
            digits: text.into_owned(),
            source,
        }),
    }
}

#[inline]
fn push_code_point(out: &mut Vec<u8>, codepoint: u32) -> Result<()> {
    let Some(ch) = char::from_u32(codepoint) else {
        return Err(Error::InvalidCodePoint(codepoint));
    };
    let mut utf8 = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    Ok(())
}
