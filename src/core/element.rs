//! Raw tag classification and element extraction
//!
//! All classifiers are O(1) prefix/suffix checks on a raw tag token and do
//! no parsing. Extractors strip delimiters only after checking that the
//! token is long enough to hold them.

use memchr::memchr;

use super::scanner::{CDATA_CLOSE, CDATA_OPEN};

const COMMENT_OPEN: &[u8] = b"<!--";
const COMMENT_CLOSE: &[u8] = b"-->";

/// `<` not followed by `/`
#[inline]
pub fn is_start_element(token: &[u8]) -> bool {
    token.len() >= 2 && token[0] == b'<' && token[1] != b'/'
}

/// Starts with `</`
#[inline]
pub fn is_end_element(token: &[u8]) -> bool {
    token.starts_with(b"</")
}

/// Ends with `/>`
#[inline]
pub fn is_self_closing(token: &[u8]) -> bool {
    token.len() > 2 && token.ends_with(b"/>")
}

/// An element tag: `<` not followed by `!` or `?`
#[inline]
pub fn is_element(token: &[u8]) -> bool {
    token.len() >= 3 && token[0] == b'<' && token[1] != b'!' && token[1] != b'?'
}

/// Starts with `<!--`
#[inline]
pub fn is_comment(token: &[u8]) -> bool {
    token.starts_with(COMMENT_OPEN)
}

/// Starts with `<!` and is not a comment.
///
/// A `<![CDATA[` tag counts as a directive here; the scanner flags real
/// CDATA sections as character data before any classifier sees them.
#[inline]
pub fn is_directive(token: &[u8]) -> bool {
    token.starts_with(b"<!") && !is_comment(token)
}

/// Starts with `<?`
#[inline]
pub fn is_proc_inst(token: &[u8]) -> bool {
    token.starts_with(b"<?")
}

/// Split a qualified name at the first colon into `(prefix, local)`
#[inline]
pub fn split_name(name: &[u8]) -> (Option<&[u8]>, &[u8]) {
    match memchr(b':', name) {
        Some(pos) => (Some(&name[..pos]), &name[pos + 1..]),
        None => (None, name),
    }
}

/// Extract the name and the attribute section of an element tag.
///
/// `<foo:bar key="val"/>` gives `(b"foo:bar", b"key=\"val\"")`. Leading
/// `</` and trailing `/>` are stripped; the attribute section is empty
/// when nothing follows the name.
pub fn extract_element(token: &[u8]) -> (&[u8], &[u8]) {
    if token.len() < 3 {
        return (&[], &[]);
    }
    let start = if token[1] == b'/' { 2 } else { 1 };
    let mut end = token.len();
    if token[end - 1] == b'>' {
        end -= 1;
    }
    if end > start && token[end - 1] == b'/' {
        end -= 1;
    }
    let inner = &token[start..end.max(start)];

    match inner.iter().position(u8::is_ascii_whitespace) {
        Some(space) => (&inner[..space], &inner[space + 1..]),
        None => (inner, &[]),
    }
}

/// Content between `<!--` and `-->`
pub fn comment(token: &[u8]) -> &[u8] {
    if token.len() < COMMENT_OPEN.len() + 1 || !is_comment(token) {
        return &[];
    }
    let body = &token[COMMENT_OPEN.len()..];
    body
        .strip_suffix(COMMENT_CLOSE)
        .or_else(|| body.strip_suffix(b">"))
        .unwrap_or(body)
}

/// Content between `<!` and `>`
pub fn directive(token: &[u8]) -> &[u8] {
    if token.len() < 3 || !token.starts_with(b"<!") {
        return &[];
    }
    let body = &token[2..];
    body.strip_suffix(b">").unwrap_or(body)
}

/// Target and instruction of `<?target inst?>`.
///
/// The instruction is empty when no space follows the target.
pub fn proc_inst(token: &[u8]) -> (&[u8], &[u8]) {
    if token.len() < 3 || !is_proc_inst(token) {
        return (&[], &[]);
    }
    let body = &token[2..];
    let body = body
        .strip_suffix(b"?>")
        .or_else(|| body.strip_suffix(b">"))
        .unwrap_or(body);
    match memchr(b' ', body) {
        Some(space) => (&body[..space], &body[space + 1..]),
        None => (body, &[]),
    }
}

/// Content of a `<![CDATA[...]]>` token, `None` for anything else
#[inline]
pub fn cdata(token: &[u8]) -> Option<&[u8]> {
    if token.len() >= CDATA_OPEN.len() + CDATA_CLOSE.len()
        && token.starts_with(CDATA_OPEN)
        && token.ends_with(CDATA_CLOSE)
    {
        Some(&token[CDATA_OPEN.len()..token.len() - CDATA_CLOSE.len()])
    } else {
        None
    }
}
