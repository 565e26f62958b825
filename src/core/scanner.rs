//! SIMD-accelerated raw token scanning using memchr
//!
//! Splits an in-memory buffer into tag spans and character-data spans.
//! No interpretation happens here beyond recognizing CDATA sections, whose
//! content may contain `<` and `>`.

use std::io::SeekFrom;

use memchr::{memchr, memmem};

use super::element::{is_element, is_end_element, is_self_closing};
use crate::error::{Error, Result};

/// Opening marker of a CDATA section
pub const CDATA_OPEN: &[u8] = b"<![CDATA[";
/// Closing marker of a CDATA section
pub const CDATA_CLOSE: &[u8] = b"]]>";

/// One unclassified lexical unit borrowed from the scanned buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'a> {
    /// The full span: `<...>`, `<![CDATA[...]]>`, or a text run
    pub bytes: &'a [u8],
    /// Set for text runs and CDATA sections
    pub char_data: bool,
}

impl<'a> RawToken<'a> {
    #[inline]
    fn tag(bytes: &'a [u8]) -> Self {
        RawToken {
            bytes,
            char_data: false,
        }
    }

    #[inline]
    fn text(bytes: &'a [u8]) -> Self {
        RawToken {
            bytes,
            char_data: true,
        }
    }
}

/// Cursor over an immutable XML buffer
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Current cursor position, usable later as a [`SeekFrom::Start`] target
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Length of the underlying buffer
    #[inline]
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Whether the underlying buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Unconsumed bytes from the cursor on.
    ///
    /// After a scan error this is the partial token that failed.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// The whole buffer this scanner is bound to
    #[inline]
    pub fn buffer(&self) -> &'a [u8] {
        self.input
    }

    /// Produce the next raw token, or `None` once the buffer is exhausted.
    ///
    /// On error the cursor stays at the start of the offending token.
    pub fn next_token(&mut self) -> Result<Option<RawToken<'a>>> {
        let rest = self.remaining();
        let Some(&first) = rest.first() else {
            return Ok(None);
        };

        if first != b'<' {
            // Text runs to the next '<' or the end of the buffer
            let len = memchr(b'<', &rest[1..]).map_or(rest.len(), |i| i + 1);
            self.pos += len;
            return Ok(Some(RawToken::text(&rest[..len])));
        }

        if rest.starts_with(CDATA_OPEN) {
            let body = &rest[CDATA_OPEN.len()..];
            let Some(end) = memmem::find(body, CDATA_CLOSE) else {
                trace!("Unterminated CDATA at {}", self.pos);
                return Err(Error::UnterminatedCdata { position: self.pos });
            };
            let len = CDATA_OPEN.len() + end + CDATA_CLOSE.len();
            self.pos += len;
            return Ok(Some(RawToken::text(&rest[..len])));
        }

        let Some(end) = memchr(b'>', rest) else {
            trace!("Unterminated tag at {}", self.pos);
            return Err(Error::UnterminatedTag { position: self.pos });
        };
        let len = end + 1;
        self.pos += len;
        Ok(Some(RawToken::tag(&rest[..len])))
    }

    /// Reposition the cursor.
    ///
    /// Returns the new absolute offset. A rejected target leaves the cursor
    /// where it was. Previously returned tokens stay valid.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<usize> {
        let len = self.input.len() as i64;
        let target = match pos {
            SeekFrom::Start(n) => i64::try_from(n).unwrap_or(i64::MAX),
            SeekFrom::Current(delta) => (self.pos as i64).saturating_add(delta),
            SeekFrom::End(delta) => len.saturating_add(delta),
        };
        if target < 0 {
            return Err(Error::NegativeSeek { target });
        }
        if target > len {
            return Err(Error::SeekPastEnd {
                target,
                len: self.input.len(),
            });
        }
        trace!("Seek {} -> {target}", self.pos);
        self.pos = target as usize;
        Ok(self.pos)
    }

    /// Consume tokens until the element whose start tag was just returned
    /// is closed.
    ///
    /// Text, comments, directives, processing instructions and
    /// self-closing tags leave the depth alone.
    pub fn skip(&mut self) -> Result<()> {
        let mut depth = 1usize;
        while depth > 0 {
            let Some(token) = self.next_token()? else {
                trace!("Buffer ended inside skipped subtree (depth {depth})");
                return Err(Error::UnexpectedEof { depth });
            };
            if token.char_data || !is_element(token.bytes) || is_self_closing(token.bytes) {
                continue;
            }
            if is_end_element(token.bytes) {
                depth -= 1;
            } else {
                depth += 1;
            }
        }
        trace!("Skip finished at {}", self.pos);
        Ok(())
    }

    /// Rebind to a new buffer, rewinding to its start
    pub fn reset(&mut self, input: &'a [u8]) {
        trace!("Reset to buffer of {} bytes", input.len());
        self.input = input;
        self.pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8]) -> Result<Vec<(usize, &[u8], bool)>> {
        let mut scanner = Scanner::new(input);
        let mut out = Vec::new();
        loop {
            let offset = scanner.offset();
            match scanner.next_token()? {
                Some(t) => out.push((offset, t.bytes, t.char_data)),
                None => return Ok(out),
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(collect(b"").unwrap().is_empty());
    }

    #[test]
    fn test_text_only() {
        let tokens = collect(b"just some text").unwrap();
        assert_eq!(tokens, vec![(0, b"just some text" as &[u8], true)]);
    }

    #[test]
    fn test_cdata_with_markup() {
        let input = b"<![CDATA[nested<xml>]]>";
        let tokens = collect(input).unwrap();
        assert_eq!(tokens, vec![(0, input as &[u8], true)]);
    }

    #[test]
    fn test_mixed_offsets() {
        let input = b"foo<bar><gar /></bar><![CDATA[test]]>har";
        let tokens = collect(input).unwrap();
        let expected: Vec<(usize, &[u8], bool)> = vec![
            (0, b"foo", true),
            (3, b"<bar>", false),
            (8, b"<gar />", false),
            (15, b"</bar>", false),
            (21, b"<![CDATA[test]]>", true),
            (37, b"har", true),
        ];
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_unterminated_tag() {
        let mut scanner = Scanner::new(b"ok<unterminated");
        assert!(scanner.next_token().unwrap().is_some());
        let err = scanner.next_token().unwrap_err();
        assert_eq!(err, Error::UnterminatedTag { position: 2 });
        // Cursor stays at the failure point
        assert_eq!(scanner.offset(), 2);
        assert_eq!(scanner.remaining(), b"<unterminated");
        assert_eq!(scanner.next_token().unwrap_err(), err);
    }

    #[test]
    fn test_unterminated_cdata() {
        let mut scanner = Scanner::new(b"<![CDATA[unterminated]]");
        assert_eq!(
            scanner.next_token().unwrap_err(),
            Error::UnterminatedCdata { position: 0 }
        );
    }

    #[test]
    fn test_seek() {
        let mut scanner = Scanner::new(b"<a>text</a>");
        assert_eq!(scanner.seek(SeekFrom::Start(3)).unwrap(), 3);
        assert_eq!(scanner.next_token().unwrap().unwrap().bytes, b"text");
        assert_eq!(scanner.seek(SeekFrom::Current(-4)).unwrap(), 3);
        assert_eq!(scanner.seek(SeekFrom::End(-4)).unwrap(), 7);
        assert_eq!(scanner.next_token().unwrap().unwrap().bytes, b"</a>");
        assert_eq!(scanner.seek(SeekFrom::End(0)).unwrap(), 11);
        assert!(scanner.next_token().unwrap().is_none());
    }

    #[test]
    fn test_seek_out_of_range() {
        let mut scanner = Scanner::new(b"<a/>");
        scanner.seek(SeekFrom::Start(1)).unwrap();

        let err = scanner.seek(SeekFrom::Start(5)).unwrap_err();
        assert!(err.is_invalid_seek());
        assert_eq!(err, Error::SeekPastEnd { target: 5, len: 4 });
        assert_eq!(scanner.offset(), 1);

        let err = scanner.seek(SeekFrom::Current(-2)).unwrap_err();
        assert_eq!(err, Error::NegativeSeek { target: -1 });
        assert_eq!(scanner.offset(), 1);
    }

    #[test]
    fn test_tokens_survive_seek() {
        let mut scanner = Scanner::new(b"<a>x</a>");
        let first = scanner.next_token().unwrap().unwrap();
        scanner.seek(SeekFrom::Start(0)).unwrap();
        let again = scanner.next_token().unwrap().unwrap();
        assert_eq!(first.bytes, again.bytes);
    }

    #[test]
    fn test_skip() {
        let input = b"<nested><element>with data</element><closing/><?skip me></nested>more";
        let mut scanner = Scanner::new(input);
        assert_eq!(scanner.next_token().unwrap().unwrap().bytes, b"<nested>");
        scanner.skip().unwrap();
        let token = scanner.next_token().unwrap().unwrap();
        assert_eq!(token.bytes, b"more");
        assert!(token.char_data);
        assert!(scanner.next_token().unwrap().is_none());
    }

    #[test]
    fn test_skip_ignores_comments_and_cdata() {
        let mut scanner = Scanner::new(b"<a><!-- <b> --><![CDATA[<c>]]><!DOCTYPE x></a><z/>");
        scanner.next_token().unwrap();
        scanner.skip().unwrap();
        assert_eq!(scanner.next_token().unwrap().unwrap().bytes, b"<z/>");
    }

    #[test]
    fn test_skip_errors() {
        let mut scanner = Scanner::new(b"<?invalid");
        assert_eq!(
            scanner.skip().unwrap_err(),
            Error::UnterminatedTag { position: 0 }
        );

        scanner.reset(b"<a><b></b>");
        scanner.next_token().unwrap();
        assert_eq!(
            scanner.skip().unwrap_err(),
            Error::UnexpectedEof { depth: 1 }
        );
    }

    #[test]
    fn test_reset() {
        let first = b"<a>".to_vec();
        let second = b"text".to_vec();
        let mut scanner = Scanner::new(&first);
        scanner.next_token().unwrap();
        assert!(scanner.is_eof());
        scanner.reset(&second);
        assert_eq!(scanner.offset(), 0);
        assert_eq!(scanner.len(), 4);
        assert!(!scanner.is_empty());
        assert_eq!(scanner.buffer(), b"text");
        assert_eq!(scanner.next_token().unwrap().unwrap().bytes, b"text");
        assert_eq!(scanner.buffer(), b"text");

        scanner.reset(b"");
        assert!(scanner.is_empty());
        assert!(scanner.is_eof());
    }
}
