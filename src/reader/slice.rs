//! Zero-Copy Token Reader
//!
//! Classifies raw scanner output into structured tokens. Input references
//! are maintained directly in the output; only attribute values and text
//! containing entity references allocate.

use std::borrow::Cow;
use std::iter::FusedIterator;
use std::ops::ControlFlow;

use super::events::{Attr, EndElement, Name, ProcInst, StartElement, Token};
use crate::core::attributes::{for_each_attr, RawAttr};
use crate::core::element::{
    comment, directive, extract_element, is_comment, is_directive, is_end_element, is_proc_inst,
    is_self_closing, proc_inst,
};
use crate::core::entities::char_data;
use crate::core::scanner::Scanner;
use crate::error::Result;

/// Turn one raw token into a structured token.
///
/// Stateless: a self-closing tag yields only its start element here; the
/// paired end element is synthesized by [`TokenReader`].
pub fn classify<'a>(token: &'a [u8], is_char_data: bool) -> Result<Token<'a>> {
    if is_char_data {
        return Ok(Token::CharData(char_data(token, None)?));
    }
    if is_directive(token) {
        return Ok(Token::Directive(Cow::Borrowed(directive(token))));
    }
    if is_comment(token) {
        return Ok(Token::Comment(Cow::Borrowed(comment(token))));
    }
    if is_proc_inst(token) {
        let (target, inst) = proc_inst(token);
        return Ok(Token::ProcInst(ProcInst {
            target: Cow::Borrowed(target),
            inst: Cow::Borrowed(inst),
        }));
    }
    classify_element(token)
}

fn classify_element(token: &[u8]) -> Result<Token<'_>> {
    let (name, attrs) = extract_element(token);
    let name = Name::new(name);
    if is_end_element(token) {
        return Ok(Token::EndElement(EndElement { name }));
    }

    let mut decoded = Vec::new();
    let mut failed = None;
    for_each_attr(attrs, |key, value| match Attr::decode(RawAttr { key, value }) {
        Ok(attr) => {
            decoded.push(attr);
            ControlFlow::Continue(())
        }
        Err(err) => {
            failed = Some(err);
            ControlFlow::Break(())
        }
    })?;
    if let Some(err) = failed {
        return Err(err);
    }
    Ok(Token::StartElement(StartElement {
        name,
        attrs: decoded,
    }))
}

/// Pull reader producing structured tokens from a [`Scanner`]
#[derive(Debug, Clone)]
pub struct TokenReader<'a> {
    scanner: Scanner<'a>,
    /// Synthetic close of the last self-closing tag, not yet returned
    pending_end: Option<EndElement<'a>>,
}

impl<'a> TokenReader<'a> {
    /// Create a reader over a complete document
    pub fn new(input: &'a [u8]) -> Self {
        Self::from_scanner(Scanner::new(input))
    }

    /// Wrap an existing scanner, continuing from its current offset
    pub fn from_scanner(scanner: Scanner<'a>) -> Self {
        TokenReader {
            scanner,
            pending_end: None,
        }
    }

    /// Get the next token, or `None` at end of input.
    ///
    /// A self-closing tag yields its start element, then its end element on
    /// the following call without advancing the scanner.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>> {
        if let Some(end) = self.pending_end.take() {
            return Ok(Some(Token::EndElement(end)));
        }
        let Some(raw) = self.scanner.next_token()? else {
            return Ok(None);
        };
        let token = classify(raw.bytes, raw.char_data)?;
        if let Token::StartElement(start) = &token {
            if is_self_closing(raw.bytes) {
                self.pending_end = Some(start.end());
            }
        }
        Ok(Some(token))
    }

    /// Skip the rest of the element whose start was just returned.
    ///
    /// For a self-closing element this only drops the pending end.
    pub fn skip(&mut self) -> Result<()> {
        if self.pending_end.take().is_some() {
            return Ok(());
        }
        self.scanner.skip()
    }

    /// Whether a synthetic end element is queued
    pub fn has_pending_end(&self) -> bool {
        self.pending_end.is_some()
    }

    /// Offset of the underlying scanner
    pub fn offset(&self) -> usize {
        self.scanner.offset()
    }

    pub fn scanner(&self) -> &Scanner<'a> {
        &self.scanner
    }

    /// Direct scanner access, e.g. to seek.
    ///
    /// A pending end element is still returned first on the next call.
    pub fn scanner_mut(&mut self) -> &mut Scanner<'a> {
        &mut self.scanner
    }

    pub fn into_scanner(self) -> Scanner<'a> {
        self.scanner
    }

    /// Rebind to a new document
    pub fn reset(&mut self, input: &'a [u8]) {
        self.scanner.reset(input);
        self.pending_end = None;
    }

    /// Iterate over the remaining tokens, stopping after the first error
    pub fn tokens(self) -> Tokens<'a> {
        Tokens {
            reader: self,
            done: false,
        }
    }
}

/// Iterator over a [`TokenReader`]
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    reader: TokenReader<'a>,
    done: bool,
}

impl<'a> Tokens<'a> {
    /// Recover the reader, e.g. to seek past a bad token and resume
    pub fn into_reader(self) -> TokenReader<'a> {
        self.reader
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Tokens<'_> {}

/// Tokenize a whole document
pub fn parse_tokens(input: &[u8]) -> Result<Vec<Token<'_>>> {
    TokenReader::new(input).tokens().collect()
}

/// Tokenize a whole document into owned tokens
pub fn parse_tokens_owned(input: &[u8]) -> Result<Vec<Token<'static>>> {
    TokenReader::new(input)
        .tokens()
        .map(|token| token.map(Token::into_owned))
        .collect()
}
