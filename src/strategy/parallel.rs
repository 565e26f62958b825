//! Parallel Region Scanning
//!
//! Uses Rayon to run independent readers concurrently. Readers only share
//! the immutable input, so no synchronization is involved.

use std::io::SeekFrom;

use rayon::prelude::*;

use crate::core::scanner::Scanner;
use crate::error::{Error, Result};
use crate::reader::events::Token;
use crate::reader::slice::TokenReader;

/// Collect the node starting at `offset`.
///
/// A start element is followed through its matching end element; any
/// other token is returned on its own.
pub fn collect_subtree(input: &[u8], offset: usize) -> Result<Vec<Token<'_>>> {
    let mut scanner = Scanner::new(input);
    scanner.seek(SeekFrom::Start(offset as u64))?;
    let mut reader = TokenReader::from_scanner(scanner);

    let mut tokens = Vec::new();
    let mut depth = 0usize;
    loop {
        let Some(token) = reader.next_token()? else {
            return Err(Error::UnexpectedEof { depth });
        };
        match &token {
            Token::StartElement(_) => depth += 1,
            Token::EndElement(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        tokens.push(token);
        if depth == 0 {
            return Ok(tokens);
        }
    }
}

/// Collect the nodes at several resumption points in parallel.
///
/// Offsets are typically recorded with [`Scanner::offset`] during a
/// cheap first pass. Results keep the order of `offsets`.
pub fn collect_subtrees<'a>(input: &'a [u8], offsets: &[usize]) -> Vec<Result<Vec<Token<'a>>>> {
    trace!("Collecting {} regions in parallel", offsets.len());
    offsets
        .par_iter()
        .map(|&offset| collect_subtree(input, offset))
        .collect()
}

/// Count the tokens of many independent documents in parallel
pub fn count_tokens(documents: &[&[u8]]) -> Vec<Result<usize>> {
    trace!(
        "Counting tokens of {} documents in parallel",
        documents.len()
    );
    documents
        .par_iter()
        .map(|doc| {
            TokenReader::new(doc)
                .tokens()
                .try_fold(0usize, |count, token| token.map(|_| count + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Offsets of every element directly below the root
    fn child_offsets(input: &[u8]) -> Vec<usize> {
        let mut scanner = Scanner::new(input);
        scanner.next_token().unwrap();
        let mut offsets = Vec::new();
        loop {
            let offset = scanner.offset();
            let Some(token) = scanner.next_token().unwrap() else {
                break;
            };
            if crate::core::element::is_end_element(token.bytes) {
                break;
            }
            if !token.char_data {
                offsets.push(offset);
                if !crate::core::element::is_self_closing(token.bytes) {
                    scanner.skip().unwrap();
                }
            }
        }
        offsets
    }

    #[test]
    fn test_collect_subtrees() {
        let input = b"<root><item id=\"1\">one</item> <item id=\"2\"><b/></item><leaf/></root>";
        let offsets = child_offsets(input);
        assert_eq!(offsets.len(), 3);

        let results = collect_subtrees(input, &offsets);
        assert_eq!(results.len(), 3);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(
            first[0].as_start_element().unwrap().attr_str("id"),
            Some("1")
        );
        assert_eq!(results[1].as_ref().unwrap().len(), 4);
        assert_eq!(results[2].as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_collect_subtree_errors() {
        let input = b"<a><b>";
        assert_eq!(
            collect_subtree(input, 0).unwrap_err(),
            Error::UnexpectedEof { depth: 2 }
        );
        assert!(collect_subtree(input, 99).unwrap_err().is_invalid_seek());
    }

    #[test]
    fn test_collect_non_element() {
        let tokens = collect_subtree(b"<a>text</a>", 3).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].as_char_data(), Some(b"text" as &[u8]));
    }

    #[test]
    fn test_count_tokens() {
        let docs: [&[u8]; 3] = [b"<a>x</a>", b"<b/>", b"<c"];
        let counts = count_tokens(&docs);
        assert_eq!(counts[0], Ok(3));
        assert_eq!(counts[1], Ok(2));
        assert_eq!(counts[2], Err(Error::UnterminatedTag { position: 0 }));
    }
}
