//! slicexml - single-pass, zero-copy tokenizing of well-formed XML
//!
//! Layers, lowest first:
//! - Scanner: splits a complete in-memory buffer into raw tag and text spans,
//!   with seek and subtree skip
//! - Entities: resolves `&name;` / `&#NNN;` / `&#xHHH;` with a zero-copy
//!   fast path
//! - Element/attributes: name, prefix and attribute spans of a raw tag
//! - TokenReader: structured tokens, including the synthetic end element of
//!   self-closing tags
//! - Parallel (feature `parallel`): independent readers over shared input
//!
//! Input is assumed well-formed. Nothing here validates nesting, resolves
//! namespace prefixes, processes DTDs, or reads from a stream.
//!
//! ```
//! use slicexml::{Token, TokenReader};
//!
//! let xml = br#"<doc lang="en"><p>fish &amp; chips</p><br/></doc>"#;
//! let mut reader = TokenReader::new(xml);
//! let mut names = Vec::new();
//! while let Some(token) = reader.next_token()? {
//!     match token {
//!         Token::StartElement(e) => names.push(format!("+{}", e.name)),
//!         Token::EndElement(e) => names.push(format!("-{}", e.name)),
//!         Token::CharData(text) => assert_eq!(&text[..], b"fish & chips"),
//!         _ => {}
//!     }
//! }
//! assert_eq!(names, ["+doc", "+p", "-p", "+br", "-br", "-doc"]);
//! # Ok::<(), slicexml::Error>(())
//! ```

/// Emit a trace-level log message.
#[cfg(feature = "log")]
macro_rules! trace {
    ($($arg:tt)*) => {
        log::trace!($($arg)*)
    };
}

/// Emit a trace-level log message (no-op version).
#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

pub mod core;
mod error;
pub mod reader;
pub mod strategy;

pub use crate::core::attributes::{
    collect_attrs, for_each_attr, for_each_attr_range, get_attr, get_attr_range, RawAttr,
};
pub use crate::core::element::{
    cdata, comment, directive, extract_element, is_comment, is_directive, is_element,
    is_end_element, is_proc_inst, is_self_closing, is_start_element, proc_inst, split_name,
};
pub use crate::core::entities::{char_data, char_data_append, decode_append, decode_entities};
pub use crate::core::entity_table::lookup_entity;
pub use crate::core::scanner::{RawToken, Scanner};
pub use error::{AttrError, Error, Result};
pub use reader::events::{Attr, EndElement, Name, ProcInst, StartElement, Token};
pub use reader::slice::{classify, parse_tokens, parse_tokens_owned, TokenReader, Tokens};
#[cfg(feature = "parallel")]
pub use strategy::parallel;

/// Decode entity references into a fresh or borrowed buffer
///
/// Shorthand for [`decode_entities`] without a scratch buffer.
pub fn decode(input: &[u8]) -> Result<std::borrow::Cow<'_, [u8]>> {
    decode_entities(input, None)
}
