//! Structured token types
//!
//! Tokens borrow from the scanned buffer. `into_owned` materializes a copy
//! for callers that must keep a token past the buffer's lifetime.

use std::borrow::Cow;
use std::fmt;

use crate::core::attributes::RawAttr;
use crate::core::element::split_name;
use crate::core::entities::decode_entities;
use crate::error::Result;

#[inline]
fn own(bytes: Cow<'_, [u8]>) -> Cow<'static, [u8]> {
    Cow::Owned(bytes.into_owned())
}

/// Qualified XML name split at the first colon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name<'a> {
    /// Namespace prefix as written in the document (never resolved)
    pub prefix: Option<Cow<'a, [u8]>>,
    /// Local name (after colon)
    pub local: Cow<'a, [u8]>,
}

impl<'a> Name<'a> {
    /// Split a qualified name borrowed from the buffer
    pub fn new(qualified: &'a [u8]) -> Self {
        let (prefix, local) = split_name(qualified);
        Name {
            prefix: prefix.map(Cow::Borrowed),
            local: Cow::Borrowed(local),
        }
    }

    /// True when this name spells `qualified`
    pub fn matches(&self, qualified: &[u8]) -> bool {
        let (prefix, local) = split_name(qualified);
        self.local.as_ref() == local && self.prefix.as_deref() == prefix
    }

    /// Get the local name as a string
    pub fn local_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.local).ok()
    }

    /// Get the prefix as a string
    pub fn prefix_str(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        std::str::from_utf8(prefix).ok()
    }

    pub fn into_owned(self) -> Name<'static> {
        Name {
            prefix: self.prefix.map(own),
            local: own(self.local),
        }
    }
}

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, "{}:", String::from_utf8_lossy(prefix))?;
        }
        f.write_str(&String::from_utf8_lossy(&self.local))
    }
}

/// Attribute of a start element with its value entity-decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr<'a> {
    pub name: Name<'a>,
    /// Borrowed unless decoding had to substitute entities
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attr<'a> {
    /// Decode the value of a raw attribute
    pub fn decode(raw: RawAttr<'a>) -> Result<Self> {
        Ok(Attr {
            name: Name::new(raw.key),
            value: decode_entities(raw.value, None)?,
        })
    }

    /// Get the value as a string
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }

    pub fn into_owned(self) -> Attr<'static> {
        Attr {
            name: self.name.into_owned(),
            value: own(self.value),
        }
    }
}

/// Start element event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartElement<'a> {
    pub name: Name<'a>,
    /// Attributes in source order
    pub attrs: Vec<Attr<'a>>,
}

impl<'a> StartElement<'a> {
    /// The matching end element
    pub fn end(&self) -> EndElement<'a> {
        EndElement {
            name: self.name.clone(),
        }
    }

    /// Get an attribute by qualified name
    pub fn attr(&self, qualified: &[u8]) -> Option<&Attr<'a>> {
        self.attrs.iter().find(|a| a.name.matches(qualified))
    }

    /// Get an attribute value by qualified name as string
    pub fn attr_str(&self, qualified: &str) -> Option<&str> {
        self.attr(qualified.as_bytes()).and_then(Attr::value_str)
    }

    pub fn into_owned(self) -> StartElement<'static> {
        StartElement {
            name: self.name.into_owned(),
            attrs: self.attrs.into_iter().map(Attr::into_owned).collect(),
        }
    }
}

/// End element event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndElement<'a> {
    pub name: Name<'a>,
}

impl EndElement<'_> {
    pub fn into_owned(self) -> EndElement<'static> {
        EndElement {
            name: self.name.into_owned(),
        }
    }
}

/// Processing instruction: `<?target inst?>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcInst<'a> {
    pub target: Cow<'a, [u8]>,
    /// Everything after the first space, empty if there is none
    pub inst: Cow<'a, [u8]>,
}

impl ProcInst<'_> {
    pub fn into_owned(self) -> ProcInst<'static> {
        ProcInst {
            target: own(self.target),
            inst: own(self.inst),
        }
    }
}

/// A classified XML token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `<name attrs...>`, also emitted for `<name attrs.../>`
    StartElement(StartElement<'a>),
    /// `</name>`, or the synthetic close of a self-closing tag
    EndElement(EndElement<'a>),
    /// Text with entities decoded, or CDATA content verbatim
    CharData(Cow<'a, [u8]>),
    /// Comment content without `<!--` and `-->`
    Comment(Cow<'a, [u8]>),
    ProcInst(ProcInst<'a>),
    /// Directive content without `<!` and `>`
    Directive(Cow<'a, [u8]>),
}

impl<'a> Token<'a> {
    /// Check if this is a start element event
    pub fn is_start_element(&self) -> bool {
        matches!(self, Token::StartElement(_))
    }

    /// Check if this is an end element event
    pub fn is_end_element(&self) -> bool {
        matches!(self, Token::EndElement(_))
    }

    /// Get as start element if applicable
    pub fn as_start_element(&self) -> Option<&StartElement<'a>> {
        match self {
            Token::StartElement(e) => Some(e),
            _ => None,
        }
    }

    /// Get as end element if applicable
    pub fn as_end_element(&self) -> Option<&EndElement<'a>> {
        match self {
            Token::EndElement(e) => Some(e),
            _ => None,
        }
    }

    /// Get character data if applicable
    pub fn as_char_data(&self) -> Option<&[u8]> {
        match self {
            Token::CharData(t) => Some(t.as_ref()),
            _ => None,
        }
    }

    /// Copy every borrowed part so the token outlives its buffer
    pub fn into_owned(self) -> Token<'static> {
        match self {
            Token::StartElement(e) => Token::StartElement(e.into_owned()),
            Token::EndElement(e) => Token::EndElement(e.into_owned()),
            Token::CharData(t) => Token::CharData(own(t)),
            Token::Comment(t) => Token::Comment(own(t)),
            Token::ProcInst(p) => Token::ProcInst(p.into_owned()),
            Token::Directive(t) => Token::Directive(own(t)),
        }
    }
}
