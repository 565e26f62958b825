//! Allocation-counting harness
//!
//! Wraps mimalloc in a counting allocator to check the zero-allocation
//! paths: scanning, attribute visiting, and entity-free decoding. Counts
//! are per thread so concurrently running tests don't disturb each other.

use std::alloc::{GlobalAlloc, Layout};
use std::borrow::Cow;
use std::cell::Cell;
use std::ops::ControlFlow;

use slicexml::{decode_append, decode_entities, for_each_attr, Scanner, Token, TokenReader};

struct CountingAllocator;

static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let _ = ALLOCATIONS.try_with(|n| n.set(n.get() + 1));
        UNDERLYING.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        UNDERLYING.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let _ = ALLOCATIONS.try_with(|n| n.set(n.get() + 1));
        UNDERLYING.realloc(ptr, layout, new_size)
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

/// Allocations made on this thread while running `f`
fn allocations<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let before = ALLOCATIONS.with(Cell::get);
    let out = f();
    let after = ALLOCATIONS.with(Cell::get);
    (out, after - before)
}

#[test]
fn test_decode_fast_path_does_not_allocate() {
    let input = b"plain text with <no> references at all".to_vec();
    let (decoded, count) = allocations(|| decode_entities(&input, None).unwrap());
    assert_eq!(count, 0);
    assert!(matches!(decoded, Cow::Borrowed(_)));
    assert_eq!(decoded.as_ref(), &input[..]);
}

#[test]
fn test_decode_allocates_once() {
    let input = b"a &lt; b &amp;&amp; c &#x41; &#66;".to_vec();
    let (decoded, count) = allocations(|| decode_entities(&input, None).unwrap());
    assert_eq!(count, 1);
    assert_eq!(decoded.as_ref(), b"a < b && c A B");
}

#[test]
fn test_decode_append_reuses_buffer() {
    let mut out = Vec::with_capacity(256);
    let (_, count) = allocations(|| {
        for chunk in [&b"one &amp; "[..], b"two ", b"&quot;three&quot;"] {
            decode_append(&mut out, chunk).unwrap();
        }
    });
    assert_eq!(count, 0);
    assert_eq!(out, b"one & two \"three\"");
}

#[test]
fn test_attribute_visit_does_not_allocate() {
    let attrs: &[u8] = b"id=\"main\" xlink:href = \"#a\" title='x &amp; y'";
    let (visited, count) = allocations(|| {
        let mut visited = 0;
        for_each_attr(attrs, |_, _| {
            visited += 1;
            ControlFlow::Continue(())
        })
        .unwrap();
        visited
    });
    assert_eq!(visited, 3);
    assert_eq!(count, 0);
}

#[test]
fn test_scanner_does_not_allocate() {
    let doc: &[u8] = b"<?pi?><root a=\"1\"><!-- c --><x>&amp;</x><![CDATA[<y>]]><z/></root>";
    let (tokens, count) = allocations(|| {
        let mut scanner = Scanner::new(doc);
        let mut tokens = 0;
        while scanner.next_token().unwrap().is_some() {
            tokens += 1;
        }
        tokens
    });
    assert_eq!(tokens, 9);
    assert_eq!(count, 0);
}

#[test]
fn test_reader_borrows_plain_documents() {
    let doc = b"<a><b>text</b><c/><!-- note --></a>".to_vec();
    let (tokens, count) = allocations(|| {
        let mut reader = TokenReader::new(&doc);
        let mut tokens = 0;
        while let Some(token) = reader.next_token().unwrap() {
            if let Token::CharData(text) = &token {
                assert!(matches!(text, Cow::Borrowed(_)));
            }
            tokens += 1;
        }
        tokens
    });
    assert_eq!(tokens, 8);
    assert_eq!(count, 0);
}
