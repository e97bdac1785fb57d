//! Decoder-agnostic view of a document's content streams.
//!
//! Everything downstream works on a flat sequence of [`Operation`]s, so the
//! segmenter and classifiers can be driven by synthetic pages in tests without
//! any PDF fixture.

use std::vec;

use crate::error::Result;

pub const BEGIN_TEXT: &str = "BT";
pub const END_TEXT: &str = "ET";
pub const SHOW_TEXT: &str = "Tj";

/// A single content-stream operand. Only text matters here; the rest is opaque.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Text(String),
    Number(f64),
    Name(String),
    Other,
}

impl Operand {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Operand::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub operands: Vec<Operand>,
    pub operator: String,
}

impl Operation {
    pub fn new(operator: &str, operands: Vec<Operand>) -> Self {
        Self {
            operands,
            operator: operator.to_string(),
        }
    }

    pub fn begin_text() -> Self {
        Self::new(BEGIN_TEXT, Vec::new())
    }

    pub fn end_text() -> Self {
        Self::new(END_TEXT, Vec::new())
    }

    pub fn show_text(text: &str) -> Self {
        Self::new(SHOW_TEXT, vec![Operand::Text(text.to_string())])
    }

    /// True for an operand-less marker such as `BT` / `ET`.
    pub fn is_marker(&self, operator: &str) -> bool {
        self.operator == operator && self.operands.is_empty()
    }

    /// The drawn text of a `Tj` carrying exactly one text operand.
    pub fn shown_text(&self) -> Option<&str> {
        match self.operands.as_slice() {
            [only] if self.operator == SHOW_TEXT => only.as_text(),
            _ => None,
        }
    }
}

/// Page-wise access to decoded content streams.
pub trait ContentSource {
    fn page_count(&self) -> usize;

    /// Decode page `index` (0-based, document order) into its operations.
    fn page_operations(&self, index: usize) -> Result<Vec<Operation>>;
}

/// In-memory pages, one operation list per page.
impl ContentSource for Vec<Vec<Operation>> {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_operations(&self, index: usize) -> Result<Vec<Operation>> {
        Ok(self.get(index).cloned().unwrap_or_default())
    }
}

/// Single-pass iterator over every operation of every page.
///
/// Pages are decoded lazily. After the first decode error the iterator yields
/// that error once and then ends.
pub struct Operations<'a, S: ContentSource + ?Sized> {
    source: &'a S,
    next_page: usize,
    current: vec::IntoIter<Operation>,
    failed: bool,
}

pub fn operations<S: ContentSource + ?Sized>(source: &S) -> Operations<'_, S> {
    Operations {
        source,
        next_page: 0,
        current: Vec::new().into_iter(),
        failed: false,
    }
}

impl<S: ContentSource + ?Sized> Iterator for Operations<'_, S> {
    type Item = Result<Operation>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(op) = self.current.next() {
                return Some(Ok(op));
            }
            if self.next_page >= self.source.page_count() {
                return None;
            }
            let page = self.next_page;
            self.next_page += 1;
            match self.source.page_operations(page) {
                Ok(ops) => self.current = ops.into_iter(),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
