//! Document-level extraction: one pass over the operation stream that folds
//! text blocks into account context and transaction records, while tracking
//! the statement term.

use std::path::Path;

use crate::classify::is_tx_date_range;
use crate::context::{AccountContext, account_info};
use crate::error::Result;
use crate::operation::{ContentSource, Operation, operations};
use crate::pdf::PdfDocument;
use crate::records::transaction_records;
use crate::segment::BlockSegmenter;
use crate::types::{DocumentMeta, ExtractionResult, TransactionRecord};

/// Apply one text block to the account context.
///
/// Account declarations only update the context. Any other block is split
/// into records qualified with the context as it stands.
pub fn process_block(
    context: AccountContext,
    block: &[String],
) -> (AccountContext, Vec<TransactionRecord>) {
    if let Some(info) = account_info(block) {
        log::debug!(
            "account {} declared (currency: {})",
            info.account_number,
            info.currency.as_deref().unwrap_or("-")
        );
        return (context.declare(info), Vec::new());
    }

    let records: Vec<_> = transaction_records(block)
        .map(|fields| TransactionRecord {
            account_number: context.account().map(str::to_string),
            currency: context.currency().to_string(),
            fields,
        })
        .collect();
    log::trace!("{}-token block -> {} records", block.len(), records.len());
    (context, records)
}

/// Last-seen date range drawn anywhere in the document.
fn term_candidate(op: &Operation) -> Option<&str> {
    op.shown_text().filter(|t| is_tx_date_range(t))
}

#[derive(Debug, Default)]
struct Extraction {
    context: AccountContext,
    term: Option<String>,
    records: Vec<TransactionRecord>,
}

impl Extraction {
    fn step(mut self, op: &Operation, segmenter: &mut BlockSegmenter) -> Self {
        if let Some(term) = term_candidate(op) {
            self.term = Some(term.to_string());
        }
        if let Some(block) = segmenter.push(op) {
            let (context, records) = process_block(self.context, &block);
            self.context = context;
            self.records.extend(records);
        }
        self
    }

    fn finish(self) -> Option<ExtractionResult> {
        if self.records.is_empty() {
            return None;
        }
        Some(ExtractionResult {
            meta: DocumentMeta { term: self.term },
            records: self.records,
        })
    }
}

/// Statement metadata only.
pub fn extract_meta<S: ContentSource + ?Sized>(source: &S) -> Result<DocumentMeta> {
    let mut term = None;
    for op in operations(source) {
        let op = op?;
        if let Some(t) = term_candidate(&op) {
            term = Some(t.to_string());
        }
    }
    Ok(DocumentMeta { term })
}

/// Full extraction. `Ok(None)` when the document holds no transactions;
/// a decode error anywhere discards everything found so far.
pub fn extract<S: ContentSource + ?Sized>(source: &S) -> Result<Option<ExtractionResult>> {
    let mut segmenter = BlockSegmenter::new();
    let mut state = Extraction::default();
    for op in operations(source) {
        state = state.step(&op?, &mut segmenter);
    }
    if segmenter.is_open() {
        log::debug!("document ends inside a text block; dropping it");
    }
    Ok(state.finish())
}

pub fn extract_meta_path(path: impl AsRef<Path>) -> Result<DocumentMeta> {
    let doc = PdfDocument::open(path)?;
    extract_meta(&doc)
}

pub fn extract_path(path: impl AsRef<Path>) -> Result<Option<ExtractionResult>> {
    let doc = PdfDocument::open(path)?;
    extract(&doc)
}
