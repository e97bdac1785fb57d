//! otpx-ingest: transaction extraction from OTP bank statement PDFs.
//!
//! Statements carry no tagged structure, only drawn text. Records are rebuilt
//! from the order of `Tj` strings inside `BT`/`ET` blocks.

pub mod classify;
pub mod context;
pub mod error;
pub mod extract;
pub mod operation;
pub mod pdf;
pub mod records;
pub mod segment;
pub mod types;

pub use context::{AccInfo, AccountContext, UNKNOWN_CURRENCY};
pub use error::{IngestError, Result};
pub use extract::{extract, extract_meta, extract_meta_path, extract_path, process_block};
pub use operation::{ContentSource, Operand, Operation};
pub use pdf::PdfDocument;
pub use segment::TextBlock;
pub use types::{DocumentMeta, ExtractionResult, TransactionRecord};
