//! Splits a transaction-table text block into raw records.
//!
//! A record starts wherever two transaction dates sit two tokens apart
//! (booking date, empty placeholder, value date). Records run up to the next
//! start; the last one runs up to one token before the first date range in the
//! block, or to the end of the block when there is none.

use crate::classify::{is_tx_date, is_tx_date_range, normalize_amount};

/// Offset of the amount within a raw record.
const AMOUNT_FIELD: usize = 3;
/// Offset of the always-empty placeholder within a raw record.
const PLACEHOLDER_FIELD: usize = 1;

/// Records of one block, in order. Blocks without anchors yield nothing.
pub fn transaction_records(block: &[String]) -> impl Iterator<Item = Vec<String>> + '_ {
    record_spans(block)
        .into_iter()
        .filter_map(move |(start, end)| shape_record(&block[start..end]))
}

/// Index ranges of the raw records. Ends are already clamped to the block.
fn record_spans(block: &[String]) -> Vec<(usize, usize)> {
    let len = block.len();
    let mut bounds: Vec<isize> = (0..len.saturating_sub(2))
        .filter(|&i| is_tx_date(&block[i]) && is_tx_date(&block[i + 2]))
        .map(|i| i as isize)
        .collect();
    if bounds.is_empty() {
        return Vec::new();
    }

    let terminator = block
        .iter()
        .position(|t| is_tx_date_range(t))
        .unwrap_or(len + 2);
    bounds.push(terminator as isize - 1);

    bounds
        .windows(2)
        .map(|pair| {
            let start = pair[0] as usize;
            let end = resolve_end(pair[1], len).max(start);
            (start, end)
        })
        .collect()
}

/// Slice-end semantics of the statement layout: negative ends count back from
/// the block end, and anything past the end is clamped.
fn resolve_end(end: isize, len: usize) -> usize {
    if end < 0 {
        (len as isize + end).max(0) as usize
    } else {
        (end as usize).min(len)
    }
}

fn shape_record(raw: &[String]) -> Option<Vec<String>> {
    if raw.len() <= AMOUNT_FIELD {
        log::debug!("skipping {}-token record without an amount: {:?}", raw.len(), raw);
        return None;
    }
    let mut record = raw.to_vec();
    record[AMOUNT_FIELD] = normalize_amount(&record[AMOUNT_FIELD]);
    record.remove(PLACEHOLDER_FIELD);
    Some(record)
}
