use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Statement date format, e.g. `01.02.23`.
const DATE_FORMAT: &str = "%d.%m.%y";

/// Offset of the normalized amount within [`TransactionRecord::fields`].
const AMOUNT_FIELD: usize = 2;

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// One transaction row qualified with the account it was listed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// None when the row appeared before any account declaration.
    pub account_number: Option<String>,
    /// Remembered currency of the account, or `NA`.
    pub currency: String,
    /// Booking date, value date, amount, then the description tokens.
    pub fields: Vec<String>,
}

impl TransactionRecord {
    pub fn date(&self) -> Option<NaiveDate> {
        self.fields.first().and_then(|d| parse_date(d))
    }

    pub fn amount(&self) -> Option<&str> {
        self.fields.get(AMOUNT_FIELD).map(String::as_str)
    }

    /// `[account, currency, fields...]` with an absent account as an empty cell.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(self.fields.len() + 2);
        row.push(self.account_number.clone().unwrap_or_default());
        row.push(self.currency.clone());
        row.extend(self.fields.iter().cloned());
        row
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Reporting period as printed, e.g. `01.01.23-31.01.23`.
    pub term: Option<String>,
}

impl DocumentMeta {
    /// The term as calendar dates, when both ends are real dates.
    pub fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        let (from, to) = self.term.as_deref()?.split_once('-')?;
        Some((parse_date(from)?, parse_date(to)?))
    }
}

/// Everything extracted from one statement. Never built with zero records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub meta: DocumentMeta,
    pub records: Vec<TransactionRecord>,
}

impl ExtractionResult {
    /// Output rows: `[term, account, currency, fields...]`.
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        let term = self.meta.term.clone().unwrap_or_default();
        self.records.iter().map(move |r| {
            let mut row = vec![term.clone()];
            row.extend(r.to_row());
            row
        })
    }
}
