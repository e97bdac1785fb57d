//! Account declarations and the running account context of a statement.

use std::collections::HashMap;

use crate::classify::{is_account_number, is_currency_code};

/// Currency reported for an account that never declared one.
pub const UNKNOWN_CURRENCY: &str = "NA";

/// An account declared by a text block, with its currency when the block ends in one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccInfo {
    pub account_number: String,
    pub currency: Option<String>,
}

/// Recognize an account-declaration block.
///
/// Exactly one account-number token is required; zero or several means the
/// block is something else. The currency, if any, is the block's last token.
pub fn account_info(block: &[String]) -> Option<AccInfo> {
    let mut candidates = block.iter().filter(|t| is_account_number(t));
    let account_number = candidates.next()?;
    if candidates.next().is_some() {
        return None;
    }

    let currency = block
        .last()
        .map(|t| t.trim())
        .filter(|t| is_currency_code(t))
        .map(str::to_string);

    Some(AccInfo {
        account_number: account_number.clone(),
        currency,
    })
}

/// Account in effect for the following transaction blocks, plus every
/// currency seen so far keyed by account number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountContext {
    current: Option<String>,
    currencies: HashMap<String, String>,
}

impl AccountContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a declaration into the context. The current account is always
    /// replaced; a remembered currency is only overwritten by a new one.
    pub fn declare(mut self, info: AccInfo) -> Self {
        if let Some(currency) = info.currency {
            self.currencies.insert(info.account_number.clone(), currency);
        }
        self.current = Some(info.account_number);
        self
    }

    pub fn account(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn currency(&self) -> &str {
        self.current
            .as_ref()
            .and_then(|acc| self.currencies.get(acc))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CURRENCY)
    }
}
