//! Token-shape predicates for OTP statements.
//!
//! All checks are purely lexical: `31.02.23` is a valid transaction date here.

use std::sync::LazyLock;

use regex::Regex;

static ACCOUNT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1177\d{4}-\d{8}$").expect("account number regex"));
static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency regex"));
static TX_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d\d\.\d\d\.\d\d$").expect("date regex"));
static TX_DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d\d\.\d\d\.\d\d-\d\d\.\d\d\.\d\d$").expect("date range regex")
});

/// Domestic account mask with the OTP bank code: `1177XXXX-XXXXXXXX`.
pub fn is_account_number(text: &str) -> bool {
    ACCOUNT_NUMBER_RE.is_match(text)
}

pub fn is_currency_code(text: &str) -> bool {
    CURRENCY_RE.is_match(text)
}

/// `DD.MM.YY`
pub fn is_tx_date(text: &str) -> bool {
    TX_DATE_RE.is_match(text)
}

/// `DD.MM.YY-DD.MM.YY`, used for the statement term.
pub fn is_tx_date_range(text: &str) -> bool {
    TX_DATE_RANGE_RE.is_match(text)
}

/// Hungarian number formatting to a plain decimal string.
///
/// `.` groups thousands and `,` is the decimal point: `1.234,56` -> `1234.56`.
/// Non-numeric input passes through with the same substitutions applied.
pub fn normalize_amount(text: &str) -> String {
    text.replace('.', "").replace(',', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_number_shape() {
        assert!(is_account_number("11771234-56781234"));
        assert!(!is_account_number("1177123-56781234"));
        assert!(!is_account_number("11781234-56781234"));
        assert!(!is_account_number("11771234-567812345"));
        assert!(!is_account_number(" 11771234-56781234"));
        assert!(!is_account_number("11771234-56781234-00000000"));
    }

    #[test]
    fn test_currency_code() {
        assert!(is_currency_code("HUF"));
        assert!(is_currency_code("EUR"));
        assert!(!is_currency_code("eur"));
        assert!(!is_currency_code("EURO"));
        assert!(!is_currency_code(" EUR"));
    }

    #[test]
    fn test_dates_are_shape_only() {
        assert!(is_tx_date("01.02.23"));
        assert!(is_tx_date("99.99.99"));
        assert!(!is_tx_date("1.02.23"));
        assert!(!is_tx_date("01.02.2023"));
        assert!(!is_tx_date("01/02/23"));

        assert!(is_tx_date_range("01.01.23-31.01.23"));
        assert!(!is_tx_date_range("01.01.23 - 31.01.23"));
        assert!(!is_tx_date_range("01.01.23"));
    }

    #[test]
    fn test_normalize_amount() {
        assert_eq!(normalize_amount("1.234,56"), "1234.56");
        assert_eq!(normalize_amount("56,00"), "56.00");
        assert_eq!(normalize_amount("-1.000.000,5"), "-1000000.5");
        assert_eq!(normalize_amount("desc"), "desc");
        assert_eq!(normalize_amount(""), "");
    }

    #[test]
    fn test_normalize_amount_reapplied() {
        // No separators left: a second pass changes nothing.
        assert_eq!(normalize_amount(&normalize_amount("1.234")), "1234");
        // The produced decimal point is treated as a thousands separator on a second pass.
        assert_eq!(normalize_amount(&normalize_amount("56,00")), "5600");
    }
}
