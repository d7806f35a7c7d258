//! Amount parsing and currency formatting for user-entered money values.

use shared::EntryKind;

/// Currency symbol used for display formatting.
pub const CURRENCY_SYMBOL: &str = "$";

/// Clean and parse an amount input string.
///
/// Removes the currency symbol, commas, and spaces before parsing. The
/// result must be a finite number; positivity is the caller's rule to
/// enforce.
pub fn parse_amount(input: &str) -> Result<f64, String> {
    let cleaned = input
        .trim()
        .replace(CURRENCY_SYMBOL, "")
        .replace(',', "")
        .replace(' ', "");

    if cleaned.is_empty() {
        return Err("empty amount".to_string());
    }

    let amount: f64 = cleaned
        .parse()
        .map_err(|e| format!("invalid number format: {}", e))?;

    if !amount.is_finite() {
        return Err("amount is not a finite number".to_string());
    }

    Ok(amount)
}

/// Format an amount for display, e.g. "$10.50".
pub fn format_amount(amount: f64) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, amount)
}

/// Format an amount with its direction sign, e.g. "+$50.00" or "-$12.34".
pub fn format_signed_amount(amount: f64, kind: EntryKind) -> String {
    let sign = match kind {
        EntryKind::Credit => '+',
        EntryKind::Debit => '-',
    };
    format!("{}{}", sign, format_amount(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_decorated_amounts() {
        assert_eq!(parse_amount("10.50").unwrap(), 10.50);
        assert_eq!(parse_amount("$10.50").unwrap(), 10.50);
        assert_eq!(parse_amount(" $1,234.56 ").unwrap(), 1234.56);
        assert_eq!(parse_amount("5").unwrap(), 5.0);
        assert_eq!(parse_amount("-5").unwrap(), -5.0);
    }

    #[test]
    fn rejects_garbage_input() {
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("").is_err());
        assert!(parse_amount("   ").is_err());
        assert!(parse_amount("nan").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn formats_amounts_with_sign() {
        assert_eq!(format_amount(10.5), "$10.50");
        assert_eq!(format_signed_amount(50.0, EntryKind::Credit), "+$50.00");
        assert_eq!(format_signed_amount(12.34, EntryKind::Debit), "-$12.34");
    }
}
