use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Clean a monetary amount from a report into a plain integer string.
///
/// Handles formats like:
/// - "Rp1.500.000,00" -> "1500000"
/// - "1.500.000" -> "1500000"
/// - "Rp0,00" -> "0"
///
/// The fractional part after the decimal comma is dropped. Cleaning an
/// already clean value returns it unchanged.
pub fn clean_amount(raw: &str) -> String {
    let without_currency = raw.replace("Rp", "");
    let integer_part = without_currency.split(',').next().unwrap_or("");
    integer_part.replace('.', "").trim().to_string()
}

/// Parse a percentage like "9,50%" or "12.5 %" into its number (9.50, 12.5).
///
/// Returns None when the text is not a number once the sign is stripped.
pub fn clean_percentage(raw: &str) -> Option<Decimal> {
    let s = raw.replace('%', "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    // Indonesian decimal comma
    Decimal::from_str(&s.replace(',', ".")).ok()
}

/// Parse a cleaned cell as a number, accepting only text that is already in
/// canonical decimal form (so identifiers like "008" stay text).
pub fn parse_clean_number(s: &str) -> Option<Decimal> {
    let d = Decimal::from_str(s).ok()?;
    if d.to_string() == s {
        Some(d)
    } else {
        None
    }
}

/// Scale applied to percentage columns when records are merged.
///
/// Normalized per-category records always hold the number printed in the
/// report (12.5 for "12,5%"); the unified table holds either that number or
/// the fraction (0.125).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PercentScale {
    #[default]
    Fraction,
    Raw,
}

impl PercentScale {
    pub fn apply(&self, percent: Decimal) -> Decimal {
        match self {
            PercentScale::Fraction => percent / Decimal::ONE_HUNDRED,
            PercentScale::Raw => percent,
        }
    }

    pub fn from_str_loose(s: &str) -> Option<PercentScale> {
        match s.trim().to_lowercase().as_str() {
            "fraction" | "frac" => Some(PercentScale::Fraction),
            "raw" | "percent" => Some(PercentScale::Raw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_clean_amount_with_currency_and_fraction() {
        assert_eq!(clean_amount("Rp1.500.000,00"), "1500000");
    }

    #[test]
    fn test_clean_amount_zero() {
        assert_eq!(clean_amount("Rp0,00"), "0");
    }

    #[test]
    fn test_clean_amount_keeps_placeholder() {
        assert_eq!(clean_amount("-"), "-");
    }

    #[test]
    fn test_clean_amount_whitespace() {
        assert_eq!(clean_amount("  Rp 25.000  "), "25000");
    }

    #[test]
    fn test_percentage_comma() {
        assert_eq!(clean_percentage("9,50%"), Some(dec!(9.50)));
    }

    #[test]
    fn test_percentage_dot_with_space() {
        assert_eq!(clean_percentage("12.5 %"), Some(dec!(12.5)));
    }

    #[test]
    fn test_percentage_invalid() {
        assert_eq!(clean_percentage("-"), None);
        assert_eq!(clean_percentage("%"), None);
    }

    #[test]
    fn test_parse_clean_number() {
        assert_eq!(parse_clean_number("1500000"), Some(dec!(1500000)));
        assert_eq!(parse_clean_number("0.125"), Some(dec!(0.125)));
        assert_eq!(parse_clean_number("008"), None);
        assert_eq!(parse_clean_number("1 - Lancar"), None);
    }

    #[test]
    fn test_percent_scale() {
        assert_eq!(PercentScale::Fraction.apply(dec!(12.5)), dec!(0.125));
        assert_eq!(PercentScale::Raw.apply(dec!(12.5)), dec!(12.5));
        assert_eq!(PercentScale::from_str_loose("RAW"), Some(PercentScale::Raw));
    }

    proptest! {
        #[test]
        fn clean_amount_is_idempotent(raw in "(Rp)?[0-9]{1,3}(\\.[0-9]{3}){0,4}(,[0-9]{2})?") {
            let once = clean_amount(&raw);
            prop_assert_eq!(clean_amount(&once), once.clone());
        }

        #[test]
        fn clean_amount_leaves_plain_integers(n in 0u64..10_000_000_000) {
            let s = n.to_string();
            prop_assert_eq!(clean_amount(&s), s);
        }

        #[test]
        fn fraction_scale_is_raw_over_hundred(whole in 0u32..100, frac in 0u32..100) {
            let raw = clean_percentage(&format!("{whole},{frac:02}%")).unwrap();
            prop_assert_eq!(PercentScale::Fraction.apply(raw) * Decimal::ONE_HUNDRED, PercentScale::Raw.apply(raw));
        }
    }
}
