use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Month names as they come out of the text layer when the report font
/// interleaves glyphs, mapped to the Indonesian month they stand for.
const GARBLED_MONTHS: &[(&str, &str)] = &[
    ("amgoursttiusas", "Agustus"),
    ("nmoovretimsabsier", "November"),
    ("jmuloi", "Juli"),
    ("smepotretimsabsier", "September"),
    ("omkotortbisears", "Oktober"),
    ("mmeoi", "Mei"),
    ("jmanourtaisrai", "Januari"),
    ("meborrutiasaris", "Februari"),
    ("amporilr", "April"),
    ("mmaorerttis", "Maret"),
    ("dmeosertmisabseir", "Desember"),
    ("jmunoi", "Juni"),
];

/// Indonesian month names in calendar order.
const MONTHS_ID: [&str; 12] = [
    "januari",
    "februari",
    "maret",
    "april",
    "mei",
    "juni",
    "juli",
    "agustus",
    "september",
    "oktober",
    "november",
    "desember",
];

const MONTHS_EN: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// A whole alphabetic run containing a garbled month.
static GARBLED_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = GARBLED_MONTHS
        .iter()
        .map(|(garbled, _)| regex::escape(garbled))
        .collect();
    Regex::new(&format!(r"(?i)\p{{L}}*(?:{})\p{{L}}*", alternatives.join("|")))
        .expect("garbled month pattern is valid")
});

static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s/\-]+").expect("separator pattern is valid")
});

/// Formats tried before any repair.
const DIRECT_FORMATS: &[&str] = &["%d %B %Y", "%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Replace every garbled month run with its canonical Indonesian name.
pub fn repair_month_tokens(raw: &str) -> String {
    GARBLED_RE
        .replace_all(raw, |caps: &regex::Captures| {
            let run = caps[0].to_lowercase();
            GARBLED_MONTHS
                .iter()
                .find(|(garbled, _)| run.contains(garbled))
                .map(|(_, month)| month.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Parse a date cell from a report.
///
/// Accepts `15 Agustus 2021`, `15 August 2021`, `15/08/2021`, `2021-08-15`,
/// garbled month names and two-digit years (below 50 is 20xx). Anything that
/// does not resolve to a real calendar date is `None`.
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }

    if let Some(d) = DIRECT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        // %Y happily reads "21" as year 21
        .filter(|d| d.year() >= 1000)
    {
        return Some(d);
    }

    let repaired = repair_month_tokens(s);
    let parts: Vec<&str> = SEPARATOR_RE
        .split(repaired.trim())
        .filter(|p| !p.is_empty())
        .collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };

    let day: u32 = digits(day)?.parse().ok()?;
    let month = month_number(month)?;
    let year = expand_year(&digits(year)?)?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn digits(s: &str) -> Option<String> {
    let d: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    if d.is_empty() {
        None
    } else {
        Some(d)
    }
}

fn expand_year(digits: &str) -> Option<i32> {
    let y: i32 = digits.parse().ok()?;
    match digits.len() {
        1 | 2 if y < 50 => Some(2000 + y),
        1 | 2 => Some(1900 + y),
        _ => Some(y),
    }
}

fn month_number(token: &str) -> Option<u32> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        return token.parse().ok().filter(|m| (1..=12).contains(m));
    }
    let lower = token.to_lowercase();
    MONTHS_ID
        .iter()
        .position(|m| *m == lower)
        .or_else(|| MONTHS_EN.iter().position(|m| *m == lower))
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_indonesian_month() {
        assert_eq!(parse_report_date("15 Agustus 2021"), Some(ymd(2021, 8, 15)));
        assert_eq!(parse_report_date("1 Mei 2020"), Some(ymd(2020, 5, 1)));
    }

    #[test]
    fn test_garbled_month_matches_clean_form() {
        assert_eq!(
            parse_report_date("15 amgoursttiusas 2021"),
            parse_report_date("15 Agustus 2021")
        );
        assert_eq!(parse_report_date("03 jmunoi 2019"), Some(ymd(2019, 6, 3)));
    }

    #[test]
    fn test_garbled_run_with_noise_letters() {
        assert_eq!(repair_month_tokens("7 xxmmeoiyy 2022"), "7 Mei 2022");
    }

    #[test]
    fn test_numeric_formats() {
        assert_eq!(parse_report_date("15/08/2021"), Some(ymd(2021, 8, 15)));
        assert_eq!(parse_report_date("2021-08-15"), Some(ymd(2021, 8, 15)));
        assert_eq!(parse_report_date("15/08/21"), Some(ymd(2021, 8, 15)));
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(parse_report_date("1 Januari 05"), Some(ymd(2005, 1, 1)));
        assert_eq!(parse_report_date("1 Januari 85"), Some(ymd(1985, 1, 1)));
    }

    #[test]
    fn test_single_digit_day_and_stray_punctuation() {
        assert_eq!(parse_report_date("5. Maret 2023,"), Some(ymd(2023, 3, 5)));
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(parse_report_date(""), None);
        assert_eq!(parse_report_date("-"), None);
        assert_eq!(parse_report_date("Agustus 2021"), None);
        assert_eq!(parse_report_date("31 Februari 2021"), None);
        assert_eq!(parse_report_date("15 Bulan 2021"), None);
    }

    proptest! {
        #[test]
        fn indonesian_dates_round_trip(y in 1950i32..2049, m in 1u32..=12, d in 1u32..=28) {
            let name = MONTHS_ID[(m - 1) as usize];
            let text = format!("{d} {name} {y}");
            prop_assert_eq!(parse_report_date(&text), NaiveDate::from_ymd_opt(y, m, d));
        }

        #[test]
        fn garbled_dates_equal_clean_dates(i in 0usize..12, y in 2000i32..2040, d in 1u32..=28) {
            let (garbled, month) = GARBLED_MONTHS[i];
            prop_assert_eq!(
                parse_report_date(&format!("{d} {garbled} {y}")),
                parse_report_date(&format!("{d} {month} {y}"))
            );
        }
    }
}
