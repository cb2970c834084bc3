//! Value formatter - display strings by semantic column type

use super::column::ColumnType;
use super::value::CellValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Number, currency and date conventions for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatLocale {
    pub currency_symbol: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
    /// chrono strftime pattern
    pub date_format: String,
}

impl Default for FormatLocale {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            date_format: "%-m/%-d/%Y".to_string(),
        }
    }
}

/// Placeholder for null values
pub const NULL_DISPLAY: &str = "-";

/// Format a value for display. Pure; never fails.
///
/// A `Text` column defers to the value's own tag, so a tagged currency value
/// still renders as currency. Values that do not fit the column type (text in
/// a number column, for instance) render as their raw text.
pub fn format_value(value: &CellValue, column_type: ColumnType, locale: &FormatLocale) -> String {
    let raw = || value.raw_text().unwrap_or_default();

    match (column_type, value) {
        (_, CellValue::Null) => NULL_DISPLAY.to_string(),

        (ColumnType::Currency, v) => v.as_f64().map_or_else(raw, |n| format_currency(n, locale)),
        (ColumnType::Percentage, v) => v.as_f64().map_or_else(raw, format_percentage),
        (ColumnType::Number, v) => v.as_f64().map_or_else(raw, |n| format_number(n, locale)),

        (ColumnType::Date, CellValue::Date(d)) => format_date(*d, locale),
        (ColumnType::Date, CellValue::Text(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(|d| format_date(d, locale))
            .unwrap_or_else(|_| s.clone()),
        (ColumnType::Date, _) => raw(),

        (ColumnType::Text, CellValue::Currency(n)) => format_currency(*n, locale),
        (ColumnType::Text, CellValue::Percentage(n)) => format_percentage(*n),
        (ColumnType::Text, CellValue::Date(d)) => format_date(*d, locale),
        (ColumnType::Text, _) => raw(),
    }
}

/// Grouped, two decimals, symbol after the sign: `-$1,234.50`
pub fn format_currency(value: f64, locale: &FormatLocale) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && !is_zero_digits(&fixed) { "-" } else { "" };

    format!(
        "{}{}{}{}{}",
        sign,
        locale.currency_symbol,
        group_digits(int_part, &locale.thousands_separator),
        locale.decimal_separator,
        frac_part
    )
}

/// Fraction to percent with two decimals: `0.15` -> `15.00%`
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Grouped, at most three decimals, trailing zeros dropped: `1234.5` -> `1,234.5`
pub fn format_number(value: f64, locale: &FormatLocale) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && !is_zero_digits(&fixed) { "-" } else { "" };

    let mut out = format!(
        "{}{}",
        sign,
        group_digits(int_part, &locale.thousands_separator)
    );
    if !frac_part.is_empty() {
        out.push_str(&locale.decimal_separator);
        out.push_str(frac_part);
    }
    out
}

/// Calendar date without time; an invalid pattern falls back to ISO
pub fn format_date(date: NaiveDate, locale: &FormatLocale) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(&locale.date_format)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

/// Insert `separator` between groups of three digits
fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

fn is_zero_digits(fixed: &str) -> bool {
    fixed.chars().all(|c| c == '0' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> FormatLocale {
        FormatLocale::default()
    }

    #[test]
    fn test_null_is_dash_for_every_type() {
        for column_type in [
            ColumnType::Text,
            ColumnType::Number,
            ColumnType::Currency,
            ColumnType::Percentage,
            ColumnType::Date,
        ] {
            assert_eq!(format_value(&CellValue::Null, column_type, &en()), "-");
        }
    }

    #[test]
    fn test_percentage() {
        assert_eq!(
            format_value(&CellValue::Number(0.15), ColumnType::Percentage, &en()),
            "15.00%"
        );
        assert_eq!(format_percentage(0.2834), "28.34%");
        assert_eq!(format_percentage(-0.05), "-5.00%");
    }

    #[test]
    fn test_number_grouping() {
        assert_eq!(
            format_value(&CellValue::Number(1234.0), ColumnType::Number, &en()),
            "1,234"
        );
        assert_eq!(format_number(2.3, &en()), "2.3");
        assert_eq!(format_number(1234567.891, &en()), "1,234,567.891");
        assert_eq!(format_number(1234.56789, &en()), "1,234.568");
        assert_eq!(format_number(-1000.0, &en()), "-1,000");
        assert_eq!(format_number(-0.0001, &en()), "0");
        assert_eq!(format_number(999.0, &en()), "999");
    }

    #[test]
    fn test_currency() {
        assert_eq!(
            format_value(&CellValue::Number(4500000.0), ColumnType::Currency, &en()),
            "$4,500,000.00"
        );
        assert_eq!(format_currency(12.5, &en()), "$12.50");
        assert_eq!(format_currency(-1234.5, &en()), "-$1,234.50");
        assert_eq!(format_currency(0.004, &en()), "$0.00");
    }

    #[test]
    fn test_custom_locale() {
        let eu = FormatLocale {
            currency_symbol: "€".to_string(),
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            date_format: "%d.%m.%Y".to_string(),
        };
        assert_eq!(format_currency(1234.5, &eu), "€1.234,50");
        assert_eq!(format_number(1234.0, &eu), "1.234");
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(format_date(date, &eu), "01.06.2024");
    }

    #[test]
    fn test_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            format_value(&CellValue::Date(date), ColumnType::Date, &en()),
            "6/1/2024"
        );
        assert_eq!(
            format_value(&CellValue::text("2024-06-15"), ColumnType::Date, &en()),
            "6/15/2024"
        );
        assert_eq!(
            format_value(&CellValue::text("next week"), ColumnType::Date, &en()),
            "next week"
        );
    }

    #[test]
    fn test_invalid_date_pattern_falls_back() {
        let broken = FormatLocale {
            date_format: "%Q".to_string(),
            ..FormatLocale::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(format_date(date, &broken), "2024-06-01");
    }

    #[test]
    fn test_text_column_uses_value_tag() {
        assert_eq!(
            format_value(&CellValue::Currency(8.49), ColumnType::Text, &en()),
            "$8.49"
        );
        assert_eq!(
            format_value(&CellValue::Number(4500000.0), ColumnType::Text, &en()),
            "4500000"
        );
        assert_eq!(
            format_value(&CellValue::text("On Track"), ColumnType::Text, &en()),
            "On Track"
        );
    }

    #[test]
    fn test_mismatched_value_degrades_to_text() {
        assert_eq!(
            format_value(&CellValue::text("$12.5M"), ColumnType::Currency, &en()),
            "$12.5M"
        );
        assert_eq!(
            format_value(&CellValue::text("+15%"), ColumnType::Percentage, &en()),
            "+15%"
        );
    }

    #[test]
    fn test_formatting_does_not_mutate() {
        let value = CellValue::Number(0.15);
        let before = value.clone();
        let _ = format_value(&value, ColumnType::Percentage, &en());
        assert_eq!(value, before);
    }
}
