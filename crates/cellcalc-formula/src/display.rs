//! Display formatting of evaluated values
//!
//! The format always comes from the cell being displayed, never from the cells
//! its formula references.

use crate::evaluator::FormulaValue;
use crate::locale::Locale;
use cellcalc_core::{CellError, FormatSpec, FormatType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Options for rendering display strings
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    /// Locale for separators, dates and currency placement
    pub locale: Locale,
    /// ISO 4217 code used when a currency format names none
    pub default_currency: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            locale: Locale::en_us(),
            default_currency: "USD".to_string(),
        }
    }
}

impl DisplayOptions {
    /// Create default options (`en-US`, `USD`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the locale
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set the default currency code
    pub fn with_default_currency<S: Into<String>>(mut self, code: S) -> Self {
        self.default_currency = code.into();
        self
    }
}

/// Render an evaluated value for display
///
/// Errors always render as their code. Values a format cannot interpret fall
/// back to the `auto` rendering.
///
/// # Example
/// ```rust
/// use cellcalc_core::{FormatSpec, FormatType};
/// use cellcalc_formula::{display, DisplayOptions, FormulaValue};
///
/// let options = DisplayOptions::default();
/// let percent = FormatSpec::new().kind(FormatType::Percent);
/// assert_eq!(display(&FormulaValue::Number(0.25), &percent, &options), "25%");
/// assert_eq!(display(&FormulaValue::Number(1234.5), &FormatSpec::new(), &options), "1,234.5");
/// ```
pub fn display(value: &FormulaValue, format: &FormatSpec, options: &DisplayOptions) -> String {
    let locale = &options.locale;
    let auto = || display_auto(value, locale);

    match format.kind {
        FormatType::Auto => auto(),
        FormatType::Date => date_value(value)
            .map(|date| locale.format_date(date))
            .unwrap_or_else(auto),
        FormatType::Number => numeric_value(value)
            .map(|n| locale.format_number(n, 2, 2))
            .unwrap_or_else(auto),
        FormatType::Percent => numeric_value(value)
            .and_then(|n| locale.format_percent(n))
            .unwrap_or_else(auto),
        FormatType::Currency => {
            let code = format
                .currency
                .as_deref()
                .filter(|code| !code.trim().is_empty())
                .unwrap_or(&options.default_currency);
            numeric_value(value)
                .map(|n| locale.format_currency(n, code))
                .unwrap_or_else(auto)
        }
    }
}

fn display_auto(value: &FormulaValue, locale: &Locale) -> String {
    match value {
        FormulaValue::Number(n) if n.is_finite() => locale.format_number(*n, 0, 3),
        FormulaValue::Number(_) | FormulaValue::Array(_) => CellError::Value.to_string(),
        FormulaValue::String(s) => s.clone(),
        FormulaValue::Boolean(true) => "TRUE".to_string(),
        FormulaValue::Boolean(false) => "FALSE".to_string(),
        FormulaValue::Error(e) => e.to_string(),
    }
}

/// Finite number for the numeric formats, accepting a decimal comma in text
fn numeric_value(value: &FormulaValue) -> Option<f64> {
    let number = match value {
        FormulaValue::Number(n) => Some(*n),
        FormulaValue::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>()
                .ok()
                .or_else(|| s.replace(',', ".").parse::<f64>().ok())
        }
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn date_value(value: &FormulaValue) -> Option<NaiveDate> {
    match value {
        FormulaValue::Number(ms) => timestamp_date(*ms),
        FormulaValue::String(s) => parse_date_text(s),
        _ => None,
    }
}

/// Calendar date (UTC) of a millisecond Unix timestamp
pub fn timestamp_date(ms: f64) -> Option<NaiveDate> {
    if !ms.is_finite() || ms.abs() >= i64::MAX as f64 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(ms.trunc() as i64).map(|dt| dt.date_naive())
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse date text
///
/// Accepts numeric text (millisecond timestamps), ISO-8601 dates and local
/// date-times, RFC 3339 timestamps (the date as written, ignoring the offset),
/// `m/d/yyyy` and `yyyy/m/d`.
///
/// ```rust
/// use cellcalc_formula::display::parse_date_text;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 3, 7);
/// assert_eq!(parse_date_text("2024-03-07"), expected);
/// assert_eq!(parse_date_text("3/7/2024"), expected);
/// assert_eq!(parse_date_text("2024-03-07T23:30:00-05:00"), expected);
/// assert_eq!(parse_date_text("soon"), None);
/// ```
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(ms) = text.parse::<f64>() {
        return timestamp_date(ms);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}
