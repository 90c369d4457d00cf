//! Locale-specific number, currency and date rendering

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Order of the day, month and year fields in a rendered date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    MonthDayYear,
    DayMonthYear,
    YearMonthDay,
}

/// Where the currency symbol goes relative to the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyPosition {
    /// `$1.00`
    Prefix,
    /// `1,00 €` (separated by a no-break space)
    Suffix,
}

/// A locale definition used for rendering display values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    /// BCP 47 tag (e.g. `en-US`)
    pub tag: &'static str,
    /// Decimal separator (e.g. `.` in `en-US`, `,` in `de-DE`)
    pub decimal_sep: char,
    /// Thousands separator (e.g. `,` in `en-US`, `.` in `de-DE`)
    pub thousands_sep: char,
    pub date_order: DateOrder,
    pub date_sep: char,
    /// Zero-pad day and month to two digits
    pub pad_date_fields: bool,
    pub currency_position: CurrencyPosition,
    /// Put a no-break space between a percentage and its `%` sign
    pub space_before_percent: bool,
}

const NBSP: char = '\u{00A0}';

impl Locale {
    pub const fn en_us() -> Self {
        Self {
            tag: "en-US",
            decimal_sep: '.',
            thousands_sep: ',',
            date_order: DateOrder::MonthDayYear,
            date_sep: '/',
            pad_date_fields: false,
            currency_position: CurrencyPosition::Prefix,
            space_before_percent: false,
        }
    }

    pub const fn en_gb() -> Self {
        Self {
            tag: "en-GB",
            decimal_sep: '.',
            thousands_sep: ',',
            date_order: DateOrder::DayMonthYear,
            date_sep: '/',
            pad_date_fields: true,
            currency_position: CurrencyPosition::Prefix,
            space_before_percent: false,
        }
    }

    pub const fn de_de() -> Self {
        Self {
            tag: "de-DE",
            decimal_sep: ',',
            thousands_sep: '.',
            date_order: DateOrder::DayMonthYear,
            date_sep: '.',
            pad_date_fields: false,
            currency_position: CurrencyPosition::Suffix,
            space_before_percent: true,
        }
    }

    pub const fn fr_fr() -> Self {
        Self {
            tag: "fr-FR",
            decimal_sep: ',',
            thousands_sep: '\u{202F}',
            date_order: DateOrder::DayMonthYear,
            date_sep: '/',
            pad_date_fields: true,
            currency_position: CurrencyPosition::Suffix,
            space_before_percent: true,
        }
    }

    /// Every built-in locale
    pub const ALL: [Locale; 4] = [
        Locale::en_us(),
        Locale::en_gb(),
        Locale::de_de(),
        Locale::fr_fr(),
    ];

    /// Look up a built-in locale by tag
    ///
    /// Matching ignores case and accepts `_` for `-`. A bare language (`de`) picks
    /// that language's first built-in locale.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|locale| locale.tag.eq_ignore_ascii_case(&tag))
            .or_else(|| {
                Self::ALL.into_iter().find(|locale| {
                    locale
                        .tag
                        .split('-')
                        .next()
                        .map_or(false, |lang| lang.eq_ignore_ascii_case(&tag))
                })
            })
    }

    /// Render a number with grouping and between `min_frac` and `max_frac`
    /// fraction digits
    ///
    /// Rounds half away from zero. Negative zero renders without a sign.
    pub fn format_number(&self, value: f64, min_frac: usize, max_frac: usize) -> String {
        let rounded = round_to(value, max_frac);
        let digits = format!("{:.*}", max_frac, rounded.abs());
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (digits.as_str(), ""),
        };

        let mut frac_part = frac_part.trim_end_matches('0').to_string();
        while frac_part.len() < min_frac {
            frac_part.push('0');
        }

        let mut out = String::new();
        if rounded < 0.0 {
            out.push('-');
        }
        out.push_str(&group_thousands(int_part, self.thousands_sep));
        if !frac_part.is_empty() {
            out.push(self.decimal_sep);
            out.push_str(&frac_part);
        }
        out
    }

    /// Render a currency amount
    ///
    /// Uses the currency's symbol when one is known and the upper-cased code
    /// otherwise.
    pub fn format_currency(&self, value: f64, code: &str) -> String {
        let code = code.trim().to_ascii_uppercase();
        let digits = currency_digits(&code);
        let amount = self.format_number(value.abs(), digits, digits);
        let negative = round_to(value, digits) < 0.0;
        let symbol = currency_symbol(&code).map(str::to_string);

        let body = match (self.currency_position, symbol) {
            (CurrencyPosition::Prefix, Some(symbol)) => format!("{}{}", symbol, amount),
            (CurrencyPosition::Prefix, None) => format!("{}{}{}", code, NBSP, amount),
            (CurrencyPosition::Suffix, symbol) => {
                format!("{}{}{}", amount, NBSP, symbol.unwrap_or(code))
            }
        };

        if negative {
            format!("-{}", body)
        } else {
            body
        }
    }

    /// Render a fraction as a percentage with up to two fraction digits
    ///
    /// Returns `None` when the scaled value is not finite.
    pub fn format_percent(&self, value: f64) -> Option<String> {
        let scaled = value * 100.0;
        if !scaled.is_finite() {
            return None;
        }
        let number = self.format_number(scaled, 0, 2);
        Some(if self.space_before_percent {
            format!("{}{}%", number, NBSP)
        } else {
            format!("{}%", number)
        })
    }

    /// Render a calendar date
    pub fn format_date(&self, date: NaiveDate) -> String {
        let (day, month) = if self.pad_date_fields {
            (format!("{:02}", date.day()), format!("{:02}", date.month()))
        } else {
            (date.day().to_string(), date.month().to_string())
        };
        let year = date.year().to_string();

        let fields = match self.date_order {
            DateOrder::MonthDayYear => [month, day, year],
            DateOrder::DayMonthYear => [day, month, year],
            DateOrder::YearMonthDay => [year, month, day],
        };
        let sep = self.date_sep.to_string();
        fields.join(sep.as_str())
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_us()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag)
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| {
            let known: Vec<_> = Self::ALL.iter().map(|l| l.tag).collect();
            format!("unknown locale '{}' (known: {})", s, known.join(", "))
        })
    }
}

/// Symbol for an ISO 4217 code, when it has a well-known one
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "KRW" => Some("₩"),
        "INR" => Some("₹"),
        _ => None,
    }
}

/// Minor-unit digits for an ISO 4217 code
pub fn currency_digits(code: &str) -> usize {
    match code {
        "JPY" | "KRW" => 0,
        _ => 2,
    }
}

fn round_to(value: f64, decimals: usize) -> f64 {
    if decimals == 0 {
        return value.round();
    }
    let factor = 10_f64.powi(decimals as i32);
    let scaled = value * factor;
    // Magnitudes this large carry no fraction digits to round.
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

fn group_thousands(int_part: &str, sep: char) -> String {
    let mut out = String::new();
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        let pos_from_end = len - i;
        out.push(ch);
        if pos_from_end > 1 && pos_from_end % 3 == 1 {
            out.push(sep);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1", ','), "1");
        assert_eq!(group_thousands("123", ','), "123");
        assert_eq!(group_thousands("1234", ','), "1,234");
        assert_eq!(group_thousands("1234567", '.'), "1.234.567");
    }

    #[test]
    fn test_format_number() {
        let en = Locale::en_us();
        assert_eq!(en.format_number(1234.5, 0, 3), "1,234.5");
        assert_eq!(en.format_number(0.1 + 0.2, 0, 3), "0.3");
        assert_eq!(en.format_number(2.0 / 3.0, 0, 3), "0.667");
        assert_eq!(en.format_number(-1234567.0, 0, 3), "-1,234,567");
        assert_eq!(en.format_number(5.0, 2, 2), "5.00");
        assert_eq!(en.format_number(-0.0001, 0, 3), "0");
        assert_eq!(en.format_number(0.5, 0, 0), "1");

        let de = Locale::de_de();
        assert_eq!(de.format_number(1234.5, 2, 2), "1.234,50");
    }

    #[test]
    fn test_format_currency() {
        let en = Locale::en_us();
        assert_eq!(en.format_currency(1234.5, "USD"), "$1,234.50");
        assert_eq!(en.format_currency(-3.0, "eur"), "-€3.00");
        assert_eq!(en.format_currency(1234.5, "JPY"), "¥1,235");
        assert_eq!(en.format_currency(10.0, "CHF"), "CHF\u{a0}10.00");
        assert_eq!(en.format_currency(-0.001, "USD"), "$0.00");

        let de = Locale::de_de();
        assert_eq!(de.format_currency(1234.5, "EUR"), "1.234,50\u{a0}€");
        assert_eq!(de.format_currency(7.0, "CHF"), "7,00\u{a0}CHF");
    }

    #[test]
    fn test_format_percent() {
        let en = Locale::en_us();
        assert_eq!(en.format_percent(0.125).as_deref(), Some("12.5%"));
        assert_eq!(en.format_percent(1.0).as_deref(), Some("100%"));
        assert_eq!(en.format_percent(0.123456).as_deref(), Some("12.35%"));
        assert_eq!(Locale::de_de().format_percent(0.5).as_deref(), Some("50\u{a0}%"));
        assert_eq!(en.format_percent(1e307), None);
    }

    #[test]
    fn test_format_large_magnitudes() {
        let en = Locale::en_us();
        let text = en.format_number(1e306, 0, 3);
        assert!(text.chars().all(|c| c.is_ascii_digit() || c == ','));
        assert!(text.chars().filter(char::is_ascii_digit).count() >= 306);

        let negative = en.format_number(-1e306, 2, 2);
        assert!(negative.starts_with('-'));
        assert!(negative.ends_with(".00"));
        assert!(!negative.contains("inf"));

        let amount = en.format_currency(1e307, "USD");
        assert!(amount.starts_with('$'));
        assert!(!amount.contains("inf"));
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(Locale::en_us().format_date(date), "3/7/2024");
        assert_eq!(Locale::en_gb().format_date(date), "07/03/2024");
        assert_eq!(Locale::de_de().format_date(date), "7.3.2024");
        assert_eq!(Locale::fr_fr().format_date(date), "07/03/2024");
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(Locale::from_tag("de-DE"), Some(Locale::de_de()));
        assert_eq!(Locale::from_tag("en_gb"), Some(Locale::en_gb()));
        assert_eq!(Locale::from_tag("fr"), Some(Locale::fr_fr()));
        assert_eq!(Locale::from_tag("EN"), Some(Locale::en_us()));
        assert_eq!(Locale::from_tag("xx-YY"), None);
        assert!("pt-BR".parse::<Locale>().is_err());
    }
}
