//! Cell formatting types
//!
//! This module contains the formatting metadata a structured cell carries:
//! - [`FormatSpec`] - Complete cell format
//! - [`HorizontalAlignment`] - Text alignment
//! - [`Tone`] - Background tone
//! - [`FormatType`] - How the evaluated value is rendered

mod alignment;
mod number_format;
mod tone;

pub use alignment::HorizontalAlignment;
pub use number_format::FormatType;
pub use tone::Tone;

/// Complete cell format
///
/// Every field is optional. A spec with nothing enabled means "no format" and
/// cells carrying it normalize to the bare representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormatSpec {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "std::ops::Not::not"))]
    pub bold: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "std::ops::Not::not"))]
    pub italic: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "std::ops::Not::not"))]
    pub underline: bool,
    /// Horizontal alignment
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "HorizontalAlignment::is_default")
    )]
    pub align: HorizontalAlignment,
    /// Background tone
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Tone::is_none"))]
    pub tone: Tone,
    /// Display kind, stored under the `type` key
    #[cfg_attr(
        feature = "serde",
        serde(rename = "type", skip_serializing_if = "FormatType::is_auto")
    )]
    pub kind: FormatType,
    /// ISO 4217 currency code, only meaningful for [`FormatType::Currency`]
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub currency: Option<String>,
}

static EMPTY_FORMAT: FormatSpec = FormatSpec::EMPTY;

impl FormatSpec {
    /// The empty format
    pub const EMPTY: FormatSpec = FormatSpec {
        bold: false,
        italic: false,
        underline: false,
        align: HorizontalAlignment::Left,
        tone: Tone::None,
        kind: FormatType::Auto,
        currency: None,
    };

    /// Create a new empty format
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared reference to the empty format
    pub fn empty_ref() -> &'static FormatSpec {
        &EMPTY_FORMAT
    }

    /// Set bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set underline
    pub fn underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    /// Set horizontal alignment
    pub fn align(mut self, align: HorizontalAlignment) -> Self {
        self.align = align;
        self
    }

    /// Set tone
    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Set display kind
    pub fn kind(mut self, kind: FormatType) -> Self {
        self.kind = kind;
        self
    }

    /// Render as currency with the given ISO code
    pub fn currency<S: Into<String>>(mut self, code: S) -> Self {
        self.kind = FormatType::Currency;
        self.currency = Some(code.into());
        self
    }

    /// Check if nothing is enabled
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Normalize this format
    ///
    /// Currency codes are trimmed and upper-cased, and dropped unless the kind is
    /// currency. Returns `None` when nothing remains enabled. Idempotent.
    pub fn normalize(mut self) -> Option<FormatSpec> {
        self.currency = match self.kind {
            FormatType::Currency => self
                .currency
                .map(|code| code.trim().to_ascii_uppercase())
                .filter(|code| !code.is_empty()),
            _ => None,
        };

        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_is_empty() {
        assert!(FormatSpec::default().is_empty());
        assert!(FormatSpec::empty_ref().is_empty());
        assert_eq!(FormatSpec::default().normalize(), None);
    }

    #[test]
    fn test_builder() {
        let spec = FormatSpec::new()
            .bold(true)
            .align(HorizontalAlignment::Center)
            .tone(Tone::Sky);
        assert!(spec.bold);
        assert_eq!(spec.align, HorizontalAlignment::Center);
        assert!(!spec.is_empty());
    }

    #[test]
    fn test_currency_normalization() {
        let spec = FormatSpec::new().currency(" eur ").normalize().unwrap();
        assert_eq!(spec.currency.as_deref(), Some("EUR"));

        // Currency without the currency kind means nothing
        let spec = FormatSpec {
            currency: Some("EUR".into()),
            ..Default::default()
        };
        assert_eq!(spec.normalize(), None);

        let spec = FormatSpec::new().currency("  ").normalize().unwrap();
        assert_eq!(spec.kind, FormatType::Currency);
        assert_eq!(spec.currency, None);
    }

    fn arb_spec() -> impl Strategy<Value = FormatSpec> {
        (
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            prop::sample::select(vec![
                HorizontalAlignment::Left,
                HorizontalAlignment::Center,
                HorizontalAlignment::Right,
            ]),
            prop::sample::select(vec![Tone::None, Tone::Amber, Tone::Rose]),
            prop::sample::select(vec![
                FormatType::Auto,
                FormatType::Number,
                FormatType::Currency,
                FormatType::Date,
            ]),
            prop::option::of("[ a-zA-Z]{0,4}"),
        )
            .prop_map(|(bold, italic, underline, align, tone, kind, currency)| {
                FormatSpec {
                    bold,
                    italic,
                    underline,
                    align,
                    tone,
                    kind,
                    currency,
                }
            })
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(spec in arb_spec()) {
            let once = spec.normalize();
            let twice = once.clone().and_then(FormatSpec::normalize);
            prop_assert_eq!(once, twice);
        }
    }
}
