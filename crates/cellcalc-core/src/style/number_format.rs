//! Display format kinds

/// How a cell's evaluated value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FormatType {
    /// Render by value type (default)
    #[default]
    Auto,
    /// Fixed two fraction digits with grouping
    Number,
    /// Multiplied by 100 with a `%` suffix
    Percent,
    /// Currency symbol or code, two fraction digits
    Currency,
    /// Millisecond timestamps and date strings rendered as dates
    Date,
}

impl FormatType {
    /// Check if this is the default kind
    pub fn is_auto(&self) -> bool {
        *self == FormatType::Auto
    }
}
