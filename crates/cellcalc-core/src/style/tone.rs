//! Presentation tones

/// Background tone of a cell
///
/// Purely presentational; the engine never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Tone {
    /// No tone (default)
    #[default]
    None,
    Amber,
    Sky,
    Emerald,
    Rose,
}

impl Tone {
    /// Check if no tone is set
    pub fn is_none(&self) -> bool {
        *self == Tone::None
    }
}
