//! Cell value types

use crate::style::FormatSpec;
use std::fmt;

/// A literal value stored in a cell
///
/// A text scalar whose first non-space character is `=` is a formula.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Scalar {
    /// Numeric value
    Number(f64),
    /// Text value (plain text or formula source)
    Text(String),
    /// Boolean value
    Bool(bool),
}

/// The empty scalar returned for cells that are not materialized
pub(crate) static EMPTY_SCALAR: Scalar = Scalar::Text(String::new());

impl Scalar {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Scalar::Text(s.into())
    }

    /// Get the formula body (text after the leading `=`) if this is a formula
    ///
    /// ```
    /// use cellcalc_core::Scalar;
    ///
    /// assert_eq!(Scalar::text("  =A1+1").formula_body(), Some("A1+1"));
    /// assert_eq!(Scalar::text("A1+1").formula_body(), None);
    /// assert_eq!(Scalar::Number(1.0).formula_body(), None);
    /// ```
    pub fn formula_body(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => s.trim().strip_prefix('='),
            _ => None,
        }
    }

    /// Check if this is a formula
    pub fn is_formula(&self) -> bool {
        self.formula_body().is_some()
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Text(String::new())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Number(n as f64)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n as f64)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::text(s)
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

/// A cell as stored in a sheet row
///
/// Only structured cells carry a [`FormatSpec`]; a bare cell behaves exactly like a
/// structured cell with an empty format.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Cell {
    /// Value with formatting metadata
    Structured {
        value: Scalar,
        #[cfg_attr(feature = "serde", serde(default))]
        format: FormatSpec,
    },
    /// Plain value
    Bare(Scalar),
}

/// Borrowed `{value, format}` view of a cell, whatever its storage shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellParts<'a> {
    pub value: &'a Scalar,
    pub format: &'a FormatSpec,
}

impl Cell {
    /// Create an empty cell
    pub fn empty() -> Self {
        Cell::Bare(Scalar::default())
    }

    /// Create a cell with formatting, normalized
    pub fn with_format<V: Into<Scalar>>(value: V, format: FormatSpec) -> Self {
        Cell::Structured {
            value: value.into(),
            format,
        }
        .normalize()
    }

    /// The cell's `{value, format}` view
    pub fn parts(&self) -> CellParts<'_> {
        match self {
            Cell::Structured { value, format } => CellParts { value, format },
            Cell::Bare(value) => CellParts {
                value,
                format: FormatSpec::empty_ref(),
            },
        }
    }

    /// The literal value
    pub fn value(&self) -> &Scalar {
        self.parts().value
    }

    /// The format metadata (empty for bare cells)
    pub fn format(&self) -> &FormatSpec {
        self.parts().format
    }

    /// Replace the value, keeping any format
    pub fn set_value(&mut self, new_value: Scalar) {
        match self {
            Cell::Structured { value, .. } => *value = new_value,
            Cell::Bare(value) => *value = new_value,
        }
    }

    /// Replace the format, dropping to the bare representation when it is empty
    pub fn set_format(&mut self, new_format: FormatSpec) {
        let value = std::mem::take(self).into_value();
        *self = Cell::with_format(value, new_format);
    }

    /// Consume the cell, returning its value
    pub fn into_value(self) -> Scalar {
        match self {
            Cell::Structured { value, .. } => value,
            Cell::Bare(value) => value,
        }
    }

    /// Drop empty formats to the bare representation
    ///
    /// Idempotent: normalizing an already-normalized cell returns it unchanged.
    pub fn normalize(self) -> Self {
        match self {
            Cell::Structured { value, format } => match format.normalize() {
                Some(format) => Cell::Structured { value, format },
                None => Cell::Bare(value),
            },
            bare => bare,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::empty()
    }
}

impl From<Scalar> for Cell {
    fn from(value: Scalar) -> Self {
        Cell::Bare(value)
    }
}

macro_rules! impl_cell_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Cell {
                fn from(value: $ty) -> Self {
                    Cell::Bare(value.into())
                }
            }
        )*
    };
}

impl_cell_from!(bool, i32, i64, f64, &str, String);

/// Evaluation error codes
///
/// Errors are data: they flow through evaluation as values and render as their code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #CYCLE - A reference chain revisits a cell still being resolved
    Cycle,
    /// #REF - A reference does not decode into valid coordinates
    Ref,
    /// #DIV/0 - Division by a value that coerces to zero
    Div0,
    /// #ERR - Catch-all: malformed formula, unknown function, range in scalar context
    Value,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Cycle => "#CYCLE",
            CellError::Ref => "#REF",
            CellError::Div0 => "#DIV/0",
            CellError::Value => "#ERR",
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
