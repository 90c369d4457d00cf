//! # cellcalc-core
//!
//! Core data structures for the cellcalc evaluation engine.
//!
//! This crate provides the sheet model the evaluator reads from:
//! - [`Scalar`] and [`Cell`] - Cell contents (bare values or `{value, format}` pairs)
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and ranges
//! - [`FormatSpec`] - Cell formatting metadata
//! - [`Sheet`] - A grid of ragged rows
//!
//! ## Example
//!
//! ```rust
//! use cellcalc_core::{Cell, FormatSpec, FormatType, Scalar, Sheet};
//!
//! let mut sheet = Sheet::new();
//!
//! // Using string addresses
//! sheet.set_value_at("A1", 10).unwrap();
//! sheet.set_value_at("B1", "=A1*2").unwrap();
//!
//! // Or using row/column indices (0-based)
//! sheet.set_cell(1, 0, Cell::with_format(0.25, FormatSpec::new().kind(FormatType::Percent)));
//!
//! assert_eq!(sheet.raw_cell(0, 1), &Scalar::text("=A1*2"));
//! assert_eq!(sheet.cell_format(1, 0).kind, FormatType::Percent);
//! ```

pub mod cell;
pub mod error;
pub mod sheet;
pub mod style;

// Re-exports for convenience
pub use cell::{Cell, CellAddress, CellError, CellParts, CellRange, Scalar};
pub use error::{Error, Result};
pub use sheet::{Sheet, DEFAULT_COLUMN_COUNT};

pub use style::{FormatSpec, FormatType, HorizontalAlignment, Tone};
