//! # cellcalc
//!
//! A spreadsheet cell evaluation engine.
//!
//! cellcalc turns the raw contents of a sheet (numbers, text, booleans and
//! `=`-prefixed formulas) into display strings.
//!
//! ## Features
//!
//! - Ragged sheet model with bare or `{value, format}` cells
//! - Formula tokenizing and recursive-descent parsing
//! - Cell resolution with a memoized session cache and cycle detection
//! - `SUM`, `AVERAGE`, `MIN`, `MAX` and `COUNT` over ranges
//! - Locale-aware number, percent, currency and date display
//! - Optional `serde` support for the `{value, format}` storage shape
//!
//! ## Example
//!
//! ```rust
//! use cellcalc::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_value_at("A1", 5).unwrap();
//! sheet.set_value_at("B1", "=A1+1").unwrap();
//! sheet.set_value_at("C1", "=A1+B1").unwrap();
//! sheet.set_format(0, 2, FormatSpec::new().currency("EUR"));
//!
//! assert_eq!(resolve_display_value(&sheet, 0, 2, &RenderOptions::default()), "€11.00");
//! assert_eq!(raw_cell_text(&sheet, 0, 2), "=A1+B1");
//! assert_eq!(column_label(2), "C");
//! ```

pub mod prelude;
pub mod render;

// Re-export rendering types
pub use render::{
    column_label, parse_cell_ref, raw_cell_text, render_grid, resolve_display_value,
    resolve_display_value_in, RenderOptions, SheetRenderExt, SheetRenderer,
};

// Re-export core types
pub use cellcalc_core::{
    Cell, CellAddress, CellError, CellParts, CellRange, Error, FormatSpec, FormatType,
    HorizontalAlignment, Result, Scalar, Sheet, Tone, DEFAULT_COLUMN_COUNT,
};

// Re-export formula types
pub use cellcalc_formula::{
    display, evaluate, evaluate_formula, function_registry, parse, parse_formula, resolve,
    tokenize, BinaryOperator, DisplayOptions, EvaluationContext, EvaluationSession, FormulaError,
    FormulaExpr, FormulaResult, FormulaValue, Locale, SessionStats, Token, UnaryOperator,
};
