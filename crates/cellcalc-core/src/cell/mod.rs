//! Cell-related types and utilities
//!
//! This module contains:
//! - [`Scalar`] - A literal value stored in a cell
//! - [`Cell`] - A bare scalar or a `{value, format}` pair
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")
//! - [`CellError`] - Evaluation error codes

mod address;
mod value;

pub use address::{CellAddress, CellRange, CellRangeIterator};
pub use value::{Cell, CellError, CellParts, Scalar};

pub(crate) use value::EMPTY_SCALAR;
