//! # cellcalc-formula
//!
//! Formula engine for cellcalc.
//!
//! This crate provides:
//! - Formula tokenizing and parsing (text → AST)
//! - Cell resolution with memoization and cycle detection (AST → value)
//! - Built-in aggregate functions (`SUM`, `AVERAGE`, `MIN`, `MAX`, `COUNT`)
//! - Locale-aware display formatting of evaluated values
//!
//! ## Example
//!
//! ```rust
//! use cellcalc_core::{Cell, Sheet};
//! use cellcalc_formula::{display, resolve, DisplayOptions, EvaluationSession};
//!
//! let sheet = Sheet::from_rows(vec![vec![Cell::from("=5/0")]]);
//! let mut session = EvaluationSession::new();
//! let value = resolve(&sheet, 0, 0, &mut session);
//! assert_eq!(display(&value, sheet.cell_format(0, 0), &DisplayOptions::default()), "#DIV/0");
//! ```

pub mod ast;
pub mod display;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod locale;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use display::{display, DisplayOptions};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{
    evaluate, evaluate_formula, function_registry, resolve, EvaluationContext, EvaluationSession,
    FormulaValue, SessionStats,
};
pub use lexer::{tokenize, Token};
pub use locale::Locale;
pub use parser::{parse, parse_formula};
