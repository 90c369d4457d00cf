//! Prelude module - common imports for cellcalc users
//!
//! ```rust
//! use cellcalc::prelude::*;
//! ```

pub use crate::{
    // Rendering
    column_label,
    parse_cell_ref,
    raw_cell_text,
    render_grid,
    resolve_display_value,
    RenderOptions,
    SheetRenderExt,
    SheetRenderer,

    // Sheet model
    Cell,
    CellAddress,
    CellError,
    CellRange,
    Scalar,
    Sheet,

    // Formatting
    DisplayOptions,
    FormatSpec,
    FormatType,
    HorizontalAlignment,
    Locale,
    Tone,

    // Evaluation
    resolve,
    EvaluationSession,
    FormulaValue,

    // Error types
    Error,
    Result,
};
