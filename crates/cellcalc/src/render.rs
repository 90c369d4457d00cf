//! Sheet rendering
//!
//! Turns raw sheet contents into display strings: every formula is resolved
//! through an [`EvaluationSession`] and rendered with the displayed cell's own
//! format.
//!
//! # Example
//!
//! ```rust
//! use cellcalc::prelude::*;
//!
//! let sheet = Sheet::from_delimited("10\t20\t=SUM(A1:B1)\n=5/0\t=A1+");
//!
//! let grid = render_grid(&sheet, &RenderOptions::default());
//! assert_eq!(grid[0][2], "30");
//! assert_eq!(grid[1][0], "#DIV/0");
//! assert_eq!(grid[1][1], "#ERR");
//! ```

use crate::{
    display, resolve, CellAddress, DisplayOptions, EvaluationSession, FormulaValue, SessionStats,
    Sheet, DEFAULT_COLUMN_COUNT,
};

/// Options for rendering sheets
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Column count used when the sheet has no materialized cells
    pub default_column_count: usize,
    /// Number, date and currency rendering
    pub display: DisplayOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            default_column_count: DEFAULT_COLUMN_COUNT,
            display: DisplayOptions::default(),
        }
    }
}

/// Display string of one cell, resolved with a fresh session
pub fn resolve_display_value(sheet: &Sheet, row: usize, col: usize, options: &RenderOptions) -> String {
    let mut session = EvaluationSession::new();
    resolve_display_value_in(sheet, row, col, options, &mut session)
}

/// Display string of one cell, reusing `session` for cached values
pub fn resolve_display_value_in(
    sheet: &Sheet,
    row: usize,
    col: usize,
    options: &RenderOptions,
    session: &mut EvaluationSession,
) -> String {
    let value = resolve(sheet, row, col, session);
    display(&value, sheet.cell_format(row, col), &options.display)
}

/// Unevaluated text of a cell (formula source included)
pub fn raw_cell_text(sheet: &Sheet, row: usize, col: usize) -> String {
    sheet.raw_cell(row, col).to_string()
}

/// Column label for a 0-based index (`0 → A`, `26 → AA`)
pub fn column_label(index: usize) -> String {
    CellAddress::column_to_letters(index)
}

/// Decode an A1-style reference into 0-based coordinates
pub fn parse_cell_ref(text: &str) -> Option<CellAddress> {
    CellAddress::parse(text).ok()
}

/// Render every cell, padding each row to the effective column count
///
/// All cells share one session, so each coordinate is computed at most once.
pub fn render_grid(sheet: &Sheet, options: &RenderOptions) -> Vec<Vec<String>> {
    SheetRenderer::with_options(sheet, options.clone()).grid()
}

/// Batch renderer holding one session over one sheet snapshot
pub struct SheetRenderer<'a> {
    sheet: &'a Sheet,
    options: RenderOptions,
    session: EvaluationSession,
}

impl<'a> SheetRenderer<'a> {
    /// Create a renderer with default options
    pub fn new(sheet: &'a Sheet) -> Self {
        Self::with_options(sheet, RenderOptions::default())
    }

    /// Create a renderer with custom options
    pub fn with_options(sheet: &'a Sheet, options: RenderOptions) -> Self {
        Self {
            sheet,
            options,
            session: EvaluationSession::for_sheet(sheet),
        }
    }

    /// The rendering options
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Evaluated value of a cell
    pub fn value(&mut self, row: usize, col: usize) -> FormulaValue {
        resolve(self.sheet, row, col, &mut self.session)
    }

    /// Display string of a cell
    pub fn display_value(&mut self, row: usize, col: usize) -> String {
        resolve_display_value_in(self.sheet, row, col, &self.options, &mut self.session)
    }

    /// Unevaluated text of a cell
    pub fn raw_text(&self, row: usize, col: usize) -> String {
        raw_cell_text(self.sheet, row, col)
    }

    /// Effective column count
    pub fn column_count(&self) -> usize {
        self.sheet.column_count(self.options.default_column_count)
    }

    /// Render every row
    pub fn grid(&mut self) -> Vec<Vec<String>> {
        let columns = self.column_count();
        let grid: Vec<Vec<String>> = (0..self.sheet.row_count())
            .map(|row| (0..columns).map(|col| self.display_value(row, col)).collect())
            .collect();

        let stats = self.session.stats();
        tracing::debug!(
            rows = grid.len(),
            columns,
            evaluations = stats.evaluations,
            cache_hits = stats.cache_hits,
            "rendered grid"
        );
        grid
    }

    /// Work done by the underlying session
    pub fn stats(&self) -> SessionStats {
        self.session.stats()
    }
}

/// Extension trait for Sheet to add rendering methods
pub trait SheetRenderExt {
    /// Display string of one cell with default options
    fn display_value(&self, row: usize, col: usize) -> String;

    /// Render every cell with default options
    fn render(&self) -> Vec<Vec<String>>;

    /// Render every cell with custom options
    fn render_with_options(&self, options: &RenderOptions) -> Vec<Vec<String>>;

    /// Batch renderer over this sheet
    fn renderer(&self) -> SheetRenderer<'_>;
}

impl SheetRenderExt for Sheet {
    fn display_value(&self, row: usize, col: usize) -> String {
        resolve_display_value(self, row, col, &RenderOptions::default())
    }

    fn render(&self) -> Vec<Vec<String>> {
        self.render_with_options(&RenderOptions::default())
    }

    fn render_with_options(&self, options: &RenderOptions) -> Vec<Vec<String>> {
        render_grid(self, options)
    }

    fn renderer(&self) -> SheetRenderer<'_> {
        SheetRenderer::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, FormatSpec, FormatType, Locale};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_grid_is_padded() {
        let sheet = Sheet::from_delimited("1\t2\t3\n4");
        let grid = render_grid(&sheet, &RenderOptions::default());
        assert_eq!(grid, vec![vec!["1", "2", "3"], vec!["4", "", ""]]);
    }

    #[test]
    fn test_empty_sheet_renders_nothing() {
        assert_eq!(Sheet::new().render(), Vec::<Vec<String>>::new());
    }

    #[test]
    fn test_empty_rows_use_default_width() {
        let sheet = Sheet::from_rows(vec![vec![]]);
        let options = RenderOptions {
            default_column_count: 3,
            ..Default::default()
        };
        assert_eq!(render_grid(&sheet, &options), vec![vec!["", "", ""]]);
    }

    #[test]
    fn test_format_comes_from_displayed_cell() {
        let sheet = Sheet::from_rows(vec![vec![
            Cell::with_format(0.5, FormatSpec::new().kind(FormatType::Percent)),
            Cell::from("=A1*2"),
        ]]);
        assert_eq!(sheet.display_value(0, 0), "50%");
        assert_eq!(sheet.display_value(0, 1), "1");
    }

    #[test]
    fn test_renderer_shares_session() {
        let sheet = Sheet::from_delimited("5\t=A1+1\t=A1+B1");
        let mut renderer = sheet.renderer();
        assert_eq!(renderer.grid(), vec![vec!["5", "6", "11"]]);
        assert_eq!(renderer.stats().evaluations, 3);
        assert_eq!(renderer.raw_text(0, 2), "=A1+B1");
        assert_eq!(renderer.value(0, 2), FormulaValue::Number(11.0));
    }

    #[test]
    fn test_locale_option() {
        let sheet = Sheet::from_rows(vec![vec![Cell::from(1234.5), Cell::from("1234.5")]]);
        let options = RenderOptions {
            display: DisplayOptions::new().with_locale(Locale::de_de()),
            ..Default::default()
        };
        assert_eq!(sheet.render_with_options(&options), vec![vec!["1.234,5", "1234.5"]]);
    }

    #[test]
    fn test_column_label_and_ref() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(27), "AB");
        assert_eq!(parse_cell_ref("ab3"), Some(CellAddress::new(2, 27)));
        assert_eq!(parse_cell_ref("3AB"), None);
        assert_eq!(parse_cell_ref(""), None);
    }

    #[test]
    fn test_raw_cell_text() {
        let sheet = Sheet::from_rows(vec![vec![
            Cell::from("=SUM(A2:A3)"),
            Cell::from(2.5),
            Cell::from(false),
        ]]);
        assert_eq!(raw_cell_text(&sheet, 0, 0), "=SUM(A2:A3)");
        assert_eq!(raw_cell_text(&sheet, 0, 1), "2.5");
        assert_eq!(raw_cell_text(&sheet, 0, 2), "FALSE");
        assert_eq!(raw_cell_text(&sheet, 4, 4), "");
    }
}
