//! Sheet type

use std::sync::atomic::{AtomicU64, Ordering};

use crate::cell::{Cell, CellAddress, CellParts, CellRange, Scalar, EMPTY_SCALAR};
use crate::error::{Error, Result};
use crate::style::FormatSpec;

/// Column count reported for a sheet with no materialized cells
pub const DEFAULT_COLUMN_COUNT: usize = 10;

static NEXT_SHEET_ID: AtomicU64 = AtomicU64::new(1);

fn next_sheet_id() -> u64 {
    NEXT_SHEET_ID.fetch_add(1, Ordering::Relaxed)
}

/// A single grid of cells
///
/// Rows may be ragged. Reads past the end of a short row see an empty cell, which
/// is never materialized by reading. Every mutation bumps [`Sheet::revision`], and
/// every sheet (clones included) has its own [`Sheet::id`], so evaluation caches
/// can tell snapshots apart.
#[derive(Debug)]
pub struct Sheet {
    rows: Vec<Vec<Cell>>,
    id: u64,
    revision: u64,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::from_rows(Vec::new())
    }

    /// Create a sheet from rows of cells, normalizing every cell
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Cell::normalize).collect())
            .collect();
        Self {
            rows,
            id: next_sheet_id(),
            revision: 0,
        }
    }

    /// Create a sheet from a tab/newline delimited block
    ///
    /// Every value is stored as text.
    ///
    /// ```
    /// use cellcalc_core::{Scalar, Sheet};
    ///
    /// let sheet = Sheet::from_delimited("1\t2\n=A1+B1");
    /// assert_eq!(sheet.row_count(), 2);
    /// assert_eq!(sheet.raw_cell(1, 0), &Scalar::text("=A1+B1"));
    /// ```
    pub fn from_delimited(text: &str) -> Self {
        let rows = Self::parse_block(text)
            .into_iter()
            .map(|line| line.into_iter().map(Cell::from).collect())
            .collect();
        Self::from_rows(rows)
    }

    /// Split a delimited block into lines of fields
    ///
    /// Lines are separated by `\n` (a preceding `\r` is dropped), fields by `\t`.
    /// A single trailing newline does not produce an extra line.
    pub fn parse_block(text: &str) -> Vec<Vec<String>> {
        if text.is_empty() {
            return Vec::new();
        }
        let text = text.strip_suffix('\n').unwrap_or(text);
        text.split('\n')
            .map(|line| {
                let line = line.strip_suffix('\r').unwrap_or(line);
                line.split('\t').map(str::to_string).collect()
            })
            .collect()
    }

    /// Process-unique identity of this sheet
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of mutations applied since construction
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Get the stored rows
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the sheet has no materialized cells
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.is_empty())
    }

    /// Effective column count: the longest row, or `default` when nothing is stored
    pub fn column_count(&self, default: usize) -> usize {
        match self.width() {
            0 => default,
            width => width,
        }
    }

    /// The range covering every materialized cell, if any
    pub fn extent(&self) -> Option<CellRange> {
        match (self.rows.len(), self.width()) {
            (0, _) | (_, 0) => None,
            (rows, cols) => Some(CellRange::from_indices(0, 0, rows - 1, cols - 1)),
        }
    }

    fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Get a stored cell
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// The `{value, format}` view of a cell; empty when out of bounds
    pub fn parts(&self, row: usize, col: usize) -> CellParts<'_> {
        match self.cell(row, col) {
            Some(cell) => cell.parts(),
            None => CellParts {
                value: &EMPTY_SCALAR,
                format: FormatSpec::empty_ref(),
            },
        }
    }

    /// The literal value of a cell (formula source included)
    pub fn raw_cell(&self, row: usize, col: usize) -> &Scalar {
        self.parts(row, col).value
    }

    /// The format of a cell; empty for bare cells
    pub fn cell_format(&self, row: usize, col: usize) -> &FormatSpec {
        self.parts(row, col).format
    }

    // === Mutation ===

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn ensure_cell(&mut self, row: usize, col: usize) -> &mut Cell {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize_with(col + 1, Cell::empty);
        }
        &mut cells[col]
    }

    /// Replace a cell, growing the sheet as needed
    pub fn set_cell<C: Into<Cell>>(&mut self, row: usize, col: usize, cell: C) {
        *self.ensure_cell(row, col) = cell.into().normalize();
        self.touch();
    }

    /// Replace a cell's value, keeping its format
    pub fn set_value<V: Into<Scalar>>(&mut self, row: usize, col: usize, value: V) {
        self.ensure_cell(row, col).set_value(value.into());
        self.touch();
    }

    /// Set a cell by A1-style address, keeping its format
    pub fn set_value_at<V: Into<Scalar>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_value(addr.row, addr.col, value);
        Ok(())
    }

    /// Replace a cell's format, keeping its value
    pub fn set_format(&mut self, row: usize, col: usize, format: FormatSpec) {
        self.ensure_cell(row, col).set_format(format);
        self.touch();
    }

    /// Reset a cell to empty
    ///
    /// Cells outside the stored rows are already empty and are left alone.
    pub fn clear_cell(&mut self, row: usize, col: usize) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = Cell::empty();
            self.touch();
        }
    }

    /// Insert an empty row before `at`
    ///
    /// The new row is as wide as the widest existing row. Formula references are
    /// not rewritten.
    pub fn insert_row(&mut self, at: usize) -> Result<()> {
        if at > self.rows.len() {
            tracing::debug!(at, rows = self.rows.len(), "rejected row insert");
            return Err(Error::RowOutOfBounds(at, self.rows.len()));
        }
        let width = self.width();
        self.rows
            .insert(at, std::iter::repeat_with(Cell::empty).take(width).collect());
        self.touch();
        Ok(())
    }

    /// Delete row `at`
    ///
    /// Fails when it would leave the sheet without rows.
    pub fn delete_row(&mut self, at: usize) -> Result<()> {
        if self.rows.len() <= 1 {
            tracing::debug!(at, "rejected deleting the last row");
            return Err(Error::LastRow);
        }
        if at >= self.rows.len() {
            tracing::debug!(at, rows = self.rows.len(), "rejected row delete");
            return Err(Error::RowOutOfBounds(at, self.rows.len()));
        }
        self.rows.remove(at);
        self.touch();
        Ok(())
    }

    /// Insert an empty column before `at`
    ///
    /// Rows too short to reach `at` are left as they are.
    pub fn insert_column(&mut self, at: usize) -> Result<()> {
        let width = self.width();
        if at > width {
            tracing::debug!(at, width, "rejected column insert");
            return Err(Error::ColumnOutOfBounds(at, width));
        }
        for row in &mut self.rows {
            if at <= row.len() {
                row.insert(at, Cell::empty());
            }
        }
        self.touch();
        Ok(())
    }

    /// Delete column `at`
    ///
    /// Fails when it would leave the sheet without columns.
    pub fn delete_column(&mut self, at: usize) -> Result<()> {
        let width = self.width();
        if width <= 1 {
            tracing::debug!(at, "rejected deleting the last column");
            return Err(Error::LastColumn);
        }
        if at >= width {
            tracing::debug!(at, width, "rejected column delete");
            return Err(Error::ColumnOutOfBounds(at, width));
        }
        for row in &mut self.rows {
            if at < row.len() {
                row.remove(at);
            }
        }
        self.touch();
        Ok(())
    }

    /// Paste a tab/newline delimited block with its top-left corner at `(row, col)`
    ///
    /// Overwrites the values the block supplies (formats are kept) and grows the
    /// sheet with empty cells as needed. A line shorter than the widest one leaves
    /// the cells past its end untouched. Returns the block's bounding box, or
    /// `None` for an empty block.
    pub fn paste(&mut self, row: usize, col: usize, text: &str) -> Option<CellRange> {
        let block = Self::parse_block(text);
        let height = block.len();
        let width = block.iter().map(Vec::len).max().unwrap_or(0);
        if height == 0 || width == 0 {
            return None;
        }

        let (rows_before, width_before) = (self.rows.len(), self.width());
        for (r, line) in block.into_iter().enumerate() {
            for (c, value) in line.into_iter().enumerate() {
                self.ensure_cell(row + r, col + c).set_value(Scalar::Text(value));
            }
        }
        if self.rows.len() > rows_before || self.width() > width_before {
            tracing::debug!(
                rows = self.rows.len(),
                columns = self.width(),
                "paste grew the sheet"
            );
        }
        self.touch();

        Some(CellRange::from_indices(
            row,
            col,
            row + height - 1,
            col + width - 1,
        ))
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Sheet {
    /// A clone is a distinct snapshot with its own identity
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            id: next_sheet_id(),
            revision: self.revision,
        }
    }
}

impl PartialEq for Sheet {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl From<Vec<Vec<Cell>>> for Sheet {
    fn from(rows: Vec<Vec<Cell>>) -> Self {
        Self::from_rows(rows)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Sheet {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.rows, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Sheet {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let rows: Vec<Vec<Cell>> = serde::Deserialize::deserialize(deserializer)?;
        Ok(Self::from_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::FormatType;
    use pretty_assertions::assert_eq;

    fn text_grid(sheet: &Sheet) -> Vec<Vec<String>> {
        sheet
            .rows()
            .iter()
            .map(|row| row.iter().map(|c| c.value().to_string()).collect())
            .collect()
    }

    #[test]
    fn test_ragged_reads() {
        let sheet = Sheet::from_rows(vec![vec![Cell::from(1), Cell::from(2), Cell::from(3)], vec![]]);
        assert_eq!(sheet.column_count(DEFAULT_COLUMN_COUNT), 3);
        assert_eq!(sheet.raw_cell(1, 2), &Scalar::text(""));
        assert_eq!(sheet.raw_cell(50, 50), &Scalar::text(""));
        assert!(sheet.cell_format(0, 0).is_empty());
        // Reading never materializes
        assert_eq!(sheet.rows()[1].len(), 0);
    }

    #[test]
    fn test_column_count_default_when_empty() {
        assert_eq!(Sheet::new().column_count(7), 7);
        assert_eq!(Sheet::from_rows(vec![vec![], vec![]]).column_count(4), 4);
        assert_eq!(Sheet::new().extent(), None);
    }

    #[test]
    fn test_structured_cells_are_unwrapped() {
        let format = FormatSpec::new().kind(FormatType::Percent);
        let mut sheet = Sheet::new();
        sheet.set_cell(0, 1, Cell::with_format(0.5, format.clone()));

        assert_eq!(sheet.raw_cell(0, 1), &Scalar::Number(0.5));
        assert_eq!(sheet.cell_format(0, 1), &format);
        assert_eq!(sheet.raw_cell(0, 0), &Scalar::text(""));
    }

    #[test]
    fn test_from_rows_normalizes() {
        let sheet = Sheet::from_rows(vec![vec![Cell::Structured {
            value: Scalar::text("a"),
            format: FormatSpec::default(),
        }]]);
        assert_eq!(sheet.cell(0, 0), Some(&Cell::Bare(Scalar::text("a"))));
    }

    #[test]
    fn test_set_value_keeps_format_and_grows() {
        let mut sheet = Sheet::new();
        sheet.set_format(0, 0, FormatSpec::new().bold(true));
        sheet.set_value(0, 0, 42);
        sheet.set_value(2, 3, "x");

        assert!(sheet.cell_format(0, 0).bold);
        assert_eq!(sheet.raw_cell(0, 0), &Scalar::Number(42.0));
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.column_count(0), 4);
    }

    #[test]
    fn test_set_value_at() {
        let mut sheet = Sheet::new();
        sheet.set_value_at("B2", 5).unwrap();
        assert_eq!(sheet.raw_cell(1, 1), &Scalar::Number(5.0));
        assert!(sheet.set_value_at("B0", 5).is_err());
    }

    #[test]
    fn test_clear_cell() {
        let mut sheet = Sheet::new();
        sheet.set_cell(0, 0, Cell::with_format(1, FormatSpec::new().italic(true)));
        let revision = sheet.revision();

        sheet.clear_cell(0, 0);
        assert_eq!(sheet.cell(0, 0), Some(&Cell::empty()));
        assert!(sheet.revision() > revision);

        // Out of bounds is a no-op
        let revision = sheet.revision();
        sheet.clear_cell(9, 9);
        assert_eq!(sheet.revision(), revision);
        assert_eq!(sheet.row_count(), 1);
    }

    #[test]
    fn test_insert_and_delete_rows() {
        let mut sheet = Sheet::from_delimited("a\tb\nc\td");
        sheet.insert_row(1).unwrap();
        assert_eq!(
            text_grid(&sheet),
            vec![vec!["a", "b"], vec!["", ""], vec!["c", "d"]]
        );

        sheet.delete_row(0).unwrap();
        assert_eq!(text_grid(&sheet), vec![vec!["", ""], vec!["c", "d"]]);

        assert_eq!(sheet.insert_row(5), Err(Error::RowOutOfBounds(5, 2)));
        assert_eq!(sheet.delete_row(2), Err(Error::RowOutOfBounds(2, 2)));
    }

    #[test]
    fn test_cannot_delete_last_row() {
        let mut sheet = Sheet::from_delimited("a\tb");
        assert_eq!(sheet.delete_row(0), Err(Error::LastRow));
        assert_eq!(sheet.row_count(), 1);
    }

    #[test]
    fn test_insert_and_delete_columns() {
        let mut sheet = Sheet::from_delimited("a\tb\tc\nd");
        sheet.insert_column(2).unwrap();
        // The short row is not reached by the insert
        assert_eq!(text_grid(&sheet), vec![vec!["a", "b", "", "c"], vec!["d"]]);

        sheet.insert_column(1).unwrap();
        assert_eq!(
            text_grid(&sheet),
            vec![vec!["a", "", "b", "", "c"], vec!["d", ""]]
        );

        sheet.delete_column(0).unwrap();
        sheet.delete_column(0).unwrap();
        assert_eq!(text_grid(&sheet), vec![vec!["b", "", "c"], vec![]]);

        assert_eq!(sheet.delete_column(3), Err(Error::ColumnOutOfBounds(3, 3)));
    }

    #[test]
    fn test_cannot_delete_last_column() {
        let mut sheet = Sheet::from_delimited("a\nb");
        assert_eq!(sheet.delete_column(0), Err(Error::LastColumn));
        assert_eq!(text_grid(&sheet), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_parse_block() {
        assert_eq!(
            Sheet::parse_block("1\t2\r\n3\t4\n"),
            vec![vec!["1", "2"], vec!["3", "4"]]
        );
        assert_eq!(Sheet::parse_block(""), Vec::<Vec<String>>::new());
        assert_eq!(Sheet::parse_block("\t"), vec![vec!["", ""]]);
    }

    #[test]
    fn test_paste_overwrites_and_grows() {
        let mut sheet = Sheet::from_delimited("a\tb\nc\td");
        sheet.set_format(0, 1, FormatSpec::new().bold(true));

        let window = sheet.paste(0, 1, "1\t2\n3\t4\n5\t6").unwrap();
        assert_eq!(window, CellRange::parse("B1:C3").unwrap());
        assert_eq!(
            text_grid(&sheet),
            vec![vec!["a", "1", "2"], vec!["c", "3", "4"], vec!["", "5", "6"]]
        );
        assert_eq!(sheet.raw_cell(0, 1), &Scalar::text("1"));
        assert!(sheet.cell_format(0, 1).bold);
    }

    #[test]
    fn test_paste_ragged_block_keeps_uncovered_cells() {
        let mut sheet = Sheet::from_delimited("a\tb\nc\td");
        let window = sheet.paste(0, 0, "1\t2\n3").unwrap();
        assert_eq!(window, CellRange::parse("A1:B2").unwrap());
        assert_eq!(text_grid(&sheet), vec![vec!["1", "2"], vec!["3", "d"]]);
        assert_eq!(sheet.raw_cell(1, 1), &Scalar::text("d"));
    }

    #[test]
    fn test_paste_empty_block() {
        let mut sheet = Sheet::new();
        assert_eq!(sheet.paste(3, 3, ""), None);
        assert_eq!(sheet.revision(), 0);
        assert_eq!(sheet.row_count(), 0);
    }

    #[test]
    fn test_identity_and_revision() {
        let mut sheet = Sheet::new();
        let clone = sheet.clone();
        assert_ne!(sheet.id(), clone.id());
        assert_eq!(sheet, clone);

        sheet.set_value(0, 0, 1);
        sheet.set_value(0, 0, 2);
        assert_eq!(sheet.revision(), 2);
        assert_eq!(clone.revision(), 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_storage_shape() {
        let json = r#"[[1, "=A1*2", {"value": 0.5, "format": {"type": "percent", "bold": true}}],
                       [true, {"value": "x", "format": {}}]]"#;
        let sheet: Sheet = serde_json::from_str(json).unwrap();

        assert_eq!(sheet.raw_cell(0, 1), &Scalar::text("=A1*2"));
        assert_eq!(sheet.cell_format(0, 2).kind, FormatType::Percent);
        assert_eq!(sheet.raw_cell(1, 0), &Scalar::Bool(true));
        assert_eq!(sheet.cell(1, 1), Some(&Cell::Bare(Scalar::text("x"))));

        let out = serde_json::to_value(&sheet).unwrap();
        assert_eq!(
            out,
            serde_json::json!([
                [1.0, "=A1*2", {"value": 0.5, "format": {"bold": true, "type": "percent"}}],
                [true, "x"]
            ])
        );
    }
}
