use crate::grid::{
    components::{Column, Row},
    new_grid_like::Len,
};

/// A trait for types that provide access to rows and columns.
pub trait GridLike {
    /// Returns an iterator over all rows.
    fn rows_iter(&self) -> impl Iterator<Item = &Row>;

    /// Returns an iterator over all columns.
    fn columns_iter(&self) -> impl Iterator<Item = &Column>;

    /// Returns the number of rows.
    fn row_count(&self) -> usize {
        self.rows_iter().count()
    }

    /// Returns the number of columns.
    fn column_count(&self) -> usize {
        self.columns_iter().count()
    }

    /// Returns the number of cells.
    fn cell_count(&self) -> usize {
        self.row_count() * self.column_count()
    }

    /// Whether every row has the same height and every column the same width.
    fn is_uniform(&self) -> bool {
        fn all_equal<'a, T: Len + 'a>(mut lines: impl Iterator<Item = &'a T>) -> bool {
            match lines.next() {
                Some(first) => lines.all(|line| line.len() == first.len()),
                None => true,
            }
        }
        all_equal(self.rows_iter()) && all_equal(self.columns_iter())
    }
}
