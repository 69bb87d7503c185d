pub mod components;
pub mod config;
pub mod divisors;
pub mod new_grid_like;
pub mod partition;

use crate::{grid_like::GridLike, DEFAULT_SMALLVEC_SIZE};
use components::{Cell, Column, Row};
use new_grid_like::LineTrait;
use smallvec::SmallVec;

pub use divisors::common_cell_sizes;

/// A type alias for SmallVec with an optimized stack-allocated buffer size.
pub type SmallVecLine<T> = SmallVec<[T; DEFAULT_SMALLVEC_SIZE]>;

/// A contiguous run of pixels along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    pub start: u32,
    pub length: u32,
}

impl Span {
    /// Creates a new `Span` with the given start position and length.
    ///
    /// # Example
    /// ```
    /// use gridcover::Span;
    ///
    /// let span = Span::new(0, 10);
    /// assert_eq!(span.start, 0);
    /// assert_eq!(span.end(), 10);
    /// ```
    pub fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    /// One past the last pixel of the span.
    pub fn end(&self) -> u32 {
        self.start + self.length
    }
}

/// The concrete cell layout of an image: rows top to bottom, columns left to right.
///
/// Rows and columns always tile the image plane without gaps.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Grid {
    pub rows: SmallVecLine<Row>,
    pub columns: SmallVecLine<Column>,
}

impl Grid {
    /// Creates a new `Grid` from rows and columns.
    pub fn new(rows: SmallVecLine<Row>, columns: SmallVecLine<Column>) -> Self {
        Self { rows, columns }
    }

    /// Iterates every cell, row-major.
    ///
    /// # Example
    /// ```
    /// use gridcover::{make_grid, Grid};
    ///
    /// let grid = make_grid!(rows: [(0, 2), (2, 2),], columns: [(0, 4),]);
    /// let origins: Vec<_> = grid.cells().map(|c| (c.column.x, c.row.y)).collect();
    /// assert_eq!(origins, vec![(0, 0), (0, 2)]);
    /// ```
    pub fn cells(&self) -> impl Iterator<Item = Cell<'_>> {
        self.rows.iter().flat_map(move |row| {
            self.columns
                .iter()
                .map(move |column| Cell { row, column })
        })
    }

    /// X positions of the boundaries between adjacent columns.
    pub fn inner_column_boundaries(&self) -> impl Iterator<Item = u32> + '_ {
        self.columns.iter().skip(1).map(|column| column.span().start)
    }

    /// Y positions of the boundaries between adjacent rows.
    pub fn inner_row_boundaries(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.iter().skip(1).map(|row| row.span().start)
    }
}

impl GridLike for Grid {
    fn rows_iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    fn columns_iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }
}
