use std::fmt;

use super::{
    common_cell_sizes,
    components::{Column, Row},
    new_grid_like::LineTrait,
    Grid, Span,
};
use crate::GridError;
use tracing::*;

/// How the image plane is divided into cells.
///
/// # Example
/// ```
/// use gridcover::{GridLike, Partition};
///
/// let grid = Partition::CellSize(25).layout(100, 100).unwrap();
/// assert_eq!(grid.cell_count(), 16);
///
/// let grid = Partition::Count(10).layout(101, 101).unwrap();
/// assert_eq!(grid.cell_count(), 100);
/// assert_eq!(grid.rows.last().unwrap().height, 11);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Partition {
    /// N x N cells. Cell sides are `width / N` and `height / N`; the last row
    /// and column absorb the remainder.
    Count(u32),
    /// Square cells of S pixels. S must divide both dimensions exactly.
    CellSize(u32),
}

impl Partition {
    /// Lays the partition out over a `width` x `height` image.
    ///
    /// # Errors
    /// - [`GridError::InvalidDimensions`] for an empty image.
    /// - [`GridError::InvalidParameter`] when the count or cell size is zero.
    /// - [`GridError::InvalidGridGeometry`] when the cell size does not divide
    ///   both dimensions, or the count exceeds a dimension (cells would be empty).
    pub fn layout(&self, width: u32, height: u32) -> Result<Grid, GridError> {
        if width == 0 || height == 0 {
            error!(
                "Invalid image dimensions: width={}, height={}",
                width, height
            );
            return Err(GridError::InvalidDimensions { width, height });
        }

        match *self {
            Partition::Count(0) => Err(GridError::InvalidParameter(
                "grid size must be a positive integer".into(),
            )),
            Partition::CellSize(0) => Err(GridError::InvalidParameter(
                "cell size must be a positive integer".into(),
            )),
            Partition::Count(n) => {
                if n > width || n > height {
                    return Err(geometry_error(
                        width,
                        height,
                        format!("a {n}x{n} grid would leave cells without pixels"),
                    ));
                }
                debug!("Laying out {}x{} grid over {}x{}", n, n, width, height);
                Ok(Grid::new(
                    count_spans(height, n).map(Row::new).collect(),
                    count_spans(width, n).map(Column::new).collect(),
                ))
            }
            Partition::CellSize(s) => {
                if width % s != 0 || height % s != 0 {
                    return Err(geometry_error(
                        width,
                        height,
                        format!("cell size {s}px does not divide the image evenly"),
                    ));
                }
                debug!(
                    "Laying out {}px cells over {}x{} ({} columns, {} rows)",
                    s,
                    width,
                    height,
                    width / s,
                    height / s
                );
                Ok(Grid::new(
                    sized_spans(height, s).map(Row::new).collect(),
                    sized_spans(width, s).map(Column::new).collect(),
                ))
            }
        }
    }

    /// Short label used in report file names, e.g. `10` or `50px`.
    pub fn label(&self) -> String {
        match self {
            Partition::Count(n) => n.to_string(),
            Partition::CellSize(s) => format!("{s}px"),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Count(n) => write!(f, "{n}x{n}"),
            Partition::CellSize(s) => write!(f, "{s}px cells"),
        }
    }
}

fn geometry_error(width: u32, height: u32, reason: String) -> GridError {
    error!("Invalid grid geometry for {}x{}: {}", width, height, reason);
    GridError::InvalidGridGeometry {
        width,
        height,
        reason,
        valid_cell_sizes: common_cell_sizes(width, height),
    }
}

/// `count` spans of `length / count`, the last one stretched to `length`.
fn count_spans(length: u32, count: u32) -> impl Iterator<Item = Span> {
    let step = length / count;
    (0..count).map(move |i| {
        let start = i * step;
        let end = if i + 1 == count { length } else { start + step };
        Span::new(start, end - start)
    })
}

fn sized_spans(length: u32, size: u32) -> impl Iterator<Item = Span> {
    (0..length / size).map(move |i| Span::new(i * size, size))
}
