use imageproc::rect::Rect;

/// Represents a row in the grid.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Row {
    pub y: u32,
    pub height: u32,
}

/// Represents a column in the grid.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Column {
    pub x: u32,
    pub width: u32,
}

/// Represents a cell in the grid, referencing a row and a column.
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    pub row: &'a Row,
    pub column: &'a Column,
}

impl Cell<'_> {
    /// Number of pixels covered by the cell.
    pub fn pixel_count(&self) -> u32 {
        self.column.width * self.row.height
    }
}

impl From<&Cell<'_>> for Rect {
    fn from(cell: &Cell) -> Self {
        Rect::at(cell.column.x as i32, cell.row.y as i32)
            .of_size(cell.column.width, cell.row.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_rect_covers_row_and_column() {
        let row = Row { y: 10, height: 4 };
        let column = Column { x: 3, width: 7 };
        let cell = Cell {
            row: &row,
            column: &column,
        };

        let rect = Rect::from(&cell);
        assert_eq!((rect.left(), rect.top()), (3, 10));
        assert_eq!((rect.width(), rect.height()), (7, 4));
        assert_eq!(cell.pixel_count(), 28);
    }
}
