use super::components::{Column, Row};
use crate::Span;

/// A trait providing a factory method to create instances from a [`Span`].
///
/// This trait is implemented by [`Row`] and [`Column`], so partition code can
/// produce spans along either axis and convert them uniformly.
///
/// # Examples
///
/// ```
/// use gridcover::{Column, LineTrait, Row, Span};
///
/// let row = Row::new(Span::new(0, 100));
/// assert_eq!(row.height, 100);
///
/// let column = Column::new(Span::new(20, 5));
/// assert_eq!(column.x, 20);
/// ```
pub trait LineTrait {
    /// Creates a new instance from the given `Span`.
    fn new(span: Span) -> Self;

    /// Returns the span covered by this line.
    fn span(&self) -> Span;
}

impl LineTrait for Row {
    fn new(span: Span) -> Self {
        Row {
            y: span.start,
            height: span.length,
        }
    }

    fn span(&self) -> Span {
        Span::new(self.y, self.height)
    }
}

impl LineTrait for Column {
    fn new(span: Span) -> Self {
        Column {
            x: span.start,
            width: span.length,
        }
    }

    fn span(&self) -> Span {
        Span::new(self.x, self.width)
    }
}

pub trait Len {
    fn len(&self) -> usize;
}
impl Len for Column {
    fn len(&self) -> usize {
        self.width as usize
    }
}
impl Len for Row {
    fn len(&self) -> usize {
        self.height as usize
    }
}
