//! Choosing a pixel cell size.
//!
//! A [`CellSizeResolver`] receives the cell sizes that divide an image evenly plus
//! a suggested default and returns the size to use. The scorer never asks for
//! input itself; callers pick a resolver (fixed value, interactive prompt, ...).

use std::io::{BufRead, Write};

use tracing::*;

use crate::{common_cell_sizes, GridError};

/// Capability that picks a pixel cell size for an image.
pub trait CellSizeResolver {
    /// Returns the chosen size given the valid sizes (ascending) and a default.
    fn resolve(&mut self, valid_sizes: &[u32], default: u32) -> Result<u32, GridError>;

    /// Resolves against the common divisors of `width` x `height`.
    fn resolve_for(&mut self, width: u32, height: u32, default: u32) -> Result<u32, GridError> {
        let valid = common_cell_sizes(width, height);
        self.resolve(&valid, default)
    }
}

/// Always returns the same size. Validation is left to the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCellSize(pub u32);

impl CellSizeResolver for FixedCellSize {
    fn resolve(&mut self, _valid_sizes: &[u32], _default: u32) -> Result<u32, GridError> {
        Ok(self.0)
    }
}

/// Picks the default when it is valid, otherwise the largest valid size not above it.
///
/// # Example
/// ```
/// use gridcover::resolver::{CellSizeResolver, DefaultCellSize};
///
/// assert_eq!(DefaultCellSize.resolve_for(100, 100, 50).unwrap(), 50);
/// assert_eq!(DefaultCellSize.resolve_for(640, 480, 50).unwrap(), 40);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCellSize;

impl CellSizeResolver for DefaultCellSize {
    fn resolve(&mut self, valid_sizes: &[u32], default: u32) -> Result<u32, GridError> {
        valid_sizes
            .iter()
            .copied()
            .filter(|&s| s <= default)
            .max()
            .or_else(|| valid_sizes.first().copied())
            .ok_or_else(|| GridError::InvalidParameter("no valid cell size".into()))
    }
}

/// Asks on a terminal until a valid size is entered. An empty answer accepts
/// the default when the default is valid.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl TerminalPrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompt on the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> CellSizeResolver for TerminalPrompt<R, W> {
    fn resolve(&mut self, valid_sizes: &[u32], default: u32) -> Result<u32, GridError> {
        let listed: Vec<String> = valid_sizes.iter().map(u32::to_string).collect();
        writeln!(self.output, "Valid cell sizes (px): {}", listed.join(", "))?;
        let default_valid = valid_sizes.contains(&default);

        loop {
            if default_valid {
                write!(self.output, "Cell size [{default}]: ")?;
            } else {
                write!(self.output, "Cell size: ")?;
            }
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(GridError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "no cell size entered",
                )));
            }
            let answer = line.trim();

            if answer.is_empty() && default_valid {
                return Ok(default);
            }
            match answer.parse::<u32>() {
                Ok(size) if valid_sizes.contains(&size) => {
                    debug!("Cell size {} chosen interactively", size);
                    return Ok(size);
                }
                _ => {
                    warn!("Rejected cell size input {:?}", answer);
                    writeln!(
                        self.output,
                        "{answer:?} does not divide the image evenly, pick one of: {}",
                        listed.join(", ")
                    )?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn prompt(input: &str) -> TerminalPrompt<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_empty_answer_takes_default() {
        let mut p = prompt("\n");
        assert_eq!(p.resolve_for(100, 100, 50).unwrap(), 50);
        let shown = String::from_utf8(p.output).unwrap();
        assert!(shown.starts_with("Valid cell sizes (px): 1, 2, 4, 5, 10, 20, 25, 50, 100\n"));
        assert!(shown.contains("Cell size [50]: "));
    }

    #[test]
    fn test_reprompts_until_valid() {
        let mut p = prompt("30\nabc\n25\n");
        assert_eq!(p.resolve(&[1, 5, 25], 50).unwrap(), 25);
        let shown = String::from_utf8(p.output).unwrap();
        assert_eq!(shown.matches("Cell size: ").count(), 3);
        assert!(shown.contains("\"30\" does not divide the image evenly"));
    }

    #[test]
    fn test_empty_answer_without_valid_default_reprompts() {
        let mut p = prompt("\n4\n");
        assert_eq!(p.resolve(&[1, 2, 4], 50).unwrap(), 4);
    }

    #[test]
    fn test_end_of_input_is_an_error() {
        let mut p = prompt("7\n");
        assert!(matches!(p.resolve(&[1, 2], 2), Err(GridError::Io(_))));
    }

    #[test]
    fn test_fixed_and_default_resolvers() {
        assert_eq!(FixedCellSize(30).resolve(&[1, 2], 2).unwrap(), 30);
        assert_eq!(DefaultCellSize.resolve(&[1, 3, 9], 5).unwrap(), 3);
        assert_eq!(DefaultCellSize.resolve(&[7, 14], 5).unwrap(), 7);
        assert!(DefaultCellSize.resolve(&[], 5).is_err());
    }
}
