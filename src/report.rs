//! Tabular reports: CSV on disk and a markdown table for the console.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use tracing::*;

use crate::{batch::ResultRow, GridError, ScoreConfig};

/// Header written as the first CSV line.
pub const CSV_HEADER: [&str; 2] = ["Image Name", "Normalised Value"];

/// Default report file name for a configuration.
///
/// # Example
/// ```
/// use gridcover::{report::report_file_name, Partition, ScoreConfig};
///
/// assert_eq!(report_file_name(&ScoreConfig::default()), "results_10_25.csv");
/// assert_eq!(
///     report_file_name(&ScoreConfig::new(Partition::CellSize(50), 37.5)),
///     "results_50px_37.5.csv"
/// );
/// ```
pub fn report_file_name(config: &ScoreConfig) -> String {
    format!(
        "results_{}_{}.csv",
        config.partition.label(),
        config.threshold_pct
    )
}

/// Writes `rows` as CSV to any writer.
pub fn write_csv<W: Write>(mut out: W, rows: &[ResultRow]) -> Result<(), GridError> {
    writeln!(out, "{},{}", CSV_HEADER[0], CSV_HEADER[1])?;
    for row in rows {
        writeln!(out, "{},{:.1}", csv_field(&row.image_name), row.score)?;
    }
    out.flush()?;
    Ok(())
}

/// Writes `rows` as CSV to `path`, replacing any existing file.
pub fn save_csv(path: impl AsRef<Path>, rows: &[ResultRow]) -> Result<(), GridError> {
    let path = path.as_ref();
    info!("Writing {} rows to {}", rows.len(), path.display());
    write_csv(BufWriter::new(File::create(path)?), rows)
}

/// Quotes a field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Console summary: the configuration followed by a markdown table of the rows.
///
/// # Example
/// ```
/// use gridcover::{batch::ResultRow, report::render_summary, ScoreConfig};
///
/// let rows = vec![ResultRow { image_name: "a.png".into(), score: 42.0 }];
/// let text = render_summary(&ScoreConfig::default(), &rows);
/// assert!(text.contains("| a.png | 42.0 |"));
/// ```
pub fn render_summary(config: &ScoreConfig, rows: &[ResultRow]) -> String {
    let mut text = format!(
        "Threshold Percentage: {}%\nGrid Size: {}\n\n",
        config.threshold_pct, config.partition
    );
    text.push_str("| Image Name | Normalised Value (out of 100) |\n");
    text.push_str("|------------|-------------------------------|\n");
    for row in rows {
        text.push_str(&format!("| {} | {:.1} |\n", row.image_name, row.score));
    }
    text
}
