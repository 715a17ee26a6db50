pub mod formatter;

pub use formatter::{CodeRow, Formatter, ValidationRow};

use crate::api::PodResult;
use crate::cli::OutputFormat;
use crate::error::Result;

/// Format a resolution result based on the specified format
pub fn format_result(result: &PodResult, format: OutputFormat) -> Result<String> {
    Formatter::new(format).format_result(result)
}
