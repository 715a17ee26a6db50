use crate::cli::args::ValidateArgs;
use crate::cli::OutputFormat;
use crate::error::{PodError, Result};
use crate::output::{Formatter, ValidationRow};
use crate::pod::PodCode;

/// Execute validate command; fails if any code is malformed
pub fn execute(args: ValidateArgs, format: OutputFormat) -> Result<()> {
    let rows: Vec<ValidationRow> = args.pods.iter().map(|pod| check(pod)).collect();

    let output = Formatter::new(format).format_validation(&rows)?;
    println!("{}", output);

    match rows.iter().find(|row| !row.valid) {
        Some(row) => Err(PodError::InvalidInput(row.pod.clone())),
        None => Ok(()),
    }
}

fn check(pod: &str) -> ValidationRow {
    match PodCode::parse(pod) {
        Ok(code) => ValidationRow {
            pod: pod.to_string(),
            valid: true,
            zone: Some(code.zone().to_string()),
        },
        Err(_) => ValidationRow {
            pod: pod.to_string(),
            valid: false,
            zone: None,
        },
    }
}
