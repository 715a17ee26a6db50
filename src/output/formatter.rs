use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use crate::api::PodResult;
use crate::cli::OutputFormat;
use crate::error::{PodError, Result};

/// Outcome of an offline format check
#[derive(Debug, Clone, Serialize)]
pub struct ValidationRow {
    pub pod: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

/// One ISTAT table entry
#[derive(Debug, Clone, Serialize)]
pub struct CodeRow {
    pub code: String,
    pub name: String,
}

pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a resolution result
    pub fn format_result(&self, result: &PodResult) -> Result<String> {
        match self.format {
            OutputFormat::Table => self.format_result_table(result),
            OutputFormat::Json => to_json(result),
            OutputFormat::Csv => self.format_result_csv(result),
            OutputFormat::Plain => Ok(self.format_result_plain(result)),
        }
    }

    /// Format offline validation results
    pub fn format_validation(&self, rows: &[ValidationRow]) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(rows),
            OutputFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.write_record(["pod", "valid", "zone"])?;
                for row in rows {
                    wtr.write_record([
                        row.pod.as_str(),
                        if row.valid { "true" } else { "false" },
                        row.zone.as_deref().unwrap_or(""),
                    ])?;
                }
                finish_csv(wtr)
            }
            OutputFormat::Table | OutputFormat::Plain => {
                let lines: Vec<String> = rows
                    .iter()
                    .map(|row| match (row.valid, row.zone.as_deref()) {
                        (true, Some(zone)) => format!("{} {} (zone {})", "✅".green(), row.pod, zone),
                        (true, None) => format!("{} {}", "✅".green(), row.pod),
                        (false, _) => format!(
                            "{} {} is not a valid POD (expected ITxxxExxxxxxxx)",
                            "❌".red(),
                            row.pod
                        ),
                    })
                    .collect();
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a list of ISTAT codes and names
    pub fn format_codes(&self, title: &str, rows: &[CodeRow]) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(rows),
            OutputFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.write_record(["code", "name"])?;
                for row in rows {
                    wtr.write_record([row.code.as_str(), row.name.as_str()])?;
                }
                finish_csv(wtr)
            }
            OutputFormat::Plain => Ok(rows
                .iter()
                .map(|row| format!("{}\t{}", row.code, row.name))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut table = Table::new();
                table.set_header(vec![
                    Cell::new("Code").fg(Color::Cyan),
                    Cell::new(title).fg(Color::Cyan),
                ]);
                for row in rows {
                    table.add_row(vec![Cell::new(&row.code), Cell::new(&row.name)]);
                }
                table.set_content_arrangement(ContentArrangement::Dynamic);
                Ok(table.to_string())
            }
        }
    }

    // Table formatting
    fn format_result_table(&self, result: &PodResult) -> Result<String> {
        let mut table = Table::new();

        table.set_header(vec![
            Cell::new("Campo").fg(Color::Cyan),
            Cell::new("Valore").fg(Color::Cyan),
        ]);

        for (label, value) in labelled(result) {
            table.add_row(vec![Cell::new(label), Cell::new(value)]);
        }

        table.set_content_arrangement(ContentArrangement::Dynamic);

        let mut output = String::new();
        output.push_str(&format!("\n{} POD {}\n\n", "🔌".cyan(), result.pod.bold()));
        output.push_str(&table.to_string());

        Ok(output)
    }

    fn format_result_plain(&self, result: &PodResult) -> String {
        labelled(result)
            .iter()
            .map(|(label, value)| format!("{} {}: {}", "✅".green(), label, value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_result_csv(&self, result: &PodResult) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(result)?;
        finish_csv(wtr)
    }
}

fn labelled(result: &PodResult) -> [(&'static str, &str); 6] {
    [
        ("POD", result.pod.as_str()),
        ("Cabina Primaria", result.substation.as_str()),
        ("Fornitore", result.supplier.as_str()),
        ("Regioni", result.regions.as_str()),
        ("Province", result.provinces.as_str()),
        ("Comuni", result.municipalities.as_str()),
    ]
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(PodError::Serialization)
}

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().map_err(|e| PodError::Io(e.into_error()))?;

    // Add BOM for Excel compatibility
    let mut result = vec![0xEF, 0xBB, 0xBF];
    result.extend_from_slice(&data);

    String::from_utf8(result).map_err(|e| PodError::Parse(e.to_string()))
}
