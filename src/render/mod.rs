pub mod chart;
pub mod table;

pub use chart::LineChart;
pub use table::{Cell, Table};

use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

pub fn write_table<W: Write>(table: &Table, format: OutputFormat, writer: &mut W) -> Result<()> {
    match format {
        OutputFormat::Table => {
            writer.write_all(table.to_psql().as_bytes())?;
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(&mut *writer);
            csv_writer.write_record(&table.headers)?;
            for row in &table.rows {
                csv_writer.write_record(row.iter().map(Cell::text))?;
            }
            csv_writer.flush()?;
        }
        OutputFormat::Json => {
            let objects: Vec<serde_json::Map<String, serde_json::Value>> = table
                .rows
                .iter()
                .map(|row| {
                    table
                        .headers
                        .iter()
                        .zip(row)
                        .map(|(header, cell)| {
                            let value = match cell {
                                Cell::Text(s) => serde_json::Value::String(s.clone()),
                                Cell::Number(n) => serde_json::to_value(n.normalize())
                                    .unwrap_or(serde_json::Value::Null),
                            };
                            (header.clone(), value)
                        })
                        .collect()
                })
                .collect();
            serde_json::to_writer_pretty(&mut *writer, &objects)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}
