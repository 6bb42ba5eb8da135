use crate::core::conversion::round_amount;
use crate::core::dates::display_date;
use crate::domain::model::{Conversion, RateRecord, RefinancingRate};
use rust_decimal::Decimal;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(Decimal),
}

impl Cell {
    pub fn text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.normalize().to_string(),
        }
    }

    fn is_number(&self) -> bool {
        matches!(self, Cell::Number(_))
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Cell::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// A series of one currency shows only date and rate.
    pub fn from_rates(records: &[RateRecord], series: bool) -> Self {
        if series {
            let abbreviation = records
                .first()
                .map(|r| r.abbreviation.as_str())
                .unwrap_or("");
            let mut table = Self::new(vec![
                "Date".to_string(),
                format!("{} rate", abbreviation).trim().to_string(),
            ]);
            for record in records {
                table.push_row(vec![
                    display_date(record.date).into(),
                    record.official_rate.into(),
                ]);
            }
            return table;
        }

        let mut table = Self::new(
            ["Date", "Currency", "Scale", "Rate"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
        );
        for record in records {
            table.push_row(vec![
                display_date(record.date).into(),
                record.abbreviation.as_str().into(),
                Decimal::from(record.scale).into(),
                record.official_rate.into(),
            ]);
        }
        table
    }

    pub fn from_refinancing(rates: &[RefinancingRate]) -> Self {
        let mut table = Self::new(vec!["Date".to_string(), "Refinancing rate".to_string()]);
        for rate in rates {
            table.push_row(vec![display_date(rate.date).into(), rate.value.into()]);
        }
        table
    }

    pub fn from_conversion(conversion: &Conversion, precision: u32) -> Self {
        let mut table = Self::new(
            ["Amount", "From", "=", "Converted", "To"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
        );
        table.push_row(vec![
            conversion.amount.into(),
            conversion.from.abbreviation.to_uppercase().into(),
            "=".into(),
            round_amount(conversion.converted, precision).into(),
            conversion.to.abbreviation.to_uppercase().into(),
        ]);
        table
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.text().chars().count();
                if i < widths.len() {
                    widths[i] = widths[i].max(len);
                } else {
                    widths.push(len);
                }
            }
        }
        widths
    }

    fn numeric_columns(&self, columns: usize) -> Vec<bool> {
        (0..columns)
            .map(|i| {
                !self.rows.is_empty()
                    && self
                        .rows
                        .iter()
                        .all(|row| row.get(i).map(Cell::is_number).unwrap_or(true))
            })
            .collect()
    }

    /// Renders the table in the psql style of `tabulate`.
    pub fn to_psql(&self) -> String {
        let widths = self.column_widths();
        let numeric = self.numeric_columns(widths.len());

        let border = |left: char, joint: char, right: char| -> String {
            let parts: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
            format!("{}{}{}\n", left, parts.join(&joint.to_string()), right)
        };

        let line = |cells: Vec<String>| -> String {
            let mut out = String::from("|");
            for (i, width) in widths.iter().enumerate() {
                let text = cells.get(i).map(String::as_str).unwrap_or("");
                let pad = width.saturating_sub(text.chars().count());
                if numeric[i] {
                    let _ = write!(out, " {}{} |", " ".repeat(pad), text);
                } else {
                    let _ = write!(out, " {}{} |", text, " ".repeat(pad));
                }
            }
            out.push('\n');
            out
        };

        let mut out = border('+', '+', '+');
        out.push_str(&line(self.headers.clone()));
        out.push_str(&border('|', '+', '|'));
        for row in &self.rows {
            out.push_str(&line(row.iter().map(Cell::text).collect()));
        }
        out.push_str(&border('+', '+', '+'));
        out
    }
}
