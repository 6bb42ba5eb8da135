use crate::core::dates::display_date;
use crate::domain::model::{RateRecord, RefinancingRate};
use crate::utils::error::Result;
use chrono::NaiveDate;
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Chart, Dataset, GraphType},
    Frame, Terminal, TerminalOptions, Viewport,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

pub const DEFAULT_CHART_HEIGHT: u16 = 20;

/// A single line over calendar dates.
#[derive(Debug, Clone)]
pub struct LineChart {
    title: String,
    series_name: String,
    points: Vec<(NaiveDate, Decimal)>,
}

impl LineChart {
    pub fn new(
        title: impl Into<String>,
        series_name: impl Into<String>,
        mut points: Vec<(NaiveDate, Decimal)>,
    ) -> Self {
        points.sort_by_key(|(date, _)| *date);
        Self {
            title: title.into(),
            series_name: series_name.into(),
            points,
        }
    }

    pub fn from_rates(records: &[RateRecord]) -> Self {
        let abbreviation = records
            .first()
            .map(|r| r.abbreviation.clone())
            .unwrap_or_default();
        Self::new(
            format!("{} official rate", abbreviation),
            abbreviation,
            records.iter().map(|r| (r.date, r.official_rate)).collect(),
        )
    }

    pub fn from_refinancing(rates: &[RefinancingRate]) -> Self {
        Self::new(
            "Refinancing rate",
            "%",
            rates.iter().map(|r| (r.date, r.value)).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points as (days since the first date, value).
    fn data(&self) -> Vec<(f64, f64)> {
        let Some((first, _)) = self.points.first() else {
            return Vec::new();
        };
        self.points
            .iter()
            .filter_map(|(date, value)| {
                let x = (*date - *first).num_days() as f64;
                value.to_f64().map(|y| (x, y))
            })
            .collect()
    }

    fn y_bounds(data: &[(f64, f64)]) -> [f64; 2] {
        let min = data.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
        let max = data.iter().map(|(_, y)| *y).fold(f64::NEG_INFINITY, f64::max);
        if !min.is_finite() || !max.is_finite() {
            return [0.0, 1.0];
        }
        let pad = if max > min { (max - min) * 0.05 } else { 0.5 };
        [min - pad, max + pad]
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let data = self.data();
        let max_x = data.last().map(|(x, _)| *x).unwrap_or(0.0).max(1.0);
        let [y_min, y_max] = Self::y_bounds(&data);

        let x_labels: Vec<String> = match (self.points.first(), self.points.last()) {
            (Some((first, _)), Some((last, _))) if first != last => {
                vec![display_date(*first), display_date(*last)]
            }
            (Some((first, _)), _) => vec![display_date(*first)],
            _ => Vec::new(),
        };
        let y_labels = vec![
            format!("{:.4}", y_min),
            format!("{:.4}", (y_min + y_max) / 2.0),
            format!("{:.4}", y_max),
        ];

        let datasets = vec![Dataset::default()
            .name(self.series_name.clone())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&data)];

        let chart = Chart::new(datasets)
            .block(Block::bordered().title(self.title.clone()))
            .x_axis(
                Axis::default()
                    .title("Date")
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, max_x])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds([y_min, y_max])
                    .labels(y_labels),
            );

        frame.render_widget(chart, area);
    }

    /// Draws the chart below the cursor on stdout.
    pub fn show(&self, height: u16) -> Result<()> {
        let backend = CrosstermBackend::new(std::io::stdout());
        let mut terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(height),
            },
        )?;
        terminal.draw(|frame| {
            let area = frame.area();
            self.draw(frame, area);
        })?;
        println!();
        Ok(())
    }
}
