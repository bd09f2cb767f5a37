//! Column widths and cell text for one report table.
//!
//! Widths come from measuring every string a column will hold in the font it
//! is drawn with, then applying a per-column padding factor.

use super::fonts::{Font, TextMeasure};
use crate::domain::content::DataKind;
use crate::domain::report_table::{Extremes, ReportTable};

pub const TITLE_FONT_SIZE: f32 = 7.5;
pub const HEADER_FONT_SIZE: f32 = 6.0;
pub const BODY_FONT_SIZE: f32 = 5.0;

pub const ID_HEADER: &str = "ID";
pub const DESCRIPTION_HEADER: &str = "Description";
pub const HIGHEST_LABEL: &str = "Highest Return";
pub const LOWEST_LABEL: &str = "Lowest Return";

const ID_PADDING: f32 = 1.5;
const DESCRIPTION_PADDING: f32 = 1.15;
const VALUE_PADDING: f32 = 1.25;
const ROW_HEIGHT_FACTOR: f32 = 1.8;

/// Fonts each part of a table is drawn with.
pub const HEADER_FONT: Font = Font::CourierBold;
pub const LABEL_FONT: Font = Font::Courier;
pub const VALUE_FONT: Font = Font::CourierBold;
pub const SUMMARY_FONT: Font = Font::CourierBold;

/// Text of a value cell: one decimal and a percent sign for returns, two
/// decimals for prices, blank when the series has no data.
pub fn format_cell(value: Option<f64>, kind: DataKind) -> String {
    match (value, kind) {
        (None, _) => String::new(),
        (Some(v), DataKind::Return) => format!("{:.1}%", v),
        (Some(v), DataKind::Price) => format!("{:.2}", v),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub id_width: f32,
    pub description_width: f32,
    /// Shared by every period column and the total column.
    pub value_width: f32,
    pub row_height: f32,
    /// Formatted value cells, one row per table row.
    pub cells: Vec<Vec<String>>,
    /// Present for return tables only.
    pub extremes: Option<Extremes>,
}

impl TableLayout {
    pub fn compute(table: &ReportTable, measure: &dyn TextMeasure) -> Self {
        let header = |s: &str| measure.text_width(s, HEADER_FONT, HEADER_FONT_SIZE);
        let label = |s: &str| measure.text_width(s, LABEL_FONT, BODY_FONT_SIZE);
        let value = |s: &str| measure.text_width(s, VALUE_FONT, BODY_FONT_SIZE);
        let summary = |s: &str| measure.text_width(s, SUMMARY_FONT, BODY_FONT_SIZE);

        let cells: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| {
                row.values
                    .iter()
                    .map(|v| format_cell(*v, table.kind))
                    .collect()
            })
            .collect();

        let extremes = (!table.is_price()).then(|| table.extremes());
        let extremal_ids: Vec<&str> = extremes
            .iter()
            .flat_map(|e| e.highest.iter().chain(e.lowest.iter()))
            .flatten()
            .map(String::as_str)
            .collect();

        let id_width = table
            .rows
            .iter()
            .map(|r| label(&r.id))
            .chain(extremal_ids.iter().map(|id| summary(id)))
            .fold(header(ID_HEADER), f32::max)
            * ID_PADDING;

        let mut description_width = table
            .rows
            .iter()
            .map(|r| label(&r.description))
            .fold(header(DESCRIPTION_HEADER), f32::max)
            * DESCRIPTION_PADDING;

        if extremes.is_some() {
            let widest_label = summary(HIGHEST_LABEL).max(summary(LOWEST_LABEL));
            if widest_label > id_width + description_width {
                description_width = widest_label - id_width;
            }
        }

        let value_width = table
            .columns
            .iter()
            .map(|c| header(c))
            .chain(cells.iter().flatten().map(|c| value(c)))
            .chain(extremal_ids.iter().map(|id| summary(id)))
            .fold(0.0, f32::max)
            * VALUE_PADDING;

        Self {
            id_width,
            description_width,
            value_width,
            row_height: BODY_FONT_SIZE * ROW_HEIGHT_FACTOR,
            cells,
            extremes,
        }
    }

    /// Width of the merged ID and Description cell on summary rows.
    pub fn summary_label_width(&self) -> f32 {
        self.id_width + self.description_width
    }
}
