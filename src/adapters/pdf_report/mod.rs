//! PDF report generation.
//!
//! Tables are stacked top to bottom on landscape A4 pages in the order given,
//! separated by a fixed gap. Column widths are measured per table with the
//! Courier metrics, so every table is sized to its own content.

pub mod canvas;
pub mod fonts;
pub mod layout;
pub mod tables;

use crate::domain::error::BuffetError;
use crate::domain::report_table::ReportTable;
use crate::ports::report_port::ReportPort;
use canvas::{mm, PdfCanvas};
use fonts::CourierMetrics;
use std::path::Path;

pub const TABLE_GAP: f32 = mm(5.0);

#[derive(Debug, Default)]
pub struct PdfReportAdapter;

impl PdfReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Render every table onto a fresh canvas. Rendering stops at the first
    /// failing table, which is removed from the canvas; the tables before it
    /// stay.
    pub fn render(&self, tables: &[ReportTable]) -> (PdfCanvas, Option<BuffetError>) {
        let mut canvas = PdfCanvas::new();
        let mut y = canvas.top();
        for (i, table) in tables.iter().enumerate() {
            if i > 0 {
                y += TABLE_GAP;
            }
            let before = canvas.checkpoint();
            match tables::render_table(&mut canvas, table, &CourierMetrics, y) {
                Ok(next) => y = next,
                Err(e) => {
                    canvas.rollback(before);
                    tracing::error!(title = %table.title, error = %e, "failed to render table");
                    return (canvas, Some(e));
                }
            }
        }
        (canvas, None)
    }
}

impl ReportPort for PdfReportAdapter {
    fn write(&self, tables: &[ReportTable], output_path: &Path) -> Result<(), BuffetError> {
        let (canvas, render_error) = self.render(tables);
        let saved = canvas.save(output_path);

        match (render_error, saved) {
            (Some(e), Err(save_error)) => {
                tracing::error!(path = %output_path.display(), error = %save_error, "failed to save report");
                Err(e)
            }
            (Some(e), Ok(())) => {
                tracing::warn!(path = %output_path.display(), pages = canvas.page_count(), "saved partial report");
                Err(e)
            }
            (None, Err(save_error)) => Err(save_error),
            (None, Ok(())) => {
                tracing::info!(
                    path = %output_path.display(),
                    tables = tables.len(),
                    pages = canvas.page_count(),
                    "report written"
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::{AssetSeries, Content, DataKind};
    use tempfile::TempDir;

    fn table(name: &str, kind: DataKind, description: &str) -> ReportTable {
        let mut c = Content::new(name, kind, vec!["01-06".into(), "01-13".into()]);
        c.data = vec![AssetSeries {
            id: "AAPL".into(),
            description: description.into(),
            timeseries: vec![0.0, 1.5],
            total: 1.5,
        }];
        ReportTable::with_totals(&c).unwrap()
    }

    #[test]
    fn writes_every_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        let tables = vec![
            table("Prior Week Asset Returns", DataKind::Return, "Apple Inc."),
            table("Weekly Asset Prices", DataKind::Price, "Apple Inc."),
        ];
        PdfReportAdapter::new().write(&tables, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn small_tables_stack_on_one_page() {
        let one = PdfReportAdapter::new().render(&[table("a", DataKind::Price, "x")]);
        assert!(one.1.is_none());
        let two = PdfReportAdapter::new().render(&[
            table("a", DataKind::Price, "x"),
            table("b", DataKind::Price, "x"),
        ]);
        assert!(two.1.is_none());
        assert_eq!(two.0.page_count(), 1);
    }

    #[test]
    fn failed_table_still_saves_earlier_tables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.pdf");
        let tables = vec![
            table("ok", DataKind::Return, "Apple Inc."),
            table("bad", DataKind::Return, "\u{1F34E}"),
            table("never", DataKind::Price, "Apple Inc."),
        ];
        let err = PdfReportAdapter::new().write(&tables, &path).unwrap_err();
        assert!(matches!(err, BuffetError::UnencodableText { .. }));
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn failed_table_leaves_no_partial_drawing() {
        let good = table("ok", DataKind::Return, "Apple Inc.");
        let (alone, _) = PdfReportAdapter::new().render(std::slice::from_ref(&good));
        let (partial, err) = PdfReportAdapter::new().render(&[
            good.clone(),
            table("bad", DataKind::Return, "\u{1F34E}"),
        ]);
        assert!(matches!(err, Some(BuffetError::UnencodableText { .. })));
        assert_eq!(partial.checkpoint(), alone.checkpoint());
    }

    #[test]
    fn empty_report_is_a_single_blank_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.pdf");
        PdfReportAdapter::new().write(&[], &path).unwrap();
        assert!(path.exists());
    }
}
