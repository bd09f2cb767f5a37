//! Draws a [`ReportTable`] onto a [`PdfCanvas`]: title banner, header row,
//! data rows and, for return tables, the highest/lowest summary rows.

use super::canvas::{mm, CellStyle, PdfCanvas, Rgb};
use super::fonts::{Font, TextMeasure};
use super::layout::{
    TableLayout, BODY_FONT_SIZE, DESCRIPTION_HEADER, HEADER_FONT, HEADER_FONT_SIZE,
    HIGHEST_LABEL, ID_HEADER, LABEL_FONT, LOWEST_LABEL, SUMMARY_FONT, TITLE_FONT_SIZE, VALUE_FONT,
};
use crate::domain::content::DataKind;
use crate::domain::error::BuffetError;
use crate::domain::report_table::ReportTable;

pub const TITLE_HEIGHT: f32 = mm(6.0);
const TITLE_GAP: f32 = mm(0.5);

pub const HEADER_FILL: Rgb = Rgb(240, 240, 240);
pub const POSITIVE_FILL: Rgb = Rgb(230, 255, 230);
pub const POSITIVE_TEXT: Rgb = Rgb(0, 100, 0);
pub const NEGATIVE_FILL: Rgb = Rgb(255, 230, 230);
pub const NEGATIVE_TEXT: Rgb = Rgb(139, 0, 0);

/// Fill and text colour of a value cell. Return cells are green above zero
/// and red otherwise; price cells and empty cells stay neutral.
pub fn cell_colors(value: Option<f64>, kind: DataKind) -> (Rgb, Rgb) {
    match (value, kind) {
        (Some(v), DataKind::Return) if v > 0.0 => (POSITIVE_FILL, POSITIVE_TEXT),
        (Some(_), DataKind::Return) => (NEGATIVE_FILL, NEGATIVE_TEXT),
        _ => (Rgb::WHITE, Rgb::BLACK),
    }
}

fn style(font: Font, size: f32, fill: Rgb, text: Rgb) -> CellStyle {
    CellStyle {
        fill,
        text,
        font,
        size,
        border: true,
    }
}

/// Move to a new page when a row of `height` would cross the bottom margin.
fn ensure_room(canvas: &mut PdfCanvas, y: f32, height: f32) -> f32 {
    if canvas.fits(y, height) {
        y
    } else {
        canvas.add_page()
    }
}

/// Draw `table` starting at `start_y` and return the y just below its last
/// row, which may be on a later page.
pub fn render_table(
    canvas: &mut PdfCanvas,
    table: &ReportTable,
    measure: &dyn TextMeasure,
    start_y: f32,
) -> Result<f32, BuffetError> {
    let layout = TableLayout::compute(table, measure);
    let rh = layout.row_height;
    let left = canvas.left();

    let mut y = ensure_room(canvas, start_y, TITLE_HEIGHT + TITLE_GAP + rh);
    let title_style = CellStyle {
        border: false,
        ..style(Font::CourierBold, TITLE_FONT_SIZE, Rgb::WHITE, Rgb::BLACK)
    };
    let title_width = canvas.content_width();
    canvas.cell(left, y, title_width, TITLE_HEIGHT, &table.title, &title_style)?;
    y += TITLE_HEIGHT + TITLE_GAP;

    let header = style(HEADER_FONT, HEADER_FONT_SIZE, HEADER_FILL, Rgb::BLACK);
    let mut x = left;
    canvas.cell(x, y, layout.id_width, rh, ID_HEADER, &header)?;
    x += layout.id_width;
    canvas.cell(x, y, layout.description_width, rh, DESCRIPTION_HEADER, &header)?;
    x += layout.description_width;
    for column in &table.columns {
        canvas.cell(x, y, layout.value_width, rh, column, &header)?;
        x += layout.value_width;
    }
    y += rh;

    let label = style(LABEL_FONT, BODY_FONT_SIZE, Rgb::WHITE, Rgb::BLACK);
    for (row, cells) in table.rows.iter().zip(&layout.cells) {
        y = ensure_room(canvas, y, rh);
        let mut x = left;
        canvas.cell(x, y, layout.id_width, rh, &row.id, &label)?;
        x += layout.id_width;
        canvas.cell(x, y, layout.description_width, rh, &row.description, &label)?;
        x += layout.description_width;
        for (value, text) in row.values.iter().zip(cells) {
            let (fill, ink) = cell_colors(*value, table.kind);
            let cell = style(VALUE_FONT, BODY_FONT_SIZE, fill, ink);
            canvas.cell(x, y, layout.value_width, rh, text, &cell)?;
            x += layout.value_width;
        }
        y += rh;
    }

    if let Some(extremes) = &layout.extremes {
        let summary = style(SUMMARY_FONT, BODY_FONT_SIZE, Rgb::WHITE, Rgb::BLACK);
        for (text, ids) in [
            (HIGHEST_LABEL, &extremes.highest),
            (LOWEST_LABEL, &extremes.lowest),
        ] {
            y = ensure_room(canvas, y, rh);
            let mut x = left;
            canvas.cell(x, y, layout.summary_label_width(), rh, text, &summary)?;
            x += layout.summary_label_width();
            for id in ids {
                canvas.cell(x, y, layout.value_width, rh, id.as_deref().unwrap_or(""), &summary)?;
                x += layout.value_width;
            }
            y += rh;
        }
    }

    tracing::debug!(
        title = %table.title,
        rows = table.rows.len(),
        columns = table.columns.len(),
        end_y = y,
        "rendered table"
    );
    Ok(y)
}
