//! SVG rendering of two dated series on independent y axes, with optional
//! recession shading.

use crate::domain::error::BuffetError;
use chrono::NaiveDate;

const LEFT_COLOR: &str = "#1f77b4";
const RIGHT_COLOR: &str = "#ff7f0e";
const Y_TICKS: usize = 5;
const X_TICKS: usize = 6;

/// A named series of `(date, value)` points.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedSeries {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl DatedSeries {
    pub fn new(label: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    fn value_range(&self) -> Option<(f64, f64)> {
        let values = self.points.iter().map(|p| p.1).filter(|v| v.is_finite());
        values.fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recession {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    pub width: f64,
    pub height: f64,
}

impl ChartOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: 1200.0,
            height: 600.0,
        }
    }
}

/// Parse a tab-delimited recession table with `Start` and `End` columns.
/// When a `Type` column is present only rows whose type is blank or
/// `Recession` are kept.
pub fn parse_recessions(content: &str) -> Result<Vec<Recession>, BuffetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = rdr.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let (start_idx, end_idx) = match (position("Start"), position("End")) {
        (Some(s), Some(e)) => (s, e),
        (s, e) => {
            let columns = [("Start", s), ("End", e)]
                .iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            return Err(BuffetError::MissingColumns {
                source_name: "recessions".to_string(),
                columns,
            });
        }
    };
    let type_idx = position("Type");

    let parse = |raw: &str| {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| BuffetError::InvalidData {
            reason: format!("invalid recession date {:?}", raw),
        })
    };

    let mut periods = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if let Some(i) = type_idx {
            let kind = record.get(i).unwrap_or_default().trim();
            if !kind.is_empty() && kind != "Recession" {
                continue;
            }
        }
        periods.push(Recession {
            start: parse(record.get(start_idx).unwrap_or_default())?,
            end: parse(record.get(end_idx).unwrap_or_default())?,
        });
    }
    Ok(periods)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    min_date: NaiveDate,
    days: f64,
}

impl Frame {
    fn x(&self, date: NaiveDate) -> f64 {
        let offset = (date - self.min_date).num_days() as f64;
        self.left + offset / self.days * self.width
    }

    fn y(&self, value: f64, (lo, hi): (f64, f64)) -> f64 {
        let range = hi - lo;
        let scale = if range > 0.0 { self.height / range } else { 0.0 };
        let centre = if range > 0.0 { 0.0 } else { self.height / 2.0 };
        self.top + self.height - (value - lo) * scale - centre
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

fn polyline(series: &DatedSeries, frame: &Frame, range: (f64, f64), style: &str) -> String {
    let points: Vec<String> = series
        .points
        .iter()
        .filter(|p| p.1.is_finite())
        .map(|&(date, value)| format!("{:.1},{:.1}", frame.x(date), frame.y(value, range)))
        .collect();
    format!(
        r#"<polyline fill="none" {} stroke-width="1.5" points="{}"/>"#,
        style,
        points.join(" ")
    )
}

/// Render `left` and `right` against a shared date axis. Recession periods
/// that overlap the plotted dates are drawn as grey bands behind the lines.
/// Returns an empty string when neither series has a point.
pub fn dual_axis_svg(
    left: &DatedSeries,
    right: &DatedSeries,
    recessions: &[Recession],
    options: &ChartOptions,
) -> String {
    let dates = left.points.iter().chain(&right.points).map(|p| p.0);
    let (Some(min_date), Some(max_date)) = (dates.clone().min(), dates.max()) else {
        return String::new();
    };

    let (width, height) = (options.width, options.height);
    let frame = Frame {
        left: 80.0,
        top: 50.0,
        width: width - 160.0,
        height: height - 110.0,
        min_date,
        days: ((max_date - min_date).num_days() as f64).max(1.0),
    };
    let left_range = left.value_range().unwrap_or((0.0, 1.0));
    let right_range = right.value_range().unwrap_or((0.0, 1.0));

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" font-family="sans-serif">"#,
        width, height, width, height
    );
    svg.push_str(&format!(
        r#"<rect width="{:.0}" height="{:.0}" fill="white"/>"#,
        width, height
    ));

    let visible: Vec<&Recession> = recessions
        .iter()
        .filter(|r| r.start <= max_date && r.end >= min_date)
        .collect();
    for r in &visible {
        let x0 = frame.x(r.start.max(min_date));
        let x1 = frame.x(r.end.min(max_date));
        svg.push_str(&format!(
            r#"<rect class="recession" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="gray" fill-opacity="0.2"/>"#,
            x0,
            frame.top,
            (x1 - x0).max(0.5),
            frame.height
        ));
    }

    // Grid and y ticks on both sides.
    for i in 0..=Y_TICKS {
        let t = i as f64 / Y_TICKS as f64;
        let y = frame.bottom() - t * frame.height;
        let lv = left_range.0 + t * (left_range.1 - left_range.0);
        let rv = right_range.0 + t * (right_range.1 - right_range.0);
        svg.push_str(&format!(
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#000" stroke-opacity="0.3" stroke-width="0.5"/>"##,
            frame.left,
            y,
            frame.right(),
            y
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end" fill="{}">{:.1}</text>"#,
            frame.left - 6.0,
            y + 4.0,
            LEFT_COLOR,
            lv
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="11" fill="{}">{:.1}</text>"#,
            frame.right() + 6.0,
            y + 4.0,
            RIGHT_COLOR,
            rv
        ));
    }

    for i in 0..=X_TICKS {
        let offset = (frame.days * i as f64 / X_TICKS as f64).round() as i64;
        let date = min_date + chrono::Duration::days(offset);
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle">{}</text>"#,
            frame.x(date),
            frame.bottom() + 18.0,
            date.format("%Y-%m")
        ));
    }

    svg.push_str(&format!(
        r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="#000"/>"##,
        frame.left, frame.top, frame.width, frame.height
    ));

    svg.push_str(&polyline(
        left,
        &frame,
        left_range,
        &format!(r#"stroke="{}""#, LEFT_COLOR),
    ));
    svg.push_str(&polyline(
        right,
        &frame,
        right_range,
        &format!(r#"stroke="{}" stroke-dasharray="6,4""#, RIGHT_COLOR),
    ));

    svg.push_str(&format!(
        r#"<text x="{:.1}" y="30" font-size="16" text-anchor="middle">{}</text>"#,
        width / 2.0,
        escape(&options.title)
    ));

    // Legend, upper left inside the plot.
    let mut entries = vec![
        (LEFT_COLOR, "", left.label.as_str()),
        (RIGHT_COLOR, r#" stroke-dasharray="6,4""#, right.label.as_str()),
    ];
    if !visible.is_empty() {
        entries.push(("gray", "", "Recession"));
    }
    for (i, (color, dash, label)) in entries.iter().enumerate() {
        let y = frame.top + 16.0 + 16.0 * i as f64;
        let x = frame.left + 10.0;
        if *label == "Recession" {
            svg.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="20" height="8" fill="gray" fill-opacity="0.2"/>"#,
                x,
                y - 6.0
            ));
        } else {
            svg.push_str(&format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1.5"{}/>"#,
                x,
                y - 2.0,
                x + 20.0,
                y - 2.0,
                color,
                dash
            ));
        }
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
            x + 26.0,
            y + 2.0,
            escape(label)
        ));
    }

    svg.push_str("</svg>");
    svg
}
