//! Standard Type1 fonts used by the report, their metrics and text encoding.

use crate::domain::error::BuffetError;

/// Glyph advance of every Courier glyph, in thousandths of an em.
const COURIER_ADVANCE: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Courier,
    CourierBold,
}

impl Font {
    pub const ALL: [Font; 2] = [Font::Courier, Font::CourierBold];

    /// PostScript name of the standard font.
    pub fn base_font(self) -> &'static str {
        match self {
            Font::Courier => "Courier",
            Font::CourierBold => "Courier-Bold",
        }
    }

    /// Name under which the font is registered in page resources.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Courier => "F1",
            Font::CourierBold => "F2",
        }
    }
}

/// Measures rendered text width in points.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font: Font, size: f32) -> f32;
}

/// Metrics of the built-in Courier faces. Courier is monospaced, so every
/// glyph has the same advance in both weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct CourierMetrics;

impl TextMeasure for CourierMetrics {
    fn text_width(&self, text: &str, _font: Font, size: f32) -> f32 {
        text.chars().count() as f32 * COURIER_ADVANCE * size / 1000.0
    }
}

/// Encode `text` for a `WinAnsiEncoding` font.
pub fn encode_win_ansi(text: &str) -> Result<Vec<u8>, BuffetError> {
    text.chars()
        .map(win_ansi_byte)
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| BuffetError::UnencodableText {
            text: text.to_string(),
        })
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match c {
            '\u{20AC}' => Some(0x80),
            '\u{201A}' => Some(0x82),
            '\u{0192}' => Some(0x83),
            '\u{201E}' => Some(0x84),
            '\u{2026}' => Some(0x85),
            '\u{2020}' => Some(0x86),
            '\u{2021}' => Some(0x87),
            '\u{02C6}' => Some(0x88),
            '\u{2030}' => Some(0x89),
            '\u{0160}' => Some(0x8A),
            '\u{2039}' => Some(0x8B),
            '\u{0152}' => Some(0x8C),
            '\u{017D}' => Some(0x8E),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '\u{2022}' => Some(0x95),
            '\u{2013}' => Some(0x96),
            '\u{2014}' => Some(0x97),
            '\u{02DC}' => Some(0x98),
            '\u{2122}' => Some(0x99),
            '\u{0161}' => Some(0x9A),
            '\u{203A}' => Some(0x9B),
            '\u{0153}' => Some(0x9C),
            '\u{017E}' => Some(0x9E),
            '\u{0178}' => Some(0x9F),
            _ => None,
        },
    }
}
