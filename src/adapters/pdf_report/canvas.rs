//! A minimal page canvas over `lopdf`: filled and bordered text cells on
//! landscape A4 pages, saved as a PDF file.
//!
//! Positions are in points measured from the top-left corner of the page; the
//! flip to PDF's bottom-left origin happens when operations are emitted.

use super::fonts::{encode_win_ansi, Font};
use crate::domain::error::BuffetError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub const PAGE_WIDTH: f32 = 841.89;
pub const PAGE_HEIGHT: f32 = 595.28;

/// Millimetres to points.
pub const fn mm(value: f32) -> f32 {
    value * 72.0 / 25.4
}

pub const MARGIN: f32 = mm(10.0);
pub const BOTTOM_MARGIN: f32 = mm(20.0);
/// Horizontal inset of text inside a cell.
pub const CELL_MARGIN: f32 = mm(1.0);
const LINE_WIDTH: f32 = mm(0.2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    fn components(self) -> Vec<Object> {
        [self.0, self.1, self.2]
            .iter()
            .map(|c| Object::Real(*c as f32 / 255.0))
            .collect()
    }
}

/// How a single cell is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub fill: Rgb,
    pub text: Rgb,
    pub font: Font,
    pub size: f32,
    pub border: bool,
}

pub struct PdfCanvas {
    pages: Vec<Content>,
}

/// A point in the drawing history that [`PdfCanvas::rollback`] can return to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pages: usize,
    operations: usize,
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCanvas {
    /// A canvas with one empty page.
    pub fn new() -> Self {
        Self {
            pages: vec![Content { operations: vec![] }],
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Top of the writable area.
    pub fn top(&self) -> f32 {
        MARGIN
    }

    pub fn left(&self) -> f32 {
        MARGIN
    }

    /// Width between the left and right margins.
    pub fn content_width(&self) -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    /// Whether a block of `height` starting at `y` stays above the bottom
    /// margin.
    pub fn fits(&self, y: f32, height: f32) -> bool {
        y + height <= PAGE_HEIGHT - BOTTOM_MARGIN
    }

    /// Start a new page and return the y of its writable top.
    pub fn add_page(&mut self) -> f32 {
        self.pages.push(Content { operations: vec![] });
        self.top()
    }

    /// Paint one cell on the current page. Text is left aligned and
    /// vertically centred.
    pub fn cell(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        text: &str,
        style: &CellStyle,
    ) -> Result<(), BuffetError> {
        let encoded = encode_win_ansi(text)?;
        let bottom = PAGE_HEIGHT - (y + height);
        let baseline = PAGE_HEIGHT - (y + 0.5 * height + 0.3 * style.size);

        let ops = &mut self.current_page().operations;
        ops.push(Operation::new("rg", style.fill.components()));
        ops.push(Operation::new(
            "re",
            vec![x.into(), bottom.into(), width.into(), height.into()],
        ));
        if style.border {
            ops.push(Operation::new("w", vec![LINE_WIDTH.into()]));
            ops.push(Operation::new("RG", Rgb::BLACK.components()));
            ops.push(Operation::new("B", vec![]));
        } else {
            ops.push(Operation::new("f", vec![]));
        }

        if encoded.is_empty() {
            return Ok(());
        }
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![
                Object::Name(style.font.resource_name().as_bytes().to_vec()),
                style.size.into(),
            ],
        ));
        ops.push(Operation::new("rg", style.text.components()));
        ops.push(Operation::new(
            "Td",
            vec![(x + CELL_MARGIN).into(), baseline.into()],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encoded, StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
        Ok(())
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pages: self.pages.len(),
            operations: self.pages.last().map_or(0, |p| p.operations.len()),
        }
    }

    /// Discard every page and cell added since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.pages.truncate(checkpoint.pages.max(1));
        if let Some(page) = self.pages.last_mut() {
            page.operations.truncate(checkpoint.operations);
        }
    }

    fn current_page(&mut self) -> &mut Content {
        if self.pages.is_empty() {
            self.pages.push(Content { operations: vec![] });
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Assemble the page tree into a PDF document.
    pub fn to_document(&self) -> Result<Document, BuffetError> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        let mut kids = Vec::with_capacity(self.pages.len());
        for content in &self.pages {
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::from(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);
        Ok(doc)
    }

    pub fn save(&self, path: &Path) -> Result<(), BuffetError> {
        let mut doc = self.to_document()?;
        let mut writer = BufWriter::new(File::create(path)?);
        doc.save_to(&mut writer)?;
        Ok(())
    }
}
