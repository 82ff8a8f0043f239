//! Vector PDF output built with lopdf.
//!
//! Text uses the standard Helvetica fonts with WinAnsi encoding. A text run
//! with any character outside WinAnsi (e.g. `₹`) is set in the bundled
//! Unicode font instead, embedded as a Type0 font with a ToUnicode map.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::{debug, warn};

use super::assets::AssetRef;
use super::document::{InvoiceDocument, COLUMNS};
use super::font::{TrueTypeFont, BUNDLED_NAME};
use super::{DocumentRenderer, RenderOptions, Result};
use crate::models::invoice::Invoice;

const MARGIN: f32 = 40.0;
const FOOTER_HEIGHT: f32 = 30.0;
const ROW_HEIGHT: f32 = 18.0;
const BODY_SIZE: f32 = 9.5;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";
const UNICODE: &str = "F3";

/// Relative x positions (fractions of the content width) where each table
/// column starts, and whether it is right aligned.
const COLUMN_LAYOUT: [(f32, bool); 6] = [
    (0.0, false),
    (0.06, false),
    (0.50, true),
    (0.64, true),
    (0.78, true),
    (1.0, true),
];

/// Renders invoices to PDF bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render an already shaped document.
    pub fn render_document(
        &self,
        doc: &InvoiceDocument,
        options: &RenderOptions,
    ) -> Result<Vec<u8>> {
        let (width, height) = options.config.page_size.dimensions();
        let mut canvas = Canvas::new(width, height);

        draw_header(&mut canvas, doc);
        draw_parties(&mut canvas, doc);
        draw_meta(&mut canvas, doc);
        draw_table(&mut canvas, doc);
        draw_totals(&mut canvas, doc);
        draw_notes(&mut canvas, doc);
        draw_images(&mut canvas, doc);
        canvas.finish(&doc.footer)
    }
}

impl DocumentRenderer for PdfRenderer {
    type Output = Vec<u8>;

    fn render(&self, invoice: &Invoice, options: &RenderOptions) -> Result<Vec<u8>> {
        let doc = InvoiceDocument::build(invoice, options);
        self.render_document(&doc, options)
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}

/// Map a character to its WinAnsi byte.
fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        '\u{20}'..='\u{7e}' => Some(c as u8),
        '\u{a0}'..='\u{ff}' => Some(c as u32 as u8),
        '€' => Some(0x80),
        '‚' => Some(0x82),
        '„' => Some(0x84),
        '…' => Some(0x85),
        '‘' => Some(0x91),
        '’' => Some(0x92),
        '“' => Some(0x93),
        '”' => Some(0x94),
        '•' => Some(0x95),
        '–' => Some(0x96),
        '—' => Some(0x97),
        '™' => Some(0x99),
        _ => None,
    }
}

fn is_win_ansi(text: &str) -> bool {
    text.chars().all(|c| win_ansi_byte(c).is_some())
}

fn encode(text: &str) -> Object {
    let bytes: Vec<u8> = text.chars().map(|c| win_ansi_byte(c).unwrap_or(b'?')).collect();
    Object::String(bytes, StringFormat::Literal)
}

/// Approximate Helvetica advance width in points.
fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: f32 = text
        .chars()
        .map(|c| match c {
            '0'..='9' | '$' | '?' => 556.0,
            '.' | ',' | ' ' | ':' | ';' | 'i' | 'j' | 'l' | '\'' | '|' => 278.0,
            'f' | 't' | 'r' | 'I' | '/' | '(' | ')' | '-' => 333.0,
            'm' | 'M' | 'W' => 833.0,
            'w' | '%' => 889.0,
            'A'..='Z' => 667.0,
            _ => 556.0,
        })
        .sum();
    let factor = if bold { 1.06 } else { 1.0 };
    units * size / 1000.0 * factor
}

/// ToUnicode CMap mapping each used glyph back to its character.
fn to_unicode_cmap(glyphs: &BTreeMap<u16, char>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );
    let entries: Vec<(&u16, &char)> = glyphs.iter().collect();
    // At most 100 entries per bfchar block.
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (glyph, c) in chunk {
            let mut units = [0u16; 2];
            let target: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", glyph, target));
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}

/// Greedy word wrap to `max_width`.
fn wrap(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if !current.is_empty() && text_width(&candidate, size, false) > max_width {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    lines
}

struct Page {
    operations: Vec<Operation>,
    images: Vec<(String, ObjectId)>,
}

impl Page {
    fn new() -> Self {
        Self {
            operations: Vec::new(),
            images: Vec::new(),
        }
    }
}

/// Page-flowing drawing surface. `y` is the current baseline, moving down.
struct Canvas {
    document: Document,
    pages: Vec<Page>,
    width: f32,
    height: f32,
    y: f32,
    image_count: usize,
    unicode: Option<TrueTypeFont>,
    /// Glyphs set in the Unicode font, with the character each one shows.
    glyphs: BTreeMap<u16, char>,
}

impl Canvas {
    fn new(width: f32, height: f32) -> Self {
        Self {
            document: Document::with_version("1.5"),
            pages: vec![Page::new()],
            width,
            height,
            y: height - MARGIN,
            image_count: 0,
            unicode: TrueTypeFont::bundled()
                .map_err(|e| warn!("Unicode font unavailable, non-Latin text prints as '?': {}", e))
                .ok(),
            glyphs: BTreeMap::new(),
        }
    }

    fn left(&self) -> f32 {
        MARGIN
    }

    fn right(&self) -> f32 {
        self.width - MARGIN
    }

    fn content_width(&self) -> f32 {
        self.width - 2.0 * MARGIN
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        let last = self.pages.len() - 1;
        &mut self.pages[last].operations
    }

    /// Start a new page when fewer than `needed` points remain. Returns
    /// whether a page break happened.
    fn ensure_space(&mut self, needed: f32) -> bool {
        if self.y - needed >= MARGIN + FOOTER_HEIGHT {
            return false;
        }
        self.pages.push(Page::new());
        self.y = self.height - MARGIN;
        true
    }

    /// Width of `text` in the font it will be set in.
    fn measure(&self, text: &str, size: f32, bold: bool) -> f32 {
        match &self.unicode {
            Some(font) if !is_win_ansi(text) => font.text_width(text, size),
            _ => text_width(text, size, bold),
        }
    }

    /// Font resource and string operand for `text`.
    fn show(&mut self, text: &str, bold: bool) -> (&'static str, Object) {
        if let Some(font) = self.unicode.as_ref().filter(|_| !is_win_ansi(text)) {
            let mut bytes = Vec::with_capacity(text.len() * 2);
            for c in text.chars() {
                let glyph = font.glyph_id(c);
                if glyph != 0 {
                    self.glyphs.entry(glyph).or_insert(c);
                }
                bytes.extend(glyph.to_be_bytes());
            }
            return (UNICODE, Object::String(bytes, StringFormat::Hexadecimal));
        }
        (if bold { BOLD } else { REGULAR }, encode(text))
    }

    fn text_ops(&mut self, x: f32, y: f32, text: &str, size: f32, bold: bool) -> [Operation; 5] {
        let (font, operand) = self.show(text, bold);
        [
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![operand]),
            Operation::new("ET", vec![]),
        ]
    }

    fn text(&mut self, x: f32, y: f32, text: &str, size: f32, bold: bool) {
        if text.is_empty() {
            return;
        }
        let ops = self.text_ops(x, y, text, size, bold);
        self.ops().extend(ops);
    }

    fn text_right(&mut self, right: f32, y: f32, text: &str, size: f32, bold: bool) {
        let x = right - self.measure(text, size, bold);
        self.text(x, y, text, size, bold);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, gray: f32) {
        self.ops().extend([
            Operation::new("q", vec![]),
            Operation::new("rg", vec![gray.into(), gray.into(), gray.into()]),
            Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops().extend([
            Operation::new("q", vec![]),
            Operation::new("w", vec![0.75.into()]),
            Operation::new("RG", vec![0.6.into(), 0.6.into(), 0.6.into()]),
            Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
        self.ops().extend([
            Operation::new("q", vec![]),
            Operation::new("w", vec![width.into()]),
            Operation::new("m", vec![x1.into(), y1.into()]),
            Operation::new("l", vec![x2.into(), y2.into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Add an RGB image XObject and return its resource name.
    fn add_image(&mut self, bytes: &[u8]) -> Result<(String, u32, u32)> {
        let decoded = image::load_from_memory(bytes)?.to_rgb8();
        let (w, h) = decoded.dimensions();
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => w as i64,
                "Height" => h as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            decoded.into_raw(),
        );
        let id = self.document.add_object(stream);
        let name = format!("Im{}", self.image_count);
        self.image_count += 1;
        let last = self.pages.len() - 1;
        self.pages[last].images.push((name.clone(), id));
        Ok((name, w, h))
    }

    /// Draw an image fitted into the box at (x, y, w, h), keeping aspect ratio.
    fn image(&mut self, name: &str, px: (u32, u32), x: f32, y: f32, w: f32, h: f32) {
        let (iw, ih) = (px.0.max(1) as f32, px.1.max(1) as f32);
        let scale = (w / iw).min(h / ih);
        let (dw, dh) = (iw * scale, ih * scale);
        let (dx, dy) = (x + (w - dw) / 2.0, y + (h - dh) / 2.0);
        self.ops().extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![dw.into(), 0.into(), 0.into(), dh.into(), dx.into(), dy.into()],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Draw an asset into a box, or a labelled placeholder if it cannot be shown.
    fn asset(&mut self, asset: &AssetRef, x: f32, y: f32, w: f32, h: f32) {
        if let AssetRef::Embedded { bytes, .. } = asset {
            match self.add_image(bytes) {
                Ok((name, iw, ih)) => {
                    self.image(&name, (iw, ih), x, y, w, h);
                    return;
                }
                Err(e) => warn!("Cannot embed image, drawing placeholder: {}", e),
            }
        }
        self.fill_rect(x, y, w, h, 0.93);
        self.stroke_rect(x, y, w, h);
        let label = "Image unavailable";
        let tx = x + (w - self.measure(label, 8.0, false)) / 2.0;
        self.text(tx, y + h / 2.0 - 3.0, label, 8.0, false);
    }

    /// Embed the Unicode font with the widths of the glyphs actually used.
    fn embed_unicode_font(&mut self) -> Option<ObjectId> {
        if self.glyphs.is_empty() {
            return None;
        }
        let font = self.unicode.clone()?;
        let units = |v: i16| Object::Integer(font.to_pdf_units(v as i32));

        let file = self.document.add_object(Stream::new(
            dictionary! { "Length1" => font.data().len() as i64 },
            font.data().to_vec(),
        ));
        let descriptor = self.document.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => BUNDLED_NAME,
            "Flags" => 32,
            "FontBBox" => font.bbox.iter().map(|&v| units(v)).collect::<Vec<_>>(),
            "ItalicAngle" => 0,
            "Ascent" => units(font.ascent),
            "Descent" => units(font.descent),
            "CapHeight" => units(font.ascent),
            "StemV" => 80,
            "FontFile2" => file,
        });

        let widths: Vec<Object> = self
            .glyphs
            .keys()
            .flat_map(|&glyph| {
                let width = font.to_pdf_units(font.advance(glyph) as i32);
                [Object::Integer(glyph as i64), Object::Array(vec![width.into()])]
            })
            .collect();
        let descendant = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => BUNDLED_NAME,
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor,
            "W" => widths,
            "CIDToGIDMap" => "Identity",
        });

        let to_unicode = self.document.add_object(Stream::new(
            dictionary! {},
            to_unicode_cmap(&self.glyphs).into_bytes(),
        ));
        Some(self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => BUNDLED_NAME,
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(descendant)],
            "ToUnicode" => to_unicode,
        }))
    }

    /// Assemble pages, stamp footers and serialize.
    fn finish(mut self, footer: &str) -> Result<Vec<u8>> {
        let total = self.pages.len();
        for i in 0..total {
            let stamp = format!("{}  |  Page {} of {}", footer, i + 1, total);
            let x = (self.width - self.measure(&stamp, 8.0, false)) / 2.0;
            let ops = self.text_ops(x, MARGIN / 2.0, &stamp, 8.0, false);
            self.pages[i].operations.extend(ops);
        }

        let regular = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });

        let unicode = self.embed_unicode_font();
        let mut fonts = dictionary! {
            REGULAR => regular,
            BOLD => bold,
        };
        if let Some(id) = unicode {
            fonts.set(UNICODE, id);
        }

        let pages_id = self.document.new_object_id();
        let pages = std::mem::take(&mut self.pages);
        let mut kids = Vec::with_capacity(total);

        for page in pages {
            let content = Content {
                operations: page.operations,
            };
            let content_id = self
                .document
                .add_object(Stream::new(dictionary! {}, content.encode()?));

            let mut xobjects = Dictionary::new();
            for (name, id) in page.images {
                xobjects.set(name, id);
            }
            let resources = dictionary! {
                "Font" => fonts.clone(),
                "XObject" => xobjects,
            };

            let page_id = self.document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources,
                "MediaBox" => vec![0.into(), 0.into(), self.width.into(), self.height.into()],
            });
            kids.push(Object::Reference(page_id));
        }

        self.document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => total as i64,
            }),
        );
        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        self.document.trailer.set("Root", catalog_id);
        self.document.compress();

        let mut out = Vec::new();
        self.document.save_to(&mut out)?;
        debug!("Rendered PDF with {} pages ({} bytes)", total, out.len());
        Ok(out)
    }
}

fn draw_header(canvas: &mut Canvas, doc: &InvoiceDocument) {
    let (left, right) = (canvas.left(), canvas.right());
    let top = canvas.y - 20.0;
    canvas.text(left, top, &doc.title, 20.0, true);
    canvas.text_right(right, top, &format!("No. {}", doc.document_number), 12.0, true);
    canvas.text(left, top - 18.0, &doc.business_name, 12.0, false);
    canvas.y = top - 28.0;
    canvas.line(left, canvas.y, right, canvas.y, 1.5);
    canvas.y -= 24.0;
}

fn draw_parties(canvas: &mut Canvas, doc: &InvoiceDocument) {
    let left = canvas.left();
    let column = canvas.content_width() / 2.0;
    let start = canvas.y;
    let mut lowest = start;

    for (i, party) in [&doc.from, &doc.to].into_iter().enumerate() {
        let x = left + column * i as f32;
        let mut y = start;
        canvas.text(x, y, party.heading, 9.0, true);
        y -= 14.0;
        canvas.text(x, y, &party.name, 11.0, true);
        y -= 13.0;
        for line in wrap(&party.address, BODY_SIZE, column - 12.0) {
            canvas.text(x, y, &line, BODY_SIZE, false);
            y -= 12.0;
        }
        canvas.text(x, y, &party.phone, BODY_SIZE, false);
        y -= 12.0;
        lowest = lowest.min(y);
    }
    canvas.y = lowest - 8.0;
}

fn draw_meta(canvas: &mut Canvas, doc: &InvoiceDocument) {
    let left = canvas.left();
    let width = canvas.content_width();
    canvas.fill_rect(left, canvas.y - 8.0, width, 22.0, 0.95);

    let slot = width / doc.meta.len().max(1) as f32;
    let y = canvas.y;
    for (i, field) in doc.meta.iter().enumerate() {
        let x = left + 8.0 + slot * i as f32;
        let label = format!("{}:", field.label);
        canvas.text(x, y, &label, BODY_SIZE, true);
        let offset = canvas.measure(&label, BODY_SIZE, true) + 4.0;
        canvas.text(x + offset, y, &field.value, BODY_SIZE, false);
    }
    canvas.y -= 36.0;
}

fn column_x(canvas: &Canvas, index: usize) -> f32 {
    let (start, right_aligned) = COLUMN_LAYOUT[index];
    let x = canvas.left() + canvas.content_width() * start;
    if right_aligned && index + 1 < COLUMN_LAYOUT.len() {
        // Right edge of this column is the start of the next one, minus padding.
        canvas.left() + canvas.content_width() * COLUMN_LAYOUT[index + 1].0 - 10.0
    } else if right_aligned {
        x - 4.0
    } else {
        x + 4.0
    }
}

fn draw_table_header(canvas: &mut Canvas) {
    let (left, width) = (canvas.left(), canvas.content_width());
    canvas.fill_rect(left, canvas.y - 5.0, width, ROW_HEIGHT, 0.2);
    let y = canvas.y;
    let cells: Vec<(usize, &str)> = COLUMNS.iter().copied().enumerate().collect();
    for (i, label) in cells {
        let x = column_x(canvas, i);
        // White text on the dark band.
        canvas.ops().push(Operation::new("q", vec![]));
        canvas
            .ops()
            .push(Operation::new("rg", vec![1.into(), 1.into(), 1.into()]));
        if COLUMN_LAYOUT[i].1 {
            canvas.text_right(x, y, label, BODY_SIZE, true);
        } else {
            canvas.text(x, y, label, BODY_SIZE, true);
        }
        canvas.ops().push(Operation::new("Q", vec![]));
    }
    canvas.y -= ROW_HEIGHT;
}

fn draw_table(canvas: &mut Canvas, doc: &InvoiceDocument) {
    canvas.ensure_space(ROW_HEIGHT * 2.0);
    draw_table_header(canvas);

    let description_width =
        canvas.content_width() * (COLUMN_LAYOUT[2].0 - COLUMN_LAYOUT[1].0) - 60.0;
    for row in &doc.rows {
        let lines = wrap(&row.description, BODY_SIZE, description_width);
        let height = ROW_HEIGHT + 11.0 * (lines.len().max(1) - 1) as f32;
        if canvas.ensure_space(height) {
            draw_table_header(canvas);
        }

        let y = canvas.y;
        canvas.text(column_x(canvas, 0), y, &row.index.to_string(), BODY_SIZE, false);
        for (i, line) in lines.iter().enumerate() {
            canvas.text(column_x(canvas, 1), y - 11.0 * i as f32, line, BODY_SIZE, false);
        }
        let cells = [&row.quantity, &row.rate, &row.tax_percent, &row.amount];
        for (offset, cell) in cells.into_iter().enumerate() {
            let x = column_x(canvas, offset + 2);
            canvas.text_right(x, y, cell, BODY_SIZE, false);
        }

        canvas.y -= height;
        let (left, right) = (canvas.left(), canvas.right());
        canvas.line(left, canvas.y + 12.0, right, canvas.y + 12.0, 0.5);
    }
    canvas.y -= 8.0;
}

fn draw_totals(canvas: &mut Canvas, doc: &InvoiceDocument) {
    let right = column_x(canvas, 5);
    let label_x = canvas.left() + canvas.content_width() * 0.58;

    canvas.ensure_space(16.0 * doc.totals.len() as f32);
    for line in &doc.totals {
        let y = canvas.y;
        if line.emphasis {
            canvas.line(label_x, y + 11.0, right, y + 11.0, 0.75);
        }
        canvas.text(label_x, y, line.label, 10.0, line.emphasis);
        canvas.text_right(right, y, &line.value, 10.0, line.emphasis);
        canvas.y -= 16.0;
    }
    canvas.y -= 8.0;
}

fn draw_notes(canvas: &mut Canvas, doc: &InvoiceDocument) {
    if doc.notes.is_empty() {
        return;
    }
    let lines = wrap(&doc.notes, BODY_SIZE, canvas.content_width());
    canvas.ensure_space(16.0 + 12.0 * lines.len().min(4) as f32);
    let left = canvas.left();
    canvas.text(left, canvas.y, "Notes", 10.0, true);
    canvas.y -= 14.0;
    for line in lines {
        canvas.ensure_space(12.0);
        canvas.text(left, canvas.y, &line, BODY_SIZE, false);
        canvas.y -= 12.0;
    }
    canvas.y -= 8.0;
}

fn draw_images(canvas: &mut Canvas, doc: &InvoiceDocument) {
    if let Some(signature) = &doc.signature {
        let (w, h) = (160.0, 60.0);
        canvas.ensure_space(h + 24.0);
        let x = canvas.right() - w;
        let bottom = canvas.y - h;
        canvas.asset(signature, x, bottom, w, h);
        canvas.text_right(canvas.right(), bottom - 12.0, "Authorized Signature", BODY_SIZE, false);
        canvas.y = bottom - 28.0;
    }

    if doc.attachments.is_empty() {
        return;
    }

    let (w, h, gap) = (120.0, 90.0, 12.0);
    let per_row = ((canvas.content_width() + gap) / (w + gap)).floor().max(1.0) as usize;
    canvas.ensure_space(h + 18.0);
    let left = canvas.left();
    canvas.text(left, canvas.y, "Attachments", 10.0, true);
    canvas.y -= 8.0;

    for chunk in doc.attachments.chunks(per_row) {
        canvas.ensure_space(h + gap);
        let bottom = canvas.y - h;
        for (i, attachment) in chunk.iter().enumerate() {
            let x = canvas.left() + (w + gap) * i as f32;
            canvas.asset(attachment, x, bottom, w, h);
        }
        canvas.y = bottom - gap;
    }
}
