//! Glyph lookup and metrics for the bundled Unicode TrueType font.
//!
//! Only what PDF embedding needs is read: the Unicode BMP `cmap`
//! (format 4), horizontal advances, units per em and the font box.

use std::collections::BTreeMap;

use crate::error::RenderError;

/// DejaVu Sans, see `fonts/LICENSE`.
pub(super) const BUNDLED: &[u8] = include_bytes!("../../fonts/DejaVuSans.ttf");
pub(super) const BUNDLED_NAME: &str = "DejaVuSans";

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    data.get(at..at + 2).map(|b| u16::from_be_bytes([b[0], b[1]]))
}

fn read_i16(data: &[u8], at: usize) -> Option<i16> {
    read_u16(data, at).map(|v| v as i16)
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    data.get(at..at + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

fn malformed(what: &str) -> RenderError {
    RenderError::Font(format!("malformed TrueType data: {}", what))
}

#[derive(Debug, Clone)]
pub(super) struct TrueTypeFont {
    data: &'static [u8],
    cmap: usize,
    hmtx: usize,
    num_h_metrics: u16,
    pub units_per_em: u16,
    /// xMin, yMin, xMax, yMax in font units.
    pub bbox: [i16; 4],
    pub ascent: i16,
    pub descent: i16,
}

impl TrueTypeFont {
    pub fn bundled() -> Result<Self, RenderError> {
        Self::parse(BUNDLED)
    }

    pub fn parse(data: &'static [u8]) -> Result<Self, RenderError> {
        let num_tables = read_u16(data, 4).ok_or_else(|| malformed("offset table"))?;
        let mut tables = BTreeMap::new();
        for i in 0..num_tables as usize {
            let record = 12 + 16 * i;
            let tag = data
                .get(record..record + 4)
                .ok_or_else(|| malformed("table directory"))?;
            let offset = read_u32(data, record + 8).ok_or_else(|| malformed("table directory"))?;
            tables.insert(tag.to_vec(), offset as usize);
        }
        let table = |tag: &str| {
            tables
                .get(tag.as_bytes())
                .copied()
                .ok_or_else(|| malformed(&format!("missing {} table", tag)))
        };

        let head = table("head")?;
        let units_per_em = read_u16(data, head + 18)
            .filter(|&v| v > 0)
            .ok_or_else(|| malformed("head"))?;
        let mut bbox = [0i16; 4];
        for (i, value) in bbox.iter_mut().enumerate() {
            *value = read_i16(data, head + 36 + 2 * i).ok_or_else(|| malformed("head"))?;
        }

        let hhea = table("hhea")?;
        let ascent = read_i16(data, hhea + 4).ok_or_else(|| malformed("hhea"))?;
        let descent = read_i16(data, hhea + 6).ok_or_else(|| malformed("hhea"))?;
        let num_h_metrics = read_u16(data, hhea + 34)
            .filter(|&v| v > 0)
            .ok_or_else(|| malformed("hhea"))?;

        let cmap = find_unicode_cmap(data, table("cmap")?).ok_or_else(|| malformed("cmap"))?;

        Ok(Self {
            data,
            cmap,
            hmtx: table("hmtx")?,
            num_h_metrics,
            units_per_em,
            bbox,
            ascent,
            descent,
        })
    }

    /// Glyph for `c`, or 0 (`.notdef`) when the font has none.
    pub fn glyph_id(&self, c: char) -> u16 {
        u16::try_from(c as u32)
            .ok()
            .and_then(|code| self.lookup(code))
            .unwrap_or(0)
    }

    fn lookup(&self, code: u16) -> Option<u16> {
        let data = self.data;
        let seg_count = (read_u16(data, self.cmap + 6)? / 2) as usize;
        let ends = self.cmap + 14;
        // A reserved pad word follows the end codes.
        let starts = ends + 2 * seg_count + 2;
        let deltas = starts + 2 * seg_count;
        let range_offsets = deltas + 2 * seg_count;

        for i in 0..seg_count {
            if read_u16(data, ends + 2 * i)? < code {
                continue;
            }
            let start = read_u16(data, starts + 2 * i)?;
            if start > code {
                return Some(0);
            }
            let delta = read_u16(data, deltas + 2 * i)?;
            let range_offset = read_u16(data, range_offsets + 2 * i)? as usize;
            if range_offset == 0 {
                return Some(code.wrapping_add(delta));
            }
            let at = range_offsets + 2 * i + range_offset + 2 * (code - start) as usize;
            let glyph = read_u16(data, at)?;
            return Some(if glyph == 0 { 0 } else { glyph.wrapping_add(delta) });
        }
        Some(0)
    }

    /// Advance width of `glyph` in font units.
    pub fn advance(&self, glyph: u16) -> u16 {
        // Glyphs past the last long metric share its advance.
        let index = glyph.min(self.num_h_metrics - 1) as usize;
        read_u16(self.data, self.hmtx + 4 * index).unwrap_or(0)
    }

    /// Scale font units to the 1/1000 em units PDF font dictionaries use.
    pub fn to_pdf_units(&self, value: i32) -> i64 {
        (value as i64 * 1000) / self.units_per_em as i64
    }

    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| self.advance(self.glyph_id(c)) as u32)
            .sum();
        units as f32 * size / self.units_per_em as f32
    }

    pub fn data(&self) -> &'static [u8] {
        self.data
    }
}

/// Offset of the Windows Unicode BMP (or Unicode platform) format 4 subtable.
fn find_unicode_cmap(data: &[u8], cmap: usize) -> Option<usize> {
    let count = read_u16(data, cmap + 2)? as usize;
    (0..count).find_map(|i| {
        let record = cmap + 4 + 8 * i;
        let platform = read_u16(data, record)?;
        let encoding = read_u16(data, record + 2)?;
        let offset = cmap + read_u32(data, record + 4)? as usize;
        let unicode = matches!((platform, encoding), (3, 1) | (0, 3));
        (unicode && read_u16(data, offset)? == 4).then_some(offset)
    })
}
