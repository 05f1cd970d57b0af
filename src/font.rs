//! A decoding session over the tables of one font.

use std::convert::TryFrom;

use log::{debug, trace};

use crate::binary::read::ReadScope;
use crate::error::ParseError;
use crate::source::FontImage;
use crate::tables::cmap::Cmap;
use crate::tables::glyf::GlyphOutline;
use crate::tables::loca::LocaTable;
use crate::tables::{HeadTable, OffsetTable, TableRecord};
use crate::tag::{self, DisplayTag};

/// A font whose table directory has been read.
///
/// `Font` borrows the bytes of the font. The table directory is parsed once when the font is
/// created and reused for every lookup.
pub struct Font<'a> {
    scope: ReadScope<'a>,
    offset_table: OffsetTable<'a>,
}

impl<'a> Font<'a> {
    pub fn new(scope: ReadScope<'a>) -> Result<Font<'a>, ParseError> {
        let offset_table = scope.read::<OffsetTable<'_>>()?;
        debug!(
            "sfnt version {} with {} tables",
            DisplayTag(offset_table.sfnt_version),
            offset_table.table_records.len()
        );
        Ok(Font {
            scope,
            offset_table,
        })
    }

    pub fn from_image(image: &'a FontImage) -> Result<Font<'a>, ParseError> {
        Font::new(image.scope())
    }

    pub fn offset_table(&self) -> &OffsetTable<'a> {
        &self.offset_table
    }

    /// Find the record of the table with the given tag.
    pub fn find_table(&self, tag: u32) -> Result<TableRecord, ParseError> {
        let record = self.offset_table.find_table(tag)?;
        trace!(
            "table '{}' at offset {} length {}",
            DisplayTag(tag),
            record.offset,
            record.length
        );
        Ok(record)
    }

    /// The bytes of the table with the given tag.
    pub fn table_scope(&self, tag: u32) -> Result<ReadScope<'a>, ParseError> {
        self.find_table(tag)?.read_table(&self.scope)
    }

    pub fn load_head(&self) -> Result<HeadTable, ParseError> {
        self.table_scope(tag::HEAD)?.read::<HeadTable>()
    }

    /// True if the `loca` table of this font uses 16-bit offsets.
    pub fn is_short_loca_format(&self) -> Result<bool, ParseError> {
        Ok(self.load_head()?.is_short_loca_format())
    }

    pub fn load_loca(&self, head: &HeadTable) -> Result<LocaTable<'a>, ParseError> {
        self.table_scope(tag::LOCA)?
            .read_dep::<LocaTable<'_>>(head.index_to_loc_format)
    }

    /// The `(offset, length)` of a glyph's record within `glyf`.
    pub fn resolve_glyph_range(
        &self,
        glyph_index: u16,
        head: &HeadTable,
    ) -> Result<(u32, u32), ParseError> {
        let (offset, length) = self.load_loca(head)?.glyph_range(glyph_index)?;
        debug!(
            "glyph {} at offset {} length {}",
            glyph_index, offset, length
        );
        Ok((offset, length))
    }

    pub fn load_cmap(&self) -> Result<Cmap<'a>, ParseError> {
        self.table_scope(tag::CMAP)?.read::<Cmap<'_>>()
    }

    /// Map a Unicode scalar value to a glyph index.
    ///
    /// Characters not covered by the first `cmap` subtable map to glyph 0 (`.notdef`).
    pub fn glyph_index_for_codepoint(&self, unicode: u32) -> Result<u16, ParseError> {
        let glyph_index = self
            .load_cmap()?
            .first_subtable()?
            .map_glyph(unicode)?
            .unwrap_or(0);
        debug!("U+{:04X} maps to glyph {}", unicode, glyph_index);
        Ok(glyph_index)
    }

    /// Decode the simple glyph stored at `offset` in `glyf`.
    ///
    /// Only the `length` bytes of the glyph record are read. A record that does not lie entirely
    /// within `glyf` fails with `ParseError::BadEof`.
    pub fn decode_simple_glyph(&self, offset: u32, length: u32) -> Result<GlyphOutline, ParseError> {
        if length == 0 {
            return Err(ParseError::EmptyGlyph);
        }

        let glyf = self.table_scope(tag::GLYF)?;
        let offset = usize::try_from(offset)?;
        let length = usize::try_from(length)?;
        glyf.offset_length(offset, length)
            .map_err(|_| ParseError::BadEof)?
            .read::<GlyphOutline>()
    }

    pub fn outline_for_glyph(&self, glyph_index: u16) -> Result<GlyphOutline, ParseError> {
        let head = self.load_head()?;
        let (offset, length) = self.resolve_glyph_range(glyph_index, &head)?;
        self.decode_simple_glyph(offset, length)
    }

    /// Decode the outline of the glyph `ch` maps to.
    pub fn outline_for_char(&self, ch: char) -> Result<GlyphOutline, ParseError> {
        let glyph_index = self.glyph_index_for_codepoint(u32::from(ch))?;
        self.outline_for_glyph(glyph_index)
    }
}
