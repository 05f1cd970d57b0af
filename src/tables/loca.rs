//! Parsing of the `loca` table.
//!
//! > The indexToLoc table stores the offsets to the locations of the glyphs in the font, relative
//! > to the beginning of the glyphData table.
//!
//! <https://docs.microsoft.com/en-us/typography/opentype/spec/loca>

use crate::binary::read::{ReadArray, ReadBinaryDep, ReadCtxt};
use crate::binary::{U16Be, U32Be};
use crate::error::ParseError;
use crate::size;
use crate::tables::IndexToLocFormat;

/// `loca` table
///
/// <https://docs.microsoft.com/en-us/typography/opentype/spec/loca>
#[derive(Clone, Debug)]
pub struct LocaTable<'a> {
    pub offsets: LocaOffsets<'a>,
}

#[derive(Clone, Debug)]
pub enum LocaOffsets<'a> {
    Short(ReadArray<'a, U16Be>),
    Long(ReadArray<'a, U32Be>),
}

impl<'b> ReadBinaryDep for LocaTable<'b> {
    type Args<'a> = IndexToLocFormat;
    type HostType<'a> = LocaTable<'a>;

    /// Read a `loca` table from `ctxt`
    ///
    /// The number of entries is derived from the length of the table, so `ctxt` must cover
    /// exactly the `loca` table. `index_to_loc_format` comes from the `head` table.
    fn read_dep<'a>(
        ctxt: &mut ReadCtxt<'a>,
        index_to_loc_format: IndexToLocFormat,
    ) -> Result<Self::HostType<'a>, ParseError> {
        let table_length = ctxt.scope().len();
        let offsets = match index_to_loc_format {
            IndexToLocFormat::Short => {
                // The actual local offset divided by 2 is stored.
                LocaOffsets::Short(ctxt.read_array::<U16Be>(table_length / size::U16)?)
            }
            IndexToLocFormat::Long => {
                LocaOffsets::Long(ctxt.read_array::<U32Be>(table_length / size::U32)?)
            }
        };

        Ok(LocaTable { offsets })
    }
}

impl<'a> LocaTable<'a> {
    /// Number of glyphs described by this table, one less than the number of offsets.
    pub fn num_glyphs(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// The `(offset, length)` of the glyph at `glyph_index` within the `glyf` table.
    ///
    /// A length of zero is valid and denotes a glyph without an outline.
    pub fn glyph_range(&self, glyph_index: u16) -> Result<(u32, u32), ParseError> {
        let index = usize::from(glyph_index);
        if index >= self.num_glyphs() {
            return Err(ParseError::GlyphIndexOutOfRange(glyph_index));
        }

        let start = self.offsets.get(index).ok_or(ParseError::BadIndex)?;
        let end = self.offsets.get(index + 1).ok_or(ParseError::BadIndex)?;
        let length = end.checked_sub(start).ok_or(ParseError::BadOffset)?;
        Ok((start, length))
    }
}

impl<'a> LocaOffsets<'a> {
    /// Iterate the offsets in this table.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }

    /// Returns the number of offsets in the table.
    pub fn len(&self) -> usize {
        match self {
            LocaOffsets::Short(array) => array.len(),
            LocaOffsets::Long(array) => array.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a specified offset from the table at `index`.
    pub fn get(&self, index: usize) -> Option<u32> {
        match self {
            LocaOffsets::Short(array) => array.get_item(index).map(|offset| u32::from(offset) * 2),
            LocaOffsets::Long(array) => array.get_item(index),
        }
    }

    /// Get the last offset in the table.
    ///
    /// Returns `None` if the table is empty.
    pub fn last(&self) -> Option<u32> {
        self.len().checked_sub(1).and_then(|index| self.get(index))
    }
}
