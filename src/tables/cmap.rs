//! Parsing of the `cmap` table and lookups in format 4 subtables.
//!
//! <https://docs.microsoft.com/en-us/typography/opentype/spec/cmap>

use std::cmp::Ordering;
use std::convert::TryFrom;

use log::debug;

use crate::binary::read::{ReadArray, ReadBinary, ReadCtxt, ReadFrom, ReadScope};
use crate::binary::{I16Be, U16Be, U32Be};
use crate::error::ParseError;
use crate::size;

pub struct Cmap<'a> {
    pub scope: ReadScope<'a>,
    encoding_records: ReadArray<'a, EncodingRecord>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub offset: u32,
}

pub enum CmapSubtable<'a> {
    Format4 {
        /// The subtable, starting at its format field.
        scope: ReadScope<'a>,
        language: u16,
        end_codes: ReadArray<'a, U16Be>,
        start_codes: ReadArray<'a, U16Be>,
        id_deltas: ReadArray<'a, I16Be>,
        id_range_offsets: ReadArray<'a, U16Be>,
    },
}

impl ReadBinary for Cmap<'_> {
    type HostType<'a> = Cmap<'a>;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self::HostType<'a>, ParseError> {
        let scope = ctxt.scope();
        let version = ctxt.read_u16be()?;
        ctxt.check_version(version == 0)?;
        let num_tables = usize::from(ctxt.read_u16be()?);
        let encoding_records = ctxt.read_array::<EncodingRecord>(num_tables)?;
        Ok(Cmap {
            scope,
            encoding_records,
        })
    }
}

impl ReadFrom for EncodingRecord {
    type ReadType = (U16Be, U16Be, U32Be);

    fn read_from((platform_id, encoding_id, offset): (u16, u16, u32)) -> Self {
        EncodingRecord {
            platform_id,
            encoding_id,
            offset,
        }
    }
}

impl ReadBinary for CmapSubtable<'_> {
    type HostType<'a> = CmapSubtable<'a>;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self::HostType<'a>, ParseError> {
        let scope = ctxt.scope();
        let subtable_format = ctxt.read_u16be()?;
        match subtable_format {
            4 => {
                let _length = ctxt.read_u16be()?;
                let language = ctxt.read_u16be()?;
                let seg_count_x2 = usize::from(ctxt.read_u16be()?);
                ctxt.check((seg_count_x2 & 1) == 0)?;
                let seg_count = seg_count_x2 >> 1;
                let _search_range = ctxt.read_u16be()?;
                let _entry_selector = ctxt.read_u16be()?;
                let _range_shift = ctxt.read_u16be()?;
                let end_codes = ctxt.read_array::<U16Be>(seg_count)?;
                let _reserved_pad = ctxt.read_u16be()?;
                let start_codes = ctxt.read_array::<U16Be>(seg_count)?;
                let id_deltas = ctxt.read_array::<I16Be>(seg_count)?;
                let id_range_offsets = ctxt.read_array::<U16Be>(seg_count)?;
                Ok(CmapSubtable::Format4 {
                    scope,
                    language,
                    end_codes,
                    start_codes,
                    id_deltas,
                    id_range_offsets,
                })
            }
            format => Err(ParseError::UnsupportedCmapFormat(format)),
        }
    }
}

impl<'a> Cmap<'a> {
    pub fn encoding_records(&self) -> impl Iterator<Item = EncodingRecord> + 'a {
        self.encoding_records.iter()
    }

    /// The first encoding record, which is the one used for lookups.
    pub fn first_encoding_record(&self) -> Result<EncodingRecord, ParseError> {
        self.encoding_records
            .get_item(0)
            .ok_or(ParseError::UnsuitableCmap)
    }

    /// Read the subtable referenced by `record`.
    pub fn read_subtable(&self, record: EncodingRecord) -> Result<CmapSubtable<'a>, ParseError> {
        let offset = usize::try_from(record.offset)?;
        self.scope.offset(offset).read::<CmapSubtable<'_>>()
    }

    /// Read the subtable referenced by the first encoding record.
    pub fn first_subtable(&self) -> Result<CmapSubtable<'a>, ParseError> {
        let record = self.first_encoding_record()?;
        debug!(
            "using cmap subtable for platform {} encoding {} at offset {}",
            record.platform_id, record.encoding_id, record.offset
        );
        self.read_subtable(record)
    }
}

impl<'a> CmapSubtable<'a> {
    /// Map a character to a glyph index.
    ///
    /// Returns `None` if no segment contains `ch`. A glyph index of 0 is returned as `Some(0)`
    /// when a segment maps `ch` to the missing glyph.
    pub fn map_glyph(&self, ch: u32) -> Result<Option<u16>, ParseError> {
        match *self {
            CmapSubtable::Format4 {
                ref scope,
                ref end_codes,
                ref start_codes,
                ref id_deltas,
                ref id_range_offsets,
                ..
            } => {
                // Segments are sorted by end code, so the first segment that could contain `ch`
                // is the first one whose end code is not less than it.
                let i = match end_codes.binary_search_by(|end_code| {
                    if u32::from(end_code) < ch {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    }
                }) {
                    Ok(i) | Err(i) => i,
                };
                if i >= end_codes.len() {
                    return Ok(None);
                }

                let start_code = u32::from(start_codes.read_item(i)?);
                if start_code > ch {
                    return Ok(None);
                }

                let id_delta = id_deltas.read_item(i)?;
                let id_range_offset = usize::from(id_range_offsets.read_item(i)?);
                if id_range_offset == 0 {
                    // The idDelta arithmetic is modulo 65536.
                    return Ok(Some(add_delta(ch as u16, id_delta)));
                }

                // idRangeOffset is a byte offset from the location of idRangeOffset[i] itself
                let range_offset_pos =
                    id_range_offsets.scope().base() - scope.base() + i * size::U16;
                let char_offset = usize::try_from(ch - start_code)? * size::U16;
                let glyph_id_pos = range_offset_pos + id_range_offset + char_offset;
                let glyph_id = scope
                    .offset_length(glyph_id_pos, size::U16)
                    .map_err(|_| ParseError::BadEof)?
                    .read::<U16Be>()?;
                if glyph_id == 0 {
                    Ok(Some(0))
                } else {
                    Ok(Some(add_delta(glyph_id, id_delta)))
                }
            }
        }
    }

    pub fn format(&self) -> u16 {
        match self {
            CmapSubtable::Format4 { .. } => 4,
        }
    }

    pub fn language(&self) -> u16 {
        match *self {
            CmapSubtable::Format4 { language, .. } => language,
        }
    }
}

fn add_delta(glyph_id: u16, id_delta: i16) -> u16 {
    glyph_id.wrapping_add(id_delta as u16)
}

#[cfg(test)]
mod tests {
    use super::{Cmap, CmapSubtable};
    use crate::binary::read::ReadScope;
    use crate::error::ParseError;
    use crate::tests::{cmap_table, Format4Segment};

    const TERMINAL: Format4Segment = Format4Segment {
        start_code: 0xFFFF,
        end_code: 0xFFFF,
        id_delta: 1,
        id_range_offset: 0,
    };

    fn map(data: &[u8], ch: u32) -> Result<Option<u16>, ParseError> {
        let cmap = ReadScope::new(data).read::<Cmap<'_>>()?;
        cmap.first_subtable()?.map_glyph(ch)
    }

    #[test]
    fn test_delta_segment() {
        let segment = Format4Segment {
            start_code: 0x41,
            end_code: 0x5A,
            id_delta: -29,
            id_range_offset: 0,
        };
        let data = cmap_table(&[segment, TERMINAL], &[]);
        // Every character in the segment maps to ch + delta
        for ch in 0x41..=0x5A {
            assert_eq!(map(&data, ch), Ok(Some((ch - 29) as u16)));
        }
        // One past the end code falls through to the next segment
        assert_eq!(map(&data, 0x5B), Ok(None));
        assert_eq!(map(&data, 0x66), Ok(None));
        assert_eq!(map(&data, 0x40), Ok(None));
    }

    #[test]
    fn test_delta_wraps() {
        let segment = Format4Segment {
            start_code: 0x20,
            end_code: 0x30,
            id_delta: -0x25,
            id_range_offset: 0,
        };
        let data = cmap_table(&[segment, TERMINAL], &[]);
        assert_eq!(map(&data, 0x20), Ok(Some(0xFFFB)));
        assert_eq!(map(&data, 0x25), Ok(Some(0)));
    }

    #[test]
    fn test_terminal_segment() {
        let data = cmap_table(&[TERMINAL], &[]);
        assert_eq!(map(&data, 0xFFFF), Ok(Some(0)));
        assert_eq!(map(&data, 0x10000), Ok(None));
    }

    #[test]
    fn test_range_offset_segment() {
        // Two segments, so glyphIdArray starts 4 bytes after idRangeOffset[0]
        let segment = Format4Segment {
            start_code: 0x61,
            end_code: 0x63,
            id_delta: 5,
            id_range_offset: 4,
        };
        let data = cmap_table(&[segment, TERMINAL], &[10, 0, 12]);
        assert_eq!(map(&data, 0x61), Ok(Some(15)));
        assert_eq!(map(&data, 0x62), Ok(Some(0)));
        assert_eq!(map(&data, 0x63), Ok(Some(17)));
    }

    #[test]
    fn test_range_offset_out_of_bounds() {
        let segment = Format4Segment {
            start_code: 0x61,
            end_code: 0x63,
            id_delta: 0,
            id_range_offset: 0x4000,
        };
        let data = cmap_table(&[segment, TERMINAL], &[]);
        assert_eq!(map(&data, 0x61), Err(ParseError::BadEof));
    }

    #[test]
    fn test_unsupported_format() {
        let mut data = cmap_table(&[TERMINAL], &[]);
        // Subtable format lives directly after the header and single encoding record
        data[12..14].copy_from_slice(&[0, 12]);
        let cmap = ReadScope::new(&data).read::<Cmap<'_>>().unwrap();
        assert!(matches!(
            cmap.first_subtable(),
            Err(ParseError::UnsupportedCmapFormat(12))
        ));
    }

    #[test]
    fn test_no_encoding_records() {
        let data = [0, 0, 0, 0];
        let cmap = ReadScope::new(&data).read::<Cmap<'_>>().unwrap();
        assert_eq!(cmap.encoding_records().count(), 0);
        assert!(matches!(
            cmap.first_subtable(),
            Err(ParseError::UnsuitableCmap)
        ));
    }

    #[test]
    fn test_subtable_details() {
        let data = cmap_table(&[TERMINAL], &[]);
        let cmap = ReadScope::new(&data).read::<Cmap<'_>>().unwrap();
        let record = cmap.first_encoding_record().unwrap();
        assert_eq!((record.platform_id, record.encoding_id, record.offset), (3, 1, 12));
        let subtable: CmapSubtable<'_> = cmap.first_subtable().unwrap();
        assert_eq!(subtable.format(), 4);
        assert_eq!(subtable.language(), 0);
    }
}
