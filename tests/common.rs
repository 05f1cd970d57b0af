// Builders for small in-memory fonts used by unit and integration tests.

/// A value to be written in big-endian form.
#[allow(dead_code)]
#[derive(Clone, Copy, Debug)]
pub enum TtfType {
    Raw(&'static [u8]),
    TrueTypeMagic,
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    UInt32(u32),
    Int64(i64),
}

#[allow(dead_code)]
pub fn convert(values: &[TtfType]) -> Vec<u8> {
    let mut data = Vec::with_capacity(256);
    for v in values {
        convert_type(*v, &mut data);
    }

    data
}

#[allow(dead_code)]
pub fn convert_type(value: TtfType, data: &mut Vec<u8>) {
    match value {
        TtfType::Raw(bytes) => data.extend_from_slice(bytes),
        TtfType::TrueTypeMagic => data.extend_from_slice(&[0x00, 0x01, 0x00, 0x00]),
        TtfType::UInt8(n) => data.push(n),
        TtfType::Int16(n) => data.extend_from_slice(&n.to_be_bytes()),
        TtfType::UInt16(n) => data.extend_from_slice(&n.to_be_bytes()),
        TtfType::UInt32(n) => data.extend_from_slice(&n.to_be_bytes()),
        TtfType::Int64(n) => data.extend_from_slice(&n.to_be_bytes()),
    }
}

/// Assembles an sfnt font from table data.
///
/// Records are written in the order tables are added. Each table starts on a 4-byte boundary.
#[allow(dead_code)]
#[derive(Default)]
pub struct FontBuilder {
    tables: Vec<(u32, Vec<u8>)>,
}

#[allow(dead_code)]
impl FontBuilder {
    pub fn new() -> Self {
        FontBuilder::default()
    }

    pub fn table(mut self, tag: u32, data: Vec<u8>) -> Self {
        self.tables.push((tag, data));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let num_tables = self.tables.len() as u16;
        let entry_selector = if num_tables == 0 {
            0
        } else {
            15 - num_tables.leading_zeros() as u16
        };
        let search_range = (1u16 << entry_selector) * 16;
        let range_shift = (num_tables * 16).saturating_sub(search_range);

        let mut data = convert(&[
            TtfType::TrueTypeMagic,
            TtfType::UInt16(num_tables),
            TtfType::UInt16(search_range),
            TtfType::UInt16(entry_selector),
            TtfType::UInt16(range_shift),
        ]);

        let mut offset = 12 + 16 * self.tables.len();
        for (tag, table) in &self.tables {
            for value in [
                TtfType::UInt32(*tag),
                TtfType::UInt32(0),
                TtfType::UInt32(offset as u32),
                TtfType::UInt32(table.len() as u32),
            ] {
                convert_type(value, &mut data);
            }
            offset += padded_len(table.len());
        }

        for (_, table) in &self.tables {
            data.extend_from_slice(table);
            data.resize(padded_len(data.len()), 0);
        }

        data
    }
}

#[allow(dead_code)]
fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// A `head` table with the given `indexToLocFormat`.
#[allow(dead_code)]
pub fn head_table(index_to_loc_format: i16) -> Vec<u8> {
    convert(&[
        TtfType::UInt16(1),
        TtfType::UInt16(0),
        TtfType::UInt32(0x00010000),
        TtfType::UInt32(0),
        TtfType::UInt32(0x5F0F3CF5),
        TtfType::UInt16(0),
        TtfType::UInt16(2048),
        TtfType::Int64(0),
        TtfType::Int64(0),
        TtfType::Int16(-10),
        TtfType::Int16(-200),
        TtfType::Int16(1000),
        TtfType::Int16(1500),
        TtfType::UInt16(0),
        TtfType::UInt16(8),
        TtfType::Int16(2),
        TtfType::Int16(index_to_loc_format),
        TtfType::Int16(0),
    ])
}

/// A short `loca` table. `values` are the stored values, half of the actual offsets.
#[allow(dead_code)]
pub fn short_loca_table(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_be_bytes()).collect()
}

#[allow(dead_code)]
pub fn long_loca_table(offsets: &[u32]) -> Vec<u8> {
    offsets.iter().flat_map(|offset| offset.to_be_bytes()).collect()
}

/// A segment of a format 4 `cmap` subtable.
#[allow(dead_code)]
#[derive(Clone, Copy, Debug)]
pub struct Format4Segment {
    pub start_code: u16,
    pub end_code: u16,
    pub id_delta: i16,
    pub id_range_offset: u16,
}

/// A `cmap` table with a single Windows Unicode BMP encoding record pointing at a format 4
/// subtable built from `segments` and `glyph_ids`.
#[allow(dead_code)]
pub fn cmap_table(segments: &[Format4Segment], glyph_ids: &[u16]) -> Vec<u8> {
    let seg_count = segments.len() as u16;
    let length = 16 + 8 * seg_count + 2 * glyph_ids.len() as u16;
    let mut data = convert(&[
        // header
        TtfType::UInt16(0),
        TtfType::UInt16(1),
        // encoding record
        TtfType::UInt16(3),
        TtfType::UInt16(1),
        TtfType::UInt32(12),
        // subtable
        TtfType::UInt16(4),
        TtfType::UInt16(length),
        TtfType::UInt16(0),
        TtfType::UInt16(seg_count * 2),
        // searchRange, entrySelector and rangeShift are not used for lookups
        TtfType::UInt16(0),
        TtfType::UInt16(0),
        TtfType::UInt16(0),
    ]);
    for segment in segments {
        convert_type(TtfType::UInt16(segment.end_code), &mut data);
    }
    convert_type(TtfType::UInt16(0), &mut data);
    for segment in segments {
        convert_type(TtfType::UInt16(segment.start_code), &mut data);
    }
    for segment in segments {
        convert_type(TtfType::Int16(segment.id_delta), &mut data);
    }
    for segment in segments {
        convert_type(TtfType::UInt16(segment.id_range_offset), &mut data);
    }
    for glyph_id in glyph_ids {
        convert_type(TtfType::UInt16(*glyph_id), &mut data);
    }
    data
}

/// A simple glyph with a 0,0,100,100 bounding box and no instructions.
///
/// `coordinates` holds the encoded x deltas followed by the encoded y deltas.
#[allow(dead_code)]
pub fn simple_glyph(end_pts: &[u16], flags: &[u8], coordinates: &[u8]) -> Vec<u8> {
    hinted_glyph(end_pts, &[], flags, coordinates)
}

/// Like `simple_glyph`, with `instructions` stored after the contour end points.
#[allow(dead_code)]
pub fn hinted_glyph(
    end_pts: &[u16],
    instructions: &[u8],
    flags: &[u8],
    coordinates: &[u8],
) -> Vec<u8> {
    let mut data = convert(&[
        TtfType::Int16(end_pts.len() as i16),
        TtfType::Int16(0),
        TtfType::Int16(0),
        TtfType::Int16(100),
        TtfType::Int16(100),
    ]);
    for end_pt in end_pts {
        convert_type(TtfType::UInt16(*end_pt), &mut data);
    }
    convert_type(TtfType::UInt16(instructions.len() as u16), &mut data);
    data.extend_from_slice(instructions);
    data.extend_from_slice(flags);
    data.extend_from_slice(coordinates);
    data
}

/// A single contour square with on-curve corners at (0, 0), (100, 0), (100, 100), (0, 100).
#[allow(dead_code)]
pub fn square_glyph() -> Vec<u8> {
    simple_glyph(&[3], &[0x31, 0x33, 0x35, 0x23], &[100, 100, 100])
}

/// A triangle (0, 0), (10, 0), (10, 10) with an off-curve apex, followed by a one point contour
/// at (10, 10).
#[allow(dead_code)]
pub fn triangle_glyph() -> Vec<u8> {
    simple_glyph(&[2, 3], &[0x31, 0x33, 0x34, 0x31], &[10, 10])
}

/// The header of a composite glyph followed by a component record.
#[allow(dead_code)]
pub fn composite_glyph() -> Vec<u8> {
    convert(&[
        TtfType::Int16(-1),
        TtfType::Int16(0),
        TtfType::Int16(0),
        TtfType::Int16(100),
        TtfType::Int16(100),
        // flags, glyph index and byte arguments
        TtfType::UInt16(0x0002),
        TtfType::UInt16(1),
        TtfType::UInt8(0),
        TtfType::UInt8(0),
    ])
}

/// A font with four glyphs:
///
/// * 0: empty (`.notdef`)
/// * 1: `square_glyph`, mapped from 'f'
/// * 2: `triangle_glyph`, mapped from 'g'
/// * 3: `composite_glyph`, mapped from 'c'
///
/// Every other character maps to glyph 0.
#[allow(dead_code)]
pub fn outline_font(short_loca: bool) -> Vec<u8> {
    let glyphs = [Vec::new(), square_glyph(), triangle_glyph(), composite_glyph()];
    let mut glyf = Vec::new();
    let mut offsets = vec![0u32];
    for glyph in &glyphs {
        glyf.extend_from_slice(glyph);
        // Keep offsets even so they can be stored in a short loca table
        if glyf.len() % 2 == 1 {
            glyf.push(0);
        }
        offsets.push(glyf.len() as u32);
    }

    let (loca, index_to_loc_format) = if short_loca {
        let values = offsets.iter().map(|&offset| (offset / 2) as u16).collect::<Vec<_>>();
        (short_loca_table(&values), 0)
    } else {
        (long_loca_table(&offsets), 1)
    };

    let cmap = cmap_table(
        &[
            Format4Segment {
                start_code: 0x63,
                end_code: 0x63,
                id_delta: 3 - 0x63,
                id_range_offset: 0,
            },
            Format4Segment {
                start_code: 0x66,
                end_code: 0x67,
                id_delta: 1 - 0x66,
                id_range_offset: 0,
            },
            Format4Segment {
                start_code: 0xFFFF,
                end_code: 0xFFFF,
                id_delta: 1,
                id_range_offset: 0,
            },
        ],
        &[],
    );

    FontBuilder::new()
        .table(u32::from_be_bytes(*b"cmap"), cmap)
        .table(u32::from_be_bytes(*b"glyf"), glyf)
        .table(u32::from_be_bytes(*b"head"), head_table(index_to_loc_format))
        .table(u32::from_be_bytes(*b"loca"), loca)
        .build()
}
