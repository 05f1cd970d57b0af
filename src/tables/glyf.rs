//! Parsing of simple glyph records in the `glyf` table.
//!
//! > This table contains information that describes the glyphs in the font in the TrueType outline
//! > format. Information regarding the rasterizer (scaler) refers to the TrueType rasterizer.
//!
//! <https://docs.microsoft.com/en-us/typography/opentype/spec/glyf>

use std::iter;

use bitflags::bitflags;
use itertools::Itertools;
use log::trace;

use crate::binary::read::{ReadBinary, ReadCtxt, ReadFrom, ReadScope};
use crate::binary::{I16Be, U16Be, U8};
use crate::error::ParseError;

bitflags! {
    #[rustfmt::skip]
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct SimpleGlyphFlag: u8 {
        const ON_CURVE_POINT                       = 0b00000001;
        const X_SHORT_VECTOR                       = 0b00000010;
        const Y_SHORT_VECTOR                       = 0b00000100;
        const REPEAT_FLAG                          = 0b00001000;
        const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR = 0b00010000;
        const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR = 0b00100000;
    }
}

/// The largest run a single repeat count byte can describe.
const MAX_FLAG_RUN: usize = 256;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BoundingBox {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

/// A point of a glyph outline in font units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i16,
    pub y: i16,
    pub on_curve: bool,
}

/// A decoded simple glyph.
///
/// The outline owns its data and does not borrow from the font it was read from.
#[derive(Debug, PartialEq, Clone)]
pub struct GlyphOutline {
    pub bounding_box: BoundingBox,
    pub number_of_contours: i16,
    /// Index of the last point of each contour, strictly increasing.
    pub end_pts_of_contours: Vec<u16>,
    /// One flag per point with repeats expanded. The raw flag byte is kept, so the
    /// `REPEAT_FLAG` bit may be set.
    pub flags: Vec<SimpleGlyphFlag>,
    pub points: Vec<Point>,
}

impl ReadBinary for BoundingBox {
    type HostType<'a> = Self;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self, ParseError> {
        let x_min = ctxt.read::<I16Be>()?;
        let y_min = ctxt.read::<I16Be>()?;
        let x_max = ctxt.read::<I16Be>()?;
        let y_max = ctxt.read::<I16Be>()?;

        Ok(BoundingBox {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }
}

impl BoundingBox {
    pub fn width(&self) -> i32 {
        i32::from(self.x_max) - i32::from(self.x_min)
    }

    pub fn height(&self) -> i32 {
        i32::from(self.y_max) - i32::from(self.y_min)
    }
}

impl ReadBinary for GlyphOutline {
    type HostType<'a> = Self;

    /// Read a simple glyph. `ctxt` must be limited to the glyph's record in `glyf`.
    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self, ParseError> {
        let number_of_contours = ctxt.read_i16be()?;
        let bounding_box = ctxt.read::<BoundingBox>()?;
        if number_of_contours <= 0 {
            return Err(ParseError::CompositeGlyph(number_of_contours));
        }

        // Cast is safe as we've checked value is positive above
        let end_pts_of_contours = ctxt
            .read_array::<U16Be>(number_of_contours as usize)
            .map_err(|_| ParseError::MalformedGlyph)?
            .to_vec();
        if !end_pts_of_contours
            .iter()
            .tuple_windows()
            .all(|(prev, next)| prev < next)
        {
            return Err(ParseError::MalformedGlyph);
        }

        let instruction_length = ctxt.read_u16be().map_err(|_| ParseError::MalformedGlyph)?;
        ctxt.read_slice(usize::from(instruction_length))
            .map_err(|_| ParseError::MalformedGlyph)?;

        // end_pts_of_contours stores the index of the end points.
        // Therefore the number of points is the last index + 1
        let number_of_points = end_pts_of_contours
            .last()
            .map_or(0, |&last| usize::from(last) + 1);
        trace!(
            "simple glyph: {} contours, {} points, {} bytes of instructions",
            number_of_contours,
            number_of_points,
            instruction_length
        );

        let flags = read_flags(ctxt, number_of_points)?;
        let xs = read_coordinates(
            ctxt,
            &flags,
            SimpleGlyphFlag::x_is_short,
            SimpleGlyphFlag::x_is_same_or_positive,
        )?;
        let ys = read_coordinates(
            ctxt,
            &flags,
            SimpleGlyphFlag::y_is_short,
            SimpleGlyphFlag::y_is_same_or_positive,
        )?;

        let points = flags
            .iter()
            .zip(xs.into_iter().zip(ys))
            .map(|(flag, (x, y))| Point {
                x,
                y,
                on_curve: flag.is_on_curve(),
            })
            .collect();

        Ok(GlyphOutline {
            bounding_box,
            number_of_contours,
            end_pts_of_contours,
            flags,
            points,
        })
    }
}

/// Read `count` run-length encoded flags.
///
/// A flag with `REPEAT_FLAG` set is followed by a byte holding the number of additional copies.
/// A run that would produce more than `count` flags is an error.
fn read_flags(ctxt: &mut ReadCtxt<'_>, count: usize) -> Result<Vec<SimpleGlyphFlag>, ParseError> {
    let mut flags = Vec::with_capacity(count);
    while flags.len() < count {
        let flag = ctxt
            .read::<SimpleGlyphFlag>()
            .map_err(|_| ParseError::MalformedGlyph)?;
        if flag.is_repeated() {
            // + 1 to include the current entry
            let run = usize::from(ctxt.read_u8().map_err(|_| ParseError::MalformedGlyph)?) + 1;
            if flags.len() + run > count {
                return Err(ParseError::MalformedGlyph);
            }
            flags.extend(iter::repeat(flag).take(run));
        } else {
            flags.push(flag);
        }
    }

    Ok(flags)
}

/// Read one axis of delta encoded coordinates and resolve them into absolute values.
///
/// The first delta is relative to 0. Accumulation wraps at 16 bits.
fn read_coordinates(
    ctxt: &mut ReadCtxt<'_>,
    flags: &[SimpleGlyphFlag],
    is_short: fn(SimpleGlyphFlag) -> bool,
    is_same_or_positive: fn(SimpleGlyphFlag) -> bool,
) -> Result<Vec<i16>, ParseError> {
    let mut value = 0i16;
    flags
        .iter()
        .map(|&flag| {
            let delta = if is_short(flag) {
                let magnitude = i16::from(ctxt.read::<U8>()?);
                if is_same_or_positive(flag) {
                    magnitude
                } else {
                    -magnitude
                }
            } else if is_same_or_positive(flag) {
                0
            } else {
                ctxt.read::<I16Be>()?
            };
            value = value.wrapping_add(delta);
            Ok(value)
        })
        .collect::<Result<Vec<_>, ParseError>>()
        .map_err(|_| ParseError::MalformedGlyph)
}

/// Expand run-length encoded flag bytes into `count` flags.
pub fn expand_flags(data: &[u8], count: usize) -> Result<Vec<SimpleGlyphFlag>, ParseError> {
    read_flags(&mut ReadScope::new(data).ctxt(), count)
}

/// Run-length encode `flags`.
///
/// Runs of identical flags that carry `REPEAT_FLAG` are collapsed into a flag byte followed by
/// a repeat count, split into chunks of at most 256. Flags without `REPEAT_FLAG` are written
/// one byte each, since a reader would not expect a count after them.
pub fn compress_flags(flags: &[SimpleGlyphFlag]) -> Vec<u8> {
    let mut data = Vec::with_capacity(flags.len());
    for (count, flag) in flags.iter().dedup_with_count() {
        if flag.is_repeated() {
            let mut remaining = count;
            while remaining > 0 {
                let run = remaining.min(MAX_FLAG_RUN);
                data.push(flag.bits());
                data.push((run - 1) as u8);
                remaining -= run;
            }
        } else {
            data.extend(iter::repeat(flag.bits()).take(count));
        }
    }
    data
}

impl ReadFrom for SimpleGlyphFlag {
    type ReadType = U8;

    fn read_from(flag: u8) -> Self {
        SimpleGlyphFlag::from_bits_retain(flag)
    }
}

impl SimpleGlyphFlag {
    pub fn is_on_curve(self) -> bool {
        self.contains(Self::ON_CURVE_POINT)
    }

    pub fn x_is_short(self) -> bool {
        self.contains(Self::X_SHORT_VECTOR)
    }

    pub fn y_is_short(self) -> bool {
        self.contains(Self::Y_SHORT_VECTOR)
    }

    pub fn is_repeated(self) -> bool {
        self.contains(Self::REPEAT_FLAG)
    }

    pub fn x_is_same_or_positive(self) -> bool {
        self.contains(Self::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR)
    }

    pub fn y_is_same_or_positive(self) -> bool {
        self.contains(Self::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR)
    }
}

impl GlyphOutline {
    pub fn number_of_points(&self) -> usize {
        self.points.len()
    }

    /// On-curve flag of each point, in point order.
    pub fn on_curve_flags(&self) -> impl Iterator<Item = bool> + '_ {
        self.points.iter().map(|point| point.on_curve)
    }

    /// The points of each contour.
    pub fn contours(&self) -> impl Iterator<Item = &[Point]> {
        self.end_pts_of_contours.iter().scan(0, move |i, &end| {
            let start = *i;
            let end = usize::from(end);
            *i = end + 1;
            self.points.get(start..=end)
        })
    }

    /// Straight line segments joining consecutive points of each contour.
    ///
    /// The last point of a contour is joined back to its first.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.contours().flat_map(|contour| {
            let next = contour.iter().cycle().skip(1);
            contour.iter().copied().zip(next.copied())
        })
    }
}
