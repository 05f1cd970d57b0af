//! Error types

use crate::binary::read::ReadEof;
use crate::tag::DisplayTag;
use std::fmt;
use std::io;

/// Errors that originate when parsing binary data
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ParseError {
    BadEof,
    BadValue,
    BadVersion,
    BadOffset,
    BadIndex,
    MissingTable(u32),
    GlyphIndexOutOfRange(u16),
    UnsupportedLocaFormat(i16),
    UnsuitableCmap,
    UnsupportedCmapFormat(u16),
    EmptyGlyph,
    CompositeGlyph(i16),
    MalformedGlyph,
}

impl From<ReadEof> for ParseError {
    fn from(_error: ReadEof) -> Self {
        ParseError::BadEof
    }
}

impl From<std::num::TryFromIntError> for ParseError {
    fn from(_error: std::num::TryFromIntError) -> Self {
        ParseError::BadValue
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BadEof => write!(f, "end of data reached unexpectedly"),
            ParseError::BadValue => write!(f, "invalid value"),
            ParseError::BadVersion => write!(f, "unexpected data version"),
            ParseError::BadOffset => write!(f, "invalid data offset"),
            ParseError::BadIndex => write!(f, "invalid data index"),
            ParseError::MissingTable(tag) => {
                write!(f, "font is missing '{}' table", DisplayTag(*tag))
            }
            ParseError::GlyphIndexOutOfRange(index) => {
                write!(f, "glyph index {} is out of range", index)
            }
            ParseError::UnsupportedLocaFormat(format) => {
                write!(f, "unsupported loca format {}", format)
            }
            ParseError::UnsuitableCmap => write!(f, "no suitable cmap subtable"),
            ParseError::UnsupportedCmapFormat(format) => {
                write!(f, "cmap subtable format {} is not supported", format)
            }
            ParseError::EmptyGlyph => write!(f, "glyph has no outline data"),
            ParseError::CompositeGlyph(contours) => write!(
                f,
                "composite glyphs are not supported (number of contours {})",
                contours
            ),
            ParseError::MalformedGlyph => write!(f, "malformed glyph data"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors that originate when obtaining the bytes of a font file
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Map(io::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "unable to read font file: {}", err),
            LoadError::Map(err) => write!(f, "unable to map font file: {}", err),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) | LoadError::Map(err) => Some(err),
        }
    }
}

/// Enum that can hold load (`LoadError`) and parse errors
#[derive(Debug)]
pub enum FontError {
    Load(LoadError),
    Parse(ParseError),
}

impl From<LoadError> for FontError {
    fn from(error: LoadError) -> Self {
        FontError::Load(error)
    }
}

impl From<ParseError> for FontError {
    fn from(error: ParseError) -> Self {
        FontError::Parse(error)
    }
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::Load(err) => write!(f, "load error: {}", err),
            FontError::Parse(err) => write!(f, "parse error: {}", err),
        }
    }
}

impl std::error::Error for FontError {}
