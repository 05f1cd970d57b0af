#![warn(rust_2018_idioms)]

//! Decoding of TrueType glyph outlines.
//!
//! Resolves a character to its glyph through the `cmap` table, locates the glyph record through
//! `head` and `loca`, and decodes the simple glyph stored in `glyf` into points and contours.

/// Reading of binary data.
pub mod binary;
pub mod error;
pub mod font;
pub mod outline;
pub mod size;
pub mod source;
pub mod tables;
pub mod tag;
