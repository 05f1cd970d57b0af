//! Print or render the outline of a single glyph
//!
//! Loads a TrueType font, resolves a character or glyph index to its simple glyph outline and
//! writes it to standard output as text or as an SVG document.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use glyphscope::error::FontError;
use glyphscope::font::Font;
use glyphscope::outline::{SvgSink, Viewport};
use glyphscope::source::FontImage;
use glyphscope::tables::glyf::GlyphOutline;

#[derive(clap::ValueEnum, Copy, Clone, Default, Debug)]
enum Format {
    /// Bounding box, contours and points as plain text.
    #[default]
    Text,
    /// An SVG document showing the contours and points.
    Svg,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The input font file.
    font: PathBuf,

    /// Character to look up in the cmap table
    #[arg(short, long, default_value_t = 'f', conflicts_with = "glyph_id")]
    char: char,

    /// Glyph index to decode, bypassing the cmap table
    #[arg(short, long)]
    glyph_id: Option<u16>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: Format,

    /// Width of the SVG drawing area, including a 50 unit margin on each side
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(MIN_SIZE..))]
    width: u32,

    /// Height of the SVG drawing area, including a 50 unit margin on each side
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(MIN_SIZE..))]
    height: u32,
}

/// Smallest drawing area that leaves room for the glyph inside the margins.
const MIN_SIZE: i64 = 2 * Viewport::MARGIN as i64 + 1;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}: {}", args.font.display(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), FontError> {
    let image = FontImage::open(&args.font)?;
    let font = Font::from_image(&image)?;
    let glyph = match args.glyph_id {
        Some(glyph_id) => font.outline_for_glyph(glyph_id)?,
        None => font.outline_for_char(args.char)?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = match args.format {
        Format::Text => write_text(&mut out, &glyph),
        Format::Svg => {
            let viewport = Viewport::fit(&glyph.bounding_box, args.width as f32, args.height as f32);
            let mut sink = SvgSink::new(viewport, &glyph.bounding_box);
            glyph.draw(&mut sink);
            svg::write(&mut out, &sink.into_document())
        }
    };
    // Output errors such as a closed pipe are not font errors
    if let Err(err) = written {
        error!("unable to write output: {}", err);
    }

    Ok(())
}

fn write_text<W: Write>(out: &mut W, glyph: &GlyphOutline) -> io::Result<()> {
    let bbox = &glyph.bounding_box;
    writeln!(
        out,
        "bounding box: ({}, {}) - ({}, {})",
        bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max
    )?;
    writeln!(
        out,
        "contours: {}, points: {}",
        glyph.number_of_contours,
        glyph.number_of_points()
    )?;

    let mut index = 0;
    for (contour_index, contour) in glyph.contours().enumerate() {
        writeln!(out, "contour {}:", contour_index)?;
        for point in contour {
            let kind = if point.on_curve { "on" } else { "off" };
            writeln!(out, "  {:>4}: ({}, {}) {}", index, point.x, point.y, kind)?;
            index += 1;
        }
    }

    Ok(())
}
