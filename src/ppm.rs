//! Binary PPM (`P6`) output.
//!
//! The container is an ASCII header, `P6\n<width> <height>\n255\n`, followed by
//! `width * height * 3` bytes of red, green and blue samples, rows top to
//! bottom, with no padding and nothing after the last pixel.

use std::io::{self, Write};

use crate::{image::Image, screen};

pub const MAGIC: &str = "P6";

pub const MAX_VALUE: u8 = 255;

pub fn header(size: screen::Size) -> String {
    format!("{}\n{} {}\n{}\n", MAGIC, size.width, size.height, MAX_VALUE)
}

/// Writes the header and channel data of `image` to `writer`.
pub fn write<W: Write>(writer: &mut W, image: &Image) -> io::Result<()> {
    writer.write_all(header(image.size()).as_bytes())?;
    writer.write_all(image.as_bytes())?;
    Ok(())
}
