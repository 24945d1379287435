use std::io::{self, Write};
use thiserror::Error;

use crate::tuple::Color;

#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
#[error("pixel ({x}, {y}) is outside of the canvas ({width}, {height})")]
pub struct OutOfBounds {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Dense row-major color buffer, zero-initialised to black. Channels are
/// unbounded HDR values; clamping happens on export.
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
}

// The plain-text PPM format caps data lines at 70 characters.
const PPM_MAX_LINE: usize = 70;

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::black(); width * height],
        }
    }

    fn index_at(&self, x: usize, y: usize) -> Result<usize, OutOfBounds> {
        if x >= self.width || y >= self.height {
            return Err(OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok(y * self.width + x)
    }

    pub fn write_pixel(&mut self, x: usize, y: usize, color: Color) -> Result<(), OutOfBounds> {
        let index = self.index_at(x, y)?;
        self.pixels[index] = color;
        Ok(())
    }

    pub fn pixel_at(&self, x: usize, y: usize) -> Result<Color, OutOfBounds> {
        let index = self.index_at(x, y)?;
        Ok(self.pixels[index])
    }

    /// Plain (P3) PPM: pixels left-to-right, top-to-bottom, one row never
    /// continues the previous row's line.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;

        for row in self.pixels.chunks(self.width) {
            let mut line = String::new();
            for pixel in row {
                for channel in [pixel.r, pixel.g, pixel.b] {
                    let token = quantize(channel).to_string();
                    if line.is_empty() {
                        line.push_str(&token);
                    } else if line.len() + 1 + token.len() > PPM_MAX_LINE {
                        writeln!(out, "{line}")?;
                        line = token;
                    } else {
                        line.push(' ');
                        line.push_str(&token);
                    }
                }
            }
            writeln!(out, "{line}")?;
        }

        Ok(())
    }

    /// 8-bit RGB PNG with the same quantisation as the PPM writer.
    pub fn write_png<W: Write>(&self, out: W) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(out, self.width as u32, self.height as u32);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let data: Vec<u8> = self
            .pixels
            .iter()
            .flat_map(|pixel| [quantize(pixel.r), quantize(pixel.g), quantize(pixel.b)])
            .collect();

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&data)?;
        Ok(())
    }
}

fn quantize(channel: f64) -> u8 {
    (channel * 255.).ceil().clamp(0., 255.) as u8
}
