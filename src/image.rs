//! Frame buffers.

use log::trace;
use rayon::prelude::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};

use crate::{kernel, pixel::Rgb, screen};

/// One frame: `width * height` pixels, row-major, top row first.
pub struct Image {
    size: screen::Size,
    pixels: Vec<Rgb>,
}

impl Image {
    pub fn new(size: screen::Size) -> Self {
        Self {
            size,
            pixels: vec![Rgb::BLACK; size.pixel_count()],
        }
    }

    /// Renders the frame at `time` seconds.
    pub fn render(size: screen::Size, time: f32) -> Self {
        let mut image = Self::new(size);
        image.fill(time);
        image
    }

    /// Evaluates the kernel for every pixel. Pixels are independent, so rows
    /// are filled in parallel.
    pub fn fill(&mut self, time: f32) {
        trace!("begin render (t = {})", time);

        let size = self.size;
        self.pixels
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, pixel)| {
                let (x, y) = size.position(index);
                *pixel = kernel::shade(x, y, time, size);
            });

        trace!("end render (t = {})", time);
    }

    pub fn size(&self) -> screen::Size {
        self.size
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Rgb {
        self.pixels[y as usize * self.size.width as usize + x as usize]
    }

    /// Channel data in file order: red, green, blue per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_image_is_black() {
        let image = Image::new(screen::Size::new(3, 2));
        assert_eq!(image.pixels().len(), 6);
        assert!(image.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn parallel_fill_matches_sequential_scan() {
        let size = screen::Size::new(48, 27);
        let image = Image::render(size, 0.5);

        let mut expected = Vec::with_capacity(size.pixel_count());
        for y in 0..size.height {
            for x in 0..size.width {
                expected.push(kernel::shade(x, y, 0.5, size));
            }
        }
        assert_eq!(image.pixels(), &expected[..]);
        assert_eq!(image.get(5, 3), kernel::shade(5, 3, 0.5, size));
    }

    #[test]
    fn bytes_are_three_per_pixel() {
        let size = screen::Size::new(16, 9);
        let image = Image::render(size, 0.0);
        assert_eq!(image.as_bytes().len(), size.pixel_count() * 3);

        let last = image.get(15, 8);
        assert_eq!(
            &image.as_bytes()[image.as_bytes().len() - 3..],
            &[last.red, last.green, last.blue]
        );
    }
}
