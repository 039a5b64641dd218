use crate::foundation::core::{Canvas, Rect, Rgba8};

/// A block of RGBA8 pixels, as exchanged with a [`Surface`].
///
/// Pixels are straight (non-premultiplied) alpha, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl ImageData {
    /// A fully transparent block.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    /// Size of the block.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the block.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some(Rgba8::new(px[0], px[1], px[2], px[3]))
    }
}

/// The drawing primitives the animator needs from its host.
///
/// Coordinates are pixels with the origin at the top-left corner. Implementations clip every
/// operation to their bounds; nothing here can fail.
pub trait Surface {
    /// Pixel columns.
    fn width(&self) -> u32;

    /// Pixel rows.
    fn height(&self) -> u32;

    /// Reset the pixels under `rect` to transparent black.
    fn clear_rect(&mut self, rect: Rect);

    /// Composite `color` over the pixels under `rect` (source-over).
    fn fill_rect(&mut self, rect: Rect, color: Rgba8);

    /// Allocate a transparent pixel block compatible with [`Surface::put_image_data`].
    fn create_image_data(&mut self, width: u32, height: u32) -> ImageData;

    /// Copy out the pixels of the given block; parts outside the surface read as transparent.
    fn get_image_data(&self, x: u32, y: u32, width: u32, height: u32) -> ImageData;

    /// Replace the pixels at `(x, y)` with `image`, without compositing.
    fn put_image_data(&mut self, image: &ImageData, x: u32, y: u32);

    /// Size of the surface.
    fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Clear everything.
    fn clear(&mut self) {
        let bounds = self.canvas().bounds();
        self.clear_rect(bounds);
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn clear_rect(&mut self, rect: Rect) {
        (**self).clear_rect(rect)
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        (**self).fill_rect(rect, color)
    }

    fn create_image_data(&mut self, width: u32, height: u32) -> ImageData {
        (**self).create_image_data(width, height)
    }

    fn get_image_data(&self, x: u32, y: u32, width: u32, height: u32) -> ImageData {
        (**self).get_image_data(x, y, width, height)
    }

    fn put_image_data(&mut self, image: &ImageData, x: u32, y: u32) {
        (**self).put_image_data(image, x, y)
    }
}
