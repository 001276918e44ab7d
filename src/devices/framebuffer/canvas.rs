//! Off-screen backing buffer the compositor draws into.
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::{
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use embedded_graphics_core::{draw_target::DrawTarget, pixelcolor::Rgb888, Pixel};

use crate::devices::framebuffer::color::Color;
use crate::error::{GfxError, Result};

/// Byte order of the color channels inside one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    /// Blue in the lowest byte: the packed color written little-endian.
    #[default]
    Bgr,
    Rgb,
}

/// Packed pixel buffer, `width * height * bytes_per_pixel` bytes, no padding
/// between rows.
pub struct Canvas {
    buffer: Vec<u8>,
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
    order: ChannelOrder,
}

impl Canvas {
    /// Allocates a zeroed buffer for the given resolution and color depth
    /// (in bits). Depths below 24 cannot hold a three-byte pixel.
    pub fn new(width: usize, height: usize, depth: u8, order: ChannelOrder) -> Result<Self> {
        let bytes_per_pixel = usize::from(depth / 8);
        if bytes_per_pixel < 3 {
            return Err(GfxError::InvalidGeometry);
        }
        let len = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(bytes_per_pixel))
            .ok_or(GfxError::ResourceExhausted)?;

        let mut buffer = Vec::new();
        buffer.try_reserve_exact(len)?;
        buffer.resize(len, 0);

        Ok(Self {
            buffer,
            width,
            height,
            bytes_per_pixel,
            order,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.bytes_per_pixel * self.width
    }

    pub fn offset(&self, x: usize, y: usize) -> usize {
        x * self.bytes_per_pixel + y * self.stride()
    }

    /// Writes one pixel, rejecting coordinates outside the buffer.
    pub fn putpixel(&mut self, x: i32, y: i32, color: Color) -> Result<()> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Err(GfxError::InvalidGeometry);
        }
        // SAFETY: bounds checked above.
        unsafe { self.putpixel_unchecked(x as usize, y as usize, color) };
        Ok(())
    }

    /// Writes one pixel without bounds checking.
    ///
    /// # Safety
    ///
    /// `x < width` and `y < height` must hold.
    pub unsafe fn putpixel_unchecked(&mut self, x: usize, y: usize, color: Color) {
        let offset = self.offset(x, y);
        let hex = color.to_hex();
        let low = [hex as u8, (hex >> 8) as u8, (hex >> 16) as u8];
        let bytes = match self.order {
            ChannelOrder::Bgr => low,
            ChannelOrder::Rgb => [low[2], low[1], low[0]],
        };
        self.buffer
            .get_unchecked_mut(offset..offset + 3)
            .copy_from_slice(&bytes);
    }

    /// Reads a pixel back, `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.offset(x, y);
        let px = &self.buffer[offset..offset + 3];
        Some(match self.order {
            ChannelOrder::Bgr => Color::new(px[2], px[1], px[0]),
            ChannelOrder::Rgb => Color::new(px[0], px[1], px[2]),
        })
    }

    /// Fill entire canvas with a color
    pub fn clear(&mut self, color: Color) {
        let area = self.bounding_box();
        self.fill_rect(area, color);
    }

    /// Fill a rectangular region, clipped to the canvas
    pub fn fill_rect(&mut self, area: Rectangle, color: Color) {
        area.into_styled(PrimitiveStyle::with_fill(color.to_rgb888()))
            .draw(self)
            .ok();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// One packed row, empty past the last row.
    pub fn row(&self, y: usize) -> &[u8] {
        if y >= self.height {
            return &[];
        }
        let start = y * self.stride();
        &self.buffer[start..start + self.stride()]
    }

    /// Frees the buffer; the canvas reports a zero size afterwards.
    pub fn release(&mut self) {
        self.buffer = Vec::new();
        self.width = 0;
        self.height = 0;
    }

    pub fn is_released(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
                continue;
            }
            // SAFETY: bounds checked above.
            unsafe { self.putpixel_unchecked(x as usize, y as usize, color.into()) };
        }
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}
