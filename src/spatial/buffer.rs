//! RGBA8 pixel storage shared by the source image, the canvas and block scratch buffers
//!
//! A thin owner of an [`image::RgbaImage`] that adds the region operations the
//! quilting passes need: bounded get/set, sub-rectangle copies and alpha
//! compositing of one buffer over another.

use crate::spatial::geometry::{Extent, Point, Rect};
use image::{Rgba, RgbaImage, imageops};

/// Fully transparent black
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Row-major RGBA8 image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new(Extent::default())
    }
}

impl PixelBuffer {
    /// Create a transparent buffer
    pub fn new(size: Extent) -> Self {
        Self {
            image: RgbaImage::new(size.width, size.height),
        }
    }

    /// Create a buffer where every pixel has the same colour
    pub fn filled(size: Extent, color: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(size.width, size.height, Rgba(color)),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Dimensions as an extent
    pub fn extent(&self) -> Extent {
        Extent::new(self.width(), self.height())
    }

    /// True for a zero-sized buffer, which is how rejected runs are reported
    pub fn is_empty(&self) -> bool {
        self.extent().is_empty()
    }

    /// Read a pixel, `None` outside the buffer
    pub fn pixel(&self, at: Point) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(at.x, at.y).copied()
    }

    /// Write a pixel; writes outside the buffer are ignored
    pub fn set_pixel(&mut self, at: Point, color: Rgba<u8>) {
        if let Some(pixel) = self.image.get_pixel_mut_checked(at.x, at.y) {
            *pixel = color;
        }
    }

    /// Raw RGBA bytes in row-major order
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Borrow the underlying image
    pub const fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Give up ownership of the underlying image
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Copy a sub-rectangle into a new buffer
    ///
    /// The rectangle is clipped to the buffer bounds.
    pub fn copy_region(&self, region: Rect) -> Self {
        let view = imageops::crop_imm(
            &self.image,
            region.origin.x,
            region.origin.y,
            region.size.width,
            region.size.height,
        );
        Self {
            image: view.to_image(),
        }
    }

    /// Reallocate to a new size, keeping the overlapping top-left content
    pub fn resize(&mut self, size: Extent) {
        let mut resized = RgbaImage::new(size.width, size.height);
        imageops::replace(&mut resized, &self.image, 0, 0);
        self.image = resized;
    }

    /// Alpha-composite `overlay` with its top-left corner at `at`
    ///
    /// Fully transparent overlay pixels leave the destination untouched and
    /// fully opaque ones replace it. Parts falling outside are clipped.
    pub fn composite(&mut self, overlay: &Self, at: Point) {
        for (x, y, src) in overlay.image.enumerate_pixels() {
            let target = Point::new(at.x + x, at.y + y);
            if let Some(dst) = self.image.get_pixel_mut_checked(target.x, target.y) {
                *dst = blend_over(*src, *dst);
            }
        }
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}

impl From<PixelBuffer> for RgbaImage {
    fn from(buffer: PixelBuffer) -> Self {
        buffer.image
    }
}

/// Source-over compositing of one straight-alpha pixel over another
fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match src.0[3] {
        0 => dst,
        255 => src,
        alpha => {
            let a = f32::from(alpha) / 255.0;
            let inv = 1.0 - a;
            let mix = |s: u8, d: u8| f32::from(s).mul_add(a, f32::from(d) * inv).round() as u8;
            let out_alpha = f32::from(dst.0[3]).mul_add(inv, f32::from(alpha)).round() as u8;
            Rgba([
                mix(src.0[0], dst.0[0]),
                mix(src.0[1], dst.0[1]),
                mix(src.0[2], dst.0[2]),
                out_alpha,
            ])
        }
    }
}

/// Per-channel linear interpolation between two colours, alpha included
pub fn lerp_color(from: Rgba<u8>, to: Rgba<u8>, t: f32) -> Rgba<u8> {
    let mix = |a: u8, b: u8| (f32::from(b) - f32::from(a)).mul_add(t, f32::from(a)).round() as u8;
    Rgba([
        mix(from.0[0], to.0[0]),
        mix(from.0[1], to.0[1]),
        mix(from.0[2], to.0[2]),
        mix(from.0[3], to.0[3]),
    ])
}
