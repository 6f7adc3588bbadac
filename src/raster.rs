//! Raster helpers shared by the spread compositor and the sheet packers.

use crate::error::LayoutError;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};

/// Resampling filter used whenever a card is scaled. Cards are scaled far down from
/// their source resolution, so a nearest or triangle filter would alias.
pub const CARD_FILTER: FilterType = FilterType::Lanczos3;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const OPAQUE_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A card image together with the way it was drawn. The image is borrowed from the
/// caller, reversal only ever happens on a copy.
#[derive(Debug, Clone, Copy)]
pub struct OrientedCard<'a> {
    pub image: &'a DynamicImage,
    pub reversed: bool,
}

impl<'a> OrientedCard<'a> {
    pub fn upright(image: &'a DynamicImage) -> OrientedCard<'a> {
        OrientedCard {
            image,
            reversed: false,
        }
    }

    pub fn reversed(image: &'a DynamicImage) -> OrientedCard<'a> {
        OrientedCard {
            image,
            reversed: true,
        }
    }

    /// The card as it should be presented: a rotated copy if reversed, otherwise the
    /// source image resized directly. `index` names the card in errors.
    pub fn thumbnail(
        &self,
        index: usize,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, LayoutError> {
        ensure_drawable(self.image, index)?;
        if self.reversed {
            thumbnail(&reverse(self.image), index, width, height)
        } else {
            thumbnail(self.image, index, width, height)
        }
    }
}

/// A reversed card is turned upside down: a 180° rotation, which on a pixel grid is
/// the same mapping as mirroring both horizontally and vertically.
pub fn reverse(image: &DynamicImage) -> DynamicImage {
    image.rotate180()
}

/// An image with no pixels would resize to a blank rectangle instead of a card
fn ensure_drawable(image: &DynamicImage, index: usize) -> Result<(), LayoutError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(LayoutError::EmptyImage { index });
    }
    Ok(())
}

/// Resize to exactly `width`×`height`, ignoring the source aspect ratio
pub fn thumbnail(
    image: &DynamicImage,
    index: usize,
    width: u32,
    height: u32,
) -> Result<RgbaImage, LayoutError> {
    ensure_drawable(image, index)?;
    Ok(image.resize_exact(width, height, CARD_FILTER).to_rgba8())
}

/// Same as [thumbnail], dropping any alpha channel
pub fn thumbnail_rgb(
    image: &DynamicImage,
    index: usize,
    width: u32,
    height: u32,
) -> Result<RgbImage, LayoutError> {
    ensure_drawable(image, index)?;
    Ok(image.resize_exact(width, height, CARD_FILTER).to_rgb8())
}

pub fn white_canvas(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

pub fn white_canvas_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, OPAQUE_WHITE)
}

/// Decode a raster from its stored encoding, guessing the format from its contents
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, LayoutError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Encode a raster as PNG into memory
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, LayoutError> {
    let mut bytes: Vec<u8> = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgb8,
    )?;
    Ok(bytes)
}
