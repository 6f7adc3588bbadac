use crate::refs::{ObjectReferences, RefType};
use image::RgbImage;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};

/// A raster to be embedded in a PDF as an image XObject
pub struct Image {
    pub pixels: RgbImage,
}

impl Image {
    pub fn new(pixels: RgbImage) -> Image {
        Image { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn encode(&self) -> Vec<u8> {
        compress_to_vec_zlib(self.pixels.as_raw(), CompressionLevel::DefaultLevel as u8)
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.alloc(RefType::Image(image_index));
        let bytes = self.encode();

        let mut image = writer.image_xobject(id, bytes.as_slice());
        image.filter(Filter::FlateDecode);
        image.width(self.width() as i32);
        image.height(self.height() as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        image.finish();
    }
}
