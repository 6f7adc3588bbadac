use crate::image::Image;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::*;
use crate::LayoutError;
use id_arena::Id;
use pdf_writer::{Content, Finish, Name, Pdf};

/// An image placed on a page
#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image: Id<Image>,
    /// Where the image is drawn, in PDF user space (origin at the bottom-left)
    pub position: Rect,
}

pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// The placed images, drawn in order
    pub contents: Vec<ImageLayout>,
}

impl Page {
    pub fn new(width: Pt, height: Pt) -> Page {
        Page {
            media_box: Rect::from_size(width, height),
            contents: Vec::default(),
        }
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(image);
    }

    /// Stretch an image over the whole page
    pub fn add_full_bleed_image(&mut self, image: Id<Image>) {
        self.add_image(ImageLayout {
            image,
            position: self.media_box,
        });
    }

    fn render(&self) -> Vec<u8> {
        let mut content = Content::new();
        for placed in self.contents.iter() {
            let p = &placed.position;
            content.save_state();
            content.transform([*p.width(), 0.0, 0.0, *p.height(), *p.x1, *p.y1]);
            content.x_object(Name(image_name(placed.image).as_bytes()));
            content.restore_state();
        }
        content.finish().to_vec()
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        writer: &mut Pdf,
    ) -> Result<(), LayoutError> {
        let id = refs.get(RefType::Page(page_index)).ok_or(LayoutError::PageMissing)?;
        let page_tree = refs.get(RefType::PageTree).ok_or(LayoutError::PageMissing)?;
        let content_id = refs.alloc(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.parent(page_tree);
        page.contents(content_id);

        let mut resources = page.resources();
        let mut x_objects = resources.x_objects();
        for placed in self.contents.iter() {
            let image_ref = refs
                .get(RefType::Image(placed.image.index()))
                .ok_or(LayoutError::ImageMissing)?;
            x_objects.pair(Name(image_name(placed.image).as_bytes()), image_ref);
        }
        x_objects.finish();
        resources.finish();
        page.finish();

        let rendered = self.render();
        writer.stream(content_id, rendered.as_slice());
        Ok(())
    }
}

fn image_name(image: Id<Image>) -> String {
    format!("I{}", image.index())
}
