use crate::{
    image::Image,
    info::Info,
    page::Page,
    refs::{ObjectReferences, RefType},
    units::Pt,
    LayoutError,
};
use id_arena::{Arena, Id};
use image::RgbImage;
use log::debug;
use pdf_writer::{Finish, Pdf, Ref};

#[derive(Default)]
/// A document collects pages and the rasters drawn on them, then renders them out
/// with a call to [Document::render]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub images: Arena<Image>,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    /// Add an image to the document structure. Images are stored document-wide, so any
    /// page can place an image by its id.
    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    /// Append a page showing nothing but `raster`, sized so the raster prints at `dpi`
    pub fn add_raster_page(&mut self, raster: RgbImage, dpi: f32) -> Id<Page> {
        let width = Pt::from_px(raster.width(), dpi);
        let height = Pt::from_px(raster.height(), dpi);
        let image = self.add_image(Image::new(raster));
        let mut page = Page::new(width, height);
        page.add_full_bleed_image(image);
        self.add_page(page)
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// Render the document to PDF bytes. The whole document is rendered in memory, so
    /// a large number of big rasters will take a correspondingly large amount of memory.
    /// A document without pages is an error; a page tree with no kids is not a usable PDF.
    pub fn render(self) -> Result<Vec<u8>, LayoutError> {
        if self.page_order.is_empty() {
            return Err(LayoutError::EmptyDocument);
        }
        let Document {
            info,
            pages,
            page_order,
            images,
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.alloc(RefType::Catalog);
        let page_tree_id = refs.alloc(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        // page refs are keyed by position in the document, not by arena index
        let page_refs: Vec<Ref> = (0..page_order.len())
            .map(|i| refs.alloc(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (i, image) in images.iter() {
            image.write(&mut refs, i.index(), &mut writer);
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages.get(*id).ok_or(LayoutError::PageMissing)?;
            page.write(&mut refs, page_index, &mut writer)?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        let bytes = writer.finish();
        debug!(
            "rendered {} page(s) into {} PDF bytes",
            page_order.len(),
            bytes.len()
        );
        Ok(bytes.to_vec())
    }
}
