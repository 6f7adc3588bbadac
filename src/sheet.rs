//! Packs card images onto printable pages.
//!
//! Cards are tiled in a grid, row-major and in input order, with a fixed margin
//! around the page and fixed padding between cards. How many cards fit is derived
//! from the physical paper and card sizes at the print resolution; with the default
//! [SheetLayout] (A4 paper, 6.4 × 8.9 cm cards, 300 DPI) that is a 3 × 3 grid.
//!
//! ```no_run
//! use tarot_layout::{write_print_sheets, SheetLayout};
//!
//! let cards = vec![image::open("fool.png").expect("can open card")];
//! let output = write_print_sheets(&cards, &SheetLayout::default(), "output_cards")
//!     .expect("can write sheets");
//! println!("wrote {}", output.pdf.display());
//! ```

use crate::document::Document;
use crate::error::LayoutError;
use crate::info::Info;
use crate::raster::{thumbnail_rgb, white_canvas};
use crate::rect::PxRect;
use crate::units::Cm;
use image::{imageops, DynamicImage, ImageFormat, RgbImage};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Physical description of a print sheet. All pixel values are at `dpi`.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub paper_width: Cm,
    pub paper_height: Cm,
    pub card_width: Cm,
    pub card_height: Cm,
    /// Print resolution, in dots per inch
    pub dpi: f32,
    /// Blank space between the page edge and the outermost cards, in pixels
    pub margin: u32,
    /// Blank space between neighbouring cards, in pixels
    pub padding: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        SheetLayout {
            paper_width: Cm(21.0),
            paper_height: Cm(29.7),
            card_width: Cm(6.4),
            card_height: Cm(8.9),
            dpi: 300.0,
            margin: 50,
            padding: 20,
        }
    }
}

/// Pixel geometry derived from a [SheetLayout]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetGeometry {
    pub page_width: u32,
    pub page_height: u32,
    pub card_width: u32,
    pub card_height: u32,
    pub margin: u32,
    pub padding: u32,
    pub cards_per_row: u32,
    pub cards_per_column: u32,
}

impl SheetGeometry {
    pub fn cards_per_page(&self) -> usize {
        self.cards_per_row as usize * self.cards_per_column as usize
    }

    /// Number of pages needed to hold `cards` cards
    pub fn page_count(&self, cards: usize) -> usize {
        cards.div_ceil(self.cards_per_page())
    }

    pub fn page_rect(&self) -> PxRect {
        PxRect::new(0, 0, self.page_width, self.page_height)
    }

    /// Where the card at `slot` (0-based, within its page) is drawn
    pub fn card_rect(&self, slot: usize) -> PxRect {
        let slot = slot as u32;
        let row = slot / self.cards_per_row;
        let column = slot % self.cards_per_row;
        PxRect::new(
            self.margin + column * (self.card_width + self.padding),
            self.margin + row * (self.card_height + self.padding),
            self.card_width,
            self.card_height,
        )
    }
}

impl SheetLayout {
    /// Convert the physical layout to pixels. Fails if not even one card fits inside
    /// the margins.
    pub fn geometry(&self) -> Result<SheetGeometry, LayoutError> {
        let page_width = self.paper_width.to_px(self.dpi);
        let page_height = self.paper_height.to_px(self.dpi);
        let card_width = self.card_width.to_px(self.dpi);
        let card_height = self.card_height.to_px(self.dpi);

        // the last card in a row or column needs no trailing padding
        let fit = |page: u32, card: u32| -> Option<u32> {
            let room = page
                .checked_add(self.padding)?
                .checked_sub(self.margin.checked_mul(2)?)?;
            room.checked_div(card.checked_add(self.padding)?)
        };
        let cards_per_row = fit(page_width, card_width).unwrap_or(0);
        let cards_per_column = fit(page_height, card_height).unwrap_or(0);

        if card_width == 0 || card_height == 0 || cards_per_row == 0 || cards_per_column == 0 {
            return Err(LayoutError::CardDoesNotFit {
                card_width,
                card_height,
                page_width,
                page_height,
            });
        }

        let geometry = SheetGeometry {
            page_width,
            page_height,
            card_width,
            card_height,
            margin: self.margin,
            padding: self.padding,
            cards_per_row,
            cards_per_column,
        };
        debug!(
            "{}x{} px pages hold {}x{} cards of {}x{} px",
            page_width, page_height, cards_per_row, cards_per_column, card_width, card_height
        );
        Ok(geometry)
    }

    /// Tile `cards` onto as many pages as needed. No cards means no pages.
    pub fn pack(&self, cards: &[DynamicImage]) -> Result<Vec<RgbImage>, LayoutError> {
        let geometry = self.geometry()?;
        let per_page = geometry.cards_per_page();
        cards
            .chunks(per_page)
            .enumerate()
            .map(|(page_index, page_cards)| -> Result<RgbImage, LayoutError> {
                let mut page = white_canvas(geometry.page_width, geometry.page_height);
                for (slot, card) in page_cards.iter().enumerate() {
                    let rect = geometry.card_rect(slot);
                    let index = page_index * per_page + slot;
                    let resized = thumbnail_rgb(card, index, rect.width, rect.height)?;
                    imageops::replace(&mut page, &resized, rect.x as i64, rect.y as i64);
                }
                Ok(page)
            })
            .collect()
    }
}

/// Tile `cards` onto A4 pages using the default [SheetLayout]
pub fn pack_print_sheets(cards: &[DynamicImage]) -> Result<Vec<RgbImage>, LayoutError> {
    SheetLayout::default().pack(cards)
}

/// Serialize page rasters, in order, into one PDF with one page per raster. At least
/// one page is required.
pub fn render_print_pdf(pages: Vec<RgbImage>, dpi: f32) -> Result<Vec<u8>, LayoutError> {
    let mut doc = Document::default();
    doc.set_info(Info::print_sheets(pages.len()));
    for page in pages {
        doc.add_raster_page(page, dpi);
    }
    doc.render()
}

/// The files produced by [write_print_sheets]
#[derive(Debug, Clone)]
pub struct PrintSheets {
    /// The token shared by every file of this call
    pub token: Uuid,
    /// One PNG per page, in page order
    pub pages: Vec<PathBuf>,
    /// All pages as a single PDF
    pub pdf: PathBuf,
}

/// Pack `cards`, write every page as a PNG into `out_dir` and all pages together as a
/// PDF. File names carry a fresh token so concurrent calls sharing a directory never
/// collide. If anything fails, the files this call already wrote are removed again.
/// With no cards there is nothing to print, so nothing is written.
pub fn write_print_sheets<P: AsRef<Path>>(
    cards: &[DynamicImage],
    layout: &SheetLayout,
    out_dir: P,
) -> Result<PrintSheets, LayoutError> {
    let out_dir = out_dir.as_ref();
    if cards.is_empty() {
        return Err(LayoutError::EmptyDocument);
    }
    let pages = layout.pack(cards)?;
    let page_count = pages.len();
    std::fs::create_dir_all(out_dir)?;

    let token = Uuid::new_v4();
    let mut written: Vec<PathBuf> = Vec::with_capacity(page_count + 1);
    match write_outputs(pages, layout.dpi, out_dir, token, &mut written) {
        Ok(pdf) => {
            info!(
                "wrote {} card(s) on {} page(s) to {}",
                cards.len(),
                page_count,
                pdf.display()
            );
            Ok(PrintSheets {
                token,
                pages: written.into_iter().filter(|p| *p != pdf).collect(),
                pdf,
            })
        }
        Err(e) => {
            for path in written.iter() {
                if let Err(remove_error) = std::fs::remove_file(path) {
                    warn!("could not clean up {}: {remove_error}", path.display());
                }
            }
            Err(e)
        }
    }
}

fn write_outputs(
    pages: Vec<RgbImage>,
    dpi: f32,
    out_dir: &Path,
    token: Uuid,
    written: &mut Vec<PathBuf>,
) -> Result<PathBuf, LayoutError> {
    for (i, page) in pages.iter().enumerate() {
        let path = out_dir.join(format!("cards_{token}_page_{}.png", i + 1));
        written.push(path.clone());
        page.save_with_format(&path, ImageFormat::Png)?;
        debug!("wrote page {} to {}", i + 1, path.display());
    }

    let pdf = out_dir.join(format!("{token}.pdf"));
    let bytes = render_print_pdf(pages, dpi)?;
    written.push(pdf.clone());
    std::fs::write(&pdf, bytes)?;
    Ok(pdf)
}
