//! Dense, edge-to-edge card grids sized for sharing online.
//!
//! Unlike print sheets, grids have no margin or padding: the canvas is split into
//! equal cells and every card fills its cell. Cells keep the physical 6.4 × 8.9 cm
//! card proportions.

use crate::error::LayoutError;
use crate::raster::{thumbnail_rgb, white_canvas};
use crate::rect::PxRect;
use image::{imageops, DynamicImage, ImageFormat, RgbImage};
use log::{debug, info};
use std::path::Path;

/// Height of a card relative to its width
pub const CARD_ASPECT: f64 = 8.9 / 6.4;

/// The shape of a grid canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Width of the canvas in pixels; the height follows from the rows
    pub canvas_width: u32,
    pub columns: u32,
    /// Fixed number of rows. If [None], just enough rows for the cards drawn
    pub rows: Option<u32>,
    /// Cards past this many are left out
    pub max_cards: Option<usize>,
}

impl GridLayout {
    /// The 22 Major Arcana, six to a row
    pub const MAJOR: GridLayout = GridLayout {
        canvas_width: 1080,
        columns: 6,
        rows: Some(22u32.div_ceil(6)),
        max_cards: Some(22),
    };

    /// The 56 Minor Arcana, one suit of fourteen per row
    pub const MINOR: GridLayout = GridLayout {
        canvas_width: 1080,
        columns: 14,
        rows: Some(4),
        max_cards: Some(56),
    };

    /// A 1080 px wide grid with `columns` columns and as many rows as the cards need
    pub fn new(columns: u32) -> GridLayout {
        GridLayout {
            canvas_width: 1080,
            columns,
            rows: None,
            max_cards: None,
        }
    }

    pub fn cell_width(&self) -> f64 {
        self.canvas_width as f64 / self.columns as f64
    }

    pub fn cell_height(&self) -> f64 {
        self.cell_width() * CARD_ASPECT
    }

    /// How many of `available` cards end up on the grid
    pub fn card_count(&self, available: usize) -> usize {
        match self.max_cards {
            Some(max) => available.min(max),
            None => available,
        }
    }

    /// Rows on a grid holding `cards` cards. Always at least one.
    pub fn row_count(&self, cards: usize) -> u32 {
        match self.rows {
            Some(rows) => rows,
            None => (cards.div_ceil(self.columns as usize) as u32).max(1),
        }
    }

    /// Canvas size in pixels for a grid holding `cards` cards
    pub fn canvas_size(&self, cards: usize) -> (u32, u32) {
        let rows = self.row_count(cards);
        (
            self.canvas_width,
            (self.cell_height() * rows as f64).floor() as u32,
        )
    }

    /// The cell of the card at `index`, row-major. Cell edges are snapped to whole
    /// pixels so neighbouring cells meet without gaps.
    pub fn cell(&self, index: usize) -> PxRect {
        let columns = self.columns as usize;
        let (column, row) = ((index % columns) as u32, (index / columns) as f64);
        // exact integer floor of column * canvas_width / columns
        let x0 = column * self.canvas_width / self.columns;
        let x1 = (column + 1) * self.canvas_width / self.columns;
        let h = self.cell_height();
        let y0 = (row * h).floor() as u32;
        let y1 = ((row + 1.0) * h).floor() as u32;
        PxRect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Draw `cards` onto a fresh white canvas, ignoring any beyond [GridLayout::max_cards].
    /// A grid with fixed rows must have a cell for every card it keeps.
    pub fn pack(&self, cards: &[DynamicImage]) -> Result<RgbImage, LayoutError> {
        // every column needs at least one pixel
        if self.columns == 0 || self.columns > self.canvas_width {
            return Err(LayoutError::CardDoesNotFit {
                card_width: 0,
                card_height: 0,
                page_width: self.canvas_width,
                page_height: 0,
            });
        }

        let count = self.card_count(cards.len());
        if count < cards.len() {
            debug!("grid holds {count} cards, leaving out {}", cards.len() - count);
        }
        if let Some(rows) = self.rows {
            let capacity = rows as usize * self.columns as usize;
            if count > capacity {
                return Err(LayoutError::GridFull {
                    capacity,
                    found: count,
                });
            }
        }

        let (width, height) = self.canvas_size(count);
        let mut canvas = white_canvas(width, height);
        for (index, card) in cards.iter().take(count).enumerate() {
            let cell = self.cell(index);
            let resized = thumbnail_rgb(card, index, cell.width, cell.height)?;
            imageops::replace(&mut canvas, &resized, cell.x as i64, cell.y as i64);
        }
        Ok(canvas)
    }
}

/// Draw `cards` in a 1080 px wide grid with `columns` columns
pub fn pack_grid(cards: &[DynamicImage], columns: u32) -> Result<RgbImage, LayoutError> {
    GridLayout::new(columns).pack(cards)
}

/// The Major Arcana grid; cards past the 22nd are ignored
pub fn pack_major_grid(cards: &[DynamicImage]) -> Result<RgbImage, LayoutError> {
    GridLayout::MAJOR.pack(cards)
}

/// The Minor Arcana grid; cards past the 56th are ignored
pub fn pack_minor_grid(cards: &[DynamicImage]) -> Result<RgbImage, LayoutError> {
    GridLayout::MINOR.pack(cards)
}

/// Save a grid as PNG
pub fn write_grid<P: AsRef<Path>>(grid: &RgbImage, path: P) -> Result<(), LayoutError> {
    let path = path.as_ref();
    grid.save_with_format(path, ImageFormat::Png)?;
    info!(
        "wrote {}x{} px grid to {}",
        grid.width(),
        grid.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(shade: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 22, Rgb([shade, 0, 255 - shade])))
    }

    fn cards(n: usize) -> Vec<DynamicImage> {
        (0..n).map(|i| solid((i * 10) as u8)).collect()
    }

    #[test]
    fn variant_canvases_have_fixed_sizes() {
        let minor_height = (1080.0 * 4.0 * 8.9 / 6.4 / 14.0_f64).floor() as u32;
        assert_eq!(GridLayout::MINOR.canvas_size(56), (1080, minor_height));
        assert_eq!(GridLayout::MINOR.canvas_size(3), (1080, minor_height));

        let major_height = (180.0 * 8.9 / 6.4 * 4.0_f64).floor() as u32;
        assert_eq!(GridLayout::MAJOR.canvas_size(22), (1080, major_height));
        assert_eq!(GridLayout::MAJOR.canvas_size(0), (1080, major_height));
    }

    #[test]
    fn cells_meet_edge_to_edge() {
        let layout = GridLayout::MINOR;
        for row in 0..4 {
            for column in 0..13 {
                let index = row * 14 + column;
                let here = layout.cell(index);
                let right = layout.cell(index + 1);
                assert_eq!(here.right(), right.x);
                assert_eq!(here.y, right.y);
                assert!(!here.intersects(&right));
            }
        }
        assert_eq!(layout.cell(13).right(), 1080);
        assert_eq!(layout.cell(14).y, layout.cell(0).bottom());
    }

    #[test]
    fn major_grid_ignores_extra_cards() {
        let deck = cards(25);
        let all = pack_major_grid(&deck).expect("packs");
        let first_22 = pack_major_grid(&deck[..22]).expect("packs");
        assert_eq!(all.dimensions(), first_22.dimensions());
        assert!(all.as_raw() == first_22.as_raw());
    }

    #[test]
    fn cards_fill_cells_row_major() {
        let deck = cards(22);
        let grid = pack_major_grid(&deck).expect("packs");
        assert_eq!(grid.width(), 1080);

        // the 8th card sits in the second row, second column
        let cell = GridLayout::MAJOR.cell(7);
        assert_eq!((cell.x, cell.y), (180, 250));
        let p = grid.get_pixel(cell.x + cell.width / 2, cell.y + cell.height / 2);
        assert!(p[0].abs_diff(70) <= 2 && p[2].abs_diff(185) <= 2);

        // the last row has room for two cards past the 22nd
        let empty = GridLayout::MAJOR.cell(23);
        assert_eq!(
            grid.get_pixel(empty.x + empty.width / 2, empty.y + empty.height / 2),
            &Rgb([255, 255, 255])
        );
    }

    #[test]
    fn free_grids_grow_with_the_cards() {
        let grid = pack_grid(&cards(7), 3).expect("packs");
        let layout = GridLayout::new(3);
        assert_eq!(layout.row_count(7), 3);
        assert_eq!(grid.dimensions(), layout.canvas_size(7));
        assert_eq!(grid.height(), (360.0 * CARD_ASPECT * 3.0).floor() as u32);
    }

    #[test]
    fn zero_columns_is_an_error() {
        assert!(pack_grid(&cards(1), 0).is_err());
        assert!(pack_grid(&cards(1), 2000).is_err());
    }

    #[test]
    fn fixed_rows_that_cannot_hold_every_card_are_an_error() {
        let layout = GridLayout {
            canvas_width: 300,
            columns: 3,
            rows: Some(1),
            max_cards: Some(5),
        };
        match layout.pack(&cards(5)) {
            Err(LayoutError::GridFull { capacity, found }) => {
                assert_eq!(capacity, 3);
                assert_eq!(found, 5);
            }
            other => panic!("expected a full grid error, got {other:?}"),
        }
        // within capacity the same grid is fine
        assert!(layout.pack(&cards(3)).is_ok());
    }

    #[test]
    fn an_empty_card_image_is_an_error() {
        let mut deck = cards(22);
        deck[10] = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert!(matches!(
            pack_major_grid(&deck),
            Err(LayoutError::EmptyImage { index: 10 })
        ));
    }
}
