//! Lays out tarot card art: a Celtic Cross spread on a single canvas, printable A4
//! sheets (as PNG pages and one PDF), and dense card grids for sharing.

mod deck;
pub use deck::*;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod grid;
pub use grid::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

mod page;
pub use page::*;

pub mod raster;
pub use raster::OrientedCard;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod sheet;
pub use sheet::*;

mod spread;
pub use spread::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
