use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(transparent)]
    /// An I/O error occurred while writing pages or documents
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [image] failed to encode or save a raster
    Image(#[from] image::ImageError),

    #[error("expected exactly {expected} cards, got {found}")]
    /// A fixed-size layout was given the wrong number of cards
    CardCount { expected: usize, found: usize },

    #[error("card {index} ({name}) could not be decoded")]
    /// A card's stored image could not be turned into a raster
    Decode {
        index: usize,
        name: String,
        #[source]
        source: Box<LayoutError>,
    },

    #[error(transparent)]
    /// The embedded image data was not valid base64
    Base64(#[from] base64::DecodeError),

    #[error(transparent)]
    /// The deck file was not valid JSON, or did not match the deck schema
    Json(#[from] serde_json::Error),

    #[error("a {card_width}x{card_height} px card does not fit a {page_width}x{page_height} px page")]
    /// The sheet parameters leave no room for a single card
    CardDoesNotFit {
        card_width: u32,
        card_height: u32,
        page_width: u32,
        page_height: u32,
    },

    #[error("card {index} has no pixels to draw")]
    /// A card image is zero pixels wide or high
    EmptyImage { index: usize },

    #[error("a grid of {capacity} cells cannot hold {found} cards")]
    /// A grid with a fixed number of rows was given more cards than it has cells
    GridFull { capacity: usize, found: usize },

    #[error("a document needs at least one page")]
    EmptyDocument,

    #[error("the document refers to a page that does not exist")]
    PageMissing,

    #[error("a page refers to an image that was never added to the document")]
    ImageMissing,
}
