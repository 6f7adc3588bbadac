//! The deck file: every card's text and its art, base64 encoded, in one JSON document.
//!
//! ```json
//! {
//!   "major_arcana": [
//!     {
//!       "name": "The Fool",
//!       "description": "...",
//!       "divinatory_meaning": "...",
//!       "reversed": "...",
//!       "physical_description": "...",
//!       "image_base64": "iVBORw0KGgo..."
//!     }
//!   ],
//!   "minor_arcana": []
//! }
//! ```

use crate::error::LayoutError;
use crate::raster;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of cards in a complete Major Arcana
pub const MAJOR_ARCANA_COUNT: usize = 22;
/// Number of cards in a complete Minor Arcana
pub const MINOR_ARCANA_COUNT: usize = 56;

/// What a card means
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arcana {
    pub name: String,
    pub description: String,
    pub divinatory_meaning: String,
    /// The meaning when the card is drawn reversed
    pub reversed: String,
}

/// A card with its art
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagedArcana {
    #[serde(flatten)]
    pub arcana: Arcana,
    /// What the art shows
    pub physical_description: String,
    pub image_base64: String,
}

impl ImagedArcana {
    pub fn name(&self) -> &str {
        &self.arcana.name
    }

    /// Decode the card's art
    pub fn decode_image(&self) -> Result<DynamicImage, LayoutError> {
        let bytes = STANDARD.decode(self.image_base64.trim())?;
        raster::decode(&bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub major_arcana: Vec<ImagedArcana>,
    pub minor_arcana: Vec<ImagedArcana>,
}

impl Deck {
    pub fn from_json(json: &str) -> Result<Deck, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Deck, LayoutError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let deck = Deck::from_json(&json)?;
        debug!(
            "loaded {} major and {} minor arcana from {}",
            deck.major_arcana.len(),
            deck.minor_arcana.len(),
            path.display()
        );
        Ok(deck)
    }

    /// Every card, Major Arcana first
    pub fn cards(&self) -> impl Iterator<Item = &ImagedArcana> {
        self.major_arcana.iter().chain(self.minor_arcana.iter())
    }

    pub fn len(&self) -> usize {
        self.major_arcana.len() + self.minor_arcana.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether both arcana groups hold their traditional number of cards
    pub fn is_complete(&self) -> bool {
        self.major_arcana.len() == MAJOR_ARCANA_COUNT
            && self.minor_arcana.len() == MINOR_ARCANA_COUNT
    }
}

/// Decode the art of every card, stopping at the first card that fails
pub fn decode_images<'a, I>(cards: I) -> Result<Vec<DynamicImage>, LayoutError>
where
    I: IntoIterator<Item = &'a ImagedArcana>,
{
    cards
        .into_iter()
        .enumerate()
        .map(|(index, card)| {
            card.decode_image().map_err(|source| LayoutError::Decode {
                index,
                name: card.name().to_string(),
                source: Box::new(source),
            })
        })
        .collect()
}

/// A card as it came out of the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawnCard<'a> {
    pub card: &'a ImagedArcana,
    pub reversed: bool,
}

/// Shuffle the whole deck, leave out the cards named in `excluded`, and draw `count`
/// cards, each with an even chance of coming out reversed. Draws fewer cards if the
/// deck runs out.
pub fn draw_cards<'a, R: Rng + ?Sized>(
    deck: &'a Deck,
    count: usize,
    excluded: &[&str],
    rng: &mut R,
) -> Vec<DrawnCard<'a>> {
    let mut available: Vec<&ImagedArcana> = deck
        .cards()
        .filter(|card| !excluded.contains(&card.name()))
        .collect();
    available.shuffle(rng);
    available
        .into_iter()
        .take(count)
        .map(|card| DrawnCard {
            card,
            reversed: rng.gen_bool(0.5),
        })
        .collect()
}
