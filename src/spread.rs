//! Composes a ten card Celtic Cross spread onto a single canvas.
//!
//! The layout is a fixed table, [CELTIC_CROSS], mapping each slot to a top-left
//! canvas coordinate. Slot 1 ("This Crosses") is turned crosswise over slot 0.
//!
//! ```no_run
//! use tarot_layout::{compose_spread, OrientedCard};
//!
//! let art = image::open("card.png").expect("can open card");
//! let cards: Vec<OrientedCard> = (0..10)
//!     .map(|i| OrientedCard { image: &art, reversed: i % 3 == 0 })
//!     .collect();
//! let png = compose_spread(&cards).expect("ten cards compose");
//! std::fs::write("spread.png", png).expect("can write spread");
//! ```

use crate::error::LayoutError;
use crate::raster::{encode_png, white_canvas_rgba, OrientedCard};
use image::imageops;
use image::{DynamicImage, RgbImage};
use log::debug;

/// Width and height of the square spread canvas, in pixels
pub const SPREAD_CANVAS_SIZE: u32 = 1000;
/// Width of a card thumbnail before any crosswise rotation
pub const SPREAD_CARD_WIDTH: u32 = 120;
/// Height of a card thumbnail before any crosswise rotation
pub const SPREAD_CARD_HEIGHT: u32 = 180;

/// One slot of a spread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadPosition {
    /// The conventional meaning of the slot
    pub name: &'static str,
    /// Left edge of the card on the canvas
    pub x: u32,
    /// Top edge of the card on the canvas
    pub y: u32,
    /// Whether the card lies across the slot, rotated a quarter turn counter-clockwise
    pub crosswise: bool,
}

const fn slot(name: &'static str, x: u32, y: u32) -> SpreadPosition {
    SpreadPosition {
        name,
        x,
        y,
        crosswise: false,
    }
}

/// The Celtic Cross: a cross of six cards on the left and a staff of four on the right
pub const CELTIC_CROSS: [SpreadPosition; 10] = [
    slot("This Covers", 350, 450),
    SpreadPosition {
        name: "This Crosses",
        x: 325,
        y: 475,
        crosswise: true,
    },
    slot("This Is Beneath", 350, 700),
    slot("This Is Behind", 100, 450),
    slot("This Crowns", 350, 200),
    slot("This Is Before", 600, 450),
    // the staff, bottom to top
    slot("What The Querent Fears", 800, 750),
    slot("Family Opinion", 800, 550),
    slot("Hopes", 800, 350),
    slot("Final Outcome", 800, 150),
];

/// Lay the cards out on a fresh white canvas, in slot order. Exactly one card per
/// slot of [CELTIC_CROSS] is required.
pub fn compose_spread_image(cards: &[OrientedCard]) -> Result<RgbImage, LayoutError> {
    if cards.len() != CELTIC_CROSS.len() {
        return Err(LayoutError::CardCount {
            expected: CELTIC_CROSS.len(),
            found: cards.len(),
        });
    }

    let mut canvas = white_canvas_rgba(SPREAD_CANVAS_SIZE, SPREAD_CANVAS_SIZE);
    for (index, (card, position)) in cards.iter().zip(CELTIC_CROSS.iter()).enumerate() {
        let mut thumbnail = card.thumbnail(index, SPREAD_CARD_WIDTH, SPREAD_CARD_HEIGHT)?;
        if position.crosswise {
            thumbnail = imageops::rotate270(&thumbnail);
        }
        debug!(
            "placing {} card at {} ({}, {})",
            if card.reversed { "reversed" } else { "upright" },
            position.name,
            position.x,
            position.y
        );
        // blend through the thumbnail's alpha so transparent card edges show the table
        imageops::overlay(&mut canvas, &thumbnail, position.x as i64, position.y as i64);
    }

    Ok(DynamicImage::ImageRgba8(canvas).to_rgb8())
}

/// Compose the spread and encode it as a PNG
pub fn compose_spread(cards: &[OrientedCard]) -> Result<Vec<u8>, LayoutError> {
    let canvas = compose_spread_image(cards)?;
    encode_png(&canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    fn solid(colour: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(12, 18, Rgb(colour)))
    }

    fn is_blue(p: &Rgb<u8>) -> bool {
        p[2] > 200 && p[0] < 60 && p[1] < 60
    }

    fn is_red(p: &Rgb<u8>) -> bool {
        p[0] > 200 && p[1] < 60 && p[2] < 60
    }

    /// bounding box (x0, y0, x1, y1) of pixels matching `f`, inclusive
    fn bounding_box(image: &RgbImage, f: impl Fn(&Rgb<u8>) -> bool) -> Option<(u32, u32, u32, u32)> {
        let mut bbox: Option<(u32, u32, u32, u32)> = None;
        for (x, y, p) in image.enumerate_pixels() {
            if f(p) {
                bbox = Some(match bbox {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        bbox
    }

    #[test]
    fn positions_stay_on_the_canvas() {
        for position in CELTIC_CROSS.iter() {
            let (w, h) = if position.crosswise {
                (SPREAD_CARD_HEIGHT, SPREAD_CARD_WIDTH)
            } else {
                (SPREAD_CARD_WIDTH, SPREAD_CARD_HEIGHT)
            };
            assert!(position.x + w <= SPREAD_CANVAS_SIZE, "{}", position.name);
            assert!(position.y + h <= SPREAD_CANVAS_SIZE, "{}", position.name);
        }
        assert_eq!(
            CELTIC_CROSS.iter().filter(|p| p.crosswise).count(),
            1,
            "only 'This Crosses' lies crosswise"
        );
        assert!(CELTIC_CROSS[1].crosswise);
    }

    #[test]
    fn wrong_card_count_is_rejected() {
        let grey = solid([128, 128, 128]);
        let cards: Vec<OrientedCard> = (0..9).map(|_| OrientedCard::upright(&grey)).collect();
        match compose_spread(&cards) {
            Err(LayoutError::CardCount { expected, found }) => {
                assert_eq!(expected, 10);
                assert_eq!(found, 9);
            }
            other => panic!("expected a card count error, got {other:?}"),
        }
    }

    #[test]
    fn an_empty_card_image_is_an_error() {
        let grey = solid([128, 128, 128]);
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        let mut cards = vec![OrientedCard::upright(&grey); 10];
        cards[6] = OrientedCard::reversed(&empty);
        assert!(matches!(
            compose_spread(&cards),
            Err(LayoutError::EmptyImage { index: 6 })
        ));
    }

    #[test]
    fn crossing_card_is_rotated_and_placed() {
        let red = solid([255, 0, 0]);
        let blue = solid([0, 0, 255]);
        let grey = solid([128, 128, 128]);

        let mut cards = vec![OrientedCard::upright(&red), OrientedCard::upright(&blue)];
        cards.extend((2..10).map(|_| OrientedCard::upright(&grey)));

        let canvas = compose_spread_image(&cards).expect("ten cards compose");
        assert_eq!(canvas.dimensions(), (1000, 1000));

        // the crossing card is the only blue one: landscape, at its slot
        let (x0, y0, x1, y1) = bounding_box(&canvas, is_blue).expect("crossing card drawn");
        assert!(x0.abs_diff(325) <= 5 && y0.abs_diff(475) <= 5);
        assert!(x1 - x0 + 1 > y1 - y0 + 1, "crossing card lies on its side");
        assert!((x1 - x0 + 1).abs_diff(SPREAD_CARD_HEIGHT) <= 2);
        assert!((y1 - y0 + 1).abs_diff(SPREAD_CARD_WIDTH) <= 2);

        // the covering card peeks out above and below the crossing card
        let (x0, y0, x1, y1) = bounding_box(&canvas, is_red).expect("covering card drawn");
        assert!(x0.abs_diff(350) <= 5 && y0.abs_diff(450) <= 5);
        assert!(y1 - y0 + 1 > x1 - x0 + 1, "covering card stands upright");
    }

    #[test]
    fn reversed_cards_are_drawn_upside_down() {
        // top half red, bottom half blue
        let two_tone = DynamicImage::ImageRgb8(RgbImage::from_fn(60, 90, |_, y| {
            if y < 45 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        }));
        let grey = solid([128, 128, 128]);

        let mut cards = vec![OrientedCard::upright(&grey); 10];
        cards[4] = OrientedCard::upright(&two_tone);
        cards[9] = OrientedCard::reversed(&two_tone);

        let canvas = compose_spread_image(&cards).expect("ten cards compose");

        // "This Crowns" at (350, 200), upright
        assert!(is_red(canvas.get_pixel(410, 210)));
        assert!(is_blue(canvas.get_pixel(410, 370)));
        // "Final Outcome" at (800, 150), reversed
        assert!(is_blue(canvas.get_pixel(860, 160)));
        assert!(is_red(canvas.get_pixel(860, 320)));

        // the caller's image is untouched
        let source = two_tone.to_rgb8();
        assert!(is_red(source.get_pixel(0, 0)));
    }

    #[test]
    fn transparent_card_corners_show_the_white_table() {
        let mut clipped = RgbaImage::from_pixel(12, 18, Rgba([0, 0, 255, 255]));
        for y in 0..3 {
            for x in 0..12 {
                clipped.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
        let clipped = DynamicImage::ImageRgba8(clipped);
        let cards = vec![OrientedCard::upright(&clipped); 10];

        let canvas = compose_spread_image(&cards).expect("ten cards compose");
        // the transparent strip of "This Crowns" blends with the background, not black
        assert_eq!(canvas.get_pixel(410, 202), &Rgb([255, 255, 255]));
        assert!(is_blue(canvas.get_pixel(410, 300)));
    }

    #[test]
    fn composition_is_deterministic() {
        let art = DynamicImage::ImageRgb8(RgbImage::from_fn(32, 48, |x, y| {
            Rgb([(x * 7) as u8, (y * 5) as u8, ((x + y) * 3) as u8])
        }));
        let cards: Vec<OrientedCard> = (0..10)
            .map(|i| OrientedCard {
                image: &art,
                reversed: i % 2 == 1,
            })
            .collect();

        let first = compose_spread(&cards).expect("composes");
        let second = compose_spread(&cards).expect("composes");
        assert_eq!(first, second);

        let decoded = image::load_from_memory(&first).expect("valid png");
        assert_eq!(decoded.to_rgb8().dimensions(), (1000, 1000));
    }
}
