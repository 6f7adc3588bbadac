//! Physical length units and their conversion to pixels.
//!
//! PDF user space is measured in [`Pt`] (1/72 of an inch). Card and paper sizes are
//! usually quoted in [`Cm`], and rasters are laid out in whole pixels at a given
//! resolution in dots per inch.
//!
//! ```
//! use tarot_layout::{Cm, Pt};
//!
//! let card_width = Cm(6.4);
//! assert_eq!(card_width.to_px(300.0), 755);
//!
//! let inch: Pt = Cm(2.54).into();
//! assert!((inch.0 - 72.0).abs() < 1e-3);
//! ```

use derive_more::{Add, AddAssign, Deref, Display, From, Into, Sub, SubAssign, Sum};

const CM_PER_INCH: f32 = 2.54;
const PT_PER_INCH: f32 = 72.0;

/// Points, the native unit of PDF user space
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    Deref,
    From,
    Into,
    Display,
)]
pub struct Pt(pub f32);

/// Centimetres
#[derive(
    Debug, Default, Clone, Copy, PartialEq, PartialOrd, Add, Sub, AddAssign, Deref, From, Into, Display,
)]
pub struct Cm(pub f32);

impl Pt {
    /// The physical size of `px` pixels printed at `dpi`
    pub fn from_px(px: u32, dpi: f32) -> Pt {
        Pt(px as f32 * PT_PER_INCH / dpi)
    }
}

impl Cm {
    /// Number of whole pixels this length covers at `dpi`, truncated toward zero
    pub fn to_px(self, dpi: f32) -> u32 {
        (self.0 / CM_PER_INCH * dpi) as u32
    }
}

impl From<Cm> for Pt {
    fn from(value: Cm) -> Self {
        Pt(value.0 / CM_PER_INCH * PT_PER_INCH)
    }
}
