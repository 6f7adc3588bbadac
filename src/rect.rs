use crate::units::*;

/// A rectangle in PDF user space, specified by two opposite corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the first (typically, lower-left) corner.
    pub x1: Pt,
    /// The y-coordinate of the first (typically, lower-left) corner.
    pub y1: Pt,
    /// The x-coordinate of the second (typically, upper-right) corner.
    pub x2: Pt,
    /// The y-coordinate of the second (typically, upper-right) corner.
    pub y2: Pt,
}

impl Rect {
    /// A rectangle with its lower-left corner at the origin
    pub fn from_size(width: Pt, height: Pt) -> Rect {
        Rect {
            x1: Pt(0.0),
            y1: Pt(0.0),
            x2: width,
            y2: height,
        }
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}

/// An axis-aligned rectangle on a raster, with its origin at the top-left
/// corner of the image and y growing downwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PxRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PxRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> PxRect {
        PxRect {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the right-most column
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the bottom-most row
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether the two rectangles share at least one pixel
    pub fn intersects(&self, other: &PxRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether `other` lies entirely within `self`
    pub fn contains(&self, other: &PxRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}
