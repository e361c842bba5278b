/// A rectangle in pixel coordinates, `right` and `lower` exclusive.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CropBox {
    pub left: u32,
    pub upper: u32,
    pub right: u32,
    pub lower: u32,
}

impl CropBox {
    /// The largest square centered in a `width` x `height` image.
    ///
    /// Offsets are floored, so for odd margins the extra pixel is cut from
    /// the right or bottom edge.
    pub fn centered(width: u32, height: u32) -> Self {
        let side = width.min(height);
        let left = (width - side) / 2;
        let upper = (height - side) / 2;

        Self {
            left,
            upper,
            right: (width + side) / 2,
            lower: upper + side,
        }
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.lower - self.upper
    }
}
