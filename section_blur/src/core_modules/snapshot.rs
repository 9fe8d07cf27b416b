// THEORY:
// A `Snapshot` is a frozen copy of the image taken right before the workers start.
// Every worker reads its 3x3 neighbourhoods from the snapshot and writes into the
// live image, so a worker whose neighbourhood reaches into a section that has
// already been blurred still sees the original values. The snapshot is never
// written after it is taken and is shared by reference among all workers of one
// blur invocation.

use crate::core_modules::image_store::{Image, copy_buffer};
use crate::core_modules::pixel::pixel::Pixel;
use crate::error::{BlurError, BlurResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl Snapshot {
    /// Deep-copies the current pixels of `image`.
    pub fn take(image: &Image) -> BlurResult<Self> {
        let pixels = copy_buffer(image.pixels(), "snapshot")?;
        log::debug!(
            "took a {}x{} snapshot",
            image.width(),
            image.height()
        );
        Ok(Self {
            width: image.width(),
            height: image.height(),
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> BlurResult<Pixel> {
        self.neighbor(x, y, 0, 0)
    }

    /// The pixel at `(x + dx, y + dy)`. Offsets that leave the image fail with
    /// `PixelOutOfRange` carrying the signed coordinate that was requested.
    #[inline]
    pub fn neighbor(&self, x: usize, y: usize, dx: isize, dy: isize) -> BlurResult<Pixel> {
        match (x.checked_add_signed(dx), y.checked_add_signed(dy)) {
            (Some(nx), Some(ny)) if nx < self.width && ny < self.height => {
                Ok(self.pixels[ny * self.width + nx])
            }
            _ => Err(BlurError::PixelOutOfRange {
                x: x as i64 + dx as i64,
                y: y as i64 + dy as i64,
                width: self.width,
                height: self.height,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_does_not_follow_later_writes() {
        let mut image = Image::new(3, 3, Pixel::gray(10)).unwrap();
        let snapshot = Snapshot::take(&image).unwrap();
        image.set_pixel(1, 1, Pixel::gray(200)).unwrap();
        assert_eq!(snapshot.get_pixel(1, 1).unwrap(), Pixel::gray(10));
        assert_eq!((snapshot.width(), snapshot.height()), (3, 3));
    }

    #[test]
    fn neighbor_offsets_are_checked() {
        let image = Image::new(2, 2, Pixel::gray(1)).unwrap();
        let snapshot = Snapshot::take(&image).unwrap();
        assert!(snapshot.neighbor(1, 1, -1, -1).is_ok());
        assert!(matches!(
            snapshot.neighbor(0, 1, -1, 0),
            Err(BlurError::PixelOutOfRange { x: -1, y: 1, .. })
        ));
        assert!(matches!(
            snapshot.neighbor(1, 1, 0, 1),
            Err(BlurError::PixelOutOfRange { x: 1, y: 2, .. })
        ));
    }
}
