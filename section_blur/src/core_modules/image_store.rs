// THEORY:
// The `Image` is the engine's pixel store: a row-major buffer of `Pixel`s plus
// its width and height. The caller owns it for its whole life; the engine only
// changes pixel values in place and never resizes it.
//
// Key architectural principles:
// 1.  **Checked access**: every coordinate read or write is validated and an
//     out-of-range access is an `Err`, never a panic.
// 2.  **Windows instead of shared handles**: workers never see the `Image`
//     itself. `section_windows` splits the single owned buffer into disjoint
//     `SectionWindow`s, one per section, each holding only the row slices that
//     section covers. Overlapping sections cannot be turned into windows, so a
//     cross-section write is a rejected request rather than a data race.
// 3.  **Fallible duplication**: copies reserve their memory up front and report
//     exhaustion as `AllocationFailure`.

use crate::core_modules::pixel::pixel::{CHANNELS, Pixel};
use crate::core_modules::section::section::Section;
use crate::error::{BlurError, BlurResult};

/// Width of the frame around the interior that is never partitioned or blurred.
pub const BORDER: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl Image {
    /// Creates a `width` x `height` image filled with `fill`.
    pub fn new(width: usize, height: usize, fill: Pixel) -> BlurResult<Self> {
        let len = checked_len(width, height)?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| BlurError::AllocationFailure {
                what: "image buffer",
                len,
            })?;
        pixels.resize(len, fill);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wraps an existing row-major buffer.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Pixel>) -> BlurResult<Self> {
        let len = checked_len(width, height)?;
        if pixels.len() != len {
            return Err(BlurError::InvalidDimensions {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds an image from a packed RGB8 byte buffer.
    pub fn from_rgb_bytes(width: usize, height: usize, bytes: &[u8]) -> BlurResult<Self> {
        if bytes.len() % CHANNELS != 0 {
            return Err(BlurError::InvalidDimensions {
                width,
                height,
                len: bytes.len() / CHANNELS,
            });
        }
        let pixels = bytes.chunks_exact(CHANNELS).map(Pixel::from).collect();
        Self::from_pixels(width, height, pixels)
    }

    /// Packs the image back into RGB8 bytes, row-major.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|pixel| pixel.to_bytes()).collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Dimensions of the region left after removing the one-pixel border.
    /// Images narrower or shorter than three pixels have an empty interior.
    pub fn interior_dims(&self) -> (usize, usize) {
        (
            self.width.saturating_sub(2 * BORDER),
            self.height.saturating_sub(2 * BORDER),
        )
    }

    fn index(&self, x: usize, y: usize) -> BlurResult<usize> {
        if x < self.width && y < self.height {
            Ok(y * self.width + x)
        } else {
            Err(BlurError::PixelOutOfRange {
                x: x as i64,
                y: y as i64,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> BlurResult<Pixel> {
        let index = self.index(x, y)?;
        Ok(self.pixels[index])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: Pixel) -> BlurResult<()> {
        let index = self.index(x, y)?;
        self.pixels[index] = pixel;
        Ok(())
    }

    /// Deep copy of the image. Later writes to either copy are invisible to the other.
    pub fn duplicate(&self) -> BlurResult<Image> {
        Ok(Image {
            width: self.width,
            height: self.height,
            pixels: copy_buffer(&self.pixels, "image duplicate")?,
        })
    }

    /// Splits the buffer into one mutable window per section, in the order the
    /// sections were given.
    ///
    /// Fails with `SectionOutOfBounds` for an empty section or one that does not
    /// fit inside the image, and with `OverlappingSections` when two sections
    /// share a pixel. On failure the image is left untouched.
    pub fn section_windows(&mut self, sections: &[Section]) -> BlurResult<Vec<SectionWindow<'_>>> {
        let (width, height) = (self.width, self.height);
        for section in sections {
            let fits = matches!(
                (section.checked_right(), section.checked_bottom()),
                (Some(right), Some(bottom)) if right <= width && bottom <= height
            );
            if section.width == 0 || section.height == 0 || !fits {
                return Err(BlurError::SectionOutOfBounds {
                    section: *section,
                    width,
                    height,
                });
            }
        }

        // For every image row, the sections crossing it, left to right.
        let mut order: Vec<usize> = (0..sections.len()).collect();
        order.sort_by_key(|&i| sections[i].x);
        let mut crossing: Vec<Vec<usize>> = vec![Vec::new(); height];
        for &i in &order {
            for y in sections[i].y..sections[i].bottom() {
                crossing[y].push(i);
            }
        }

        let mut rows: Vec<Vec<&mut [Pixel]>> = sections
            .iter()
            .map(|section| Vec::with_capacity(section.height))
            .collect();

        for (y, row) in self.pixels.chunks_mut(width).enumerate() {
            let mut rest = row;
            let mut offset = 0;
            for &i in &crossing[y] {
                let section = sections[i];
                if section.x < offset {
                    return Err(BlurError::OverlappingSections { section });
                }
                let (_, tail) = std::mem::take(&mut rest).split_at_mut(section.x - offset);
                let (segment, tail) = tail.split_at_mut(section.width);
                rows[i].push(segment);
                rest = tail;
                offset = section.right();
            }
        }

        Ok(sections
            .iter()
            .zip(rows)
            .map(|(section, rows)| SectionWindow {
                section: *section,
                rows,
            })
            .collect())
    }
}

/// Exclusive write access to the pixels of exactly one section.
#[derive(Debug)]
pub struct SectionWindow<'a> {
    section: Section,
    rows: Vec<&'a mut [Pixel]>,
}

impl SectionWindow<'_> {
    pub fn section(&self) -> Section {
        self.section
    }

    /// Reads the current (live) value at absolute image coordinates.
    pub fn get_pixel(&self, x: usize, y: usize) -> BlurResult<Pixel> {
        self.check(x, y)?;
        Ok(self.rows[y - self.section.y][x - self.section.x])
    }

    /// Writes at absolute image coordinates, which must lie inside the section.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: Pixel) -> BlurResult<()> {
        self.check(x, y)?;
        self.rows[y - self.section.y][x - self.section.x] = pixel;
        Ok(())
    }

    fn check(&self, x: usize, y: usize) -> BlurResult<()> {
        if self.section.contains(x, y) {
            Ok(())
        } else {
            Err(BlurError::OutsideSection {
                x,
                y,
                section: self.section,
            })
        }
    }
}

fn checked_len(width: usize, height: usize) -> BlurResult<usize> {
    match width.checked_mul(height) {
        Some(len) if width > 0 && height > 0 => Ok(len),
        _ => Err(BlurError::InvalidDimensions {
            width,
            height,
            len: 0,
        }),
    }
}

/// Copies a pixel buffer, reporting allocation failure instead of aborting.
pub(crate) fn copy_buffer(source: &[Pixel], what: &'static str) -> BlurResult<Vec<Pixel>> {
    let mut copy = Vec::new();
    copy.try_reserve_exact(source.len())
        .map_err(|_| BlurError::AllocationFailure {
            what,
            len: source.len(),
        })?;
    copy.extend_from_slice(source);
    Ok(copy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: usize, height: usize) -> Image {
        let pixels = (0..width * height)
            .map(|i| Pixel::gray((i % 256) as u8))
            .collect();
        Image::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn rejects_empty_or_mismatched_buffers() {
        assert!(matches!(
            Image::new(0, 4, Pixel::default()),
            Err(BlurError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Image::from_pixels(2, 2, vec![Pixel::default(); 3]),
            Err(BlurError::InvalidDimensions { len: 3, .. })
        ));
        assert!(matches!(
            Image::from_rgb_bytes(2, 1, &[1, 2, 3, 4]),
            Err(BlurError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let mut image = numbered(3, 2);
        assert!(matches!(
            image.get_pixel(3, 0),
            Err(BlurError::PixelOutOfRange { x: 3, y: 0, width: 3, height: 2 })
        ));
        assert!(image.set_pixel(0, 2, Pixel::gray(1)).is_err());
        assert_eq!(image.get_pixel(2, 1).unwrap(), Pixel::gray(5));
    }

    #[test]
    fn duplicate_is_independent() {
        let mut image = numbered(4, 4);
        let copy = image.duplicate().unwrap();
        image.set_pixel(1, 1, Pixel::new(9, 9, 9)).unwrap();
        assert_eq!(copy.get_pixel(1, 1).unwrap(), Pixel::gray(5));
        assert_ne!(copy, image);
    }

    #[test]
    fn rgb_bytes_are_row_major() {
        let image = Image::from_rgb_bytes(2, 1, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(image.get_pixel(1, 0).unwrap(), Pixel::new(4, 5, 6));
        assert_eq!(image.to_rgb_bytes(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn interior_excludes_border() {
        assert_eq!(numbered(7, 5).interior_dims(), (5, 3));
        assert_eq!(numbered(2, 1).interior_dims(), (0, 0));
    }

    #[test]
    fn windows_write_only_their_own_section() {
        let mut image = Image::new(6, 4, Pixel::default()).unwrap();
        let sections = [Section::new(1, 1, 2, 2), Section::new(3, 1, 2, 2)];
        {
            let mut windows = image.section_windows(&sections).unwrap();
            assert_eq!(windows.len(), 2);
            windows[0].set_pixel(2, 2, Pixel::gray(1)).unwrap();
            windows[1].set_pixel(3, 1, Pixel::gray(2)).unwrap();
            assert!(matches!(
                windows[0].set_pixel(3, 1, Pixel::gray(3)),
                Err(BlurError::OutsideSection { x: 3, y: 1, .. })
            ));
            assert_eq!(windows[1].get_pixel(3, 1).unwrap(), Pixel::gray(2));
        }
        assert_eq!(image.get_pixel(2, 2).unwrap(), Pixel::gray(1));
        assert_eq!(image.get_pixel(3, 1).unwrap(), Pixel::gray(2));
        assert_eq!(image.get_pixel(0, 0).unwrap(), Pixel::default());
    }

    #[test]
    fn windows_follow_input_order_not_position() {
        let mut image = numbered(5, 5);
        let sections = [Section::new(3, 1, 1, 3), Section::new(1, 1, 2, 3)];
        let windows = image.section_windows(&sections).unwrap();
        assert_eq!(windows[0].section(), sections[0]);
        assert_eq!(windows[1].section(), sections[1]);
        assert_eq!(windows[0].get_pixel(3, 2).unwrap(), Pixel::gray(13));
    }

    #[test]
    fn overlapping_sections_are_rejected() {
        let mut image = numbered(6, 6);
        let sections = [Section::new(1, 1, 3, 3), Section::new(3, 3, 2, 2)];
        assert!(matches!(
            image.section_windows(&sections),
            Err(BlurError::OverlappingSections { .. })
        ));
        // Disjoint in x but sharing rows is fine.
        let sections = [Section::new(1, 1, 2, 3), Section::new(3, 2, 2, 3)];
        assert!(image.section_windows(&sections).is_ok());
    }

    #[test]
    fn buffers_too_large_to_reserve_are_allocation_failures() {
        assert!(matches!(
            Image::new(usize::MAX / 2, 2, Pixel::default()),
            Err(BlurError::AllocationFailure { what: "image buffer", .. })
        ));
    }

    #[test]
    fn sections_outside_the_image_are_rejected() {
        let mut image = numbered(4, 4);
        for section in [
            Section::new(3, 1, 2, 1),
            Section::new(1, 1, 0, 2),
            Section::new(usize::MAX, 1, 2, 1),
            Section::new(1, usize::MAX - 1, 1, 3),
        ] {
            assert!(matches!(
                image.section_windows(&[section]),
                Err(BlurError::SectionOutOfBounds { .. })
            ));
        }
    }
}
