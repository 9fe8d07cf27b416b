// THEORY:
// A `Section` is one rectangular unit of the image interior handed to exactly one
// worker. Like `Chunk` it is a plain data container: it knows its own extents and
// can answer containment questions, but it knows nothing about the pixels inside.
// Sections are produced by the partition planner, never mutated, and dropped when
// their worker finishes.

pub mod section {
    use std::fmt;

    /// A rectangle in absolute image coordinates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Section {
        /// Column of the top-left pixel.
        pub x: usize,
        /// Row of the top-left pixel.
        pub y: usize,
        /// Width in pixels.
        pub width: usize,
        /// Height in pixels.
        pub height: usize,
    }

    impl Section {
        pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
            Self {
                x,
                y,
                width,
                height,
            }
        }

        /// One past the last column, saturating at `usize::MAX`.
        pub const fn right(&self) -> usize {
            self.x.saturating_add(self.width)
        }

        /// One past the last row, saturating at `usize::MAX`.
        pub const fn bottom(&self) -> usize {
            self.y.saturating_add(self.height)
        }

        /// One past the last column, or `None` if it does not fit in a `usize`.
        pub const fn checked_right(&self) -> Option<usize> {
            self.x.checked_add(self.width)
        }

        /// One past the last row, or `None` if it does not fit in a `usize`.
        pub const fn checked_bottom(&self) -> Option<usize> {
            self.y.checked_add(self.height)
        }

        pub const fn area(&self) -> usize {
            self.width * self.height
        }

        pub fn contains(&self, x: usize, y: usize) -> bool {
            (self.x..self.right()).contains(&x) && (self.y..self.bottom()).contains(&y)
        }

        pub fn overlaps(&self, other: &Section) -> bool {
            self.x < other.right()
                && other.x < self.right()
                && self.y < other.bottom()
                && other.y < self.bottom()
        }
    }

    impl fmt::Display for Section {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "{}x{} at ({}, {})",
                self.width, self.height, self.x, self.y
            )
        }
    }
}
