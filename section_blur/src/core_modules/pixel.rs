// THEORY:
// The `Pixel` module is the smallest unit the engine deals with. It is a "dumb"
// value type: three 8-bit channels, no alpha, always read and written whole.
// Anything that needs neighbours (the 3x3 average) lives in `blur_kernel`; a
// `Pixel` only knows how to convert itself to and from raw RGB bytes.

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;

    /// Number of bytes a `Pixel` occupies in a packed RGB8 buffer.
    pub const CHANNELS: usize = 3;

    /// A single RGB pixel.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Pixel {
        pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel { red, green, blue }
        }

        /// A pixel with the same value on every channel.
        pub const fn gray(value: Channel) -> Self {
            Pixel::new(value, value, value)
        }

        pub fn to_bytes(self) -> [Byte; CHANNELS] {
            [self.red, self.green, self.blue]
        }
    }

    /// Builds a pixel from the first three bytes of a packed RGB(A) slice.
    /// Missing channels read as zero; anything past the third byte is ignored.
    impl From<&[u8]> for Pixel {
        fn from(bytes: &[u8]) -> Self {
            let channel = |i: usize| bytes.get(i).copied().unwrap_or_default();
            Pixel::new(channel(0), channel(1), channel(2))
        }
    }

    impl From<[u8; 3]> for Pixel {
        fn from([red, green, blue]: [u8; 3]) -> Self {
            Pixel::new(red, green, blue)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    #[test]
    fn from_rgba_slice_drops_alpha() {
        let pixel = Pixel::from(&[10u8, 20, 30, 255][..]);
        assert_eq!(pixel, Pixel::new(10, 20, 30));
    }

    #[test]
    fn from_short_slice_zero_fills() {
        let pixel = Pixel::from(&[7u8][..]);
        assert_eq!(pixel, Pixel::new(7, 0, 0));
    }

    #[test]
    fn bytes_keep_channel_order() {
        assert_eq!(Pixel::new(1, 2, 3).to_bytes(), [1, 2, 3]);
        assert_eq!(Pixel::from([4, 5, 6]), Pixel::new(4, 5, 6));
    }
}
