// Codec glue: everything between a file on disk and an `Image`. Decoding goes
// through the `image` crate, so any format it can read is accepted; alpha is
// dropped on the way in.

pub mod image_helper {
    use std::path::Path;

    use crate::core_modules::image_store::Image;
    use crate::error::{BlurError, BlurResult};

    /// Decodes `path` into an RGB image.
    pub fn load_image(path: impl AsRef<Path>) -> BlurResult<Image> {
        let decoded = image::open(path)?.into_rgb8();
        let (width, height) = decoded.dimensions();
        Image::from_rgb_bytes(width as usize, height as usize, decoded.as_raw())
    }

    /// Encodes `image` to `path`; the format follows the file extension.
    pub fn save_image(image: &Image, path: impl AsRef<Path>) -> BlurResult<()> {
        let invalid = || BlurError::InvalidDimensions {
            width: image.width(),
            height: image.height(),
            len: image.pixels().len(),
        };
        let width = u32::try_from(image.width()).map_err(|_| invalid())?;
        let height = u32::try_from(image.height()).map_err(|_| invalid())?;

        image::save_buffer(
            path,
            &image.to_rgb_bytes(),
            width,
            height,
            image::ExtendedColorType::Rgb8,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::image_helper::*;
    use crate::core_modules::image_store::Image;
    use crate::core_modules::pixel::pixel::Pixel;
    use crate::error::BlurError;

    #[test]
    fn save_and_reload_gradient_png() {
        let dir = tempfile::tempdir().expect("Error creating temp dir.");
        let path = dir.path().join("gradient_file.png");

        let width = 40;
        let height = 30;
        let pixels = (0..width * height)
            .map(|i| Pixel::new((i % 256) as u8, (i / width) as u8, 200))
            .collect();
        let image = Image::from_pixels(width, height, pixels).unwrap();

        save_image(&image, &path).expect("Error Saving File.");
        let reloaded = load_image(&path).expect("Error Loading File.");
        assert_eq!(reloaded, image);
    }

    #[test]
    fn missing_file_is_a_codec_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_image(dir.path().join("missing.png"));
        assert!(matches!(result, Err(BlurError::Codec(_))));
    }

    #[test]
    fn unknown_extension_is_a_codec_error() {
        let dir = tempfile::tempdir().unwrap();
        let image = Image::new(3, 3, Pixel::gray(1)).unwrap();
        let result = save_image(&image, dir.path().join("white_file.unknown"));
        assert!(matches!(result, Err(BlurError::Codec(_))));
    }
}
