// THEORY:
// This file is the entry point for the `section_blur` library crate. It exposes
// the partitioned box-blur engine: an image is cut into a grid of sections and
// each section is blurred by its own worker thread, with a cap on how many
// workers are alive at once.
//
// The public surface is small: `partition`, `blur_image`, the reusable
// `BlurEngine`/`AsyncBlurEngine`, the `Image` store and the codec helpers. The
// building blocks in `core_modules` stay public so callers can plan, snapshot
// and run sections themselves.

pub mod async_engine;
pub mod core_modules;
pub mod engine;
pub mod error;

pub use async_engine::{AsyncBlurEngine, BlurOutcome};
pub use core_modules::image_store::{BORDER, Image, SectionWindow};
pub use core_modules::pixel::pixel::Pixel;
pub use core_modules::section::section::Section;
pub use core_modules::utils::image_helper::image_helper::{load_image, save_image};
pub use engine::{BlurConfig, BlurEngine, blur_image, partition};
pub use error::{BlurError, BlurResult};
