// THEORY:
// The `engine` module is the top-level synchronous API. It strings the core
// modules together for one blur invocation:
//
//   plan sections -> snapshot -> split destination into windows -> pool runs
//   one kernel per window -> pool drains -> caller reads the image back.
//
// Planning, snapshot and window splitting all happen before the first worker is
// started, so their failures leave the image untouched.

use crate::core_modules::blur_kernel::blur_section;
use crate::core_modules::image_store::Image;
use crate::core_modules::partition_planner::plan;
use crate::core_modules::section::section::Section;
use crate::core_modules::snapshot::Snapshot;
use crate::core_modules::worker_pool::WorkerPool;
use crate::error::BlurResult;

/// Grid shape and concurrency limit for a blur invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlurConfig {
    /// Number of section columns across the interior.
    pub columns: usize,
    /// Number of section rows down the interior.
    pub rows: usize,
    /// Upper bound on simultaneously unfinished workers.
    pub max_concurrency: usize,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            columns: 1,
            rows: 1,
            max_concurrency: num_cpus::get(),
        }
    }
}

/// A reusable, validated blur configuration.
#[derive(Debug, Clone)]
pub struct BlurEngine {
    config: BlurConfig,
    pool: WorkerPool,
}

impl BlurEngine {
    pub fn new(config: BlurConfig) -> BlurResult<Self> {
        let pool = WorkerPool::new(config.max_concurrency)?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &BlurConfig {
        &self.config
    }

    /// Blurs the interior of `image` in place. Border pixels are never written.
    pub fn blur(&self, image: &mut Image) -> BlurResult<()> {
        let sections = partition(image.interior_dims(), self.config.columns, self.config.rows)?;
        let snapshot = Snapshot::take(image)?;
        let windows = image.section_windows(&sections)?;
        self.pool
            .run_all(windows, |mut window| blur_section(&snapshot, &mut window))
    }
}

/// Plans the sections for an interior of `(width, height)`.
pub fn partition(
    (interior_width, interior_height): (usize, usize),
    columns: usize,
    rows: usize,
) -> BlurResult<Vec<Section>> {
    plan(interior_width, interior_height, columns, rows)
}

/// One-shot form of [`BlurEngine::blur`].
pub fn blur_image(
    image: &mut Image,
    columns: usize,
    rows: usize,
    max_concurrency: usize,
) -> BlurResult<()> {
    BlurEngine::new(BlurConfig {
        columns,
        rows,
        max_concurrency,
    })?
    .blur(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::Pixel;
    use crate::error::BlurError;

    fn checkerboard(width: usize, height: usize) -> Image {
        let pixels = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                if (x + y) % 2 == 0 {
                    Pixel::new(255, 0, 90)
                } else {
                    Pixel::new(0, 255, 9)
                }
            })
            .collect();
        Image::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn default_config_is_sequential_on_all_cores() {
        let config = BlurConfig::default();
        assert_eq!((config.columns, config.rows), (1, 1));
        assert!(config.max_concurrency >= 1);
    }

    #[test]
    fn invalid_concurrency_is_rejected_up_front() {
        let config = BlurConfig {
            max_concurrency: 0,
            ..BlurConfig::default()
        };
        assert!(matches!(BlurEngine::new(config), Err(BlurError::InvalidConcurrency)));
    }

    #[test]
    fn invalid_grid_leaves_image_untouched() {
        let mut image = checkerboard(5, 5);
        let before = image.clone();
        let err = blur_image(&mut image, 4, 1, 2).unwrap_err();
        assert!(matches!(err, BlurError::InvalidGrid { columns: 4, .. }));
        assert_eq!(image, before);
    }

    #[test]
    fn images_without_interior_are_invalid() {
        let mut image = checkerboard(2, 9);
        assert!(matches!(
            blur_image(&mut image, 1, 1, 1),
            Err(BlurError::InvalidGrid { interior_width: 0, .. })
        ));
    }

    #[test]
    fn checkerboard_center_is_averaged() {
        // Around a (255, 0, 90) centre: five of those and four (0, 255, 9).
        let mut image = checkerboard(3, 3);
        blur_image(&mut image, 1, 1, 1).unwrap();
        assert_eq!(
            image.get_pixel(1, 1).unwrap(),
            Pixel::new((5 * 255 / 9) as u8, (4 * 255 / 9) as u8, 54)
        );
    }

    #[test]
    fn engine_is_reusable() {
        let engine = BlurEngine::new(BlurConfig {
            columns: 2,
            rows: 3,
            max_concurrency: 2,
        })
        .unwrap();
        let mut first = checkerboard(9, 8);
        let mut second = checkerboard(9, 8);
        engine.blur(&mut first).unwrap();
        engine.blur(&mut second).unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.config().rows, 3);
    }

    #[test]
    fn partition_uses_interior_dims() {
        let sections = partition((6, 4), 3, 2).unwrap();
        assert_eq!(sections.len(), 6);
        assert_eq!(sections[5], Section::new(5, 3, 2, 2));
    }
}
