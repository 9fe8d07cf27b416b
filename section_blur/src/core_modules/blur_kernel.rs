// THEORY:
// The blur kernel is the per-pixel work: replace each pixel of a section with the
// unweighted integer average of its 3x3 neighbourhood. Reads come from the
// `Snapshot`, writes go through the section's `SectionWindow`. Neighbourhoods may
// cross into other sections or the border; that is fine because the snapshot
// holds the pre-blur values.
//
// A neighbourhood that leaves the image is a partition bug, so the kernel reports
// it instead of clamping.

use crate::core_modules::image_store::SectionWindow;
use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::snapshot::Snapshot;
use crate::error::BlurResult;

const KERNEL_RADIUS: isize = 1;
/// Samples per channel in one 3x3 neighbourhood.
pub const BLUR_REGION_SIZE: u32 = 9;

/// Blurs every pixel of `window`'s section, reading from `snapshot`.
pub fn blur_section(snapshot: &Snapshot, window: &mut SectionWindow<'_>) -> BlurResult<()> {
    let section = window.section();
    for y in section.y..section.bottom() {
        for x in section.x..section.right() {
            let average = box_average(snapshot, x, y)?;
            window.set_pixel(x, y, average)?;
        }
    }
    Ok(())
}

/// The 3x3 average around `(x, y)`, floor-divided per channel.
pub fn box_average(snapshot: &Snapshot, x: usize, y: usize) -> BlurResult<Pixel> {
    let mut sum_red = 0u32;
    let mut sum_green = 0u32;
    let mut sum_blue = 0u32;

    for dy in -KERNEL_RADIUS..=KERNEL_RADIUS {
        for dx in -KERNEL_RADIUS..=KERNEL_RADIUS {
            let pixel = snapshot.neighbor(x, y, dx, dy)?;
            sum_red += pixel.red as u32;
            sum_green += pixel.green as u32;
            sum_blue += pixel.blue as u32;
        }
    }

    Ok(Pixel::new(
        (sum_red / BLUR_REGION_SIZE) as u8,
        (sum_green / BLUR_REGION_SIZE) as u8,
        (sum_blue / BLUR_REGION_SIZE) as u8,
    ))
}
