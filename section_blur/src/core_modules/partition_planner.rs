// THEORY:
// The partition planner turns a grid shape into concrete `Section`s. It plays the
// role `GridManager` plays for chunks: it owns the grid math so nothing else has
// to. The interior (image minus a one-pixel border) is cut into `columns` x `rows`
// rectangles of equal base size; the last column and the last row absorb the
// remainder on their own axis.
//
// The sections it returns must be pairwise disjoint and must cover the interior
// exactly. Workers write into the destination without locks, so this is the one
// invariant the whole engine leans on. `coverage_map`/`check_coverage` exist to
// verify it independently of the planner.

use crate::core_modules::image_store::BORDER;
use crate::core_modules::section::section::Section;
use crate::error::{BlurError, BlurResult};

/// Cuts a `interior_width` x `interior_height` interior into `columns` x `rows`
/// sections, ordered column-major (every row of column 0, then column 1, ...).
///
/// Coordinates are absolute: the first section starts at `(BORDER, BORDER)`.
pub fn plan(
    interior_width: usize,
    interior_height: usize,
    columns: usize,
    rows: usize,
) -> BlurResult<Vec<Section>> {
    if columns == 0 || rows == 0 || interior_width < columns || interior_height < rows {
        return Err(BlurError::InvalidGrid {
            interior_width,
            interior_height,
            columns,
            rows,
        });
    }

    let section_width = interior_width / columns;
    let section_height = interior_height / rows;
    let last_width = interior_width - section_width * (columns - 1);
    let last_height = interior_height - section_height * (rows - 1);

    let count = columns
        .checked_mul(rows)
        .ok_or(BlurError::AllocationFailure {
            what: "section list",
            len: usize::MAX,
        })?;
    let mut sections = Vec::new();
    sections
        .try_reserve_exact(count)
        .map_err(|_| BlurError::AllocationFailure {
            what: "section list",
            len: count,
        })?;

    for column in 0..columns {
        let width = if column == columns - 1 {
            last_width
        } else {
            section_width
        };
        for row in 0..rows {
            let height = if row == rows - 1 {
                last_height
            } else {
                section_height
            };
            sections.push(Section::new(
                BORDER + section_width * column,
                BORDER + section_height * row,
                width,
                height,
            ));
        }
    }

    log::debug!(
        "planned {count} sections ({columns}x{rows}) over a {interior_width}x{interior_height} interior"
    );
    Ok(sections)
}

/// Counts how many sections cover each interior cell, row-major over the interior.
///
/// A section reaching outside the interior fails with `SectionOutOfBounds`.
pub fn coverage_map(
    sections: &[Section],
    interior_width: usize,
    interior_height: usize,
) -> BlurResult<Vec<u32>> {
    let mut counts = vec![0u32; interior_width * interior_height];
    for section in sections {
        let inside = section.x >= BORDER
            && section.y >= BORDER
            && matches!(
                (section.checked_right(), section.checked_bottom()),
                (Some(right), Some(bottom))
                    if right <= BORDER + interior_width && bottom <= BORDER + interior_height
            );
        if !inside {
            return Err(BlurError::SectionOutOfBounds {
                section: *section,
                width: interior_width,
                height: interior_height,
            });
        }
        for y in section.y..section.bottom() {
            let row = (y - BORDER) * interior_width;
            for x in section.x..section.right() {
                counts[row + x - BORDER] += 1;
            }
        }
    }
    Ok(counts)
}

/// Verifies that `sections` cover the interior exactly once: no gaps, no overlaps.
pub fn check_coverage(
    sections: &[Section],
    interior_width: usize,
    interior_height: usize,
) -> BlurResult<()> {
    let counts = coverage_map(sections, interior_width, interior_height)?;
    match counts.iter().position(|&count| count != 1) {
        None => Ok(()),
        Some(index) => Err(BlurError::CoverageMismatch {
            x: index % interior_width + BORDER,
            y: index / interior_width + BORDER,
            count: counts[index],
        }),
    }
}
