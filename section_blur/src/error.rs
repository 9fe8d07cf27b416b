// THEORY:
// `BlurError` is the single error type of the engine.
//
// Planning and snapshot failures are raised before any worker starts, so the
// destination image is untouched when they occur. Everything raised inside a
// worker reaches the caller wrapped in `BlurError::WorkerFailure`, tagged with
// the section that worker owned.

use crate::core_modules::section::section::Section;

pub type BlurResult<T> = Result<T, BlurError>;

#[derive(Debug, thiserror::Error)]
pub enum BlurError {
    /// The grid asks for more sections than the interior has pixels on some axis.
    #[error(
        "a {columns}x{rows} grid does not fit a {interior_width}x{interior_height} interior"
    )]
    InvalidGrid {
        interior_width: usize,
        interior_height: usize,
        columns: usize,
        rows: usize,
    },

    #[error("failed to allocate {what} ({len} elements)")]
    AllocationFailure { what: &'static str, len: usize },

    #[error("pixel ({x}, {y}) is outside a {width}x{height} image")]
    PixelOutOfRange {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("worker for section {section} failed: {cause}")]
    WorkerFailure {
        section: Section,
        #[source]
        cause: Box<BlurError>,
    },

    #[error("invalid image: {width}x{height} with {len} pixels")]
    InvalidDimensions {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("max concurrency must be at least 1")]
    InvalidConcurrency,

    #[error("write to ({x}, {y}) falls outside section {section}")]
    OutsideSection { x: usize, y: usize, section: Section },

    #[error("section {section} overlaps a previously placed section")]
    OverlappingSections { section: Section },

    #[error("section {section} does not fit inside a {width}x{height} area")]
    SectionOutOfBounds {
        section: Section,
        width: usize,
        height: usize,
    },

    /// A cell of the partitioned area is covered zero times or more than once.
    #[error("cell ({x}, {y}) is covered {count} times")]
    CoverageMismatch { x: usize, y: usize, count: u32 },

    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),

    #[error("failed to spawn worker thread")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Codec(#[from] image::ImageError),

    #[error("blocking blur task did not complete")]
    Join(#[from] tokio::task::JoinError),
}

impl BlurError {
    /// The section a worker failure is attributed to, if any.
    pub fn section(&self) -> Option<Section> {
        match self {
            BlurError::WorkerFailure { section, .. } => Some(*section),
            _ => None,
        }
    }

    /// Unwraps `WorkerFailure` layers down to the error the worker itself raised.
    pub fn root_cause(&self) -> &BlurError {
        match self {
            BlurError::WorkerFailure { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}
