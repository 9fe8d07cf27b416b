// THEORY:
// The experiment table is the fixed list of grid shapes the bench times, from a
// single section up to one section per pixel. Row and column sweeps and the
// pixel-by-pixel grid follow the interior size; the square sector grids do not,
// so `fits` decides which of them a given image can run.

use std::time::Duration;

/// Square grids tried between the row/column sweeps and pixel-by-pixel.
const SECTOR_GRIDS: [usize; 6] = [2, 4, 8, 16, 32, 64];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experiment {
    pub name: String,
    pub columns: usize,
    pub rows: usize,
}

impl Experiment {
    fn new(name: impl Into<String>, columns: usize, rows: usize) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Whether every section of this grid gets at least one interior pixel per axis.
    pub fn fits(&self, interior_width: usize, interior_height: usize) -> bool {
        (1..=interior_width).contains(&self.columns) && (1..=interior_height).contains(&self.rows)
    }
}

/// Experiments for an interior of `interior_width` x `interior_height`, in run order.
pub fn standard_experiments(interior_width: usize, interior_height: usize) -> Vec<Experiment> {
    let mut experiments = vec![
        Experiment::new("Sequential", 1, 1),
        Experiment::new("Row-by-Row", 1, interior_height),
        Experiment::new("Column-by-Column", interior_width, 1),
    ];
    experiments.extend(
        SECTOR_GRIDS
            .iter()
            .map(|&n| Experiment::new(format!("Sectors-{n}-by-{n}"), n, n)),
    );
    experiments.push(Experiment::new(
        "Pixel-by-Pixel",
        interior_width,
        interior_height,
    ));
    experiments
}

pub fn report_line(name: &str, elapsed: Duration) -> String {
    format!(
        "Experiment: {name}, Time: {:.6} ms",
        elapsed.as_secs_f64() * 1e3
    )
}
