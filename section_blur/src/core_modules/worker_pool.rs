// THEORY:
// The worker pool runs one job per section on real OS threads while never having
// more than `max_concurrent` of them unfinished at once.
//
// Key architectural principles:
// 1.  **Ring of handles**: the issuing thread keeps a fixed ring of join handles
//     sized `min(max_concurrent, jobs)`. Job N goes into slot N mod capacity; if
//     that slot is still occupied, the job issued `capacity` turns earlier is
//     joined first. There is no batch-wide barrier between rounds.
// 2.  **Scoped threads**: jobs may borrow (section windows, the snapshot), so the
//     pool runs inside `std::thread::scope` and every handle is joined before
//     `run_all` returns.
// 3.  **No cancellation**: a failing job does not stop its peers. Every issued job
//     is joined, then the first failure is returned as `WorkerFailure` tagged with
//     the job's section. Later failures are only logged.
// 4.  **Issuer-only state**: the ring lives on the issuing thread's stack; workers
//     never touch it.

use std::any::Any;
use std::thread::{self, ScopedJoinHandle};

use crate::core_modules::image_store::SectionWindow;
use crate::core_modules::section::section::Section;
use crate::error::{BlurError, BlurResult};

/// A unit of pool work that knows which section it belongs to.
pub trait PoolJob: Send {
    fn section(&self) -> Section;
}

impl PoolJob for Section {
    fn section(&self) -> Section {
        *self
    }
}

impl PoolJob for SectionWindow<'_> {
    fn section(&self) -> Section {
        SectionWindow::section(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    max_concurrent: usize,
}

impl WorkerPool {
    pub fn new(max_concurrent: usize) -> BlurResult<Self> {
        if max_concurrent == 0 {
            return Err(BlurError::InvalidConcurrency);
        }
        Ok(Self { max_concurrent })
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Runs `work` once for every job and returns after all of them have finished.
    pub fn run_all<J, F>(&self, jobs: Vec<J>, work: F) -> BlurResult<()>
    where
        J: PoolJob,
        F: Fn(J) -> BlurResult<()> + Sync,
    {
        let total = jobs.len();
        let capacity = self.max_concurrent.min(total);
        let work = &work;
        log::debug!("running {total} jobs with at most {capacity} in flight");

        thread::scope(|scope| {
            let mut ring: Vec<Option<(Section, ScopedJoinHandle<'_, BlurResult<()>>)>> =
                Vec::new();
            ring.try_reserve_exact(capacity)
                .map_err(|_| BlurError::AllocationFailure {
                    what: "worker ring",
                    len: capacity,
                })?;
            ring.resize_with(capacity, || None);

            let mut failures = FailureLog::default();
            for (issued, job) in jobs.into_iter().enumerate() {
                let slot = issued % capacity;
                if let Some((section, handle)) = ring[slot].take() {
                    log::trace!("slot {slot} full, waiting for section {section}");
                    failures.record(join(section, handle));
                }

                let section = job.section();
                let spawned = thread::Builder::new()
                    .name(format!("blur-worker-{issued}"))
                    .spawn_scoped(scope, move || work(job));
                match spawned {
                    Ok(handle) => {
                        log::trace!("issued section {section} into slot {slot}");
                        ring[slot] = Some((section, handle));
                    }
                    Err(err) => {
                        failures.record(Err(BlurError::WorkerFailure {
                            section,
                            cause: Box::new(BlurError::Spawn(err)),
                        }));
                        break;
                    }
                }
            }

            for (section, handle) in ring.iter_mut().filter_map(Option::take) {
                failures.record(join(section, handle));
            }
            failures.finish()
        })
    }
}

fn join(section: Section, handle: ScopedJoinHandle<'_, BlurResult<()>>) -> BlurResult<()> {
    let outcome = match handle.join() {
        Ok(result) => result,
        Err(payload) => Err(BlurError::WorkerPanicked(panic_message(payload.as_ref()))),
    };
    outcome.map_err(|cause| BlurError::WorkerFailure {
        section,
        cause: Box::new(cause),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

/// Keeps the first failure; counts and logs the rest.
#[derive(Default)]
struct FailureLog {
    first: Option<BlurError>,
    later: usize,
}

impl FailureLog {
    fn record(&mut self, outcome: BlurResult<()>) {
        let Err(err) = outcome else { return };
        if self.first.is_none() {
            self.first = Some(err);
        } else {
            self.later += 1;
            log::warn!("additional worker failure: {err}");
        }
    }

    fn finish(self) -> BlurResult<()> {
        match self.first {
            None => Ok(()),
            Some(err) => {
                if self.later > 0 {
                    log::warn!("{} more workers failed after the first", self.later);
                }
                Err(err)
            }
        }
    }
}
