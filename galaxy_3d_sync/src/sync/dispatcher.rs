/// Parallel geometry dispatcher.
///
/// Conversion jobs run on a dedicated rayon pool. A job may name another
/// job it depends on; it is held back until that job has finished, which
/// is how a particle-hair export waits for the base mesh of the same
/// object. Failed or panicking jobs leave their geometry not modified.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::{Error, Result};
use crate::scene::GeometryShared;
use crate::{engine_debug, engine_warn};

const SOURCE: &str = "galaxy3d::Dispatcher";

/// Identifier of a submitted job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(u64);

type JobWork = Box<dyn FnOnce(&GeometryShared) -> Result<()> + Send>;

// ============================================================================
// Geometry Job
// ============================================================================

/// One conversion writing into one geometry
pub struct GeometryJob {
    pub label: String,
    pub target: Arc<GeometryShared>,
    pub depends_on: Option<JobId>,
    work: JobWork,
}

impl GeometryJob {
    pub fn new(
        label: impl Into<String>,
        target: Arc<GeometryShared>,
        work: impl FnOnce(&GeometryShared) -> Result<()> + Send + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            target,
            depends_on: None,
            work: Box::new(work),
        }
    }

    /// Hold this job back until `job` has finished
    pub fn after(mut self, job: Option<JobId>) -> Self {
        self.depends_on = job;
        self
    }
}

impl std::fmt::Debug for GeometryJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryJob")
            .field("label", &self.label)
            .field("depends_on", &self.depends_on)
            .finish()
    }
}

/// Outcome of every job since the previous `wait_all`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchSummary {
    pub completed: usize,
    /// (job label, error message)
    pub failed: Vec<(String, String)>,
}

// ============================================================================
// Shared State
// ============================================================================

#[derive(Default)]
struct DispatchQueue {
    next_id: u64,
    /// Submitted and not finished yet
    outstanding: FxHashSet<JobId>,
    /// Jobs held back, by the job they wait for
    waiting: FxHashMap<JobId, Vec<(JobId, GeometryJob)>>,
    summary: DispatchSummary,
}

#[derive(Default)]
struct DispatchState {
    queue: Mutex<DispatchQueue>,
    finished: Condvar,
}

impl DispatchState {
    fn lock(&self) -> MutexGuard<'_, DispatchQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Geometry Dispatcher
// ============================================================================

pub struct GeometryDispatcher {
    pool: Arc<rayon::ThreadPool>,
    state: Arc<DispatchState>,
}

impl GeometryDispatcher {
    /// Build the worker pool (`worker_threads == 0` uses one thread per core)
    pub fn new(worker_threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_threads)
            .thread_name(|index| format!("galaxy3d-geometry-{}", index))
            .build()
            .map_err(|e| Error::DispatcherError(format!("Failed to build worker pool: {}", e)))?;

        engine_debug!(SOURCE, "Geometry dispatcher started with {} workers", pool.current_num_threads());

        Ok(Self {
            pool: Arc::new(pool),
            state: Arc::new(DispatchState::default()),
        })
    }

    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Submit a job to the pool
    pub fn enqueue(&self, job: GeometryJob) -> JobId {
        let mut queue = self.state.lock();
        let id = JobId(queue.next_id);
        queue.next_id += 1;
        queue.outstanding.insert(id);

        match job.depends_on.filter(|dependency| queue.outstanding.contains(dependency)) {
            Some(dependency) => {
                queue.waiting.entry(dependency).or_default().push((id, job));
            }
            None => {
                drop(queue);
                spawn_job(&self.pool, &self.state, id, job);
            }
        }
        id
    }

    /// Run a job on the calling thread, after its dependency if any
    pub fn run_inline(&self, job: GeometryJob) -> JobId {
        let id = {
            let mut queue = self.state.lock();
            let id = JobId(queue.next_id);
            queue.next_id += 1;
            queue.outstanding.insert(id);

            if let Some(dependency) = job.depends_on {
                while queue.outstanding.contains(&dependency) {
                    queue = self
                        .state
                        .finished
                        .wait(queue)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
            id
        };
        execute_job(&self.pool, &self.state, id, job);
        id
    }

    /// Block until every submitted job has finished
    pub fn wait_all(&self) -> DispatchSummary {
        let mut queue = self.state.lock();
        while !queue.outstanding.is_empty() {
            queue = self
                .state
                .finished
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
        std::mem::take(&mut queue.summary)
    }

    /// True when no job is queued or running
    pub fn is_idle(&self) -> bool {
        self.state.lock().outstanding.is_empty()
    }
}

fn spawn_job(pool: &Arc<rayon::ThreadPool>, state: &Arc<DispatchState>, id: JobId, job: GeometryJob) {
    let worker_pool = Arc::clone(pool);
    let worker_state = Arc::clone(state);
    pool.spawn(move || execute_job(&worker_pool, &worker_state, id, job));
}

fn execute_job(pool: &Arc<rayon::ThreadPool>, state: &Arc<DispatchState>, id: JobId, job: GeometryJob) {
    let GeometryJob { label, target, work, .. } = job;

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| work(target.as_ref())));
    let failure = match outcome {
        Ok(Ok(())) => None,
        Ok(Err(error)) => Some(error.to_string()),
        Err(payload) => Some(panic_message(payload.as_ref())),
    };

    if let Some(message) = &failure {
        target.set_modified(false);
        engine_warn!(SOURCE, "Geometry job '{}' failed: {}", label, message);
    }

    let released = {
        let mut queue = state.lock();
        queue.outstanding.remove(&id);
        match failure {
            Some(message) => queue.summary.failed.push((label, message)),
            None => queue.summary.completed += 1,
        }
        queue.waiting.remove(&id).unwrap_or_default()
    };
    state.finished.notify_all();

    for (dependent_id, dependent) in released {
        spawn_job(pool, state, dependent_id, dependent);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", text)
    } else if let Some(text) = payload.downcast_ref::<String>() {
        format!("panicked: {}", text)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
