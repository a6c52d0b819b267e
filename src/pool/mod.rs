use crate::error::{Error, ErrorKind, Result};
use crossbeam::channel::{unbounded, Sender};
use slog::{o, trace, Logger};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

mod registry;
mod worker;

use registry::Registry;
use worker::Worker;
pub use registry::TaskError;

/// identifies one submission for the lifetime of a pool, never reused
pub type TaskHandle = u64;

/// A unit of work run by the pool. Successful results are discarded; a task
/// that needs to hand back output should write into something it captures.
pub trait Task: Send + 'static {
    fn run(&mut self) -> Result<()>;

    fn describe(&self) -> String {
        "task".to_string()
    }
}

impl<F> Task for F
where
    F: FnMut() -> Result<()> + Send + 'static,
{
    fn run(&mut self) -> Result<()> {
        self()
    }
}

pub enum Message {
    Run(TaskHandle, Box<dyn Task>),
    Terminate,
}

struct PoolState {
    // tasks submitted but not yet completed, queued or running
    depth: usize,
    closed: bool,
    workers_alive: usize,
}

pub(crate) struct Shared {
    state: Mutex<PoolState>,
    // broadcast on every depth decrease, close and worker exit;
    // waiters re-check their own predicate
    depth_changed: Condvar,
    registry: Registry,
    max_queued: usize,
    next_handle: AtomicU64,
    logger: Logger,
}

impl Shared {
    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn logger(&self) -> &Logger {
        &self.logger
    }

    // called by a worker after a task completes, success or failure
    pub(crate) fn task_finished(&self) {
        let mut state = self.state.lock().expect("pool state lock poisoned");
        state.depth -= 1;
        self.depth_changed.notify_all();
    }

    pub(crate) fn worker_exited(&self) {
        let mut state = self.state.lock().expect("pool state lock poisoned");
        state.workers_alive -= 1;
        self.depth_changed.notify_all();
    }
}

/// A fixed-size worker pool with a bounded queue. Submission blocks once the
/// number of outstanding tasks reaches the configured maximum, and task
/// failures are collected instead of propagated.
///
/// # Example
///
/// ```
/// use workpool::TaskPool;
///
/// let pool = TaskPool::new(2, 4).unwrap();
/// pool.submit(|| Ok(())).unwrap();
/// let errors = pool.wait_until_empty();
/// assert!(errors.is_empty());
/// ```
pub struct TaskPool {
    shared: Arc<Shared>,
    sender: Sender<Message>,
    workers: Mutex<Vec<Worker>>,
    size: usize,
}

impl TaskPool {
    pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

    pub fn new(threads: usize, max_queued: usize) -> Result<TaskPool> {
        Self::with_logger(threads, max_queued, Logger::root(slog::Discard, o!()))
    }

    pub fn with_logger(threads: usize, max_queued: usize, logger: Logger) -> Result<TaskPool> {
        if threads == 0 {
            return Err(Error::from(ErrorKind::Config(
                "pool needs at least one worker".to_string(),
            )));
        }
        if max_queued == 0 {
            return Err(Error::from(ErrorKind::Config(
                "max queue depth must be at least 1".to_string(),
            )));
        }

        let (sender, receiver) = unbounded::<Message>();
        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                depth: 0,
                closed: false,
                workers_alive: threads,
            }),
            depth_changed: Condvar::new(),
            registry: Registry::new(),
            max_queued,
            next_handle: AtomicU64::new(0),
            logger,
        });

        let mut workers = Vec::with_capacity(threads);
        for id in 0..threads {
            workers.push(Worker::new(id, receiver.clone(), Arc::clone(&shared))?);
        }

        Ok(TaskPool {
            shared,
            sender,
            workers: Mutex::new(workers),
            size: threads,
        })
    }

    /// submits a task, blocking while the queue is at its maximum depth, and
    /// returns a non-exhaustive snapshot of errors from earlier tasks
    pub fn submit<T: Task>(&self, task: T) -> Result<Vec<TaskError>> {
        let mut state = self.shared.state.lock().expect("pool state lock poisoned");
        if state.closed {
            return Err(Error::from(ErrorKind::PoolClosed));
        }

        while state.depth >= self.shared.max_queued {
            state = self
                .shared
                .depth_changed
                .wait(state)
                .expect("pool state lock poisoned");
            if state.closed {
                return Err(Error::from(ErrorKind::PoolClosed));
            }
        }

        state.depth += 1;
        let handle = self.shared.next_handle.fetch_add(1, Ordering::SeqCst);
        let task = Box::new(task);
        self.shared.registry.register(handle, task.describe());

        // dispatch while still holding the state lock, so a concurrent
        // shutdown cannot slot its terminate messages ahead of an admitted task
        if self.sender.send(Message::Run(handle, task)).is_err() {
            state.depth -= 1;
            self.shared.registry.complete(handle);
            return Err(Error::from(ErrorKind::PoolClosed));
        }
        drop(state);

        Ok(self.shared.registry.drain(false))
    }

    /// blocks until the pool has no queued or running tasks, then returns
    /// every stored error
    /// NOTE: this does not stop other callers submitting more work meanwhile
    pub fn wait_until_empty(&self) -> Vec<TaskError> {
        let mut state = self.shared.state.lock().expect("pool state lock poisoned");
        while state.depth > 0 {
            state = self
                .shared
                .depth_changed
                .wait(state)
                .expect("pool state lock poisoned");
        }
        drop(state);

        self.shared.registry.drain(true)
    }

    /// `shutdown_and_wait` with the default check interval
    pub fn shutdown(&self) -> Vec<TaskError> {
        self.shutdown_and_wait(Self::DEFAULT_CHECK_INTERVAL)
    }

    /// closes the pool to new submissions, waits for already-admitted tasks
    /// to finish, re-checking worker termination at `check_interval`, then
    /// returns every stored error. Safe to call more than once.
    pub fn shutdown_and_wait(&self, check_interval: Duration) -> Vec<TaskError> {
        {
            let mut state = self.shared.state.lock().expect("pool state lock poisoned");
            if !state.closed {
                state.closed = true;
                // terminates queue behind all admitted work
                for _ in 0..self.size {
                    let _ = self.sender.send(Message::Terminate);
                }
                // wake parked submitters so they fail with PoolClosed
                self.shared.depth_changed.notify_all();
            }
        }

        let mut state = self.shared.state.lock().expect("pool state lock poisoned");
        while state.workers_alive > 0 {
            let (next, timeout) = self
                .shared
                .depth_changed
                .wait_timeout(state, check_interval)
                .expect("pool state lock poisoned");
            state = next;
            if timeout.timed_out() && state.workers_alive > 0 {
                trace!(
                    self.shared.logger,
                    "waiting for {} tasks to complete",
                    state.depth
                );
            }
        }
        drop(state);

        let mut workers = self.workers.lock().expect("pool workers lock poisoned");
        for worker in workers.iter_mut() {
            worker.join();
        }

        self.shared.registry.drain(true)
    }

    pub fn queue_depth(&self) -> usize {
        self.shared
            .state
            .lock()
            .expect("pool state lock poisoned")
            .depth
    }

    pub fn is_closed(&self) -> bool {
        self.shared
            .state
            .lock()
            .expect("pool state lock poisoned")
            .closed
    }
}

// stop the workers if the pool is dropped without an explicit shutdown
impl Drop for TaskPool {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock().expect("pool state lock poisoned");
        if !state.closed {
            state.closed = true;
            for _ in 0..self.size {
                let _ = self.sender.send(Message::Terminate);
            }
            self.shared.depth_changed.notify_all();
        }
    }
}
