use super::{Task, TaskHandle};
use crate::error::Error;
use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::sync::Mutex;

/// a failed task, held here until a caller collects it
pub struct TaskError {
    handle: TaskHandle,
    task: Box<dyn Task>,
    cause: Error,
}

impl TaskError {
    pub fn handle(&self) -> TaskHandle {
        self.handle
    }

    pub fn task(&self) -> &dyn Task {
        self.task.as_ref()
    }

    pub fn cause(&self) -> &Error {
        &self.cause
    }

    pub fn into_cause(self) -> Error {
        self.cause
    }
}

impl fmt::Debug for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskError")
            .field("handle", &self.handle)
            .field("task", &self.task.describe())
            .field("cause", &self.cause)
            .finish()
    }
}

/// tracks which handles are outstanding and stores the errors of failed
/// tasks until they are drained
pub struct Registry {
    inner: Mutex<Inner>,
}

struct Inner {
    outstanding: HashMap<TaskHandle, String>,
    failed: Vec<TaskError>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry {
            inner: Mutex::new(Inner {
                outstanding: HashMap::new(),
                failed: Vec::new(),
            }),
        }
    }

    // called during submission, before the task becomes runnable, so a
    // completion can never race ahead of registration
    pub fn register(&self, handle: TaskHandle, description: String) {
        let mut inner = self.inner.lock().expect("registry lock poisoned");
        inner.outstanding.insert(handle, description);
    }

    pub fn complete(&self, handle: TaskHandle) {
        let mut inner = self.inner.lock().expect("registry lock poisoned");
        inner.outstanding.remove(&handle);
    }

    // a handle is written at most once, so no per-handle race to worry about
    pub fn record_failure(&self, handle: TaskHandle, task: Box<dyn Task>, cause: Error) {
        let mut inner = self.inner.lock().expect("registry lock poisoned");
        inner.outstanding.remove(&handle);
        inner.failed.push(TaskError {
            handle,
            task,
            cause,
        });
    }

    /// removes and returns all stored errors. A non-exhaustive drain backs
    /// off if the lock is contended so submission never stalls on it; an
    /// exhaustive drain always acquires the lock.
    pub fn drain(&self, exhaustive: bool) -> Vec<TaskError> {
        let mut inner = if exhaustive {
            self.inner.lock().expect("registry lock poisoned")
        } else {
            match self.inner.try_lock() {
                Ok(inner) => inner,
                Err(_) => return Vec::new(),
            }
        };

        mem::take(&mut inner.failed)
    }

    #[cfg(test)]
    pub fn outstanding(&self) -> usize {
        self.inner
            .lock()
            .expect("registry lock poisoned")
            .outstanding
            .len()
    }
}
