use super::{Message, Shared, Task, TaskHandle};
use crate::error::{Error, ErrorKind, Result};
use crossbeam::channel::Receiver;
use slog::debug;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub struct Worker {
    thread: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn new(id: usize, receiver: Receiver<Message>, shared: Arc<Shared>) -> Result<Worker> {
        // named so log lines and stack dumps are attributable to the pool
        let thread = thread::Builder::new()
            .name(format!("workpool-worker-{}", id))
            .spawn(move || {
                run_loop(id, receiver, shared);
            })?;

        Ok(Worker {
            thread: Some(thread),
        })
    }

    pub fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

// listen for work until told to terminate
fn run_loop(id: usize, receiver: Receiver<Message>, shared: Arc<Shared>) {
    while let Ok(message) = receiver.recv() {
        match message {
            Message::Run(handle, task) => execute(&shared, handle, task),
            Message::Terminate => break,
        }
    }
    debug!(shared.logger(), "worker {} stopped", id);
    shared.worker_exited();
}

// run one task to completion, keeping any failure inside the pool
fn execute(shared: &Shared, handle: TaskHandle, mut task: Box<dyn Task>) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| task.run()));
    match outcome {
        Ok(Ok(())) => shared.registry().complete(handle),
        Ok(Err(cause)) => shared.registry().record_failure(handle, task, cause),
        Err(payload) => {
            let cause = Error::from(ErrorKind::TaskPanicked(panic_message(payload.as_ref())));
            shared.registry().record_failure(handle, task, cause);
        }
    }

    // decrement after the registry update, so an exhaustive drain that
    // observed depth reach zero cannot miss this task's error
    shared.task_finished();
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
