pub mod alert;
pub mod cache;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pool;
pub mod storage;

pub use error::{Error, ErrorKind, Result};
pub use pool::{Task, TaskError, TaskHandle, TaskPool};
