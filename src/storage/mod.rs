use crate::error::{Error, Result};
use std::io::Read;
use std::time::SystemTime;

mod local;
mod memory;

pub use local::LocalStore;
pub use memory::MemoryStore;

/// paths under this prefix resolve to the in-memory store
pub const MEMORY_PREFIX: &str = "mem://";

#[derive(Debug, Clone)]
pub struct FileInfo {
    path: String,
    modified: SystemTime,
    size: u64,
}

impl FileInfo {
    pub fn new(path: String, modified: SystemTime, size: u64) -> FileInfo {
        FileInfo {
            path,
            modified,
            size,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

pub trait SharedStorage {
    fn read(&self, path: &str) -> Result<Box<dyn Read + Send>>;
    fn write(&self, path: &str, data: &[u8]) -> Result<()>;
    fn list(&self, path: &str) -> Result<Vec<FileInfo>>;
    fn delete(&self, path: &str) -> Result<()>;
    fn exists(&self, path: &str) -> Result<bool>;
}

/// picks the backend for a path by its prefix
pub fn store_for(path: &str) -> Box<dyn SharedStorage> {
    if path.starts_with(MEMORY_PREFIX) {
        Box::new(MemoryStore)
    } else {
        Box::new(LocalStore)
    }
}

pub fn read_bytes(path: &str) -> Result<Vec<u8>> {
    let mut reader = store_for(path).read(path)?;
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    Ok(buffer)
}

pub fn read_string(path: &str) -> Result<String> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|e| Error::from(e.to_string()))
}

pub fn write_bytes(path: &str, data: &[u8]) -> Result<()> {
    store_for(path).write(path, data)
}

pub fn write_string(path: &str, content: &str) -> Result<()> {
    write_bytes(path, content.as_bytes())
}

pub fn list(path: &str) -> Result<Vec<FileInfo>> {
    store_for(path).list(path)
}

pub fn delete(path: &str) -> Result<()> {
    store_for(path).delete(path)
}

pub fn exists(path: &str) -> Result<bool> {
    store_for(path).exists(path)
}
