use super::{FileInfo, SharedStorage};
use crate::error::{Error, ErrorKind, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Mutex;
use std::time::SystemTime;

lazy_static! {
    // process-global so every resolved store sees the same files
    static ref FILES: Mutex<HashMap<String, StoredFile>> = Mutex::new(HashMap::new());
}

struct StoredFile {
    data: Vec<u8>,
    modified: SystemTime,
}

/// map-backed store selected by the `mem://` prefix; stands in for object
/// storage in tests and local runs
pub struct MemoryStore;

impl MemoryStore {
    pub fn clear() {
        FILES.lock().expect("memory store lock poisoned").clear();
    }
}

impl SharedStorage for MemoryStore {
    fn read(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let files = FILES.lock().expect("memory store lock poisoned");
        match files.get(path) {
            Some(file) => Ok(Box::new(Cursor::new(file.data.clone()))),
            None => Err(Error::from(ErrorKind::NotFound(path.to_string()))),
        }
    }

    fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = FILES.lock().expect("memory store lock poisoned");
        files.insert(
            path.to_string(),
            StoredFile {
                data: data.to_vec(),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn list(&self, path: &str) -> Result<Vec<FileInfo>> {
        let files = FILES.lock().expect("memory store lock poisoned");
        let mut entries = Vec::new();
        for (key, file) in files.iter() {
            if key.starts_with(path) {
                entries.push(FileInfo::new(
                    key.clone(),
                    file.modified,
                    file.data.len() as u64,
                ));
            }
        }
        Ok(entries)
    }

    fn delete(&self, path: &str) -> Result<()> {
        let mut files = FILES.lock().expect("memory store lock poisoned");
        match files.remove(path) {
            Some(_) => Ok(()),
            None => Err(Error::from(ErrorKind::NotFound(path.to_string()))),
        }
    }

    fn exists(&self, path: &str) -> Result<bool> {
        let files = FILES.lock().expect("memory store lock poisoned");
        Ok(files.contains_key(path))
    }
}
