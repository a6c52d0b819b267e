use super::{FileInfo, SharedStorage};
use crate::error::Result;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use walkdir::WalkDir;

/// plain filesystem backend
pub struct LocalStore;

impl SharedStorage for LocalStore {
    fn read(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let file = File::open(path)?;
        Ok(Box::new(file))
    }

    fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, data)?;
        Ok(())
    }

    fn list(&self, path: &str) -> Result<Vec<FileInfo>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let meta = entry.metadata().map_err(io::Error::from)?;
            entries.push(FileInfo::new(
                entry.path().to_string_lossy().into_owned(),
                meta.modified()?,
                meta.len(),
            ));
        }
        Ok(entries)
    }

    fn delete(&self, path: &str) -> Result<()> {
        fs::remove_file(path)?;
        Ok(())
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(Path::new(path).exists())
    }
}
