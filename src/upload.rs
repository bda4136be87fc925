//! Upload progress aggregation.
//!
//! Each file keeps its own transferred-bytes counter; the aggregate is always
//! recomputed as the sum of those counters over the total batch size.

use crate::error::ApiError;
use parking_lot::Mutex;
use serde::Serialize;
use std::path::Path;

/// A file queued for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Read a local file, keeping only its file name.
    pub async fn from_path(path: &Path) -> Result<Self, ApiError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidName(format!("not a file: {}", path.display())))?;
        let data = tokio::fs::read(path).await.map_err(|e| ApiError::UploadFailure {
            path: path.display().to_string(),
            source: e.into(),
        })?;
        Ok(Self { name, data })
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// One progress notification, in the order the transfer reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    pub file_index: usize,
    pub file_name: String,
    pub file_bytes: u64,
    pub loaded_bytes: u64,
    pub total_bytes: u64,
    pub percent: u8,
}

/// Floor percentage; 0 for an empty batch.
pub fn percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (u128::from(loaded) * 100 / u128::from(total)).min(100);
    pct as u8
}

pub struct UploadTracker {
    names: Vec<String>,
    total_bytes: u64,
    transferred: Mutex<Vec<u64>>,
}

impl UploadTracker {
    pub fn new(files: &[UploadFile]) -> Self {
        Self {
            names: files.iter().map(|f| f.name.clone()).collect(),
            total_bytes: files.iter().map(UploadFile::size).sum(),
            transferred: Mutex::new(vec![0; files.len()]),
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn loaded_bytes(&self) -> u64 {
        self.transferred.lock().iter().sum()
    }

    pub fn percent(&self) -> u8 {
        percent(self.loaded_bytes(), self.total_bytes)
    }

    /// Set file `index`'s counter and return the resulting aggregate.
    pub fn record(&self, index: usize, bytes: u64) -> UploadProgress {
        let loaded = {
            let mut transferred = self.transferred.lock();
            if let Some(slot) = transferred.get_mut(index) {
                *slot = bytes;
            }
            transferred.iter().sum::<u64>()
        };
        UploadProgress {
            file_index: index,
            file_name: self.names.get(index).cloned().unwrap_or_default(),
            file_bytes: bytes,
            loaded_bytes: loaded,
            total_bytes: self.total_bytes,
            percent: percent(loaded, self.total_bytes),
        }
    }
}

/// Outcome of a completed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    /// Storage paths, in upload order.
    pub paths: Vec<String>,
    pub total_bytes: u64,
}
