//! In-memory `Storage` shared by the unit tests.

use crate::domain::ports::Storage;
use crate::utils::error::{RatesError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
pub(crate) struct MockStorage {
    pub files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    pub reads: Arc<AtomicUsize>,
}

impl MockStorage {
    pub async fn with_file(path: &str, data: &[u8]) -> Self {
        let storage = Self::default();
        storage
            .files
            .lock()
            .await
            .insert(path.to_string(), data.to_vec());
        storage
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Storage for MockStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let files = self.files.lock().await;
        files.get(path).cloned().ok_or_else(|| {
            RatesError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }
}
