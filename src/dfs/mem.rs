use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{BlockLocation, BlockVolumes, DfsClient, DfsError, FileStatus, ReplicaVolume};

struct MemFile {
    length: u64,
    is_directory: bool,
    blocks: Vec<BlockLocation>,
}

/// In-memory stand-in for the distributed filesystem, used by tests.
///
/// Files, directories and failures are registered per path. Volume results
/// for `block_volumes` are scripted as one flat list parallel to the blocks
/// the loader accumulates, which lets tests exercise the empty-result and
/// length-mismatch paths.
#[derive(Default)]
pub struct MemDfs {
    files: Mutex<HashMap<String, MemFile>>,
    failing_paths: Mutex<HashMap<String, String>>,
    failing_volume_query: Mutex<Option<String>>,
    volume_plan: Mutex<Vec<Vec<ReplicaVolume>>>,
    supports_volume_ids: bool,
    latency: Option<Duration>,
    status_calls: AtomicUsize,
}

impl MemDfs {
    pub fn new() -> MemDfs {
        MemDfs::default()
    }

    pub fn with_volume_ids() -> MemDfs {
        MemDfs {
            supports_volume_ids: true,
            ..MemDfs::default()
        }
    }

    /// Delays every `file_status` call, to widen the window in which
    /// concurrent lookups overlap.
    pub fn with_latency(mut self, latency: Duration) -> MemDfs {
        self.latency = Some(latency);
        self
    }

    pub fn add_file(&self, path: &str, length: u64, blocks: Vec<BlockLocation>) {
        self.files.lock().unwrap().insert(
            path.to_string(),
            MemFile {
                length,
                is_directory: false,
                blocks,
            },
        );
    }

    pub fn add_directory(&self, path: &str) {
        self.files.lock().unwrap().insert(
            path.to_string(),
            MemFile {
                length: 0,
                is_directory: true,
                blocks: Vec::new(),
            },
        );
    }

    pub fn fail_path(&self, path: &str, message: &str) {
        self.failing_paths
            .lock()
            .unwrap()
            .insert(path.to_string(), message.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing_paths.lock().unwrap().clear();
        *self.failing_volume_query.lock().unwrap() = None;
    }

    /// Makes the next `block_volumes` call fail with an I/O-level error.
    pub fn fail_volume_query(&self, message: &str) {
        *self.failing_volume_query.lock().unwrap() = Some(message.to_string());
    }

    /// Per-block replica volumes returned by the next `block_volumes` call,
    /// in block accumulation order.
    pub fn set_volume_plan(&self, plan: Vec<Vec<ReplicaVolume>>) {
        *self.volume_plan.lock().unwrap() = plan;
    }

    /// Number of `file_status` calls served so far.
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self, path: &str) -> Result<(), DfsError> {
        if let Some(message) = self.failing_paths.lock().unwrap().get(path) {
            return Err(DfsError::Remote(message.clone()));
        }
        Ok(())
    }
}

impl DfsClient for MemDfs {
    fn file_status(&self, path: &str) -> Result<FileStatus, DfsError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
        self.check_failure(path)?;
        let files = self.files.lock().unwrap();
        let file = files
            .get(path)
            .ok_or_else(|| DfsError::Remote(format!("no such file: {}", path)))?;
        Ok(FileStatus {
            length: file.length,
            is_directory: file.is_directory,
        })
    }

    fn block_locations(
        &self,
        path: &str,
        _offset: u64,
        _length: u64,
    ) -> Result<Vec<BlockLocation>, DfsError> {
        self.check_failure(path)?;
        let files = self.files.lock().unwrap();
        let file = files
            .get(path)
            .ok_or_else(|| DfsError::Remote(format!("no such file: {}", path)))?;
        Ok(file.blocks.clone())
    }

    fn supports_volume_ids(&self) -> bool {
        self.supports_volume_ids
    }

    fn block_volumes(&self, _blocks: &[BlockLocation]) -> Result<Vec<BlockVolumes>, DfsError> {
        if let Some(message) = self.failing_volume_query.lock().unwrap().as_ref() {
            return Err(DfsError::Remote(message.clone()));
        }
        let plan = self.volume_plan.lock().unwrap();
        Ok(plan
            .iter()
            .map(|volumes| BlockVolumes {
                volumes: volumes.clone(),
            })
            .collect())
    }
}
