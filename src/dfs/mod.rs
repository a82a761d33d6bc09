mod mem;

pub use mem::MemDfs;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DfsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Remote(String),
}

/// Status of a path in the distributed filesystem.
#[derive(Debug, Clone)]
pub struct FileStatus {
    pub length: u64,
    pub is_directory: bool,
}

/// One physical block of a file: its byte range and the host:port of each
/// replica, in the order the storage service reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLocation {
    pub offset: u64,
    pub length: u64,
    pub host_ports: Vec<String>,
}

/// Opaque token identifying a physical disk on one host. Only unique within
/// a single block-volume query batch; carries no meaning across queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VolumeTag(pub u64);

/// Volume information for one replica of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicaVolume {
    /// The storage service returned no volume information for this replica.
    Unresolved,
    /// The storage node holding this replica did not respond to the volume
    /// query; the scheduler will pick a disk at random.
    Invalid,
    Volume(VolumeTag),
}

/// Per-replica volume information for one block, parallel to the block's
/// `host_ports`.
#[derive(Debug, Clone)]
pub struct BlockVolumes {
    pub volumes: Vec<ReplicaVolume>,
}

/// Client for the distributed filesystem service. Constructed once and
/// injected into the loader so tests can substitute an in-memory double.
pub trait DfsClient: Send + Sync + 'static {
    fn file_status(&self, path: &str) -> Result<FileStatus, DfsError>;

    /// Block locations for the byte range `[offset, offset + length)` of a
    /// file. Blocks are returned in file order.
    fn block_locations(
        &self,
        path: &str,
        offset: u64,
        length: u64,
    ) -> Result<Vec<BlockLocation>, DfsError>;

    /// Whether the deployment exposes physical volume information for block
    /// replicas.
    fn supports_volume_ids(&self) -> bool;

    /// Batched physical volume lookup for a set of blocks. The result is
    /// parallel to `blocks`, but the service may legitimately return an empty
    /// or shorter list when its view has changed since the blocks were
    /// listed.
    fn block_volumes(&self, blocks: &[BlockLocation]) -> Result<Vec<BlockVolumes>, DfsError>;
}
