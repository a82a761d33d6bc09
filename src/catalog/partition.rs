use super::format::StorageDescriptor;

pub type PartitionID = u64;

/// One file in a partition directory, as reported by the metastore sync.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub path: String,
    pub length: u64,
}

impl FileDescriptor {
    pub fn new(path: impl Into<String>, length: u64) -> FileDescriptor {
        FileDescriptor {
            path: path.into(),
            length,
        }
    }
}

/// A partition of a table, mapping to one directory in the distributed
/// filesystem. Supplied by the catalog; the block metadata layer only reads
/// its file descriptors and storage format.
///
/// The id is the cache key. Reloading a partition produces a new id, which
/// naturally invalidates any stale cache entry for the old incarnation.
#[derive(Debug)]
pub struct Partition {
    id: PartitionID,
    table_name: String,
    location: String,
    storage_descriptor: StorageDescriptor,
    file_descriptors: Vec<FileDescriptor>,
}

impl Partition {
    pub fn new(
        id: PartitionID,
        table_name: impl Into<String>,
        location: impl Into<String>,
        storage_descriptor: StorageDescriptor,
        file_descriptors: Vec<FileDescriptor>,
    ) -> Partition {
        Partition {
            id,
            table_name: table_name.into(),
            location: location.into(),
            storage_descriptor,
            file_descriptors,
        }
    }

    pub fn id(&self) -> PartitionID {
        self.id
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn storage_descriptor(&self) -> &StorageDescriptor {
        &self.storage_descriptor
    }

    pub fn file_descriptors(&self) -> &[FileDescriptor] {
        &self.file_descriptors
    }
}
