use std::fmt;
use std::sync::Arc;

use fnv::FnvHashSet;

use crate::catalog::partition::Partition;
use crate::dfs::BlockLocation;
use crate::interner::StringInternPool;

/// Block metadata used for scheduling: one physical storage block of one
/// file, with the host:port of each replica.
pub struct BlockMetadata {
    file_name: Arc<str>,
    offset: u64,
    length: u64,
    // host_ports[i] stores this block on disk_ids[i]; the scheduler uses this
    // to assign scan ranges with disk locality
    host_ports: Vec<Arc<str>>,
    disk_ids: Option<Vec<i32>>,
}

impl BlockMetadata {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn host_ports(&self) -> &[Arc<str>] {
        &self.host_ports
    }

    pub fn disk_ids(&self) -> Option<&[i32]> {
        self.disk_ids.as_deref()
    }

    /// Disk id of the replica at `host_index`; -1 if disk ids were never
    /// attached for this block. Panics if `host_index` is not a valid
    /// replica index.
    pub fn disk_id(&self, host_index: usize) -> i32 {
        assert!(
            host_index < self.host_ports.len(),
            "replica index {} out of range for block with {} replicas",
            host_index,
            self.host_ports.len()
        );
        match &self.disk_ids {
            None => -1,
            Some(disk_ids) => disk_ids[host_index],
        }
    }
}

impl fmt::Debug for BlockMetadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BlockMetadata")
            .field("file_name", &self.file_name)
            .field("offset", &self.offset)
            .field("length", &self.length)
            .field("#replicas", &self.host_ports.len())
            .finish()
    }
}

/// All block metadata for a single partition.
///
/// Kept compact by interning file names in a partition-local pool and
/// host:port strings in the table-wide pool, so each distinct string is
/// stored once no matter how many blocks reference it.
pub struct PartitionBlockMetadata {
    partition: Arc<Partition>,
    blocks: Vec<BlockMetadata>,
    // unique file names across all blocks of this partition
    unique_file_names: FnvHashSet<Arc<str>>,
    total_string_bytes: u64,
}

impl PartitionBlockMetadata {
    pub(crate) fn new(partition: Arc<Partition>) -> PartitionBlockMetadata {
        PartitionBlockMetadata {
            partition,
            blocks: Vec::new(),
            unique_file_names: FnvHashSet::default(),
            total_string_bytes: 0,
        }
    }

    /// Records one block, interning its file name and replica host:ports.
    pub(crate) fn add_block(
        &mut self,
        file_name: &str,
        location: &BlockLocation,
        host_ports: &StringInternPool,
    ) {
        let file_name = match self.unique_file_names.get(file_name) {
            Some(canonical) => canonical.clone(),
            None => {
                let canonical: Arc<str> = Arc::from(file_name);
                self.unique_file_names.insert(canonical.clone());
                self.total_string_bytes += file_name.len() as u64;
                canonical
            }
        };
        let replicas = location
            .host_ports
            .iter()
            .map(|host_port| host_ports.intern(host_port))
            .collect();
        self.blocks.push(BlockMetadata {
            file_name,
            offset: location.offset,
            length: location.length,
            host_ports: replicas,
            disk_ids: None,
        });
    }

    pub(crate) fn set_block_disk_ids(&mut self, block_idx: usize, disk_ids: Vec<i32>) {
        let block = &mut self.blocks[block_idx];
        assert_eq!(disk_ids.len(), block.host_ports.len());
        block.disk_ids = Some(disk_ids);
    }

    pub fn blocks(&self) -> &[BlockMetadata] {
        &self.blocks
    }

    pub fn partition(&self) -> &Arc<Partition> {
        &self.partition
    }

    pub fn unique_file_count(&self) -> usize {
        self.unique_file_names.len()
    }

    /// Byte length of the file name strings interned for this partition.
    /// Advisory, used for memory-usage reporting only.
    pub fn total_string_bytes(&self) -> u64 {
        self.total_string_bytes
    }
}

impl fmt::Debug for PartitionBlockMetadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PartitionBlockMetadata")
            .field("partition", &self.partition.id())
            .field("#blocks", &self.blocks.len())
            .field("#filenames", &self.unique_file_names.len())
            .field("total_string_bytes", &self.total_string_bytes)
            .finish()
    }
}

impl fmt::Display for PartitionBlockMetadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} blocks, {} files, {} interned bytes",
            self.blocks.len(),
            self.unique_file_names.len(),
            self.total_string_bytes
        )
    }
}
