pub mod format;
pub mod partition;

pub use format::{Compression, FileFormat, StorageDescriptor};
pub use partition::{FileDescriptor, Partition, PartitionID};
