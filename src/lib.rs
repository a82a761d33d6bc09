#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

pub mod block_meta;
pub mod catalog;
pub mod dfs;
mod errors;
mod interner;
pub mod observability;

pub use block_meta::cache::{CacheConfig, CacheStats, PartitionBlockCache};
pub use block_meta::loader::BlockMetadataLoader;
pub use block_meta::records::{BlockMetadata, PartitionBlockMetadata};
pub use catalog::partition::{FileDescriptor, Partition, PartitionID};
pub use errors::LoadError;
pub use interner::StringInternPool;

pub type LoadResult = Result<std::sync::Arc<PartitionBlockMetadata>, LoadError>;
