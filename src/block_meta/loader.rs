use std::sync::Arc;

use crate::catalog::format::{Compression, FileFormat};
use crate::catalog::partition::Partition;
use crate::dfs::{BlockLocation, DfsClient};
use crate::errors::LoadError;
use crate::interner::StringInternPool;

use super::disk_ids::DiskIdAssigner;
use super::records::PartitionBlockMetadata;

/// Loads the block metadata of one partition from the storage service.
///
/// One loader per table; it owns the table-wide host:port intern pool that
/// all of the table's partition metadata shares.
pub struct BlockMetadataLoader {
    dfs: Arc<dyn DfsClient>,
    host_ports: Arc<StringInternPool>,
}

impl BlockMetadataLoader {
    pub fn new(dfs: Arc<dyn DfsClient>) -> BlockMetadataLoader {
        BlockMetadataLoader {
            dfs,
            host_ports: Arc::new(StringInternPool::new()),
        }
    }

    /// The table-wide host:port intern pool.
    pub fn host_ports(&self) -> &Arc<StringInternPool> {
        &self.host_ports
    }

    pub fn load(&self, partition: &Arc<Partition>) -> Result<PartitionBlockMetadata, LoadError> {
        let mut result = PartitionBlockMetadata::new(partition.clone());
        // Block locations for all the files in the partition, accumulated
        // for the batched disk id pass.
        let mut blocks: Vec<BlockLocation> = Vec::new();
        let format = partition.storage_descriptor().file_format;

        for fd in partition.file_descriptors() {
            let compression = Compression::from_path(&fd.path);
            if compression == Compression::LzoIndex {
                // Index files are read by the LZO scanner directly.
                continue;
            }

            // Only .lzo on files declared as LZO text is supported; raise an
            // error on any other compressed combination.
            if compression == Compression::Lzo {
                if format != FileFormat::LzoText {
                    return Err(LoadError::CompressedFileFormatMismatch(fd.path.clone()));
                }
            } else if format == FileFormat::LzoText {
                return Err(LoadError::MissingCompressionSuffix {
                    path: fd.path.clone(),
                    suffix: ".lzo",
                });
            } else if format == FileFormat::Text && compression != Compression::None {
                return Err(LoadError::UnsupportedCompression(fd.path.clone()));
            }

            let status = self
                .dfs
                .file_status(&fd.path)
                .map_err(|e| LoadError::storage(&fd.path, e))?;
            // Ignore directories erroneously created inside a partition dir;
            // the metastore sync will not recurse into them.
            if status.is_directory {
                debug!(
                    "ignoring directory in partition {}: {}",
                    partition.id(),
                    fd.path
                );
                continue;
            }

            let locations = self
                .dfs
                .block_locations(&fd.path, 0, status.length)
                .map_err(|e| LoadError::storage(&fd.path, e))?;
            for location in locations {
                result.add_block(&fd.path, &location, &self.host_ports);
                blocks.push(location);
            }
        }
        info!(
            "loaded partition {} of table {}: {}",
            partition.id(),
            partition.table_name(),
            result
        );

        if !self.dfs.supports_volume_ids() || blocks.is_empty() {
            return Ok(result);
        }
        self.attach_disk_ids(&mut result, &blocks)?;
        Ok(result)
    }

    /// Queries physical volumes for the full block batch and converts them
    /// to dense per-host disk ids. An empty or length-mismatched result is
    /// not an error; the metadata is simply left without disk ids.
    fn attach_disk_ids(
        &self,
        result: &mut PartitionBlockMetadata,
        blocks: &[BlockLocation],
    ) -> Result<(), LoadError> {
        let partition_id = result.partition().id();
        let volumes = self
            .dfs
            .block_volumes(blocks)
            .map_err(|e| LoadError::storage(result.partition().location(), e))?;

        if volumes.is_empty() {
            warn!(
                "block volume query for partition {} returned no results",
                partition_id
            );
            return Ok(());
        }
        if volumes.len() != blocks.len() {
            error!(
                "number of volume results not equal to number of blocks: #results={} #blocks={}",
                volumes.len(),
                blocks.len()
            );
            return Ok(());
        }

        let mut assigner = DiskIdAssigner::new();
        for (block_idx, (block, block_volumes)) in blocks.iter().zip(&volumes).enumerate() {
            if let Some(disk_ids) = assigner.assign(&block.host_ports, &block_volumes.volumes) {
                result.set_block_disk_ids(block_idx, disk_ids);
            }
        }
        info!("loaded disk ids for partition {}: {}", partition_id, result);
        Ok(())
    }
}
