use fnv::FnvHashMap;

use crate::dfs::{ReplicaVolume, VolumeTag};

/// Converts the opaque volume identifiers returned by the storage service
/// into dense 0-based per-host indices the scheduler can use as disk ids.
///
/// Identifiers are only unique within a single volume query batch, so the
/// assignment state lives for one loader invocation and is discarded
/// afterwards.
#[derive(Default)]
pub struct DiskIdAssigner {
    // For each host, maps each volume identifier to a 0 based index.
    host_disks: FnvHashMap<String, FnvHashMap<VolumeTag, i32>>,
}

impl DiskIdAssigner {
    pub fn new() -> DiskIdAssigner {
        DiskIdAssigner::default()
    }

    /// Disk ids for one block, parallel to `host_ports`. Returns None when
    /// any replica's volume is unresolved or the replica lists are
    /// inconsistent; the block is then scheduled without disk locality and
    /// assignment continues with the next block.
    pub fn assign(
        &mut self,
        host_ports: &[String],
        volumes: &[ReplicaVolume],
    ) -> Option<Vec<i32>> {
        if host_ports.len() != volumes.len() {
            warn!(
                "replica host count {} does not match volume count {}",
                host_ports.len(),
                volumes.len()
            );
            return None;
        }
        let mut disk_ids = Vec::with_capacity(volumes.len());
        for (host_port, volume) in host_ports.iter().zip(volumes) {
            match volume {
                ReplicaVolume::Unresolved => return None,
                // The storage node with this replica did not respond to the
                // volume query. -1 makes the scheduler assign a random disk.
                ReplicaVolume::Invalid => disk_ids.push(-1),
                ReplicaVolume::Volume(tag) => {
                    let host_disks = self.host_disks.entry(host_port.clone()).or_default();
                    let next_index = host_disks.len() as i32;
                    disk_ids.push(*host_disks.entry(*tag).or_insert(next_index));
                }
            }
        }
        Some(disk_ids)
    }
}
