//! Owner of the two devicegraphs the UI works with.
//!
//! `system` is the graph as probed and never changes.  `current` is the
//! proposal the administrator is editing; it starts as a copy of `system`
//! (or of a separately loaded staging graph) and is what every table shows.

use super::device::{Device, DeviceKind, Sid};
use super::devicegraph::Devicegraph;

/// One difference between the system and the current graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Create { sid: Sid, description: String },
    Delete { sid: Sid, description: String },
    MountPoint {
        sid: Sid,
        description: String,
        from: Option<String>,
        to: Option<String>,
    },
}

impl Change {
    pub fn sid(&self) -> Sid {
        match self {
            Self::Create { sid, .. } | Self::Delete { sid, .. } | Self::MountPoint { sid, .. } => *sid,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Self::Create { description, .. } => format!("Create {description}"),
            Self::Delete { description, .. } => format!("Delete {description}"),
            Self::MountPoint {
                description,
                from,
                to,
                ..
            } => match (from, to) {
                (None, Some(to)) => format!("Mount {description} at {to}"),
                (Some(from), None) => format!("Do not mount {description} (was {from})"),
                (Some(from), Some(to)) => format!("Move {description} from {from} to {to}"),
                (None, None) => format!("Leave {description} unmounted"),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageManager {
    system: Devicegraph,
    current: Devicegraph,
}

impl StorageManager {
    pub fn new(system: Devicegraph) -> Self {
        let current = system.clone();
        Self { system, current }
    }

    /// Start from a proposal that already differs from the probed system.
    pub fn with_staging(system: Devicegraph, staging: Devicegraph) -> Self {
        Self {
            system,
            current: staging,
        }
    }

    pub fn system(&self) -> &Devicegraph {
        &self.system
    }

    pub fn current(&self) -> &Devicegraph {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut Devicegraph {
        &mut self.current
    }

    /// Throw away every change made to the current graph.
    pub fn reset_current(&mut self) {
        self.current = self.system.clone();
    }

    /// Differences between the system and the current graph: deletions
    /// first, then creations, then mount point changes, each ordered by sid.
    pub fn pending_changes(&self) -> Vec<Change> {
        let mut deletes = Vec::new();
        let mut creates = Vec::new();
        let mut mounts = Vec::new();

        for old in self.system.devices() {
            if !self.current.contains(old.sid) {
                deletes.push(Change::Delete {
                    sid: old.sid,
                    description: describe(&self.system, old),
                });
            }
        }
        for new in self.current.devices() {
            let Some(old) = self.system.find_device(new.sid) else {
                creates.push(Change::Create {
                    sid: new.sid,
                    description: describe(&self.current, new),
                });
                continue;
            };
            if !matches!(new.kind, DeviceKind::Filesystem(_) | DeviceKind::BtrfsSubvolume(_)) {
                continue;
            }
            let from = self.system.mount_point_of(old);
            let to = self.current.mount_point_of(new);
            if from != to {
                mounts.push(Change::MountPoint {
                    sid: new.sid,
                    description: describe(&self.current, new),
                    from: from.map(str::to_string),
                    to: to.map(str::to_string),
                });
            }
        }

        for list in [&mut deletes, &mut creates, &mut mounts] {
            list.sort_by_key(Change::sid);
        }
        deletes.into_iter().chain(creates).chain(mounts).collect()
    }
}

fn describe(graph: &Devicegraph, device: &Device) -> String {
    match &device.kind {
        DeviceKind::Filesystem(_) | DeviceKind::BtrfsSubvolume(_) => graph.display_name(device),
        _ => format!("{} {}", device.type_label().to_lowercase(), device.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::device::{FsType, PartitionType};
    use crate::core::devicegraph::testing::GraphBuilder;

    fn manager() -> StorageManager {
        StorageManager::new(
            GraphBuilder::new()
                .disk(1, "/dev/sda")
                .partition(2, 1, 1, PartitionType::Primary)
                .partition(3, 1, 2, PartitionType::Primary)
                .fs(4, FsType::Ext4, &[2], Some("/"))
                .fs(5, FsType::Xfs, &[3], None)
                .build(),
        )
    }

    #[test]
    fn fresh_manager_has_no_changes() {
        assert!(manager().pending_changes().is_empty());
    }

    #[test]
    fn changes_list_deletes_then_mount_points() {
        let mut storage = manager();
        storage.current_mut().remove_device(2).expect("delete");
        storage.current_mut().set_mount_point(3, "/srv").expect("mount");

        let changes = storage.pending_changes();
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].summary(), "Delete partition /dev/sda1");
        assert_eq!(changes[1].summary(), "Delete Ext4 on /dev/sda1");
        assert_eq!(changes[2].summary(), "Mount XFS on /dev/sda2 at /srv");
    }

    #[test]
    fn reset_restores_the_system_graph() {
        let mut storage = manager();
        storage.current_mut().remove_device(3).expect("delete");
        storage.reset_current();
        assert!(storage.current().contains(3));
        assert!(storage.pending_changes().is_empty());
    }

    #[test]
    fn staging_graph_marks_new_devices() {
        let system = GraphBuilder::new().disk(1, "/dev/sda").build();
        let staging = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .build();
        let storage = StorageManager::with_staging(system, staging);

        assert_eq!(
            storage.pending_changes(),
            vec![Change::Create {
                sid: 2,
                description: "partition /dev/sda1".into()
            }]
        );
    }
}
