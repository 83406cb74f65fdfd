//! In-memory device graph.
//!
//! The graph is an arena of [`Device`]s indexed by sid.  Relationships are
//! stored on the child side (a partition knows its partitionable, a logical
//! volume knows its volume group) and the accessors here walk them in the
//! other direction.  A graph is built once from a JSON description and then
//! only mutated through [`Devicegraph::remove_device`] and
//! [`Devicegraph::set_mount_point`].

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::device::{Device, DeviceKind, LvType, PartitionType, Sid};
use super::error::{Result, StorageError};

// ───────────────────────────────────────── fstab ─────────────

/// A line of `/etc/fstab` found on an existing system.  Not part of the
/// graph proper: it has no sid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FstabEntry {
    /// Device spec as written in the file (`UUID=…`, `LABEL=…`, `/dev/sda1`).
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl FstabEntry {
    /// Resolve the device spec against the filesystems of `graph`.
    pub fn matching_filesystem<'a>(&self, graph: &'a Devicegraph) -> Option<&'a Device> {
        let spec = self.device.as_str();
        graph.filesystems().into_iter().find(|fs_device| {
            let Some(fs) = fs_device.as_filesystem() else {
                return false;
            };
            if let Some(uuid) = spec.strip_prefix("UUID=") {
                fs.uuid.as_deref() == Some(uuid)
            } else if let Some(label) = spec.strip_prefix("LABEL=") {
                fs.label.as_deref() == Some(label)
            } else {
                graph
                    .find_by_name(spec)
                    .is_some_and(|blk| fs.devices.contains(&blk.sid))
            }
        })
    }
}

// ───────────────────────────────────────── graph ─────────────

#[derive(Deserialize)]
struct GraphDescription {
    devices: Vec<Device>,
    #[serde(default)]
    fstab: Vec<FstabEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct Devicegraph {
    devices: Vec<Device>,
    fstab: Vec<FstabEntry>,
    /// sid → position in `devices`.
    index: HashMap<Sid, usize>,
}

impl Devicegraph {
    /// Build a graph, rejecting duplicate sids, dangling or ill-typed
    /// references and devices built on themselves.
    pub fn new(devices: Vec<Device>, fstab: Vec<FstabEntry>) -> Result<Self> {
        let mut index = HashMap::with_capacity(devices.len());
        for (pos, device) in devices.iter().enumerate() {
            if index.insert(device.sid, pos).is_some() {
                return Err(StorageError::DuplicateSid(device.sid));
            }
        }
        let graph = Self {
            devices,
            fstab,
            index,
        };
        graph.validate()?;
        Ok(graph)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let description: GraphDescription = serde_json::from_str(json)?;
        Self::new(description.devices, description.fstab)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let graph = Self::from_json(&contents)?;
        tracing::debug!(
            "loaded devicegraph from {}: {} devices, {} fstab entries",
            path.display(),
            graph.devices.len(),
            graph.fstab.len()
        );
        Ok(graph)
    }

    fn validate(&self) -> Result<()> {
        for device in &self.devices {
            let sid = device.sid;
            match &device.kind {
                DeviceKind::Disk(_) => {}
                DeviceKind::Partition(p) => {
                    self.check_ref(sid, p.partitionable, "a disk or RAID", Device::is_partitionable)?;
                }
                DeviceKind::Md(md) => {
                    for &member in &md.devices {
                        self.check_ref(sid, member, "a block device", Device::is_blk_device)?;
                    }
                }
                DeviceKind::LvmVg(vg) => {
                    for &pv in &vg.pvs {
                        self.check_ref(sid, pv, "a block device", Device::is_blk_device)?;
                    }
                }
                DeviceKind::LvmLv(lv) => {
                    self.check_ref(sid, lv.vg, "a volume group", |d| d.as_vg().is_some())?;
                    if let Some(pool) = lv.thin_pool {
                        if lv.lv_type != LvType::Thin {
                            return Err(StorageError::UnexpectedThinPool(sid));
                        }
                        self.check_ref(sid, pool, "a thin pool of the same volume group", |d| {
                            d.as_lv()
                                .is_some_and(|p| p.lv_type == LvType::ThinPool && p.vg == lv.vg)
                        })?;
                    }
                }
                DeviceKind::Filesystem(fs) => {
                    for &blk in &fs.devices {
                        self.check_ref(sid, blk, "a block device", Device::is_blk_device)?;
                    }
                }
                DeviceKind::BtrfsSubvolume(sv) => {
                    self.check_ref(sid, sv.filesystem, "a Btrfs filesystem", |d| {
                        d.as_filesystem().is_some_and(|fs| fs.is_btrfs())
                    })?;
                }
            }
        }
        self.check_acyclic()
    }

    /// Devices `device` is built on.
    fn underlying(device: &Device) -> Vec<Sid> {
        match &device.kind {
            DeviceKind::Disk(_) => Vec::new(),
            DeviceKind::Partition(p) => vec![p.partitionable],
            DeviceKind::Md(md) => md.devices.clone(),
            DeviceKind::LvmVg(vg) => vg.pvs.clone(),
            DeviceKind::LvmLv(lv) => lv.thin_pool.into_iter().chain([lv.vg]).collect(),
            DeviceKind::Filesystem(fs) => fs.devices.clone(),
            DeviceKind::BtrfsSubvolume(sv) => vec![sv.filesystem],
        }
    }

    /// Reject a device that ends up built on itself, e.g. a RAID made of
    /// one of its own partitions.  References are known to resolve here.
    fn check_acyclic(&self) -> Result<()> {
        // Sids whose whole underlying chain is known to be acyclic.
        let mut done: HashSet<Sid> = HashSet::with_capacity(self.devices.len());
        for root in &self.devices {
            if done.contains(&root.sid) {
                continue;
            }
            let mut on_path: HashSet<Sid> = HashSet::from([root.sid]);
            let mut stack = vec![(root.sid, Self::underlying(root))];
            while let Some((sid, pending)) = stack.last_mut() {
                let sid = *sid;
                let Some(next) = pending.pop() else {
                    on_path.remove(&sid);
                    done.insert(sid);
                    stack.pop();
                    continue;
                };
                if done.contains(&next) {
                    continue;
                }
                if !on_path.insert(next) {
                    return Err(StorageError::CyclicReference(next));
                }
                let below = self.find_device(next).map(Self::underlying).unwrap_or_default();
                stack.push((next, below));
            }
        }
        Ok(())
    }

    fn check_ref(
        &self,
        sid: Sid,
        target: Sid,
        expected: &'static str,
        accept: impl Fn(&Device) -> bool,
    ) -> Result<()> {
        if target == sid {
            return Err(StorageError::InvalidReference {
                sid,
                target,
                expected: "a different device",
            });
        }
        let device = self
            .find_device(target)
            .ok_or(StorageError::UnknownReference { sid, target })?;
        if accept(device) {
            Ok(())
        } else {
            Err(StorageError::InvalidReference {
                sid,
                target,
                expected,
            })
        }
    }

    // ── lookups ─────────────────────────────────────────────────

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn find_device(&self, sid: Sid) -> Option<&Device> {
        self.index.get(&sid).map(|&pos| &self.devices[pos])
    }

    pub fn contains(&self, sid: Sid) -> bool {
        self.index.contains_key(&sid)
    }

    /// Look up a block device or volume group by kernel name.
    pub fn find_by_name(&self, name: &str) -> Option<&Device> {
        self.devices
            .iter()
            .filter(|d| d.is_blk_device() || d.as_vg().is_some())
            .find(|d| d.name == name)
    }

    fn select(&self, pred: impl Fn(&Device) -> bool) -> Vec<&Device> {
        self.devices.iter().filter(|d| pred(d)).collect()
    }

    pub fn disks(&self) -> Vec<&Device> {
        self.select(|d| matches!(d.kind, DeviceKind::Disk(_)))
    }

    pub fn partitions(&self) -> Vec<&Device> {
        self.select(|d| d.as_partition().is_some())
    }

    pub fn md_raids(&self) -> Vec<&Device> {
        self.select(|d| d.as_md().is_some())
    }

    pub fn volume_groups(&self) -> Vec<&Device> {
        self.select(|d| d.as_vg().is_some())
    }

    pub fn logical_volumes(&self) -> Vec<&Device> {
        self.select(|d| d.as_lv().is_some())
    }

    pub fn filesystems(&self) -> Vec<&Device> {
        self.select(|d| d.as_filesystem().is_some())
    }

    pub fn btrfs_filesystems(&self) -> Vec<&Device> {
        self.select(|d| d.as_filesystem().is_some_and(|fs| fs.is_btrfs()))
    }

    pub fn fstab_entries(&self) -> &[FstabEntry] {
        &self.fstab
    }

    // ── relationships ───────────────────────────────────────────

    /// All partitions of a partitionable, ordered by number.
    pub fn partitions_of(&self, sid: Sid) -> Vec<&Device> {
        let mut parts = self.select(|d| d.as_partition().is_some_and(|p| p.partitionable == sid));
        parts.sort_by_key(|d| d.as_partition().map_or(0, |p| p.number));
        parts
    }

    /// Logical volumes of a volume group, ordered by name.
    pub fn lvs_of(&self, vg: Sid) -> Vec<&Device> {
        let mut lvs = self.select(|d| d.as_lv().is_some_and(|lv| lv.vg == vg));
        lvs.sort_by(|a, b| a.basename().cmp(b.basename()));
        lvs
    }

    /// Thin volumes allocated from a thin pool, ordered by name.
    pub fn thin_volumes_of(&self, pool: Sid) -> Vec<&Device> {
        let mut lvs = self.select(|d| d.as_lv().is_some_and(|lv| lv.thin_pool == Some(pool)));
        lvs.sort_by(|a, b| a.basename().cmp(b.basename()));
        lvs
    }

    /// The filesystem sitting directly on a block device.
    pub fn filesystem_of(&self, sid: Sid) -> Option<&Device> {
        self.devices
            .iter()
            .find(|d| d.as_filesystem().is_some_and(|fs| fs.devices.contains(&sid)))
    }

    /// Subvolumes of a Btrfs filesystem, ordered by path.
    pub fn subvolumes_of(&self, fs: Sid) -> Vec<&Device> {
        let mut subvolumes = self.select(|d| d.as_subvolume().is_some_and(|sv| sv.filesystem == fs));
        subvolumes.sort_by(|a, b| a.basename().cmp(b.basename()));
        subvolumes
    }

    /// Mount point of a filesystem or subvolume, or of the filesystem on a
    /// block device.
    pub fn mount_point_of<'a>(&'a self, device: &'a Device) -> Option<&'a str> {
        match &device.kind {
            DeviceKind::Filesystem(fs) => fs.mount_point.as_deref(),
            DeviceKind::BtrfsSubvolume(sv) => sv.mount_point.as_deref(),
            _ if device.is_blk_device() => self
                .filesystem_of(device.sid)
                .and_then(|fs| fs.as_filesystem())
                .and_then(|fs| fs.mount_point.as_deref()),
            _ => None,
        }
    }

    /// Devices that use `sid` as one of their members: RAIDs, volume groups
    /// and multi-device filesystems.
    pub fn users_of(&self, sid: Sid) -> Vec<&Device> {
        self.select(|d| match &d.kind {
            DeviceKind::Md(md) => md.devices.contains(&sid),
            DeviceKind::LvmVg(vg) => vg.pvs.contains(&sid),
            DeviceKind::Filesystem(fs) => fs.is_multidevice() && fs.devices.contains(&sid),
            _ => false,
        })
    }

    /// Devices that stop making sense once `sid` is gone, depth-first.
    pub fn dependents(&self, sid: Sid) -> Vec<Sid> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([sid]);
        self.collect_dependents(sid, &mut out, &mut seen);
        out
    }

    fn collect_dependents(&self, sid: Sid, out: &mut Vec<Sid>, seen: &mut HashSet<Sid>) {
        let Some(parent) = self.find_device(sid) else {
            return;
        };
        let extended_of = parent
            .as_partition()
            .filter(|p| p.partition_type == PartitionType::Extended)
            .map(|p| p.partitionable);

        for device in &self.devices {
            let depends = match &device.kind {
                DeviceKind::Partition(p) => {
                    p.partitionable == sid
                        || (extended_of == Some(p.partitionable)
                            && p.partition_type == PartitionType::Logical)
                }
                DeviceKind::LvmLv(lv) => lv.vg == sid || lv.thin_pool == Some(sid),
                DeviceKind::Filesystem(fs) => !fs.is_multidevice() && fs.devices.contains(&sid),
                DeviceKind::BtrfsSubvolume(sv) => sv.filesystem == sid,
                _ => false,
            };
            if depends && seen.insert(device.sid) {
                out.push(device.sid);
                self.collect_dependents(device.sid, out, seen);
            }
        }
    }

    /// Device holding the given mount point, if any.
    pub fn mount_point_owner(&self, mount_point: &str) -> Option<&Device> {
        self.devices.iter().find(|d| match &d.kind {
            DeviceKind::Filesystem(fs) => fs.mount_point.as_deref() == Some(mount_point),
            DeviceKind::BtrfsSubvolume(sv) => sv.mount_point.as_deref() == Some(mount_point),
            _ => false,
        })
    }

    /// Name used in messages: the kernel name of block devices, the first
    /// device of a filesystem, the path of a subvolume.
    pub fn display_name(&self, device: &Device) -> String {
        match &device.kind {
            DeviceKind::Filesystem(fs) => {
                let devices: Vec<&str> = fs
                    .devices
                    .iter()
                    .filter_map(|sid| self.find_device(*sid))
                    .map(|d| d.name.as_str())
                    .collect();
                format!("{} on {}", fs.fs_type.label(), devices.join(", "))
            }
            DeviceKind::BtrfsSubvolume(sv) => format!("subvolume {}", sv.path),
            _ => device.name.clone(),
        }
    }

    // ── mutation ────────────────────────────────────────────────

    /// Sids that [`remove_device`](Self::remove_device) would remove, target
    /// first, or the reason the device cannot go.
    pub fn removal_set(&self, sid: Sid) -> Result<Vec<Sid>> {
        let target = self.find_device(sid).ok_or(StorageError::DeviceNotFound(sid))?;
        let name = self.display_name(target);

        if matches!(target.kind, DeviceKind::Disk(_)) {
            return Err(StorageError::CannotDelete {
                name,
                reason: "disks can only be emptied, not deleted".into(),
            });
        }

        let mut removed = vec![sid];
        removed.extend(self.dependents(sid));
        let removed_set: HashSet<Sid> = removed.iter().copied().collect();

        for &gone in &removed {
            if let Some(user) = self
                .users_of(gone)
                .into_iter()
                .find(|u| !removed_set.contains(&u.sid))
            {
                let member = self
                    .find_device(gone)
                    .map(|d| d.name.clone())
                    .unwrap_or_default();
                return Err(StorageError::CannotDelete {
                    name,
                    reason: format!("{member} is used by {}", self.display_name(user)),
                });
            }
        }
        Ok(removed)
    }

    /// Remove a device together with everything built on top of it.
    ///
    /// Returns the removed sids, target first.
    pub fn remove_device(&mut self, sid: Sid) -> Result<Vec<Sid>> {
        let removed = self.removal_set(sid)?;
        let removed_set: HashSet<Sid> = removed.iter().copied().collect();
        self.devices.retain(|d| !removed_set.contains(&d.sid));
        self.reindex();
        Ok(removed)
    }

    /// Set (or clear, with an empty value) the mount point of a filesystem,
    /// a subvolume, or the filesystem on a block device.
    pub fn set_mount_point(&mut self, sid: Sid, value: &str) -> Result<()> {
        let target = self.find_device(sid).ok_or(StorageError::DeviceNotFound(sid))?;
        let holder = match &target.kind {
            DeviceKind::Filesystem(_) | DeviceKind::BtrfsSubvolume(_) => sid,
            _ if target.is_blk_device() => self
                .filesystem_of(sid)
                .map(|fs| fs.sid)
                .ok_or_else(|| StorageError::NotFormatted(target.name.clone()))?,
            _ => return Err(StorageError::NotFormatted(self.display_name(target))),
        };

        let mount_point = normalize_mount_point(value)?;
        if let Some(mp) = mount_point.as_deref() {
            if let Some(owner) = self.mount_point_owner(mp).filter(|d| d.sid != holder) {
                return Err(StorageError::DuplicateMountPoint {
                    mount_point: mp.to_string(),
                    used_by: self.display_name(owner),
                });
            }
        }

        let Some(&pos) = self.index.get(&holder) else {
            return Err(StorageError::DeviceNotFound(holder));
        };
        match &mut self.devices[pos].kind {
            DeviceKind::Filesystem(fs) => fs.mount_point = mount_point,
            DeviceKind::BtrfsSubvolume(sv) => sv.mount_point = mount_point,
            _ => {}
        }
        Ok(())
    }

    fn reindex(&mut self) {
        self.index = self
            .devices
            .iter()
            .enumerate()
            .map(|(pos, d)| (d.sid, pos))
            .collect();
    }
}

/// Validate a mount point typed by the user.  Empty means "not mounted".
pub fn normalize_mount_point(value: &str) -> Result<Option<String>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if !value.starts_with('/') || value.chars().any(char::is_whitespace) {
        return Err(StorageError::InvalidMountPoint(value.to_string()));
    }
    let trimmed = value.trim_end_matches('/');
    if trimmed.is_empty() {
        Ok(Some("/".to_string()))
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

// ───────────────────────────────────────── test fixtures ─────


#[cfg(test)]
mod tests {
    use super::testing::GraphBuilder;
    use super::*;
    use crate::core::device::{FsType, MdLevel};

    fn msdos_disk() -> Devicegraph {
        GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .partition(3, 1, 2, PartitionType::Extended)
            .partition(4, 1, 5, PartitionType::Logical)
            .partition(5, 1, 6, PartitionType::Logical)
            .fs(6, FsType::Ext4, &[2], Some("/"))
            .fs(7, FsType::Xfs, &[4], Some("/srv"))
            .build()
    }

    #[test]
    fn rejects_duplicate_sids() {
        let devices = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .disk(1, "/dev/sdb")
            .devices;
        let err = Devicegraph::new(devices, Vec::new()).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateSid(1)));
    }

    #[test]
    fn rejects_dangling_and_ill_typed_references() {
        let json = r#"{ "devices": [
            { "sid": 2, "name": "/dev/sda1", "kind": { "type": "partition", "partitionable": 1, "number": 1, "partition_type": "primary" } }
        ] }"#;
        let err = Devicegraph::from_json(json).unwrap_err();
        assert!(matches!(err, StorageError::UnknownReference { sid: 2, target: 1 }));

        let json = r#"{ "devices": [
            { "sid": 2, "name": "/dev/sda1", "kind": { "type": "partition", "partitionable": 2, "number": 1, "partition_type": "primary" } }
        ] }"#;
        let err = Devicegraph::from_json(json).unwrap_err();
        assert!(matches!(err, StorageError::InvalidReference { sid: 2, target: 2, .. }));
    }

    #[test]
    fn thin_pools_cannot_name_each_other() {
        let json = r#"{ "devices": [
            { "sid": 10, "name": "/dev/vg", "kind": { "type": "lvm_vg", "vg_name": "vg", "extent_size": 4194304 } },
            { "sid": 11, "name": "/dev/vg/a", "kind": { "type": "lvm_lv", "vg": 10, "lv_name": "a", "lv_type": "thin_pool", "thin_pool": 12 } },
            { "sid": 12, "name": "/dev/vg/b", "kind": { "type": "lvm_lv", "vg": 10, "lv_name": "b", "lv_type": "thin_pool", "thin_pool": 11 } }
        ] }"#;
        let err = Devicegraph::from_json(json).unwrap_err();
        assert!(matches!(err, StorageError::UnexpectedThinPool(11)));
    }

    #[test]
    fn thin_volume_needs_a_pool_of_its_own_volume_group() {
        let devices = GraphBuilder::new()
            .vg(10, "one", &[])
            .vg(20, "two", &[])
            .lv(11, 10, "pool", LvType::ThinPool)
            .thin(21, 20, 11, "thin")
            .devices;
        let err = Devicegraph::new(devices, Vec::new()).unwrap_err();
        assert!(matches!(err, StorageError::InvalidReference { sid: 21, target: 11, .. }));
    }

    #[test]
    fn raid_built_on_its_own_partition_is_rejected() {
        let devices = GraphBuilder::new()
            .md(20, "/dev/md0", MdLevel::Raid1, &[21])
            .partition(21, 20, 1, PartitionType::Primary)
            .devices;
        let err = Devicegraph::new(devices, Vec::new()).unwrap_err();
        assert!(matches!(err, StorageError::CyclicReference(20 | 21)));
    }

    #[test]
    fn lookups_by_sid_and_name() {
        let graph = msdos_disk();
        assert_eq!(graph.find_device(4).map(|d| d.name.as_str()), Some("/dev/sda5"));
        assert_eq!(graph.find_by_name("/dev/sda6").map(|d| d.sid), Some(5));
        assert!(graph.find_by_name("fs-6").is_none());
        assert_eq!(graph.partitions_of(1).len(), 4);
        assert_eq!(graph.partitions().len(), 4);
        assert_eq!(graph.filesystems().len(), 2);
        assert!(graph.logical_volumes().is_empty());
        assert_eq!(graph.mount_point_of(graph.find_device(2).unwrap()), Some("/"));
    }

    #[test]
    fn deleting_extended_partition_removes_logicals_and_their_filesystems() {
        let mut graph = msdos_disk();
        let removed = graph.remove_device(3).expect("delete extended");

        assert_eq!(removed[0], 3);
        let mut rest: Vec<Sid> = removed[1..].to_vec();
        rest.sort();
        assert_eq!(rest, vec![4, 5, 7]);
        assert!(graph.find_device(2).is_some());
        assert!(graph.find_by_name("/dev/sda5").is_none());
    }

    #[test]
    fn disks_and_used_members_cannot_be_deleted() {
        let mut graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .disk(3, "/dev/sdb")
            .partition(4, 3, 1, PartitionType::Primary)
            .md(5, "/dev/md0", MdLevel::Raid1, &[2, 4])
            .build();

        assert!(matches!(graph.remove_device(1), Err(StorageError::CannotDelete { .. })));
        let err = graph.remove_device(2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "/dev/sda1 cannot be deleted: /dev/sda1 is used by /dev/md0"
        );
        assert!(graph.remove_device(5).is_ok());
        assert!(graph.remove_device(2).is_ok());
    }

    #[test]
    fn mount_points_are_validated_and_unique() {
        let mut graph = msdos_disk();

        let err = graph.set_mount_point(4, "/").unwrap_err();
        assert!(matches!(err, StorageError::DuplicateMountPoint { .. }));

        assert!(matches!(
            graph.set_mount_point(4, "srv data"),
            Err(StorageError::InvalidMountPoint(_))
        ));
        assert!(matches!(graph.set_mount_point(3, "/x"), Err(StorageError::NotFormatted(_))));

        graph.set_mount_point(4, "/data/").expect("set mount point");
        assert_eq!(graph.mount_point_of(graph.find_device(4).unwrap()), Some("/data"));

        // Re-applying the same mount point to the same filesystem is fine.
        graph.set_mount_point(7, "/data").expect("same owner");
        graph.set_mount_point(4, "").expect("clear");
        assert_eq!(graph.mount_point_of(graph.find_device(4).unwrap()), None);
    }

    #[test]
    fn fstab_entries_resolve_by_uuid_and_name() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .fs(3, FsType::Ext4, &[2], None)
            .fstab("UUID=uuid-3", "/home", "ext4")
            .fstab("/dev/sda1", "/home", "ext4")
            .fstab("LABEL=missing", "/opt", "xfs")
            .build();

        let entries = graph.fstab_entries();
        assert_eq!(entries[0].matching_filesystem(&graph).map(|d| d.sid), Some(3));
        assert_eq!(entries[1].matching_filesystem(&graph).map(|d| d.sid), Some(3));
        assert!(entries[2].matching_filesystem(&graph).is_none());
    }

    #[test]
    fn normalize_mount_point_handles_root_and_trailing_slashes() {
        assert_eq!(normalize_mount_point("  ").unwrap(), None);
        assert_eq!(normalize_mount_point("/").unwrap().as_deref(), Some("/"));
        assert_eq!(normalize_mount_point("///").unwrap().as_deref(), Some("/"));
        assert_eq!(normalize_mount_point("/var/").unwrap().as_deref(), Some("/var"));
        assert!(normalize_mount_point("var").is_err());
    }
}
