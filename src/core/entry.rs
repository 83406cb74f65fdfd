//! Device table entries, the presentation tree behind every device table.
//!
//! A [`DeviceTableEntry`] wraps one device (or one fstab record) together
//! with the entries nested below it: partitions under their disk, logical
//! partitions under the extended one, logical volumes under their volume
//! group, thin volumes under their pool and Btrfs subvolumes under their
//! filesystem.  Entries borrow from the [`Devicegraph`] and are rebuilt from
//! scratch on every refresh; nothing here is cached.

use std::collections::HashMap;
use std::fmt;

use super::device::{Device, DeviceKind, LvType, PartitionType, Sid};
use super::devicegraph::{Devicegraph, FstabEntry};

// ───────────────────────────────────────── row identity ──────

/// Identifier of a table row, stable across rebuilds of the same graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowId {
    Device(Sid),
    /// Fstab records have no sid; they are identified by their position in
    /// the graph that owns them.
    Fstab(usize),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(sid) => write!(f, "table:device:{sid}"),
            Self::Fstab(index) => write!(f, "table:fstab:{index}"),
        }
    }
}

/// What an entry stands for.
#[derive(Debug, Clone, Copy)]
pub enum EntryTarget<'a> {
    Device(&'a Device),
    Fstab { index: usize, entry: &'a FstabEntry },
}

impl<'a> EntryTarget<'a> {
    pub fn row_id(&self) -> RowId {
        match self {
            Self::Device(device) => RowId::Device(device.sid),
            Self::Fstab { index, .. } => RowId::Fstab(*index),
        }
    }

    pub fn device(&self) -> Option<&'a Device> {
        match self {
            Self::Device(device) => Some(*device),
            Self::Fstab { .. } => None,
        }
    }
}

// ───────────────────────────────────────── table rows ────────

/// A column of a device table, as far as the entry tree is concerned.
pub trait TableColumn {
    fn value(&self, entry: &DeviceTableEntry<'_>) -> String;
}

/// Row description handed to the table widget: one value per column plus the
/// nested rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableItem {
    pub id: RowId,
    pub values: Vec<String>,
    pub open: bool,
    pub children: Vec<TableItem>,
}

// ───────────────────────────────────────── entry ─────────────

#[derive(Debug, Clone)]
pub struct DeviceTableEntry<'a> {
    graph: &'a Devicegraph,
    target: EntryTarget<'a>,
    children: Vec<DeviceTableEntry<'a>>,
    /// Show `/dev/sda1` instead of `sda1` in the device column.
    full_names: bool,
}

impl<'a> DeviceTableEntry<'a> {
    /// A leaf entry.
    pub fn new(graph: &'a Devicegraph, target: EntryTarget<'a>, full_names: bool) -> Self {
        Self {
            graph,
            target,
            children: Vec::new(),
            full_names,
        }
    }

    /// An entry with its whole subtree.
    pub fn new_with_children(graph: &'a Devicegraph, target: EntryTarget<'a>, full_names: bool) -> Self {
        let children = match target {
            EntryTarget::Device(device) => child_devices(graph, device)
                .into_iter()
                .map(|child| Self::new_with_children(graph, EntryTarget::Device(child), full_names))
                .collect(),
            EntryTarget::Fstab { .. } => Vec::new(),
        };
        Self {
            graph,
            target,
            children,
            full_names,
        }
    }

    pub fn for_device(graph: &'a Devicegraph, device: &'a Device, full_names: bool) -> Self {
        Self::new_with_children(graph, EntryTarget::Device(device), full_names)
    }

    pub fn for_fstab(graph: &'a Devicegraph, index: usize, full_names: bool) -> Option<Self> {
        let entry = graph.fstab_entries().get(index)?;
        Some(Self::new(graph, EntryTarget::Fstab { index, entry }, full_names))
    }

    pub fn graph(&self) -> &'a Devicegraph {
        self.graph
    }

    pub fn target(&self) -> EntryTarget<'a> {
        self.target
    }

    pub fn device(&self) -> Option<&'a Device> {
        self.target.device()
    }

    pub fn children(&self) -> &[DeviceTableEntry<'a>] {
        &self.children
    }

    pub fn full_names(&self) -> bool {
        self.full_names
    }

    pub fn row_id(&self) -> RowId {
        self.target.row_id()
    }

    /// Name for the device column.
    pub fn name(&self) -> String {
        match self.target {
            EntryTarget::Device(device) => match &device.kind {
                DeviceKind::Filesystem(_) => self.graph.display_name(device),
                DeviceKind::BtrfsSubvolume(_) => device.basename().to_string(),
                _ if self.full_names => device.name.clone(),
                _ => device.basename().to_string(),
            },
            EntryTarget::Fstab { entry, .. } => entry.device.clone(),
        }
    }

    /// Mount point of the filesystem or subvolume behind this entry.
    pub fn mount_point(&self) -> Option<&'a str> {
        match self.target {
            EntryTarget::Device(device) => self.graph.mount_point_of(device),
            EntryTarget::Fstab { entry, .. } => Some(entry.mount_point.as_str()),
        }
    }

    /// Values of this entry only, one per column.
    pub fn values<C: TableColumn>(&self, columns: &[C]) -> Vec<String> {
        columns.iter().map(|c| c.value(self)).collect()
    }

    /// Row for this entry alone, as shown in a flat (filtered) table.
    pub fn flat_item<C: TableColumn>(&self, columns: &[C]) -> TableItem {
        TableItem {
            id: self.row_id(),
            values: self.values(columns),
            open: true,
            children: Vec::new(),
        }
    }

    /// Row description for this entry and, recursively, its children.
    /// Rows missing from `open_state` are open.
    pub fn table_item<C: TableColumn>(&self, columns: &[C], open_state: &HashMap<RowId, bool>) -> TableItem {
        let id = self.row_id();
        TableItem {
            id,
            values: self.values(columns),
            open: open_state.get(&id).copied().unwrap_or(true),
            children: self
                .children
                .iter()
                .map(|child| child.table_item(columns, open_state))
                .collect(),
        }
    }

    /// This entry followed by all its descendants, depth-first.
    pub fn all_entries(&self) -> Vec<&DeviceTableEntry<'a>> {
        let mut out = Vec::new();
        self.collect_entries(&mut out);
        out
    }

    fn collect_entries<'s>(&'s self, out: &mut Vec<&'s DeviceTableEntry<'a>>) {
        out.push(self);
        for child in &self.children {
            child.collect_entries(out);
        }
    }

    /// The graph devices of [`all_entries`](Self::all_entries); fstab records
    /// are skipped.
    pub fn all_devices(&self) -> Vec<&'a Device> {
        self.all_entries().into_iter().filter_map(|e| e.device()).collect()
    }
}

// ───────────────────────────────────────── nesting rules ─────

/// Devices shown directly below `device`.
fn child_devices<'a>(graph: &'a Devicegraph, device: &'a Device) -> Vec<&'a Device> {
    match &device.kind {
        DeviceKind::Disk(_) | DeviceKind::Md(_) => {
            let partitions = graph.partitions_of(device.sid);
            if partitions.is_empty() {
                single_device_subvolumes(graph, device)
            } else {
                partitions
                    .into_iter()
                    .filter(|p| p.as_partition().is_some_and(|p| p.partition_type != PartitionType::Logical))
                    .collect()
            }
        }
        DeviceKind::Partition(p) if p.partition_type == PartitionType::Extended => graph
            .partitions_of(p.partitionable)
            .into_iter()
            .filter(|l| l.as_partition().is_some_and(|l| l.partition_type == PartitionType::Logical))
            .collect(),
        DeviceKind::Partition(_) => single_device_subvolumes(graph, device),
        DeviceKind::LvmVg(_) => graph
            .lvs_of(device.sid)
            .into_iter()
            .filter(|lv| lv.as_lv().is_some_and(|lv| lv.lv_type != LvType::Thin))
            .collect(),
        DeviceKind::LvmLv(lv) if lv.lv_type == LvType::ThinPool => graph.thin_volumes_of(device.sid),
        DeviceKind::LvmLv(_) => single_device_subvolumes(graph, device),
        DeviceKind::Filesystem(fs) if fs.is_btrfs() => visible_subvolumes(graph, device),
        DeviceKind::Filesystem(_) | DeviceKind::BtrfsSubvolume(_) => Vec::new(),
    }
}

/// Subvolumes of the Btrfs sitting on a block device, unless that Btrfs
/// spans several devices (it is then listed on its own).
fn single_device_subvolumes<'a>(graph: &'a Devicegraph, blk: &'a Device) -> Vec<&'a Device> {
    match graph.filesystem_of(blk.sid) {
        Some(fs) if fs.as_filesystem().is_some_and(|f| f.is_btrfs() && !f.is_multidevice()) => {
            visible_subvolumes(graph, fs)
        }
        _ => Vec::new(),
    }
}

/// Subvolumes except the top-level one and the default/prefix one.
fn visible_subvolumes<'a>(graph: &'a Devicegraph, fs_device: &'a Device) -> Vec<&'a Device> {
    let prefix = fs_device
        .as_filesystem()
        .and_then(|fs| fs.subvolumes_prefix.as_deref());
    graph
        .subvolumes_of(fs_device.sid)
        .into_iter()
        .filter(|d| {
            d.as_subvolume().is_some_and(|sv| {
                !sv.top_level && !sv.default && Some(sv.path.as_str()) != prefix
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::core::device::{FsType, MdLevel};
    use crate::core::devicegraph::testing::GraphBuilder;

    struct Name;

    impl TableColumn for Name {
        fn value(&self, entry: &DeviceTableEntry<'_>) -> String {
            entry.name()
        }
    }

    fn names(entries: &[DeviceTableEntry<'_>]) -> Vec<String> {
        entries.iter().map(|e| e.name()).collect()
    }

    fn root<'a>(graph: &'a Devicegraph, sid: Sid) -> DeviceTableEntry<'a> {
        DeviceTableEntry::for_device(graph, graph.find_device(sid).expect("device"), false)
    }

    #[test]
    fn logical_partitions_nest_under_the_extended_one() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .partition(3, 1, 2, PartitionType::Extended)
            .partition(4, 1, 5, PartitionType::Logical)
            .partition(5, 1, 6, PartitionType::Logical)
            .build();

        let disk = root(&graph, 1);
        assert_eq!(names(disk.children()), vec!["sda1", "sda2"]);
        assert_eq!(names(disk.children()[1].children()), vec!["sda5", "sda6"]);
        assert!(disk.children()[0].children().is_empty());
    }

    #[test]
    fn thin_volumes_nest_under_their_pool() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .vg(10, "vg0", &[2])
            .lv(11, 10, "lvX", LvType::ThinPool)
            .thin(12, 10, 11, "lvX1")
            .thin(13, 10, 11, "lvX2")
            .lv(14, 10, "lvY", LvType::Normal)
            .build();

        let vg = root(&graph, 10);
        assert_eq!(names(vg.children()), vec!["lvX", "lvY"]);
        assert_eq!(names(vg.children()[0].children()), vec!["lvX1", "lvX2"]);
        assert!(vg.children()[1].children().is_empty());
    }

    #[test]
    fn btrfs_hides_top_level_and_prefix_subvolumes() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .fs(3, FsType::Btrfs, &[2], Some("/"))
            .subvolume_flags(4, 3, 5, "", true, false)
            .subvolume(5, 3, 256, "@")
            .subvolume(6, 3, 257, "@/var")
            .subvolume(7, 3, 258, "@/home")
            .build();

        let fs = root(&graph, 3);
        assert_eq!(names(fs.children()), vec!["@/home", "@/var"]);

        // The same subvolumes hang from the formatted partition.
        let disk = root(&graph, 1);
        assert_eq!(names(disk.children()[0].children()), vec!["@/home", "@/var"]);
    }

    #[test]
    fn default_subvolume_is_hidden_even_without_prefix() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .fs(2, FsType::Btrfs, &[1], None)
            .subvolume_flags(3, 2, 256, "root", false, true)
            .subvolume(4, 2, 257, "srv")
            .build();

        let disk = root(&graph, 1);
        assert_eq!(names(disk.children()), vec!["srv"]);
    }

    #[test]
    fn multidevice_btrfs_subvolumes_stay_off_the_members() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .disk(2, "/dev/sdb")
            .fs(3, FsType::Btrfs, &[1, 2], Some("/data"))
            .subvolume(4, 3, 256, "@/shares")
            .build();

        assert!(root(&graph, 1).children().is_empty());
        assert_eq!(names(root(&graph, 3).children()), vec!["@/shares"]);
    }

    #[test]
    fn devices_without_children_are_leaves() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .disk(2, "/dev/sdb")
            .md(3, "/dev/md0", MdLevel::Raid1, &[1, 2])
            .fs(4, FsType::Xfs, &[3], None)
            .fstab("/dev/md0", "/srv", "xfs")
            .build();

        assert!(root(&graph, 3).children().is_empty());
        assert!(root(&graph, 4).children().is_empty());
        let fstab = DeviceTableEntry::for_fstab(&graph, 0, false).expect("fstab entry");
        assert!(fstab.children().is_empty());
        assert!(fstab.all_devices().is_empty());
        assert!(DeviceTableEntry::for_fstab(&graph, 1, false).is_none());
    }

    #[test]
    fn all_devices_is_the_reachable_set_without_duplicates() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .partition(3, 1, 2, PartitionType::Extended)
            .partition(4, 1, 5, PartitionType::Logical)
            .fs(5, FsType::Btrfs, &[2], None)
            .subvolume(6, 5, 256, "@")
            .subvolume(7, 5, 257, "@/opt")
            .build();

        let disk = root(&graph, 1);
        let sids: Vec<Sid> = disk.all_devices().iter().map(|d| d.sid).collect();
        assert_eq!(sids, vec![1, 2, 7, 3, 4]);
        let unique: HashSet<Sid> = sids.iter().copied().collect();
        assert_eq!(unique.len(), sids.len());
        assert_eq!(disk.all_entries().len(), sids.len());
    }

    #[test]
    fn table_items_default_open_and_keep_ids() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .build();

        let open_state = HashMap::from([(RowId::Device(2), false)]);
        let first = root(&graph, 1).table_item(&[Name], &open_state);
        let second = root(&graph, 1).table_item(&[Name], &open_state);

        assert_eq!(first, second);
        assert_eq!(first.id.to_string(), "table:device:1");
        assert!(first.open);
        assert_eq!(first.values, vec!["sda"]);
        assert!(!first.children[0].open);
        assert_eq!(first.children[0].values, vec!["sda1"]);
    }

    #[test]
    fn full_names_propagate_to_children() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .build();

        let disk = DeviceTableEntry::for_device(&graph, graph.find_device(1).unwrap(), true);
        assert_eq!(names(disk.children()), vec!["/dev/sda1"]);
        assert!(disk.children()[0].full_names());
    }
}
