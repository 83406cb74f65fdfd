//! Description panel content.
//!
//! Builds plain label/value sections for the selected row.  No UI or Ratatui
//! types are used here; the panel widget only lays the sections out.

use super::capability::{Encryptable, Formattable, Resizable};
use super::device::{Device, DeviceKind, PartitionType, Sid};
use super::devicegraph::{Devicegraph, FstabEntry};
use super::entry::EntryTarget;
use super::size::{human_size, region_summary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub items: Vec<(&'static str, String)>,
}

impl Section {
    fn new(title: &'static str) -> Self {
        Self {
            title,
            items: Vec::new(),
        }
    }

    fn item(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.items.push((label, value.into()));
        self
    }

    fn opt(self, label: &'static str, value: Option<&str>) -> Self {
        self.item(label, value.unwrap_or("-"))
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn names(graph: &Devicegraph, sids: &[Sid]) -> String {
    let names: Vec<&str> = sids
        .iter()
        .filter_map(|sid| graph.find_device(*sid))
        .map(|d| d.name.as_str())
        .collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

/// Sections describing `target`, most general first.
pub fn describe(graph: &Devicegraph, target: EntryTarget<'_>) -> Vec<Section> {
    match target {
        EntryTarget::Device(device) => describe_device(graph, device),
        EntryTarget::Fstab { entry, .. } => vec![fstab_section(graph, entry)],
    }
}

fn describe_device(graph: &Devicegraph, device: &Device) -> Vec<Section> {
    let mut out = Vec::new();

    if device.is_blk_device() || device.as_vg().is_some() {
        out.push(device_section(device));
    }
    if let Some(enc) = device.encryption() {
        out.push(
            Section::new("Encryption")
                .item("Method", enc.method.label())
                .item("Device Mapper Name", enc.dm_name.clone())
                .opt("Label", enc.label.as_deref()),
        );
    }

    match &device.kind {
        DeviceKind::Disk(disk) => out.push(
            Section::new("Hard Disk")
                .opt("Model", disk.model.as_deref())
                .opt("Transport", disk.transport.as_deref())
                .item("Partitions", graph.partitions_of(device.sid).len().to_string()),
        ),
        DeviceKind::Partition(p) => {
            let kind = match p.partition_type {
                PartitionType::Primary => "Primary",
                PartitionType::Extended => "Extended",
                PartitionType::Logical => "Logical",
            };
            out.push(
                Section::new("Partition")
                    .item("Number", p.number.to_string())
                    .item("Partition Type", kind)
                    .item("Partition ID", p.id.label())
                    .item(
                        "Partition Table On",
                        graph
                            .find_device(p.partitionable)
                            .map(|d| d.name.clone())
                            .unwrap_or_else(|| "-".to_string()),
                    ),
            );
        }
        DeviceKind::Md(md) => out.push(
            Section::new("RAID")
                .item("RAID Level", md.level.label())
                .item("Chunk Size", human_size(md.chunk_size))
                .item("Devices", names(graph, &md.devices)),
        ),
        DeviceKind::LvmVg(vg) => out.push(
            Section::new("LVM")
                .item("Extent Size", human_size(vg.extent_size))
                .item("Physical Volumes", names(graph, &vg.pvs))
                .item("Logical Volumes", graph.lvs_of(device.sid).len().to_string()),
        ),
        DeviceKind::LvmLv(lv) => {
            let vg_name = graph
                .find_device(lv.vg)
                .and_then(Device::as_vg)
                .map(|vg| vg.vg_name.clone())
                .unwrap_or_else(|| "-".to_string());
            let pool = lv
                .thin_pool
                .and_then(|sid| graph.find_device(sid))
                .map(|d| d.basename().to_string());
            out.push(
                Section::new("LVM")
                    .item("Volume Group", vg_name)
                    .item("Stripes", lv.stripes.to_string())
                    .opt("Thin Pool", pool.as_deref()),
            );
        }
        DeviceKind::Filesystem(_) => out.push(filesystem_section(graph, device)),
        DeviceKind::BtrfsSubvolume(sv) => out.push(
            Section::new("Btrfs Subvolume")
                .item("Path", sv.path.clone())
                .item("ID", sv.id.to_string())
                .item("NoCOW", yes_no(sv.nocow))
                .opt("Mount Point", sv.mount_point.as_deref())
                .item(
                    "Filesystem",
                    graph
                        .find_device(sv.filesystem)
                        .map(|fs| graph.display_name(fs))
                        .unwrap_or_else(|| "-".to_string()),
                ),
        ),
    }

    if device.is_blk_device() {
        if let Some(fs) = graph.filesystem_of(device.sid) {
            out.push(filesystem_section(graph, fs));
        }
    }
    out
}

fn device_section(device: &Device) -> Section {
    let mut section = Section::new("Device")
        .item("Device", device.name.clone())
        .item("Size", human_size(device.size));
    if let Some(region) = &device.region {
        section = section.item("Region", region_summary(region));
    }
    section = section.item("Type", device.type_label());
    if device.supports_encryption() {
        section = section.item("Encrypted", yes_no(device.is_encrypted()));
    }
    if device.is_blk_device() {
        section = section.item("Formattable", yes_no(device.is_formattable()));
    }
    if let Some(reason) = device.resize_blocker() {
        section = section.item("Resizable", format!("No ({reason})"));
    }
    section
}

fn filesystem_section(graph: &Devicegraph, fs_device: &Device) -> Section {
    let Some(fs) = fs_device.as_filesystem() else {
        return Section::new("Filesystem");
    };
    let mut section = Section::new("Filesystem")
        .item("Type", fs.fs_type.label())
        .opt("Label", fs.label.as_deref())
        .opt("UUID", fs.uuid.as_deref())
        .opt("Mount Point", fs.mount_point.as_deref())
        .opt("Mount By", fs.mount_by.map(|m| m.label()));
    if fs.is_multidevice() {
        section = section.item("Devices", names(graph, &fs.devices));
    }
    if fs.is_btrfs() {
        section = section.item(
            "Subvolumes",
            graph.subvolumes_of(fs_device.sid).len().to_string(),
        );
    }
    section
}

fn fstab_section(graph: &Devicegraph, entry: &FstabEntry) -> Section {
    let matched = entry
        .matching_filesystem(graph)
        .map(|fs| graph.display_name(fs));
    Section::new("Fstab Entry")
        .item("Device", entry.device.clone())
        .item("Mount Point", entry.mount_point.clone())
        .item("Type", entry.fs_type.clone())
        .item("Options", entry.options.join(","))
        .opt("Found", matched.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::device::{FsType, MdLevel, PartitionId};
    use crate::core::devicegraph::testing::GraphBuilder;

    fn titles(sections: &[Section]) -> Vec<&'static str> {
        sections.iter().map(|s| s.title).collect()
    }

    fn value<'s>(section: &'s Section, label: &str) -> Option<&'s str> {
        section
            .items
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn formatted_partition_gets_device_partition_and_filesystem_sections() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .fs(3, FsType::Ext4, &[2], Some("/"))
            .build();
        let device = graph.find_device(2).unwrap();
        let sections = describe(&graph, EntryTarget::Device(device));

        assert_eq!(titles(&sections), vec!["Device", "Partition", "Filesystem"]);
        assert_eq!(value(&sections[0], "Encrypted"), Some("No"));
        assert_eq!(value(&sections[0], "Formattable"), Some("Yes"));
        assert_eq!(value(&sections[1], "Partition ID"), Some("Linux"));
        assert_eq!(value(&sections[2], "Mount Point"), Some("/"));
        assert_eq!(value(&sections[2], "UUID"), Some("uuid-3"));
    }

    #[test]
    fn lvm_member_partition_is_not_formattable() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition_with_id(2, 1, 1, PartitionType::Primary, PartitionId::Lvm)
            .vg(3, "data", &[2])
            .build();
        let sections = describe(&graph, EntryTarget::Device(graph.find_device(2).unwrap()));

        assert_eq!(value(&sections[0], "Formattable"), Some("No"));
        assert_eq!(value(&sections[0], "Resizable"), None);
    }

    #[test]
    fn raid_lists_member_devices() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .disk(2, "/dev/sdb")
            .md(3, "/dev/md0", MdLevel::Raid1, &[1, 2])
            .build();
        let sections = describe(&graph, EntryTarget::Device(graph.find_device(3).unwrap()));

        assert_eq!(titles(&sections), vec!["Device", "RAID"]);
        assert_eq!(value(&sections[1], "RAID Level"), Some("RAID1"));
        assert_eq!(value(&sections[1], "Devices"), Some("/dev/sda, /dev/sdb"));
        assert_eq!(value(&sections[0], "Resizable"), Some("No (RAIDs cannot be resized)"));
    }

    #[test]
    fn fstab_record_reports_matching_filesystem() {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .fs(2, FsType::Xfs, &[1], None)
            .fstab("UUID=uuid-2", "/srv", "xfs")
            .build();
        let entry = &graph.fstab_entries()[0];
        let sections = describe(&graph, EntryTarget::Fstab { index: 0, entry });

        assert_eq!(sections.len(), 1);
        assert_eq!(value(&sections[0], "Found"), Some("XFS on /dev/sda"));
        assert_eq!(value(&sections[0], "Options"), Some("defaults"));
    }
}
