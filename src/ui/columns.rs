//! Device table columns.
//!
//! A closed set of columns; each knows its title and how to render an entry.
//! Values are plain strings so the same columns serve the interactive table
//! and the `--dump` output.

use crate::core::capability::Encryptable;
use crate::core::device::{Device, DeviceKind, PartitionId};
use crate::core::devicegraph::Devicegraph;
use crate::core::entry::{DeviceTableEntry, EntryTarget, TableColumn};
use crate::core::size::human_size;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Device,
    Size,
    /// `F` when the filesystem will be created.
    Format,
    Encrypted,
    Type,
    Label,
    MountPoint,
    Start,
    End,
    RaidLevel,
    Stripes,
    Options,
}

impl Column {
    pub fn title(self) -> &'static str {
        match self {
            Column::Device => "Device",
            Column::Size => "Size",
            Column::Format => "F",
            Column::Encrypted => "Enc",
            Column::Type => "Type",
            Column::Label => "Label",
            Column::MountPoint => "Mount Point",
            Column::Start => "Start",
            Column::End => "End",
            Column::RaidLevel => "RAID Level",
            Column::Stripes => "Stripes",
            Column::Options => "Options",
        }
    }

    /// Preferred width in cells; `Device` takes what is left.
    pub fn width(self) -> u16 {
        match self {
            Column::Device => 0,
            Column::Size => 11,
            Column::Format | Column::Encrypted => 3,
            Column::Type => 22,
            Column::Label => 12,
            Column::MountPoint => 16,
            Column::Start | Column::End => 11,
            Column::RaidLevel => 10,
            Column::Stripes => 7,
            Column::Options => 20,
        }
    }

    /// Bind the column to the probed graph, which the format flag needs.
    pub fn bind(self, system: &Devicegraph) -> BoundColumn<'_> {
        BoundColumn {
            column: self,
            system,
        }
    }

    pub fn value(self, entry: &DeviceTableEntry<'_>, system: &Devicegraph) -> String {
        match entry.target() {
            EntryTarget::Device(device) => self.device_value(entry.graph(), device, entry, system),
            EntryTarget::Fstab { entry: record, .. } => match self {
                Column::Device => record.device.clone(),
                Column::MountPoint => record.mount_point.clone(),
                Column::Type => record.fs_type.clone(),
                Column::Options => record.options.join(","),
                _ => String::new(),
            },
        }
    }

    fn device_value(
        self,
        graph: &Devicegraph,
        device: &Device,
        entry: &DeviceTableEntry<'_>,
        system: &Devicegraph,
    ) -> String {
        let filesystem = filesystem_for(graph, device);
        match self {
            Column::Device => entry.name(),
            Column::Size => match device.kind {
                DeviceKind::Filesystem(_) | DeviceKind::BtrfsSubvolume(_) => String::new(),
                _ => human_size(device.size),
            },
            Column::Format => {
                let created = match device.kind {
                    DeviceKind::BtrfsSubvolume(_) => !system.contains(device.sid),
                    _ => filesystem.is_some_and(|fs| !system.contains(fs.sid)),
                };
                (if created { "F" } else { "" }).to_string()
            }
            Column::Encrypted => (if device.is_encrypted() { "E" } else { "" }).to_string(),
            Column::Type => type_value(device, filesystem),
            Column::Label => filesystem
                .and_then(Device::as_filesystem)
                .and_then(|fs| fs.label.clone())
                .unwrap_or_default(),
            Column::MountPoint => entry.mount_point().unwrap_or_default().to_string(),
            Column::Start => device.region.map(|r| r.start.to_string()).unwrap_or_default(),
            Column::End => device.region.map(|r| r.end().to_string()).unwrap_or_default(),
            Column::RaidLevel => device
                .as_md()
                .map(|md| md.level.label().to_string())
                .unwrap_or_default(),
            Column::Stripes => device
                .as_lv()
                .map(|lv| lv.stripes.to_string())
                .unwrap_or_default(),
            Column::Options => String::new(),
        }
    }
}

/// The filesystem a row stands for: the device itself or the one on it.
fn filesystem_for<'a>(graph: &'a Devicegraph, device: &'a Device) -> Option<&'a Device> {
    match device.kind {
        DeviceKind::Filesystem(_) => Some(device),
        _ if device.is_blk_device() => graph.filesystem_of(device.sid),
        _ => None,
    }
}

/// `Ext4 Partition`, `Btrfs`, `Linux LVM`, `Thin Pool`…
fn type_value(device: &Device, filesystem: Option<&Device>) -> String {
    let fs_label = filesystem
        .and_then(Device::as_filesystem)
        .map(|fs| fs.fs_type.label());
    match (&device.kind, fs_label) {
        (DeviceKind::Filesystem(_), Some(label)) => label.to_string(),
        (_, Some(label)) => format!("{label} {}", device.type_label()),
        (DeviceKind::Partition(p), None) if p.id != PartitionId::Linux => p.id.label().to_string(),
        _ => device.type_label().to_string(),
    }
}

/// A [`Column`] together with the probed graph.
#[derive(Clone, Copy)]
pub struct BoundColumn<'s> {
    pub column: Column,
    system: &'s Devicegraph,
}

impl TableColumn for BoundColumn<'_> {
    fn value(&self, entry: &DeviceTableEntry<'_>) -> String {
        self.column.value(entry, self.system)
    }
}
