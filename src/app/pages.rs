//! Device table pages shown as tabs.
//!
//! Each page has a fixed column set, a fixed way of picking its root entries
//! from the current graph and a `full_names` flag.

use clap::ValueEnum;

use crate::core::device::Device;
use crate::core::devicegraph::Devicegraph;
use crate::core::entry::DeviceTableEntry;
use crate::ui::columns::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Page {
    #[default]
    System,
    #[value(name = "disks")]
    HardDisks,
    Raid,
    Lvm,
    Btrfs,
    Fstab,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::System,
        Page::HardDisks,
        Page::Raid,
        Page::Lvm,
        Page::Btrfs,
        Page::Fstab,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Page::System => "System",
            Page::HardDisks => "Hard Disks",
            Page::Raid => "RAID",
            Page::Lvm => "Volume Management",
            Page::Btrfs => "Btrfs",
            Page::Fstab => "Fstab",
        }
    }

    /// Position in [`Page::ALL`].
    pub fn index(self) -> usize {
        match self {
            Page::System => 0,
            Page::HardDisks => 1,
            Page::Raid => 2,
            Page::Lvm => 3,
            Page::Btrfs => 4,
            Page::Fstab => 5,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn columns(self) -> &'static [Column] {
        use Column as C;
        match self {
            Page::System => &[C::Device, C::Size, C::Format, C::Encrypted, C::Type, C::Label, C::MountPoint],
            Page::HardDisks => &[
                C::Device,
                C::Size,
                C::Format,
                C::Encrypted,
                C::Type,
                C::Label,
                C::MountPoint,
                C::Start,
                C::End,
            ],
            Page::Raid => &[
                C::Device,
                C::Size,
                C::Format,
                C::Encrypted,
                C::Type,
                C::RaidLevel,
                C::Label,
                C::MountPoint,
            ],
            Page::Lvm => &[
                C::Device,
                C::Size,
                C::Format,
                C::Encrypted,
                C::Type,
                C::Stripes,
                C::Label,
                C::MountPoint,
            ],
            Page::Btrfs => &[C::Device, C::Size, C::Type, C::Label, C::MountPoint],
            Page::Fstab => &[C::Device, C::MountPoint, C::Type, C::Options],
        }
    }

    /// Show kernel names (`/dev/sda1`) instead of short names (`sda1`).
    pub fn full_names(self) -> bool {
        !matches!(self, Page::System | Page::HardDisks)
    }

    /// Top-level entries of the page, each with its subtree.
    pub fn roots<'a>(self, graph: &'a Devicegraph, full_names: bool) -> Vec<DeviceTableEntry<'a>> {
        let devices = match self {
            Page::System => {
                let mut all = by_name(graph.disks());
                all.extend(by_name(graph.md_raids()));
                all.extend(by_name(graph.volume_groups()));
                all.extend(by_name(
                    graph
                        .btrfs_filesystems()
                        .into_iter()
                        .filter(|d| d.as_filesystem().is_some_and(|fs| fs.is_multidevice()))
                        .collect(),
                ));
                all
            }
            Page::HardDisks => by_name(graph.disks()),
            Page::Raid => by_name(graph.md_raids()),
            Page::Lvm => by_name(graph.volume_groups()),
            Page::Btrfs => by_name(graph.btrfs_filesystems()),
            Page::Fstab => {
                return (0..graph.fstab_entries().len())
                    .filter_map(|index| DeviceTableEntry::for_fstab(graph, index, full_names))
                    .collect();
            }
        };
        devices
            .into_iter()
            .map(|device| DeviceTableEntry::for_device(graph, device, full_names))
            .collect()
    }
}

fn by_name(mut devices: Vec<&Device>) -> Vec<&Device> {
    devices.sort_by(|a, b| a.name.cmp(&b.name));
    devices
}
