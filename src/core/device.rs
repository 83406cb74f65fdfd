//! Storage device model: one struct with a closed set of kinds.
//!
//! Every node of a [`Devicegraph`](super::devicegraph::Devicegraph) is a
//! [`Device`]: the attributes common to all devices plus a [`DeviceKind`]
//! carrying the type-specific payload.  Relationships are expressed as sids
//! pointing at other devices of the same graph.

use serde::{Deserialize, Serialize};

/// Stable identifier assigned by the storage system.
pub type Sid = u32;

// ───────────────────────────────────────── shared attributes ─

/// A contiguous area of a partitionable, in blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub start: u64,
    pub length: u64,
    #[serde(default = "default_block_size")]
    pub block_size: u64,
}

fn default_block_size() -> u64 {
    512
}

impl Region {
    /// Last block covered by the region (inclusive), capped at `u64::MAX`.
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.length.saturating_sub(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncryptionMethod {
    Luks1,
    Luks2,
    PlainRandom,
}

impl EncryptionMethod {
    pub fn label(self) -> &'static str {
        match self {
            Self::Luks1 => "LUKS1",
            Self::Luks2 => "LUKS2",
            Self::PlainRandom => "Plain (random key)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encryption {
    pub method: EncryptionMethod,
    /// Device-mapper name, e.g. `cr_home`.
    pub dm_name: String,
    #[serde(default)]
    pub label: Option<String>,
}

// ───────────────────────────────────────── enums ─────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionType {
    Primary,
    Extended,
    Logical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionId {
    #[default]
    Linux,
    Swap,
    Lvm,
    Raid,
    Esp,
    BiosBoot,
    Prep,
    WindowsBasicData,
    #[serde(other)]
    Unknown,
}

impl PartitionId {
    pub fn label(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Swap => "Linux Swap",
            Self::Lvm => "Linux LVM",
            Self::Raid => "Linux RAID",
            Self::Esp => "EFI System Partition",
            Self::BiosBoot => "BIOS Boot Partition",
            Self::Prep => "PReP Boot Partition",
            Self::WindowsBasicData => "Windows Data Partition",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MdLevel {
    Raid0,
    Raid1,
    Raid5,
    Raid6,
    Raid10,
    Linear,
}

impl MdLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Raid0 => "RAID0",
            Self::Raid1 => "RAID1",
            Self::Raid5 => "RAID5",
            Self::Raid6 => "RAID6",
            Self::Raid10 => "RAID10",
            Self::Linear => "Linear",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LvType {
    #[default]
    Normal,
    ThinPool,
    Thin,
    Raid,
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FsType {
    Ext2,
    Ext3,
    Ext4,
    Xfs,
    Btrfs,
    Swap,
    Vfat,
    Ntfs,
    Exfat,
    #[serde(other)]
    Unknown,
}

impl FsType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ext2 => "Ext2",
            Self::Ext3 => "Ext3",
            Self::Ext4 => "Ext4",
            Self::Xfs => "XFS",
            Self::Btrfs => "Btrfs",
            Self::Swap => "Swap",
            Self::Vfat => "FAT",
            Self::Ntfs => "NTFS",
            Self::Exfat => "exFAT",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountBy {
    Device,
    Uuid,
    Label,
    Path,
    Id,
}

impl MountBy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Device => "Device Name",
            Self::Uuid => "UUID",
            Self::Label => "Volume Label",
            Self::Path => "Device Path",
            Self::Id => "Device ID",
        }
    }
}

// ───────────────────────────────────────── payloads ──────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Disk {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub transport: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// The disk or RAID holding the partition table.
    pub partitionable: Sid,
    pub number: u32,
    pub partition_type: PartitionType,
    #[serde(default)]
    pub id: PartitionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Md {
    pub level: MdLevel,
    pub devices: Vec<Sid>,
    #[serde(default)]
    pub chunk_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeGroup {
    pub vg_name: String,
    pub extent_size: u64,
    #[serde(default)]
    pub pvs: Vec<Sid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalVolume {
    pub vg: Sid,
    pub lv_name: String,
    #[serde(default)]
    pub lv_type: LvType,
    /// For thin volumes, the pool they are allocated from.
    #[serde(default)]
    pub thin_pool: Option<Sid>,
    #[serde(default = "default_stripes")]
    pub stripes: u32,
}

fn default_stripes() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filesystem {
    pub fs_type: FsType,
    /// Block devices the filesystem lives on (several for multi-device Btrfs).
    pub devices: Vec<Sid>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub mount_point: Option<String>,
    #[serde(default)]
    pub mount_by: Option<MountBy>,
    /// Btrfs only: path of the subvolume all other subvolumes hang from.
    #[serde(default)]
    pub subvolumes_prefix: Option<String>,
}

impl Filesystem {
    pub fn is_btrfs(&self) -> bool {
        self.fs_type == FsType::Btrfs
    }

    pub fn is_multidevice(&self) -> bool {
        self.devices.len() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtrfsSubvolume {
    pub filesystem: Sid,
    pub id: u64,
    pub path: String,
    #[serde(default)]
    pub top_level: bool,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub nocow: bool,
    #[serde(default)]
    pub mount_point: Option<String>,
}

// ───────────────────────────────────────── device ────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceKind {
    Disk(Disk),
    Partition(Partition),
    Md(Md),
    LvmVg(VolumeGroup),
    LvmLv(LogicalVolume),
    Filesystem(Filesystem),
    BtrfsSubvolume(BtrfsSubvolume),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub sid: Sid,
    /// Kernel name (`/dev/sda1`), volume group path (`/dev/system`) or, for
    /// subvolumes, the subvolume path.
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub encryption: Option<Encryption>,
    pub kind: DeviceKind,
}

impl Device {
    /// Short name shown for nested rows: `sda1`, `lv_root`, `@/home`.
    pub fn basename(&self) -> &str {
        match &self.kind {
            DeviceKind::LvmLv(lv) => &lv.lv_name,
            DeviceKind::LvmVg(vg) => &vg.vg_name,
            DeviceKind::BtrfsSubvolume(sv) => &sv.path,
            _ => self.name.rsplit('/').next().unwrap_or(&self.name),
        }
    }

    pub fn is_blk_device(&self) -> bool {
        matches!(
            self.kind,
            DeviceKind::Disk(_) | DeviceKind::Partition(_) | DeviceKind::Md(_) | DeviceKind::LvmLv(_)
        )
    }

    pub fn as_partition(&self) -> Option<&Partition> {
        match &self.kind {
            DeviceKind::Partition(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_md(&self) -> Option<&Md> {
        match &self.kind {
            DeviceKind::Md(md) => Some(md),
            _ => None,
        }
    }

    pub fn as_vg(&self) -> Option<&VolumeGroup> {
        match &self.kind {
            DeviceKind::LvmVg(vg) => Some(vg),
            _ => None,
        }
    }

    pub fn as_lv(&self) -> Option<&LogicalVolume> {
        match &self.kind {
            DeviceKind::LvmLv(lv) => Some(lv),
            _ => None,
        }
    }

    pub fn as_filesystem(&self) -> Option<&Filesystem> {
        match &self.kind {
            DeviceKind::Filesystem(fs) => Some(fs),
            _ => None,
        }
    }

    pub fn as_subvolume(&self) -> Option<&BtrfsSubvolume> {
        match &self.kind {
            DeviceKind::BtrfsSubvolume(sv) => Some(sv),
            _ => None,
        }
    }

    /// Can hold a partition table.
    pub fn is_partitionable(&self) -> bool {
        matches!(self.kind, DeviceKind::Disk(_) | DeviceKind::Md(_))
    }

    /// Generic type label, independent of what sits on top of the device.
    pub fn type_label(&self) -> &'static str {
        match &self.kind {
            DeviceKind::Disk(_) => "Disk",
            DeviceKind::Partition(p) => match p.partition_type {
                PartitionType::Extended => "Extended Partition",
                _ => "Partition",
            },
            DeviceKind::Md(_) => "RAID",
            DeviceKind::LvmVg(_) => "LVM Volume Group",
            DeviceKind::LvmLv(lv) => match lv.lv_type {
                LvType::ThinPool => "Thin Pool",
                LvType::Thin => "Thin LV",
                LvType::Raid => "RAID LV",
                LvType::Snapshot => "Snapshot LV",
                LvType::Normal => "LV",
            },
            DeviceKind::Filesystem(fs) if fs.is_btrfs() => "Btrfs",
            DeviceKind::Filesystem(_) => "Filesystem",
            DeviceKind::BtrfsSubvolume(_) => "Btrfs Subvolume",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_kind_deserializes_from_tagged_json() {
        let json = r#"{
            "sid": 7,
            "name": "/dev/sda2",
            "size": 1024,
            "kind": { "type": "partition", "partitionable": 1, "number": 2, "partition_type": "extended" }
        }"#;
        let device: Device = serde_json::from_str(json).expect("parse partition");

        let part = device.as_partition().expect("partition payload");
        assert_eq!(part.partition_type, PartitionType::Extended);
        assert_eq!(part.id, PartitionId::Linux);
        assert_eq!(device.basename(), "sda2");
        assert_eq!(device.type_label(), "Extended Partition");
    }

    #[test]
    fn basename_uses_type_specific_short_names() {
        let lv = Device {
            sid: 3,
            name: "/dev/system/root".into(),
            size: 0,
            region: None,
            encryption: None,
            kind: DeviceKind::LvmLv(LogicalVolume {
                vg: 2,
                lv_name: "root".into(),
                lv_type: LvType::Normal,
                thin_pool: None,
                stripes: 1,
            }),
        };
        assert_eq!(lv.basename(), "root");
        assert!(lv.is_blk_device());
        assert!(!lv.is_partitionable());
    }

    #[test]
    fn region_end_is_inclusive() {
        let region = Region {
            start: 2048,
            length: 1024,
            block_size: 512,
        };
        assert_eq!(region.end(), 3071);
    }

    #[test]
    fn region_end_does_not_overflow() {
        let region: Region =
            serde_json::from_str(r#"{ "start": 18446744073709551615, "length": 16 }"#).expect("parse region");
        assert_eq!(region.end(), u64::MAX);
        assert_eq!(region.block_size, 512);
    }

    #[test]
    fn unknown_fs_type_falls_back() {
        let fs: FsType = serde_json::from_str("\"reiserfs\"").expect("parse fs type");
        assert_eq!(fs, FsType::Unknown);
    }
}
