//! Optional device capabilities.
//!
//! Not every device can be encrypted, formatted or resized.  Each capability
//! is a small trait implemented for [`Device`] by matching on its variant, so
//! columns and buttons ask the device instead of probing for attributes.

use super::device::{Device, DeviceKind, Encryption, LvType, PartitionId, PartitionType};

pub trait Encryptable {
    /// Whether the device type can carry an encryption layer at all.
    fn supports_encryption(&self) -> bool;

    fn encryption(&self) -> Option<&Encryption>;

    fn is_encrypted(&self) -> bool {
        self.encryption().is_some()
    }
}

pub trait Formattable {
    fn is_formattable(&self) -> bool;
}

pub trait Resizable {
    /// `None` when the device can be resized, otherwise the reason why not.
    fn resize_blocker(&self) -> Option<&'static str>;
}

impl Encryptable for Device {
    fn supports_encryption(&self) -> bool {
        match &self.kind {
            DeviceKind::Disk(_) | DeviceKind::Md(_) => true,
            DeviceKind::Partition(p) => p.partition_type != PartitionType::Extended,
            DeviceKind::LvmLv(lv) => lv.lv_type != LvType::ThinPool,
            DeviceKind::LvmVg(_) | DeviceKind::Filesystem(_) | DeviceKind::BtrfsSubvolume(_) => {
                false
            }
        }
    }

    fn encryption(&self) -> Option<&Encryption> {
        if self.supports_encryption() {
            self.encryption.as_ref()
        } else {
            None
        }
    }
}

impl Formattable for Device {
    fn is_formattable(&self) -> bool {
        match &self.kind {
            DeviceKind::Disk(_) | DeviceKind::Md(_) => true,
            DeviceKind::Partition(p) => {
                p.partition_type != PartitionType::Extended
                    && !matches!(p.id, PartitionId::Lvm | PartitionId::Raid | PartitionId::BiosBoot)
            }
            DeviceKind::LvmLv(lv) => lv.lv_type != LvType::ThinPool,
            DeviceKind::LvmVg(_) | DeviceKind::Filesystem(_) | DeviceKind::BtrfsSubvolume(_) => {
                false
            }
        }
    }
}

impl Resizable for Device {
    fn resize_blocker(&self) -> Option<&'static str> {
        match &self.kind {
            DeviceKind::Partition(_) => None,
            DeviceKind::LvmLv(lv) => match lv.lv_type {
                LvType::Snapshot => Some("snapshots cannot be resized"),
                _ => None,
            },
            DeviceKind::Disk(_) => Some("disks cannot be resized"),
            DeviceKind::Md(_) => Some("RAIDs cannot be resized"),
            DeviceKind::LvmVg(_) => Some("volume groups are resized by adding or removing physical volumes"),
            DeviceKind::Filesystem(_) => Some("resize the underlying device instead"),
            DeviceKind::BtrfsSubvolume(_) => Some("subvolumes have no size of their own"),
        }
    }
}
