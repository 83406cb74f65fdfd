//! Actions: the objects buttons delegate mutations to.
//!
//! An action runs against the [`AppContext`], mutates the current graph and
//! answers whether the page should be redrawn.  Failures never propagate as
//! errors: the action queues a notice and reports [`ActionResult::Abort`].

mod delete;
mod mount_point;
mod undo;

pub use delete::DeleteDevice;
pub use mount_point::SetMountPoint;
pub use undo::UndoAllChanges;

use crate::app::context::AppContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    /// The graph changed; rebuild the table.
    Finish,
    /// Nothing changed.
    Abort,
}

pub trait Action {
    fn run(&mut self, ctx: &mut AppContext) -> ActionResult;
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::app::context::AppContext;
    use crate::core::device::{FsType, LvType, MdLevel, PartitionType};
    use crate::core::devicegraph::testing::GraphBuilder;
    use crate::core::storage::StorageManager;

    /// Two disks: sda with an ext4 root and an XFS home, sdb with a RAID
    /// member backing an LVM volume group.
    pub fn context() -> AppContext {
        let graph = GraphBuilder::new()
            .disk(1, "/dev/sda")
            .partition(2, 1, 1, PartitionType::Primary)
            .partition(3, 1, 2, PartitionType::Primary)
            .fs(4, FsType::Ext4, &[2], Some("/"))
            .fs(5, FsType::Xfs, &[3], Some("/home"))
            .disk(10, "/dev/sdb")
            .partition(11, 10, 1, PartitionType::Primary)
            .partition(12, 10, 2, PartitionType::Primary)
            .md(20, "/dev/md0", MdLevel::Raid1, &[11, 12])
            .vg(30, "data", &[20])
            .lv(31, 30, "srv", LvType::Normal)
            .fs(32, FsType::Ext4, &[31], None)
            .build();
        AppContext::new(StorageManager::new(graph))
    }
}
