use crate::app::context::AppContext;
use crate::core::device::Sid;

use super::{Action, ActionResult};

/// Delete a device and everything that depends on it.
#[derive(Debug)]
pub struct DeleteDevice {
    sid: Sid,
}

impl DeleteDevice {
    pub fn new(sid: Sid) -> Self {
        Self { sid }
    }
}

impl Action for DeleteDevice {
    fn run(&mut self, ctx: &mut AppContext) -> ActionResult {
        let graph = ctx.storage.current();
        let name = graph
            .find_device(self.sid)
            .map(|d| graph.display_name(d))
            .unwrap_or_default();

        match ctx.storage.current_mut().remove_device(self.sid) {
            Ok(removed) => {
                tracing::info!("deleted {name} (sid {}), {} devices removed", self.sid, removed.len());
                ctx.status = Some(match removed.len() {
                    1 => format!("Deleted {name}"),
                    n => format!("Deleted {name} and {} dependent devices", n - 1),
                });
                ActionResult::Finish
            }
            Err(e) => {
                ctx.error(e.to_string());
                ActionResult::Abort
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::context;
    use crate::app::context::Notice;

    #[test]
    fn deleting_a_partition_takes_its_filesystem() {
        let mut ctx = context();
        assert_eq!(DeleteDevice::new(3).run(&mut ctx), ActionResult::Finish);

        let graph = ctx.storage.current();
        assert!(!graph.contains(3));
        assert!(!graph.contains(5));
        assert!(graph.contains(2));
        assert_eq!(ctx.status.as_deref(), Some("Deleted /dev/sda2 and 1 dependent devices"));
        assert!(ctx.take_notices().is_empty());
    }

    #[test]
    fn deleting_the_raid_removes_the_lvm_stack_above_it() {
        let mut ctx = context();
        assert_eq!(DeleteDevice::new(30).run(&mut ctx), ActionResult::Finish);
        assert_eq!(DeleteDevice::new(20).run(&mut ctx), ActionResult::Finish);

        let graph = ctx.storage.current();
        for sid in [20, 30, 31, 32] {
            assert!(!graph.contains(sid), "sid {sid} should be gone");
        }
        assert!(graph.contains(11));
    }

    #[test]
    fn refusals_abort_with_an_error_notice() {
        let mut ctx = context();

        assert_eq!(DeleteDevice::new(1).run(&mut ctx), ActionResult::Abort);
        assert_eq!(DeleteDevice::new(11).run(&mut ctx), ActionResult::Abort);

        let notices = ctx.take_notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(
            notices[1],
            Notice::Error("/dev/sdb1 cannot be deleted: /dev/sdb1 is used by /dev/md0".into())
        );
        assert!(ctx.storage.pending_changes().is_empty());
    }
}
