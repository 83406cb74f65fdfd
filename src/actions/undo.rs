use crate::app::context::AppContext;

use super::{Action, ActionResult};

/// Throw away every change and start again from the probed system.
#[derive(Debug, Default)]
pub struct UndoAllChanges;

impl Action for UndoAllChanges {
    fn run(&mut self, ctx: &mut AppContext) -> ActionResult {
        let count = ctx.storage.pending_changes().len();
        if count == 0 {
            ctx.warning("There are no changes to undo");
            return ActionResult::Abort;
        }
        ctx.storage.reset_current();
        tracing::info!("discarded {count} pending changes");
        ctx.status = Some(format!("Discarded {count} changes"));
        ActionResult::Finish
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::context;
    use crate::actions::DeleteDevice;
    use crate::app::context::Notice;

    #[test]
    fn undo_restores_deleted_devices() {
        let mut ctx = context();
        DeleteDevice::new(3).run(&mut ctx);
        assert!(!ctx.storage.current().contains(5));

        assert_eq!(UndoAllChanges.run(&mut ctx), ActionResult::Finish);
        assert!(ctx.storage.current().contains(5));
        assert_eq!(ctx.status.as_deref(), Some("Discarded 2 changes"));
    }

    #[test]
    fn undo_without_changes_warns() {
        let mut ctx = context();
        assert_eq!(UndoAllChanges.run(&mut ctx), ActionResult::Abort);
        assert_eq!(
            ctx.take_notices(),
            vec![Notice::Warning("There are no changes to undo".into())]
        );
    }
}
