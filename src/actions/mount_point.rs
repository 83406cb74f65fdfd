use crate::app::context::AppContext;
use crate::core::device::Sid;

use super::{Action, ActionResult};

/// Assign the mount point typed by the user.  An empty value unmounts.
#[derive(Debug)]
pub struct SetMountPoint {
    sid: Sid,
    value: String,
}

impl SetMountPoint {
    pub fn new(sid: Sid, value: impl Into<String>) -> Self {
        Self {
            sid,
            value: value.into(),
        }
    }
}

impl Action for SetMountPoint {
    fn run(&mut self, ctx: &mut AppContext) -> ActionResult {
        let graph = ctx.storage.current();
        let before = graph
            .find_device(self.sid)
            .and_then(|d| graph.mount_point_of(d))
            .map(str::to_string);

        if let Err(e) = ctx.storage.current_mut().set_mount_point(self.sid, &self.value) {
            ctx.error(e.to_string());
            return ActionResult::Abort;
        }

        let graph = ctx.storage.current();
        let after = graph
            .find_device(self.sid)
            .and_then(|d| graph.mount_point_of(d))
            .map(str::to_string);
        if before == after {
            return ActionResult::Abort;
        }

        tracing::info!("mount point of sid {}: {before:?} -> {after:?}", self.sid);
        ctx.status = Some(match after {
            Some(mp) => format!("Mount point set to {mp}"),
            None => "Mount point removed".to_string(),
        });
        ActionResult::Finish
    }
}
