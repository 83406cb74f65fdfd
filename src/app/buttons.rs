//! Buttons bound to the selected table row.
//!
//! A button only decides what activating it on a target means; the input
//! handler then runs the action, asks for confirmation or input first, or
//! shows the popup the button asked for.

use crate::actions::{Action, DeleteDevice, SetMountPoint, UndoAllChanges};
use crate::core::capability::Resizable;
use crate::core::device::DeviceKind;
use crate::core::entry::EntryTarget;
use crate::core::error::StorageError;

use super::context::AppContext;

/// Builds the action for a text typed into an input popup.
pub type InputHandler = Box<dyn FnOnce(String) -> Box<dyn Action>>;

/// What activating a button leads to.
pub enum Activation {
    Confirm {
        message: String,
        action: Box<dyn Action>,
    },
    Input {
        title: &'static str,
        initial: String,
        on_submit: InputHandler,
    },
    /// Read-only list, e.g. the pending changes.
    Summary {
        title: &'static str,
        lines: Vec<String>,
    },
    Error(String),
    Warning(String),
}

impl std::fmt::Debug for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirm { message, .. } => f.debug_struct("Confirm").field("message", message).finish(),
            Self::Input { title, initial, .. } => f
                .debug_struct("Input")
                .field("title", title)
                .field("initial", initial)
                .finish(),
            Self::Summary { title, lines } => f
                .debug_struct("Summary")
                .field("title", title)
                .field("lines", lines)
                .finish(),
            Self::Error(m) => f.debug_tuple("Error").field(m).finish(),
            Self::Warning(m) => f.debug_tuple("Warning").field(m).finish(),
        }
    }
}

pub trait DeviceButton {
    fn label(&self) -> &'static str;

    /// What the button does for `target`.  Refusals come back as errors and
    /// are shown in an error popup.
    fn activation_for(&self, ctx: &AppContext, target: EntryTarget<'_>) -> Result<Activation, StorageError>;

    fn activate(&self, ctx: &AppContext, selected: Option<EntryTarget<'_>>) -> Activation {
        let Some(target) = selected else {
            return Activation::Error(StorageError::NoSelection.to_string());
        };
        tracing::debug!("{} activated on {}", self.label(), target.row_id());
        self.activation_for(ctx, target)
            .unwrap_or_else(|e| Activation::Error(e.to_string()))
    }
}

// ───────────────────────────────────────── buttons ───────────

pub struct DeleteButton;

impl DeviceButton for DeleteButton {
    fn label(&self) -> &'static str {
        "Delete"
    }

    fn activation_for(&self, ctx: &AppContext, target: EntryTarget<'_>) -> Result<Activation, StorageError> {
        let EntryTarget::Device(device) = target else {
            return Ok(Activation::Error("Fstab entries cannot be deleted".into()));
        };
        if matches!(device.kind, DeviceKind::Disk(_)) {
            return Ok(Activation::Error(format!(
                "Disks cannot be deleted. {} can only be emptied by deleting its partitions.",
                device.name
            )));
        }
        let graph = ctx.storage.current();
        let removed = graph.removal_set(device.sid)?;
        let name = graph.display_name(device);
        let message = match removed.len() {
            1 => format!("Really delete {name}?"),
            n => format!("Really delete {name} and the {} devices that depend on it?", n - 1),
        };
        Ok(Activation::Confirm {
            message,
            action: Box::new(DeleteDevice::new(device.sid)),
        })
    }
}

pub struct MountPointButton;

impl DeviceButton for MountPointButton {
    fn label(&self) -> &'static str {
        "Edit Mount Point"
    }

    fn activation_for(&self, ctx: &AppContext, target: EntryTarget<'_>) -> Result<Activation, StorageError> {
        let EntryTarget::Device(device) = target else {
            return Ok(Activation::Error("Edit /etc/fstab entries through their device".into()));
        };
        let graph = ctx.storage.current();
        let formatted = match device.kind {
            DeviceKind::Filesystem(_) | DeviceKind::BtrfsSubvolume(_) => true,
            _ => device.is_blk_device() && graph.filesystem_of(device.sid).is_some(),
        };
        if !formatted {
            return Err(StorageError::NotFormatted(graph.display_name(device)));
        }
        let sid = device.sid;
        Ok(Activation::Input {
            title: "Mount Point",
            initial: graph.mount_point_of(device).unwrap_or_default().to_string(),
            on_submit: Box::new(move |value| Box::new(SetMountPoint::new(sid, value))),
        })
    }
}

pub struct ResizeButton;

impl DeviceButton for ResizeButton {
    fn label(&self) -> &'static str {
        "Resize"
    }

    fn activation_for(&self, ctx: &AppContext, target: EntryTarget<'_>) -> Result<Activation, StorageError> {
        let EntryTarget::Device(device) = target else {
            return Ok(Activation::Error("Fstab entries cannot be resized".into()));
        };
        if let Some(reason) = device.resize_blocker() {
            let name = ctx.storage.current().display_name(device);
            return Ok(Activation::Error(format!("{name} cannot be resized: {reason}")));
        }
        Ok(Activation::Warning("Not yet implemented".into()))
    }
}

pub struct AddButton;

impl DeviceButton for AddButton {
    fn label(&self) -> &'static str {
        "Add"
    }

    fn activation_for(&self, _ctx: &AppContext, _target: EntryTarget<'_>) -> Result<Activation, StorageError> {
        Ok(Activation::Warning("Not yet implemented".into()))
    }
}

/// Not tied to the selection, but activated the same way.
pub struct UndoAllButton;

impl UndoAllButton {
    pub fn activation(&self, ctx: &AppContext) -> Activation {
        match ctx.storage.pending_changes().len() {
            0 => Activation::Warning("There are no changes to undo".into()),
            n => Activation::Confirm {
                message: format!("Discard all {n} pending changes?"),
                action: Box::new(UndoAllChanges),
            },
        }
    }
}

pub struct ShowChangesButton;

impl ShowChangesButton {
    pub fn activation(&self, ctx: &AppContext) -> Activation {
        let mut lines: Vec<String> = ctx
            .storage
            .pending_changes()
            .iter()
            .map(|change| change.summary())
            .collect();
        if lines.is_empty() {
            lines.push("No pending changes".into());
        }
        Activation::Summary {
            title: "Pending Changes",
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::context;
    use crate::actions::ActionResult;

    fn target(ctx: &AppContext, sid: u32) -> Option<EntryTarget<'_>> {
        ctx.storage.current().find_device(sid).map(EntryTarget::Device)
    }

    #[test]
    fn no_selection_is_an_error() {
        let ctx = context();
        let activation = DeleteButton.activate(&ctx, None);
        assert!(matches!(activation, Activation::Error(m) if m == "No device selected"));
    }

    #[test]
    fn delete_asks_for_confirmation_and_mentions_dependents() {
        let ctx = context();
        match DeleteButton.activate(&ctx, target(&ctx, 3)) {
            Activation::Confirm { message, .. } => {
                assert_eq!(message, "Really delete /dev/sda2 and the 1 devices that depend on it?")
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(DeleteButton.activate(&ctx, target(&ctx, 1)), Activation::Error(_)));
        assert!(matches!(DeleteButton.activate(&ctx, target(&ctx, 11)), Activation::Error(_)));
    }

    #[test]
    fn mount_point_input_builds_the_action() {
        let mut ctx = context();
        let Activation::Input { initial, on_submit, .. } = MountPointButton.activate(&ctx, target(&ctx, 3))
        else {
            panic!("expected an input popup");
        };
        assert_eq!(initial, "/home");

        let mut action = on_submit("/data".into());
        assert_eq!(action.run(&mut ctx), ActionResult::Finish);

        let activation = MountPointButton.activate(&ctx, target(&ctx, 11));
        assert!(matches!(activation, Activation::Error(m) if m == "/dev/sdb1 is not formatted"));
    }

    #[test]
    fn resize_reports_blockers_before_the_placeholder() {
        let ctx = context();
        assert!(matches!(
            ResizeButton.activate(&ctx, target(&ctx, 20)),
            Activation::Error(m) if m == "/dev/md0 cannot be resized: RAIDs cannot be resized"
        ));
        assert!(matches!(
            ResizeButton.activate(&ctx, target(&ctx, 2)),
            Activation::Warning(m) if m == "Not yet implemented"
        ));
        assert!(matches!(AddButton.activate(&ctx, target(&ctx, 2)), Activation::Warning(_)));
    }

    #[test]
    fn undo_all_needs_changes() {
        let mut ctx = context();
        assert!(matches!(UndoAllButton.activation(&ctx), Activation::Warning(_)));
        ctx.storage.current_mut().remove_device(3).expect("delete");
        assert!(matches!(UndoAllButton.activation(&ctx), Activation::Confirm { .. }));
    }

    #[test]
    fn pending_changes_are_listed() {
        let mut ctx = context();
        let Activation::Summary { lines, .. } = ShowChangesButton.activation(&ctx) else {
            panic!("expected a summary");
        };
        assert_eq!(lines, vec!["No pending changes".to_string()]);

        ctx.storage.current_mut().remove_device(3).expect("delete");
        let Activation::Summary { lines, .. } = ShowChangesButton.activation(&ctx) else {
            panic!("expected a summary");
        };
        assert_eq!(lines.len(), 2);
    }
}
