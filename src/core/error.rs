//! Error type shared by the device model, the graph loader and the actions.
//!
//! The `Display` text of the user-input variants is what the error popups
//! show, so keep those messages short and addressed to the administrator.

use thiserror::Error;

use super::device::Sid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid devicegraph description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Device sid {0} appears more than once")]
    DuplicateSid(Sid),

    #[error("Device sid {sid} references unknown device {target}")]
    UnknownReference { sid: Sid, target: Sid },

    #[error("Device sid {sid} references {target}, which is not {expected}")]
    InvalidReference {
        sid: Sid,
        target: Sid,
        expected: &'static str,
    },

    #[error("Device sid {0} is part of a reference cycle")]
    CyclicReference(Sid),

    #[error("Device sid {0} names a thin pool but is not a thin volume")]
    UnexpectedThinPool(Sid),

    #[error("Device not found: {0}")]
    DeviceNotFound(Sid),

    // ── user input ─────────────────────────────────────────────
    #[error("No device selected")]
    NoSelection,

    #[error("Invalid mount point \"{0}\": it must be an absolute path without spaces")]
    InvalidMountPoint(String),

    #[error("Mount point {mount_point} is already in use by {used_by}")]
    DuplicateMountPoint { mount_point: String, used_by: String },

    #[error("{0} is not formatted")]
    NotFormatted(String),

    #[error("{name} cannot be deleted: {reason}")]
    CannotDelete { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, StorageError>;
