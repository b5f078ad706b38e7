use std::time::Duration;

/// Why a controller call was dropped.
///
/// None of these are failures: the call arrived before its preconditions held
/// and left the controller untouched. Hosts usually just log them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClipRejected {
    #[error("no clip target is bound")]
    NoTarget,
    #[error("the scene reports no bounding volume for the target")]
    MissingBounds,
    #[error("toggle cooling down for another {remaining:?}")]
    CoolingDown { remaining: Duration },
    #[error("a clip volume already exists; destroy it first")]
    AlreadyCreated,
    #[error("no clip volume has been created")]
    NoClipVolume,
    #[error("already in the requested state")]
    Unchanged,
    #[error("controller has been destroyed")]
    Destroyed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown clip direction: {0:?}")]
pub struct UnknownDirection(pub String);

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
