use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifySrvError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Wire(#[from] wire::Error),

    #[error(transparent)]
    Store(#[from] stickystore::StoreError),

    #[error(transparent)]
    Notify(#[from] transport::NotifyError),

    #[error(transparent)]
    Session(#[from] session::SessionError),

    #[error("bad sequence: {0}")]
    BadSequence(&'static str),

    #[error("permission denied: admin operation attempted by uid {0}")]
    PermissionDenied(i64),
}
