use thiserror::Error;

/// Root error type for every line-oriented session (mail, bulletin,
/// notify-control, and their server-side counterparts).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("command issued on a session with no open connection")]
    NotConnected,

    #[error("lost connection to peer")]
    LostConnection,

    #[error("server returned code {code}: {text}")]
    Protocol { code: u32, text: String },

    #[error("no cached user identity for this session")]
    NoUserInfo,

    #[error(transparent)]
    Wire(#[from] wire::Error),

    #[error(transparent)]
    Directory(#[from] ndirectory::DirectoryError),
}

impl SessionError {
    pub fn from_wire(err: wire::Error) -> Self {
        if err.is_lost_connection() {
            SessionError::LostConnection
        } else {
            SessionError::Wire(err)
        }
    }
}
