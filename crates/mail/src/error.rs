use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error(transparent)]
    Session(#[from] session::SessionError),

    #[error(transparent)]
    Directory(#[from] ndirectory::DirectoryError),

    #[error("malformed folder info line: {0:?}")]
    InvalidFolderLine(String),

    #[error("malformed message summary line: {0:?}")]
    InvalidSummaryLine(String),

    #[error("invalid expiration value: {0:?}")]
    InvalidExpiration(String),

    #[error("unknown recipient disposition code: {0}")]
    UnknownDisposition(u32),

    #[error("index {0} out of range for folder of {1} messages")]
    IndexOutOfRange(i64, i64),

    #[error("malformed server response where an integer was expected: {0:?}")]
    InvalidInteger(String),
}
