use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyCtlError {
    #[error(transparent)]
    Session(#[from] session::SessionError),

    #[error(transparent)]
    Directory(#[from] ndirectory::DirectoryError),

    #[error(transparent)]
    Pascal(#[from] crate::pascal::PascalError),

    #[error("malformed list item line: {0:?}")]
    InvalidListItem(String),
}
