use thiserror::Error;

#[derive(Debug, Error)]
pub enum BulletinError {
    #[error(transparent)]
    Session(#[from] session::SessionError),

    #[error(transparent)]
    Directory(#[from] ndirectory::DirectoryError),

    #[error("malformed topic info line: {0:?}")]
    InvalidTopicLine(String),

    #[error("malformed article header block")]
    InvalidArticleBlock,

    #[error("no topic currently selected")]
    NoTopicSelected,
}
