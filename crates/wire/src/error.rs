use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("connection closed by peer")]
    Closed,
    #[error("malformed response line: {0:?}")]
    MalformedResponse(String),
    #[error("malformed folder/summary field: {0}")]
    MalformedField(String),
}

impl Error {
    /// True when the underlying I/O failure indicates the peer went away
    /// (as opposed to a local usage error).
    pub fn is_lost_connection(&self) -> bool {
        match self {
            Error::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::BrokenPipe
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::UnexpectedEof
            ),
            Error::Closed => true,
            _ => false,
        }
    }
}
