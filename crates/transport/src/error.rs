use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("packet too short: {0} bytes")]
    TooShort(usize),

    #[error("unrecognized DDP tag byte {0:#04x}")]
    BadTag(u8),

    #[error("unrecognized packet kind bits {0:#04x}")]
    BadKind(u8),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
