/// Warning records drained via the `WARN` request. The mail session's
/// response codes multiplex a "warnings pending" flag into their hundreds
/// digit (see `MailSession::expect_warn`); this enum is the decoded form of
/// the records the server then sends when the caller drains them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    UnreadMail,
    Message(String),
    Shutdown,
    NewMail {
        message_id: i64,
        folder_id: i64,
        position: i64,
    },
}

pub(crate) const CODE_UNREAD_MAIL: u32 = 61;
pub(crate) const CODE_MESSAGE: u32 = 62;
pub(crate) const CODE_SHUTDOWN: u32 = 63;
pub(crate) const CODE_NEW_MAIL: u32 = 64;
pub(crate) const CODE_SENTINEL: u32 = 69;

pub(crate) fn decode_new_mail(text: &str) -> Option<Warning> {
    let mut parts = text.split(',');
    let message_id = parts.next()?.parse().ok()?;
    let folder_id = parts.next()?.parse().ok()?;
    let position = parts.next()?.parse().ok()?;
    Some(Warning::NewMail {
        message_id,
        folder_id,
        position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_new_mail_triplet() {
        let w = decode_new_mail("42,3,7").unwrap();
        assert_eq!(
            w,
            Warning::NewMail {
                message_id: 42,
                folder_id: 3,
                position: 7,
            }
        );
    }

    #[test]
    fn rejects_malformed_new_mail() {
        assert!(decode_new_mail("42,3").is_none());
    }
}
