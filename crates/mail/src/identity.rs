/// Fixed per-class mask byte used to obfuscate the cached cleartext
/// password in memory. This is obfuscation against casual inspection, not
/// cryptographic protection — the real secrecy boundary is the
/// challenge/response exchange with the name-directory service.
const MAIL_PASSWORD_MASK: u8 = 0x5A;

#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub name: String,
    pub uid: i64,
    pub home_server: String,
    masked_password: Vec<u8>,
}

impl UserIdentity {
    pub fn new(name: impl Into<String>, uid: i64, home_server: impl Into<String>, password: &str) -> Self {
        UserIdentity {
            name: name.into(),
            uid,
            home_server: home_server.into(),
            masked_password: mask(password.as_bytes()),
        }
    }

    pub fn password(&self) -> String {
        String::from_utf8_lossy(&mask(&self.masked_password)).into_owned()
    }
}

fn mask(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|b| b ^ MAIL_PASSWORD_MASK).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trips_through_masking() {
        let identity = UserIdentity::new("alice", 7, "mail1", "hunter2");
        assert_eq!(identity.password(), "hunter2");
    }

    #[test]
    fn stored_form_is_not_the_cleartext() {
        let identity = UserIdentity::new("alice", 7, "mail1", "hunter2");
        assert_ne!(identity.masked_password, b"hunter2".to_vec());
    }
}
