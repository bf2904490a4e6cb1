use std::io::{Cursor, Read, Write};

use mail::MailSession;
use ndirectory::{TestDirectory, UserRecord};
use session::PushOffPolicy;

struct TestStream(Cursor<Vec<u8>>);

impl Read for TestStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0.read(buf)
    }
}

impl Write for TestStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn sign_on_with_busy_push_succeeds() {
    // Scenario 1: server reports the account busy (warnings flag 3 on the
    // hundreds digit of 334), caller's push-off policy is `Always`, client
    // sends PUSH and gets the normal OK.
    let wire = b"20 ready\n30 chal123\n334 busy\n10 ok\n".to_vec();
    let stream = TestStream(Cursor::new(wire));
    let mut session = MailSession::new(stream);

    let directory = TestDirectory::new().with_user(UserRecord {
        name: "alice".into(),
        uid: 7,
        home_server: "mail1".into(),
        full_name: "Alice Example".into(),
    });

    let warn_pending = session
        .sign_on(&directory, "alice", "hunter2", PushOffPolicy::Always)
        .expect("sign-on should succeed via push-off");

    assert!(warn_pending, "the 334 response's hundreds digit should set the warnings flag");
    assert_eq!(session.identity().unwrap().uid, 7);
}

#[test]
fn sign_on_busy_without_push_off_surfaces_protocol_error() {
    let wire = b"20 ready\n30 chal123\n334 busy\n".to_vec();
    let stream = TestStream(Cursor::new(wire));
    let mut session = MailSession::new(stream);

    let directory = TestDirectory::new().with_user(UserRecord {
        name: "alice".into(),
        uid: 7,
        home_server: "mail1".into(),
        full_name: "Alice Example".into(),
    });

    let err = session
        .sign_on(&directory, "alice", "hunter2", PushOffPolicy::Never)
        .unwrap_err();
    assert!(matches!(
        err,
        mail::MailError::Session(session::SessionError::Protocol { code: 334, .. })
    ));
}
