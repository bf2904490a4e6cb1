use std::io::{BufReader, Read, Write};

use tracing::Span;
use wire::Response;

use crate::error::SessionError;

/// Owns a connection and provides the lockstep send-command /
/// expect-response / read-block / read-multiline primitives shared by the
/// mail, bulletin, and notify-control protocols (client and server sides
/// alike). Each session is driven by exactly one caller; there is no
/// implicit background activity.
pub struct Session<T> {
    stream: Option<BufReader<T>>,
    span: Span,
}

impl<T> Session<T> {
    pub fn new(stream: T, span: Span) -> Self {
        Session {
            stream: Some(BufReader::new(stream)),
            span,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn connected(&self) -> bool {
        self.stream.is_some()
    }
}

impl<T: Read + Write> Session<T> {
    /// Sends a command line, closing the session and returning
    /// `LostConnection` if the write fails because the peer went away.
    pub fn cmd(&mut self, name: &str, args: &[&str], sep: char) -> Result<(), SessionError> {
        let _enter = self.span.enter();
        let stream = self.stream.as_mut().ok_or(SessionError::NotConnected)?;
        match wire::write_command(stream.get_mut(), name, args, sep) {
            Ok(()) => Ok(()),
            Err(err) => {
                let mapped = SessionError::from_wire(err);
                if matches!(mapped, SessionError::LostConnection) {
                    self.stream = None;
                }
                Err(mapped)
            }
        }
    }

    /// Writes a raw, already-framed block (used after announcing a sized
    /// upload, e.g. message body or mailing-list membership).
    pub fn send_block(&mut self, data: &[u8]) -> Result<(), SessionError> {
        let _enter = self.span.enter();
        let stream = self.stream.as_mut().ok_or(SessionError::NotConnected)?;
        match wire::write_block(stream.get_mut(), data) {
            Ok(()) => Ok(()),
            Err(err) => {
                let mapped = SessionError::from_wire(err);
                if matches!(mapped, SessionError::LostConnection) {
                    self.stream = None;
                }
                Err(mapped)
            }
        }
    }

    /// Reads one response line and checks its code against `allowed`.
    /// Returns `Protocol { code, text }` if the code isn't in the allowed
    /// set; this does not close the session, since the caller may choose to
    /// treat the response as a recoverable, component-specific branch.
    pub fn expect(&mut self, allowed: &[u32]) -> Result<Response, SessionError> {
        let resp = self.read_response()?;
        if allowed.contains(&resp.code) {
            Ok(resp)
        } else {
            Err(SessionError::Protocol {
                code: resp.code,
                text: resp.text,
            })
        }
    }

    /// Reads one response line without checking its code, for callers (like
    /// the mail session) that need to split the code into a side-channel
    /// flag before deciding what's allowed.
    pub fn read_response(&mut self) -> Result<Response, SessionError> {
        let _enter = self.span.enter();
        let stream = self.stream.as_mut().ok_or(SessionError::NotConnected)?;
        let line = match wire::read_line(stream) {
            Ok(line) => line,
            Err(err) => {
                self.stream = None;
                return Err(SessionError::from_wire(err));
            }
        };
        wire::parse_response(&line).map_err(SessionError::from)
    }

    pub fn read(&mut self, n: usize) -> Result<Vec<u8>, SessionError> {
        let _enter = self.span.enter();
        let stream = self.stream.as_mut().ok_or(SessionError::NotConnected)?;
        match wire::read_block(stream, n) {
            Ok(block) => Ok(block),
            Err(err) => {
                let mapped = SessionError::from_wire(err);
                if matches!(mapped, SessionError::LostConnection) {
                    self.stream = None;
                }
                Err(mapped)
            }
        }
    }

    pub fn read_multiline(&mut self) -> Result<Vec<String>, SessionError> {
        let _enter = self.span.enter();
        let stream = self.stream.as_mut().ok_or(SessionError::NotConnected)?;
        match wire::read_multiline(stream) {
            Ok(lines) => Ok(lines),
            Err(err) => {
                let mapped = SessionError::from_wire(err);
                if matches!(mapped, SessionError::LostConnection) {
                    self.stream = None;
                }
                Err(mapped)
            }
        }
    }

    /// Idempotent shutdown. Subclasses are expected to best-effort send a
    /// `QUIT` before calling this; failures during that attempt are ignored.
    pub fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.get_mut().flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct LoopbackStream(Arc<Mutex<Cursor<Vec<u8>>>>);

    impl Read for LoopbackStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().read(buf)
        }
    }

    impl Write for LoopbackStream {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn not_connected_after_close() {
        let stream = LoopbackStream(Arc::new(Mutex::new(Cursor::new(b"200 ok\n".to_vec()))));
        let mut session = Session::new(stream, Span::none());
        assert!(session.connected());
        session.close();
        assert!(!session.connected());
        assert!(matches!(
            session.cmd("NOOP", &[], ','),
            Err(SessionError::NotConnected)
        ));
    }

    #[test]
    fn expect_rejects_unlisted_code() {
        let stream = LoopbackStream(Arc::new(Mutex::new(Cursor::new(b"550 denied\n".to_vec()))));
        let mut session = Session::new(stream, Span::none());
        let err = session.expect(&[200, 250]).unwrap_err();
        match err {
            SessionError::Protocol { code, text } => {
                assert_eq!(code, 550);
                assert_eq!(text, "denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn expect_accepts_listed_code() {
        let stream = LoopbackStream(Arc::new(Mutex::new(Cursor::new(b"220 ready\n".to_vec()))));
        let mut session = Session::new(stream, Span::none());
        let resp = session.expect(&[220]).unwrap();
        assert_eq!(resp.code, 220);
        assert_eq!(resp.text, "ready");
    }

    #[test]
    fn eof_surfaces_as_lost_connection_and_closes() {
        let stream = LoopbackStream(Arc::new(Mutex::new(Cursor::new(Vec::new()))));
        let mut session = Session::new(stream, Span::none());
        let err = session.read_response().unwrap_err();
        assert!(matches!(err, SessionError::LostConnection));
        assert!(!session.connected());
    }
}
