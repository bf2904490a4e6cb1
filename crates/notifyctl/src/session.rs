use std::io::{Read, Write};

use ndirectory::{LookupField, NameDirectory};
use session::Session;

use crate::error::NotifyCtlError;
use crate::pascal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Notices,
    Clients,
    All,
}

impl ListKind {
    fn as_wire(self) -> &'static str {
        match self {
            ListKind::Notices => "notices",
            ListKind::Clients => "clients",
            ListKind::All => "all",
        }
    }
}

/// TCP client for the notify-control protocol: a thin, lockstep wrapper
/// over `USER`/`PASE`/`NOTIFY`/`CLEAR`/`CLIENT`/`LIST`, built on the shared
/// session base.
pub struct NotifyCtlSession<T> {
    base: Session<T>,
}

impl<T> NotifyCtlSession<T> {
    pub fn new(stream: T) -> Self {
        NotifyCtlSession {
            base: Session::new(stream, tracing::info_span!("notifyctl_session")),
        }
    }

    pub fn connected(&self) -> bool {
        self.base.connected()
    }

    pub fn close(&mut self) {
        if self.base.connected() {
            let _ = self.base.cmd("QUIT", &[], ' ');
        }
        self.base.close();
    }
}

impl<T: Read + Write> NotifyCtlSession<T> {
    pub fn sign_on(&mut self, directory: &dyn NameDirectory, name: &str, password: &str) -> Result<(), NotifyCtlError> {
        self.base.expect(&[220])?;
        self.base.cmd("USER", &[name], ' ')?;
        let challenge = self.base.expect(&[300])?;
        let record = directory.lookup_unique(name, &[LookupField::Uid])?;
        let _ = record;
        let response = directory.encrypt_challenge(&challenge.text, password);
        self.base.cmd("PASE", &[&response], ' ')?;
        self.base.expect(&[200])?;
        Ok(())
    }

    pub fn clear(&mut self, uid: i64, notice_type: i64) -> Result<(), NotifyCtlError> {
        self.base
            .cmd("CLEAR", &[&uid.to_string(), &notice_type.to_string()], ',')?;
        self.base.expect(&[200])?;
        Ok(())
    }

    /// Posts a notice. `data` is framed Pascal-style (one length byte +
    /// payload) rather than via a separate length command argument.
    pub fn notify(&mut self, uid: i64, notice_type: i64, msgid: i64, sticky: bool, data: &[u8]) -> Result<(), NotifyCtlError> {
        self.base.cmd(
            "NOTIFY",
            &[
                &uid.to_string(),
                &notice_type.to_string(),
                &msgid.to_string(),
                if sticky { "1" } else { "0" },
            ],
            ',',
        )?;
        self.base.send_block(&pascal::encode(data))?;
        self.base.expect(&[200])?;
        Ok(())
    }

    pub fn client(&mut self, uid: i64, ip: &str, port: u16, svcs: &[i64]) -> Result<(), NotifyCtlError> {
        let mut args: Vec<String> = vec![uid.to_string(), ip.to_string(), port.to_string()];
        args.extend(svcs.iter().map(|s| s.to_string()));
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.base.cmd("CLIENT", &arg_refs, ',')?;
        self.base.expect(&[200])?;
        Ok(())
    }

    pub fn list(&mut self, kind: ListKind) -> Result<Vec<String>, NotifyCtlError> {
        self.base.cmd("LIST", &[kind.as_wire()], ' ')?;
        let header = self.base.expect(&[101])?;
        let count: usize = header
            .text
            .trim()
            .parse()
            .map_err(|_| NotifyCtlError::InvalidListItem(header.text.clone()))?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let item = self.base.expect(&[110])?;
            items.push(item.text);
        }
        self.base.expect(&[200])?;
        Ok(items)
    }
}
