/// Final disposition of a single recipient add, keyed off the terminator
/// code that ended that recipient's response sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientDisposition {
    Ok,
    Ambiguous,
    None,
    Loop,
    Denied,
}

impl RecipientDisposition {
    /// The terminator code set is `{28, 40, 41, 42, 43}` (open question in
    /// the design notes, resolved as documented in DESIGN.md).
    pub(crate) fn from_terminator(code: u32) -> Option<RecipientDisposition> {
        match code {
            28 => Some(RecipientDisposition::Ok),
            40 => Some(RecipientDisposition::Ambiguous),
            41 => Some(RecipientDisposition::None),
            42 => Some(RecipientDisposition::Loop),
            43 => Some(RecipientDisposition::Denied),
            _ => None,
        }
    }

    pub(crate) fn terminator_codes() -> &'static [u32] {
        &[28, 40, 41, 42, 43]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientKind {
    To,
    Cc,
    Bcc,
}

impl RecipientKind {
    pub(crate) fn command(self) -> &'static str {
        match self {
            RecipientKind::To => "RCPT",
            RecipientKind::Cc => "RCCC",
            RecipientKind::Bcc => "RBCC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Plain,
    Mime,
}

/// Server-side mutable outbound-message scratch area. Every setter is a
/// single lockstep command; `reset_recipients`/`reset_all` clear server-side
/// state the way the protocol demands rather than just forgetting local
/// bookkeeping.
#[derive(Debug, Default)]
pub struct OutboundComposer {
    pub ambiguous_candidates: Vec<String>,
}
