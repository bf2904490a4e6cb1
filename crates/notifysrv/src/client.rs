use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RegisteredClient {
    pub uid: i64,
    pub addr: SocketAddr,
    pub svcs: HashSet<i64>,
    last_sent: Option<Instant>,
    last_recv: Instant,
}

impl RegisteredClient {
    pub fn new(uid: i64, addr: SocketAddr, svcs: HashSet<i64>, now: Instant) -> Self {
        RegisteredClient {
            uid,
            addr,
            svcs,
            last_sent: None,
            last_recv: now,
        }
    }

    pub fn mark_sent(&mut self, now: Instant) {
        self.last_sent = Some(now);
    }

    pub fn mark_received(&mut self, now: Instant) {
        self.last_recv = now;
    }

    /// `last_sent >= last_recv` means we're still waiting to hear back, so
    /// age accrues from the last time we *did* hear from the client;
    /// otherwise the client is considered fresh (age zero).
    pub fn age(&self, now: Instant) -> Duration {
        match self.last_sent {
            Some(sent) if sent >= self.last_recv => now.saturating_duration_since(self.last_recv),
            _ => Duration::ZERO,
        }
    }

    pub fn matches(&self, notice_uid: i64, notice_type: i64) -> bool {
        (notice_uid == 0 || notice_uid == self.uid) && self.svcs.contains(&notice_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn addr() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5000)
    }

    #[test]
    fn fresh_client_has_zero_age() {
        let now = Instant::now();
        let client = RegisteredClient::new(7, addr(), [1].into_iter().collect(), now);
        assert_eq!(client.age(now + Duration::from_secs(60)), Duration::ZERO);
    }

    #[test]
    fn age_accrues_once_sent_without_reply() {
        let now = Instant::now();
        let mut client = RegisteredClient::new(7, addr(), [1].into_iter().collect(), now);
        client.mark_sent(now + Duration::from_secs(10));
        let later = now + Duration::from_secs(40);
        assert_eq!(client.age(later), Duration::from_secs(40));
    }

    #[test]
    fn reply_resets_age_to_zero() {
        let now = Instant::now();
        let mut client = RegisteredClient::new(7, addr(), [1].into_iter().collect(), now);
        client.mark_sent(now + Duration::from_secs(10));
        client.mark_received(now + Duration::from_secs(15));
        assert_eq!(client.age(now + Duration::from_secs(100)), Duration::ZERO);
    }

    #[test]
    fn matches_broadcast_and_own_uid() {
        let client = RegisteredClient::new(7, addr(), [1, 2].into_iter().collect(), Instant::now());
        assert!(client.matches(0, 1));
        assert!(client.matches(7, 2));
        assert!(!client.matches(9, 1));
        assert!(!client.matches(7, 3));
    }
}
