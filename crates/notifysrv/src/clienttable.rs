use std::net::SocketAddr;
use std::time::{Duration, Instant};

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::client::RegisteredClient;

/// The registered-client table: keyed by `(uid, addr)` so the same user can
/// be registered from more than one device.
#[derive(Default)]
pub struct ClientTable {
    clients: Mutex<AHashMap<(i64, SocketAddr), RegisteredClient>>,
}

impl ClientTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, uid: i64, addr: SocketAddr, svcs: std::collections::HashSet<i64>, now: Instant) {
        self.clients
            .lock()
            .insert((uid, addr), RegisteredClient::new(uid, addr, svcs, now));
    }

    pub fn mark_sent(&self, uid: i64, addr: SocketAddr, now: Instant) {
        if let Some(client) = self.clients.lock().get_mut(&(uid, addr)) {
            client.mark_sent(now);
        }
    }

    pub fn mark_received_by_addr(&self, addr: SocketAddr, now: Instant) {
        for client in self.clients.lock().values_mut() {
            if client.addr == addr {
                client.mark_received(now);
            }
        }
    }

    pub fn matching(&self, notice_uid: i64, notice_type: i64) -> Vec<RegisteredClient> {
        self.clients
            .lock()
            .values()
            .filter(|c| c.matches(notice_uid, notice_type))
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<RegisteredClient> {
        self.clients.lock().values().cloned().collect()
    }

    /// Removes clients whose age exceeds `max_age`, returning them.
    pub fn reap(&self, now: Instant, max_age: Duration) -> Vec<RegisteredClient> {
        let mut clients = self.clients.lock();
        let stale: Vec<(i64, SocketAddr)> = clients
            .iter()
            .filter(|(_, c)| c.age(now) > max_age)
            .map(|(k, _)| *k)
            .collect();
        stale
            .into_iter()
            .filter_map(|key| clients.remove(&key))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clients.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
    }

    #[test]
    fn register_then_match_broadcast_and_uid() {
        let table = ClientTable::new();
        let now = Instant::now();
        table.register(7, addr(6000), [1, 2].into_iter().collect(), now);
        assert_eq!(table.matching(0, 1).len(), 1);
        assert_eq!(table.matching(7, 2).len(), 1);
        assert_eq!(table.matching(9, 1).len(), 0);
    }

    #[test]
    fn reap_removes_only_stale_clients() {
        let table = ClientTable::new();
        let now = Instant::now();
        table.register(7, addr(6001), [1].into_iter().collect(), now);
        table.mark_sent(7, addr(6001), now + Duration::from_secs(10));
        let reaped = table.reap(now + Duration::from_secs(400), Duration::from_secs(300));
        assert_eq!(reaped.len(), 1);
        assert!(table.is_empty());
    }

    #[test]
    fn reap_keeps_fresh_clients() {
        let table = ClientTable::new();
        let now = Instant::now();
        table.register(7, addr(6002), [1].into_iter().collect(), now);
        let reaped = table.reap(now + Duration::from_secs(400), Duration::from_secs(300));
        assert!(reaped.is_empty());
        assert_eq!(table.len(), 1);
    }
}
