use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// A request awaiting its response, retransmitted on a timer until one
/// arrives or it ages out.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub tid: u16,
    pub peer: SocketAddr,
    pub packet: Vec<u8>,
    pub udata: [u8; 4],
    pub first_sent: Instant,
    pub last_sent: Instant,
}

#[derive(Debug, Default)]
pub struct RequestQueue {
    items: Vec<PendingRequest>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, tid: u16, peer: SocketAddr, packet: Vec<u8>, udata: [u8; 4], now: Instant) {
        self.items.push(PendingRequest {
            tid,
            peer,
            packet,
            udata,
            first_sent: now,
            last_sent: now,
        });
    }

    pub fn remove_by_tid(&mut self, tid: u16) -> Vec<PendingRequest> {
        let (matched, remaining): (Vec<_>, Vec<_>) =
            self.items.drain(..).partition(|item| item.tid == tid);
        self.items = remaining;
        matched
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops requests older than `max_age`, then returns `(peer, packet)`
    /// pairs due for retransmission (updating their `last_sent`).
    pub fn tick(&mut self, now: Instant, retrans: Duration, max_age: Duration) -> Vec<(SocketAddr, Vec<u8>)> {
        self.items.retain(|item| now.saturating_duration_since(item.first_sent) <= max_age);
        let mut due = Vec::new();
        for item in self.items.iter_mut() {
            if now.saturating_duration_since(item.last_sent) >= retrans {
                item.last_sent = now;
                due.push((item.peer, item.packet.clone()));
            }
        }
        due
    }

    /// Time until the next retransmission is due, or `None` if the queue is
    /// empty (the writer should then sleep indefinitely on the condvar).
    pub fn next_wake(&self, now: Instant, retrans: Duration) -> Option<Duration> {
        self.items
            .iter()
            .map(|item| {
                let deadline = item.last_sent + retrans;
                deadline.saturating_duration_since(now)
            })
            .min()
    }
}

/// Responses awaiting a `rel` for the same transaction id before they can
/// be forgotten.
#[derive(Debug, Default)]
pub struct ReleaseQueue {
    pending: Vec<(u16, SocketAddr)>,
    outbound: Vec<(SocketAddr, Vec<u8>)>,
}

impl ReleaseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn await_release(&mut self, tid: u16, peer: SocketAddr) {
        self.pending.push((tid, peer));
    }

    pub fn enqueue_release(&mut self, peer: SocketAddr, packet: Vec<u8>) {
        self.outbound.push((peer, packet));
    }

    /// Called on a received `rel`: drops the matching pending entries.
    pub fn on_release_received(&mut self, tid: u16) -> usize {
        let before = self.pending.len();
        self.pending.retain(|(t, _)| *t != tid);
        before - self.pending.len()
    }

    /// Drains all queued outbound releases for the writer to send.
    pub fn drain_outbound(&mut self) -> Vec<(SocketAddr, Vec<u8>)> {
        std::mem::take(&mut self.outbound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn addr() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 4000)
    }

    #[test]
    fn tick_retransmits_after_interval() {
        let mut q = RequestQueue::new();
        let t0 = Instant::now();
        q.enqueue(1, addr(), vec![1, 2, 3], *b"NR02", t0);
        let retrans = Duration::from_secs(20);
        let max_age = Duration::from_secs(300);

        assert!(q.tick(t0, retrans, max_age).is_empty());
        let later = t0 + Duration::from_secs(21);
        let due = q.tick(later, retrans, max_age);
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn tick_drops_requests_past_max_age() {
        let mut q = RequestQueue::new();
        let t0 = Instant::now();
        q.enqueue(1, addr(), vec![1], *b"NR02", t0);
        let past_max_age = t0 + Duration::from_secs(301);
        q.tick(past_max_age, Duration::from_secs(20), Duration::from_secs(300));
        assert!(q.is_empty());
    }

    #[test]
    fn remove_by_tid_extracts_matching_entries() {
        let mut q = RequestQueue::new();
        let t0 = Instant::now();
        q.enqueue(1, addr(), vec![1], *b"NR02", t0);
        q.enqueue(2, addr(), vec![2], *b"CLEN", t0);
        let removed = q.remove_by_tid(1);
        assert_eq!(removed.len(), 1);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn release_queue_tracks_and_clears_pending() {
        let mut rq = ReleaseQueue::new();
        rq.await_release(5, addr());
        assert_eq!(rq.on_release_received(5), 1);
        assert_eq!(rq.on_release_received(5), 0);
    }

    #[test]
    fn release_queue_drains_outbound_once() {
        let mut rq = ReleaseQueue::new();
        rq.enqueue_release(addr(), vec![9]);
        assert_eq!(rq.drain_outbound().len(), 1);
        assert!(rq.drain_outbound().is_empty());
    }
}
