use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use rand::Rng;

use crate::packet::{Kind, Packet};
use crate::queue::{ReleaseQueue, RequestQueue};

pub const RETRANS: Duration = Duration::from_secs(20);
pub const MAX_AGE: Duration = Duration::from_secs(300);

/// Dispatch hooks the owner of a `Transport` supplies. Called from the
/// reader thread; implementations must not block.
pub trait RequestHandler: Send + Sync {
    /// An inbound request. Returning `Some(payload)` (possibly empty)
    /// enqueues a response with that payload; returning `None` still sends
    /// an empty response (every request gets one).
    fn on_request(
        &self,
        flags: u8,
        seq: u8,
        tid: u16,
        udata: [u8; 4],
        payload: &[u8],
        sender: SocketAddr,
    ) -> Option<Vec<u8>>;

    /// A response matching a still-pending request. Returning `true`
    /// enqueues a release for that transaction.
    fn on_response(&self, tid: u16, peer: SocketAddr, payload: &[u8]) -> bool;

    /// A release for a transaction this side was the responder for.
    fn on_release(&self, tid: u16, peer: SocketAddr);
}

struct Shared {
    queue: Mutex<RequestQueue>,
    releases: Mutex<ReleaseQueue>,
    socket: Mutex<UdpSocket>,
    cond: Condvar,
    shutdown: AtomicBool,
    tid_counter: AtomicU16,
}

/// The reliable-datagram transport: one reader thread blocked in `recv`,
/// one writer thread coordinating retransmission and release delivery,
/// sharing state behind a queue mutex, a socket mutex, and a condvar.
pub struct Transport {
    shared: Arc<Shared>,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
}

impl Transport {
    pub fn spawn(socket: UdpSocket, handler: Arc<dyn RequestHandler>) -> std::io::Result<Transport> {
        let reader_socket = socket.try_clone()?;
        let seed = rand::thread_rng().gen();
        let shared = Arc::new(Shared {
            queue: Mutex::new(RequestQueue::new()),
            releases: Mutex::new(ReleaseQueue::new()),
            socket: Mutex::new(socket),
            cond: Condvar::new(),
            shutdown: AtomicBool::new(false),
            tid_counter: AtomicU16::new(seed),
        });

        let reader = {
            let shared = shared.clone();
            let handler = handler.clone();
            thread::spawn(move || reader_loop(shared, handler, reader_socket))
        };

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || writer_loop(shared))
        };

        Ok(Transport {
            shared,
            reader: Some(reader),
            writer: Some(writer),
        })
    }

    /// Assigns the next rolling transaction id, enqueues the request, and
    /// wakes the writer.
    pub fn enqueue_request(&self, udata: [u8; 4], payload: Vec<u8>, peer: SocketAddr) -> u16 {
        let tid = self.shared.tid_counter.fetch_add(1, Ordering::Relaxed);
        let packet = Packet::new(Kind::Request, tid, udata, payload).encode();
        self.shared.queue.lock().enqueue(tid, peer, packet, udata, Instant::now());
        self.shared.cond.notify_all();
        tid
    }

    pub fn pending_request_count(&self) -> usize {
        self.shared.queue.lock().len()
    }

    /// Closes the socket (unblocking the reader's `recv`), signals
    /// shutdown, wakes the writer, and joins both threads.
    pub fn shutdown(mut self) {
        self.shutdown_mut();
    }

    fn shutdown_mut(&mut self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        self.shared.cond.notify_all();
        if let Some(h) = self.reader.take() {
            let _ = h.join();
        }
        if let Some(h) = self.writer.take() {
            let _ = h.join();
        }
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        if self.reader.is_some() || self.writer.is_some() {
            self.shutdown_mut();
        }
    }
}

fn reader_loop(shared: Arc<Shared>, handler: Arc<dyn RequestHandler>, socket: UdpSocket) {
    let _ = socket.set_read_timeout(Some(Duration::from_millis(500)));
    let mut buf = [0u8; 65_536];
    loop {
        if shared.shutdown.load(Ordering::SeqCst) {
            return;
        }
        match socket.recv_from(&mut buf) {
            Ok((n, sender)) => match Packet::decode(&buf[..n]) {
                Ok(pkt) => dispatch(&shared, &handler, pkt, sender),
                Err(err) => tracing::debug!(%err, %sender, "dropped malformed notify packet"),
            },
            Err(err)
                if err.kind() == std::io::ErrorKind::WouldBlock
                    || err.kind() == std::io::ErrorKind::TimedOut =>
            {
                continue
            }
            Err(_) => return,
        }
    }
}

fn dispatch(shared: &Arc<Shared>, handler: &Arc<dyn RequestHandler>, pkt: Packet, sender: SocketAddr) {
    match pkt.kind {
        Kind::Request => {
            let reply_payload = handler
                .on_request(pkt.flags, pkt.seq, pkt.tid, pkt.udata, &pkt.payload, sender)
                .unwrap_or_default();
            let resp = Packet::new(Kind::Response, pkt.tid, pkt.udata, reply_payload).encode();
            let _ = shared.socket.lock().send_to(&resp, sender);
        }
        Kind::Response => {
            let matched = shared.queue.lock().remove_by_tid(pkt.tid);
            for req in matched {
                if handler.on_response(pkt.tid, sender, &pkt.payload) {
                    let rel = Packet::new(Kind::Release, pkt.tid, req.udata, Vec::new()).encode();
                    shared.releases.lock().enqueue_release(sender, rel);
                    shared.cond.notify_all();
                }
            }
        }
        Kind::Release => {
            handler.on_release(pkt.tid, sender);
        }
    }
}

fn writer_loop(shared: Arc<Shared>) {
    loop {
        if shared.shutdown.load(Ordering::SeqCst) {
            return;
        }
        let now = Instant::now();
        let due = shared.queue.lock().tick(now, RETRANS, MAX_AGE);
        if !due.is_empty() {
            let socket = shared.socket.lock();
            for (peer, packet) in &due {
                let _ = socket.send_to(packet, peer);
            }
        }
        let releases = shared.releases.lock().drain_outbound();
        if !releases.is_empty() {
            let socket = shared.socket.lock();
            for (peer, packet) in &releases {
                let _ = socket.send_to(packet, peer);
            }
        }

        let mut guard = shared.queue.lock();
        if shared.shutdown.load(Ordering::SeqCst) {
            return;
        }
        match guard.next_wake(Instant::now(), RETRANS) {
            Some(dur) => {
                shared.cond.wait_for(&mut guard, dur);
            }
            None => {
                shared.cond.wait(&mut guard);
            }
        }
    }
}
