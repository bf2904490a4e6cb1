use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use transport::packet::{decode_clear_payload, decode_register_payload, encode_notify_payload};
use transport::{RequestHandler, Transport};

use crate::clienttable::ClientTable;
use crate::error::NotifySrvError;

/// Bridges the reliable-datagram transport to the registered-client table
/// and the sticky-notice store: handles `NR02`/`CLEN` requests, replays
/// sticky notices on registration, and fans `post()` calls out as `NOTI`
/// requests to every matching client.
pub struct NotifyUdpServer {
    transport: Option<Arc<Transport>>,
    table: Arc<ClientTable>,
    reaper: Option<JoinHandle<()>>,
    reaper_stop: Arc<AtomicBool>,
    replay_pump: Option<JoinHandle<()>>,
    replay_stop: Arc<AtomicBool>,
    local_addr: SocketAddr,
}

/// Payloads a request handler wants sent out as fresh `Notify` requests.
/// `on_request` only returns the immediate reply to its own request, so
/// sticky-notice replays queue here and a pump thread drains them through
/// the real `Transport`.
type ReplayQueue = Mutex<Vec<(SocketAddr, Vec<u8>)>>;

struct Handler {
    table: Arc<ClientTable>,
    store: Arc<stickystore::StickyStore>,
    replays: Arc<ReplayQueue>,
}

impl RequestHandler for Handler {
    fn on_request(
        &self,
        _flags: u8,
        _seq: u8,
        _tid: u16,
        udata: [u8; 4],
        payload: &[u8],
        sender: SocketAddr,
    ) -> Option<Vec<u8>> {
        match &udata {
            b"NR02" => {
                let reg = decode_register_payload(payload).ok()?;
                let uid = reg.uid_str.trim_start_matches('#').parse::<i64>().ok()?;
                let addr = if reg.port == 0 {
                    SocketAddr::new(sender.ip(), sender.port())
                } else {
                    SocketAddr::new(sender.ip(), reg.port)
                };
                let svcs: std::collections::HashSet<i64> =
                    reg.svcs.iter().map(|s| *s as i64).collect();
                let now = Instant::now();
                self.table.register(uid, addr, svcs.clone(), now);
                tracing::debug!(uid, %addr, "client registered");

                if let Ok(notices) = self.store.list() {
                    let mut replays = self.replays.lock();
                    for notice in notices {
                        if (notice.uid == 0 || notice.uid == uid) && svcs.contains(&notice.notice_type) {
                            let notify_payload = encode_notify_payload(
                                notice.notice_type as u32,
                                notice.uid as u32,
                                notice.msgid as u32,
                                notice.data.as_deref().unwrap_or(&[]),
                            );
                            replays.push((addr, notify_payload));
                        }
                    }
                }
                Some(Vec::new())
            }
            b"CLEN" => {
                if let Ok((uid, svc)) = decode_clear_payload(payload) {
                    let _ = self.store.clear_by(uid as i64, svc as i64);
                }
                Some(Vec::new())
            }
            _ => None,
        }
    }

    fn on_response(&self, _tid: u16, peer: SocketAddr, _payload: &[u8]) -> bool {
        self.table.mark_received_by_addr(peer, Instant::now());
        true
    }

    fn on_release(&self, _tid: u16, _peer: SocketAddr) {}
}

impl NotifyUdpServer {
    pub fn bind(
        bind_addr: &str,
        store: Arc<stickystore::StickyStore>,
        max_client_age: Duration,
    ) -> Result<Self, NotifySrvError> {
        let socket = UdpSocket::bind(bind_addr)?;
        let local_addr = socket.local_addr()?;
        let table = Arc::new(ClientTable::new());
        let replays: Arc<ReplayQueue> = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(Handler {
            table: table.clone(),
            store,
            replays: replays.clone(),
        });
        let transport = Arc::new(Transport::spawn(socket, handler)?);

        let reaper_stop = Arc::new(AtomicBool::new(false));
        let reaper = {
            let table = table.clone();
            let stop = reaper_stop.clone();
            thread::spawn(move || loop {
                if stop.load(Ordering::SeqCst) {
                    return;
                }
                thread::sleep(Duration::from_secs(5));
                let reaped = table.reap(Instant::now(), max_client_age);
                for client in reaped {
                    tracing::debug!(uid = client.uid, addr = %client.addr, "client reaped as stale");
                }
            })
        };

        let replay_stop = Arc::new(AtomicBool::new(false));
        let replay_pump = {
            let replays = replays.clone();
            let stop = replay_stop.clone();
            let transport = transport.clone();
            thread::spawn(move || loop {
                if stop.load(Ordering::SeqCst) {
                    return;
                }
                let batch: Vec<(SocketAddr, Vec<u8>)> = {
                    let mut q = replays.lock();
                    std::mem::take(&mut *q)
                };
                for (addr, payload) in batch {
                    transport.enqueue_request(*b"NOTI", payload, addr);
                }
                thread::sleep(Duration::from_millis(100));
            })
        };

        Ok(NotifyUdpServer {
            transport: Some(transport),
            table,
            reaper: Some(reaper),
            reaper_stop,
            replay_pump: Some(replay_pump),
            replay_stop,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn client_count(&self) -> usize {
        self.table.len()
    }

    pub fn clients(&self) -> Vec<crate::client::RegisteredClient> {
        self.table.all()
    }

    /// Administrative client registration, distinct from the UDP-side
    /// `NR02` self-registration path a client normally uses.
    pub fn register_client(&self, uid: i64, addr: SocketAddr, svcs: std::collections::HashSet<i64>) {
        self.table.register(uid, addr, svcs, Instant::now());
    }

    fn transport(&self) -> &Transport {
        self.transport.as_deref().expect("transport available until stop()/drop()")
    }

    /// Fans one `Notify` request out to every registered client matching
    /// `uid`/`notice_type`.
    pub fn post(&self, uid: i64, notice_type: i64, msgid: i64, data: &[u8]) {
        let now = Instant::now();
        for client in self.table.matching(uid, notice_type) {
            let payload = encode_notify_payload(notice_type as u32, uid as u32, msgid as u32, data);
            self.transport().enqueue_request(*b"NOTI", payload, client.addr);
            self.table.mark_sent(client.uid, client.addr, now);
        }
    }

    /// Broadcasts a reset to every registered client, briefly waits for
    /// responses to be observed, then tears down the transport.
    pub fn stop(mut self) {
        for client in self.table.all() {
            self.transport().enqueue_request([0, 0, 0, 0], Vec::new(), client.addr);
        }
        thread::sleep(Duration::from_secs(1));
        self.stop_helpers();
        if let Some(transport) = self.transport.take() {
            match Arc::try_unwrap(transport) {
                Ok(transport) => transport.shutdown(),
                Err(shared) => drop(shared),
            }
        }
    }

    fn stop_helpers(&mut self) {
        self.reaper_stop.store(true, Ordering::SeqCst);
        self.replay_stop.store(true, Ordering::SeqCst);
        if let Some(h) = self.reaper.take() {
            let _ = h.join();
        }
        if let Some(h) = self.replay_pump.take() {
            let _ = h.join();
        }
    }
}

impl Drop for NotifyUdpServer {
    fn drop(&mut self) {
        self.stop_helpers();
    }
}
