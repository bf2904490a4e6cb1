use std::net::UdpSocket;
use std::sync::Arc;
use std::time::Duration;

use notifysrv::NotifyUdpServer;
use stickystore::StickyStore;
use transport::packet::{encode_register_payload, Kind, Packet};

/// Register + sticky replay: seeded notices `{(uid=7,type=1,msgid=100,"hi"),
/// (uid=0,type=2,msgid=200,"all")}`, client registers `uid=7, svcs={1,2}`.
/// Both notices match (uid 0 is a broadcast, uid 7 is the registering
/// client; types 1 and 2 are both in its service set) so the server must
/// enqueue exactly two `Notify` requests back to the client.
#[test]
fn register_replays_matching_sticky_notices() {
    let store = Arc::new(StickyStore::open_in_memory().unwrap());
    store.insert(7, 1, 100, Some(b"hi")).unwrap();
    store.insert(0, 2, 200, Some(b"all")).unwrap();

    let server = NotifyUdpServer::bind("127.0.0.1:0", store, Duration::from_secs(300)).unwrap();
    let server_addr = server.local_addr();

    let client = UdpSocket::bind("127.0.0.1:0").unwrap();
    client.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    let client_port = client.local_addr().unwrap().port();

    let register_payload = encode_register_payload("7", client_port, &[1, 2]);
    let request = Packet::new(Kind::Request, 1, *b"NR02", register_payload).encode();
    client.send_to(&request, server_addr).unwrap();

    // First datagram back is the immediate response to the NR02 request.
    let mut buf = [0u8; 4096];
    let (n, _) = client.recv_from(&mut buf).unwrap();
    let resp = Packet::decode(&buf[..n]).unwrap();
    assert_eq!(resp.kind, Kind::Response);

    let mut notify_count = 0;
    for _ in 0..2 {
        let (n, _) = client.recv_from(&mut buf).expect("expected a replayed Notify request");
        let pkt = Packet::decode(&buf[..n]).unwrap();
        assert_eq!(pkt.kind, Kind::Request);
        assert_eq!(&pkt.udata, b"NOTI");
        notify_count += 1;
    }
    assert_eq!(notify_count, 2);

    server.stop();
}
