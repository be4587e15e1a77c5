//! Ordered byte delivery tests.
//!
//! Delivery follows stream semantics: chunk boundaries carry no meaning,
//! so assertions compare concatenations, never per-event payloads.

use crate::common::{bind_server, connect_client, expect_link_down, TEST_TIMEOUT};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use wireline::{LinkEvent, TcpClient};

#[tokio::test]
async fn inbound_payloads_arrive_in_write_order() {
    let (listener, port) = bind_server().await;
    let client = TcpClient::new("127.0.0.1".to_string(), port);
    let mut events = client.subscribe();

    let mut peer = connect_client(&listener, &client).await;
    assert_eq!(events.recv().await.unwrap(), LinkEvent::StateChanged(true));

    for chunk in ["AB", "CD", "EF"] {
        peer.write_all(chunk.as_bytes())
            .await
            .expect("Peer write failed");
    }

    // Reads may split or coalesce the three writes arbitrarily; only the
    // concatenation is guaranteed.
    let mut received = String::new();
    timeout(TEST_TIMEOUT, async {
        while received.len() < 6 {
            match events.recv().await.expect("Event channel closed") {
                LinkEvent::DataReceived(text) => received.push_str(&text),
                LinkEvent::StateChanged(connected) => {
                    panic!("Unexpected state change to {} mid-stream", connected)
                }
            }
        }
    })
    .await
    .expect("Timed out waiting for inbound payloads");

    assert_eq!(received, "ABCDEF");

    client.disconnect().await;
    expect_link_down(&mut events).await;
}

#[tokio::test]
async fn outbound_payloads_arrive_in_send_order() {
    let (listener, port) = bind_server().await;
    let client = TcpClient::new("127.0.0.1".to_string(), port);
    let mut events = client.subscribe();

    let mut peer = connect_client(&listener, &client).await;
    assert_eq!(events.recv().await.unwrap(), LinkEvent::StateChanged(true));

    client.send("one ").await;
    client.send("two ").await;
    client.send("three").await;

    let mut received = vec![0u8; 64];
    let mut total = 0;
    while total < "one two three".len() {
        let n = peer
            .read(&mut received[total..])
            .await
            .expect("Peer read failed");
        assert_ne!(n, 0, "Peer saw EOF before all payloads arrived");
        total += n;
    }
    assert_eq!(&received[..total], b"one two three");

    client.disconnect().await;
    expect_link_down(&mut events).await;
}

#[tokio::test]
async fn payload_larger_than_one_read_buffer_survives_chunking() {
    let (listener, port) = bind_server().await;
    let client = TcpClient::new("127.0.0.1".to_string(), port);
    let mut events = client.subscribe();

    let mut peer = connect_client(&listener, &client).await;
    assert_eq!(events.recv().await.unwrap(), LinkEvent::StateChanged(true));

    // 10000 ASCII bytes: spans at least three 4096-byte reads.
    let payload: String = std::iter::repeat("0123456789").take(1000).collect();
    peer.write_all(payload.as_bytes())
        .await
        .expect("Peer write failed");

    let mut received = String::new();
    timeout(TEST_TIMEOUT, async {
        while received.len() < payload.len() {
            match events.recv().await.expect("Event channel closed") {
                LinkEvent::DataReceived(text) => received.push_str(&text),
                LinkEvent::StateChanged(connected) => {
                    panic!("Unexpected state change to {} mid-stream", connected)
                }
            }
        }
    })
    .await
    .expect("Timed out waiting for the large payload");

    assert_eq!(received, payload);

    client.disconnect().await;
    expect_link_down(&mut events).await;
}
