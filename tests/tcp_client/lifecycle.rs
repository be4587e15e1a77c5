//! Connect/disconnect/reconnect generation tests for the TCP client.

use crate::common::{bind_server, connect_client, expect_link_down};
use wireline::{LinkEvent, TcpClient};

#[tokio::test]
async fn connect_disconnect_reconnect_round_trip() {
    let (listener, port) = bind_server().await;
    let client = TcpClient::new("127.0.0.1".to_string(), port);
    let mut events = client.subscribe();

    // First generation.
    let _peer1 = connect_client(&listener, &client).await;
    assert!(client.is_connected());
    assert_eq!(events.recv().await.unwrap(), LinkEvent::StateChanged(true));

    client.disconnect().await;
    assert!(!client.is_connected());
    expect_link_down(&mut events).await;

    // Second generation against the still-live server.
    let _peer2 = connect_client(&listener, &client).await;
    assert!(client.is_connected());
    assert_eq!(events.recv().await.unwrap(), LinkEvent::StateChanged(true));

    client.disconnect().await;
    expect_link_down(&mut events).await;
}

#[tokio::test]
async fn previous_generation_failure_does_not_affect_the_next() {
    let (listener, port) = bind_server().await;
    let client = TcpClient::new("127.0.0.1".to_string(), port);
    let mut events = client.subscribe();

    // First generation ends by the peer dropping the connection.
    let peer1 = connect_client(&listener, &client).await;
    assert_eq!(events.recv().await.unwrap(), LinkEvent::StateChanged(true));
    drop(peer1);
    expect_link_down(&mut events).await;
    assert!(!client.is_connected());

    // A fresh generation connects and carries traffic normally.
    let mut peer2 = connect_client(&listener, &client).await;
    assert_eq!(events.recv().await.unwrap(), LinkEvent::StateChanged(true));

    client.send("alive").await;
    let mut buf = [0u8; 16];
    use tokio::io::AsyncReadExt;
    let n = peer2.read(&mut buf).await.expect("Peer read failed");
    assert_eq!(&buf[..n], b"alive");

    client.disconnect().await;
    expect_link_down(&mut events).await;
}

#[tokio::test]
async fn reconnect_over_live_connection_is_rejected_without_side_effects() {
    let (listener, port) = bind_server().await;
    let client = TcpClient::new("127.0.0.1".to_string(), port);
    let mut events = client.subscribe();

    let mut peer = connect_client(&listener, &client).await;
    assert_eq!(events.recv().await.unwrap(), LinkEvent::StateChanged(true));

    client
        .connect()
        .await
        .expect_err("Second connect should be rejected");

    // The live generation still carries traffic and emitted no extra events.
    client.send("still here").await;
    let mut buf = [0u8; 32];
    use tokio::io::AsyncReadExt;
    let n = peer.read(&mut buf).await.expect("Peer read failed");
    assert_eq!(&buf[..n], b"still here");
    assert!(events.try_recv().is_err());

    client.disconnect().await;
    expect_link_down(&mut events).await;
}
