//! Concurrent send/disconnect race stress tests.
//!
//! The client is cloneable; clones drive the same connection from separate
//! tasks, which is exactly the two-context model the lifecycle state must
//! survive: sends racing a disconnect, and the receive loop racing both.

use crate::common::{bind_server, connect_client, drain_disconnect_events};
use wireline::{LinkEvent, TcpClient};

const STRESS_ROUNDS: usize = 25;
const SENDS_PER_ROUND: usize = 10;

#[tokio::test]
async fn send_racing_disconnect_never_double_notifies() {
    let (listener, port) = bind_server().await;
    let client = TcpClient::new("127.0.0.1".to_string(), port);

    for round in 0..STRESS_ROUNDS {
        let mut events = client.subscribe();
        let peer = connect_client(&listener, &client).await;
        assert_eq!(
            events.recv().await.unwrap(),
            LinkEvent::StateChanged(true),
            "Round {} failed to connect",
            round
        );

        let sender = {
            let client = client.clone();
            tokio::spawn(async move {
                for _ in 0..SENDS_PER_ROUND {
                    client.send("racing payload").await;
                }
            })
        };
        let disconnector = {
            let client = client.clone();
            tokio::spawn(async move {
                client.disconnect().await;
            })
        };

        sender.await.expect("Sender task panicked");
        disconnector.await.expect("Disconnector task panicked");

        assert!(
            !client.is_connected(),
            "Round {}: final state must be Disconnected",
            round
        );
        assert_eq!(
            drain_disconnect_events(&mut events),
            1,
            "Round {}: exactly one StateChanged(false) expected",
            round
        );

        drop(peer);
    }
}

#[tokio::test]
async fn two_contexts_disconnecting_simultaneously_notify_once() {
    let (listener, port) = bind_server().await;
    let client = TcpClient::new("127.0.0.1".to_string(), port);

    for round in 0..STRESS_ROUNDS {
        let mut events = client.subscribe();
        let _peer = connect_client(&listener, &client).await;
        assert_eq!(events.recv().await.unwrap(), LinkEvent::StateChanged(true));

        let first = {
            let client = client.clone();
            tokio::spawn(async move { client.disconnect().await })
        };
        let second = {
            let client = client.clone();
            tokio::spawn(async move { client.disconnect().await })
        };

        first.await.expect("First disconnector panicked");
        second.await.expect("Second disconnector panicked");

        assert!(!client.is_connected());
        assert_eq!(
            drain_disconnect_events(&mut events),
            1,
            "Round {}: exactly one StateChanged(false) expected",
            round
        );
    }
}
