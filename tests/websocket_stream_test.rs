// Integration tests for the /ws push stream
//
// These run a real listener on an ephemeral port: the WebSocket upgrade
// needs a live hyper connection, which tower's oneshot cannot provide.

use futures::StreamExt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use steelpulse::api::create_app;
use steelpulse::config::HistoryConfig;
use steelpulse::state::PlantStore;
use steelpulse::subscription::BroadcastHub;
use tokio_tungstenite::{connect_async, tungstenite::Message};

async fn start_server(push_interval: Duration) -> (SocketAddr, Arc<PlantStore>, Arc<BroadcastHub>) {
    let store = Arc::new(PlantStore::seeded(&HistoryConfig::default()));
    let hub = Arc::new(BroadcastHub::new(Arc::clone(&store), push_interval));
    let app = create_app(Arc::clone(&store), Arc::clone(&hub));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, store, hub)
}

async fn next_update<S>(stream: &mut S) -> serde_json::Value
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => return serde_json::from_str(&text).unwrap(),
            Some(Ok(_)) => continue,
            other => panic!("stream ended before update: {:?}", other),
        }
    }
}

async fn wait_for_subscribers(hub: &BroadcastHub, expected: usize) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while hub.subscriber_count() != expected {
        assert!(
            Instant::now() < deadline,
            "expected {} subscribers, have {}",
            expected,
            hub.subscriber_count()
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_first_update_arrives_immediately() {
    // Long push interval: only the on-connect push can arrive in time
    let (addr, _, _) = start_server(Duration::from_secs(30)).await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();

    let update = tokio::time::timeout(Duration::from_secs(2), next_update(&mut ws))
        .await
        .expect("no update within timeout");

    assert_eq!(update["type"], "update");
    assert_eq!(update["data"]["furnaces"].as_array().unwrap().len(), 6);
    assert_eq!(update["data"]["sensors"].as_array().unwrap().len(), 18);
    assert_eq!(update["data"]["kpis"].as_array().unwrap().len(), 4);
    assert!(update["data"]["timestamp"].is_string());
}

#[tokio::test]
async fn test_periodic_updates_reflect_store() {
    let (addr, store, _) = start_server(Duration::from_millis(50)).await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    let first = next_update(&mut ws).await;
    let first_ts = first["data"]["timestamp"].as_str().unwrap().to_string();

    store.update_sensor_value("L001", 55.0).unwrap();

    let l001_value = |update: &serde_json::Value| {
        update["data"]["sensors"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["id"] == "L001")
            .unwrap()["value"]
            .clone()
    };

    // A push already in flight may predate the write; the next one cannot
    let fresh = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let update = next_update(&mut ws).await;
            if l001_value(&update) == 55.0 {
                return update;
            }
        }
    })
    .await
    .expect("no periodic update with new value");

    assert_ne!(fresh["data"]["timestamp"].as_str().unwrap(), first_ts);
}

#[tokio::test]
async fn test_each_subscriber_gets_updates() {
    let (addr, _, hub) = start_server(Duration::from_millis(50)).await;

    let (mut a, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    let (mut b, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();

    for _ in 0..3 {
        assert_eq!(next_update(&mut a).await["type"], "update");
        assert_eq!(next_update(&mut b).await["type"], "update");
    }

    wait_for_subscribers(&hub, 2).await;
}

#[tokio::test]
async fn test_disconnect_releases_subscriber() {
    let (addr, store, hub) = start_server(Duration::from_millis(50)).await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    next_update(&mut ws).await;
    wait_for_subscribers(&hub, 1).await;
    assert_eq!(store.stats.get_ws_connection_count(), 1);

    ws.close(None).await.unwrap();
    drop(ws);

    wait_for_subscribers(&hub, 0).await;
    assert_eq!(store.stats.get_ws_connection_count(), 0);
}

#[tokio::test]
async fn test_abrupt_drop_releases_subscriber() {
    let (addr, _, hub) = start_server(Duration::from_millis(20)).await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    next_update(&mut ws).await;
    wait_for_subscribers(&hub, 1).await;

    // No close handshake: the server notices on read or on the next push
    drop(ws);

    wait_for_subscribers(&hub, 0).await;
}

#[tokio::test]
async fn test_client_messages_are_ignored() {
    let (addr, _, hub) = start_server(Duration::from_millis(50)).await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    next_update(&mut ws).await;

    futures::SinkExt::send(&mut ws, Message::Text("{\"type\":\"subscribe\"}".to_string()))
        .await
        .unwrap();

    // Stream keeps flowing
    assert_eq!(next_update(&mut ws).await["type"], "update");
    assert_eq!(hub.subscriber_count(), 1);
}
