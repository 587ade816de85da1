//! End-to-end realtime tests: a real listener, HTTP mutations through
//! `reqwest` and event frames observed through `tokio-tungstenite`.

#![allow(clippy::panic)]

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use common::{TOKEN, build_test_app, test_config};
use os_tracker::config::{BroadcastScope, ServerConfig};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Binds an ephemeral port and serves the app in the background.
async fn spawn_server(config: ServerConfig) -> SocketAddr {
    let Ok(listener) = tokio::net::TcpListener::bind(config.listen_addr).await else {
        panic!("loopback bind should succeed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("bound listener has an address");
    };
    let app = build_test_app(config);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let Ok((ws, _)) = connect_async(format!("ws://{addr}/ws")).await else {
        panic!("realtime upgrade should succeed");
    };
    ws
}

/// Waits for the next text frame and decodes it.
async fn next_frame(ws: &mut Client) -> Value {
    loop {
        let Ok(Some(Ok(msg))) = tokio::time::timeout(Duration::from_secs(5), ws.next()).await
        else {
            panic!("expected a frame within 5s");
        };
        if let Message::Text(text) = msg {
            let Ok(frame) = serde_json::from_str(text.as_str()) else {
                panic!("frame should be JSON: {}", text.as_str());
            };
            return frame;
        }
    }
}

async fn send_frame(ws: &mut Client, frame: Value) {
    tokio_test::assert_ok!(ws.send(Message::text(frame.to_string())).await);
}

async fn api(method: reqwest::Method, addr: SocketAddr, path: &str, body: Value) -> Value {
    let Ok(response) = reqwest::Client::new()
        .request(method, format!("http://{addr}{path}"))
        .bearer_auth(TOKEN)
        .json(&body)
        .send()
        .await
    else {
        panic!("request to {path} should complete");
    };
    let Ok(json) = response.json::<Value>().await else {
        panic!("response from {path} should be JSON");
    };
    json
}

#[tokio::test]
async fn created_order_is_pushed_to_connected_client() {
    let addr = spawn_server(test_config()).await;
    let mut ws = connect(addr).await;

    let info = next_frame(&mut ws).await;
    assert_eq!(info["event"], "server:info");
    assert!(info["data"]["connectionId"].is_string());
    assert!(info["data"]["version"].is_string());

    let created = api(
        reqwest::Method::POST,
        addr,
        "/api/os",
        json!({ "clientName": "Pedro", "equipmentName": "Monitor" }),
    )
    .await;
    let id = created["order"]["id"].clone();

    let frame = next_frame(&mut ws).await;
    assert_eq!(frame["event"], "os:created");
    assert_eq!(frame["data"]["order"]["id"], id);
    assert_eq!(frame["data"]["order"]["clientName"], "Pedro");

    let Ok(response) = reqwest::Client::new()
        .get(format!("http://{addr}/api/os/{id}"))
        .bearer_auth(TOKEN)
        .send()
        .await
    else {
        panic!("GET should complete");
    };
    let Ok(fetched) = response.json::<Value>().await else {
        panic!("GET should return JSON");
    };
    assert_eq!(fetched["order"], frame["data"]["order"]);
}

#[tokio::test]
async fn each_connected_client_receives_created_order() {
    let addr = spawn_server(test_config()).await;
    let mut first = connect(addr).await;
    let mut second = connect(addr).await;
    let _ = next_frame(&mut first).await;
    let _ = next_frame(&mut second).await;

    let created = api(
        reqwest::Method::POST,
        addr,
        "/api/os",
        json!({ "clientName": "Bia" }),
    )
    .await;
    let id = created["order"]["id"].clone();

    for ws in [&mut first, &mut second] {
        let frame = next_frame(ws).await;
        assert_eq!(frame["event"], "os:created");
        assert_eq!(frame["data"]["order"]["id"], id);
    }
}

#[tokio::test]
async fn every_mutation_kind_reaches_global_clients() {
    let addr = spawn_server(test_config()).await;
    let mut ws = connect(addr).await;
    let _ = next_frame(&mut ws).await;

    let _ = api(reqwest::Method::PUT, addr, "/api/os/1", json!({ "status": "in_progress" })).await;
    let frame = next_frame(&mut ws).await;
    assert_eq!(frame["event"], "os:updated");
    assert_eq!(frame["data"]["order"]["status"], "in_progress");

    let _ = api(
        reqwest::Method::POST,
        addr,
        "/api/os/1/comments",
        json!({ "comment": "peça encomendada" }),
    )
    .await;
    let frame = next_frame(&mut ws).await;
    assert_eq!(frame["event"], "os:comment");
    assert_eq!(frame["data"]["osId"], 1);
    assert_eq!(frame["data"]["comment"]["comment"], "peça encomendada");

    let _ = api(reqwest::Method::DELETE, addr, "/api/os/1", json!({})).await;
    let frame = next_frame(&mut ws).await;
    assert_eq!(frame["event"], "os:deleted");
    assert_eq!(frame["data"], json!({ "orderId": 1 }));
}

#[tokio::test]
async fn client_commands_are_answered() {
    let addr = spawn_server(test_config()).await;
    let mut ws = connect(addr).await;
    let _ = next_frame(&mut ws).await;

    send_frame(&mut ws, json!({ "event": "ping" })).await;
    assert_eq!(next_frame(&mut ws).await["event"], "pong");

    send_frame(&mut ws, json!({ "event": "os:subscribe", "data": 1 })).await;
    let ack = next_frame(&mut ws).await;
    assert_eq!(ack["event"], "os:subscribed");
    assert_eq!(ack["data"]["osId"], 1);

    send_frame(&mut ws, json!({ "event": "bogus" })).await;
    assert_eq!(next_frame(&mut ws).await["event"], "error");
}

#[tokio::test]
async fn topic_scope_filters_by_subscription() {
    let mut config = test_config();
    config.broadcast_scope = BroadcastScope::Topic;
    let addr = spawn_server(config).await;
    let mut ws = connect(addr).await;
    let _ = next_frame(&mut ws).await;

    send_frame(&mut ws, json!({ "event": "os:subscribe", "data": 1 })).await;
    assert_eq!(next_frame(&mut ws).await["event"], "os:subscribed");

    let _ = api(reqwest::Method::POST, addr, "/api/os", json!({ "clientName": "Ana" })).await;
    let frame = next_frame(&mut ws).await;
    assert_eq!(frame["event"], "os:created");
    assert_eq!(frame["data"]["order"]["id"], 2);

    // Order 2 is not subscribed: its update, comment and deletion are
    // withheld, so the next frame is the update to order 1.
    let _ = api(reqwest::Method::PUT, addr, "/api/os/2", json!({ "defect": "x" })).await;
    let _ = api(
        reqwest::Method::POST,
        addr,
        "/api/os/2/comments",
        json!({ "comment": "x" }),
    )
    .await;
    let _ = api(reqwest::Method::DELETE, addr, "/api/os/2", json!({})).await;
    let _ = api(reqwest::Method::PUT, addr, "/api/os/1", json!({ "defect": "y" })).await;
    let frame = next_frame(&mut ws).await;
    assert_eq!(frame["event"], "os:updated");
    assert_eq!(frame["data"]["order"]["id"], 1);

    let _ = api(
        reqwest::Method::POST,
        addr,
        "/api/os/1/comments",
        json!({ "comment": "y" }),
    )
    .await;
    let frame = next_frame(&mut ws).await;
    assert_eq!(frame["event"], "os:comment");
    assert_eq!(frame["data"]["osId"], 1);

    let _ = api(reqwest::Method::DELETE, addr, "/api/os/1", json!({})).await;
    let frame = next_frame(&mut ws).await;
    assert_eq!(frame["event"], "os:deleted");
    assert_eq!(frame["data"]["orderId"], 1);
}
