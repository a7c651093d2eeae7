// End-to-end tests over a real WebSocket connection against the fixture
// catalog in tests/fixtures.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use draftsim_core::catalog::loader::{load_catalog, CatalogPaths};
use draftsim_core::DraftEngine;
use draftsim_server::ws_server;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ===========================================================================
// Test helpers
// ===========================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn fixture_engine() -> Arc<DraftEngine> {
    let paths = CatalogPaths {
        prospects: fixture("nfl_draft_prospects.csv"),
        profiles: Some(fixture("nfl_draft_profiles.csv")),
        college_stats: Some(fixture("college_statistics.csv")),
    };
    let catalog = load_catalog(&paths).unwrap();
    Arc::new(DraftEngine::new(Arc::new(catalog)))
}

/// Start a server on an ephemeral port and connect one client to it.
async fn connect(engine: Arc<DraftEngine>) -> Client {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(ws_server::run(listener, engine));

    let (client, _) = tokio_tungstenite::connect_async(format!("ws://127.0.0.1:{port}"))
        .await
        .unwrap();
    client
}

async fn request(client: &mut Client, body: Value) -> Value {
    client
        .send(Message::Text(body.to_string().into()))
        .await
        .unwrap();
    loop {
        match client.next().await.unwrap().unwrap() {
            Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame {other:?}"),
        }
    }
}

fn ids(list: &Value, field: &str) -> Vec<u64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|entry| entry[field].as_u64().unwrap())
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn catalog_queries_over_socket() {
    let mut client = connect(fixture_engine()).await;

    let reply = request(&mut client, json!({"type": "HEALTH"})).await;
    assert_eq!(reply["payload"]["status"], "ok");

    let reply = request(&mut client, json!({"type": "LIST_YEARS"})).await;
    assert_eq!(reply["payload"], json!([2021]));

    let reply = request(&mut client, json!({"type": "LIST_TEAMS", "year": 2021})).await;
    let teams = reply["payload"].as_array().unwrap();
    assert_eq!(teams.len(), 13);
    assert_eq!(teams[0], "Atlanta Falcons");

    let reply = request(&mut client, json!({"type": "GET_PLAYER", "player_id": 1004})).await;
    assert_eq!(reply["type"], "PLAYER");
    assert_eq!(reply["payload"]["name"], "Kyle Pitts");
    assert_eq!(reply["payload"]["profile"]["nfl_comparison"], "Darren Waller");
    assert_eq!(reply["payload"]["stats"]["receiving_tds"], 12.0);
    assert!(reply["payload"]["stats"]["sacks"].is_null());

    let reply = request(&mut client, json!({"type": "GET_PLAYER", "player_id": 1015})).await;
    assert_eq!(reply["payload"]["profile"], json!({}));
    assert!(reply["payload"]["drafted"].is_null());
}

#[tokio::test]
async fn full_draft_with_user_deviation() {
    let mut client = connect(fixture_engine()).await;

    let reply = request(
        &mut client,
        json!({"type": "START_DRAFT", "year": 2021, "user_team": "Atlanta Falcons"}),
    )
    .await;
    let id = reply["payload"]["draft_id"].as_str().unwrap().to_string();

    let reply = request(&mut client, json!({"type": "ADVANCE", "draft_id": id})).await;
    assert_eq!(reply["payload"]["simulated"], 3);
    assert_eq!(reply["payload"]["status"], "waiting_for_user");
    assert_eq!(reply["payload"]["pick"], 4);

    let reply = request(&mut client, json!({"type": "LIST_AVAILABLE", "draft_id": id})).await;
    let available = ids(&reply["payload"], "player_id");
    assert_eq!(available.len(), 13);
    assert_eq!(available[0], 1004);
    // Unranked players come last.
    assert_eq!(available.last(), Some(&1016));

    // Take Chase instead of the scheduled Pitts.
    let reply = request(
        &mut client,
        json!({"type": "SUBMIT_PICK", "draft_id": id, "player_id": 1005}),
    )
    .await;
    assert_eq!(reply["type"], "ADVANCED");
    assert_eq!(reply["payload"]["status"], "complete");
    assert_eq!(reply["payload"]["simulated"], 9);

    let reply = request(&mut client, json!({"type": "GET_BOARD", "draft_id": id})).await;
    let board = &reply["payload"]["board"];
    assert_eq!(
        ids(board, "player_id"),
        vec![1001, 1002, 1003, 1005, 1010, 1006, 1007, 1008, 1009, 1016, 1011, 1012, 1013]
    );
    assert_eq!(board[3]["source"], "user");
    // Bengals lose Chase and take the best remaining receiver.
    assert_eq!(board[4]["source"], "position_need");
    assert_eq!(board[5]["source"], "scheduled");

    let reply = request(&mut client, json!({"type": "LIST_AVAILABLE", "draft_id": id})).await;
    assert_eq!(ids(&reply["payload"], "player_id"), vec![1004, 1014, 1015]);

    let reply = request(&mut client, json!({"type": "ADVANCE", "draft_id": id})).await;
    assert_eq!(reply["payload"]["simulated"], 0);
    assert_eq!(reply["payload"]["index"], 13);
}

#[tokio::test]
async fn drafts_are_shared_across_connections() {
    let engine = fixture_engine();
    let mut first = connect(Arc::clone(&engine)).await;
    let mut second = connect(Arc::clone(&engine)).await;

    let reply = request(
        &mut first,
        json!({"type": "START_DRAFT", "year": 2021, "user_team": "Chicago Bears"}),
    )
    .await;
    let id = reply["payload"]["draft_id"].as_str().unwrap().to_string();

    let reply = request(&mut second, json!({"type": "ADVANCE", "draft_id": id})).await;
    assert_eq!(reply["payload"]["simulated"], 10);
    assert_eq!(reply["payload"]["status"], "waiting_for_user");

    let reply = request(&mut first, json!({"type": "DELETE_DRAFT", "draft_id": id})).await;
    assert_eq!(reply["type"], "DRAFT_DELETED");
    assert_eq!(engine.active_drafts(), 0);

    let reply = request(&mut second, json!({"type": "GET_STATUS", "draft_id": id})).await;
    assert_eq!(reply["payload"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn bad_requests_keep_connection_open() {
    let mut client = connect(fixture_engine()).await;

    let reply = request(&mut client, json!({"nope": true})).await;
    assert_eq!(reply["type"], "ERROR");
    assert_eq!(reply["payload"]["code"], "BAD_REQUEST");

    let reply = request(&mut client, json!({"type": "HEALTH"})).await;
    assert_eq!(reply["type"], "HEALTH");
}
