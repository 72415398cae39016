//! Integration tests for malformed input and unknown events.

mod common;

use common::TestServer;
use tictac_proto::ServerEvent;

#[tokio::test]
async fn test_malformed_json_gets_room_error() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect().await.unwrap();

    client.send_raw("this is not json").await.unwrap();
    match client.recv().await.unwrap() {
        ServerEvent::RoomError(e) => assert_eq!(e.code, "invalid_request"),
        other => panic!("expected room_error, got {other:?}"),
    }

    // The connection is still usable.
    client.join("r1", "Alice").await.unwrap();
    client.expect("waiting_for_opponent").await.unwrap();
}

#[tokio::test]
async fn test_unknown_event_is_reported() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect().await.unwrap();

    client
        .send_raw(r#"{"event":"spectate","data":{"roomId":"r1"}}"#)
        .await
        .unwrap();
    match client.recv().await.unwrap() {
        ServerEvent::RoomError(e) => {
            assert_eq!(e.code, "unknown_event");
            assert!(e.message.contains("spectate"));
        }
        other => panic!("expected room_error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bad_move_payload_gets_move_error() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect().await.unwrap();

    client
        .send_raw(r#"{"event":"make_move","data":{"roomId":"r1","index":"center"}}"#)
        .await
        .unwrap();
    match client.recv().await.unwrap() {
        ServerEvent::MoveError(e) => assert_eq!(e.code, "invalid_request"),
        other => panic!("expected move_error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_binary_frame_is_rejected() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect().await.unwrap();

    client.send_binary(vec![1, 2, 3]).await.unwrap();
    match client.recv().await.unwrap() {
        ServerEvent::RoomError(e) => assert_eq!(e.code, "invalid_request"),
        other => panic!("expected room_error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_blank_player_name_is_rejected() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect().await.unwrap();

    client.join("r1", "   ").await.unwrap();
    match client.recv().await.unwrap() {
        ServerEvent::RoomError(e) => assert_eq!(e.code, "invalid_request"),
        other => panic!("expected room_error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_frames_count_against_rate_limit() {
    let server = TestServer::spawn_rate_limited(3)
        .await
        .expect("Failed to spawn test server");
    let mut client = server.connect().await.unwrap();

    for _ in 0..6 {
        client.send_raw("{{{").await.unwrap();
    }

    let mut codes = Vec::new();
    for _ in 0..6 {
        match client.recv().await.unwrap() {
            ServerEvent::RoomError(e) => codes.push(e.code),
            other => panic!("expected room_error, got {other:?}"),
        }
    }

    // The burst is decoded; what follows is throttled before decoding.
    assert!(codes[..3].iter().all(|c| c == "invalid_request"));
    assert!(codes[3..].iter().any(|c| c == "rate_limited"));
}
