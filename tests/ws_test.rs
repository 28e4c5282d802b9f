//! WebSocket session tests against a local echo server.

use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use wireline::{ConnectConfig, ErrorKind, Message, WebSocketSession};

/// Spawns an echo server that accepts WebSocket upgrades and mirrors every
/// text/binary frame back to the client.
async fn spawn_echo_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                while let Some(Ok(msg)) = ws.next().await {
                    if msg.is_text() || msg.is_binary() {
                        if ws.send(msg).await.is_err() {
                            break;
                        }
                    } else if msg.is_close() {
                        break;
                    }
                }
            });
        }
    });

    addr
}

#[tokio::test]
async fn echo_round_trip_text() {
    let addr = spawn_echo_server().await;

    let mut session = WebSocketSession::configure(&format!("ws://{addr}/echo")).unwrap();
    session.connect().await.unwrap();
    assert!(session.is_open());

    session.send_text("ping").await.unwrap();
    let reply = session.read().await.unwrap();
    assert_eq!(reply.as_text(), Some("ping"));

    session.close().await.unwrap();
    assert!(!session.is_open());
}

#[tokio::test]
async fn echo_round_trip_binary() {
    let addr = spawn_echo_server().await;

    let mut session = WebSocketSession::configure(&format!("ws://{addr}/echo")).unwrap();
    session.connect().await.unwrap();

    session.send_binary(&b"\x00\x01\x02"[..]).await.unwrap();
    let reply = session.read().await.unwrap();
    assert_eq!(reply.into_data(), vec![0, 1, 2]);

    session.close().await.unwrap();
}

#[tokio::test]
async fn reads_and_writes_are_independent() {
    let addr = spawn_echo_server().await;

    let mut session = WebSocketSession::configure(&format!("ws://{addr}/echo")).unwrap();
    session.connect().await.unwrap();

    // Multiple writes before any read; the session imposes no pairing.
    session.send_text("one").await.unwrap();
    session.send_text("two").await.unwrap();
    assert_eq!(session.read().await.unwrap().as_text(), Some("one"));
    assert_eq!(session.read().await.unwrap().as_text(), Some("two"));

    session.close().await.unwrap();
}

#[tokio::test]
async fn operations_before_open_fail_fast() {
    let mut session = WebSocketSession::configure("ws://127.0.0.1:1/never").unwrap();

    let err = session.read().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotConnected);
    let err = session.write(Message::Text("hi".into())).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotConnected);
    let err = session.close().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotConnected);
}

#[tokio::test]
async fn operations_after_close_fail_fast() {
    let addr = spawn_echo_server().await;

    let mut session = WebSocketSession::configure(&format!("ws://{addr}/echo")).unwrap();
    session.connect().await.unwrap();
    session.close().await.unwrap();

    let err = session.send_text("late").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotConnected);
    let err = session.read().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotConnected);
}

#[tokio::test]
async fn connect_to_closed_port_is_connect_fail() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut session = WebSocketSession::configure(&format!("ws://{addr}/")).unwrap();
    let err = session.connect().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConnectFail);

    // Failed connect is terminal.
    let err = session.connect().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotConnected);
}

#[tokio::test]
async fn rejected_upgrade_is_connect_fail() {
    // A server that talks plain HTTP and refuses the upgrade.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let _ = socket
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n")
                .await;
        }
    });

    let mut session = WebSocketSession::configure(&format!("ws://{addr}/nope")).unwrap();
    let err = session.connect().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConnectFail);
}

#[tokio::test]
async fn upgrade_deadline_is_configurable() {
    // A listener that accepts the TCP connection but never answers the
    // upgrade request.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((socket, _)) = listener.accept().await {
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        }
    });

    let mut session = WebSocketSession::configure(&format!("ws://{addr}/slow")).unwrap();
    session.set_config(ConnectConfig {
        handshake_timeout: Duration::from_millis(100),
    });
    let err = session.connect().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConnectFail);
    assert!(err.message().contains("timed out"), "{err}");
}

#[tokio::test]
async fn invalid_uri_leaves_session_usable() {
    let mut session = WebSocketSession::new();
    let err = session.set_uri("not-a-uri").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParam);

    let addr = spawn_echo_server().await;
    session.set_uri(&format!("ws://{addr}/echo")).unwrap();
    session.connect().await.unwrap();
    session.send_text("still works").await.unwrap();
    assert_eq!(session.read().await.unwrap().as_text(), Some("still works"));
    session.close().await.unwrap();
}

#[tokio::test]
async fn server_close_surfaces_close_frame() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            ws.close(None).await.unwrap();
            while let Some(msg) = ws.next().await {
                if msg.is_err() {
                    break;
                }
            }
        }
    });

    let mut session = WebSocketSession::configure(&format!("ws://{addr}/")).unwrap();
    session.connect().await.unwrap();

    let msg = session.read().await.unwrap();
    assert!(msg.is_close());
    assert!(!session.is_open());
}
