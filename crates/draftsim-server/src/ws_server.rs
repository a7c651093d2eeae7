// WebSocket server exposing the draft engine to clients.

use std::sync::Arc;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{info, warn};

use draftsim_core::DraftEngine;

use crate::protocol;

/// Accept connections forever, serving each one on its own task.
///
/// Every connection shares the same engine; operations on one draft are
/// serialized by the engine's per-draft lock.
pub async fn run(listener: TcpListener, engine: Arc<DraftEngine>) -> anyhow::Result<()> {
    let local_addr = listener.local_addr()?;
    info!("WebSocket server listening on {local_addr}");

    loop {
        let (stream, addr) = listener.accept().await?;
        info!("Accepted TCP connection from {addr}");
        let engine = Arc::clone(&engine);
        tokio::spawn(handle_connection(stream, addr.to_string(), engine));
    }
}

async fn handle_connection(stream: TcpStream, addr: String, engine: Arc<DraftEngine>) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake failed for {addr}: {e}");
            return;
        }
    };

    let (write, read) = ws_stream.split();
    if let Err(e) = serve_messages(read, write, &engine, &addr).await {
        warn!("Failed to reply to {addr}: {e}");
    }
    info!("Client {addr} disconnected");
}

/// Answer every text message from `stream` with one text message on `sink`.
///
/// Generic over the stream and sink so it can be driven by in-memory
/// messages in tests. Returns when the client closes, the stream errors or
/// ends, or a reply cannot be sent.
pub async fn serve_messages<St, Si>(
    mut stream: St,
    mut sink: Si,
    engine: &DraftEngine,
    addr: &str,
) -> Result<(), Si::Error>
where
    St: Stream<Item = Result<Message, WsError>> + Unpin,
    Si: Sink<Message> + Unpin,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                let reply = protocol::handle_message(engine, text.as_str());
                sink.send(Message::Text(reply.into())).await?;
            }
            Ok(Message::Close(_)) => {
                info!("Client {addr} sent close frame");
                break;
            }
            Err(e) => {
                warn!("WebSocket error from {addr}: {e}");
                break;
            }
            _ => {
                // Binary, Ping, Pong and raw frames carry no requests.
            }
        }
    }
    Ok(())
}
