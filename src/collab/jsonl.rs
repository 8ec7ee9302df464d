//! # Newline-delimited JSON chat transport.
//!
//! Reference [`ChatClient`] speaking NDJSON over TCP against a local chat
//! gateway: one JSON object per line, inbound and outbound. Outbound posts
//! open a short-lived connection per message; the inbound stream holds one
//! long-lived connection read line by line.

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::collab::{ChatClient, ChatConnection, CollabError};

/// NDJSON-over-TCP chat client.
#[derive(Debug, Clone)]
pub struct JsonlChat {
    addr: String,
}

impl JsonlChat {
    /// Creates a client dialing the given `host:port`.
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// The gateway address.
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl ChatClient for JsonlChat {
    async fn post(&self, channel: &str, text: &str) -> Result<(), CollabError> {
        let mut stream = TcpStream::connect(&self.addr).await?;
        let mut frame = serde_json::to_vec(&json!({
            "type": "message",
            "channel": channel,
            "text": text,
        }))?;
        frame.push(b'\n');
        stream.write_all(&frame).await?;
        stream.shutdown().await?;
        Ok(())
    }

    async fn connect(&self) -> Result<Box<dyn ChatConnection>, CollabError> {
        let stream = TcpStream::connect(&self.addr).await?;
        let (read, write) = stream.into_split();
        Ok(Box::new(JsonlConnection {
            lines: BufReader::new(read).lines(),
            _write: write,
        }))
    }
}

/// One live NDJSON stream.
struct JsonlConnection {
    lines: Lines<BufReader<OwnedReadHalf>>,
    // Held so the socket's write side stays open for the gateway.
    _write: OwnedWriteHalf,
}

#[async_trait]
impl ChatConnection for JsonlConnection {
    async fn next_event(&mut self) -> Result<Option<Value>, CollabError> {
        loop {
            match self.lines.next_line().await? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(Some(serde_json::from_str(&line)?)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn inbound_stream_yields_one_event_per_line() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            sock.write_all(b"{\"type\":\"message\",\"text\":\"hi\"}\n\n{\"type\":\"ping\"}\n")
                .await
                .unwrap();
        });

        let chat = JsonlChat::new(addr.to_string());
        let mut conn = chat.connect().await.unwrap();

        let first = conn.next_event().await.unwrap().unwrap();
        assert_eq!(first["type"], "message");
        let second = conn.next_event().await.unwrap().unwrap();
        assert_eq!(second["type"], "ping");
        assert!(conn.next_event().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn post_writes_a_single_frame() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = String::new();
            sock.read_to_string(&mut buf).await.unwrap();
            buf
        });

        let chat = JsonlChat::new(addr.to_string());
        chat.post("standings", "updated").await.unwrap();

        let frame = server.await.unwrap();
        let value: Value = serde_json::from_str(frame.trim()).unwrap();
        assert_eq!(value["channel"], "standings");
        assert_eq!(value["text"], "updated");
    }
}
