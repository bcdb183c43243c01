//! Test fixtures: a minimal HTTP payload server on a loopback socket.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::profiles::{FileProfile, SizeLabel};

/// How a fixture connection behaves after the response header.
#[derive(Debug, Clone, Copy)]
pub enum ServeMode {
    /// Write the whole body and close.
    Full,
    /// Write `stall_after` bytes of the body, then hold the socket open.
    Stall { stall_after: usize },
}

/// Serves `status_line` responses with a `body_len` zero-byte payload.
pub async fn spawn_payload_server(
    status_line: &'static str,
    body_len: usize,
    mode: ServeMode,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;

                let header = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Length: {body_len}\r\nConnection: close\r\n\r\n"
                );
                if socket.write_all(header.as_bytes()).await.is_err() {
                    return;
                }

                let limit = match mode {
                    ServeMode::Full => body_len,
                    ServeMode::Stall { stall_after } => stall_after.min(body_len),
                };
                let chunk = vec![0u8; 64 * 1024];
                let mut remaining = limit;
                while remaining > 0 {
                    let n = remaining.min(chunk.len());
                    if socket.write_all(&chunk[..n]).await.is_err() {
                        return;
                    }
                    remaining -= n;
                }
                let _ = socket.flush().await;

                if matches!(mode, ServeMode::Stall { .. }) {
                    // Keep the transfer open so the client stays blocked on
                    // the next chunk read.
                    tokio::time::sleep(Duration::from_secs(300)).await;
                }
            });
        }
    });

    addr
}

/// A profile pointing at the fixture server with a chosen declared size.
pub fn local_profile(addr: SocketAddr, declared_bytes: u64) -> FileProfile {
    FileProfile {
        label: SizeLabel::Mb10,
        url: format!("http://{addr}/down"),
        bytes: declared_bytes,
    }
}
