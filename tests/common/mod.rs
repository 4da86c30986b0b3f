//! Shared helpers for integration tests: a minimal stub HTTP server and
//! synthetic image fixtures.

#![allow(dead_code, unreachable_pub)]

use image::{GrayImage, Luma};
use std::collections::HashMap;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned response served by the stub server
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Content-Length to advertise; defaults to the actual body length
    pub declared_len: Option<usize>,
}

impl StubResponse {
    /// 200 response with a JSON body
    pub fn ok_json(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
            declared_len: None,
        }
    }

    /// 200 response with binary image content
    pub fn ok_bytes(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "application/octet-stream",
            body,
            declared_len: None,
        }
    }

    /// 200 response advertising more bytes than it sends, so the connection
    /// closes mid-body
    pub fn ok_truncated(body: Vec<u8>, declared_len: usize) -> Self {
        Self {
            status: 200,
            content_type: "application/octet-stream",
            body,
            declared_len: Some(declared_len),
        }
    }

    /// Bare status response with an empty body
    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: Vec::new(),
            declared_len: None,
        }
    }
}

fn reason_for(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Error",
    }
}

/// Minimal HTTP server serving fixed responses by request path
///
/// Runs on an ephemeral local port until the test runtime shuts down. Query
/// strings are ignored when routing; unknown paths get a 404.
pub struct StubServer {
    pub addr: SocketAddr,
}

impl StubServer {
    /// Bind an ephemeral port and serve the given routes
    pub async fn start(routes: HashMap<String, StubResponse>) -> Self {
        // RUST_LOG-driven output when debugging a failing test
        let _ = env_logger::builder().is_test(true).try_init();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(routes);

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = Arc::clone(&routes);
                tokio::spawn(handle_connection(stream, routes));
            }
        });

        Self { addr }
    }

    /// Absolute URL for a path on this server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

async fn handle_connection(
    mut stream: tokio::net::TcpStream,
    routes: Arc<HashMap<String, StubResponse>>,
) {
    let mut buf = vec![0u8; 8192];
    let mut read = 0;
    loop {
        let Ok(n) = stream.read(&mut buf[read..]).await else {
            return;
        };
        if n == 0 {
            break;
        }
        read += n;
        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buf.len() {
            break;
        }
    }

    let request = String::from_utf8_lossy(&buf[..read]).into_owned();
    let path = request
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .split('?')
        .next()
        .unwrap_or("/")
        .to_string();

    let response = routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| StubResponse::status(404));

    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        reason_for(response.status),
        response.content_type,
        response.declared_len.unwrap_or(response.body.len()),
    );
    let _ = stream.write_all(header.as_bytes()).await;
    let _ = stream.write_all(&response.body).await;
    let _ = stream.shutdown().await;
}

/// PNG bytes for a dark frame containing `stars` bright 4x4 squares
pub fn star_field_png(stars: u32) -> Vec<u8> {
    let mut image = GrayImage::new(64, 64);
    for i in 0..stars {
        let x = 4 + (i * 12) % 56;
        let y = 4 + ((i * 12) / 56) * 12;
        for dy in 0..4 {
            for dx in 0..4 {
                image.put_pixel(x + dx, y + dy, Luma([255]));
            }
        }
    }

    let mut bytes = Cursor::new(Vec::new());
    image::DynamicImage::ImageLuma8(image)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}
