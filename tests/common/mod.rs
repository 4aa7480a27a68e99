// Common utilities for end-to-end testing
//
// Starts an in-process server on an ephemeral port and talks to it either
// through the redis crate or over a raw socket for byte-exact replies.

#![allow(dead_code)]

use bytes::BytesMut;
use redis::{Client, RedisResult};
use redis_keyspace::protocol::{RespParser, RespSerializer, RespValue};
use redis_keyspace::server::{RedisServer, ServerConfig};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A test server instance
pub struct TestRedisServer {
    pub port: u16,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl TestRedisServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().expect("No local addr").port();

        let server = Arc::new(RedisServer::new(ServerConfig::default().with_port(port)));
        let handle = tokio::spawn(async move {
            let _ = server.serve(listener).await;
        });

        let client = Client::open(format!("redis://127.0.0.1:{}/", port))
            .expect("Failed to create Redis client");

        Self {
            port,
            client,
            handle,
        }
    }

    pub async fn get_async_connection(&self) -> RedisResult<redis::aio::Connection> {
        self.client.get_async_connection().await
    }

    pub async fn raw(&self) -> RawClient {
        let stream = TcpStream::connect(("127.0.0.1", self.port))
            .await
            .expect("Failed to connect");
        RawClient {
            stream,
            buffer: BytesMut::with_capacity(1024),
        }
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

/// Plain socket client that returns replies exactly as the server sent them
pub struct RawClient {
    stream: TcpStream,
    buffer: BytesMut,
}

impl RawClient {
    /// Send one command and return the raw reply bytes
    pub async fn call(&mut self, args: &[&str]) -> Vec<u8> {
        self.send(&RespSerializer::command(args)).await;
        self.read_reply().await.0
    }

    /// Send one command and return the decoded reply
    pub async fn query(&mut self, args: &[&str]) -> RespValue {
        self.send(&RespSerializer::command(args)).await;
        self.read_reply().await.1
    }

    pub async fn send(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).await.expect("write failed");
    }

    pub async fn read_reply(&mut self) -> (Vec<u8>, RespValue) {
        loop {
            if let Some((value, len)) = RespParser::parse(&self.buffer).expect("bad reply") {
                let raw = self.buffer.split_to(len).to_vec();
                return (raw, value);
            }
            let n = self
                .stream
                .read_buf(&mut self.buffer)
                .await
                .expect("read failed");
            assert!(n > 0, "server closed the connection");
        }
    }

    /// Read until the server closes the connection
    pub async fn read_to_end(&mut self) -> Vec<u8> {
        let mut rest = self.buffer.split().to_vec();
        self.stream
            .read_to_end(&mut rest)
            .await
            .expect("read failed");
        rest
    }
}
