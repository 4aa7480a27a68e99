// Connection handler

use crate::commands::Dispatcher;
use crate::protocol::{RespError, RespParser, RespSerializer, RespValue};
use bytes::{Bytes, BytesMut};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{debug, trace};

/// One client session: reads requests, runs them through the dispatcher and
/// writes the replies back in order. Pipelined requests already in the read
/// buffer are answered with a single flush.
pub struct Connection<S> {
    stream: BufWriter<S>,
    buffer: BytesMut,
    out: BytesMut,
    peer: SocketAddr,
    dispatcher: Arc<Dispatcher>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(socket: S, peer: SocketAddr, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            stream: BufWriter::new(socket),
            buffer: BytesMut::with_capacity(4096),
            out: BytesMut::with_capacity(4096),
            peer,
            dispatcher,
        }
    }

    /// Main processing loop for this connection
    pub async fn process(&mut self) -> anyhow::Result<()> {
        loop {
            loop {
                match self.parse_request() {
                    Ok(Some(request)) => self.handle_request(request),
                    Ok(None) => break,
                    Err(e) => {
                        // Replies to earlier requests go out first, then the
                        // error, then the client is dropped
                        debug!("Protocol error from {}: {}", self.peer, e);
                        RespSerializer::write_value(
                            &mut self.out,
                            &RespValue::Error(format!("ERR {}", e)),
                        );
                        self.flush().await?;
                        return Ok(());
                    }
                }
            }
            self.flush().await?;

            if self.stream.get_mut().read_buf(&mut self.buffer).await? == 0 {
                // Connection closed by client
                if self.buffer.is_empty() {
                    return Ok(());
                }
                return Err(anyhow::anyhow!("Connection reset by peer"));
            }
        }
    }

    /// Try to take one complete request off the front of the buffer
    fn parse_request(&mut self) -> Result<Option<Vec<Bytes>>, RespError> {
        match RespParser::parse_command(&self.buffer)? {
            Some((request, len)) => {
                let _ = self.buffer.split_to(len);
                Ok(Some(request))
            }
            None => Ok(None),
        }
    }

    fn handle_request(&mut self, request: Vec<Bytes>) {
        // Blank lines are ignored, as redis-cli may send them
        if request.is_empty() {
            return;
        }
        trace!("{} -> {:?}", self.peer, request);
        let reply = self.dispatcher.execute_request(&request);
        RespSerializer::write_value(&mut self.out, &reply);
    }

    async fn flush(&mut self) -> anyhow::Result<()> {
        if self.out.is_empty() {
            return Ok(());
        }
        self.stream.write_all(&self.out).await?;
        self.stream.flush().await?;
        self.out.clear();
        Ok(())
    }
}
