// Protocol module - RESP parser and serializer

use bytes::Bytes;
use std::io::Cursor;
use thiserror::Error;

pub mod parser;
pub mod serializer;

pub use parser::RespParser;
pub use serializer::RespSerializer;

/// Longest accepted bulk string (512MB, as in Redis)
pub const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// Largest accepted multibulk request
pub const MAX_MULTIBULK_LEN: i64 = 1024 * 1024;

/// Longest inline request line without a terminating CRLF
pub const MAX_INLINE_LEN: usize = 64 * 1024;

/// RESP2 reply and request values
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// Simple string: +OK\r\n
    SimpleString(String),
    /// Error: -ERR unknown command\r\n
    Error(String),
    /// Integer: :1000\r\n
    Integer(i64),
    /// Bulk string: $6\r\nfoobar\r\n (None for null bulk string)
    BulkString(Option<Bytes>),
    /// Array: *2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n (None for null array)
    Array(Option<Vec<RespValue>>),
}

impl RespValue {
    pub fn ok() -> Self {
        RespValue::SimpleString("OK".to_string())
    }

    pub fn bulk(data: impl Into<Bytes>) -> Self {
        RespValue::BulkString(Some(data.into()))
    }

    pub fn null() -> Self {
        RespValue::BulkString(None)
    }

    pub fn array(items: Vec<RespValue>) -> Self {
        RespValue::Array(Some(items))
    }
}

#[derive(Error, Debug)]
pub enum RespError {
    #[error("Incomplete data")]
    Incomplete,

    #[error("Protocol error: {0}")]
    InvalidProtocol(String),

    #[error("Protocol error: invalid bulk length")]
    InvalidBulkLength,

    #[error("Protocol error: invalid multibulk length")]
    InvalidMultibulkLength,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RespError>;

/// Position of the first CRLF in `buf`
pub(crate) fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

/// Read one CRLF-terminated line, leaving the cursor after the terminator
pub(crate) fn read_line<'a>(cursor: &mut Cursor<&'a [u8]>) -> Result<&'a [u8]> {
    let start = cursor.position() as usize;
    let buf: &'a [u8] = *cursor.get_ref();
    let slice = &buf[start..];

    let end = find_crlf(slice).ok_or(RespError::Incomplete)?;

    cursor.set_position((start + end + 2) as u64);
    Ok(&slice[..end])
}

pub(crate) fn parse_integer(buf: &[u8]) -> Option<i64> {
    std::str::from_utf8(buf).ok()?.parse::<i64>().ok()
}
