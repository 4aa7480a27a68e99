// RESP Protocol Parser

use super::{
    find_crlf, parse_integer, read_line, RespError, RespValue, Result, MAX_BULK_LEN,
    MAX_INLINE_LEN, MAX_MULTIBULK_LEN,
};
use bytes::Bytes;
use std::io::Cursor;

/// Most slots reserved up front from an array header
const PREALLOC_LIMIT: i64 = 1024;

pub struct RespParser;

impl RespParser {
    /// Decode one client request from the front of `buf`.
    ///
    /// Returns `Ok(None)` while the request is incomplete, otherwise the
    /// argument list (command name first) and the number of bytes consumed.
    /// An empty argument list means the client sent a blank request.
    pub fn parse_command(buf: &[u8]) -> Result<Option<(Vec<Bytes>, usize)>> {
        match buf.first() {
            None => Ok(None),
            Some(b'*') => {
                let mut cursor = Cursor::new(buf);
                match Self::parse_multibulk(&mut cursor) {
                    Ok(args) => Ok(Some((args, cursor.position() as usize))),
                    Err(RespError::Incomplete) => Ok(None),
                    Err(e) => Err(e),
                }
            }
            Some(_) => Self::parse_inline(buf),
        }
    }

    /// Decode one reply value from the front of `buf`
    pub fn parse(buf: &[u8]) -> Result<Option<(RespValue, usize)>> {
        let mut cursor = Cursor::new(buf);
        match Self::parse_value(&mut cursor) {
            Ok(value) => Ok(Some((value, cursor.position() as usize))),
            Err(RespError::Incomplete) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// *<count>\r\n followed by <count> bulk strings
    fn parse_multibulk(cursor: &mut Cursor<&[u8]>) -> Result<Vec<Bytes>> {
        cursor.set_position(cursor.position() + 1);
        let line = read_line(cursor)?;
        let count = parse_integer(line)
            .filter(|n| *n <= MAX_MULTIBULK_LEN)
            .ok_or(RespError::InvalidMultibulkLength)?;
        if count <= 0 {
            return Ok(Vec::new());
        }

        let mut args = Vec::with_capacity(count.min(PREALLOC_LIMIT) as usize);
        for _ in 0..count {
            let pos = cursor.position() as usize;
            let data = *cursor.get_ref();
            match data.get(pos) {
                None => return Err(RespError::Incomplete),
                Some(b'$') => cursor.set_position(pos as u64 + 1),
                Some(other) => {
                    return Err(RespError::InvalidProtocol(format!(
                        "expected '$', got '{}'",
                        *other as char
                    )))
                }
            }
            let arg = Self::parse_bulk(cursor)?.ok_or(RespError::InvalidBulkLength)?;
            args.push(arg);
        }
        Ok(args)
    }

    /// Whitespace separated words terminated by a newline
    fn parse_inline(buf: &[u8]) -> Result<Option<(Vec<Bytes>, usize)>> {
        let Some(newline) = buf.iter().position(|&b| b == b'\n') else {
            if buf.len() > MAX_INLINE_LEN {
                return Err(RespError::InvalidProtocol(
                    "too big inline request".to_string(),
                ));
            }
            return Ok(None);
        };

        let line = buf[..newline].strip_suffix(b"\r").unwrap_or(&buf[..newline]);
        let args = line
            .split(|b| b.is_ascii_whitespace())
            .filter(|word| !word.is_empty())
            .map(Bytes::copy_from_slice)
            .collect();
        Ok(Some((args, newline + 1)))
    }

    fn parse_value(cursor: &mut Cursor<&[u8]>) -> Result<RespValue> {
        let pos = cursor.position() as usize;
        let type_byte = *cursor.get_ref().get(pos).ok_or(RespError::Incomplete)?;
        cursor.set_position(pos as u64 + 1);

        match type_byte {
            b'+' => Ok(RespValue::SimpleString(Self::parse_text(cursor)?)),
            b'-' => Ok(RespValue::Error(Self::parse_text(cursor)?)),
            b':' => {
                let line = read_line(cursor)?;
                parse_integer(line).map(RespValue::Integer).ok_or_else(|| {
                    RespError::InvalidProtocol("invalid integer".to_string())
                })
            }
            b'$' => Ok(RespValue::BulkString(Self::parse_bulk(cursor)?)),
            b'*' => {
                let line = read_line(cursor)?;
                let len = parse_integer(line)
                    .filter(|n| *n >= -1)
                    .ok_or(RespError::InvalidMultibulkLength)?;
                if len == -1 {
                    return Ok(RespValue::Array(None));
                }
                let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT) as usize);
                for _ in 0..len {
                    items.push(Self::parse_value(cursor)?);
                }
                Ok(RespValue::Array(Some(items)))
            }
            other => Err(RespError::InvalidProtocol(format!(
                "unknown type byte '{}'",
                other as char
            ))),
        }
    }

    fn parse_text(cursor: &mut Cursor<&[u8]>) -> Result<String> {
        let line = read_line(cursor)?;
        Ok(String::from_utf8_lossy(line).into_owned())
    }

    /// <len>\r\n<data>\r\n, or -1 for null
    fn parse_bulk(cursor: &mut Cursor<&[u8]>) -> Result<Option<Bytes>> {
        let line = read_line(cursor)?;
        let len = parse_integer(line)
            .filter(|n| (-1..=MAX_BULK_LEN).contains(n))
            .ok_or(RespError::InvalidBulkLength)?;
        if len == -1 {
            return Ok(None);
        }

        let start = cursor.position() as usize;
        let end = start + len as usize;
        let data = *cursor.get_ref();
        if end + 2 > data.len() {
            return Err(RespError::Incomplete);
        }
        if find_crlf(&data[end..end + 2]) != Some(0) {
            return Err(RespError::InvalidProtocol(
                "missing CRLF after bulk string".to_string(),
            ));
        }

        cursor.set_position((end + 2) as u64);
        Ok(Some(Bytes::copy_from_slice(&data[start..end])))
    }
}
