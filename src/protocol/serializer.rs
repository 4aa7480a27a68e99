// RESP Protocol Serializer

use super::RespValue;
use bytes::{BufMut, Bytes, BytesMut};

pub struct RespSerializer;

impl RespSerializer {
    pub fn serialize(value: &RespValue) -> Bytes {
        let mut buf = BytesMut::new();
        Self::write_value(&mut buf, value);
        buf.freeze()
    }

    /// Append the encoding of `value` to `buf`
    pub fn write_value(buf: &mut BytesMut, value: &RespValue) {
        match value {
            RespValue::SimpleString(s) => Self::write_line(buf, b'+', s.as_bytes()),
            RespValue::Error(e) => Self::write_line(buf, b'-', e.as_bytes()),
            RespValue::Integer(i) => Self::write_line(buf, b':', i.to_string().as_bytes()),
            RespValue::BulkString(None) => buf.put_slice(b"$-1\r\n"),
            RespValue::BulkString(Some(data)) => {
                Self::write_line(buf, b'$', data.len().to_string().as_bytes());
                buf.put_slice(data);
                buf.put_slice(b"\r\n");
            }
            RespValue::Array(None) => buf.put_slice(b"*-1\r\n"),
            RespValue::Array(Some(items)) => {
                Self::write_line(buf, b'*', items.len().to_string().as_bytes());
                for item in items {
                    Self::write_value(buf, item);
                }
            }
        }
    }

    /// Encode a request the way clients send it: an array of bulk strings
    pub fn command<A: AsRef<[u8]>>(args: &[A]) -> Bytes {
        let mut buf = BytesMut::new();
        Self::write_line(&mut buf, b'*', args.len().to_string().as_bytes());
        for arg in args {
            let arg = arg.as_ref();
            Self::write_line(&mut buf, b'$', arg.len().to_string().as_bytes());
            buf.put_slice(arg);
            buf.put_slice(b"\r\n");
        }
        buf.freeze()
    }

    fn write_line(buf: &mut BytesMut, prefix: u8, line: &[u8]) {
        buf.put_u8(prefix);
        // Simple strings and errors cannot carry line breaks
        for &b in line {
            buf.put_u8(if b == b'\r' || b == b'\n' { b' ' } else { b });
        }
        buf.put_slice(b"\r\n");
    }
}
