//! RESP2 parser and encoder
//!
//! Implements parsing from bytes to RespValue and encoding from RespValue to bytes

use super::types::{RespError, RespValue};
use bytes::{Buf, BufMut, Bytes, BytesMut};

const CRLF: &[u8] = b"\r\n";

/// Largest accepted bulk string, as in Redis (512 MB)
const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// Largest accepted array element count
const MAX_ARRAY_LEN: i64 = i32::MAX as i64;

/// Deepest accepted array nesting
const MAX_DEPTH: usize = 32;

/// RESP2 Parser
pub struct RespParser;

impl RespParser {
    /// Parse a RESP value from a buffer
    ///
    /// Returns Ok(Some(value)) if a complete value was parsed (and consumed),
    /// Ok(None) if more data is needed (nothing is consumed),
    /// Err(e) if parsing failed
    pub fn parse(buf: &mut BytesMut) -> Result<Option<RespValue>, RespError> {
        match Self::parse_at(buf, 0, 0)? {
            Some((value, end)) => {
                buf.advance(end);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Parse the value starting at `pos`, returning it with the position just past it
    fn parse_at(
        buf: &[u8],
        pos: usize,
        depth: usize,
    ) -> Result<Option<(RespValue, usize)>, RespError> {
        let Some(&prefix) = buf.get(pos) else {
            return Ok(None);
        };
        let Some((line, next)) = Self::line_at(buf, pos + 1) else {
            return Ok(None);
        };

        match prefix {
            b'+' => {
                let s = std::str::from_utf8(line).map_err(|_| RespError::InvalidUtf8)?;
                Ok(Some((RespValue::SimpleString(s.to_string()), next)))
            }
            b'-' => {
                let s = std::str::from_utf8(line).map_err(|_| RespError::InvalidUtf8)?;
                Ok(Some((RespValue::Error(s.to_string()), next)))
            }
            b':' => Ok(Some((RespValue::Integer(Self::parse_int(line)?), next))),
            b'$' => {
                let len = Self::parse_int(line)?;
                if len == -1 {
                    return Ok(Some((RespValue::Null, next)));
                }
                if !(0..=MAX_BULK_LEN).contains(&len) {
                    return Err(RespError::InvalidProtocol(format!(
                        "Invalid bulk string length: {}",
                        len
                    )));
                }

                let end = next + len as usize;
                if buf.len() < end + 2 {
                    return Ok(None);
                }
                if &buf[end..end + 2] != CRLF {
                    return Err(RespError::InvalidProtocol(
                        "Missing CRLF after bulk string data".to_string(),
                    ));
                }
                let data = Bytes::copy_from_slice(&buf[next..end]);
                Ok(Some((RespValue::BulkString(data), end + 2)))
            }
            b'*' => {
                let count = Self::parse_int(line)?;
                if count == -1 {
                    return Ok(Some((RespValue::Null, next)));
                }
                if !(0..=MAX_ARRAY_LEN).contains(&count) {
                    return Err(RespError::InvalidProtocol(format!(
                        "Invalid array count: {}",
                        count
                    )));
                }
                if depth >= MAX_DEPTH {
                    return Err(RespError::InvalidProtocol("Arrays nested too deeply".to_string()));
                }

                // Elements are only consumed once the whole array is available
                let mut elements = Vec::with_capacity((count as usize).min(1024));
                let mut cursor = next;
                for _ in 0..count {
                    match Self::parse_at(buf, cursor, depth + 1)? {
                        Some((value, after)) => {
                            elements.push(value);
                            cursor = after;
                        }
                        None => return Ok(None),
                    }
                }
                Ok(Some((RespValue::Array(elements), cursor)))
            }
            other => Err(RespError::InvalidProtocol(format!(
                "Unknown type prefix: {}",
                other as char
            ))),
        }
    }

    /// Find the line starting at `pos`; returns it without CRLF and the position after CRLF
    fn line_at(buf: &[u8], pos: usize) -> Option<(&[u8], usize)> {
        let rest = buf.get(pos..)?;
        let offset = rest.windows(2).position(|w| w == CRLF)?;
        Some((&rest[..offset], pos + offset + 2))
    }

    fn parse_int(line: &[u8]) -> Result<i64, RespError> {
        let s = std::str::from_utf8(line).map_err(|_| RespError::InvalidUtf8)?;
        s.parse::<i64>().map_err(|_| RespError::IntegerOverflow)
    }
}

/// RESP2 Encoder
pub struct RespEncoder;

impl RespEncoder {
    /// Encode a RESP value to bytes
    pub fn encode(value: &RespValue) -> Bytes {
        let mut buf = BytesMut::new();
        Self::encode_to(&mut buf, value);
        buf.freeze()
    }

    /// Encode a RESP value into an existing buffer
    pub fn encode_to(buf: &mut BytesMut, value: &RespValue) {
        match value {
            RespValue::SimpleString(s) => {
                buf.put_u8(b'+');
                buf.put_slice(s.as_bytes());
                buf.put_slice(CRLF);
            }
            RespValue::Error(e) => {
                buf.put_u8(b'-');
                buf.put_slice(e.as_bytes());
                buf.put_slice(CRLF);
            }
            RespValue::Integer(i) => {
                buf.put_u8(b':');
                buf.put_slice(i.to_string().as_bytes());
                buf.put_slice(CRLF);
            }
            RespValue::BulkString(bytes) => {
                buf.put_u8(b'$');
                buf.put_slice(bytes.len().to_string().as_bytes());
                buf.put_slice(CRLF);
                buf.put_slice(bytes);
                buf.put_slice(CRLF);
            }
            RespValue::Null => {
                buf.put_slice(b"$-1\r\n");
            }
            RespValue::Array(arr) => {
                buf.put_u8(b'*');
                buf.put_slice(arr.len().to_string().as_bytes());
                buf.put_slice(CRLF);
                for elem in arr {
                    Self::encode_to(buf, elem);
                }
            }
        }
    }
}
