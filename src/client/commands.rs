//! Typed store commands
//!
//! One method per store command, each building the raw frame and decoding
//! the reply into a Rust value.

use super::{ClientError, KvClient};
use crate::protocol::{format_score, parse_score, RespValue};
use bytes::Bytes;
use std::ops::Bound;

type Result<T> = std::result::Result<T, ClientError>;

/// Raw command frame builder
#[derive(Debug, Clone)]
pub struct Cmd {
    parts: Vec<Bytes>,
}

impl Cmd {
    pub fn new(name: &'static str) -> Self {
        Cmd {
            parts: vec![Bytes::from_static(name.as_bytes())],
        }
    }

    pub fn arg(mut self, arg: impl AsRef<[u8]>) -> Self {
        self.parts.push(Bytes::copy_from_slice(arg.as_ref()));
        self
    }

    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        self.parts
            .extend(args.into_iter().map(|arg| Bytes::copy_from_slice(arg.as_ref())));
        self
    }

    pub fn into_parts(self) -> Vec<Bytes> {
        self.parts
    }
}

/// Turn an error reply into `ClientError::Server`
pub(crate) fn check(reply: RespValue) -> Result<RespValue> {
    match reply {
        RespValue::Error(message) => Err(ClientError::Server(message)),
        other => Ok(other),
    }
}

fn unexpected(expected: &str, reply: &RespValue) -> ClientError {
    ClientError::UnexpectedReply(format!("expected {}, got {}", expected, reply))
}

fn into_string(bytes: Bytes) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| ClientError::UnexpectedReply("bulk string is not valid UTF-8".to_string()))
}

fn integer(reply: RespValue) -> Result<i64> {
    match check(reply)? {
        RespValue::Integer(n) => Ok(n),
        other => Err(unexpected("integer", &other)),
    }
}

fn flag(reply: RespValue) -> Result<bool> {
    integer(reply).map(|n| n > 0)
}

fn ok(reply: RespValue) -> Result<()> {
    match check(reply)? {
        RespValue::SimpleString(s) if s == "OK" => Ok(()),
        other => Err(unexpected("OK", &other)),
    }
}

fn opt_string(reply: RespValue) -> Result<Option<String>> {
    match check(reply)? {
        RespValue::BulkString(bytes) => into_string(bytes).map(Some),
        RespValue::Null => Ok(None),
        other => Err(unexpected("bulk string or null", &other)),
    }
}

fn opt_integer(reply: RespValue) -> Result<Option<i64>> {
    match check(reply)? {
        RespValue::Integer(n) => Ok(Some(n)),
        RespValue::Null => Ok(None),
        other => Err(unexpected("integer or null", &other)),
    }
}

fn opt_score(reply: RespValue) -> Result<Option<f64>> {
    match check(reply)? {
        RespValue::BulkString(bytes) => parse_score(&bytes)
            .map(Some)
            .ok_or_else(|| ClientError::UnexpectedReply(format!("invalid score {:?}", bytes))),
        RespValue::Null => Ok(None),
        other => Err(unexpected("score or null", &other)),
    }
}

fn strings(reply: RespValue) -> Result<Vec<String>> {
    match check(reply)? {
        RespValue::Array(items) => items
            .into_iter()
            .map(|item| match item {
                RespValue::BulkString(bytes) => into_string(bytes),
                other => Err(unexpected("bulk string", &other)),
            })
            .collect(),
        other => Err(unexpected("array", &other)),
    }
}

fn pairs(reply: RespValue) -> Result<Vec<(String, String)>> {
    let flat = strings(reply)?;
    if flat.len() % 2 != 0 {
        return Err(ClientError::UnexpectedReply(
            "odd number of elements in field/value reply".to_string(),
        ));
    }

    let mut items = flat.into_iter();
    let mut pairs = Vec::new();
    while let (Some(field), Some(value)) = (items.next(), items.next()) {
        pairs.push((field, value));
    }
    Ok(pairs)
}

/// Score bound as ZRANGEBYSCORE expects it
fn score_bound(bound: Bound<f64>, unbounded: &str) -> String {
    match bound {
        Bound::Included(score) => format_score(score),
        Bound::Excluded(score) => format!("({}", format_score(score)),
        Bound::Unbounded => unbounded.to_string(),
    }
}

/// Typed commands available on every client
pub trait Commands: KvClient {
    /// Run a built command and return its raw reply
    fn run(&self, cmd: Cmd) -> Result<RespValue> {
        self.execute(cmd.into_parts())
    }

    // Keys

    fn ping(&self) -> Result<()> {
        match check(self.run(Cmd::new("PING"))?)? {
            RespValue::SimpleString(s) if s == "PONG" => Ok(()),
            other => Err(unexpected("PONG", &other)),
        }
    }

    fn exists(&self, key: &str) -> Result<bool> {
        flag(self.run(Cmd::new("EXISTS").arg(key))?)
    }

    fn del(&self, key: &str) -> Result<bool> {
        flag(self.run(Cmd::new("DEL").arg(key))?)
    }

    fn expire(&self, key: &str, seconds: i64) -> Result<bool> {
        flag(self.run(Cmd::new("EXPIRE").arg(key).arg(seconds.to_string()))?)
    }

    fn expireat(&self, key: &str, timestamp: i64) -> Result<bool> {
        flag(self.run(Cmd::new("EXPIREAT").arg(key).arg(timestamp.to_string()))?)
    }

    /// Remaining time to live in seconds, -1 without expiry, -2 for a missing key
    fn ttl(&self, key: &str) -> Result<i64> {
        integer(self.run(Cmd::new("TTL").arg(key))?)
    }

    fn flushdb(&self) -> Result<()> {
        ok(self.run(Cmd::new("FLUSHDB"))?)
    }

    // Sets

    fn sadd(&self, key: &str, members: impl IntoIterator<Item = impl AsRef<[u8]>>) -> Result<i64> {
        integer(self.run(Cmd::new("SADD").arg(key).args(members))?)
    }

    fn srem(&self, key: &str, members: impl IntoIterator<Item = impl AsRef<[u8]>>) -> Result<i64> {
        integer(self.run(Cmd::new("SREM").arg(key).args(members))?)
    }

    fn spop(&self, key: &str) -> Result<Option<String>> {
        opt_string(self.run(Cmd::new("SPOP").arg(key))?)
    }

    fn srandmember(&self, key: &str) -> Result<Option<String>> {
        opt_string(self.run(Cmd::new("SRANDMEMBER").arg(key))?)
    }

    fn sismember(&self, key: &str, member: &str) -> Result<bool> {
        flag(self.run(Cmd::new("SISMEMBER").arg(key).arg(member))?)
    }

    fn scard(&self, key: &str) -> Result<i64> {
        integer(self.run(Cmd::new("SCARD").arg(key))?)
    }

    fn smembers(&self, key: &str) -> Result<Vec<String>> {
        strings(self.run(Cmd::new("SMEMBERS").arg(key))?)
    }

    fn sunionstore(&self, dest: &str, keys: &[&str]) -> Result<i64> {
        integer(self.run(Cmd::new("SUNIONSTORE").arg(dest).args(keys))?)
    }

    fn sinterstore(&self, dest: &str, keys: &[&str]) -> Result<i64> {
        integer(self.run(Cmd::new("SINTERSTORE").arg(dest).args(keys))?)
    }

    fn sdiffstore(&self, dest: &str, keys: &[&str]) -> Result<i64> {
        integer(self.run(Cmd::new("SDIFFSTORE").arg(dest).args(keys))?)
    }

    // Lists

    fn lpush(&self, key: &str, values: impl IntoIterator<Item = impl AsRef<[u8]>>) -> Result<i64> {
        integer(self.run(Cmd::new("LPUSH").arg(key).args(values))?)
    }

    fn rpush(&self, key: &str, values: impl IntoIterator<Item = impl AsRef<[u8]>>) -> Result<i64> {
        integer(self.run(Cmd::new("RPUSH").arg(key).args(values))?)
    }

    fn lpop(&self, key: &str) -> Result<Option<String>> {
        opt_string(self.run(Cmd::new("LPOP").arg(key))?)
    }

    fn rpop(&self, key: &str) -> Result<Option<String>> {
        opt_string(self.run(Cmd::new("RPOP").arg(key))?)
    }

    fn llen(&self, key: &str) -> Result<i64> {
        integer(self.run(Cmd::new("LLEN").arg(key))?)
    }

    /// Elements between `start` and `stop`, both inclusive
    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        strings(self.run(
            Cmd::new("LRANGE")
                .arg(key)
                .arg(start.to_string())
                .arg(stop.to_string()),
        )?)
    }

    fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<()> {
        ok(self.run(
            Cmd::new("LTRIM")
                .arg(key)
                .arg(start.to_string())
                .arg(stop.to_string()),
        )?)
    }

    fn lrem(&self, key: &str, count: i64, value: &str) -> Result<i64> {
        integer(self.run(Cmd::new("LREM").arg(key).arg(count.to_string()).arg(value))?)
    }

    fn lindex(&self, key: &str, index: i64) -> Result<Option<String>> {
        opt_string(self.run(Cmd::new("LINDEX").arg(key).arg(index.to_string()))?)
    }

    fn lset(&self, key: &str, index: i64, value: &str) -> Result<()> {
        ok(self.run(Cmd::new("LSET").arg(key).arg(index.to_string()).arg(value))?)
    }

    // Sorted sets

    /// Returns 1 when the member is new, 0 when only its score changed
    fn zadd(&self, key: &str, member: &str, score: f64) -> Result<i64> {
        integer(self.run(Cmd::new("ZADD").arg(key).arg(format_score(score)).arg(member))?)
    }

    fn zincrby(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        let reply = self.run(Cmd::new("ZINCRBY").arg(key).arg(format_score(delta)).arg(member))?;
        opt_score(reply)?
            .ok_or_else(|| ClientError::UnexpectedReply("ZINCRBY returned null".to_string()))
    }

    fn zrem(&self, key: &str, members: impl IntoIterator<Item = impl AsRef<[u8]>>) -> Result<i64> {
        integer(self.run(Cmd::new("ZREM").arg(key).args(members))?)
    }

    fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>> {
        opt_score(self.run(Cmd::new("ZSCORE").arg(key).arg(member))?)
    }

    fn zrank(&self, key: &str, member: &str) -> Result<Option<i64>> {
        opt_integer(self.run(Cmd::new("ZRANK").arg(key).arg(member))?)
    }

    fn zrevrank(&self, key: &str, member: &str) -> Result<Option<i64>> {
        opt_integer(self.run(Cmd::new("ZREVRANK").arg(key).arg(member))?)
    }

    fn zcard(&self, key: &str) -> Result<i64> {
        integer(self.run(Cmd::new("ZCARD").arg(key))?)
    }

    /// Members with a score between `min` and `max`, ascending
    fn zrangebyscore(&self, key: &str, min: Bound<f64>, max: Bound<f64>) -> Result<Vec<String>> {
        strings(self.run(
            Cmd::new("ZRANGEBYSCORE")
                .arg(key)
                .arg(score_bound(min, "-inf"))
                .arg(score_bound(max, "+inf")),
        )?)
    }

    fn zrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        strings(self.run(
            Cmd::new("ZRANGE")
                .arg(key)
                .arg(start.to_string())
                .arg(stop.to_string()),
        )?)
    }

    fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        strings(self.run(
            Cmd::new("ZREVRANGE")
                .arg(key)
                .arg(start.to_string())
                .arg(stop.to_string()),
        )?)
    }

    // Hashes

    /// Returns true when the field is new
    fn hset(&self, key: &str, field: &str, value: &str) -> Result<bool> {
        flag(self.run(Cmd::new("HSET").arg(key).arg(field).arg(value))?)
    }

    /// Set several fields in one command, returns how many were new
    fn hmset<K, V>(&self, key: &str, pairs: impl IntoIterator<Item = (K, V)>) -> Result<i64>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let mut cmd = Cmd::new("HSET").arg(key);
        for (field, value) in pairs {
            cmd = cmd.arg(field).arg(value);
        }
        integer(self.run(cmd)?)
    }

    fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        opt_string(self.run(Cmd::new("HGET").arg(key).arg(field))?)
    }

    fn hdel(&self, key: &str, fields: impl IntoIterator<Item = impl AsRef<[u8]>>) -> Result<i64> {
        integer(self.run(Cmd::new("HDEL").arg(key).args(fields))?)
    }

    fn hkeys(&self, key: &str) -> Result<Vec<String>> {
        strings(self.run(Cmd::new("HKEYS").arg(key))?)
    }

    fn hvals(&self, key: &str) -> Result<Vec<String>> {
        strings(self.run(Cmd::new("HVALS").arg(key))?)
    }

    fn hgetall(&self, key: &str) -> Result<Vec<(String, String)>> {
        pairs(self.run(Cmd::new("HGETALL").arg(key))?)
    }

    fn hexists(&self, key: &str, field: &str) -> Result<bool> {
        flag(self.run(Cmd::new("HEXISTS").arg(key).arg(field))?)
    }

    fn hlen(&self, key: &str) -> Result<i64> {
        integer(self.run(Cmd::new("HLEN").arg(key))?)
    }

    fn hincrby(&self, key: &str, field: &str, delta: i64) -> Result<i64> {
        integer(self.run(Cmd::new("HINCRBY").arg(key).arg(field).arg(delta.to_string()))?)
    }
}

impl<T: KvClient + ?Sized> Commands for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LocalClient;

    #[test]
    fn test_cmd_builder() {
        let parts = Cmd::new("SADD").arg("s").args(["a", "b"]).into_parts();
        assert_eq!(parts, vec!["SADD", "s", "a", "b"]);
    }

    #[test]
    fn test_score_bound() {
        assert_eq!(score_bound(Bound::Included(35.0), "-inf"), "35");
        assert_eq!(score_bound(Bound::Excluded(2.5), "-inf"), "(2.5");
        assert_eq!(score_bound(Bound::Unbounded, "+inf"), "+inf");
    }

    #[test]
    fn test_error_reply_becomes_server_error() {
        let client = LocalClient::new();
        client.rpush("l", ["a"]).unwrap();

        match client.sadd("l", ["x"]) {
            Err(ClientError::Server(msg)) => assert!(msg.starts_with("WRONGTYPE")),
            other => panic!("Expected server error, got {:?}", other),
        }
    }

    #[test]
    fn test_set_commands() {
        let client = LocalClient::new();
        assert_eq!(client.sadd("s", ["a", "b", "a"]).unwrap(), 2);
        assert!(client.sismember("s", "a").unwrap());
        assert_eq!(client.srem("s", ["a", "z"]).unwrap(), 1);
        assert_eq!(client.smembers("s").unwrap(), vec!["b"]);
        assert_eq!(client.spop("s").unwrap(), Some("b".to_string()));
        assert_eq!(client.spop("s").unwrap(), None);
        assert!(!client.exists("s").unwrap());
    }

    #[test]
    fn test_list_commands() {
        let client = LocalClient::new();
        client.rpush("l", ["a", "b", "c"]).unwrap();
        client.lpush("l", ["z"]).unwrap();
        assert_eq!(client.lrange("l", 0, -1).unwrap(), vec!["z", "a", "b", "c"]);
        assert_eq!(client.lindex("l", -1).unwrap(), Some("c".to_string()));
        client.lset("l", 0, "y").unwrap();
        assert!(matches!(client.lset("l", 10, "y"), Err(ClientError::Server(_))));
        client.ltrim("l", 1, 2).unwrap();
        assert_eq!(client.lrange("l", 0, -1).unwrap(), vec!["a", "b"]);
        assert_eq!(client.lrem("l", 1, "a").unwrap(), 1);
        assert_eq!(client.llen("l").unwrap(), 1);
    }

    #[test]
    fn test_sorted_set_commands() {
        let client = LocalClient::new();
        assert_eq!(client.zadd("z", "a", 1.0).unwrap(), 1);
        assert_eq!(client.zadd("z", "b", 2.5).unwrap(), 1);
        assert_eq!(client.zadd("z", "a", 3.0).unwrap(), 0);
        assert_eq!(client.zscore("z", "a").unwrap(), Some(3.0));
        assert_eq!(client.zrank("z", "a").unwrap(), Some(1));
        assert_eq!(client.zrevrank("z", "a").unwrap(), Some(0));
        assert_eq!(client.zrank("z", "nope").unwrap(), None);
        assert_eq!(
            client
                .zrangebyscore("z", Bound::Excluded(2.5), Bound::Unbounded)
                .unwrap(),
            vec!["a"]
        );
        assert_eq!(client.zincrby("z", "b", 0.5).unwrap(), 3.0);
        assert_eq!(client.zrevrange("z", 0, -1).unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn test_hash_commands() {
        let client = LocalClient::new();
        assert!(client.hset("h", "f", "v").unwrap());
        assert!(!client.hset("h", "f", "w").unwrap());
        assert_eq!(client.hmset("h", [("g", "1"), ("f", "x")]).unwrap(), 1);
        assert_eq!(client.hget("h", "f").unwrap(), Some("x".to_string()));
        assert_eq!(client.hincrby("h", "g", 4).unwrap(), 5);

        let mut all = client.hgetall("h").unwrap();
        all.sort();
        assert_eq!(
            all,
            vec![
                ("f".to_string(), "x".to_string()),
                ("g".to_string(), "5".to_string())
            ]
        );
        assert_eq!(client.hdel("h", ["f", "nope"]).unwrap(), 1);
        assert_eq!(client.hlen("h").unwrap(), 1);
    }

    #[test]
    fn test_key_commands() {
        let client = LocalClient::new();
        client.ping().unwrap();
        client.sadd("s", ["a"]).unwrap();
        assert_eq!(client.ttl("s").unwrap(), -1);
        assert!(client.expire("s", 100).unwrap());
        assert!(client.ttl("s").unwrap() > 0);
        assert!(client.del("s").unwrap());
        assert_eq!(client.ttl("s").unwrap(), -2);
        client.sadd("s", ["a"]).unwrap();
        client.flushdb().unwrap();
        assert!(!client.exists("s").unwrap());
    }
}
