//! TTL commands (EXPIRE, EXPIREAT, TTL)

use super::{extract_bulk_string, extract_integer, try_reply, wrong_args, Command, CommandContext};
use crate::protocol::RespValue;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// EXPIRE command - Set a timeout on a key
///
/// Syntax: EXPIRE key seconds
///
/// A non-positive timeout deletes the key.
pub struct ExpireCommand;

impl Command for ExpireCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 2 {
            return wrong_args("EXPIRE");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let seconds = try_reply!(extract_integer(&args[1]));

        let ttl = Duration::from_secs(seconds.max(0) as u64);
        RespValue::integer(ctx.store.expire(key, ttl) as i64)
    }

    fn name(&self) -> &'static str {
        "EXPIRE"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// EXPIREAT command - Expire a key at an absolute UNIX timestamp (seconds)
///
/// Syntax: EXPIREAT key timestamp
///
/// A timestamp in the past deletes the key.
pub struct ExpireAtCommand;

impl Command for ExpireAtCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 2 {
            return wrong_args("EXPIREAT");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let timestamp = try_reply!(extract_integer(&args[1]));

        let deadline = UNIX_EPOCH + Duration::from_secs(timestamp.max(0) as u64);
        let ttl = deadline
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO);
        RespValue::integer(ctx.store.expire(key, ttl) as i64)
    }

    fn name(&self) -> &'static str {
        "EXPIREAT"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// TTL command - Get the time to live for a key
///
/// Syntax: TTL key
///
/// Returns:
/// - The TTL in seconds
/// - -1 if the key exists but has no expiration
/// - -2 if the key does not exist
pub struct TtlCommand;

impl Command for TtlCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.is_empty() {
            return wrong_args("TTL");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        RespValue::integer(ctx.store.ttl(key))
    }

    fn name(&self) -> &'static str {
        "TTL"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Value;
    use bytes::Bytes;

    #[test]
    fn test_expire_ttl() {
        let mut ctx = CommandContext::new();
        ctx.store.set("key1", Value::empty_hash());

        let args = vec![RespValue::bulk_string("key1"), RespValue::bulk_string("100")];
        let result = ExpireCommand.execute(&mut ctx, &args);
        assert_eq!(result, RespValue::integer(1));

        let args = vec![RespValue::bulk_string("key1")];
        match TtlCommand.execute(&mut ctx, &args) {
            RespValue::Integer(ttl) => assert!(ttl >= 99 && ttl <= 100),
            other => panic!("Expected integer response, got {}", other),
        }
    }

    #[test]
    fn test_expire_missing_key() {
        let mut ctx = CommandContext::new();
        let args = vec![RespValue::bulk_string("nope"), RespValue::bulk_string("10")];
        assert_eq!(ExpireCommand.execute(&mut ctx, &args), RespValue::integer(0));
    }

    #[test]
    fn test_expireat() {
        let mut ctx = CommandContext::new();
        ctx.store.set("key1", Value::string("v"));

        let in_an_hour = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 3600;
        let args = vec![
            RespValue::bulk_string("key1"),
            RespValue::bulk_string(in_an_hour.to_string()),
        ];
        assert_eq!(ExpireAtCommand.execute(&mut ctx, &args), RespValue::integer(1));
        let ttl = ctx.store.ttl(&Bytes::from("key1"));
        assert!(ttl > 3500 && ttl <= 3600);

        // A timestamp in the past removes the key
        let args = vec![RespValue::bulk_string("key1"), RespValue::bulk_string("1")];
        assert_eq!(ExpireAtCommand.execute(&mut ctx, &args), RespValue::integer(1));
        assert!(!ctx.store.exists(&Bytes::from("key1")));
    }

    #[test]
    fn test_ttl_no_key() {
        let mut ctx = CommandContext::new();
        let args = vec![RespValue::bulk_string("nonexistent")];
        assert_eq!(TtlCommand.execute(&mut ctx, &args), RespValue::integer(-2));
    }

    #[test]
    fn test_ttl_no_expiration() {
        let mut ctx = CommandContext::new();
        ctx.store.set("key1", Value::string("value1"));

        let args = vec![RespValue::bulk_string("key1")];
        assert_eq!(TtlCommand.execute(&mut ctx, &args), RespValue::integer(-1));
    }
}
