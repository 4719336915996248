//! Hash commands (HSET, HGET, HGETALL, HDEL, HKEYS, HVALS, HEXISTS, HLEN, HINCRBY)

use super::{
    bulk_array, extract_bulk_string, extract_bulk_strings, extract_integer, modify_value,
    read_value, try_reply, write_value, wrong_args, Command, CommandContext,
};
use crate::protocol::RespValue;
use crate::store::Value;
use bytes::Bytes;
use std::collections::HashMap;

/// HSET command - Set field in the hash stored at key to value
///
/// Syntax: HSET key field value [field value ...]
pub struct HSetCommand;

impl Command for HSetCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        // Check that we have pairs of field/value
        if args.len() < 3 || (args.len() - 1) % 2 != 0 {
            return wrong_args("HSET");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let parts = try_reply!(extract_bulk_strings(&args[1..]));

        let hash = try_reply!(write_value(ctx, key, Value::empty_hash, Value::as_hash_mut));
        let added = parts
            .chunks(2)
            .filter(|pair| hash.insert(pair[0].clone(), pair[1].clone()).is_none())
            .count();

        RespValue::integer(added as i64)
    }

    fn name(&self) -> &'static str {
        "HSET"
    }

    fn min_args(&self) -> usize {
        3
    }
}

/// HGET command - Get the value of a hash field
///
/// Syntax: HGET key field
pub struct HGetCommand;

impl Command for HGetCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 2 {
            return wrong_args("HGET");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let field = try_reply!(extract_bulk_string(&args[1]));

        let value =
            try_reply!(read_value(ctx, key, Value::as_hash)).and_then(|hash| hash.get(field));
        match value {
            Some(v) => RespValue::bulk_string(v.clone()),
            None => RespValue::null(),
        }
    }

    fn name(&self) -> &'static str {
        "HGET"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// HGETALL command - Get all fields and values in a hash
///
/// Syntax: HGETALL key
pub struct HGetAllCommand;

impl Command for HGetAllCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.is_empty() {
            return wrong_args("HGETALL");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        match try_reply!(read_value(ctx, key, Value::as_hash)) {
            Some(hash) => bulk_array(hash.iter().flat_map(|(field, value)| [field, value])),
            None => RespValue::array(vec![]),
        }
    }

    fn name(&self) -> &'static str {
        "HGETALL"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// HDEL command - Delete one or more hash fields
///
/// Syntax: HDEL key field [field ...]
pub struct HDelCommand;

impl Command for HDelCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 2 {
            return wrong_args("HDEL");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let fields = try_reply!(extract_bulk_strings(&args[1..]));

        let deleted = match try_reply!(modify_value(ctx, key, Value::as_hash_mut)) {
            Some(hash) => fields.iter().filter(|f| hash.remove(*f).is_some()).count(),
            None => 0,
        };
        ctx.store.remove_if_empty(key);

        RespValue::integer(deleted as i64)
    }

    fn name(&self) -> &'static str {
        "HDEL"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// HKEYS command - Get all field names in a hash
///
/// Syntax: HKEYS key
pub struct HKeysCommand;

impl Command for HKeysCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.is_empty() {
            return wrong_args("HKEYS");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        match try_reply!(read_value(ctx, key, Value::as_hash)) {
            Some(hash) => bulk_array(hash.keys()),
            None => RespValue::array(vec![]),
        }
    }

    fn name(&self) -> &'static str {
        "HKEYS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// HVALS command - Get all values in a hash
///
/// Syntax: HVALS key
pub struct HValsCommand;

impl Command for HValsCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.is_empty() {
            return wrong_args("HVALS");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        match try_reply!(read_value(ctx, key, Value::as_hash)) {
            Some(hash) => bulk_array(hash.values()),
            None => RespValue::array(vec![]),
        }
    }

    fn name(&self) -> &'static str {
        "HVALS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// HEXISTS command - Check whether a field exists
///
/// Syntax: HEXISTS key field
pub struct HExistsCommand;

impl Command for HExistsCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 2 {
            return wrong_args("HEXISTS");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let field = try_reply!(extract_bulk_string(&args[1]));

        let found = try_reply!(read_value(ctx, key, Value::as_hash))
            .map(|hash| hash.contains_key(field))
            .unwrap_or(false);

        RespValue::integer(found as i64)
    }

    fn name(&self) -> &'static str {
        "HEXISTS"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// HLEN command - Number of fields in a hash
///
/// Syntax: HLEN key
pub struct HLenCommand;

impl Command for HLenCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.is_empty() {
            return wrong_args("HLEN");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let len = try_reply!(read_value(ctx, key, Value::as_hash))
            .map(HashMap::len)
            .unwrap_or(0);

        RespValue::integer(len as i64)
    }

    fn name(&self) -> &'static str {
        "HLEN"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// HINCRBY command - Increment the integer value of a hash field
///
/// Syntax: HINCRBY key field increment
pub struct HIncrByCommand;

impl Command for HIncrByCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 3 {
            return wrong_args("HINCRBY");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let field = try_reply!(extract_bulk_string(&args[1])).clone();
        let increment = try_reply!(extract_integer(&args[2]));

        let hash = try_reply!(write_value(ctx, key, Value::empty_hash, Value::as_hash_mut));

        let current = match hash.get(&field) {
            Some(raw) => match std::str::from_utf8(raw).ok().and_then(|s| s.parse::<i64>().ok()) {
                Some(n) => n,
                None => return RespValue::error("ERR hash value is not an integer"),
            },
            None => 0,
        };

        let new_value = match current.checked_add(increment) {
            Some(v) => v,
            None => return RespValue::error("ERR increment or decrement would overflow"),
        };

        hash.insert(field, Bytes::from(new_value.to_string()));
        RespValue::integer(new_value)
    }

    fn name(&self) -> &'static str {
        "HINCRBY"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<RespValue> {
        parts
            .iter()
            .map(|p| RespValue::bulk_string(Bytes::copy_from_slice(p.as_bytes())))
            .collect()
    }

    fn sorted(reply: RespValue) -> Vec<Bytes> {
        let mut items: Vec<Bytes> = reply
            .as_array()
            .expect("array reply")
            .iter()
            .map(|item| item.as_bulk_string().unwrap().clone())
            .collect();
        items.sort();
        items
    }

    #[test]
    fn test_hset_hget() {
        let mut ctx = CommandContext::new();

        let result = HSetCommand.execute(&mut ctx, &args(&["myhash", "field1", "value1"]));
        assert_eq!(result, RespValue::integer(1));

        let result =
            HSetCommand.execute(&mut ctx, &args(&["myhash", "field1", "value2", "field2", "x"]));
        assert_eq!(result, RespValue::integer(1));

        let result = HGetCommand.execute(&mut ctx, &args(&["myhash", "field1"]));
        assert_eq!(result, RespValue::bulk_string(Bytes::from("value2")));

        let result = HGetCommand.execute(&mut ctx, &args(&["myhash", "nonexistent"]));
        assert_eq!(result, RespValue::null());
    }

    #[test]
    fn test_hset_odd_arguments() {
        let mut ctx = CommandContext::new();
        let result = HSetCommand.execute(&mut ctx, &args(&["myhash", "f1", "v1", "f2"]));
        assert!(result.is_error());
        assert!(!ctx.store.exists(&Bytes::from("myhash")));
    }

    #[test]
    fn test_hgetall_hkeys_hvals() {
        let mut ctx = CommandContext::new();
        HSetCommand.execute(&mut ctx, &args(&["myhash", "f1", "v1", "f2", "v2"]));

        assert_eq!(
            sorted(HGetAllCommand.execute(&mut ctx, &args(&["myhash"]))),
            vec!["f1", "f2", "v1", "v2"]
        );
        assert_eq!(sorted(HKeysCommand.execute(&mut ctx, &args(&["myhash"]))), vec!["f1", "f2"]);
        assert_eq!(sorted(HValsCommand.execute(&mut ctx, &args(&["myhash"]))), vec!["v1", "v2"]);
        assert_eq!(HGetAllCommand.execute(&mut ctx, &args(&["nope"])), RespValue::array(vec![]));
    }

    #[test]
    fn test_hdel_hexists_hlen() {
        let mut ctx = CommandContext::new();
        HSetCommand.execute(&mut ctx, &args(&["myhash", "f1", "v1", "f2", "v2"]));

        assert_eq!(HLenCommand.execute(&mut ctx, &args(&["myhash"])), RespValue::integer(2));
        assert_eq!(
            HExistsCommand.execute(&mut ctx, &args(&["myhash", "f1"])),
            RespValue::integer(1)
        );

        let result = HDelCommand.execute(&mut ctx, &args(&["myhash", "f1", "f3"]));
        assert_eq!(result, RespValue::integer(1));
        assert_eq!(
            HExistsCommand.execute(&mut ctx, &args(&["myhash", "f1"])),
            RespValue::integer(0)
        );

        HDelCommand.execute(&mut ctx, &args(&["myhash", "f2"]));
        assert_eq!(HLenCommand.execute(&mut ctx, &args(&["myhash"])), RespValue::integer(0));
        assert!(!ctx.store.exists(&Bytes::from("myhash")));
    }

    #[test]
    fn test_hincrby() {
        let mut ctx = CommandContext::new();

        let result = HIncrByCommand.execute(&mut ctx, &args(&["myhash", "counter", "5"]));
        assert_eq!(result, RespValue::integer(5));

        let result = HIncrByCommand.execute(&mut ctx, &args(&["myhash", "counter", "-2"]));
        assert_eq!(result, RespValue::integer(3));

        HSetCommand.execute(&mut ctx, &args(&["myhash", "name", "bob"]));
        let result = HIncrByCommand.execute(&mut ctx, &args(&["myhash", "name", "1"]));
        assert!(result.is_error());
    }
}
