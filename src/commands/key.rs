//! Key commands (DEL, EXISTS)

use super::{extract_bulk_string, try_reply, wrong_args, Command, CommandContext};
use crate::protocol::RespValue;

/// DEL command - Delete one or more keys
///
/// Syntax: DEL key [key ...]
pub struct DelCommand;

impl Command for DelCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.is_empty() {
            return wrong_args("DEL");
        }

        let mut deleted = 0;
        for arg in args {
            let key = try_reply!(extract_bulk_string(arg));
            if ctx.store.delete(key) {
                deleted += 1;
            }
        }

        RespValue::integer(deleted)
    }

    fn name(&self) -> &'static str {
        "DEL"
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// EXISTS command - Check if one or more keys exist
///
/// Syntax: EXISTS key [key ...]
pub struct ExistsCommand;

impl Command for ExistsCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.is_empty() {
            return wrong_args("EXISTS");
        }

        let mut count = 0;
        for arg in args {
            let key = try_reply!(extract_bulk_string(arg));
            if ctx.store.exists(key) {
                count += 1;
            }
        }

        RespValue::integer(count)
    }

    fn name(&self) -> &'static str {
        "EXISTS"
    }

    fn min_args(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Value;

    #[test]
    fn test_del() {
        let mut ctx = CommandContext::new();
        ctx.store.set("key1", Value::string("value1"));
        ctx.store.set("key2", Value::empty_set());

        let args = vec![
            RespValue::bulk_string("key1"),
            RespValue::bulk_string("key2"),
            RespValue::bulk_string("key3"), // doesn't exist
        ];

        let result = DelCommand.execute(&mut ctx, &args);
        assert_eq!(result, RespValue::integer(2));

        // Deleting again is a no-op
        let result = DelCommand.execute(&mut ctx, &args);
        assert_eq!(result, RespValue::integer(0));
    }

    #[test]
    fn test_exists() {
        let mut ctx = CommandContext::new();
        ctx.store.set("key1", Value::string("value1"));

        let args = vec![
            RespValue::bulk_string("key1"),
            RespValue::bulk_string("key2"), // doesn't exist
        ];

        let result = ExistsCommand.execute(&mut ctx, &args);
        assert_eq!(result, RespValue::integer(1));
    }
}
