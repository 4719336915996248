//! Admin commands (PING, FLUSHDB)

use super::{extract_bulk_string, try_reply, Command, CommandContext};
use crate::protocol::RespValue;

/// PING command - Check that the server is alive
///
/// Syntax: PING [message]
pub struct PingCommand;

impl Command for PingCommand {
    fn execute(&self, _ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        match args.first() {
            Some(message) => {
                RespValue::bulk_string(try_reply!(extract_bulk_string(message)).clone())
            }
            None => RespValue::simple_string("PONG"),
        }
    }

    fn name(&self) -> &'static str {
        "PING"
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// FLUSHDB command - Remove all keys from the current database
///
/// Syntax: FLUSHDB
pub struct FlushDbCommand;

impl Command for FlushDbCommand {
    fn execute(&self, ctx: &mut CommandContext, _args: &[RespValue]) -> RespValue {
        ctx.store.clear();
        RespValue::ok()
    }

    fn name(&self) -> &'static str {
        "FLUSHDB"
    }

    fn min_args(&self) -> usize {
        0
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Value;

    #[test]
    fn test_ping() {
        let mut ctx = CommandContext::new();
        assert_eq!(PingCommand.execute(&mut ctx, &[]), RespValue::simple_string("PONG"));

        let args = vec![RespValue::bulk_string("hello")];
        assert_eq!(PingCommand.execute(&mut ctx, &args), RespValue::bulk_string("hello"));
    }

    #[test]
    fn test_flushdb() {
        let mut ctx = CommandContext::new();
        ctx.store.set("key1", Value::string("value1"));
        ctx.store.set("key2", Value::string("value2"));

        assert_eq!(ctx.store.len(), 2);

        let result = FlushDbCommand.execute(&mut ctx, &[]);
        assert_eq!(result, RespValue::ok());

        assert_eq!(ctx.store.len(), 0);
    }
}
