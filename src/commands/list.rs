//! List commands (LPUSH, RPUSH, LPOP, RPOP, LLEN, LRANGE, LTRIM, LREM, LINDEX, LSET)

use super::{
    bulk_array, extract_bulk_string, extract_bulk_strings, extract_integer, modify_value,
    read_value, try_reply, write_value, wrong_args, Command, CommandContext,
};
use crate::protocol::RespValue;
use crate::store::Value;
use bytes::Bytes;
use std::collections::VecDeque;

/// Resolve a possibly negative index against a list of `len` elements
fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let index = if index < 0 { len + index } else { index };
    if (0..len).contains(&index) {
        Some(index as usize)
    } else {
        None
    }
}

/// Resolve an inclusive `start..=stop` range (negative indices allowed)
///
/// Out-of-range bounds are clamped; returns None when the range is empty.
fn normalize_range(start: i64, stop: i64, len: usize) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

/// Shared body of LPUSH / RPUSH
fn push(ctx: &mut CommandContext, args: &[RespValue], front: bool, name: &str) -> RespValue {
    if args.len() < 2 {
        return wrong_args(name);
    }

    let key = try_reply!(extract_bulk_string(&args[0]));
    let values = try_reply!(extract_bulk_strings(&args[1..]));

    let list = try_reply!(write_value(ctx, key, Value::empty_list, Value::as_list_mut));
    for value in values {
        if front {
            list.push_front(value);
        } else {
            list.push_back(value);
        }
    }

    RespValue::integer(list.len() as i64)
}

/// Shared body of LPOP / RPOP
fn pop(ctx: &mut CommandContext, args: &[RespValue], front: bool, name: &str) -> RespValue {
    if args.is_empty() {
        return wrong_args(name);
    }

    let key = try_reply!(extract_bulk_string(&args[0]));
    let popped = match try_reply!(modify_value(ctx, key, Value::as_list_mut)) {
        Some(list) if front => list.pop_front(),
        Some(list) => list.pop_back(),
        None => None,
    };
    ctx.store.remove_if_empty(key);

    match popped {
        Some(value) => RespValue::bulk_string(value),
        None => RespValue::null(),
    }
}

/// LPUSH command - Prepend one or multiple values to a list
///
/// Syntax: LPUSH key value [value ...]
pub struct LPushCommand;

impl Command for LPushCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        push(ctx, args, true, self.name())
    }

    fn name(&self) -> &'static str {
        "LPUSH"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// RPUSH command - Append one or multiple values to a list
///
/// Syntax: RPUSH key value [value ...]
pub struct RPushCommand;

impl Command for RPushCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        push(ctx, args, false, self.name())
    }

    fn name(&self) -> &'static str {
        "RPUSH"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// LPOP command - Remove and return the first element
///
/// Syntax: LPOP key
pub struct LPopCommand;

impl Command for LPopCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        pop(ctx, args, true, self.name())
    }

    fn name(&self) -> &'static str {
        "LPOP"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// RPOP command - Remove and return the last element
///
/// Syntax: RPOP key
pub struct RPopCommand;

impl Command for RPopCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        pop(ctx, args, false, self.name())
    }

    fn name(&self) -> &'static str {
        "RPOP"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// LRANGE command - Get a range of elements from a list
///
/// Syntax: LRANGE key start stop
pub struct LRangeCommand;

impl Command for LRangeCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 3 {
            return wrong_args("LRANGE");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let start = try_reply!(extract_integer(&args[1]));
        let stop = try_reply!(extract_integer(&args[2]));

        let list = match try_reply!(read_value(ctx, key, Value::as_list)) {
            Some(list) => list,
            None => return RespValue::array(vec![]),
        };

        match normalize_range(start, stop, list.len()) {
            Some((start, stop)) => bulk_array(list.range(start..=stop)),
            None => RespValue::array(vec![]),
        }
    }

    fn name(&self) -> &'static str {
        "LRANGE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// LTRIM command - Keep only the elements in the inclusive range
///
/// Syntax: LTRIM key start stop
pub struct LTrimCommand;

impl Command for LTrimCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 3 {
            return wrong_args("LTRIM");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let start = try_reply!(extract_integer(&args[1]));
        let stop = try_reply!(extract_integer(&args[2]));

        if let Some(list) = try_reply!(modify_value(ctx, key, Value::as_list_mut)) {
            match normalize_range(start, stop, list.len()) {
                Some((start, stop)) => {
                    list.truncate(stop + 1);
                    list.drain(..start);
                }
                None => list.clear(),
            }
        }
        ctx.store.remove_if_empty(key);

        RespValue::ok()
    }

    fn name(&self) -> &'static str {
        "LTRIM"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// LREM command - Remove occurrences of a value
///
/// Syntax: LREM key count value
///
/// count > 0 removes from head to tail, count < 0 from tail to head,
/// count = 0 removes every occurrence.
pub struct LRemCommand;

impl Command for LRemCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 3 {
            return wrong_args("LREM");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let count = try_reply!(extract_integer(&args[1]));
        let value = try_reply!(extract_bulk_string(&args[2]));

        let removed = match try_reply!(modify_value(ctx, key, Value::as_list_mut)) {
            Some(list) => remove_occurrences(list, value, count),
            None => 0,
        };
        ctx.store.remove_if_empty(key);

        RespValue::integer(removed as i64)
    }

    fn name(&self) -> &'static str {
        "LREM"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

fn remove_occurrences(list: &mut VecDeque<Bytes>, value: &Bytes, count: i64) -> usize {
    let limit = if count == 0 { usize::MAX } else { count.unsigned_abs() as usize };
    let mut positions: Vec<usize> = if count < 0 {
        list.iter()
            .enumerate()
            .rev()
            .filter(|(_, item)| *item == value)
            .map(|(i, _)| i)
            .take(limit)
            .collect()
    } else {
        list.iter()
            .enumerate()
            .filter(|(_, item)| *item == value)
            .map(|(i, _)| i)
            .take(limit)
            .collect()
    };

    // Remove from the back so earlier positions stay valid
    positions.sort_unstable_by(|a, b| b.cmp(a));
    for &position in &positions {
        list.remove(position);
    }
    positions.len()
}

/// LINDEX command - Get an element by index
///
/// Syntax: LINDEX key index
pub struct LIndexCommand;

impl Command for LIndexCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 2 {
            return wrong_args("LINDEX");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let index = try_reply!(extract_integer(&args[1]));

        let element = try_reply!(read_value(ctx, key, Value::as_list)).and_then(|list| {
            normalize_index(index, list.len()).and_then(|i| list.get(i).cloned())
        });

        match element {
            Some(value) => RespValue::bulk_string(value),
            None => RespValue::null(),
        }
    }

    fn name(&self) -> &'static str {
        "LINDEX"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// LSET command - Replace the element at an index
///
/// Syntax: LSET key index value
pub struct LSetCommand;

impl Command for LSetCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 3 {
            return wrong_args("LSET");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let index = try_reply!(extract_integer(&args[1]));
        let value = try_reply!(extract_bulk_string(&args[2])).clone();

        let list = match try_reply!(modify_value(ctx, key, Value::as_list_mut)) {
            Some(list) => list,
            None => return RespValue::error("ERR no such key"),
        };

        match normalize_index(index, list.len()) {
            Some(i) => {
                list[i] = value;
                RespValue::ok()
            }
            None => RespValue::error("ERR index out of range"),
        }
    }

    fn name(&self) -> &'static str {
        "LSET"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// LLEN command - Get the length of a list
///
/// Syntax: LLEN key
pub struct LLenCommand;

impl Command for LLenCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.is_empty() {
            return wrong_args("LLEN");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let len = try_reply!(read_value(ctx, key, Value::as_list))
            .map(VecDeque::len)
            .unwrap_or(0);

        RespValue::integer(len as i64)
    }

    fn name(&self) -> &'static str {
        "LLEN"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}
