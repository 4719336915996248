//! Set commands (SADD, SREM, SPOP, SISMEMBER, SCARD, SMEMBERS, SRANDMEMBER,
//! SUNIONSTORE, SINTERSTORE, SDIFFSTORE)

use super::{
    bulk_array, extract_bulk_string, extract_bulk_strings, modify_value, read_value, try_reply,
    write_value, wrong_args, Command, CommandContext,
};
use crate::protocol::RespValue;
use crate::store::Value;
use bytes::Bytes;
use std::collections::HashSet;

/// SADD command - Add one or more members to a set
///
/// Syntax: SADD key member [member ...]
pub struct SAddCommand;

impl Command for SAddCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 2 {
            return wrong_args("SADD");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let members = try_reply!(extract_bulk_strings(&args[1..]));

        let set = try_reply!(write_value(ctx, key, Value::empty_set, Value::as_set_mut));
        let added = members.into_iter().filter(|m| set.insert(m.clone())).count();

        RespValue::integer(added as i64)
    }

    fn name(&self) -> &'static str {
        "SADD"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SREM command - Remove one or more members from a set
///
/// Syntax: SREM key member [member ...]
pub struct SRemCommand;

impl Command for SRemCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 2 {
            return wrong_args("SREM");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let members = try_reply!(extract_bulk_strings(&args[1..]));

        let removed = match try_reply!(modify_value(ctx, key, Value::as_set_mut)) {
            Some(set) => members.iter().filter(|m| set.remove(*m)).count(),
            None => 0,
        };
        ctx.store.remove_if_empty(key);

        RespValue::integer(removed as i64)
    }

    fn name(&self) -> &'static str {
        "SREM"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SPOP command - Remove and return an arbitrary member
///
/// Syntax: SPOP key
pub struct SPopCommand;

impl Command for SPopCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.is_empty() {
            return wrong_args("SPOP");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));

        let popped = match try_reply!(modify_value(ctx, key, Value::as_set_mut)) {
            Some(set) => {
                let member = set.iter().next().cloned();
                if let Some(ref member) = member {
                    set.remove(member);
                }
                member
            }
            None => None,
        };
        ctx.store.remove_if_empty(key);

        match popped {
            Some(member) => RespValue::bulk_string(member),
            None => RespValue::null(),
        }
    }

    fn name(&self) -> &'static str {
        "SPOP"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// SISMEMBER command - Check whether a member belongs to a set
///
/// Syntax: SISMEMBER key member
pub struct SIsMemberCommand;

impl Command for SIsMemberCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 2 {
            return wrong_args("SISMEMBER");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let member = try_reply!(extract_bulk_string(&args[1]));

        let found = try_reply!(read_value(ctx, key, Value::as_set))
            .map(|set| set.contains(member))
            .unwrap_or(false);

        RespValue::integer(found as i64)
    }

    fn name(&self) -> &'static str {
        "SISMEMBER"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// SMEMBERS command - Get all members of a set
///
/// Syntax: SMEMBERS key
pub struct SMembersCommand;

impl Command for SMembersCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.is_empty() {
            return wrong_args("SMEMBERS");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        match try_reply!(read_value(ctx, key, Value::as_set)) {
            Some(set) => bulk_array(set),
            None => RespValue::array(vec![]),
        }
    }

    fn name(&self) -> &'static str {
        "SMEMBERS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// SCARD command - Get the number of members in a set
///
/// Syntax: SCARD key
pub struct SCardCommand;

impl Command for SCardCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.is_empty() {
            return wrong_args("SCARD");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let len = try_reply!(read_value(ctx, key, Value::as_set))
            .map(HashSet::len)
            .unwrap_or(0);

        RespValue::integer(len as i64)
    }

    fn name(&self) -> &'static str {
        "SCARD"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// SRANDMEMBER command - Return an arbitrary member without removing it
///
/// Syntax: SRANDMEMBER key
pub struct SRandMemberCommand;

impl Command for SRandMemberCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.is_empty() {
            return wrong_args("SRANDMEMBER");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let member = try_reply!(read_value(ctx, key, Value::as_set))
            .and_then(|set| set.iter().next().cloned());

        match member {
            Some(member) => RespValue::bulk_string(member),
            None => RespValue::null(),
        }
    }

    fn name(&self) -> &'static str {
        "SRANDMEMBER"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

#[derive(Debug, Clone, Copy)]
enum SetOperation {
    Union,
    Intersection,
    Difference,
}

/// Shared body of the *STORE commands
///
/// Syntax: <CMD> destination key [key ...]
///
/// Missing source keys count as empty sets. The destination is overwritten;
/// an empty result deletes it. Replies with the cardinality of the result.
fn store_set_operation(
    ctx: &mut CommandContext,
    args: &[RespValue],
    operation: SetOperation,
    name: &str,
) -> RespValue {
    if args.len() < 2 {
        return wrong_args(name);
    }

    let destination = try_reply!(extract_bulk_string(&args[0])).clone();
    let keys = try_reply!(extract_bulk_strings(&args[1..]));

    let mut sources: Vec<HashSet<Bytes>> = Vec::with_capacity(keys.len());
    for key in &keys {
        let set = try_reply!(read_value(ctx, key, Value::as_set));
        sources.push(set.cloned().unwrap_or_default());
    }

    let mut sources = sources.into_iter();
    let mut result = sources.next().unwrap_or_default();
    for other in sources {
        match operation {
            SetOperation::Union => result.extend(other),
            SetOperation::Intersection => result.retain(|m| other.contains(m)),
            SetOperation::Difference => result.retain(|m| !other.contains(m)),
        }
    }

    let len = result.len();
    if result.is_empty() {
        ctx.store.delete(&destination);
    } else {
        ctx.store.set(destination, Value::Set(result));
    }

    RespValue::integer(len as i64)
}

/// SUNIONSTORE command - Store the union of sets
pub struct SUnionStoreCommand;

impl Command for SUnionStoreCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        store_set_operation(ctx, args, SetOperation::Union, self.name())
    }

    fn name(&self) -> &'static str {
        "SUNIONSTORE"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SINTERSTORE command - Store the intersection of sets
pub struct SInterStoreCommand;

impl Command for SInterStoreCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        store_set_operation(ctx, args, SetOperation::Intersection, self.name())
    }

    fn name(&self) -> &'static str {
        "SINTERSTORE"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SDIFFSTORE command - Store the members of the first set missing from the others
pub struct SDiffStoreCommand;

impl Command for SDiffStoreCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        store_set_operation(ctx, args, SetOperation::Difference, self.name())
    }

    fn name(&self) -> &'static str {
        "SDIFFSTORE"
    }

    fn min_args(&self) -> usize {
        2
    }
}
